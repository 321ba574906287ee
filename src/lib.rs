pub mod config;
pub mod error;
pub mod validation;
pub mod models;
pub mod github;
pub mod source;
pub mod taxonomy;
pub mod analysis;

pub use config::{Config, PipelineConfig};
pub use error::{Error, Result};
pub use github::GitHubClient;
pub use source::ActivitySource;
pub use analysis::{compose_wrapped, WrappedPipeline};
