pub mod client;
pub mod graphql;
pub mod paginator;
pub mod rate_limiter;

pub use client::GitHubClient;
pub use graphql::{build_date_range, GraphQlResponse, CONTRIBUTIONS_QUERY};
pub use paginator::Paginator;
pub use rate_limiter::{RateBucket, RateLimiter};
