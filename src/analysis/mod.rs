pub mod calendar;
pub mod highlights;
pub mod languages;
pub mod personality;
pub mod pipeline;
pub mod repositories;
pub mod reviews;
pub mod stats;
pub mod streaks;
pub mod wrapped;

pub use pipeline::WrappedPipeline;
pub use wrapped::compose_wrapped;

/// Rounds half away from zero to one decimal place.
pub fn round_to_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
