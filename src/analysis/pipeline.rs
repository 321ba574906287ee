use chrono::{DateTime, Datelike, Utc};
use std::sync::Arc;

use crate::analysis::wrapped::compose_wrapped;
use crate::error::Result;
use crate::models::WrappedSummary;
use crate::source::ActivitySource;
use crate::validation::{validate_username, validate_year};

pub struct WrappedPipeline {
    source: Arc<dyn ActivitySource>,
}

impl WrappedPipeline {
    pub fn new(source: impl ActivitySource + 'static) -> Self {
        Self {
            source: Arc::new(source),
        }
    }

    pub fn from_shared(source: Arc<dyn ActivitySource>) -> Self {
        Self { source }
    }

    pub async fn generate(&self, username: &str, year: i32) -> Result<WrappedSummary> {
        self.generate_at(username, year, Utc::now()).await
    }

    /// Same as [`generate`](Self::generate) with "now" pinned, which fixes
    /// the current streak and the `generated_at` stamp.
    pub async fn generate_at(
        &self,
        username: &str,
        year: i32,
        now: DateTime<Utc>,
    ) -> Result<WrappedSummary> {
        validate_username(username)?;
        validate_year(year, now.year())?;

        tracing::info!(
            "Generating {} wrapped for {} using {}",
            year,
            username,
            self.source.name()
        );
        let response = self.source.fetch_activity(username, year).await?;
        let payload = response.into_payload(username)?;

        let summary = compose_wrapped(&payload, year, now);
        tracing::info!(
            "Wrapped ready: {} contributions over {} active days, personality {}",
            summary.stats.total_commits,
            summary.stats.active_days,
            summary.personality.primary.label
        );

        Ok(summary)
    }
}
