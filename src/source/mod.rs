pub mod fallback;
pub mod graphql;
pub mod rest;

pub use fallback::FallbackSource;
pub use graphql::GraphQlSource;
pub use rest::RestSource;

use async_trait::async_trait;
use std::sync::Arc;

use crate::config::PipelineConfig;
use crate::error::Result;
use crate::github::GitHubClient;
use crate::models::ContributionsResponse;

/// Something that can produce the upstream activity record for a user and year.
#[async_trait]
pub trait ActivitySource: Send + Sync {
    async fn fetch_activity(&self, username: &str, year: i32) -> Result<ContributionsResponse>;

    fn name(&self) -> &str;
}

/// GraphQL with a REST fallback when a token is present, REST alone otherwise.
///
/// The fallback only runs after the token was rejected, so it gets its own
/// token-less client.
pub fn from_client(
    client: Arc<GitHubClient>,
    config: &PipelineConfig,
) -> Result<Arc<dyn ActivitySource>> {
    if !client.is_authenticated() {
        tracing::info!("No GitHub token supplied, using the REST API for public data");
        return Ok(Arc::new(RestSource::new(client, config.clone())));
    }

    let public = Arc::new(client.anonymous()?);
    let rest = RestSource::new(public, config.clone());
    let graphql = GraphQlSource::new(client, config.max_repositories);
    Ok(Arc::new(FallbackSource::new(Box::new(graphql), Box::new(rest))))
}
