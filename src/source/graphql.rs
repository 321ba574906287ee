use async_trait::async_trait;
use serde_json::json;
use std::sync::Arc;

use super::ActivitySource;
use crate::error::Result;
use crate::github::{build_date_range, GitHubClient, GraphQlResponse, CONTRIBUTIONS_QUERY};
use crate::models::ContributionsResponse;

/// Single-request retrieval through the GraphQL API. Requires a token.
pub struct GraphQlSource {
    client: Arc<GitHubClient>,
    max_repositories: u32,
}

impl GraphQlSource {
    pub fn new(client: Arc<GitHubClient>, max_repositories: u32) -> Self {
        Self {
            client,
            max_repositories,
        }
    }

    fn variables(&self, username: &str, year: i32) -> Result<serde_json::Value> {
        let (from, to) = build_date_range(year)?;
        Ok(json!({
            "username": username,
            "from": from,
            "to": to,
            "maxRepositories": self.max_repositories,
        }))
    }
}

#[async_trait]
impl ActivitySource for GraphQlSource {
    async fn fetch_activity(&self, username: &str, year: i32) -> Result<ContributionsResponse> {
        tracing::info!("Fetching {} contributions for {} via GraphQL", year, username);

        let response: GraphQlResponse<ContributionsResponse> = self
            .client
            .graphql(CONTRIBUTIONS_QUERY, self.variables(username, year)?)
            .await?;

        response.into_result(username)
    }

    fn name(&self) -> &str {
        "graphql"
    }
}
