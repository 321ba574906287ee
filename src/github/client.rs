use reqwest::{header, Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use std::collections::HashMap;

use crate::config::DEFAULT_API_URL;
use crate::error::{Error, Result};
use crate::github::graphql::{GraphQlRequest, GraphQlResponse};
use crate::github::paginator::Paginator;
use crate::github::rate_limiter::{rate_limit_retry_after, RateBucket, RateLimiter};
use crate::models::{
    CommitSearchResponse, GitHubUser, IssueSearchResponse, PublicEvent, RestRepository,
};

/// Search and event listings are read one page deep.
const SEARCH_PAGE_SIZE: u32 = 100;

pub struct GitHubClient {
    client: Client,
    rate_limiter: RateLimiter,
    base_url: String,
    authenticated: bool,
}

impl GitHubClient {
    pub fn new(token: Option<&str>) -> Result<Self> {
        let mut headers = header::HeaderMap::new();
        if let Some(token) = token {
            headers.insert(
                header::AUTHORIZATION,
                header::HeaderValue::from_str(&format!("Bearer {}", token))?,
            );
        }
        headers.insert(
            header::ACCEPT,
            header::HeaderValue::from_static("application/vnd.github+json"),
        );
        headers.insert(
            "X-GitHub-Api-Version",
            header::HeaderValue::from_static("2022-11-28"),
        );
        headers.insert(
            header::USER_AGENT,
            header::HeaderValue::from_static(concat!("gitwrapped/", env!("CARGO_PKG_VERSION"))),
        );

        let client = Client::builder().default_headers(headers).build()?;
        let authenticated = token.is_some();

        Ok(Self {
            client,
            rate_limiter: RateLimiter::new(authenticated),
            base_url: DEFAULT_API_URL.to_string(),
            authenticated,
        })
    }

    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    pub fn is_authenticated(&self) -> bool {
        self.authenticated
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// A token-less client against the same API, for public data once a
    /// token has been rejected.
    pub fn anonymous(&self) -> Result<Self> {
        Ok(Self::new(None)?.with_base_url(&self.base_url))
    }

    pub async fn graphql<T: DeserializeOwned>(
        &self,
        query: &str,
        variables: serde_json::Value,
    ) -> Result<GraphQlResponse<T>> {
        self.rate_limiter.wait(RateBucket::GraphQl).await;
        let url = format!("{}/graphql", self.base_url);
        tracing::debug!("POST {}", url);

        let response = self
            .client
            .post(&url)
            .json(&GraphQlRequest { query, variables })
            .send()
            .await?;
        self.rate_limiter.update_from_response(RateBucket::GraphQl, &response).await;
        let response = check_response(response, "GraphQL request").await?;

        Ok(response.json().await?)
    }

    pub async fn get_user(&self, username: &str) -> Result<GitHubUser> {
        self.rate_limiter.wait(RateBucket::Core).await;
        let url = format!("{}/users/{}", self.base_url, username);
        tracing::info!("Fetching user: {}", username);

        let response = self.client.get(&url).send().await?;
        self.rate_limiter.update_from_response(RateBucket::Core, &response).await;

        if response.status() == StatusCode::NOT_FOUND {
            return Err(Error::UserNotFound(username.to_string()));
        }
        let response = check_response(response, &format!("Failed to fetch user {}", username)).await?;

        Ok(response.json().await?)
    }

    pub async fn get_user_repos(&self, username: &str) -> Result<Vec<RestRepository>> {
        let url = format!(
            "{}/users/{}/repos?sort=pushed&direction=desc",
            self.base_url, username
        );
        let paginator = Paginator::new(&self.client, &self.rate_limiter);
        tracing::info!("Fetching repositories for: {}", username);
        paginator.fetch_all(&url, 100).await
    }

    /// First page of commits authored by `username` during `year`.
    pub async fn search_commits(&self, username: &str, year: i32) -> Result<CommitSearchResponse> {
        let query = format!(
            "author:{} author-date:{}-01-01..{}-12-31",
            username, year, year
        );
        self.search("commits", &query).await
    }

    /// Total count of issues or pull requests (`kind` is `issue` or `pr`)
    /// opened by `username` during `year`.
    pub async fn search_issue_count(&self, username: &str, kind: &str, year: i32) -> Result<u64> {
        let query = format!(
            "author:{} type:{} created:{}-01-01..{}-12-31",
            username, kind, year, year
        );
        let response: IssueSearchResponse = self.search("issues", &query).await?;
        Ok(response.total_count)
    }

    pub async fn get_public_events(&self, username: &str) -> Result<Vec<PublicEvent>> {
        self.rate_limiter.wait(RateBucket::Core).await;
        let url = format!("{}/users/{}/events/public", self.base_url, username);
        tracing::debug!("Fetching public events for: {}", username);

        let response = self
            .client
            .get(&url)
            .query(&[("per_page", SEARCH_PAGE_SIZE)])
            .send()
            .await?;
        self.rate_limiter.update_from_response(RateBucket::Core, &response).await;
        let response = check_response(response, "Failed to fetch public events").await?;

        Ok(response.json().await?)
    }

    pub async fn get_repo_languages(
        &self,
        owner: &str,
        repo: &str,
    ) -> Result<HashMap<String, u64>> {
        self.rate_limiter.wait(RateBucket::Core).await;
        let url = format!("{}/repos/{}/{}/languages", self.base_url, owner, repo);

        let response = self.client.get(&url).send().await?;
        self.rate_limiter.update_from_response(RateBucket::Core, &response).await;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(HashMap::new());
        }
        let response = check_response(response, &format!("Failed to fetch languages for {}/{}", owner, repo)).await?;

        Ok(response.json().await?)
    }

    async fn search<T: DeserializeOwned>(&self, endpoint: &str, query: &str) -> Result<T> {
        self.rate_limiter.wait(RateBucket::Search).await;
        let url = format!("{}/search/{}", self.base_url, endpoint);
        tracing::debug!("Searching {}: {}", endpoint, query);

        let per_page = SEARCH_PAGE_SIZE.to_string();
        let response = self
            .client
            .get(&url)
            .query(&[("q", query), ("per_page", per_page.as_str())])
            .send()
            .await?;
        self.rate_limiter.update_from_response(RateBucket::Search, &response).await;
        let response = check_response(response, &format!("Search {} failed", endpoint)).await?;

        Ok(response.json().await?)
    }
}

/// Maps non-success statuses onto the error taxonomy; callers handle 404
/// themselves where it has a meaning of its own.
pub(crate) async fn check_response(response: Response, context: &str) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    if status == StatusCode::UNAUTHORIZED {
        let body = response.text().await.unwrap_or_default();
        return Err(Error::AuthFailed(format!("{}: {}", context, body)));
    }

    if status == StatusCode::FORBIDDEN || status == StatusCode::TOO_MANY_REQUESTS {
        if let Some(retry_after) = rate_limit_retry_after(response.headers()) {
            return Err(Error::RateLimited(retry_after));
        }
        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(Error::RateLimited(60));
        }
    }

    let body = response.text().await.unwrap_or_default();
    Err(Error::GitHubApi(format!("{}: {} - {}", context, status, body)))
}
