use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("GitHub API error: {0}")]
    GitHubApi(String),

    #[error("Rate limit exceeded, retry after {0} seconds")]
    RateLimited(u64),

    #[error("Authentication failed: {0}")]
    AuthFailed(String),

    #[error("User not found: {0}")]
    UserNotFound(String),

    #[error("Invalid upstream response: {0}")]
    InvalidResponse(String),

    #[error("Invalid GitHub username: {0:?}")]
    InvalidUsername(String),

    #[error("Invalid year {0}: must be between 2008 and the current year")]
    InvalidYear(i32),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid header value: {0}")]
    InvalidHeader(#[from] reqwest::header::InvalidHeaderValue),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub fn is_retryable(&self) -> bool {
        matches!(self, Error::RateLimited(_) | Error::Network(_))
    }

    /// Auth failures are the only upstream errors that justify switching
    /// to the unauthenticated strategy.
    pub fn is_auth_failure(&self) -> bool {
        matches!(self, Error::AuthFailed(_))
    }
}
