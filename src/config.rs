use crate::error::{Error, Result};
use std::env;

pub const DEFAULT_API_URL: &str = "https://api.github.com";

#[derive(Debug, Clone)]
pub struct Config {
    pub github_token: Option<String>,
    pub api_base_url: String,
    pub max_repositories: u32,
    pub fetch_repo_languages: bool,
    pub concurrency_limit: usize,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let github_token = env::var("GITHUB_TOKEN")
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty());

        let api_base_url = env::var("GITHUB_API_URL")
            .map(|v| v.trim_end_matches('/').to_string())
            .unwrap_or_else(|_| DEFAULT_API_URL.to_string());

        let max_repositories = parse_var("MAX_REPOSITORIES", 100)?;
        if max_repositories == 0 || max_repositories > 100 {
            return Err(Error::Config(
                "MAX_REPOSITORIES must be between 1 and 100".to_string(),
            ));
        }

        let fetch_repo_languages = env::var("FETCH_REPO_LANGUAGES")
            .ok()
            .map(|v| v.to_lowercase() != "false")
            .unwrap_or(true);

        let concurrency_limit = parse_var("CONCURRENCY_LIMIT", 5)?;
        if concurrency_limit == 0 {
            return Err(Error::Config("CONCURRENCY_LIMIT must be at least 1".to_string()));
        }

        Ok(Self {
            github_token,
            api_base_url,
            max_repositories,
            fetch_repo_languages,
            concurrency_limit,
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            github_token: None,
            api_base_url: DEFAULT_API_URL.to_string(),
            max_repositories: 100,
            fetch_repo_languages: true,
            concurrency_limit: 5,
        }
    }
}

fn parse_var<T: std::str::FromStr>(name: &str, default: T) -> Result<T> {
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|_| Error::Config(format!("{} is not a valid number: {:?}", name, raw))),
        Err(_) => Ok(default),
    }
}

/// Settings the retrieval strategies need once a client exists.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub max_repositories: u32,
    pub fetch_repo_languages: bool,
    pub concurrency_limit: usize,
}

impl From<&Config> for PipelineConfig {
    fn from(config: &Config) -> Self {
        Self {
            max_repositories: config.max_repositories,
            fetch_repo_languages: config.fetch_repo_languages,
            concurrency_limit: config.concurrency_limit,
        }
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self::from(&Config::default())
    }
}
