//! REST API shapes used by the unauthenticated retrieval strategy.

use chrono::{DateTime, FixedOffset, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GitHubUser {
    pub login: String,
    pub name: Option<String>,
    pub avatar_url: String,
    pub bio: Option<String>,
    #[serde(default)]
    pub followers: u64,
    #[serde(default)]
    pub following: u64,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RestRepository {
    pub name: String,
    pub full_name: String,
    pub language: Option<String>,
    #[serde(default)]
    pub stargazers_count: u64,
    #[serde(default)]
    pub private: bool,
    pub owner: RestRepositoryOwner,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RestRepositoryOwner {
    pub login: String,
}

/// `/search/commits` page. Only the first page is read; `total_count`
/// can exceed the items returned.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CommitSearchResponse {
    pub total_count: u64,
    #[serde(default)]
    pub items: Vec<CommitSearchItem>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommitSearchItem {
    pub commit: SearchCommitDetails,
    pub repository: SearchRepository,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchCommitDetails {
    pub author: SearchCommitAuthor,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchCommitAuthor {
    /// Kept in the author's offset so the calendar day is the author's own.
    pub date: DateTime<FixedOffset>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchRepository {
    pub full_name: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IssueSearchResponse {
    pub total_count: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublicEvent {
    #[serde(rename = "type")]
    pub event_type: String,
    pub created_at: DateTime<Utc>,
    pub repo: EventRepo,
    #[serde(default)]
    pub payload: serde_json::Value,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventRepo {
    pub name: String,
}

impl PublicEvent {
    /// Commits carried by a push event; zero for every other kind.
    pub fn pushed_commits(&self) -> u64 {
        if self.event_type != "PushEvent" {
            return 0;
        }
        self.payload
            .get("commits")
            .and_then(|c| c.as_array())
            .map(|c| c.len() as u64)
            .or_else(|| self.payload.get("size").and_then(|s| s.as_u64()))
            .unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_push_event_commit_count() {
        let event: PublicEvent = serde_json::from_value(json!({
            "type": "PushEvent",
            "created_at": "2024-03-02T10:00:00Z",
            "repo": { "name": "octocat/hello-world" },
            "payload": { "commits": [{ "sha": "a" }, { "sha": "b" }] }
        }))
        .unwrap();
        assert_eq!(event.pushed_commits(), 2);

        let other: PublicEvent = serde_json::from_value(json!({
            "type": "IssuesEvent",
            "created_at": "2024-03-02T10:00:00Z",
            "repo": { "name": "octocat/hello-world" }
        }))
        .unwrap();
        assert_eq!(other.pushed_commits(), 0);
    }
}
