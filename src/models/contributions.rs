//! Upstream activity record, shaped after the GraphQL contributions query.
//!
//! Both retrieval strategies produce a [`ContributionsResponse`]; the metrics
//! core only ever sees the validated [`ActivityPayload`].

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ContributionsResponse {
    pub user: Option<UserActivity>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserActivity {
    pub login: String,
    pub name: Option<String>,
    pub avatar_url: String,
    pub bio: Option<String>,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub followers: TotalCount,
    #[serde(default)]
    pub following: TotalCount,
    pub contributions_collection: Option<ContributionsCollection>,
    pub repositories: Option<RepositoryConnection>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TotalCount {
    pub total_count: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContributionsCollection {
    pub total_commit_contributions: u64,
    pub total_pull_request_contributions: u64,
    pub total_issue_contributions: u64,
    pub total_pull_request_review_contributions: u64,
    pub total_repositories_with_contributed_commits: u64,
    pub restricted_contributions_count: u64,
    pub contribution_calendar: ContributionCalendar,
    #[serde(default)]
    pub commit_contributions_by_repository: Vec<CommitContribution>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContributionCalendar {
    pub total_contributions: u64,
    pub weeks: Vec<ContributionWeek>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContributionWeek {
    pub contribution_days: Vec<ActivityDay>,
}

/// One calendar date of the requested year.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityDay {
    pub date: NaiveDate,
    pub contribution_count: u64,
    /// 0 = Sunday .. 6 = Saturday
    pub weekday: u8,
}

impl ActivityDay {
    pub fn is_active(&self) -> bool {
        self.contribution_count > 0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LanguageNode {
    pub name: String,
    pub color: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LanguageEdge {
    #[serde(default)]
    pub size: u64,
    pub node: LanguageNode,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LanguageConnection {
    #[serde(default)]
    pub edges: Vec<LanguageEdge>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepositoryOwner {
    pub login: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Repository {
    pub name: String,
    pub owner: Option<RepositoryOwner>,
    pub primary_language: Option<LanguageNode>,
    #[serde(default)]
    pub stargazer_count: u64,
    #[serde(default)]
    pub is_private: bool,
    pub languages: Option<LanguageConnection>,
}

impl Repository {
    pub fn owner_login(&self) -> &str {
        self.owner.as_ref().map(|o| o.login.as_str()).unwrap_or("unknown")
    }

    pub fn full_name(&self) -> String {
        format!("{}/{}", self.owner_login(), self.name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitContribution {
    pub repository: Repository,
    pub contributions: TotalCount,
}

impl CommitContribution {
    pub fn commits(&self) -> u64 {
        self.contributions.total_count
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepositoryConnection {
    pub total_count: u64,
    #[serde(default)]
    pub nodes: Vec<Repository>,
}

/// Identity snapshot of the subject user.
#[derive(Debug, Clone)]
pub struct UserIdentity {
    pub login: String,
    pub name: Option<String>,
    pub avatar_url: String,
    pub bio: Option<String>,
    pub created_at: DateTime<Utc>,
    pub followers: u64,
    pub following: u64,
}

/// A fully materialised upstream record with every required section present.
#[derive(Debug, Clone)]
pub struct ActivityPayload {
    pub user: UserIdentity,
    pub contributions: ContributionsCollection,
    pub repositories: RepositoryConnection,
}

impl ContributionsResponse {
    /// Checks the top-level structure before any aggregation runs.
    pub fn into_payload(self, requested_login: &str) -> Result<ActivityPayload> {
        let user = self
            .user
            .ok_or_else(|| Error::UserNotFound(requested_login.to_string()))?;

        let contributions = user.contributions_collection.ok_or_else(|| {
            Error::InvalidResponse("missing contributionsCollection".to_string())
        })?;
        let repositories = user
            .repositories
            .ok_or_else(|| Error::InvalidResponse("missing repositories".to_string()))?;

        Ok(ActivityPayload {
            user: UserIdentity {
                login: user.login,
                name: user.name,
                avatar_url: user.avatar_url,
                bio: user.bio,
                created_at: user.created_at,
                followers: user.followers.total_count,
                following: user.following.total_count,
            },
            contributions,
            repositories,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn user_json() -> serde_json::Value {
        json!({
            "login": "octocat",
            "name": "The Octocat",
            "avatarUrl": "https://avatars.example/octocat",
            "bio": null,
            "createdAt": "2011-01-25T18:44:36Z",
            "followers": { "totalCount": 12 },
            "following": { "totalCount": 3 },
            "contributionsCollection": {
                "totalCommitContributions": 40,
                "totalPullRequestContributions": 4,
                "totalIssueContributions": 1,
                "totalPullRequestReviewContributions": 2,
                "totalRepositoriesWithContributedCommits": 1,
                "restrictedContributionsCount": 5,
                "contributionCalendar": {
                    "totalContributions": 45,
                    "weeks": [{ "contributionDays": [
                        { "date": "2024-01-01", "contributionCount": 3, "weekday": 1 }
                    ]}]
                },
                "commitContributionsByRepository": [{
                    "repository": {
                        "name": "hello-world",
                        "owner": { "login": "octocat" },
                        "primaryLanguage": { "name": "Rust", "color": "#dea584" },
                        "stargazerCount": 7,
                        "isPrivate": false
                    },
                    "contributions": { "totalCount": 40 }
                }]
            },
            "repositories": {
                "totalCount": 1,
                "nodes": [{
                    "name": "hello-world",
                    "primaryLanguage": null,
                    "isPrivate": false,
                    "languages": { "edges": [] }
                }]
            }
        })
    }

    #[test]
    fn test_deserialize_graphql_shape() {
        let response: ContributionsResponse =
            serde_json::from_value(json!({ "user": user_json() })).unwrap();
        let payload = response.into_payload("octocat").unwrap();

        assert_eq!(payload.user.followers, 12);
        assert_eq!(payload.contributions.restricted_contributions_count, 5);
        let day = &payload.contributions.contribution_calendar.weeks[0].contribution_days[0];
        assert_eq!(day.date, NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
        assert!(day.is_active());

        let contrib = &payload.contributions.commit_contributions_by_repository[0];
        assert_eq!(contrib.repository.full_name(), "octocat/hello-world");
        assert_eq!(contrib.commits(), 40);
    }

    #[test]
    fn test_owned_repo_without_owner_uses_placeholder() {
        let response: ContributionsResponse =
            serde_json::from_value(json!({ "user": user_json() })).unwrap();
        let payload = response.into_payload("octocat").unwrap();
        let node = &payload.repositories.nodes[0];
        assert_eq!(node.full_name(), "unknown/hello-world");
        assert_eq!(node.stargazer_count, 0);
    }

    #[test]
    fn test_missing_user_is_not_found() {
        let response: ContributionsResponse = serde_json::from_value(json!({ "user": null })).unwrap();
        let err = response.into_payload("ghost").unwrap_err();
        assert!(matches!(err, Error::UserNotFound(login) if login == "ghost"));
    }

    #[test]
    fn test_missing_collection_is_invalid_response() {
        let mut user = user_json();
        user["contributionsCollection"] = serde_json::Value::Null;
        let response: ContributionsResponse =
            serde_json::from_value(json!({ "user": user })).unwrap();
        let err = response.into_payload("octocat").unwrap_err();
        assert!(matches!(err, Error::InvalidResponse(_)));
    }
}
