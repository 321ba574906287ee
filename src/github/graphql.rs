use chrono::{TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

pub const CONTRIBUTIONS_QUERY: &str = r#"
query GetUserContributions($username: String!, $from: DateTime!, $to: DateTime!, $maxRepositories: Int!) {
  user(login: $username) {
    login
    name
    avatarUrl
    bio
    createdAt
    followers { totalCount }
    following { totalCount }
    contributionsCollection(from: $from, to: $to) {
      totalCommitContributions
      totalPullRequestContributions
      totalIssueContributions
      totalPullRequestReviewContributions
      totalRepositoriesWithContributedCommits
      restrictedContributionsCount
      contributionCalendar {
        totalContributions
        weeks {
          contributionDays { date contributionCount weekday }
        }
      }
      commitContributionsByRepository(maxRepositories: $maxRepositories) {
        repository {
          name
          owner { login }
          primaryLanguage { name color }
          stargazerCount
          isPrivate
        }
        contributions { totalCount }
      }
    }
    repositories(first: $maxRepositories, ownerAffiliations: OWNER, orderBy: {field: PUSHED_AT, direction: DESC}) {
      totalCount
      nodes {
        name
        owner { login }
        primaryLanguage { name color }
        stargazerCount
        isPrivate
        languages(first: 10, orderBy: {field: SIZE, direction: DESC}) {
          edges {
            size
            node { name color }
          }
        }
      }
    }
  }
}
"#;

/// `from`/`to` bounds covering the whole calendar year in UTC.
pub fn build_date_range(year: i32) -> Result<(String, String)> {
    let from = Utc
        .with_ymd_and_hms(year, 1, 1, 0, 0, 0)
        .single()
        .ok_or(Error::InvalidYear(year))?;
    let to = Utc
        .with_ymd_and_hms(year, 12, 31, 23, 59, 59)
        .single()
        .ok_or(Error::InvalidYear(year))?;

    Ok((
        from.format("%Y-%m-%dT%H:%M:%SZ").to_string(),
        to.format("%Y-%m-%dT%H:%M:%SZ").to_string(),
    ))
}

#[derive(Debug, Serialize)]
pub struct GraphQlRequest<'a> {
    pub query: &'a str,
    pub variables: serde_json::Value,
}

#[derive(Debug, Deserialize)]
pub struct GraphQlResponse<T> {
    pub data: Option<T>,
    #[serde(default)]
    pub errors: Vec<GraphQlError>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GraphQlError {
    pub message: String,
    #[serde(rename = "type")]
    pub error_type: Option<String>,
}

impl GraphQlError {
    fn is_auth(&self) -> bool {
        let message = self.message.to_lowercase();
        message.contains("401")
            || message.contains("bad credentials")
            || message.contains("authentication")
    }

    fn is_rate_limit(&self) -> bool {
        self.error_type.as_deref() == Some("RATE_LIMITED")
            || self.message.to_lowercase().contains("rate limit")
    }

    fn is_not_found(&self) -> bool {
        self.error_type.as_deref() == Some("NOT_FOUND")
    }
}

impl<T> GraphQlResponse<T> {
    /// Any reported error fails the request.
    pub fn into_result(self, username: &str) -> Result<T> {
        if !self.errors.is_empty() {
            return Err(classify_errors(&self.errors, username));
        }
        self.data
            .ok_or_else(|| Error::InvalidResponse("GraphQL response carried no data".to_string()))
    }
}

pub fn classify_errors(errors: &[GraphQlError], username: &str) -> Error {
    if errors.iter().any(GraphQlError::is_auth) {
        return Error::AuthFailed(joined_messages(errors));
    }
    if errors.iter().any(GraphQlError::is_rate_limit) {
        return Error::RateLimited(60);
    }
    if errors.iter().any(GraphQlError::is_not_found) {
        return Error::UserNotFound(username.to_string());
    }
    Error::GitHubApi(joined_messages(errors))
}

fn joined_messages(errors: &[GraphQlError]) -> String {
    errors
        .iter()
        .map(|e| e.message.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn errors(value: serde_json::Value) -> Vec<GraphQlError> {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_date_range_spans_the_year() {
        let (from, to) = build_date_range(2024).unwrap();
        assert_eq!(from, "2024-01-01T00:00:00Z");
        assert_eq!(to, "2024-12-31T23:59:59Z");
    }

    #[test]
    fn test_classify_not_found() {
        let errs = errors(json!([{
            "type": "NOT_FOUND",
            "message": "Could not resolve to a User with the login of 'nobody'."
        }]));
        assert!(matches!(classify_errors(&errs, "nobody"), Error::UserNotFound(u) if u == "nobody"));
    }

    #[test]
    fn test_classify_auth_and_rate_limit() {
        let auth = errors(json!([{ "message": "Bad credentials" }]));
        assert!(classify_errors(&auth, "octocat").is_auth_failure());

        let limited = errors(json!([{ "type": "RATE_LIMITED", "message": "API rate limit exceeded" }]));
        assert!(matches!(classify_errors(&limited, "octocat"), Error::RateLimited(_)));
    }

    #[test]
    fn test_other_errors_are_joined() {
        let errs = errors(json!([{ "message": "first" }, { "message": "second" }]));
        match classify_errors(&errs, "octocat") {
            Error::GitHubApi(msg) => assert_eq!(msg, "first, second"),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_into_result_requires_data() {
        let response: GraphQlResponse<serde_json::Value> =
            serde_json::from_value(json!({ "data": null })).unwrap();
        assert!(matches!(response.into_result("octocat"), Err(Error::InvalidResponse(_))));

        let response: GraphQlResponse<serde_json::Value> =
            serde_json::from_value(json!({ "data": { "user": null } })).unwrap();
        assert!(response.into_result("octocat").is_ok());
    }
}
