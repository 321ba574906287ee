//! Retrieval through the REST API, usable without a token.
//!
//! The REST API has no contributions calendar, so one is synthesized from a
//! sample of commits: the first page of commit search results, or the
//! public event feed when search is unavailable. Reviews and restricted
//! contributions are not visible here and are reported as zero.

use async_trait::async_trait;
use chrono::{Datelike, NaiveDate};
use futures::future::join_all;
use indicatif::{ProgressBar, ProgressStyle};
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use tokio::sync::Semaphore;

use super::ActivitySource;
use crate::config::PipelineConfig;
use crate::error::{Error, Result};
use crate::github::GitHubClient;
use crate::models::{
    ActivityDay, CommitContribution, CommitSearchResponse, ContributionCalendar,
    ContributionWeek, ContributionsCollection, ContributionsResponse, LanguageConnection,
    LanguageEdge, LanguageNode, PublicEvent, Repository, RepositoryConnection, RepositoryOwner,
    RestRepository, TotalCount, UserActivity,
};

const LANGUAGE_EDGE_LIMIT: usize = 10;

pub struct RestSource {
    client: Arc<GitHubClient>,
    config: PipelineConfig,
}

/// Commit distribution and headline counts gathered for one year.
#[derive(Debug, Default, Clone, PartialEq)]
struct ActivitySample {
    commits_by_date: BTreeMap<NaiveDate, u64>,
    commits_by_repo: BTreeMap<String, u64>,
    total_commits: u64,
    total_prs: u64,
    total_issues: u64,
}

impl ActivitySample {
    fn record_commits(&mut self, date: NaiveDate, repo: &str, count: u64) {
        *self.commits_by_date.entry(date).or_insert(0) += count;
        *self.commits_by_repo.entry(repo.to_string()).or_insert(0) += count;
    }

    fn from_search(commits: &CommitSearchResponse, total_prs: u64, total_issues: u64) -> Self {
        let mut sample = Self {
            total_commits: commits.total_count,
            total_prs,
            total_issues,
            ..Self::default()
        };

        for item in &commits.items {
            sample.record_commits(
                item.commit.author.date.date_naive(),
                &item.repository.full_name,
                1,
            );
        }

        if commits.total_count > commits.items.len() as u64 {
            tracing::warn!(
                "{} commits found, date and repository breakdown uses a sample of {}",
                commits.total_count,
                commits.items.len()
            );
        }

        sample
    }

    fn from_events(events: &[PublicEvent], year: i32) -> Self {
        let mut sample = Self::default();

        for event in events.iter().filter(|e| e.created_at.year() == year) {
            match event.event_type.as_str() {
                "PushEvent" => {
                    let commits = event.pushed_commits();
                    sample.total_commits += commits;
                    sample.record_commits(event.created_at.date_naive(), &event.repo.name, commits);
                }
                "PullRequestEvent" => sample.total_prs += 1,
                "IssuesEvent" => sample.total_issues += 1,
                _ => {}
            }
        }

        sample
    }
}

impl RestSource {
    pub fn new(client: Arc<GitHubClient>, config: PipelineConfig) -> Self {
        Self { client, config }
    }

    /// Search first, then the public event feed. When both fail, a rate
    /// limit or rejected token is returned; other failures yield an empty
    /// sample.
    async fn sample_activity(&self, username: &str, year: i32) -> Result<ActivitySample> {
        let search_error = match self.search_activity(username, year).await {
            Ok(sample) => return Ok(sample),
            Err(e) => e,
        };
        tracing::warn!("Search API failed ({}), using the public event feed", search_error);

        match self.client.get_public_events(username).await {
            Ok(events) => Ok(ActivitySample::from_events(&events, year)),
            Err(e) if matches!(e, Error::RateLimited(_)) || e.is_auth_failure() => Err(e),
            Err(e) => {
                tracing::warn!("Public event feed failed as well: {}", e);
                Ok(ActivitySample::default())
            }
        }
    }

    /// Per-repository lookups cost one core request each, which the
    /// unauthenticated quota (60 per hour) cannot afford.
    fn wants_languages(&self) -> bool {
        self.config.fetch_repo_languages && self.client.is_authenticated()
    }

    async fn search_activity(&self, username: &str, year: i32) -> Result<ActivitySample> {
        let commits = self.client.search_commits(username, year).await?;
        let prs = self.client.search_issue_count(username, "pr", year).await?;
        let issues = self.client.search_issue_count(username, "issue", year).await?;
        Ok(ActivitySample::from_search(&commits, prs, issues))
    }

    async fn fetch_languages(&self, repos: &[RestRepository]) -> Vec<Option<LanguageConnection>> {
        let semaphore = Arc::new(Semaphore::new(self.config.concurrency_limit));

        let pb = ProgressBar::new(repos.len() as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} repos")
                .map(|style| style.progress_chars("#>-"))
                .unwrap_or_else(|_| ProgressStyle::default_bar()),
        );

        let lookups = repos.iter().map(|repo| {
            let client = self.client.clone();
            let sem = semaphore.clone();
            let pb = pb.clone();
            let owner = repo.owner.login.clone();
            let name = repo.name.clone();
            // Only the primary language's size is ever read.
            let wanted = repo.language.is_some();

            async move {
                let mut connection = None;
                if wanted {
                    let _permit = sem.acquire().await.ok();
                    match client.get_repo_languages(&owner, &name).await {
                        Ok(sizes) => connection = Some(language_connection(sizes)),
                        Err(e) => tracing::debug!("Skipping languages for {}/{}: {}", owner, name, e),
                    }
                }
                pb.inc(1);
                connection
            }
        });

        let results = join_all(lookups).await;
        pb.finish_with_message("Fetched repository languages");
        results
    }
}

#[async_trait]
impl ActivitySource for RestSource {
    async fn fetch_activity(&self, username: &str, year: i32) -> Result<ContributionsResponse> {
        tracing::info!("Fetching {} activity for {} via REST", year, username);

        let user = self.client.get_user(username).await?;
        let sample = self.sample_activity(username, year).await?;

        let repos = self.client.get_user_repos(username).await?;
        let accessible: Vec<RestRepository> = if self.client.is_authenticated() {
            repos
        } else {
            repos.into_iter().filter(|r| !r.private).collect()
        };

        let max_repositories = self.config.max_repositories as usize;
        let contributions =
            commit_contributions(&sample.commits_by_repo, &accessible, max_repositories);
        let weeks = group_into_weeks(build_calendar(&sample.commits_by_date, year)?);

        let listed = &accessible[..accessible.len().min(max_repositories)];
        let languages = if self.wants_languages() {
            self.fetch_languages(listed).await
        } else {
            if self.config.fetch_repo_languages {
                tracing::info!("Skipping repository language lookups without a token");
            }
            vec![None; listed.len()]
        };
        let nodes = listed
            .iter()
            .zip(languages)
            .map(|(repo, languages)| to_repository(repo, languages))
            .collect();

        tracing::debug!(
            commits = sample.total_commits,
            repos = accessible.len(),
            contributed = contributions.len(),
            "Assembled REST activity"
        );

        Ok(ContributionsResponse {
            user: Some(UserActivity {
                login: user.login,
                name: user.name,
                avatar_url: user.avatar_url,
                bio: user.bio,
                created_at: user.created_at,
                followers: TotalCount { total_count: user.followers },
                following: TotalCount { total_count: user.following },
                contributions_collection: Some(ContributionsCollection {
                    total_commit_contributions: sample.total_commits,
                    total_pull_request_contributions: sample.total_prs,
                    total_issue_contributions: sample.total_issues,
                    total_pull_request_review_contributions: 0,
                    total_repositories_with_contributed_commits: contributions.len() as u64,
                    restricted_contributions_count: 0,
                    contribution_calendar: ContributionCalendar {
                        total_contributions: sample.total_commits,
                        weeks,
                    },
                    commit_contributions_by_repository: contributions,
                }),
                repositories: Some(RepositoryConnection {
                    total_count: accessible.len() as u64,
                    nodes,
                }),
            }),
        })
    }

    fn name(&self) -> &str {
        "rest"
    }
}

/// Every date of `year`, zero-filled where the sample has no commits.
fn build_calendar(commits_by_date: &BTreeMap<NaiveDate, u64>, year: i32) -> Result<Vec<ActivityDay>> {
    let start = NaiveDate::from_ymd_opt(year, 1, 1).ok_or(Error::InvalidYear(year))?;
    let end = NaiveDate::from_ymd_opt(year, 12, 31).ok_or(Error::InvalidYear(year))?;

    Ok(start
        .iter_days()
        .take_while(|date| *date <= end)
        .map(|date| ActivityDay {
            date,
            contribution_count: commits_by_date.get(&date).copied().unwrap_or(0),
            weekday: date.weekday().num_days_from_sunday() as u8,
        })
        .collect())
}

/// A week closes after Saturday or once it holds seven days.
fn group_into_weeks(days: Vec<ActivityDay>) -> Vec<ContributionWeek> {
    let mut weeks = Vec::new();
    let mut current = Vec::with_capacity(7);

    for day in days {
        let closes = day.weekday == 6;
        current.push(day);
        if closes || current.len() == 7 {
            weeks.push(ContributionWeek {
                contribution_days: std::mem::take(&mut current),
            });
        }
    }
    if !current.is_empty() {
        weeks.push(ContributionWeek {
            contribution_days: current,
        });
    }

    weeks
}

/// Sampled commits per accessible repository, busiest first.
fn commit_contributions(
    commits_by_repo: &BTreeMap<String, u64>,
    repos: &[RestRepository],
    limit: usize,
) -> Vec<CommitContribution> {
    let by_name: HashMap<&str, &RestRepository> =
        repos.iter().map(|r| (r.full_name.as_str(), r)).collect();

    let mut contributions: Vec<CommitContribution> = commits_by_repo
        .iter()
        .filter(|(_, count)| **count > 0)
        .filter_map(|(name, count)| {
            by_name.get(name.as_str()).map(|repo| CommitContribution {
                repository: to_repository(repo, None),
                contributions: TotalCount { total_count: *count },
            })
        })
        .collect();

    contributions.sort_by(|a, b| b.commits().cmp(&a.commits()));
    contributions.truncate(limit);
    contributions
}

fn to_repository(repo: &RestRepository, languages: Option<LanguageConnection>) -> Repository {
    Repository {
        name: repo.name.clone(),
        owner: Some(RepositoryOwner {
            login: repo.owner.login.clone(),
        }),
        primary_language: repo.language.as_ref().map(|name| LanguageNode {
            name: name.clone(),
            color: None,
        }),
        stargazer_count: repo.stargazers_count,
        is_private: repo.private,
        languages,
    }
}

/// Largest languages first, ties by name.
fn language_connection(sizes: HashMap<String, u64>) -> LanguageConnection {
    let mut edges: Vec<LanguageEdge> = sizes
        .into_iter()
        .map(|(name, size)| LanguageEdge {
            size,
            node: LanguageNode { name, color: None },
        })
        .collect();
    edges.sort_by(|a, b| b.size.cmp(&a.size).then_with(|| a.node.name.cmp(&b.node.name)));
    edges.truncate(LANGUAGE_EDGE_LIMIT);

    LanguageConnection { edges }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::calendar::fixtures::date;
    use crate::source::fixtures::{repos_json, serve, user_json, Reply};
    use serde_json::json;

    fn rest_repo(owner: &str, name: &str, language: Option<&str>) -> RestRepository {
        serde_json::from_value(json!({
            "name": name,
            "full_name": format!("{}/{}", owner, name),
            "language": language,
            "stargazers_count": 4,
            "private": false,
            "owner": { "login": owner }
        }))
        .unwrap()
    }

    #[test]
    fn test_calendar_covers_leap_year() {
        let mut commits = BTreeMap::new();
        commits.insert(date(2024, 2, 29), 3);

        let calendar = build_calendar(&commits, 2024).unwrap();
        assert_eq!(calendar.len(), 366);
        assert_eq!(calendar[0].date, date(2024, 1, 1));
        // 2024-01-01 was a Monday
        assert_eq!(calendar[0].weekday, 1);
        assert_eq!(calendar[59].date, date(2024, 2, 29));
        assert_eq!(calendar[59].contribution_count, 3);
        assert_eq!(calendar.iter().map(|d| d.contribution_count).sum::<u64>(), 3);
    }

    #[test]
    fn test_weeks_close_on_saturday() {
        let weeks = group_into_weeks(build_calendar(&BTreeMap::new(), 2024).unwrap());

        // Monday Jan 1 .. Saturday Jan 6
        assert_eq!(weeks[0].contribution_days.len(), 6);
        assert_eq!(weeks[1].contribution_days.len(), 7);
        assert_eq!(weeks[1].contribution_days[0].weekday, 0);
        assert!(weeks.iter().all(|w| w.contribution_days.len() <= 7));
        assert_eq!(weeks.iter().map(|w| w.contribution_days.len()).sum::<usize>(), 366);
        // Tuesday Dec 31 ends a partial week.
        assert_eq!(weeks.last().unwrap().contribution_days.len(), 3);
    }

    #[test]
    fn test_search_sample_counts_per_day_and_repo() {
        let response: CommitSearchResponse = serde_json::from_value(json!({
            "total_count": 250,
            "items": [
                { "commit": { "author": { "date": "2024-03-02T23:30:00-05:00" } },
                  "repository": { "full_name": "octocat/hello" } },
                { "commit": { "author": { "date": "2024-03-02T08:00:00Z" } },
                  "repository": { "full_name": "octocat/hello" } },
                { "commit": { "author": { "date": "2024-03-04T08:00:00Z" } },
                  "repository": { "full_name": "octocat/other" } }
            ]
        }))
        .unwrap();

        let sample = ActivitySample::from_search(&response, 7, 2);
        assert_eq!(sample.total_commits, 250);
        assert_eq!(sample.total_prs, 7);
        assert_eq!(sample.total_issues, 2);
        // The author's local date is kept.
        assert_eq!(sample.commits_by_date[&date(2024, 3, 2)], 2);
        assert_eq!(sample.commits_by_repo["octocat/hello"], 2);
        assert_eq!(sample.commits_by_repo["octocat/other"], 1);
    }

    #[test]
    fn test_event_sample_filters_year() {
        let events: Vec<PublicEvent> = serde_json::from_value(json!([
            { "type": "PushEvent", "created_at": "2024-05-01T10:00:00Z",
              "repo": { "name": "octocat/hello" },
              "payload": { "commits": [{}, {}, {}] } },
            { "type": "PushEvent", "created_at": "2023-12-31T10:00:00Z",
              "repo": { "name": "octocat/hello" },
              "payload": { "commits": [{}] } },
            { "type": "PullRequestEvent", "created_at": "2024-05-02T10:00:00Z",
              "repo": { "name": "octocat/hello" } },
            { "type": "IssuesEvent", "created_at": "2024-05-03T10:00:00Z",
              "repo": { "name": "octocat/hello" } },
            { "type": "WatchEvent", "created_at": "2024-05-03T10:00:00Z",
              "repo": { "name": "octocat/hello" } }
        ]))
        .unwrap();

        let sample = ActivitySample::from_events(&events, 2024);
        assert_eq!(sample.total_commits, 3);
        assert_eq!(sample.total_prs, 1);
        assert_eq!(sample.total_issues, 1);
        assert_eq!(sample.commits_by_date.len(), 1);
        assert_eq!(sample.commits_by_date[&date(2024, 5, 1)], 3);
    }

    #[test]
    fn test_contributions_limited_to_known_repos() {
        let repos = vec![
            rest_repo("octocat", "hello", Some("Rust")),
            rest_repo("octocat", "other", None),
        ];
        let mut by_repo = BTreeMap::new();
        by_repo.insert("octocat/hello".to_string(), 2);
        by_repo.insert("octocat/other".to_string(), 5);
        by_repo.insert("someone/else".to_string(), 9);

        let contributions = commit_contributions(&by_repo, &repos, 100);
        assert_eq!(contributions.len(), 2);
        assert_eq!(contributions[0].repository.name, "other");
        assert_eq!(contributions[0].commits(), 5);
        assert_eq!(contributions[1].repository.primary_language.as_ref().unwrap().name, "Rust");

        assert_eq!(commit_contributions(&by_repo, &repos, 1).len(), 1);
    }

    #[test]
    fn test_language_connection_orders_by_size() {
        let mut sizes = HashMap::new();
        for (i, name) in ["A", "B", "C", "D", "E", "F", "G", "H", "I", "J", "K", "L"].iter().enumerate() {
            sizes.insert(name.to_string(), 100 + i as u64);
        }
        sizes.insert("Rust".to_string(), 5000);

        let connection = language_connection(sizes);
        assert_eq!(connection.edges.len(), LANGUAGE_EDGE_LIMIT);
        assert_eq!(connection.edges[0].node.name, "Rust");
        assert_eq!(connection.edges[1].node.name, "L");
        assert!(connection.edges.iter().all(|e| e.node.color.is_none()));
    }

    fn search_and_events_exhausted(path: &str, _authorized: bool) -> Reply {
        match path {
            "/users/octocat" => Reply::json(200, user_json("octocat")),
            p if p.starts_with("/search/") || p.ends_with("/events/public") => {
                Reply::json(403, json!({ "message": "API rate limit exceeded" }))
                    .with_header("retry-after", "30")
                    .with_header("x-ratelimit-remaining", "0")
            }
            _ => Reply::json(404, json!({ "message": "Not Found" })),
        }
    }

    fn events_unavailable(path: &str, _authorized: bool) -> Reply {
        match path {
            "/users/octocat" => Reply::json(200, user_json("octocat")),
            "/users/octocat/repos" => Reply::json(200, repos_json("octocat")),
            p if p.starts_with("/search/") => Reply::json(422, json!({ "message": "Validation Failed" })),
            _ => Reply::json(500, json!({ "message": "Server Error" })),
        }
    }

    #[tokio::test]
    async fn test_rate_limit_surfaces_when_events_fail_too() {
        let (base_url, hits) = serve(search_and_events_exhausted).await;
        let client = GitHubClient::new(None).unwrap().with_base_url(&base_url);
        let source = RestSource::new(Arc::new(client), PipelineConfig::default());

        let err = source.fetch_activity("octocat", 2024).await.unwrap_err();
        assert!(matches!(err, Error::RateLimited(30)), "{:?}", err);

        let hits = hits.lock().unwrap().clone();
        assert!(hits.iter().any(|h| h.path == "/users/octocat/events/public"));
        assert!(hits.iter().all(|h| h.path != "/users/octocat/repos"));
    }

    #[tokio::test]
    async fn test_other_failures_yield_an_empty_sample() {
        let (base_url, _hits) = serve(events_unavailable).await;
        let client = GitHubClient::new(None).unwrap().with_base_url(&base_url);
        let source = RestSource::new(Arc::new(client), PipelineConfig::default());

        let response = source.fetch_activity("octocat", 2024).await.unwrap();
        let collection = response.user.unwrap().contributions_collection.unwrap();
        assert_eq!(collection.total_commit_contributions, 0);
        assert_eq!(collection.contribution_calendar.weeks.len(), 53);
    }

    #[test]
    fn test_to_repository_maps_rest_fields() {
        let repo = to_repository(&rest_repo("octocat", "hello", Some("Go")), None);
        assert_eq!(repo.full_name(), "octocat/hello");
        assert_eq!(repo.stargazer_count, 4);
        assert!(!repo.is_private);
        assert!(repo.languages.is_none());
    }
}
