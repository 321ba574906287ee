use chrono::{DateTime, Datelike, Utc};

use super::calendar::flatten_calendar;
use super::highlights::calculate_highlights;
use super::languages::aggregate_languages;
use super::personality::classify;
use super::repositories::{owned_repo_counts, rank_repositories, star_aggregate};
use super::reviews::calculate_review_stats;
use super::stats::compose_stats;
use super::streaks::calculate_streaks;
use crate::models::{ActivityPayload, WrappedSummary, WrappedUser};

/// Runs every aggregation over an already-validated payload.
///
/// `now` fixes "today" for the current streak and stamps `generated_at`;
/// everything else is a pure function of the payload, so two runs over the
/// same input differ only in that timestamp.
pub fn compose_wrapped(payload: &ActivityPayload, year: i32, now: DateTime<Utc>) -> WrappedSummary {
    let contributions = &payload.contributions;
    let commit_contributions = &contributions.commit_contributions_by_repository;
    let owned = &payload.repositories;

    let calendar = flatten_calendar(&contributions.contribution_calendar);
    let streaks = calculate_streaks(&calendar, now.date_naive());
    let highlights = calculate_highlights(&calendar);

    let repositories = rank_repositories(commit_contributions);
    let languages = aggregate_languages(commit_contributions, &owned.nodes);
    let review_stats = calculate_review_stats(
        contributions.total_pull_request_review_contributions,
        contributions.total_pull_request_contributions,
        commit_contributions,
    );

    let stats = compose_stats(
        contributions,
        &calendar,
        streaks,
        &payload.user,
        owned_repo_counts(owned),
        star_aggregate(commit_contributions, &owned.nodes),
    );

    let personality = classify(&stats, &highlights, &languages, &repositories);

    tracing::debug!(
        days = calendar.len(),
        total_commits = stats.total_commits,
        longest_streak = stats.longest_streak,
        primary_language = %languages.primary,
        "Composed wrapped summary"
    );

    WrappedSummary {
        user: WrappedUser {
            username: payload.user.login.clone(),
            name: payload.user.name.clone(),
            avatar_url: payload.user.avatar_url.clone(),
            member_since: payload.user.created_at.year().to_string(),
            bio: payload.user.bio.clone(),
        },
        year,
        stats,
        highlights,
        repositories,
        languages,
        personality,
        calendar,
        review_stats,
        generated_at: now,
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use chrono::{NaiveDate, TimeZone, Utc};

    use crate::analysis::calendar::fixtures::days_from;
    use crate::analysis::repositories::fixtures::{contribution, repo};
    use crate::models::{
        ActivityPayload, ContributionCalendar, ContributionWeek, ContributionsCollection,
        RepositoryConnection, UserIdentity,
    };

    /// Ten days in March 2024: five active, two idle, three active.
    pub fn payload() -> ActivityPayload {
        let days = days_from(
            NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            &[1, 2, 1, 4, 1, 0, 0, 3, 1, 2],
        );
        let weeks = days
            .chunks(7)
            .map(|chunk| ContributionWeek {
                contribution_days: chunk.to_vec(),
            })
            .collect();

        let mut private = repo("octocat", "secret", Some("Go"), 0);
        private.is_private = true;

        ActivityPayload {
            user: UserIdentity {
                login: "octocat".to_string(),
                name: Some("The Octocat".to_string()),
                avatar_url: "https://avatars.example/octocat".to_string(),
                bio: None,
                created_at: Utc.with_ymd_and_hms(2011, 1, 25, 18, 44, 36).unwrap(),
                followers: 20,
                following: 4,
            },
            contributions: ContributionsCollection {
                total_commit_contributions: 15,
                total_pull_request_contributions: 4,
                total_issue_contributions: 2,
                total_pull_request_review_contributions: 6,
                total_repositories_with_contributed_commits: 2,
                restricted_contributions_count: 3,
                contribution_calendar: ContributionCalendar {
                    total_contributions: 18,
                    weeks,
                },
                commit_contributions_by_repository: vec![
                    contribution(repo("octocat", "spoon-knife", Some("Rust"), 12), 10),
                    contribution(repo("github", "linguist", Some("Ruby"), 300), 5),
                ],
            },
            repositories: RepositoryConnection {
                total_count: 3,
                nodes: vec![
                    repo("octocat", "spoon-knife", Some("Rust"), 12),
                    repo("octocat", "dotfiles", Some("Shell"), 1),
                    private,
                ],
            },
        }
    }

    pub fn now() -> chrono::DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 10, 18, 0, 0).unwrap()
    }
}
