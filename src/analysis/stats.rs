use super::calendar::count_active_days;
use super::repositories::{OwnedRepoCounts, StarAggregate};
use super::streaks::StreakSummary;
use crate::models::{ActivityDay, ContributionsCollection, UserIdentity, WrappedStatistics};

/// Field mapping only; every derived input is computed upstream.
pub fn compose_stats(
    contributions: &ContributionsCollection,
    calendar: &[ActivityDay],
    streaks: StreakSummary,
    user: &UserIdentity,
    owned: OwnedRepoCounts,
    stars: StarAggregate,
) -> WrappedStatistics {
    let active_days = count_active_days(calendar);
    let idle_days = calendar.len() as u64 - active_days;

    let public_commits = contributions.total_commit_contributions;
    // Restricted contributions stand in for private-repository commits.
    let private_commits = contributions.restricted_contributions_count;

    WrappedStatistics {
        total_commits: public_commits + private_commits,
        public_commits,
        private_commits,
        total_prs: contributions.total_pull_request_contributions,
        total_issues: contributions.total_issue_contributions,
        total_reviews: contributions.total_pull_request_review_contributions,
        active_days,
        idle_days,
        longest_streak: streaks.longest,
        current_streak: streaks.current,
        total_repos_contributed: contributions.total_repositories_with_contributed_commits,
        followers: user.followers,
        following: user.following,
        total_repos_owned: owned.total,
        public_repos_owned: owned.public,
        private_repos_owned: owned.private,
        total_stars: stars.total_stars,
        average_stars_per_repo: stars.average_stars_per_repo,
        most_starred_repo: stars.most_starred,
    }
}
