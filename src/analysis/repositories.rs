use std::collections::HashSet;

use super::round_to_tenth;
use crate::models::{
    CommitContribution, MostStarredRepo, Repository, RepositoryConnection, TopRepository,
    WrappedRepositories,
};

pub const TOP_REPOSITORY_COUNT: usize = 5;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OwnedRepoCounts {
    pub total: u64,
    pub public: u64,
    pub private: u64,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct StarAggregate {
    pub total_stars: u64,
    pub average_stars_per_repo: f64,
    pub most_starred: Option<MostStarredRepo>,
    pub distinct_repositories: usize,
}

/// Top repositories by commit count, drawn from commit contributions only.
pub fn rank_repositories(contributions: &[CommitContribution]) -> WrappedRepositories {
    let mut top: Vec<TopRepository> = contributions
        .iter()
        .map(|contrib| {
            let repo = &contrib.repository;
            TopRepository {
                name: repo.name.clone(),
                owner: repo.owner_login().to_string(),
                full_name: repo.full_name(),
                commits: contrib.commits(),
                language: repo.primary_language.as_ref().map(|l| l.name.clone()),
                language_color: repo.primary_language.as_ref().and_then(|l| l.color.clone()),
                stars: repo.stargazer_count,
                is_private: repo.is_private,
            }
        })
        .collect();

    // Stable: equal commit counts keep source order.
    top.sort_by(|a, b| b.commits.cmp(&a.commits));
    top.truncate(TOP_REPOSITORY_COUNT);

    WrappedRepositories {
        top,
        total_contributed: contributions.len(),
    }
}

/// `total` is the source's count, which can exceed the nodes returned;
/// private is whatever remains after the visible public nodes.
pub fn owned_repo_counts(owned: &RepositoryConnection) -> OwnedRepoCounts {
    let public = owned.nodes.iter().filter(|r| !r.is_private).count() as u64;
    OwnedRepoCounts {
        total: owned.total_count,
        public,
        private: owned.total_count.saturating_sub(public),
    }
}

/// Union of contributed and owned repositories, deduplicated by full name
/// with the first occurrence kept.
pub fn known_repositories<'a>(
    contributions: &'a [CommitContribution],
    owned: &'a [Repository],
) -> Vec<&'a Repository> {
    let mut seen = HashSet::new();
    contributions
        .iter()
        .map(|c| &c.repository)
        .chain(owned.iter())
        .filter(|repo| seen.insert(repo.full_name()))
        .collect()
}

pub fn star_aggregate(contributions: &[CommitContribution], owned: &[Repository]) -> StarAggregate {
    let repos = known_repositories(contributions, owned);

    let total_stars: u64 = repos.iter().map(|r| r.stargazer_count).sum();
    let average_stars_per_repo = if repos.is_empty() {
        0.0
    } else {
        round_to_tenth(total_stars as f64 / repos.len() as f64)
    };

    let mut most_starred: Option<MostStarredRepo> = None;
    let mut max_stars = 0;
    for repo in &repos {
        if repo.stargazer_count > max_stars {
            max_stars = repo.stargazer_count;
            most_starred = Some(MostStarredRepo {
                name: repo.name.clone(),
                owner: repo.owner_login().to_string(),
                stars: repo.stargazer_count,
            });
        }
    }

    StarAggregate {
        total_stars,
        average_stars_per_repo,
        most_starred,
        distinct_repositories: repos.len(),
    }
}
