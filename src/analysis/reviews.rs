use std::collections::HashMap;

use super::round_to_tenth;
use crate::models::{CommitContribution, ReviewStats};

/// Review ratio plus a "most reviewed" repository.
///
/// The upstream schema has no per-repository review breakdown, so the
/// repository with the most commits is reported in its place. This is an
/// approximation inherited from data availability.
pub fn calculate_review_stats(
    total_reviews: u64,
    total_prs: u64,
    contributions: &[CommitContribution],
) -> ReviewStats {
    let reviews_per_pr = if total_prs > 0 {
        round_to_tenth(total_reviews as f64 / total_prs as f64)
    } else {
        0.0
    };

    ReviewStats {
        total_reviews,
        reviews_per_pr,
        most_reviewed_repo: most_committed_repository(contributions),
    }
}

fn most_committed_repository(contributions: &[CommitContribution]) -> Option<String> {
    let mut order: Vec<String> = Vec::new();
    let mut totals: HashMap<String, u64> = HashMap::new();
    for contrib in contributions {
        let name = contrib.repository.full_name();
        let total = totals.entry(name.clone()).or_insert_with(|| {
            order.push(name);
            0
        });
        *total += contrib.commits();
    }

    let mut best: Option<String> = None;
    let mut max_count = 0;
    for name in order {
        let count = totals[&name];
        if count > max_count {
            max_count = count;
            best = Some(name);
        }
    }
    best
}
