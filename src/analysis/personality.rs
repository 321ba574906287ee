//! Rule-based personality classification.
//!
//! Each badge is a predicate over the composed statistics. Every matching
//! badge is collected in rule order; one is promoted to primary by a fixed
//! priority list and up to four of the rest are kept as secondary badges.

use crate::models::{
    BadgeId, PersonalityResult, WrappedHighlights, WrappedLanguages, WrappedRepositories,
    WrappedStatistics,
};
use crate::taxonomy::catalog;

pub const MAX_SECONDARY_BADGES: usize = 4;

/// Everything the badge predicates may look at.
#[derive(Debug, Clone, Copy)]
pub struct BadgeContext<'a> {
    pub stats: &'a WrappedStatistics,
    pub highlights: &'a WrappedHighlights,
    pub languages: &'a WrappedLanguages,
    pub repos: &'a WrappedRepositories,
}

impl BadgeContext<'_> {
    /// Fraction of all weekday-bucketed commits that `count` represents.
    fn share(&self, count: u64) -> f64 {
        let total = self.highlights.commits_by_day_of_week.total();
        if total == 0 {
            return 0.0;
        }
        count as f64 / total as f64
    }

    fn weekend_share(&self) -> f64 {
        let by_day = &self.highlights.commits_by_day_of_week;
        self.share(by_day.get("Saturday") + by_day.get("Sunday"))
    }

    fn favours_day(&self, day: &str) -> bool {
        self.share(self.highlights.commits_by_day_of_week.get(day)) > 0.2
            && self.highlights.most_productive_day == day
    }
}

type BadgeRule = (BadgeId, fn(&BadgeContext) -> bool);

/// Evaluation order; also the order secondary badges are reported in.
const RULES: &[BadgeRule] = &[
    (BadgeId::WeekendWarrior, |c| c.weekend_share() > 0.3),
    (BadgeId::StreakMaster, |c| c.stats.longest_streak > 14),
    (BadgeId::Polyglot, |c| c.languages.total >= 5),
    (BadgeId::PrMachine, |c| c.stats.total_prs >= 30),
    (BadgeId::CodeReviewer, |c| c.stats.total_reviews >= 20),
    (BadgeId::IssueHunter, |c| c.stats.total_issues >= 20),
    (BadgeId::ConsistentCoder, |c| c.stats.active_days >= 150),
    (BadgeId::ProlificPusher, |c| c.stats.total_commits >= 500),
    (BadgeId::OpenSourceHero, |c| c.stats.total_repos_contributed >= 10),
    (BadgeId::MondayMotivator, |c| c.favours_day("Monday")),
    (BadgeId::FridayFinisher, |c| c.favours_day("Friday")),
];

const PRIMARY_PRIORITY: [BadgeId; 11] = [
    BadgeId::WeekendWarrior,
    BadgeId::StreakMaster,
    BadgeId::ProlificPusher,
    BadgeId::Polyglot,
    BadgeId::PrMachine,
    BadgeId::OpenSourceHero,
    BadgeId::CodeReviewer,
    BadgeId::ConsistentCoder,
    BadgeId::IssueHunter,
    BadgeId::MondayMotivator,
    BadgeId::FridayFinisher,
];

pub fn matched_badges(ctx: &BadgeContext) -> Vec<BadgeId> {
    RULES
        .iter()
        .filter(|(_, predicate)| predicate(ctx))
        .map(|(id, _)| *id)
        .collect()
}

pub fn classify(
    stats: &WrappedStatistics,
    highlights: &WrappedHighlights,
    languages: &WrappedLanguages,
    repos: &WrappedRepositories,
) -> PersonalityResult {
    let ctx = BadgeContext {
        stats,
        highlights,
        languages,
        repos,
    };
    let matched = matched_badges(&ctx);

    let primary = match matched.first() {
        None => default_persona(stats),
        Some(&first) => PRIMARY_PRIORITY
            .iter()
            .copied()
            .find(|id| matched.contains(id))
            .unwrap_or(first),
    };

    let badges = matched
        .iter()
        .filter(|id| **id != primary)
        .take(MAX_SECONDARY_BADGES)
        .map(|id| catalog().get(*id).clone())
        .collect();

    tracing::debug!(?primary, ?matched, "Classified personality");

    PersonalityResult {
        primary: catalog().get(primary).clone(),
        badges,
    }
}

/// Used when no badge predicate holds.
fn default_persona(stats: &WrappedStatistics) -> BadgeId {
    if stats.total_commits >= 100 {
        BadgeId::ConsistentCoder
    } else if stats.total_prs >= 10 {
        BadgeId::Collaborator
    } else {
        BadgeId::SoloArtist
    }
}
