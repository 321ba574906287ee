use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::contributions::ActivityDay;
use super::personality::PersonalityResult;

/// Weekday names, Sunday first, matching the calendar's `weekday` numbering.
pub const WEEKDAY_NAMES: [&str; 7] = [
    "Sunday",
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WrappedUser {
    pub username: String,
    pub name: Option<String>,
    pub avatar_url: String,
    pub member_since: String,
    pub bio: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MostStarredRepo {
    pub name: String,
    pub owner: String,
    pub stars: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WrappedStatistics {
    pub total_commits: u64,
    pub public_commits: u64,
    pub private_commits: u64,
    #[serde(rename = "totalPRs")]
    pub total_prs: u64,
    pub total_issues: u64,
    pub total_reviews: u64,
    pub active_days: u64,
    pub idle_days: u64,
    pub longest_streak: u64,
    pub current_streak: u64,
    pub total_repos_contributed: u64,
    pub followers: u64,
    pub following: u64,
    pub total_repos_owned: u64,
    pub public_repos_owned: u64,
    pub private_repos_owned: u64,
    pub total_stars: u64,
    pub average_stars_per_repo: f64,
    pub most_starred_repo: Option<MostStarredRepo>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyHighlight {
    pub month: String,
    pub month_index: u32,
    pub commits: u64,
}

/// Contribution totals per weekday, indexed Sunday = 0.
///
/// Serialised as a name-keyed map in Sunday..Saturday order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DayOfWeekCounts([u64; 7]);

impl DayOfWeekCounts {
    pub fn new(counts: [u64; 7]) -> Self {
        Self(counts)
    }

    pub fn add(&mut self, weekday: usize, count: u64) {
        if let Some(slot) = self.0.get_mut(weekday) {
            *slot += count;
        }
    }

    pub fn get(&self, name: &str) -> u64 {
        WEEKDAY_NAMES
            .iter()
            .position(|n| *n == name)
            .map(|i| self.0[i])
            .unwrap_or(0)
    }

    pub fn total(&self) -> u64 {
        self.0.iter().sum()
    }

    /// `(name, count)` pairs, Sunday first.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, u64)> + '_ {
        WEEKDAY_NAMES.iter().copied().zip(self.0.iter().copied())
    }
}

impl Serialize for DayOfWeekCounts {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(7))?;
        for (name, count) in self.iter() {
            map.serialize_entry(name, &count)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for DayOfWeekCounts {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = HashMap::<String, u64>::deserialize(deserializer)?;
        let mut counts = [0u64; 7];
        for (i, name) in WEEKDAY_NAMES.iter().enumerate() {
            counts[i] = raw.get(*name).copied().unwrap_or(0);
        }
        Ok(Self(counts))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WrappedHighlights {
    pub most_productive_month: MonthlyHighlight,
    pub most_productive_day: String,
    pub average_commits_per_active_day: f64,
    pub commits_by_day_of_week: DayOfWeekCounts,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopRepository {
    pub name: String,
    pub owner: String,
    pub full_name: String,
    pub commits: u64,
    pub language: Option<String>,
    pub language_color: Option<String>,
    pub stars: u64,
    pub is_private: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WrappedRepositories {
    pub top: Vec<TopRepository>,
    pub total_contributed: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LanguageStat {
    pub name: String,
    pub percentage: u32,
    pub color: String,
    pub commits: u64,
    /// Bytes of code under this primary language; absent when unknown.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code_size: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WrappedLanguages {
    pub top: Vec<LanguageStat>,
    pub total: usize,
    pub primary: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewStats {
    pub total_reviews: u64,
    #[serde(rename = "reviewsPerPR")]
    pub reviews_per_pr: f64,
    /// Repository with the most commits; stands in for per-repo review
    /// counts, which the upstream schema does not expose.
    pub most_reviewed_repo: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WrappedSummary {
    pub user: WrappedUser,
    pub year: i32,
    pub stats: WrappedStatistics,
    pub highlights: WrappedHighlights,
    pub repositories: WrappedRepositories,
    pub languages: WrappedLanguages,
    pub personality: PersonalityResult,
    pub calendar: Vec<ActivityDay>,
    pub review_stats: ReviewStats,
    pub generated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_day_of_week_counts_accessors() {
        let mut counts = DayOfWeekCounts::default();
        counts.add(0, 4);
        counts.add(6, 2);
        counts.add(6, 1);
        counts.add(9, 100);

        assert_eq!(counts.get("Sunday"), 4);
        assert_eq!(counts.get("Saturday"), 3);
        assert_eq!(counts.get("Funday"), 0);
        assert_eq!(counts.total(), 7);
    }

    #[test]
    fn test_day_of_week_counts_serialize_sunday_first() {
        let counts = DayOfWeekCounts::new([1, 2, 3, 4, 5, 6, 7]);
        let json = serde_json::to_string(&counts).unwrap();
        assert!(json.starts_with("{\"Sunday\":1,\"Monday\":2"));
        assert!(json.ends_with("\"Saturday\":7}"));

        let back: DayOfWeekCounts = serde_json::from_str(&json).unwrap();
        assert_eq!(back, counts);
    }

    #[test]
    fn test_language_stat_omits_missing_code_size() {
        let stat = LanguageStat {
            name: "Go".to_string(),
            percentage: 100,
            color: "#00ADD8".to_string(),
            commits: 3,
            code_size: None,
        };
        let value = serde_json::to_value(&stat).unwrap();
        assert!(value.get("codeSize").is_none());
    }
}
