use chrono::Datelike;

use super::round_to_tenth;
use crate::models::{ActivityDay, DayOfWeekCounts, MonthlyHighlight, WrappedHighlights};

pub const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

const DEFAULT_PRODUCTIVE_DAY: &str = "Monday";

pub fn calculate_highlights(days: &[ActivityDay]) -> WrappedHighlights {
    let mut by_month = [0u64; 12];
    let mut by_weekday = DayOfWeekCounts::default();

    for day in days {
        by_month[day.date.month0() as usize] += day.contribution_count;
        by_weekday.add(
            day.date.weekday().num_days_from_sunday() as usize,
            day.contribution_count,
        );
    }

    // Strict comparison: the earliest month wins a tie.
    let mut most_productive_month = MonthlyHighlight {
        month: MONTH_NAMES[0].to_string(),
        month_index: 0,
        commits: 0,
    };
    for (index, &commits) in by_month.iter().enumerate() {
        if commits > most_productive_month.commits {
            most_productive_month = MonthlyHighlight {
                month: MONTH_NAMES[index].to_string(),
                month_index: index as u32,
                commits,
            };
        }
    }

    // Sunday..Saturday scan; first strictly greater count wins.
    let mut most_productive_day = DEFAULT_PRODUCTIVE_DAY;
    let mut max_day_commits = 0;
    for (name, commits) in by_weekday.iter() {
        if commits > max_day_commits {
            max_day_commits = commits;
            most_productive_day = name;
        }
    }

    let active_days = super::calendar::count_active_days(days);
    let total = super::calendar::total_contributions(days);
    let average_commits_per_active_day = if active_days > 0 {
        round_to_tenth(total as f64 / active_days as f64)
    } else {
        0.0
    };

    WrappedHighlights {
        most_productive_month,
        most_productive_day: most_productive_day.to_string(),
        average_commits_per_active_day,
        commits_by_day_of_week: by_weekday,
    }
}
