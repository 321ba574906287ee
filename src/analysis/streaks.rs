use chrono::NaiveDate;

use crate::models::ActivityDay;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StreakSummary {
    pub longest: u64,
    pub current: u64,
}

/// Longest run of active days anywhere in the calendar, and the run that
/// ends at `today`.
///
/// Days after `today` are ignored for the current streak. A zero day that
/// is `today` itself does not break it, since the user may still commit.
pub fn calculate_streaks(days: &[ActivityDay], today: NaiveDate) -> StreakSummary {
    let mut sorted: Vec<&ActivityDay> = days.iter().collect();
    sorted.sort_by_key(|d| d.date);

    let mut longest = 0;
    let mut running = 0;
    for day in &sorted {
        if day.is_active() {
            running += 1;
            longest = longest.max(running);
        } else {
            running = 0;
        }
    }

    let mut current = 0;
    for day in sorted.iter().rev() {
        if day.date > today {
            continue;
        }
        if day.is_active() {
            current += 1;
        } else if day.date == today {
            continue;
        } else {
            break;
        }
    }

    StreakSummary { longest, current }
}
