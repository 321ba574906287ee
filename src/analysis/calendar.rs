use crate::models::{ActivityDay, ContributionCalendar};

/// Flattens the week-grouped calendar into date order.
///
/// Partial years stay partial: missing days are never synthesised.
pub fn flatten_calendar(calendar: &ContributionCalendar) -> Vec<ActivityDay> {
    calendar
        .weeks
        .iter()
        .flat_map(|week| week.contribution_days.iter().cloned())
        .collect()
}

pub fn count_active_days(days: &[ActivityDay]) -> u64 {
    days.iter().filter(|d| d.is_active()).count() as u64
}

pub fn total_contributions(days: &[ActivityDay]) -> u64 {
    days.iter().map(|d| d.contribution_count).sum()
}

#[cfg(test)]
pub(crate) mod fixtures {
    use chrono::{Datelike, Duration, NaiveDate};

    use crate::models::ActivityDay;

    pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    /// Consecutive days starting at `start`, one per count.
    pub fn days_from(start: NaiveDate, counts: &[u64]) -> Vec<ActivityDay> {
        counts
            .iter()
            .enumerate()
            .map(|(i, &count)| {
                let date = start + Duration::days(i as i64);
                ActivityDay {
                    date,
                    contribution_count: count,
                    weekday: date.weekday().num_days_from_sunday() as u8,
                }
            })
            .collect()
    }
}
