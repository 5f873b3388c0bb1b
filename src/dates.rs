//! Date window suggestions for a travel month

use chrono::{Datelike, Duration, Month, NaiveDate};
use tracing::debug;

use crate::models::DateWindow;

/// Day of month each window would ideally start on, with its label
const WINDOW_ANCHORS: [(&str, u32); 3] = [
    ("Early Month", 1),
    ("Mid Month", 11),
    ("Late Month", LATE_ANCHOR),
];
const LATE_ANCHOR: u32 = 24;

/// Proposes three early/mid/late travel windows for a month
#[derive(Debug, Clone, Copy, Default)]
pub struct DateRangeSuggester;

impl DateRangeSuggester {
    /// Suggest three non-overlapping windows of `days` days each
    ///
    /// The late window is pulled back so it ends on the last day of the month.
    /// A window never starts before the previous one has ended, so long trips
    /// roll over into the following month.
    #[must_use]
    pub fn suggest(&self, year: i32, month: Month, days: u32) -> [DateWindow; 3] {
        let first = first_of_month(year, month);
        let month_len = days_in_month(first);
        let span = i64::from(days.max(1));
        debug!(year, month = month.name(), days, "Suggesting date windows");

        let mut previous_end: Option<NaiveDate> = None;
        WINDOW_ANCHORS.map(|(label, anchor)| {
            let mut start_day = i64::from(anchor);
            if anchor == LATE_ANCHOR {
                start_day = start_day.min(i64::from(month_len) - span + 1).max(1);
            }
            let mut start = first + Duration::days(start_day - 1);
            if let Some(end) = previous_end {
                start = start.max(end + Duration::days(1));
            }
            let end = start + Duration::days(span - 1);
            previous_end = Some(end);

            DateWindow {
                label: label.to_string(),
                start_date: start,
                end_date: end,
            }
        })
    }

    /// The year in which the next occurrence of `month` falls, seen from `today`
    #[must_use]
    pub fn travel_year(today: NaiveDate, month: Month) -> i32 {
        if month.number_from_month() >= today.month() {
            today.year()
        } else {
            today.year() + 1
        }
    }
}

fn first_of_month(year: i32, month: Month) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month.number_from_month(), 1).unwrap_or_default()
}

fn days_in_month(first: NaiveDate) -> u32 {
    let next_month = if first.month() == 12 {
        NaiveDate::from_ymd_opt(first.year() + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(first.year(), first.month() + 1, 1)
    };
    next_month.map_or(31, |next| (next - first).num_days() as u32)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn assert_invariants(windows: &[DateWindow; 3], days: u32) {
        for window in windows {
            assert_eq!(window.span_days(), i64::from(days), "{window:?}");
        }
        for pair in windows.windows(2) {
            assert!(pair[0].start_date < pair[1].start_date);
            assert!(!pair[0].overlaps(&pair[1]), "{pair:?}");
        }
        assert!(!windows[0].overlaps(&windows[2]));
    }

    #[test]
    fn test_june_week_windows_stay_in_june() {
        let windows = DateRangeSuggester.suggest(2025, Month::June, 7);
        assert_invariants(&windows, 7);

        assert_eq!(windows[0].start_date, date(2025, 6, 1));
        assert_eq!(windows[1].start_date, date(2025, 6, 11));
        assert_eq!(windows[2].start_date, date(2025, 6, 24));
        assert_eq!(windows[2].end_date, date(2025, 6, 30));
        assert!(windows.iter().all(|w| w.end_date.month() == 6));
        assert_eq!(windows[0].label, "Early Month");
        assert_eq!(windows[2].label, "Late Month");
    }

    #[test]
    fn test_late_window_is_clipped_to_leap_february() {
        let windows = DateRangeSuggester.suggest(2024, Month::February, 5);
        assert_invariants(&windows, 5);
        assert_eq!(windows[2].start_date, date(2024, 2, 24));
        assert_eq!(windows[2].end_date, date(2024, 2, 28));

        let windows = DateRangeSuggester.suggest(2024, Month::February, 6);
        assert_eq!(windows[2].end_date, date(2024, 2, 29));

        let windows = DateRangeSuggester.suggest(2023, Month::February, 6);
        assert_eq!(windows[2].end_date, date(2023, 2, 28));
    }

    #[test]
    fn test_long_trips_roll_into_next_year() {
        let windows = DateRangeSuggester.suggest(2025, Month::December, 30);
        assert_invariants(&windows, 30);
        assert_eq!(windows[0].end_date, date(2025, 12, 30));
        assert_eq!(windows[1].start_date, date(2025, 12, 31));
        assert_eq!(windows[2].end_date.year(), 2026);
    }

    #[rstest]
    #[case(Month::January, 1)]
    #[case(Month::February, 10)]
    #[case(Month::April, 12)]
    #[case(Month::July, 20)]
    #[case(Month::September, 30)]
    fn test_windows_never_overlap(#[case] month: Month, #[case] days: u32) {
        let windows = DateRangeSuggester.suggest(2024, month, days);
        assert_invariants(&windows, days);
    }

    #[rstest]
    #[case(date(2025, 3, 15), Month::June, 2025)]
    #[case(date(2025, 6, 30), Month::June, 2025)]
    #[case(date(2025, 10, 19), Month::February, 2026)]
    fn test_travel_year(#[case] today: NaiveDate, #[case] month: Month, #[case] year: i32) {
        assert_eq!(DateRangeSuggester::travel_year(today, month), year);
    }
}
