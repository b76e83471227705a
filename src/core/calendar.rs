//! Calendar-day arithmetic. Everything here works on local naive dates:
//! a feeding belongs to the day shown on the wall clock when it happened.

use crate::errors::{AppError, AppResult};
use chrono::{Datelike, Days, NaiveDate, NaiveDateTime, NaiveTime};

/// Number of days shown in the history strip.
pub const DEFAULT_WINDOW: usize = 14;

/// True when both values fall on the same year, month and day.
pub fn same_calendar_day(a: impl Datelike, b: impl Datelike) -> bool {
    a.year() == b.year() && a.month() == b.month() && a.day() == b.day()
}

/// `n` consecutive days ending with `anchor`, oldest first.
pub fn trailing_window(anchor: NaiveDate, n: usize) -> Vec<NaiveDate> {
    (0..n)
        .rev()
        .filter_map(|back| anchor.checked_sub_days(Days::new(back as u64)))
        .collect()
}

/// Whole days from `from` to `to`, ignoring the time of day.
///
/// A `from` later than `to` means a feeding recorded in the future, which
/// is reported instead of turning into a negative count.
pub fn days_elapsed(from: NaiveDate, to: NaiveDate) -> AppResult<i64> {
    let diff = (to - from).num_days();
    if diff < 0 {
        return Err(AppError::FutureFeed {
            feed: from.to_string(),
            today: to.to_string(),
        });
    }
    Ok(diff)
}

/// Start of the day following `now`.
pub fn next_midnight(now: NaiveDateTime) -> NaiveDateTime {
    let tomorrow = now.date().succ_opt().unwrap_or(NaiveDate::MAX);
    tomorrow.and_time(NaiveTime::MIN)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn dt(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").unwrap()
    }

    #[test]
    fn same_day_ignores_time_of_day() {
        assert!(same_calendar_day(
            dt("2025-05-01 00:00:00"),
            dt("2025-05-01 23:59:59")
        ));
        assert!(same_calendar_day(dt("2025-05-01 12:00:00"), d("2025-05-01")));
        assert!(!same_calendar_day(
            dt("2025-05-01 23:59:59"),
            dt("2025-05-02 00:00:00")
        ));
        assert!(!same_calendar_day(d("2024-05-01"), d("2025-05-01")));
    }

    #[test]
    fn window_is_ascending_and_ends_on_anchor() {
        let w = trailing_window(d("2025-03-02"), DEFAULT_WINDOW);
        assert_eq!(w.len(), 14);
        assert_eq!(w[0], d("2025-02-17"));
        assert_eq!(w[13], d("2025-03-02"));
        assert!(w.windows(2).all(|p| p[1] == p[0].succ_opt().unwrap()));
    }

    #[test]
    fn window_of_zero_or_one_day() {
        assert!(trailing_window(d("2025-03-02"), 0).is_empty());
        assert_eq!(trailing_window(d("2025-03-02"), 1), vec![d("2025-03-02")]);
    }

    #[test]
    fn elapsed_days_ignore_time_components() {
        let today = dt("2025-06-10 00:01:00").date();
        let yesterday = dt("2025-06-09 23:59:00").date();

        assert_eq!(days_elapsed(today, today).unwrap(), 0);
        assert_eq!(days_elapsed(yesterday, today).unwrap(), 1);
        assert_eq!(days_elapsed(d("2024-12-31"), d("2025-01-02")).unwrap(), 2);
    }

    #[test]
    fn elapsed_days_reject_future_feeds() {
        let err = days_elapsed(d("2025-06-11"), d("2025-06-10")).unwrap_err();
        assert!(matches!(err, AppError::FutureFeed { .. }));
    }

    #[test]
    fn next_midnight_rolls_over_month_and_year() {
        assert_eq!(
            next_midnight(dt("2025-06-10 13:45:00")),
            dt("2025-06-11 00:00:00")
        );
        assert_eq!(
            next_midnight(dt("2025-12-31 23:59:59")),
            dt("2026-01-01 00:00:00")
        );
        assert_eq!(
            next_midnight(dt("2025-06-10 00:00:00")),
            dt("2025-06-11 00:00:00")
        );
    }
}
