use crate::errors::{AppError, AppResult};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

pub fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

pub fn now() -> NaiveDateTime {
    chrono::Local::now().naive_local()
}

pub fn parse_date(s: &str) -> AppResult<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").map_err(|_| AppError::InvalidDate(s.into()))
}

/// `YYYY-MM-DD HH:MM[:SS]` or `YYYY-MM-DDTHH:MM[:SS]`; a bare date means noon.
pub fn parse_moment(s: &str) -> AppResult<NaiveDateTime> {
    let s = s.trim();
    for fmt in [
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%d %H:%M",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%dT%H:%M",
    ] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Ok(dt);
        }
    }

    let day = parse_date(s)?;
    NaiveTime::from_hms_opt(12, 0, 0)
        .map(|t| day.and_time(t))
        .ok_or_else(|| AppError::InvalidDate(s.into()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn moments_accept_dates_and_times() {
        assert_eq!(
            parse_moment("2025-05-01 08:30").unwrap().to_string(),
            "2025-05-01 08:30:00"
        );
        assert_eq!(
            parse_moment("2025-05-01").unwrap().to_string(),
            "2025-05-01 12:00:00"
        );
        assert!(matches!(parse_moment("01/05/2025"), Err(AppError::InvalidDate(_))));
    }
}
