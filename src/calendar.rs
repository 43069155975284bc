//! Date-only arithmetic for iteration boundaries.
//!
//! Iterations are week-granularity time boxes aligned to a configured
//! weekday. The canonical start of iteration 1 is the project's start date
//! pulled back to the nearest prior (or same-day) occurrence of that
//! weekday; every other mapping is plain day arithmetic from there.

use chrono::{Datelike, Duration, Local, NaiveDate};

use crate::config::ProjectConfig;
use crate::error::{Error, Result};

const DAYS_PER_WEEK: i64 = 7;

/// Today's date on the local clock.
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Parse a `"YYYY/MM/DD"` date string.
fn parse_start_date(raw: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%Y/%m/%d")
        .map_err(|_| Error::InvalidConfig(format!("invalid start_date: {raw:?}")))
}

/// Canonical start of iteration 1.
///
/// Parses the configured start date (falling back to `fallback` when
/// absent) and, if it does not already land on `iteration_start_day`,
/// pulls it back to the most recent prior occurrence of that weekday.
/// Never moves the date forward.
pub fn start_date(config: &ProjectConfig, fallback: NaiveDate) -> Result<NaiveDate> {
    let start = match config.start_date.as_deref() {
        Some(raw) => parse_start_date(raw)?,
        None => fallback,
    };

    let weekday = start.weekday().num_days_from_sunday() as i64;
    let target = config.iteration_start_day as i64;
    if weekday == target {
        return Ok(start);
    }

    let mut day_difference = weekday - target;
    if day_difference < 0 {
        day_difference += DAYS_PER_WEEK;
    }
    Ok(start - Duration::days(day_difference))
}

/// The iteration number containing `date`.
///
/// Computed from the absolute day distance to the canonical start, so a
/// date before the start still yields a number; normal operation never
/// passes pre-start dates.
pub fn iteration_number_for_date(
    config: &ProjectConfig,
    fallback: NaiveDate,
    date: NaiveDate,
) -> Result<u32> {
    let start = start_date(config, fallback)?;
    let days_apart = (date - start).num_days().abs();
    let iteration_days = config.iteration_length as i64 * DAYS_PER_WEEK;
    Ok((days_apart / iteration_days) as u32 + 1)
}

/// Inverse of [`iteration_number_for_date`]: the first day of iteration
/// `number`.
pub fn date_for_iteration_number(
    config: &ProjectConfig,
    fallback: NaiveDate,
    number: u32,
) -> Result<NaiveDate> {
    let start = start_date(config, fallback)?;
    let offset = (number as i64 - 1) * config.iteration_length as i64 * DAYS_PER_WEEK;
    Ok(start + Duration::days(offset))
}

/// The iteration number containing today.
pub fn current_iteration_number(config: &ProjectConfig) -> Result<u32> {
    let now = today();
    iteration_number_for_date(config, now, now)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(start: &str, start_day: u32, length: u32) -> ProjectConfig {
        ProjectConfig {
            start_date: Some(start.to_string()),
            iteration_start_day: start_day,
            iteration_length: length,
            ..ProjectConfig::default()
        }
    }

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).expect("valid date")
    }

    #[test]
    fn start_date_unchanged_when_already_aligned() {
        // 2011-07-25 is a Monday
        let config = config("2011/07/25", 1, 1);
        let start = start_date(&config, today()).expect("start date");
        assert_eq!(start, date(2011, 7, 25));
    }

    #[test]
    fn start_date_pulls_back_to_prior_weekday() {
        // 2011-07-27 is a Wednesday; the Monday before is the 25th
        let config = config("2011/07/27", 1, 2);
        let start = start_date(&config, today()).expect("start date");
        assert_eq!(start, date(2011, 7, 25));
    }

    #[test]
    fn start_date_never_moves_forward() {
        // 2011-07-25 is a Monday; the nearest prior Friday is the 22nd,
        // not the upcoming 29th
        let config = config("2011/07/25", 5, 1);
        let start = start_date(&config, today()).expect("start date");
        assert_eq!(start, date(2011, 7, 22));
    }

    #[test]
    fn start_date_rejects_malformed_string() {
        let config = config("not-a-date", 1, 1);
        assert!(start_date(&config, today()).is_err());
    }

    #[test]
    fn start_date_falls_back_to_today_when_absent() {
        let config = ProjectConfig {
            start_date: None,
            iteration_start_day: 1,
            ..ProjectConfig::default()
        };
        // 2011-07-28 is a Thursday; the Monday before is the 25th
        let start = start_date(&config, date(2011, 7, 28)).expect("start date");
        assert_eq!(start, date(2011, 7, 25));
    }

    #[test]
    fn iteration_number_advances_every_iteration_length_weeks() {
        // Scenario A: two-week iterations starting on a Monday, with the
        // project start date on a Wednesday
        let config = config("2011/07/27", 1, 2);
        let fallback = today();

        let canonical = start_date(&config, fallback).expect("start date");
        assert_eq!(canonical, date(2011, 7, 25));

        let first = iteration_number_for_date(&config, fallback, canonical).expect("number");
        assert_eq!(first, 1);

        let second = iteration_number_for_date(&config, fallback, canonical + Duration::days(14))
            .expect("number");
        assert_eq!(second, 2);

        // Last day of iteration 1
        let edge = iteration_number_for_date(&config, fallback, canonical + Duration::days(13))
            .expect("number");
        assert_eq!(edge, 1);
    }

    #[test]
    fn date_for_iteration_number_inverts_the_mapping() {
        let config = config("2011/07/27", 1, 2);
        let fallback = today();

        for number in 1..=20 {
            let start = date_for_iteration_number(&config, fallback, number).expect("date");
            let roundtrip = iteration_number_for_date(&config, fallback, start).expect("number");
            assert_eq!(roundtrip, number);
        }
    }

    #[test]
    fn date_for_iteration_number_starts_at_canonical_start() {
        let config = config("2011/07/27", 1, 2);
        let start = date_for_iteration_number(&config, today(), 1).expect("date");
        assert_eq!(start, date(2011, 7, 25));

        let third = date_for_iteration_number(&config, today(), 3).expect("date");
        assert_eq!(third, date(2011, 8, 22));
    }
}
