//! Local wall-clock handling
//!
//! Log lines carry a second-precision local time such as `2026/2/15 6:53:43`
//! (no zero padding). Sub-events additionally carry epoch milliseconds; the
//! two are bridged through a named timezone.

use chrono::{NaiveDate, NaiveDateTime, TimeZone, Timelike};
use chrono_tz::Tz;

use crate::{Error, Result};

/// Parse a kiosk local timestamp.
///
/// Accepts `/` or `-` as date separator, a space or `T` before the time,
/// and optional seconds. Returns `None` for anything else.
pub fn parse_local_time(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    let (date_part, time_part) = raw.split_once([' ', 'T'])?;

    let mut date_fields = date_part.split(['/', '-']).map(|p| p.trim().parse::<u32>());
    let year = date_fields.next()?.ok()?;
    let month = date_fields.next()?.ok()?;
    let day = date_fields.next()?.ok()?;
    if date_fields.next().is_some() {
        return None;
    }

    let mut time_fields = time_part.trim().split(':').map(|p| p.trim().parse::<u32>());
    let hour = time_fields.next()?.ok()?;
    let minute = time_fields.next()?.ok()?;
    let second = match time_fields.next() {
        Some(s) => s.ok()?,
        None => 0,
    };
    if time_fields.next().is_some() {
        return None;
    }

    let year = i32::try_from(year).ok()?;
    NaiveDate::from_ymd_opt(year, month, day)?.and_hms_opt(hour, minute, second)
}

/// Resolve an IANA timezone name
pub fn parse_timezone(name: &str) -> Result<Tz> {
    name.parse::<Tz>()
        .map_err(|_| Error::Timezone(name.to_string()))
}

/// Convert a local wall-clock time to epoch milliseconds.
///
/// Ambiguous times (DST fall-back) resolve to the earlier instant; times
/// that do not exist locally (DST spring-forward) yield `None`.
pub fn to_epoch_ms(local: NaiveDateTime, tz: Tz) -> Option<i64> {
    tz.from_local_datetime(&local)
        .earliest()
        .map(|dt| dt.timestamp_millis())
}

/// `YYYY-MM-DD`
pub fn format_date(dt: &NaiveDateTime) -> String {
    dt.format("%Y-%m-%d").to_string()
}

/// `HH:MM`
pub fn format_hh_mm(dt: &NaiveDateTime) -> String {
    format!("{:02}:{:02}", dt.hour(), dt.minute())
}

/// Parse a `YYYY-MM-DD` date plus a kiosk time-of-day (`H:M[:S]`).
pub fn combine_date_time(date: &str, time: &str) -> Option<NaiveDateTime> {
    let date = NaiveDate::parse_from_str(date.trim(), "%Y-%m-%d").ok()?;
    let mut fields = time.trim().split(':').map(|p| p.trim().parse::<u32>());
    let hour = fields.next()?.ok()?;
    let minute = fields.next()?.ok()?;
    let second = match fields.next() {
        Some(s) => s.ok()?,
        None => 0,
    };
    date.and_hms_opt(hour, minute, second)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_unpadded() {
        let dt = parse_local_time("2026/2/15 6:53:43").unwrap();
        assert_eq!(format_date(&dt), "2026-02-15");
        assert_eq!(dt.hour(), 6);
        assert_eq!(dt.minute(), 53);
        assert_eq!(dt.second(), 43);
    }

    #[test]
    fn test_parse_variants() {
        assert!(parse_local_time("2026-02-15T06:53:43").is_some());
        assert!(parse_local_time("2026/02/15 06:53").is_some());
        assert!(parse_local_time("  2026/2/5 16:03:09 ").is_some());
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(parse_local_time("").is_none());
        assert!(parse_local_time("yesterday at noon").is_none());
        assert!(parse_local_time("2026/13/15 6:53:43").is_none());
        assert!(parse_local_time("2026/2/15 25:00:00").is_none());
        assert!(parse_local_time("2026/2/15/1 6:53:43").is_none());
        assert!(parse_local_time("2026/2/15").is_none());
    }

    #[test]
    fn test_epoch_conversion_jerusalem() {
        let tz = parse_timezone("Asia/Jerusalem").unwrap();
        // Winter: UTC+2
        let dt = parse_local_time("2026/2/15 6:53:43").unwrap();
        let utc = chrono::NaiveDate::from_ymd_opt(2026, 2, 15)
            .unwrap()
            .and_hms_opt(4, 53, 43)
            .unwrap()
            .and_utc()
            .timestamp_millis();
        assert_eq!(to_epoch_ms(dt, tz), Some(utc));
    }

    #[test]
    fn test_unknown_timezone() {
        assert!(parse_timezone("Mars/Olympus_Mons").is_err());
    }

    #[test]
    fn test_combine_date_time() {
        let dt = combine_date_time("2026-02-15", "6:53:43").unwrap();
        assert_eq!(format_hh_mm(&dt), "06:53");
        assert!(combine_date_time("not-a-date", "6:53").is_none());
    }
}
