//! Time utilities: parsing HH:MM, minute-of-day arithmetic with day carry,
//! combined timestamp parsing.
//!
//! Every clock time in the crate is minute-granular: seconds are dropped on
//! input and never reintroduced.

use crate::errors::{AppError, AppResult};
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use std::cmp::Ordering;

pub const MINUTES_PER_DAY: i64 = 24 * 60;

/// Parse `HH:MM` or `HH:MM:SS`; seconds are discarded.
pub fn parse_time(t: &str) -> Option<NaiveTime> {
    let t = t.trim();
    NaiveTime::parse_from_str(t, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(t, "%H:%M:%S"))
        .ok()
        .map(truncate_to_minute)
}

pub fn parse_time_strict(t: &str) -> AppResult<NaiveTime> {
    parse_time(t).ok_or_else(|| AppError::InvalidTime(t.to_string()))
}

pub fn parse_optional_time(input: Option<&String>) -> AppResult<Option<NaiveTime>> {
    if let Some(s) = input {
        Ok(Some(parse_time_strict(s)?))
    } else {
        Ok(None)
    }
}

pub fn truncate_to_minute(t: NaiveTime) -> NaiveTime {
    from_minute_of_day(minute_of_day(t))
}

pub fn minute_of_day(t: NaiveTime) -> u32 {
    t.hour() * 60 + t.minute()
}

fn from_minute_of_day(m: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(m / 60, m % 60, 0).unwrap_or(NaiveTime::MIN)
}

/// Total order by minute-of-day.
pub fn compare_time(a: NaiveTime, b: NaiveTime) -> Ordering {
    minute_of_day(a).cmp(&minute_of_day(b))
}

pub fn is_midnight(t: NaiveTime) -> bool {
    minute_of_day(t) == 0
}

/// Shift a clock time by `minutes`, returning the new time and the signed
/// number of calendar days crossed.
pub fn shift_minutes(t: NaiveTime, minutes: i64) -> (NaiveTime, i64) {
    let total = i64::from(minute_of_day(t)).saturating_add(minutes);
    let day_offset = total.div_euclid(MINUTES_PER_DAY);
    let in_day = total.rem_euclid(MINUTES_PER_DAY) as u32;
    (from_minute_of_day(in_day), day_offset)
}

/// `02:00 + 23h` → `(01:00, 1)`.
pub fn add_hours(t: NaiveTime, hours: i64) -> (NaiveTime, i64) {
    shift_minutes(t, hours.saturating_mul(60))
}

/// `02:00 - 4h` → `(22:00, -1)`.
pub fn subtract_hours(t: NaiveTime, hours: i64) -> (NaiveTime, i64) {
    shift_minutes(t, hours.saturating_mul(60).saturating_neg())
}

pub fn format_time(t: NaiveTime) -> String {
    t.format("%H:%M").to_string()
}

/// Accepted layouts of an explicit mobilization/demobilization timestamp
/// without a UTC offset.
const NAIVE_TIMESTAMP_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
];

/// Split a combined timestamp into date and minute-granular time.
///
/// Accepts `YYYY-MM-DDTHH:MM[:SS[.fff]]` (or a space instead of `T`) and
/// RFC 3339 with an offset. The wall-clock part is taken as written, the
/// offset is ignored. Returns `None` on empty or malformed input: callers
/// treat that as "no explicit timestamp given".
pub fn parse_timestamp(s: &str) -> Option<(NaiveDate, NaiveTime)> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }

    let naive = DateTime::parse_from_rfc3339(s)
        .or_else(|_| DateTime::parse_from_str(s, "%Y-%m-%dT%H:%M%:z"))
        .map(|dt| dt.naive_local())
        .ok()
        .or_else(|| {
            NAIVE_TIMESTAMP_FORMATS
                .iter()
                .find_map(|f| NaiveDateTime::parse_from_str(s, f).ok())
        })?;

    Some((naive.date(), truncate_to_minute(naive.time())))
}

/// Serde adapter writing `NaiveTime` as `HH:MM` and reading `HH:MM[:SS]`.
pub mod hhmm {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer, de::Error};

    pub fn serialize<S: Serializer>(t: &NaiveTime, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&super::format_time(*t))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<NaiveTime, D::Error> {
        let raw = String::deserialize(d)?;
        super::parse_time(&raw).ok_or_else(|| D::Error::custom(format!("invalid time '{raw}'")))
    }
}
