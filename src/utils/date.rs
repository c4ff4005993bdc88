//! Calendar date helpers.
//!
//! `NaiveDate` carries no zone, so every step here behaves like arithmetic
//! anchored at UTC midnight: no daylight-saving jumps, exact across month
//! and year boundaries.

use crate::errors::{AppError, AppResult};
use chrono::{Datelike, NaiveDate, TimeDelta};

pub fn parse_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").ok()
}

pub fn parse_date_strict(s: &str) -> AppResult<NaiveDate> {
    parse_date(s).ok_or_else(|| AppError::InvalidDate(s.to_string()))
}

pub fn format_date(d: NaiveDate) -> String {
    d.format("%Y-%m-%d").to_string()
}

pub fn add_days(date: NaiveDate, n: i64) -> AppResult<NaiveDate> {
    TimeDelta::try_days(n)
        .and_then(|delta| date.checked_add_signed(delta))
        .ok_or_else(|| AppError::InvalidDate(format!("{} + {} days", format_date(date), n)))
}

pub fn subtract_days(date: NaiveDate, n: i64) -> AppResult<NaiveDate> {
    add_days(date, n.saturating_neg())
}

/// `0 = Sunday .. 6 = Saturday`.
pub fn weekday_index(date: NaiveDate) -> u32 {
    date.weekday().num_days_from_sunday()
}

/// Every day from `start` to `end`, both inclusive. Empty when `end < start`.
pub fn generate_range(start: NaiveDate, end: NaiveDate) -> Vec<NaiveDate> {
    start.iter_days().take_while(|d| *d <= end).collect()
}
