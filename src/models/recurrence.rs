//! Cleaning recurrence rules and the boundary that turns the loosely typed
//! JSON payload of the source domain into them.

use crate::errors::{AppError, AppResult};
use crate::utils::date::weekday_index;
use crate::utils::time::{format_time, parse_time};
use chrono::{NaiveDate, NaiveTime};
use serde::Deserialize;
use serde_json::{Value, json};
use std::collections::BTreeSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Weekday {
    Sun,
    Mon,
    Tue,
    Wed,
    Thu,
    Fri,
    Sat,
}

impl Weekday {
    pub const ALL: [Weekday; 7] = [
        Weekday::Sun,
        Weekday::Mon,
        Weekday::Tue,
        Weekday::Wed,
        Weekday::Thu,
        Weekday::Fri,
        Weekday::Sat,
    ];

    /// `0 = Sunday .. 6 = Saturday`
    pub fn index(&self) -> u32 {
        *self as u32
    }

    pub fn from_index(i: u32) -> Option<Self> {
        Self::ALL.get(i as usize).copied()
    }

    pub fn of(date: NaiveDate) -> Self {
        // weekday_index is always 0..=6
        Self::from_index(weekday_index(date)).unwrap_or(Weekday::Sun)
    }

    pub fn token(&self) -> &'static str {
        match self {
            Weekday::Sun => "SUN",
            Weekday::Mon => "MON",
            Weekday::Tue => "TUE",
            Weekday::Wed => "WED",
            Weekday::Thu => "THU",
            Weekday::Fri => "FRI",
            Weekday::Sat => "SAT",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Weekday::Sun => "SUNDAY",
            Weekday::Mon => "MONDAY",
            Weekday::Tue => "TUESDAY",
            Weekday::Wed => "WEDNESDAY",
            Weekday::Thu => "THURSDAY",
            Weekday::Fri => "FRIDAY",
            Weekday::Sat => "SATURDAY",
        }
    }

    /// The three-letter token or the full English name, in any case.
    /// Anything else (`"MONKEY"`, `"Wedding"`) is not a weekday.
    pub fn from_token(s: &str) -> Option<Self> {
        let upper = s.trim().to_uppercase();
        Self::ALL
            .iter()
            .copied()
            .find(|d| d.token() == upper || d.name() == upper)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecurrencePolicy {
    Daily {
        time: NaiveTime,
    },
    Weekly {
        weekdays: BTreeSet<Weekday>,
        time: NaiveTime,
    },
}

impl RecurrencePolicy {
    pub fn daily(time: NaiveTime) -> Self {
        RecurrencePolicy::Daily { time }
    }

    pub fn weekly<I: IntoIterator<Item = Weekday>>(days: I, time: NaiveTime) -> Self {
        RecurrencePolicy::Weekly {
            weekdays: days.into_iter().collect(),
            time,
        }
    }

    pub fn time(&self) -> NaiveTime {
        match self {
            RecurrencePolicy::Daily { time } | RecurrencePolicy::Weekly { time, .. } => *time,
        }
    }

    /// Whether a cleaning may fall on `date` under this rule.
    pub fn applies_on(&self, date: NaiveDate) -> bool {
        match self {
            RecurrencePolicy::Daily { .. } => true,
            RecurrencePolicy::Weekly { weekdays, .. } => weekdays.contains(&Weekday::of(date)),
        }
    }

    pub fn is_daily(&self) -> bool {
        matches!(self, RecurrencePolicy::Daily { .. })
    }

    pub fn is_weekly(&self) -> bool {
        matches!(self, RecurrencePolicy::Weekly { .. })
    }

    /// Canonical payload written back to storage.
    pub fn to_payload(&self) -> Value {
        match self {
            RecurrencePolicy::Daily { time } => json!({
                "type": "daily",
                "time": format_time(*time),
            }),
            RecurrencePolicy::Weekly { weekdays, time } => json!({
                "type": "weekly",
                "days": weekdays.iter().map(Weekday::token).collect::<Vec<_>>(),
                "time": format_time(*time),
            }),
        }
    }

    /// Validate a stored payload.
    ///
    /// `None` for null payloads and rules marked `"active": false`.
    pub fn from_payload(payload: &Value) -> AppResult<Option<Self>> {
        if payload.is_null() {
            return Ok(None);
        }

        let raw: RawRecurrence = serde_json::from_value(payload.clone())
            .map_err(|e| AppError::InvalidRecurrence(e.to_string()))?;

        if !raw.active {
            return Ok(None);
        }

        let time_str = raw
            .time
            .ok_or_else(|| AppError::InvalidRecurrence("missing 'time'".into()))?;
        let time = parse_time(&time_str).ok_or_else(|| AppError::InvalidTime(time_str.clone()))?;

        match raw.kind.trim().to_lowercase().as_str() {
            "daily" => Ok(Some(RecurrencePolicy::Daily { time })),
            "weekly" => {
                let weekdays = raw
                    .days
                    .iter()
                    .map(parse_weekday_value)
                    .collect::<AppResult<BTreeSet<_>>>()?;
                if weekdays.is_empty() {
                    return Err(AppError::Input(
                        "active weekly recurrence has no weekdays".into(),
                    ));
                }
                Ok(Some(RecurrencePolicy::Weekly { weekdays, time }))
            }
            other => Err(AppError::InvalidRecurrence(format!(
                "unknown recurrence type '{other}'"
            ))),
        }
    }

    /// Parse the raw JSON text stored in the `recurrence` column.
    pub fn from_payload_str(s: &str) -> AppResult<Option<Self>> {
        if s.trim().is_empty() {
            return Ok(None);
        }
        let value: Value = serde_json::from_str(s)
            .map_err(|e| AppError::InvalidRecurrence(e.to_string()))?;
        Self::from_payload(&value)
    }
}

#[derive(Deserialize)]
struct RawRecurrence {
    #[serde(rename = "type")]
    kind: String,
    time: Option<String>,
    #[serde(default, alias = "weekdays")]
    days: Vec<Value>,
    #[serde(default = "default_active")]
    active: bool,
}

fn default_active() -> bool {
    true
}

fn parse_weekday_value(v: &Value) -> AppResult<Weekday> {
    match v {
        Value::String(s) => Weekday::from_token(s).ok_or_else(|| AppError::InvalidWeekday(s.clone())),
        Value::Number(n) => n
            .as_u64()
            .and_then(|i| u32::try_from(i).ok())
            .and_then(Weekday::from_index)
            .ok_or_else(|| AppError::InvalidWeekday(n.to_string())),
        other => Err(AppError::InvalidWeekday(other.to_string())),
    }
}
