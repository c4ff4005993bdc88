use super::recurrence::RecurrencePolicy;
use crate::errors::{AppError, AppResult};
use crate::utils::time::parse_timestamp;
use chrono::{NaiveDate, NaiveTime};
use serde::Serialize;

/// Where the event data came from. MANUAL events trust their own start/end
/// as the mobilization/demobilization instants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventOrigin {
    Auto,
    Manual,
}

impl EventOrigin {
    pub fn to_db_str(&self) -> &'static str {
        match self {
            EventOrigin::Auto => "AUTO",
            EventOrigin::Manual => "MANUAL",
        }
    }

    pub fn from_db_str(s: &str) -> Option<Self> {
        match s.trim().to_uppercase().as_str() {
            "AUTO" => Some(EventOrigin::Auto),
            "MANUAL" => Some(EventOrigin::Manual),
            _ => None,
        }
    }
}

/// Coarse event classification; gates which recurrence branch may produce
/// cleanings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum EventClass {
    SingleOccurrence,
    Intermittent,
    Other,
}

impl EventClass {
    pub fn to_db_str(&self) -> &'static str {
        match self {
            EventClass::SingleOccurrence => "single-occurrence",
            EventClass::Intermittent => "intermittent",
            EventClass::Other => "other",
        }
    }

    /// Unknown labels fall into `Other`, which never yields cleanings.
    pub fn from_db_str(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "single-occurrence" | "single_occurrence" | "single" => EventClass::SingleOccurrence,
            "intermittent" => EventClass::Intermittent,
            _ => EventClass::Other,
        }
    }

    /// Daily rules only on single-occurrence events, weekly rules only on
    /// intermittent ones. Anything else is inconsistent upstream data.
    pub fn admits(&self, policy: &RecurrencePolicy) -> bool {
        match self {
            EventClass::SingleOccurrence => policy.is_daily(),
            EventClass::Intermittent => policy.is_weekly(),
            EventClass::Other => false,
        }
    }
}

/// Timing data of one event, as the generator sees it.
///
/// `mobilization_at`/`demobilization_at` keep the raw timestamp text of the
/// source: a value that does not parse counts as absent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventWindow {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub start_time: Option<NaiveTime>,
    pub end_time: Option<NaiveTime>,
    pub mobilization_at: Option<String>,
    pub demobilization_at: Option<String>,
    pub origin: EventOrigin,
    pub recurrence: Option<RecurrencePolicy>,
}

impl EventWindow {
    /// Window with both anchors and no explicit timestamps or recurrence.
    pub fn new(
        start_date: NaiveDate,
        start_time: NaiveTime,
        end_date: NaiveDate,
        end_time: NaiveTime,
        origin: EventOrigin,
    ) -> Self {
        Self {
            start_date,
            end_date,
            start_time: Some(start_time),
            end_time: Some(end_time),
            mobilization_at: None,
            demobilization_at: None,
            origin,
            recurrence: None,
        }
    }

    pub fn with_recurrence(mut self, policy: RecurrencePolicy) -> Self {
        self.recurrence = Some(policy);
        self
    }

    pub fn with_mobilization_at(mut self, ts: &str) -> Self {
        self.mobilization_at = Some(ts.to_string());
        self
    }

    pub fn with_demobilization_at(mut self, ts: &str) -> Self {
        self.demobilization_at = Some(ts.to_string());
        self
    }

    pub fn explicit_mobilization(&self) -> Option<(NaiveDate, NaiveTime)> {
        self.mobilization_at.as_deref().and_then(parse_timestamp)
    }

    pub fn explicit_demobilization(&self) -> Option<(NaiveDate, NaiveTime)> {
        self.demobilization_at.as_deref().and_then(parse_timestamp)
    }

    /// Start and end anchors. A single missing anchor borrows the other one;
    /// with both missing nothing can be synthesized.
    pub fn anchors(&self) -> AppResult<(NaiveTime, NaiveTime)> {
        match (self.start_time, self.end_time) {
            (Some(s), Some(e)) => Ok((s, e)),
            (Some(s), None) => Ok((s, s)),
            (None, Some(e)) => Ok((e, e)),
            (None, None) => Err(AppError::Input(
                "event window has neither start nor end time".into(),
            )),
        }
    }

    pub fn validate(&self) -> AppResult<()> {
        if self.end_date < self.start_date {
            return Err(AppError::Input(format!(
                "end date {} is before start date {}",
                self.end_date, self.start_date
            )));
        }
        self.anchors().map(|_| ())
    }
}

/// What an Event Source hands out: the window plus its classification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventRecord {
    pub id: i64,
    pub window: EventWindow,
    pub class: EventClass,
}

impl EventRecord {
    /// MANUAL events go straight to the deterministic generator; the others
    /// may try an external generation path first.
    pub fn requires_deterministic(&self) -> bool {
        self.window.origin == EventOrigin::Manual
    }
}
