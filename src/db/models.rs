//! Database row models. Thin wrappers around SQLite rows; conversion to
//! domain values happens in `to_record`.

use crate::errors::AppResult;
use crate::models::event::{EventClass, EventOrigin, EventRecord, EventWindow};
use crate::models::recurrence::RecurrencePolicy;
use chrono::{NaiveDate, NaiveTime};

#[derive(Debug, Clone)]
pub struct EventRow {
    pub id: i64,
    pub tenant_id: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub start_time: Option<NaiveTime>,
    pub end_time: Option<NaiveTime>,
    pub mobilization_at: Option<String>,
    pub demobilization_at: Option<String>,
    pub source: EventOrigin,
    pub class: EventClass,
    pub recurrence: Option<String>, // raw JSON payload as stored
    pub created_at: String,
}

impl EventRow {
    /// Validate the recurrence payload and build the generator input.
    pub fn to_record(&self) -> AppResult<EventRecord> {
        let recurrence = match self.recurrence.as_deref() {
            Some(raw) => RecurrencePolicy::from_payload_str(raw)?,
            None => None,
        };

        Ok(EventRecord {
            id: self.id,
            window: EventWindow {
                start_date: self.start_date,
                end_date: self.end_date,
                start_time: self.start_time,
                end_time: self.end_time,
                mobilization_at: self.mobilization_at.clone(),
                demobilization_at: self.demobilization_at.clone(),
                origin: self.source,
                recurrence,
            },
            class: self.class,
        })
    }
}
