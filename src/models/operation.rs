use crate::errors::{AppError, AppResult};
use crate::utils::time::hhmm;
use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

pub const DEFAULT_DURATION_MINUTES: u32 = 60;

pub const NOTES_MOBILIZATION: &str = "Instalação inicial dos equipamentos";
pub const NOTES_CLEANING: &str = "Limpeza pós-uso";
pub const NOTES_SUCTION: &str = "Sucção final";
pub const NOTES_DEMOBILIZATION: &str = "Retirada final dos equipamentos";

pub const SUBTYPE_POST_USE: &str = "post_use";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OperationType {
    Mobilization,
    Cleaning,
    Suction,
    Demobilization,
}

impl OperationType {
    /// Convert enum → DB string
    pub fn to_db_str(&self) -> &'static str {
        match self {
            OperationType::Mobilization => "MOBILIZATION",
            OperationType::Cleaning => "CLEANING",
            OperationType::Suction => "SUCTION",
            OperationType::Demobilization => "DEMOBILIZATION",
        }
    }

    /// Convert DB string → enum
    pub fn from_db_str(s: &str) -> Option<Self> {
        match s {
            "MOBILIZATION" => Some(OperationType::Mobilization),
            "CLEANING" => Some(OperationType::Cleaning),
            "SUCTION" => Some(OperationType::Suction),
            "DEMOBILIZATION" => Some(OperationType::Demobilization),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VehicleClass {
    Cargo,
    Tank,
}

impl VehicleClass {
    pub fn to_db_str(&self) -> &'static str {
        match self {
            VehicleClass::Cargo => "CARGO",
            VehicleClass::Tank => "TANK",
        }
    }

    pub fn from_db_str(s: &str) -> Option<Self> {
        match s {
            "CARGO" => Some(VehicleClass::Cargo),
            "TANK" => Some(VehicleClass::Tank),
            _ => None,
        }
    }
}

/// Lifecycle of a stored operation. COMPLETED is terminal; every other
/// status stays eligible for replacement on regeneration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OperationStatus {
    Scheduled,
    InProgress,
    Cancelled,
    Completed,
}

impl OperationStatus {
    pub fn to_db_str(&self) -> &'static str {
        match self {
            OperationStatus::Scheduled => "SCHEDULED",
            OperationStatus::InProgress => "IN_PROGRESS",
            OperationStatus::Cancelled => "CANCELLED",
            OperationStatus::Completed => "COMPLETED",
        }
    }

    pub fn from_db_str(s: &str) -> Option<Self> {
        match s {
            "SCHEDULED" => Some(OperationStatus::Scheduled),
            "IN_PROGRESS" => Some(OperationStatus::InProgress),
            "CANCELLED" => Some(OperationStatus::Cancelled),
            "COMPLETED" => Some(OperationStatus::Completed),
            _ => None,
        }
    }

    /// Helper: accept CLI input in any case, with `-` or `_`.
    pub fn from_code(code: &str) -> AppResult<Self> {
        let normalized = code.trim().to_uppercase().replace('-', "_");
        Self::from_db_str(&normalized).ok_or_else(|| AppError::InvalidStatus(code.to_string()))
    }

    pub fn is_completed(&self) -> bool {
        matches!(self, OperationStatus::Completed)
    }

    pub fn can_transition_to(&self, next: OperationStatus) -> bool {
        !self.is_completed() || next.is_completed()
    }
}

/// A generated operation, before persistence. Serializes to the record
/// layout consumers render: `{type, subtype?, date, time, durationMinutes,
/// vehicleClass, status, notes}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Operation {
    #[serde(rename = "type")]
    pub kind: OperationType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtype: Option<String>,
    pub date: NaiveDate,
    #[serde(with = "hhmm")]
    pub time: NaiveTime,
    pub duration_minutes: u32,
    pub vehicle_class: VehicleClass,
    pub status: OperationStatus,
    pub notes: String,
}

impl Operation {
    fn new(
        kind: OperationType,
        subtype: Option<&str>,
        date: NaiveDate,
        time: NaiveTime,
        vehicle_class: VehicleClass,
        notes: &str,
    ) -> Self {
        Self {
            kind,
            subtype: subtype.map(str::to_string),
            date,
            time,
            duration_minutes: DEFAULT_DURATION_MINUTES,
            vehicle_class,
            status: OperationStatus::Scheduled,
            notes: notes.to_string(),
        }
    }

    pub fn mobilization(date: NaiveDate, time: NaiveTime) -> Self {
        Self::new(
            OperationType::Mobilization,
            None,
            date,
            time,
            VehicleClass::Cargo,
            NOTES_MOBILIZATION,
        )
    }

    pub fn cleaning(date: NaiveDate, time: NaiveTime) -> Self {
        Self::new(
            OperationType::Cleaning,
            Some(SUBTYPE_POST_USE),
            date,
            time,
            VehicleClass::Tank,
            NOTES_CLEANING,
        )
    }

    pub fn demobilization(date: NaiveDate, time: NaiveTime) -> Self {
        Self::new(
            OperationType::Demobilization,
            None,
            date,
            time,
            VehicleClass::Cargo,
            NOTES_DEMOBILIZATION,
        )
    }

    /// Reclassify as the terminal suction. Only the generator calls this,
    /// on the last cleaning of a freshly built list.
    pub fn into_suction(self) -> Self {
        Self {
            kind: OperationType::Suction,
            notes: NOTES_SUCTION.to_string(),
            ..self
        }
    }

    pub fn date_str(&self) -> String {
        self.date.format("%Y-%m-%d").to_string()
    }

    pub fn time_str(&self) -> String {
        self.time.format("%H:%M").to_string()
    }
}

/// An operation as persisted by an Operation Store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredOperation {
    pub id: i64,
    pub event_id: i64,
    #[serde(flatten)]
    pub operation: Operation,
    pub created_at: String,
}

impl StoredOperation {
    pub fn is_completed(&self) -> bool {
        self.operation.status.is_completed()
    }
}
