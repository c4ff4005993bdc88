//! Unified application error type.
//! All modules (db, core, cli, utils) return AppError to keep the error
//! handling consistent and easy to manage.

use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    // ---------------------------
    // IO
    // ---------------------------
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // ---------------------------
    // Database-related
    // ---------------------------
    #[error("Database error: {0}")]
    Db(#[from] rusqlite::Error),

    #[error("Database migration error: {0}")]
    Migration(String),

    // ---------------------------
    // Parsing errors
    // ---------------------------
    #[error("Invalid date format: {0}")]
    InvalidDate(String),

    #[error("Invalid time format: {0}")]
    InvalidTime(String),

    #[error("Invalid timestamp: {0}")]
    InvalidTimestamp(String),

    #[error("Invalid weekday token: {0}")]
    InvalidWeekday(String),

    #[error("Invalid recurrence rule: {0}")]
    InvalidRecurrence(String),

    #[error("Invalid operation status: {0}")]
    InvalidStatus(String),

    // ---------------------------
    // Generation errors
    // ---------------------------
    #[error("Invalid input: {0}")]
    Input(String),

    #[error("Remote generator error: {0}")]
    RemoteGenerator(String),

    // ---------------------------
    // Store / lookup errors
    // ---------------------------
    #[error("Event {event_id} not found for tenant '{tenant}'")]
    EventNotFound { tenant: String, event_id: i64 },

    #[error("Operation {0} not found")]
    OperationNotFound(i64),

    #[error("Cannot move operation from {from} to {to}")]
    InvalidTransition { from: String, to: String },

    #[error("Operation store error: {0}")]
    Store(String),

    /// User-facing failure of a schedule replacement. The cause is logged
    /// where it happens.
    #[error("could not update operations")]
    OperationsUpdate,

    // ---------------------------
    // Config errors
    // ---------------------------
    #[error("Configuration error: {0}")]
    Config(String),

    // ---------------------------
    // Generic fallback
    // ---------------------------
    #[error("Internal error: {0}")]
    Other(String),
}

pub type AppResult<T> = Result<T, AppError>;
