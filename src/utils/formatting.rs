//! Formatting utilities used for CLI outputs.

use crate::models::operation::OperationType;

/// Human-readable label and ANSI color for an operation type.
pub fn describe_operation(kind: OperationType) -> (String, &'static str) {
    match kind {
        OperationType::Mobilization => ("Mobilization".into(), "\x1b[34m"),
        OperationType::Cleaning => ("Cleaning".into(), "\x1b[36m"),
        OperationType::Suction => ("Suction".into(), "\x1b[35m"),
        OperationType::Demobilization => ("Demobilization".into(), "\x1b[33m"),
    }
}
