use super::event::{EventClass, EventOrigin};
use serde::Serialize;
use std::fmt;

/// Which generation path produced a schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum GenerationPath {
    Deterministic,
    External,
}

impl fmt::Display for GenerationPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GenerationPath::Deterministic => write!(f, "deterministic"),
            GenerationPath::External => write!(f, "external"),
        }
    }
}

/// Counts of one schedule replacement. Only used for the audit entry.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleDiff {
    pub completed_preserved: usize,
    pub pending_removed: usize,
    pub inserted: usize,
}

/// Context attached to the audit entry of a replacement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditContext {
    pub path: GenerationPath,
    pub event_class: EventClass,
    pub origin: EventOrigin,
}
