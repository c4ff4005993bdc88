pub mod event;
pub mod operation;
pub mod recurrence;
pub mod schedule_diff;
pub mod tenant;
