pub mod cleanings;
pub mod recurrence;
pub mod schedule;
