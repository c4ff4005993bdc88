use crate::models::recurrence::RecurrencePolicy;
use crate::utils::date::generate_range;
use chrono::NaiveDate;

/// Candidate cleaning dates between `start` and `end` (both inclusive),
/// strictly ascending.
///
/// Daily rules keep every day; weekly rules keep the days whose weekday is
/// configured. A weekly rule with no weekdays yields nothing.
pub fn expand(start: NaiveDate, end: NaiveDate, policy: &RecurrencePolicy) -> Vec<NaiveDate> {
    generate_range(start, end)
        .into_iter()
        .filter(|d| policy.applies_on(*d))
        .collect()
}
