use super::recurrence::expand;
use crate::models::operation::Operation;
use crate::models::recurrence::RecurrencePolicy;
use crate::utils::time::{compare_time, is_midnight};
use chrono::{NaiveDate, NaiveTime, Timelike};
use std::cmp::Ordering;
use tracing::debug;

/// With a demobilization at exactly 00:00, cleanings on that same date are
/// kept from this hour on and dropped before it.
pub const MIDNIGHT_DEMOB_MIN_HOUR: u32 = 6;

/// A calendar date paired with a wall-clock time.
pub type Instant = (NaiveDate, NaiveTime);

/// Build the cleaning block of a schedule.
///
/// Candidates come from [`expand`] over `start..=end`. A candidate is dropped
/// when it falls before mobilization on the mobilization day, or after
/// demobilization (see [`keeps_cleaning`]). The last kept cleaning is
/// reclassified as the final suction.
pub fn generate_cleanings(
    start: NaiveDate,
    end: NaiveDate,
    policy: &RecurrencePolicy,
    mobilization: Instant,
    demobilization: Instant,
) -> Vec<Operation> {
    let time = policy.time();

    let mut out: Vec<Operation> = expand(start, end, policy)
        .into_iter()
        .filter(|date| {
            let keep = keeps_cleaning(*date, time, mobilization, demobilization);
            if !keep {
                debug!(%date, %time, "cleaning skipped by cutoff");
            }
            keep
        })
        .map(|date| Operation::cleaning(date, time))
        .collect();

    if let Some(last) = out.pop() {
        out.push(last.into_suction());
    }

    out
}

/// Cutoff rules for one candidate cleaning at `(date, time)`.
pub fn keeps_cleaning(
    date: NaiveDate,
    time: NaiveTime,
    mobilization: Instant,
    demobilization: Instant,
) -> bool {
    let (mob_date, mob_time) = mobilization;
    let (demob_date, demob_time) = demobilization;

    // Nothing to clean before the equipment is installed.
    if date == mob_date && compare_time(time, mob_time) == Ordering::Less {
        return false;
    }

    if date == demob_date {
        // Midnight demobilization closes the day instead of opening it.
        if is_midnight(demob_time) {
            return time.hour() >= MIDNIGHT_DEMOB_MIN_HOUR;
        }
        if compare_time(time, demob_time) == Ordering::Greater {
            return false;
        }
    }

    date < demob_date || (date == demob_date && compare_time(time, demob_time) == Ordering::Less)
}
