use super::cleanings::{Instant, generate_cleanings};
use crate::errors::AppResult;
use crate::models::event::{EventClass, EventOrigin, EventWindow};
use crate::models::operation::Operation;
use crate::utils::date::add_days;
use crate::utils::time::{add_hours, subtract_hours};
use chrono::{NaiveDate, NaiveTime};
use tracing::{debug, instrument, warn};

/// Offset between event start/end and the synthesized mobilization /
/// demobilization when no explicit timestamp is given.
pub const DEFAULT_BUFFER_HOURS: i64 = 4;

/// Full schedule of one event with the default buffer.
pub fn generate(window: &EventWindow, class: EventClass) -> AppResult<Vec<Operation>> {
    generate_with_buffer(window, class, DEFAULT_BUFFER_HOURS)
}

/// Full schedule of one event: mobilization, then cleanings with the final
/// suction in ascending date order, then demobilization.
///
/// Pure and deterministic. Absent or unparsable explicit timestamps fall back
/// to synthesis; only a window with no time anchor at all is rejected.
#[instrument(skip_all, fields(origin = ?window.origin, class = ?class))]
pub fn generate_with_buffer(
    window: &EventWindow,
    class: EventClass,
    buffer_hours: i64,
) -> AppResult<Vec<Operation>> {
    window.validate()?;
    let (start_time, end_time) = window.anchors()?;

    let mobilization = resolve_instant(
        window.origin,
        (window.start_date, start_time),
        window.explicit_mobilization(),
        buffer_hours.saturating_neg(),
    )?;
    let demobilization = resolve_instant(
        window.origin,
        (window.end_date, end_time),
        window.explicit_demobilization(),
        buffer_hours,
    )?;

    let mut ops = vec![Operation::mobilization(mobilization.0, mobilization.1)];

    if let Some(policy) = &window.recurrence {
        if class.admits(policy) {
            ops.extend(generate_cleanings(
                window.start_date,
                window.end_date,
                policy,
                mobilization,
                demobilization,
            ));
        } else {
            warn!(?policy, ?class, "recurrence does not match event class, no cleanings");
        }
    }

    ops.push(Operation::demobilization(demobilization.0, demobilization.1));

    debug!(count = ops.len(), "schedule generated");
    Ok(ops)
}

/// MANUAL: the anchor as given. AUTO: the explicit timestamp when it parses,
/// else the anchor shifted by `offset_hours` with the day carry applied.
fn resolve_instant(
    origin: EventOrigin,
    anchor: Instant,
    explicit: Option<Instant>,
    offset_hours: i64,
) -> AppResult<Instant> {
    if origin == EventOrigin::Manual {
        return Ok(anchor);
    }
    if let Some(instant) = explicit {
        return Ok(instant);
    }
    shift_instant(anchor.0, anchor.1, offset_hours)
}

fn shift_instant(date: NaiveDate, time: NaiveTime, hours: i64) -> AppResult<Instant> {
    let (time, day_offset) = if hours < 0 {
        subtract_hours(time, hours.saturating_neg())
    } else {
        add_hours(time, hours)
    };
    Ok((add_days(date, day_offset)?, time))
}
