mod common;
use common::{d, t};

use opsched::core::calculator::cleanings::{generate_cleanings, keeps_cleaning};
use opsched::core::calculator::schedule::{generate, generate_with_buffer};
use opsched::errors::AppError;
use opsched::models::event::{EventClass, EventOrigin, EventWindow};
use opsched::models::operation::{
    NOTES_SUCTION, OperationStatus, OperationType, SUBTYPE_POST_USE, VehicleClass,
};
use opsched::models::recurrence::{RecurrencePolicy, Weekday};

fn auto_window() -> EventWindow {
    EventWindow::new(
        d("2025-03-10"),
        t("08:00"),
        d("2025-03-12"),
        t("18:00"),
        EventOrigin::Auto,
    )
}

fn kinds(ops: &[opsched::models::operation::Operation]) -> Vec<OperationType> {
    ops.iter().map(|o| o.kind).collect()
}

#[test]
fn test_auto_without_recurrence_synthesizes_buffers() {
    let ops = generate(&auto_window(), EventClass::SingleOccurrence).unwrap();

    assert_eq!(ops.len(), 2);
    assert_eq!(ops[0].kind, OperationType::Mobilization);
    assert_eq!((ops[0].date, ops[0].time), (d("2025-03-10"), t("04:00")));
    assert_eq!(ops[0].vehicle_class, VehicleClass::Cargo);
    assert_eq!(ops[1].kind, OperationType::Demobilization);
    assert_eq!((ops[1].date, ops[1].time), (d("2025-03-12"), t("22:00")));
    assert!(ops.iter().all(|o| o.status == OperationStatus::Scheduled));
    assert!(ops.iter().all(|o| o.duration_minutes == 60));
}

#[test]
fn test_daily_single_occurrence_ends_with_suction() {
    let window = auto_window().with_recurrence(RecurrencePolicy::daily(t("19:00")));
    let ops = generate(&window, EventClass::SingleOccurrence).unwrap();

    assert_eq!(
        kinds(&ops),
        vec![
            OperationType::Mobilization,
            OperationType::Cleaning,
            OperationType::Cleaning,
            OperationType::Suction,
            OperationType::Demobilization,
        ]
    );
    let dates: Vec<_> = ops[1..4].iter().map(|o| o.date).collect();
    assert_eq!(dates, vec![d("2025-03-10"), d("2025-03-11"), d("2025-03-12")]);
    assert!(ops[1..4].iter().all(|o| o.time == t("19:00")));
    assert!(ops[1..4].iter().all(|o| o.vehicle_class == VehicleClass::Tank));
    assert!(
        ops[1..4]
            .iter()
            .all(|o| o.subtype.as_deref() == Some(SUBTYPE_POST_USE))
    );
    assert_eq!(ops[3].notes, NOTES_SUCTION);
}

#[test]
fn test_exactly_one_suction_and_it_is_the_last_cleaning() {
    let window = EventWindow::new(
        d("2025-03-01"),
        t("06:00"),
        d("2025-03-31"),
        t("23:00"),
        EventOrigin::Auto,
    )
    .with_recurrence(RecurrencePolicy::daily(t("12:00")));
    let ops = generate(&window, EventClass::SingleOccurrence).unwrap();

    let suctions: Vec<_> = ops
        .iter()
        .enumerate()
        .filter(|(_, o)| o.kind == OperationType::Suction)
        .collect();
    assert_eq!(suctions.len(), 1);
    assert_eq!(suctions[0].0, ops.len() - 2);
    assert_eq!(suctions[0].1.date, d("2025-03-31"));
    assert_eq!(ops.len(), 1 + 31 + 1);
}

#[test]
fn test_cleaning_before_mobilization_time_is_dropped() {
    // mobilization at 04:00, cleaning at 03:00 on the first day
    let window = auto_window().with_recurrence(RecurrencePolicy::daily(t("03:00")));
    let ops = generate(&window, EventClass::SingleOccurrence).unwrap();

    let cleaning_dates: Vec<_> = ops[1..ops.len() - 1].iter().map(|o| o.date).collect();
    assert_eq!(cleaning_dates, vec![d("2025-03-11"), d("2025-03-12")]);
}

#[test]
fn test_cleaning_after_demobilization_time_is_dropped() {
    let window = auto_window()
        .with_demobilization_at("2025-03-12T17:00:00")
        .with_recurrence(RecurrencePolicy::daily(t("19:00")));
    let ops = generate(&window, EventClass::SingleOccurrence).unwrap();

    let cleanings = &ops[1..ops.len() - 1];
    assert_eq!(cleanings.len(), 2);
    assert_eq!(cleanings[1].date, d("2025-03-11"));
    assert_eq!(cleanings[1].kind, OperationType::Suction);
    assert_eq!(ops.last().map(|o| o.time), Some(t("17:00")));
}

#[test]
fn test_cleaning_at_demobilization_instant_is_dropped() {
    let mob = (d("2025-03-10"), t("04:00"));
    let demob = (d("2025-03-12"), t("19:00"));
    assert!(!keeps_cleaning(d("2025-03-12"), t("19:00"), mob, demob));
    assert!(keeps_cleaning(d("2025-03-12"), t("18:59"), mob, demob));
    assert!(keeps_cleaning(d("2025-03-10"), t("04:00"), mob, demob));
}

#[test]
fn test_midnight_demobilization_keeps_late_cleanings_that_day() {
    let mob = (d("2025-03-10"), t("04:00"));
    let demob = (d("2025-03-13"), t("00:00"));

    assert!(keeps_cleaning(d("2025-03-13"), t("19:00"), mob, demob));
    assert!(keeps_cleaning(d("2025-03-13"), t("06:00"), mob, demob));
    assert!(!keeps_cleaning(d("2025-03-13"), t("03:00"), mob, demob));
    assert!(!keeps_cleaning(d("2025-03-13"), t("05:59"), mob, demob));
}

#[test]
fn test_midnight_demobilization_through_generate_cleanings() {
    let mob = (d("2025-03-10"), t("08:00"));
    let demob = (d("2025-03-13"), t("00:00"));

    let evening = generate_cleanings(
        d("2025-03-10"),
        d("2025-03-13"),
        &RecurrencePolicy::daily(t("19:00")),
        mob,
        demob,
    );
    assert_eq!(evening.len(), 4);
    assert_eq!(evening[3].date, d("2025-03-13"));
    assert_eq!(evening[3].kind, OperationType::Suction);

    let night = generate_cleanings(
        d("2025-03-10"),
        d("2025-03-13"),
        &RecurrencePolicy::daily(t("03:00")),
        mob,
        demob,
    );
    let dates: Vec<_> = night.iter().map(|o| o.date).collect();
    assert_eq!(dates, vec![d("2025-03-11"), d("2025-03-12")]);
    assert_eq!(night[1].kind, OperationType::Suction);
}

#[test]
fn test_class_mismatch_yields_no_cleanings() {
    let daily = auto_window().with_recurrence(RecurrencePolicy::daily(t("19:00")));
    let weekly = auto_window().with_recurrence(RecurrencePolicy::weekly(
        [Weekday::Mon, Weekday::Tue],
        t("19:00"),
    ));

    for (window, class) in [
        (&daily, EventClass::Intermittent),
        (&daily, EventClass::Other),
        (&weekly, EventClass::SingleOccurrence),
        (&weekly, EventClass::Other),
    ] {
        let ops = generate(window, class).unwrap();
        assert_eq!(
            kinds(&ops),
            vec![OperationType::Mobilization, OperationType::Demobilization]
        );
    }
}

#[test]
fn test_weekly_intermittent_cleanings() {
    // 2025-03-10 is a Monday
    let window = EventWindow::new(
        d("2025-03-10"),
        t("08:00"),
        d("2025-03-16"),
        t("18:00"),
        EventOrigin::Auto,
    )
    .with_recurrence(RecurrencePolicy::weekly(
        [Weekday::Mon, Weekday::Wed],
        t("19:00"),
    ));
    let ops = generate(&window, EventClass::Intermittent).unwrap();

    assert_eq!(ops.len(), 4);
    assert_eq!((ops[1].kind, ops[1].date), (OperationType::Cleaning, d("2025-03-10")));
    assert_eq!((ops[2].kind, ops[2].date), (OperationType::Suction, d("2025-03-12")));
}

#[test]
fn test_weekly_without_weekdays_yields_no_cleanings() {
    let window = auto_window().with_recurrence(RecurrencePolicy::weekly(Vec::<Weekday>::new(), t("19:00")));
    let ops = generate(&window, EventClass::Intermittent).unwrap();
    assert_eq!(ops.len(), 2);
}

#[test]
fn test_no_qualifying_cleaning_means_no_suction() {
    // cleaning time after demobilization on a single-day event
    let window = EventWindow::new(
        d("2025-03-10"),
        t("08:00"),
        d("2025-03-10"),
        t("12:00"),
        EventOrigin::Manual,
    )
    .with_recurrence(RecurrencePolicy::daily(t("19:00")));
    let ops = generate(&window, EventClass::SingleOccurrence).unwrap();

    assert!(ops.iter().all(|o| o.kind != OperationType::Suction));
    assert_eq!(ops.len(), 2);
}

#[test]
fn test_explicit_timestamps_win_for_auto() {
    let window = auto_window()
        .with_mobilization_at("2025-03-09T15:30:00")
        .with_demobilization_at("2025-03-13 09:15");
    let ops = generate(&window, EventClass::Other).unwrap();

    assert_eq!((ops[0].date, ops[0].time), (d("2025-03-09"), t("15:30")));
    assert_eq!((ops[1].date, ops[1].time), (d("2025-03-13"), t("09:15")));
}

#[test]
fn test_unparsable_explicit_timestamp_falls_back_to_synthesis() {
    let window = auto_window()
        .with_mobilization_at("garbage")
        .with_demobilization_at("");
    let ops = generate(&window, EventClass::Other).unwrap();

    assert_eq!((ops[0].date, ops[0].time), (d("2025-03-10"), t("04:00")));
    assert_eq!((ops[1].date, ops[1].time), (d("2025-03-12"), t("22:00")));
}

#[test]
fn test_manual_uses_event_bounds_and_ignores_explicit() {
    let window = EventWindow::new(
        d("2025-03-10"),
        t("08:00"),
        d("2025-03-12"),
        t("18:00"),
        EventOrigin::Manual,
    )
    .with_mobilization_at("2025-03-01T00:00:00");
    let ops = generate(&window, EventClass::Other).unwrap();

    assert_eq!((ops[0].date, ops[0].time), (d("2025-03-10"), t("08:00")));
    assert_eq!((ops[1].date, ops[1].time), (d("2025-03-12"), t("18:00")));
}

#[test]
fn test_synthesized_instants_carry_the_day() {
    let window = EventWindow::new(
        d("2025-03-01"),
        t("02:00"),
        d("2025-03-31"),
        t("21:30"),
        EventOrigin::Auto,
    );
    let ops = generate(&window, EventClass::Other).unwrap();

    assert_eq!((ops[0].date, ops[0].time), (d("2025-02-28"), t("22:00")));
    assert_eq!((ops[1].date, ops[1].time), (d("2025-04-01"), t("01:30")));
}

#[test]
fn test_custom_buffer_hours() {
    let ops = generate_with_buffer(&auto_window(), EventClass::Other, 2).unwrap();
    assert_eq!(ops[0].time, t("06:00"));
    assert_eq!(ops[1].time, t("20:00"));
}

#[test]
fn test_single_missing_anchor_borrows_the_other() {
    let mut window = auto_window();
    window.end_time = None;
    let ops = generate(&window, EventClass::Other).unwrap();
    assert_eq!((ops[1].date, ops[1].time), (d("2025-03-12"), t("12:00")));
}

#[test]
fn test_missing_both_anchors_is_an_input_error() {
    let mut window = auto_window();
    window.start_time = None;
    window.end_time = None;

    let err = generate(&window, EventClass::Other).unwrap_err();
    assert!(matches!(err, AppError::Input(_)));
}

#[test]
fn test_reversed_window_is_an_input_error() {
    let window = EventWindow::new(
        d("2025-03-12"),
        t("08:00"),
        d("2025-03-10"),
        t("18:00"),
        EventOrigin::Auto,
    );
    assert!(matches!(
        generate(&window, EventClass::Other),
        Err(AppError::Input(_))
    ));
}

#[test]
fn test_generation_is_deterministic_and_ordered() {
    let window = auto_window().with_recurrence(RecurrencePolicy::daily(t("19:00")));
    let first = generate(&window, EventClass::SingleOccurrence).unwrap();
    let second = generate(&window, EventClass::SingleOccurrence).unwrap();
    assert_eq!(first, second);

    let cleanings = &first[1..first.len() - 1];
    assert!(cleanings.windows(2).all(|w| w[0].date < w[1].date));
}
