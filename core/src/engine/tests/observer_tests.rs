//! Tests for frame events, tracing and snapshots

use super::helpers::{manual_engine, recording_engine, T0};
use crate::engine::{Engine, FrameEvent, FrameSnapshot, Step, TracingObserver};

#[test]
fn test_events_follow_a_nested_pass() {
    let (mut engine, log) = recording_engine();

    engine.begin("A", 1).unwrap();
    engine.begin("B", 1).unwrap();
    engine.suspend(2, 0).unwrap();
    engine.suspend(3, 0).unwrap();
    engine.begin("A", 1).unwrap();
    engine.begin("B", 1).unwrap();
    engine.end(false).unwrap();

    assert_eq!(
        *log.borrow(),
        vec![
            "created A",
            "created B",
            "suspended B",
            "ascended A",
            "suspended A",
            "resumed A",
            "resumed B",
            "failed B",
            "ascended A",
            "consumed B",
        ]
    );
}

#[test]
fn test_discard_and_reset_are_reported() {
    let (mut engine, log) = recording_engine();

    engine.begin("A", 1).unwrap();
    engine.begin("B", 1).unwrap();
    engine.suspend(2, 0).unwrap();
    engine.begin("C", 1).unwrap();
    engine.reset();

    let log = log.borrow();
    assert!(log.contains(&"discarded B".to_string()));
    assert_eq!(log.last().map(String::as_str), Some("reset"));
}

#[test]
fn test_tracing_observer_handles_every_event() {
    let mut engine: Engine = Engine::builder().observer(TracingObserver).build();

    engine.begin("A", 1).unwrap();
    engine.begin("B", 1).unwrap();
    engine.suspend(2, 0).unwrap();
    engine.begin("C", 1).unwrap();
    engine.end(false).unwrap();
    engine.reset();

    assert!(engine.is_empty());
}

#[test]
fn test_event_serializes_with_tag() {
    let event = FrameEvent::Suspended {
        name: "radio",
        step: Step::At(3),
        next_step: Some(4),
    };

    let json = serde_json::to_value(event).unwrap();

    assert_eq!(json["event"], "suspended");
    assert_eq!(json["name"], "radio");
    assert_eq!(json["next_step"], 4);
    assert_eq!(event.to_string(), "suspend state radio at step 3, next step 4");
}

#[test]
fn test_snapshot_round_trip() {
    let (mut engine, _clock) = manual_engine();
    engine.begin("A", 1).unwrap();
    engine.begin("B", 1).unwrap();
    engine.suspend(2, 500).unwrap();
    engine.suspend(6, 0).unwrap();

    let snapshot = engine.snapshot();
    let json = serde_json::to_string(&snapshot).unwrap();
    let restored: Vec<FrameSnapshot> = serde_json::from_str(&json).unwrap();

    assert_eq!(restored, snapshot);
    assert_eq!(
        restored[0],
        FrameSnapshot {
            name: "A".to_string(),
            step: Step::At(1),
            next_step: Some(6),
            delay_until: Some(T0 + 500),
            current: true,
        }
    );
    assert!(!restored[1].current);
}
