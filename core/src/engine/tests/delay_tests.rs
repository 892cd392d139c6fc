//! Tests for delay requests and their propagation towards the root

use super::helpers::{manual_engine, T0};
use crate::engine::Step;

#[test]
fn test_nested_delay_lands_on_parent() {
    let (mut engine, _clock) = manual_engine();

    // A at step 1 calls B; B suspends to step 2 with a 500 ms delay
    assert_eq!(engine.begin("A", 1).unwrap(), Step::At(1));
    assert_eq!(engine.begin("B", 1).unwrap(), Step::At(1));
    engine.suspend(2, 500).unwrap();

    assert_eq!(engine.current_name(), Some("A"));
    assert_eq!(engine.frames()[0].delay_until, Some(T0 + 500));
    assert_eq!(engine.frames()[1].delay_until, None);

    // A is resumed at its original step, B at step 2
    assert_eq!(engine.begin("A", 1).unwrap(), Step::At(1));
    assert_eq!(engine.begin("B", 1).unwrap(), Step::At(2));
}

#[test]
fn test_delay_bubbles_one_level_per_ascend() {
    let (mut engine, _clock) = manual_engine();
    engine.begin("A", 1).unwrap();
    engine.begin("B", 1).unwrap();
    engine.begin("C", 1).unwrap();

    // First ascend: C -> B
    engine.suspend(2, 100).unwrap();
    let delays: Vec<_> = engine.frames().iter().map(|f| f.delay_until).collect();
    assert_eq!(delays, vec![None, Some(T0 + 100), None]);

    // Second ascend: B -> A
    engine.suspend(3, 0).unwrap();
    let delays: Vec<_> = engine.frames().iter().map(|f| f.delay_until).collect();
    assert_eq!(delays, vec![Some(T0 + 100), None, None]);

    assert!(engine.at_root());
    assert_eq!(engine.reset_delay(), Some(T0 + 100));
}

#[test]
fn test_delay_is_measured_from_current_clock() {
    let (mut engine, clock) = manual_engine();
    engine.begin("A", 1).unwrap();
    clock.advance(250);

    engine.suspend(2, 40).unwrap();

    assert_eq!(engine.reset_delay(), Some(T0 + 250 + 40));
}

#[test]
fn test_reset_delay_takes_and_clears() {
    let (mut engine, _clock) = manual_engine();
    engine.begin("A", 1).unwrap();
    engine.suspend(2, 10).unwrap();

    assert_eq!(engine.reset_delay(), Some(T0 + 10));
    assert_eq!(engine.reset_delay(), None);
}

#[test]
fn test_zero_delay_requests_nothing() {
    let (mut engine, _clock) = manual_engine();
    engine.begin("A", 1).unwrap();
    engine.begin("B", 1).unwrap();
    engine.suspend(2, 0).unwrap();
    engine.suspend(2, 0).unwrap();

    assert!(engine.frames().iter().all(|f| f.delay_until.is_none()));
    assert_eq!(engine.reset_delay(), None);
}

#[test]
fn test_yield_with_delay_at_root() {
    let (mut engine, _clock) = manual_engine();
    engine.begin("A", 3).unwrap();

    engine.suspend_for(75).unwrap();

    assert_eq!(engine.status(), Some(Step::At(3)));
    assert_eq!(engine.reset_delay(), Some(T0 + 75));
}

#[test]
fn test_delay_of_finished_child_still_reaches_parent() {
    let (mut engine, _clock) = manual_engine();
    engine.begin("A", 1).unwrap();
    engine.begin("B", 1).unwrap();
    engine.begin("C", 1).unwrap();
    engine.suspend(2, 300).unwrap();

    // B finishes while holding C's deadline; A inherits it as B is consumed
    engine.end(true).unwrap();

    assert_eq!(engine.depth(), 1);
    assert_eq!(engine.reset_delay(), Some(T0 + 300));
}
