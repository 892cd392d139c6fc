//! Tests for suspend() and yield_now()

use super::helpers::manual_engine;
use crate::engine::Step;

#[test]
fn test_suspend_without_child_applies_next_step() {
    let (mut engine, _clock) = manual_engine();
    engine.begin("A", 1).unwrap();

    assert!(engine.suspend(2, 0).unwrap());

    let frame = &engine.frames()[0];
    assert_eq!(frame.step, Step::At(2));
    assert_eq!(frame.next_step, None);
}

#[test]
fn test_suspend_with_outstanding_child_defers_next_step() {
    let (mut engine, _clock) = manual_engine();
    engine.begin("A", 1).unwrap();
    engine.begin("B", 1).unwrap();
    engine.suspend(2, 0).unwrap();

    assert!(engine.suspend(6, 0).unwrap());

    let frame = &engine.frames()[0];
    assert_eq!(frame.step, Step::At(1));
    assert_eq!(frame.next_step, Some(6));
}

#[test]
fn test_parent_moves_to_pending_next_step_when_child_succeeds() {
    let (mut engine, _clock) = manual_engine();

    // Pass 1: A waits on B, planning to continue at step 6
    engine.begin("A", 1).unwrap();
    engine.begin("B", 1).unwrap();
    engine.suspend(2, 0).unwrap();
    engine.suspend(6, 0).unwrap();

    // Pass 2: B finishes; A is moved to exactly step 6
    engine.begin("A", 1).unwrap();
    engine.begin("B", 1).unwrap();
    assert!(engine.end(true).unwrap());

    assert_eq!(engine.current_name(), Some("A"));
    assert_eq!(engine.status(), Some(Step::At(6)));
    assert_eq!(engine.depth(), 1);
}

#[test]
fn test_child_finishing_in_same_pass_lets_parent_choose_next_step() {
    let (mut engine, _clock) = manual_engine();
    engine.begin("A", 1).unwrap();
    engine.begin("B", 1).unwrap();
    engine.end(true).unwrap();

    // No continuation was pending, so A keeps its step until it suspends
    assert_eq!(engine.status(), Some(Step::At(1)));
    engine.suspend(3, 0).unwrap();
    assert_eq!(engine.status(), Some(Step::At(3)));
}

#[test]
fn test_yield_keeps_same_step() {
    let (mut engine, _clock) = manual_engine();
    engine.begin("A", 4).unwrap();

    assert!(engine.yield_now().unwrap());

    assert_eq!(engine.begin("A", 4).unwrap(), Step::At(4));
}

#[test]
fn test_yield_with_outstanding_child_resumes_same_step_after_child() {
    let (mut engine, _clock) = manual_engine();
    engine.begin("A", 4).unwrap();
    engine.begin("B", 1).unwrap();
    engine.yield_now().unwrap();
    engine.yield_now().unwrap();

    engine.begin("A", 4).unwrap();
    engine.begin("B", 1).unwrap();
    engine.end(true).unwrap();

    assert_eq!(engine.status(), Some(Step::At(4)));
}

#[test]
fn test_suspend_at_root_stays_at_root() {
    let (mut engine, _clock) = manual_engine();
    engine.begin("A", 1).unwrap();

    engine.suspend(2, 0).unwrap();
    engine.suspend(3, 0).unwrap();

    assert!(engine.at_root());
    assert_eq!(engine.current_name(), Some("A"));
    assert_eq!(engine.status(), Some(Step::At(3)));
}

#[test]
fn test_suspend_reports_failed_parent() {
    let (mut engine, _clock) = manual_engine();

    // Pass 1: A -> B -> C, all pause
    engine.begin("A", 1).unwrap();
    engine.begin("B", 1).unwrap();
    engine.begin("C", 1).unwrap();
    engine.suspend(2, 0).unwrap();
    engine.suspend(2, 0).unwrap();
    engine.suspend(2, 0).unwrap();

    // Pass 2: C fails, B ignores the result and suspends anyway
    engine.begin("A", 1).unwrap();
    engine.begin("B", 1).unwrap();
    engine.begin("C", 2).unwrap();
    assert!(!engine.end(false).unwrap());
    assert_eq!(engine.status(), Some(Step::Failure));

    assert!(!engine.suspend(9, 0).unwrap());
    assert_eq!(engine.current_name(), Some("A"));
    assert_eq!(engine.status(), Some(Step::Failure));
}
