//! Test helpers for engine tests
//!
//! Engines on a manual clock, with an observer that records what happened.

use crate::engine::{Engine, FrameEvent, ManualClock, NoopObserver};
use std::cell::RefCell;
use std::rc::Rc;

/// Clock start used by every helper engine, so deadlines are easy to read
pub const T0: u64 = 1_000;

/// Engine on a manual clock that starts at [`T0`]
pub fn manual_engine() -> (Engine, ManualClock) {
    let clock = ManualClock::new(T0);
    let engine = Engine::builder()
        .clock(clock.clone())
        .observer(NoopObserver)
        .build();
    (engine, clock)
}

/// Engine that logs every event as `"<kind> <name>"`
pub fn recording_engine() -> (Engine, Rc<RefCell<Vec<String>>>) {
    let log = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&log);
    let engine = Engine::builder()
        .clock(ManualClock::new(T0))
        .observer(move |event: &FrameEvent<'_>| {
            let line = match event.name() {
                Some(name) => format!("{} {}", event.kind(), name),
                None => event.kind().to_string(),
            };
            sink.borrow_mut().push(line);
        })
        .build();
    (engine, log)
}

/// Names of the frames on the chain, root first
pub fn chain_names(engine: &Engine) -> Vec<String> {
    engine.frames().iter().map(|f| f.name.clone()).collect()
}
