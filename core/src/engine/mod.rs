//! # Engine - Resumable Step Functions
//!
//! Lets a single-threaded device run long, nested operations ("power up the
//! radio, wait, send, wait for the ack") without ever blocking its main loop.
//!
//! ## Core Principles
//!
//! 1. **Heap-held call chain**: All suspended state lives in `Vec<Frame>`, never
//!    on the native stack. Suspending is an ordinary function return.
//! 2. **Step dispatch**: A function body calls `begin`, matches on the returned
//!    step, and leaves through `suspend` or `end`.
//! 3. **Identity by name**: `begin` with the current frame's name is a resume;
//!    any other name is a nested call from the current frame.
//! 4. **Upward propagation**: Completion, failure and requested delays travel
//!    towards the root one level per ascend.
//!
//! ## Example
//!
//! ```rust
//! use cadence_core::engine::{Engine, EngineError, Step};
//!
//! const START: u8 = 1;
//! const DONE: u8 = 2;
//!
//! fn blink(engine: &mut Engine) -> Result<bool, EngineError> {
//!     match engine.begin("blink", START)? {
//!         Step::At(START) => engine.suspend(DONE, 250),
//!         _ => engine.end(true),
//!     }
//! }
//!
//! let mut engine: Engine = Engine::new();
//! blink(&mut engine).unwrap();
//! assert_eq!(engine.status(), Some(Step::At(DONE)));
//! assert!(engine.reset_delay().is_some());
//! blink(&mut engine).unwrap();
//! assert_eq!(engine.status(), Some(Step::Success));
//! ```

pub mod chain;
pub mod clock;
pub mod errors;
pub mod observer;
pub mod types;

#[cfg(test)]
mod tests;

// Re-export commonly used items
pub use chain::{Engine, EngineBuilder, DEFAULT_MAX_DEPTH};
pub use clock::{Clock, ManualClock, SystemClock};
pub use errors::EngineError;
pub use observer::{NoopObserver, Observer, TracingObserver};
pub use types::{Frame, FrameEvent, FrameSnapshot, Scratch, ScratchSlot, Step};
