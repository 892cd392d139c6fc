//! Type definitions for the engine
//!
//! - Step markers (Step)
//! - Execution frames (Frame, FrameSnapshot)
//! - Local state records (Scratch, ScratchSlot)
//! - Lifecycle events (FrameEvent)

pub mod event;
pub mod frame;
pub mod locals;
pub mod step;

// Re-export all types for convenient access
pub use event::FrameEvent;
pub use frame::{Frame, FrameSnapshot};
pub use locals::{Scratch, ScratchSlot};
pub use step::Step;
