//! Execution frames

use super::step::Step;
use serde::{Deserialize, Serialize};

/// Execution frame - one per logical function on the call chain
///
/// Frames live in the engine's chain vector: the frame at index `i + 1` is the
/// only child of the frame at index `i`, so parent links are implied by position
/// and a frame owns its nested calls through the tail of the vector.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Frame<L> {
    /// Identity of the logical function owning this frame
    pub name: String,

    /// Step the function is paused at, or a terminal sentinel
    pub step: Step,

    /// Step to continue at once the outstanding child succeeds
    pub next_step: Option<u8>,

    /// Absolute deadline (clock ms) before which the chain must not resume
    pub delay_until: Option<u64>,

    /// Values the function body saved across a suspension
    pub locals: L,
}

impl<L: Default> Frame<L> {
    pub fn new(name: impl Into<String>, first_step: u8) -> Self {
        Frame {
            name: name.into(),
            step: Step::At(first_step),
            next_step: None,
            delay_until: None,
            locals: L::default(),
        }
    }
}

/// Serializable view of one frame, independent of the locals type
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameSnapshot {
    pub name: String,
    pub step: Step,
    pub next_step: Option<u8>,
    pub delay_until: Option<u64>,
    /// Whether this is the frame currently executing
    pub current: bool,
}

impl<L> Frame<L> {
    pub(crate) fn snapshot(&self, current: bool) -> FrameSnapshot {
        FrameSnapshot {
            name: self.name.clone(),
            step: self.step,
            next_step: self.next_step,
            delay_until: self.delay_until,
            current,
        }
    }
}
