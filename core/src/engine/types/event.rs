//! Frame lifecycle events reported to observers

use super::step::Step;
use serde::Serialize;
use std::fmt;

/// Something that happened to the frame chain
///
/// Events borrow the frame name so that observers which ignore them cost nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum FrameEvent<'a> {
    /// A new frame entered the chain at its first step
    Created {
        name: &'a str,
        step: Step,
        depth: usize,
    },
    /// An existing frame became current again
    Resumed {
        name: &'a str,
        step: Step,
        depth: usize,
    },
    /// The current frame paused
    Suspended {
        name: &'a str,
        step: Step,
        next_step: Option<u8>,
    },
    /// Control moved up to this frame
    Ascended { name: &'a str, depth: usize },
    /// The frame called `end(true)`
    Completed { name: &'a str },
    /// The frame called `end(false)`
    Failed { name: &'a str },
    /// A parent observed its finished child and dropped it
    Consumed {
        parent: &'a str,
        name: &'a str,
        step: Step,
    },
    /// A different nested call replaced an unfinished child
    Discarded { name: &'a str, step: Step },
    /// The whole chain was released
    Reset { frames: usize },
}

impl FrameEvent<'_> {
    /// Short event name, as used in the serialized form
    pub fn kind(&self) -> &'static str {
        match self {
            FrameEvent::Created { .. } => "created",
            FrameEvent::Resumed { .. } => "resumed",
            FrameEvent::Suspended { .. } => "suspended",
            FrameEvent::Ascended { .. } => "ascended",
            FrameEvent::Completed { .. } => "completed",
            FrameEvent::Failed { .. } => "failed",
            FrameEvent::Consumed { .. } => "consumed",
            FrameEvent::Discarded { .. } => "discarded",
            FrameEvent::Reset { .. } => "reset",
        }
    }

    /// Name of the frame the event is about, if any
    pub fn name(&self) -> Option<&str> {
        match self {
            FrameEvent::Created { name, .. }
            | FrameEvent::Resumed { name, .. }
            | FrameEvent::Suspended { name, .. }
            | FrameEvent::Ascended { name, .. }
            | FrameEvent::Completed { name }
            | FrameEvent::Failed { name }
            | FrameEvent::Consumed { name, .. }
            | FrameEvent::Discarded { name, .. } => Some(*name),
            FrameEvent::Reset { .. } => None,
        }
    }
}

impl fmt::Display for FrameEvent<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FrameEvent::Created { name, step, depth } => {
                write!(f, "new state {} at {} (depth {})", name, step, depth)
            }
            FrameEvent::Resumed { name, step, depth } => {
                write!(f, "resume state {} at {} (depth {})", name, step, depth)
            }
            FrameEvent::Suspended {
                name,
                step,
                next_step,
            } => match next_step {
                Some(next) => write!(f, "suspend state {} at {}, next step {}", name, step, next),
                None => write!(f, "suspend state {} at {}", name, step),
            },
            FrameEvent::Ascended { name, depth } => {
                write!(f, "pop to parent state {} (depth {})", name, depth)
            }
            FrameEvent::Completed { name } => write!(f, "end state {}", name),
            FrameEvent::Failed { name } => write!(f, "step failed: {}", name),
            FrameEvent::Consumed { parent, name, step } => {
                write!(f, "delete state {} ({}) under {}", name, step, parent)
            }
            FrameEvent::Discarded { name, step } => {
                write!(f, "discard unfinished state {} at {}", name, step)
            }
            FrameEvent::Reset { frames } => write!(f, "reset, released {} states", frames),
        }
    }
}
