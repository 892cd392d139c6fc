//! Step markers
//!
//! A frame is always paused at an application-defined step number or has
//! reached one of the two terminal sentinels.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Position of a frame within its function body
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "t", content = "v")]
pub enum Step {
    /// Application-defined step number
    At(u8),
    /// The function finished successfully (absorbing)
    Success,
    /// The function failed, or a nested call failed (absorbing)
    Failure,
}

impl Step {
    /// True once the owning frame has finished, successfully or not
    pub fn is_terminal(self) -> bool {
        matches!(self, Step::Success | Step::Failure)
    }

    /// The step number, if the frame has not finished
    pub fn number(self) -> Option<u8> {
        match self {
            Step::At(n) => Some(n),
            Step::Success | Step::Failure => None,
        }
    }
}

impl From<u8> for Step {
    fn from(n: u8) -> Self {
        Step::At(n)
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Step::At(n) => write!(f, "step {}", n),
            Step::Success => f.write_str("success"),
            Step::Failure => f.write_str("failure"),
        }
    }
}
