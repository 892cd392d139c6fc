//! Engine error types
//!
//! Logical failure of a step function is not an error: it is the
//! `Step::Failure` sentinel. These errors cover API misuse and resource limits.

/// Errors raised by the engine
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EngineError {
    /// suspend/end/locals were used before any `begin`
    #[error("no active frame: begin() must be called before using the engine")]
    NoActiveFrame,

    /// Entering one more nested call would exceed the configured chain depth
    #[error("cannot enter '{name}': call chain is already {max_depth} frames deep")]
    DepthExceeded { name: String, max_depth: usize },
}
