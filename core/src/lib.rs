pub mod cli;
pub mod config;
pub mod demo;
pub mod driver;
pub mod engine;
pub mod message;

// Re-export the engine API for convenience
pub use driver::{Driver, DriverError, Outcome, Poll};
pub use engine::{Engine, EngineBuilder, EngineError, Scratch, Step};
