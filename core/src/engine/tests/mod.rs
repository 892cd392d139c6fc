//! Tests for the engine
//!
//! Organized by primitive / feature area

mod delay_tests;
mod helpers;
mod observer_tests;
mod suspend_tests;
