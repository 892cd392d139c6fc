//! Per-call local state
//!
//! Function bodies save whatever they need to survive a suspension into the
//! current frame's locals and read it back after resuming. The record type is
//! chosen by the application; [`Scratch`] is the default record with one slot
//! per primitive kind.

use serde::{Deserialize, Serialize};

/// Default local-state record: one integer, one byte, one wide counter, one text
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scratch {
    pub int: i32,
    pub byte: u8,
    pub wide: u64,
    pub text: String,
}

/// A value type that owns exactly one slot of [`Scratch`]
///
/// Used by `Engine::set_state` / `Engine::get_state` to pick the slot from the
/// value's type.
pub trait ScratchSlot: Sized {
    fn store(self, scratch: &mut Scratch);
    fn load(scratch: &Scratch) -> Self;
}

impl ScratchSlot for i32 {
    fn store(self, scratch: &mut Scratch) {
        scratch.int = self;
    }

    fn load(scratch: &Scratch) -> Self {
        scratch.int
    }
}

impl ScratchSlot for u8 {
    fn store(self, scratch: &mut Scratch) {
        scratch.byte = self;
    }

    fn load(scratch: &Scratch) -> Self {
        scratch.byte
    }
}

impl ScratchSlot for u64 {
    fn store(self, scratch: &mut Scratch) {
        scratch.wide = self;
    }

    fn load(scratch: &Scratch) -> Self {
        scratch.wide
    }
}

impl ScratchSlot for String {
    fn store(self, scratch: &mut Scratch) {
        scratch.text = self;
    }

    fn load(scratch: &Scratch) -> Self {
        scratch.text.clone()
    }
}
