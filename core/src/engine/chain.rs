//! The frame chain and its begin/suspend/end primitives
//!
//! `frames[0]` is the root. Every other frame is the only child of the frame
//! right before it. `cursor` indexes the current frame; frames past the cursor
//! are dormant nested calls that are still waiting to be resumed.

use super::clock::{Clock, SystemClock};
use super::errors::EngineError;
use super::observer::{Observer, TracingObserver};
use super::types::{Frame, FrameEvent, FrameSnapshot, Scratch, ScratchSlot, Step};

/// Default bound on nested frames
pub const DEFAULT_MAX_DEPTH: usize = 16;

/* ===================== Engine ===================== */

/// Execution-state engine
///
/// Emulates a call stack of resumable step functions. Each function body calls
/// [`Engine::begin`] on entry, dispatches on the returned step, and leaves via
/// [`Engine::suspend`] or [`Engine::end`]. The next invocation of the same entry
/// point jumps straight to the saved step.
pub struct Engine<L = Scratch> {
    frames: Vec<Frame<L>>,
    cursor: usize,
    max_depth: usize,
    clock: Box<dyn Clock>,
    observer: Box<dyn Observer>,
}

impl<L: Default> Engine<L> {
    /// Engine on the system clock, tracing events, default depth bound
    pub fn new() -> Self {
        Self::builder().build()
    }

    pub fn builder() -> EngineBuilder<L> {
        EngineBuilder::new()
    }

    /* ===================== Entry ===================== */

    /// Enter or resume the logical function `name`
    ///
    /// Returns the step the function body should run. A first entry starts at
    /// `first_step`; a resume returns the step saved by the last suspension.
    /// Entering a function other than the current one or its outstanding child
    /// replaces that child, discarding its progress.
    pub fn begin(&mut self, name: &str, first_step: u8) -> Result<Step, EngineError> {
        let cursor = self.cursor;

        let Some(current) = self.frames.get(cursor) else {
            // Empty chain: this is the root
            self.frames.push(Frame::new(name, first_step));
            self.cursor = 0;
            self.observer.on_event(&FrameEvent::Created {
                name,
                step: Step::At(first_step),
                depth: 0,
            });
            return Ok(Step::At(first_step));
        };

        if current.name == name {
            // Same logical call resuming after a suspension
            let step = current.step;
            self.observer.on_event(&FrameEvent::Resumed {
                name,
                step,
                depth: cursor,
            });
            return Ok(step);
        }

        let child = cursor + 1;
        if let Some(existing) = self.frames.get(child) {
            if existing.name == name {
                let step = existing.step;
                self.cursor = child;
                self.observer.on_event(&FrameEvent::Resumed {
                    name,
                    step,
                    depth: child,
                });
                return Ok(step);
            }
        }

        if child >= self.max_depth {
            return Err(EngineError::DepthExceeded {
                name: name.to_string(),
                max_depth: self.max_depth,
            });
        }

        if let Some(abandoned) = self.frames.get(child) {
            self.observer.on_event(&FrameEvent::Discarded {
                name: &abandoned.name,
                step: abandoned.step,
            });
        }
        self.frames.truncate(child);
        self.frames.push(Frame::new(name, first_step));
        self.cursor = child;
        self.observer.on_event(&FrameEvent::Created {
            name,
            step: Step::At(first_step),
            depth: child,
        });

        Ok(Step::At(first_step))
    }

    /* ===================== Exit ===================== */

    /// Pause the current function and continue at `next_step` later
    ///
    /// If a nested call is still outstanding, `next_step` takes effect once it
    /// succeeds; otherwise it applies immediately. A nonzero `delay_ms` asks the
    /// driver not to resume before `now + delay_ms`. Returns `false` if the
    /// frame control returns to has failed.
    pub fn suspend(&mut self, next_step: u8, delay_ms: u64) -> Result<bool, EngineError> {
        self.pause(Some(next_step), delay_ms)
    }

    /// Yield back to the driver and resume later at the same step
    pub fn yield_now(&mut self) -> Result<bool, EngineError> {
        self.suspend_for(0)
    }

    /// Resume later at the same step, not before `delay_ms` from now
    pub fn suspend_for(&mut self, delay_ms: u64) -> Result<bool, EngineError> {
        let current = self.current().ok_or(EngineError::NoActiveFrame)?;
        let next_step = current.step.number();
        self.pause(next_step, delay_ms)
    }

    /// Finish the current function with `status` and return to the caller
    ///
    /// The parent consumes the finished frame during the transition check.
    /// Returns `status` unchanged.
    pub fn end(&mut self, status: bool) -> Result<bool, EngineError> {
        let frame = self
            .frames
            .get_mut(self.cursor)
            .ok_or(EngineError::NoActiveFrame)?;

        // Terminal steps are absorbing
        if !frame.step.is_terminal() {
            frame.step = if status { Step::Success } else { Step::Failure };
            frame.next_step = None;
        }

        let event = if status {
            FrameEvent::Completed { name: &frame.name }
        } else {
            FrameEvent::Failed { name: &frame.name }
        };
        self.observer.on_event(&event);

        self.ascend();
        self.transition();
        Ok(status)
    }

    fn pause(&mut self, next_step: Option<u8>, delay_ms: u64) -> Result<bool, EngineError> {
        let has_child = self.frames.len() > self.cursor + 1;
        let frame = self
            .frames
            .get_mut(self.cursor)
            .ok_or(EngineError::NoActiveFrame)?;

        if !frame.step.is_terminal() {
            match next_step {
                // Nothing to wait for: move on right away
                Some(next) if !has_child => {
                    frame.step = Step::At(next);
                    frame.next_step = None;
                }
                next => frame.next_step = next,
            }
        }

        self.observer.on_event(&FrameEvent::Suspended {
            name: &frame.name,
            step: frame.step,
            next_step: frame.next_step,
        });

        self.ascend();

        if delay_ms > 0 {
            let deadline = self.clock.now_ms().saturating_add(delay_ms);
            self.frames[self.cursor].delay_until = Some(deadline);
        }

        self.transition();
        Ok(self.frames[self.cursor].step != Step::Failure)
    }

    /// Make the parent current; the root stays current
    fn ascend(&mut self) {
        if self.cursor > 0 {
            self.cursor -= 1;
            self.observer.on_event(&FrameEvent::Ascended {
                name: &self.frames[self.cursor].name,
                depth: self.cursor,
            });
        }
    }

    /// Inspect the current frame's child after an ascend
    ///
    /// Moves the child's deadline up, then consumes the child if it finished.
    /// Returns true if the child was consumed.
    fn transition(&mut self) -> bool {
        let cursor = self.cursor;
        if cursor + 1 >= self.frames.len() {
            return false;
        }

        let (head, tail) = self.frames.split_at_mut(cursor + 1);
        let parent = &mut head[cursor];
        let child = &mut tail[0];

        if let Some(deadline) = child.delay_until.take() {
            parent.delay_until = Some(deadline);
        }

        match child.step {
            Step::At(_) => return false,
            Step::Failure => {
                // Failure short-circuits whatever the parent planned next
                parent.step = Step::Failure;
            }
            Step::Success => {
                if let Some(next) = parent.next_step.take() {
                    if !parent.step.is_terminal() {
                        parent.step = Step::At(next);
                    }
                }
            }
        }

        self.observer.on_event(&FrameEvent::Consumed {
            parent: &parent.name,
            name: &child.name,
            step: child.step,
        });
        self.frames.truncate(cursor + 1);
        true
    }

    /* ===================== Locals ===================== */

    /// Replace the current frame's locals
    pub fn save(&mut self, locals: L) -> Result<(), EngineError> {
        self.current_mut()?.locals = locals;
        Ok(())
    }

    /// The current frame's locals
    pub fn locals(&self) -> Result<&L, EngineError> {
        self.current()
            .map(|f| &f.locals)
            .ok_or(EngineError::NoActiveFrame)
    }

    pub fn locals_mut(&mut self) -> Result<&mut L, EngineError> {
        Ok(&mut self.current_mut()?.locals)
    }

    /* ===================== Driver API ===================== */

    /// Step of the current frame, `None` if the chain is empty
    pub fn status(&self) -> Option<Step> {
        self.current().map(|f| f.step)
    }

    /// Take the current frame's pending deadline, leaving none behind
    pub fn reset_delay(&mut self) -> Option<u64> {
        self.frames
            .get_mut(self.cursor)
            .and_then(|f| f.delay_until.take())
    }

    /// Release the whole chain
    pub fn reset(&mut self) {
        let frames = self.frames.len();
        self.frames.clear();
        self.cursor = 0;
        self.observer.on_event(&FrameEvent::Reset { frames });
    }

    /* ===================== Inspection ===================== */

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Number of frames on the chain, dormant ones included
    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    /// True when the current frame is the root (or the chain is empty)
    pub fn at_root(&self) -> bool {
        self.cursor == 0
    }

    pub fn current_name(&self) -> Option<&str> {
        self.current().map(|f| f.name.as_str())
    }

    pub fn frames(&self) -> &[Frame<L>] {
        &self.frames
    }

    pub fn snapshot(&self) -> Vec<FrameSnapshot> {
        self.frames
            .iter()
            .enumerate()
            .map(|(i, f)| f.snapshot(i == self.cursor))
            .collect()
    }

    pub fn now_ms(&self) -> u64 {
        self.clock.now_ms()
    }

    pub fn clock(&self) -> &dyn Clock {
        self.clock.as_ref()
    }

    fn current(&self) -> Option<&Frame<L>> {
        self.frames.get(self.cursor)
    }

    fn current_mut(&mut self) -> Result<&mut Frame<L>, EngineError> {
        self.frames
            .get_mut(self.cursor)
            .ok_or(EngineError::NoActiveFrame)
    }
}

impl Engine<Scratch> {
    /// Save one scratch value for the current call; the slot follows from the type
    pub fn set_state<T: ScratchSlot>(&mut self, value: T) -> Result<(), EngineError> {
        value.store(&mut self.current_mut()?.locals);
        Ok(())
    }

    /// Restore a scratch value saved by `set_state` on this call
    pub fn get_state<T: ScratchSlot>(&self) -> Result<T, EngineError> {
        self.locals().map(T::load)
    }
}

impl<L: Default> Default for Engine<L> {
    fn default() -> Self {
        Self::new()
    }
}

impl<L: std::fmt::Debug> std::fmt::Debug for Engine<L> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine")
            .field("frames", &self.frames)
            .field("cursor", &self.cursor)
            .field("max_depth", &self.max_depth)
            .finish_non_exhaustive()
    }
}

/* ===================== Builder ===================== */

/// Builder for constructing an Engine
pub struct EngineBuilder<L = Scratch> {
    max_depth: usize,
    clock: Box<dyn Clock>,
    observer: Box<dyn Observer>,
    _locals: std::marker::PhantomData<L>,
}

impl<L: Default> EngineBuilder<L> {
    pub fn new() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            clock: Box::new(SystemClock::new()),
            observer: Box::new(TracingObserver),
            _locals: std::marker::PhantomData,
        }
    }

    /// Maximum number of frames on the chain (at least 1)
    pub fn max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth.max(1);
        self
    }

    pub fn clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    pub fn observer(mut self, observer: impl Observer + 'static) -> Self {
        self.observer = Box::new(observer);
        self
    }

    pub fn build(self) -> Engine<L> {
        Engine {
            frames: Vec::new(),
            cursor: 0,
            max_depth: self.max_depth,
            clock: self.clock,
            observer: self.observer,
        }
    }
}

impl<L: Default> Default for EngineBuilder<L> {
    fn default() -> Self {
        Self::new()
    }
}
