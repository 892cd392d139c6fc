//! Driving loop
//!
//! The driver repeatedly invokes a top-level step function, reads the engine's
//! status after each pass, and honors the deadline the chain requested before
//! invoking it again. It never inspects frames below the root.


use crate::config::DriverConfig;
use crate::engine::{Engine, EngineError, Step};

/// How a run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Succeeded,
    Failed,
}

/// Result of one pass
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Poll {
    /// The entry function paused at `step`; call again once `wake_at` is reached
    Pending { step: u8, wake_at: Option<u64> },
    /// The entry function finished; the engine has been reset
    Done(Outcome),
}

/// Errors raised by the driver
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DriverError {
    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error("gave up after {passes} passes without a terminal status")]
    PassLimit { passes: u64 },

    #[error("entry function returned without calling begin()")]
    NoFrame,

    #[error("entry function returned while '{name}' was still current")]
    Unbalanced { name: String },
}

/// Polls a top-level step function until it finishes
#[derive(Debug, Clone)]
pub struct Driver {
    max_passes: u64,
    passes: u64,
}

impl Driver {
    pub fn new(config: &DriverConfig) -> Self {
        Self {
            max_passes: config.max_passes,
            passes: 0,
        }
    }

    /// Passes made since the current run started
    pub fn passes(&self) -> u64 {
        self.passes
    }

    /// Run one pass of `entry` and report where the chain stands
    ///
    /// On error the engine is reset, so the next pass starts a fresh run.
    pub fn poll<L, F>(&mut self, engine: &mut Engine<L>, entry: F) -> Result<Poll, DriverError>
    where
        L: Default,
        F: FnMut(&mut Engine<L>) -> Result<bool, EngineError>,
    {
        self.passes += 1;
        let result = self.pass(engine, entry);
        if let Err(err) = &result {
            tracing::warn!(passes = self.passes, %err, "run aborted");
            engine.reset();
        }
        result
    }

    fn pass<L, F>(&self, engine: &mut Engine<L>, mut entry: F) -> Result<Poll, DriverError>
    where
        L: Default,
        F: FnMut(&mut Engine<L>) -> Result<bool, EngineError>,
    {
        entry(engine)?;

        if !engine.at_root() {
            // cursor > 0, so a current frame exists
            if let Some(name) = engine.current_name() {
                return Err(DriverError::Unbalanced {
                    name: name.to_string(),
                });
            }
        }

        let outcome = match engine.status() {
            None => return Err(DriverError::NoFrame),
            Some(Step::At(step)) => {
                let wake_at = engine.reset_delay();
                tracing::trace!(pass = self.passes, step, ?wake_at, "pass suspended");
                return Ok(Poll::Pending { step, wake_at });
            }
            Some(Step::Success) => Outcome::Succeeded,
            Some(Step::Failure) => Outcome::Failed,
        };

        tracing::debug!(passes = self.passes, ?outcome, "run finished");
        engine.reset();
        Ok(Poll::Done(outcome))
    }

    /// Poll `entry` until it finishes, waiting on the engine's clock between passes
    pub fn run_until_done<L, F>(
        &mut self,
        engine: &mut Engine<L>,
        mut entry: F,
    ) -> Result<Outcome, DriverError>
    where
        L: Default,
        F: FnMut(&mut Engine<L>) -> Result<bool, EngineError>,
    {
        self.passes = 0;
        loop {
            if self.passes >= self.max_passes {
                tracing::warn!(passes = self.passes, "run did not finish");
                engine.reset();
                return Err(DriverError::PassLimit {
                    passes: self.passes,
                });
            }

            match self.poll(engine, &mut entry)? {
                Poll::Done(outcome) => return Ok(outcome),
                Poll::Pending {
                    wake_at: Some(deadline),
                    ..
                } => engine.clock().wait_until(deadline),
                Poll::Pending { wake_at: None, .. } => {}
            }
        }
    }
}

impl Default for Driver {
    fn default() -> Self {
        Self::new(&DriverConfig::default())
    }
}
