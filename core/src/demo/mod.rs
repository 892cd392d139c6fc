//! Radio send sequence built from resumable step functions
//!
//! `send_reading` powers the radio up, transmits a message, waits for the
//! acknowledgement and powers down again. Each stage is its own nested step
//! function; none of them ever blocks. Waits are requested from the driver
//! as delays.

pub mod radio;


use crate::config::Config;
use crate::driver::{Driver, DriverError, Outcome};
use crate::engine::{Clock, Engine, EngineError, Step};
use crate::message::{Message, MessageError};

pub use radio::{RadioAt, SimRadio, WARMUP_MS};

pub const STEP_START: u8 = 1;
pub const STEP_LISTEN: u8 = 2;
pub const STEP_SEND: u8 = 3;
pub const STEP_RECEIVE: u8 = 4;
pub const STEP_POWER: u8 = 5;
pub const STEP_END: u8 = 7;

pub const MAX_SEND_ATTEMPTS: u8 = 3;
pub const RETRY_DELAY_MS: u64 = 1_000;
pub const ACK_POLL_MS: u64 = 250;
pub const ACK_TIMEOUT_MS: u64 = 5_000;

/* ===================== Step Functions ===================== */

/// Top-level sequence: power up, transmit, await ack, power down
pub fn send_reading(
    engine: &mut Engine,
    radio: &mut SimRadio,
    message: &Message,
) -> Result<bool, EngineError> {
    match engine.begin("send_reading", STEP_POWER)? {
        Step::At(STEP_POWER) => {
            if !power_up(engine, radio)? {
                return engine.end(false);
            }
            engine.suspend(STEP_SEND, 0)
        }
        Step::At(STEP_SEND) => {
            if !transmit(engine, radio, message)? {
                radio.power_off();
                return engine.end(false);
            }
            engine.suspend(STEP_RECEIVE, 0)
        }
        Step::At(STEP_RECEIVE) => {
            if !await_ack(engine, radio)? {
                radio.power_off();
                return engine.end(false);
            }
            engine.suspend(STEP_END, 0)
        }
        Step::At(STEP_END) => {
            radio.power_off();
            engine.end(true)
        }
        step => unknown_step(engine, step),
    }
}

/// Switch the transceiver on and wait out its warm-up
pub fn power_up(engine: &mut Engine, radio: &mut SimRadio) -> Result<bool, EngineError> {
    match engine.begin("power_up", STEP_START)? {
        Step::At(STEP_START) => {
            radio.power_on(engine.now_ms());
            engine.suspend(STEP_LISTEN, WARMUP_MS)
        }
        Step::At(STEP_LISTEN) => {
            if radio.is_ready(engine.now_ms()) {
                return engine.end(true);
            }
            engine.suspend_for(WARMUP_MS / 5)
        }
        step => unknown_step(engine, step),
    }
}

/// Send the message, retrying a refused transmission after a pause
pub fn transmit(
    engine: &mut Engine,
    radio: &mut SimRadio,
    message: &Message,
) -> Result<bool, EngineError> {
    match engine.begin("transmit", STEP_SEND)? {
        Step::At(STEP_SEND) => {
            let mut link = RadioAt {
                radio,
                now_ms: engine.now_ms(),
            };
            match message.send(&mut link) {
                Ok(()) => engine.end(true),
                Err(MessageError::Empty) => {
                    tracing::error!("refusing to transmit an empty message");
                    engine.end(false)
                }
                Err(err) => {
                    let attempts = engine.get_state::<u8>()? + 1;
                    tracing::info!(attempt = attempts, %err, "transmission refused");
                    if attempts >= MAX_SEND_ATTEMPTS {
                        return engine.end(false);
                    }
                    engine.set_state(attempts)?;
                    engine.suspend(STEP_SEND, RETRY_DELAY_MS)
                }
            }
        }
        step => unknown_step(engine, step),
    }
}

/// Poll for the acknowledgement until it arrives or the wait times out
pub fn await_ack(engine: &mut Engine, radio: &mut SimRadio) -> Result<bool, EngineError> {
    match engine.begin("await_ack", STEP_START)? {
        Step::At(STEP_START) => {
            let now = engine.now_ms();
            engine.set_state(now)?;
            engine.suspend(STEP_RECEIVE, ACK_POLL_MS)
        }
        Step::At(STEP_RECEIVE) => {
            let now = engine.now_ms();
            if radio.ack_received(now) {
                return engine.end(true);
            }
            let started = engine.get_state::<u64>()?;
            if now.saturating_sub(started) >= ACK_TIMEOUT_MS {
                tracing::warn!(waited_ms = now - started, "no acknowledgement");
                return engine.end(false);
            }
            engine.suspend_for(ACK_POLL_MS)
        }
        step => unknown_step(engine, step),
    }
}

fn unknown_step(engine: &mut Engine, step: Step) -> Result<bool, EngineError> {
    if step.is_terminal() {
        return Ok(step == Step::Success);
    }
    tracing::error!(
        function = engine.current_name().unwrap_or_default(),
        %step,
        "unknown step"
    );
    engine.end(false)
}

/* ===================== Runner ===================== */

/// What happened during one simulated send
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DemoReport {
    pub outcome: Outcome,
    pub passes: u64,
    pub elapsed_ms: u64,
    pub transmissions: Vec<String>,
    pub rejected: u8,
}

/// Drive `send_reading` to completion on `clock`
pub fn run_demo(
    config: &Config,
    mut radio: SimRadio,
    message: &Message,
    clock: impl Clock + 'static,
) -> Result<DemoReport, DriverError> {
    let mut engine: Engine = Engine::builder()
        .max_depth(config.engine.max_depth)
        .clock(clock)
        .build();
    let mut driver = Driver::new(&config.driver);

    let started = engine.now_ms();
    let outcome = driver.run_until_done(&mut engine, |engine: &mut Engine| {
        send_reading(engine, &mut radio, message)
    })?;

    Ok(DemoReport {
        outcome,
        passes: driver.passes(),
        elapsed_ms: engine.now_ms() - started,
        transmissions: radio.transmissions,
        rejected: radio.rejected,
    })
}
