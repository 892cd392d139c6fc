//! Simulated radio transceiver
//!
//! Stands in for real hardware: it needs a warm-up after power-on, can refuse
//! a number of transmissions, and acknowledges after a configurable latency.

use crate::message::{MessageError, Transport};

/// Time the transceiver needs after power-on before it accepts commands
pub const WARMUP_MS: u64 = 500;

#[derive(Debug, Clone, Default)]
pub struct SimRadio {
    powered_at: Option<u64>,
    /// Transmissions to refuse before accepting one
    reject_remaining: u8,
    /// Latency of the acknowledgement; `None` never acknowledges
    ack_latency_ms: Option<u64>,
    sent_at: Option<u64>,
    /// Every payload the radio accepted
    pub transmissions: Vec<String>,
    /// Transmissions refused so far
    pub rejected: u8,
}

impl SimRadio {
    pub fn new(ack_latency_ms: Option<u64>) -> Self {
        Self {
            ack_latency_ms,
            ..Self::default()
        }
    }

    /// Refuse the next `count` transmissions
    pub fn rejecting(mut self, count: u8) -> Self {
        self.reject_remaining = count;
        self
    }

    pub fn power_on(&mut self, now_ms: u64) {
        if self.powered_at.is_none() {
            self.powered_at = Some(now_ms);
        }
    }

    pub fn power_off(&mut self) {
        self.powered_at = None;
        self.sent_at = None;
    }

    pub fn is_ready(&self, now_ms: u64) -> bool {
        self.powered_at
            .is_some_and(|at| now_ms >= at.saturating_add(WARMUP_MS))
    }

    /// Hand a payload to the air interface at `now_ms`
    pub fn transmit(&mut self, payload: &str, now_ms: u64) -> Result<(), MessageError> {
        if !self.is_ready(now_ms) {
            return Err(MessageError::Transport("radio is not powered".to_string()));
        }
        if self.reject_remaining > 0 {
            self.reject_remaining -= 1;
            self.rejected += 1;
            return Err(MessageError::Transport("channel busy".to_string()));
        }
        self.transmissions.push(payload.to_string());
        self.sent_at = Some(now_ms);
        Ok(())
    }

    /// Whether the last transmission has been acknowledged by `now_ms`
    pub fn ack_received(&self, now_ms: u64) -> bool {
        match (self.sent_at, self.ack_latency_ms) {
            (Some(sent), Some(latency)) => now_ms >= sent.saturating_add(latency),
            _ => false,
        }
    }
}

/// A `SimRadio` pinned to a point in time, usable as a message transport
pub struct RadioAt<'a> {
    pub radio: &'a mut SimRadio,
    pub now_ms: u64,
}

impl Transport for RadioAt<'_> {
    fn send_payload(&mut self, payload: &str) -> Result<(), MessageError> {
        self.radio.transmit(payload, self.now_ms)
    }
}
