//! # Message - Compact Field Payloads
//!
//! Packs named readings into the small hex payload a low-bandwidth radio can
//! carry (12 bytes by default). Every field takes 4 bytes:
//!
//! - 2 bytes of name: up to three letters, 5 bits each (see [`letters`])
//! - 2 bytes of value: a reading scaled by 10, or three more packed letters
//!
//! Words are written as hex, low byte first. The codec is independent of the
//! engine; step functions simply hand the finished payload to a [`Transport`].

pub mod letters;


use serde_json::{Map, Value};

use letters::{pack_name, unpack_name};

/// Capacity of one payload in bytes
pub const MAX_BYTES_PER_MESSAGE: usize = 12;

/// Bytes used by one name/value field
pub const FIELD_BYTES: usize = 4;

const HEX_PER_FIELD: usize = FIELD_BYTES * 2;

/// Errors raised while building, sending or decoding a payload
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MessageError {
    #[error("message too long, already {used} bytes of {capacity}")]
    MessageFull { used: usize, capacity: usize },

    #[error("nothing to send")]
    Empty,

    #[error("invalid hex digit {digit:?} at offset {offset}")]
    InvalidHex { digit: char, offset: usize },

    #[error("payload length {len} is not a whole number of 8-digit fields")]
    BadLength { len: usize },

    #[error("field '{name}' appears more than once")]
    DuplicateName { name: String },

    #[error("transport failed: {0}")]
    Transport(String),
}

/// Something that can carry an encoded payload
pub trait Transport {
    fn send_payload(&mut self, payload: &str) -> Result<(), MessageError>;
}

/* ===================== Builder ===================== */

/// A payload under construction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    encoded: String,
    max_bytes: usize,
}

impl Message {
    pub fn new() -> Self {
        Self::with_capacity(MAX_BYTES_PER_MESSAGE)
    }

    /// Message holding at most `max_bytes` bytes
    pub fn with_capacity(max_bytes: usize) -> Self {
        Self {
            encoded: String::with_capacity(max_bytes * 2),
            max_bytes,
        }
    }

    /// Add a reading with one decimal place, e.g. `25.5` is stored as `255`
    ///
    /// Digits beyond the first decimal are truncated, and values outside
    /// ±3276.7 saturate.
    pub fn add_field(&mut self, name: &str, value: f64) -> Result<(), MessageError> {
        self.add_int_field(name, (value * 10.0) as i16)
    }

    /// Add a value that is already scaled by 10
    pub fn add_int_field(&mut self, name: &str, scaled: i16) -> Result<(), MessageError> {
        self.reserve_field()?;
        push_word(&mut self.encoded, pack_name(name));
        push_word(&mut self.encoded, scaled as u16);
        Ok(())
    }

    /// Add a short text value (first three letters), packed like a name
    pub fn add_text_field(&mut self, name: &str, value: &str) -> Result<(), MessageError> {
        self.reserve_field()?;
        push_word(&mut self.encoded, pack_name(name));
        push_word(&mut self.encoded, pack_name(value));
        Ok(())
    }

    /// The encoded hex so far
    pub fn encoded(&self) -> &str {
        &self.encoded
    }

    pub fn len_bytes(&self) -> usize {
        self.encoded.len() / 2
    }

    pub fn is_empty(&self) -> bool {
        self.encoded.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.max_bytes
    }

    /// The payload ready for transmission
    pub fn payload(&self) -> Result<&str, MessageError> {
        if self.encoded.is_empty() {
            return Err(MessageError::Empty);
        }
        Ok(&self.encoded)
    }

    pub fn send<T: Transport + ?Sized>(&self, transport: &mut T) -> Result<(), MessageError> {
        let payload = self.payload()?;
        tracing::debug!(payload, bytes = self.len_bytes(), "sending message");
        transport.send_payload(payload)
    }

    fn reserve_field(&self) -> Result<(), MessageError> {
        if self.encoded.len() + HEX_PER_FIELD > self.max_bytes * 2 {
            let err = MessageError::MessageFull {
                used: self.len_bytes(),
                capacity: self.max_bytes,
            };
            tracing::warn!("{}", err);
            return Err(err);
        }
        Ok(())
    }
}

impl Default for Message {
    fn default() -> Self {
        Self::new()
    }
}

/* ===================== Decoding ===================== */

/// Decode a payload into `{name: value}` pairs
///
/// Values are read back as signed readings divided by 10. Text values are not
/// distinguishable on the wire and come back as numbers too. A name seen twice
/// is rejected rather than overwriting the earlier reading.
pub fn decode(payload: &str) -> Result<Map<String, Value>, MessageError> {
    let digits: Vec<char> = payload.trim().chars().collect();
    if digits.len() % HEX_PER_FIELD != 0 {
        return Err(MessageError::BadLength { len: digits.len() });
    }

    let mut fields = Map::new();
    for (index, field) in digits.chunks(HEX_PER_FIELD).enumerate() {
        let offset = index * HEX_PER_FIELD;
        let name = read_word(&field[..4], offset)?;
        let raw = read_word(&field[4..], offset + 4)? as i16;
        let name = unpack_name(name);
        if fields.contains_key(&name) {
            return Err(MessageError::DuplicateName { name });
        }
        fields.insert(name, Value::from(f64::from(raw) / 10.0));
    }
    Ok(fields)
}

/// Render a decoded payload as compact JSON
pub fn decode_to_json(payload: &str) -> Result<String, MessageError> {
    Ok(Value::Object(decode(payload)?).to_string())
}

fn push_word(out: &mut String, word: u16) {
    let [low, high] = word.to_le_bytes();
    out.push_str(&format!("{:02x}{:02x}", low, high));
}

/// Read four hex digits written low byte first
fn read_word(digits: &[char], offset: usize) -> Result<u16, MessageError> {
    let mut nibbles = [0u16; 4];
    for (i, (slot, ch)) in nibbles.iter_mut().zip(digits).enumerate() {
        *slot = ch.to_digit(16).ok_or(MessageError::InvalidHex {
            digit: *ch,
            offset: offset + i,
        })? as u16;
    }
    let [l1, l0, h1, h0] = nibbles;
    Ok((h1 << 12) | (h0 << 8) | (l1 << 4) | l0)
}
