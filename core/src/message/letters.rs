//! 5-bit letter packing for field names and short text values
//!
//! `0` ends a name (or marks a character that cannot be encoded),
//! `1..=26` are `a..=z` (input is case-insensitive), `27..=31` are `0..=4`.
//! Three letters fill a 16-bit word as `[x000 0011 1112 2222]`.

const FIRST_LETTER: u8 = 1;
const FIRST_DIGIT: u8 = 27;

/// Letters packed into one word
pub const LETTERS_PER_WORD: usize = 3;

pub fn encode_letter(ch: char) -> u8 {
    let ch = ch.to_ascii_lowercase();
    match ch {
        'a'..='z' => ch as u8 - b'a' + FIRST_LETTER,
        '0'..='4' => ch as u8 - b'0' + FIRST_DIGIT,
        _ => 0,
    }
}

pub fn decode_letter(code: u8) -> Option<char> {
    match code {
        0 => None,
        FIRST_LETTER..=26 => Some((code - FIRST_LETTER + b'a') as char),
        FIRST_DIGIT..=31 => Some((code - FIRST_DIGIT + b'0') as char),
        _ => None,
    }
}

/// Pack the first three characters of `name`; missing ones encode as 0
pub fn pack_name(name: &str) -> u16 {
    let mut codes = [0u8; LETTERS_PER_WORD];
    for (slot, ch) in codes.iter_mut().zip(name.chars()) {
        *slot = encode_letter(ch);
    }
    (u16::from(codes[0]) << 10) | (u16::from(codes[1]) << 5) | u16::from(codes[2])
}

/// Unpack a name word; decoding stops at the first end marker
pub fn unpack_name(word: u16) -> String {
    [word >> 10, word >> 5, word]
        .into_iter()
        .map(|bits| decode_letter((bits & 0x1f) as u8))
        .take_while(Option::is_some)
        .flatten()
        .collect()
}
