//! MIDI variable-length quantities, used for delta-times and meta event lengths

use thiserror::Error;

/// A VLQ never spans more than four bytes in a MIDI file
pub const MAX_VLQ_LEN: usize = 4;

/// Error types from decoding a variable-length quantity
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum VlqError {
    /// Ran out of bytes while the continuation bit was still set
    #[error("Variable length quantity is truncated")]
    Truncated,
    /// Continuation bit still set after the fourth byte
    #[error("Variable length quantity is longer than 4 bytes")]
    Overflow,
}

/// Decodes a VLQ from the start of `bytes`, returning the value and the number of bytes it
/// occupied
pub fn decode_vlq(bytes: &[u8]) -> Result<(u32, usize), VlqError> {
    const MASK: u8 = 0x7F;

    let mut result: u32 = 0;
    for (i, &byte) in bytes.iter().enumerate() {
        if i == MAX_VLQ_LEN {
            return Err(VlqError::Overflow);
        }

        result = (result << 7) | (byte & MASK) as u32;

        if !msb_is_one(byte) {
            return Ok((result, i + 1));
        }
    }

    if bytes.len() >= MAX_VLQ_LEN {
        Err(VlqError::Overflow)
    } else {
        Err(VlqError::Truncated)
    }
}

/// Goes backwards from a value to its variable length byte encoding
pub fn encode_vlq(mut value: u32) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(MAX_VLQ_LEN);

    loop {
        let mut byte = (value & 0x7F) as u8;
        value >>= 7;

        if !bytes.is_empty() {
            byte |= 0x80;
        }

        bytes.push(byte);

        if value == 0 {
            break;
        }
    }

    bytes.reverse();
    bytes
}

/// Returns true if the msb of a byte is 1
pub(crate) fn msb_is_one(byte: u8) -> bool {
    byte >> 7 == 1
}
