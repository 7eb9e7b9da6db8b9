//! System Exclusive Messages

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Status byte of a system exclusive event
pub const SYSEX_STATUS: u8 = 0xF0;

/// Status byte of an escape (or continued system exclusive) event
pub const ESCAPE_STATUS: u8 = 0xF7;

/// A manufacturer's ID. Can be either a 1 byte variant or 3 bytes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ManufactureId {
    /// One byte ID
    OneByte(u8),
    /// Three byte ID, always starting with 0x00
    ThreeByte([u8; 3]),
}

impl ManufactureId {
    /// Reads the ID from the front of a system exclusive payload
    pub fn from_payload(payload: &[u8]) -> Option<Self> {
        match payload {
            [0x00, second, third, ..] => Some(Self::ThreeByte([0x00, *second, *third])),
            [0x00, ..] => None,
            [first, ..] => Some(Self::OneByte(*first)),
            [] => None,
        }
    }
}
