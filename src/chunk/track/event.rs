//! Timed MIDI events and the running-status decoder that produces them

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::{
    meta::{MetaKind, END_OF_TRACK, META_STATUS},
    sysex::{ManufactureId, ESCAPE_STATUS, SYSEX_STATUS},
    vlq::{decode_vlq, msb_is_one, VlqError},
    TrackError,
};
use crate::config::DecoderConfig;

/// The status byte most recently seen in a track, reused by events that omit their own
pub type RunningStatus = Option<u8>;

/// A MIDI event with its delta-time and raw body
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Event {
    /// Ticks since the previous event in the same track
    delta_time: u32,
    /// Status byte, either explicit or carried over by running status
    status: u8,
    /// Type byte of a meta event
    meta_type: Option<u8>,
    /// Body bytes: the payload for meta events, everything after the status otherwise
    data: Vec<u8>,
}

impl Event {
    /// Decodes the event starting at `cursor` within a track body.
    ///
    /// Returns the event and the number of bytes it occupied. `running_status` is only
    /// updated when the whole event decodes, so on error neither it nor the caller's cursor
    /// move. Error offsets are relative to the start of `track`.
    pub fn decode(
        track: &[u8],
        cursor: usize,
        running_status: &mut RunningStatus,
        config: &DecoderConfig,
    ) -> Result<(Self, usize), TrackError> {
        let rest = track
            .get(cursor..)
            .ok_or(TrackError::Truncated { offset: cursor })?;
        let at = |pos: usize| cursor + pos;

        let (delta_time, mut pos) = decode_vlq(rest).map_err(|e| match e {
            VlqError::Truncated => TrackError::Truncated { offset: cursor },
            VlqError::Overflow => TrackError::VlqOverflow { offset: cursor },
        })?;

        let first = *rest
            .get(pos)
            .ok_or(TrackError::Truncated { offset: at(pos) })?;
        let status = if msb_is_one(first) {
            pos += 1;
            first
        } else {
            (*running_status).ok_or(TrackError::MissingRunningStatus { offset: at(pos) })?
        };

        let meta_type = if status == META_STATUS {
            let meta_type = *rest
                .get(pos)
                .ok_or(TrackError::Truncated { offset: at(pos) })?;
            pos += 1;
            Some(meta_type)
        } else {
            None
        };

        let body_len = match status {
            META_STATUS | SYSEX_STATUS | ESCAPE_STATUS => {
                let tail = rest.get(pos..).unwrap_or_default();
                let (length, length_len) = decode_vlq(tail).map_err(|e| match e {
                    VlqError::Truncated => TrackError::Truncated { offset: at(pos) },
                    VlqError::Overflow => TrackError::VlqOverflow { offset: at(pos) },
                })?;
                pos += length_len;
                length as usize
            }
            _ => {
                // Data bytes never have the top bit set, so the body ends at the next status
                // byte, the end of the track or the message's defined length
                rest.get(pos..)
                    .unwrap_or_default()
                    .iter()
                    .take(defined_data_len(status))
                    .take_while(|&&b| !msb_is_one(b))
                    .count()
            }
        };

        check_len(body_len, at(pos), config)?;
        let data = rest
            .get(pos..)
            .and_then(|tail| tail.get(..body_len))
            .ok_or(TrackError::Truncated { offset: at(pos) })?
            .to_vec();
        pos += body_len;

        *running_status = Some(status);

        Ok((
            Self {
                delta_time,
                status,
                meta_type,
                data,
            },
            pos,
        ))
    }

    /// Ticks to wait after the previous event before this one
    pub fn delta_time(&self) -> u32 {
        self.delta_time
    }

    /// The status byte, with its top bit always set
    pub fn status(&self) -> u8 {
        self.status
    }

    /// The event body
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// True for meta events
    pub fn is_meta(&self) -> bool {
        self.status == META_STATUS
    }

    /// Meta type byte, only present for meta events
    pub fn meta_type(&self) -> Option<u8> {
        self.meta_type
    }

    /// Classification of a meta event's type byte
    pub fn meta_kind(&self) -> Option<MetaKind> {
        self.meta_type.map(MetaKind::from)
    }

    /// Channel of a channel voice or mode message
    pub fn channel(&self) -> Option<u8> {
        (0x80..=0xEF)
            .contains(&self.status)
            .then_some(self.status & 0x0F)
    }

    /// Manufacturer of a system exclusive event
    pub fn manufacture_id(&self) -> Option<ManufactureId> {
        if self.status == SYSEX_STATUS {
            ManufactureId::from_payload(&self.data)
        } else {
            None
        }
    }

    /// True for the End-Of-Track meta event
    pub fn is_end_of_track(&self) -> bool {
        self.status == META_STATUS && self.meta_type == Some(END_OF_TRACK)
    }
}

/// Most data bytes a channel or system common message can carry
fn defined_data_len(status: u8) -> usize {
    match status {
        0xC0..=0xDF | 0xF1 | 0xF3 => 1,
        0x80..=0xEF | 0xF2 => 2,
        _ => 0,
    }
}

/// Rejects bodies above the configured cap
fn check_len(length: usize, offset: usize, config: &DecoderConfig) -> Result<(), TrackError> {
    if length > config.max_event_len {
        Err(TrackError::EventTooLarge {
            offset,
            length,
            limit: config.max_event_len,
        })
    } else {
        Ok(())
    }
}
