//! Track chunk data and the decoder that walks a track's events

use thiserror::Error;
use tracing::{debug, trace};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use event::Event;

use crate::{
    chunk::chunk_types::TRACK_DATA_CHUNK, config::DecoderConfig, warning::Warning, Chunk,
};

pub mod event;
pub mod meta;
pub mod sysex;
pub mod vlq;

/// Error types from decoding a track
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackError {
    /// The track ended in the middle of an event
    #[error("Event truncated at offset {offset}")]
    Truncated {
        /// Offset of the incomplete field
        offset: usize,
    },
    /// A delta-time or length field ran past four bytes
    #[error("Variable length quantity at offset {offset} is longer than 4 bytes")]
    VlqOverflow {
        /// Offset of the first byte of the quantity
        offset: usize,
    },
    /// A data byte appeared before any status byte in the track
    #[error("Data byte at offset {offset} with no running status")]
    MissingRunningStatus {
        /// Offset of the data byte
        offset: usize,
    },
    /// An event body exceeds the configured cap
    #[error("Event at offset {offset} carries {length} bytes, limit is {limit}")]
    EventTooLarge {
        /// Offset of the event body
        offset: usize,
        /// Declared or scanned body length
        length: usize,
        /// Configured maximum
        limit: usize,
    },
    /// A chunk other than `MTrk` was found where a track was expected
    #[error("Expected an MTrk chunk, found {:?}", String::from_utf8_lossy(.0))]
    UnexpectedChunk([u8; 4]),
}

impl TrackError {
    /// Shifts track-relative offsets by `base`, the file offset of the track body
    fn offset_by(self, base: usize) -> Self {
        match self {
            Self::Truncated { offset } => Self::Truncated {
                offset: base.saturating_add(offset),
            },
            Self::VlqOverflow { offset } => Self::VlqOverflow {
                offset: base.saturating_add(offset),
            },
            Self::MissingRunningStatus { offset } => Self::MissingRunningStatus {
                offset: base.saturating_add(offset),
            },
            Self::EventTooLarge {
                offset,
                length,
                limit,
            } => Self::EventTooLarge {
                offset: base.saturating_add(offset),
                length,
                limit,
            },
            Self::UnexpectedChunk(tag) => Self::UnexpectedChunk(tag),
        }
    }
}

/// A track chunk, containing its MTrk events in stream order
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TrackChunk {
    /// All decoded events of this chunk
    events: Vec<Event>,
}

impl TrackChunk {
    /// Decodes the events of `chunk`, whose body lives in `buffer`.
    ///
    /// `index` is the track's position in the sequence and is only used to label warnings.
    /// Error offsets are file offsets.
    pub fn decode(
        buffer: &[u8],
        chunk: &Chunk,
        index: usize,
        config: &DecoderConfig,
    ) -> Result<(Self, Vec<Warning>), TrackError> {
        if chunk.chunk_type != TRACK_DATA_CHUNK {
            return Err(TrackError::UnexpectedChunk(chunk.chunk_type));
        }

        let body = chunk.body(buffer);
        debug!(track = index, length = body.len(), "decoding track");

        let mut running_status = None;
        let mut cursor = 0;
        let mut events = vec![];
        let mut warnings = vec![];

        while cursor < body.len() {
            let (event, consumed) = Event::decode(body, cursor, &mut running_status, config)
                .map_err(|e| e.offset_by(chunk.offset()))?;
            trace!(
                track = index,
                delta_time = event.delta_time(),
                status = event.status(),
                length = event.data().len(),
                "decoded event"
            );
            cursor += consumed;

            let end_of_track = event.is_end_of_track();
            events.push(event);

            if end_of_track {
                if cursor < body.len() {
                    Warning::TrailingTrackBytes {
                        track: index,
                        count: body.len() - cursor,
                    }
                    .record(&mut warnings);
                }
                debug!(track = index, events = events.len(), "decoded track");
                return Ok((Self { events }, warnings));
            }
        }

        Warning::MissingEndOfTrack { track: index }.record(&mut warnings);
        debug!(track = index, events = events.len(), "decoded track");
        Ok((Self { events }, warnings))
    }

    /// The track's events in stream order
    pub fn events(&self) -> &[Event] {
        &self.events
    }

    /// Number of events in the track
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Returns if the track holds no events
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// True if the last event is End-Of-Track
    pub fn is_terminated(&self) -> bool {
        self.events.last().is_some_and(Event::is_end_of_track)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::{TrackChunk, TrackError};
    use crate::{config::DecoderConfig, reader::ChunkReader, warning::Warning, Chunk};

    fn decode(bytes: &[u8], config: &DecoderConfig) -> Result<(TrackChunk, Vec<Warning>), TrackError> {
        let chunk = ChunkReader::new(bytes)
            .next_chunk()
            .expect("Chunk fits the buffer")
            .expect("Buffer holds a chunk");
        TrackChunk::decode(bytes, &chunk, 0, config)
    }

    fn track(body: &[u8]) -> Vec<u8> {
        let mut bytes = b"MTrk".to_vec();
        bytes.extend((body.len() as u32).to_be_bytes());
        bytes.extend(body);
        bytes
    }

    #[test]
    fn track_stops_at_end_of_track() {
        let bytes = track(&[0x00, 0x90, 0x3C, 0x40, 0x60, 0x3C, 0x00, 0x00, 0xFF, 0x2F, 0x00]);
        let (track, warnings) = decode(&bytes, &DecoderConfig::default()).unwrap();

        assert_eq!(track.len(), 3);
        assert!(track.is_terminated());
        assert_eq!(track.events()[1].data(), &[0x3C, 0x00]);
        assert!(warnings.is_empty());
    }

    #[test]
    fn bytes_after_end_of_track_are_ignored() {
        let bytes = track(&[0x00, 0xFF, 0x2F, 0x00, 0x00, 0x90, 0x3C]);
        let (track, warnings) = decode(&bytes, &DecoderConfig::default()).unwrap();

        assert_eq!(track.len(), 1);
        assert_eq!(
            warnings,
            vec![Warning::TrailingTrackBytes { track: 0, count: 3 }]
        );
    }

    #[test]
    fn missing_end_of_track_is_a_warning() {
        let bytes = track(&[0x00, 0xC0, 0x05, 0x10, 0xC0, 0x06]);
        let (track, warnings) = decode(&bytes, &DecoderConfig::default()).unwrap();

        assert_eq!(track.len(), 2);
        assert!(!track.is_terminated());
        assert_eq!(warnings, vec![Warning::MissingEndOfTrack { track: 0 }]);
    }

    #[test]
    fn empty_track_has_no_events() {
        let bytes = track(&[]);
        let (track, warnings) = decode(&bytes, &DecoderConfig::default()).unwrap();

        assert!(track.is_empty());
        assert_eq!(warnings, vec![Warning::MissingEndOfTrack { track: 0 }]);
    }

    #[test]
    fn wrong_tag_is_unexpected() {
        let mut bytes = track(&[0x00, 0xFF, 0x2F, 0x00]);
        bytes[..4].copy_from_slice(b"XFIH");

        assert_eq!(
            decode(&bytes, &DecoderConfig::default()),
            Err(TrackError::UnexpectedChunk(*b"XFIH"))
        );
    }

    #[test]
    fn event_errors_carry_file_offsets() {
        let bytes = track(&[0x00, 0x3C, 0x40]);

        assert_eq!(
            decode(&bytes, &DecoderConfig::default()),
            Err(TrackError::MissingRunningStatus { offset: 9 })
        );
    }

    #[test]
    fn rebased_offsets_saturate() {
        let error = TrackError::Truncated { offset: 4 }.offset_by(usize::MAX - 1);
        assert_eq!(error, TrackError::Truncated { offset: usize::MAX });
    }

    #[test]
    fn chunk_located_past_the_buffer_has_no_events() {
        let chunk = Chunk::new(*b"MTrk", usize::MAX - 2, 4);
        let (track, warnings) =
            TrackChunk::decode(&[0x00, 0xFF, 0x2F, 0x00], &chunk, 0, &DecoderConfig::default())
                .unwrap();

        assert!(track.is_empty());
        assert_eq!(warnings, vec![Warning::MissingEndOfTrack { track: 0 }]);
    }

    #[test]
    fn oversized_meta_aborts_the_track() {
        let bytes = track(&[0x00, 0xFF, 0x01, 0x04, b't', b'e', b'x', b't', 0x00, 0xFF, 0x2F, 0x00]);
        let config = DecoderConfig::default().with_max_event_len(3);

        assert_eq!(
            decode(&bytes, &config),
            Err(TrackError::EventTooLarge {
                offset: 12,
                length: 4,
                limit: 3
            })
        );
    }

    #[test]
    fn meta_running_past_chunk_is_truncated_even_if_buffer_continues() {
        let mut bytes = track(&[0x00, 0xFF, 0x01, 0x05, b'a']);
        bytes.extend(b"bcde");

        assert_eq!(
            decode(&bytes, &DecoderConfig::default()),
            Err(TrackError::Truncated { offset: 12 })
        );
    }
}
