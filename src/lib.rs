//! # smfread
//!
//! A bounds-checked decoder for Standard MIDI Files. Given a byte buffer that is already
//! resident in memory, it produces a [`Sequence`]: the header's format and timing division,
//! plus one ordered list of delta-timed events per track.
//!
//! ## Overview
//!
//! MIDI files are structured as a series of chunks. Each chunk contains a 4-character ASCII
//! type identifier and a 32-bit length that specifies how many bytes of data follow. The
//! first chunk is always the `MThd` header; the ones after it are `MTrk` track chunks holding
//! a stream of events, each prefixed by a variable-length delta-time and compressed with
//! running status.
//!
//! - **No silent truncation**: every read is checked against the buffer and the owning chunk.
//!   Oversized events are an error instead of being clipped.
//! - **Structured warnings**: recoverable oddities (missing End-Of-Track, unknown formats,
//!   skipped chunks) are returned alongside the decoded [`Sequence`] rather than printed.
//! - **All-or-nothing**: a malformed file never yields a partially populated sequence.
//!
//! ## Example Usage
//!
//! ```rust
//! use smfread::{decode, chunk::header::Division};
//!
//! let bytes = [
//!     b'M', b'T', b'h', b'd', 0, 0, 0, 6, 0, 0, 0, 1, 0, 96,
//!     b'M', b'T', b'r', b'k', 0, 0, 0, 4, 0x00, 0xFF, 0x2F, 0x00,
//! ];
//!
//! let sequence = decode(&bytes).expect("Decode minimal file");
//! assert_eq!(sequence.header().division(), Division::Metrical(96));
//! assert_eq!(sequence.tracks().len(), 1);
//! assert!(sequence.tracks()[0].events()[0].is_end_of_track());
//! assert!(sequence.warnings().is_empty());
//! ```
//!
//! ## Library Structure
//!
//! - **[`reader`]**: the [`ChunkReader`](reader::ChunkReader) cursor over tagged chunks, and
//!   the [`MidiReadable`](reader::MidiReadable) byte provider.
//! - **[`chunk`]**: header and track decoding, down to individual events and VLQ integers.
//! - **[`sequence`]**: the top level [`SequenceDecoder`] tying everything together.
//! - **[`config`]** and **[`warning`]**: decode policy and the non-fatal findings it reports.

pub mod chunk;
pub mod config;
pub mod reader;
pub mod sequence;
pub mod warning;

pub use chunk::DecodeError;
pub use config::{ChunkPolicy, DecoderConfig};
pub use sequence::{decode, Sequence, SequenceDecoder};
pub use warning::Warning;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A raw MIDI Chunk located inside a larger buffer.
/// A MIDI Chunk consists of a 4-character ASCII type identifier and a 32-bit unsigned integer
/// specifying the length of its data. The body itself is never copied, only located.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Chunk {
    /// 4 character ASCII chunk type
    pub chunk_type: [u8; 4],
    /// Offset of the first body byte in the source buffer
    offset: usize,
    /// Length of the data that follows the chunk header
    length: u32,
}

impl Chunk {
    /// Size of the tag plus length prefix that precedes every chunk body
    pub const HEADER_LEN: usize = 8;

    /// Locates a chunk body of `length` bytes starting at `offset`
    pub(crate) fn new(chunk_type: [u8; 4], offset: usize, length: u32) -> Self {
        Self {
            chunk_type,
            offset,
            length,
        }
    }

    /// Gets the length of the chunk as a usize
    pub fn len(&self) -> usize {
        self.length as usize
    }

    /// Returns if the chunk has no attributed data
    pub fn is_empty(&self) -> bool {
        self.length == 0
    }

    /// Offset of the chunk body within the buffer it was read from
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Borrows the chunk body out of the buffer it was read from.
    ///
    /// Returns an empty slice if `buffer` is not the one the chunk was located in and is too
    /// short to hold it.
    pub fn body<'a>(&self, buffer: &'a [u8]) -> &'a [u8] {
        self.offset
            .checked_add(self.len())
            .and_then(|end| buffer.get(self.offset..end))
            .unwrap_or_default()
    }

    /// The chunk type rendered as text, with non-ASCII bytes replaced
    pub fn type_name(&self) -> String {
        self.chunk_type
            .iter()
            .map(|&b| if b.is_ascii_graphic() { b as char } else { '?' })
            .collect()
    }
}
