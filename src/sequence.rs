//! The decoded sequence and the top level decoder that assembles it

use thiserror::Error;
use tracing::debug;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{
    chunk::{
        header::HeaderChunk,
        track::{TrackChunk, TrackError},
        DecodeError,
    },
    config::{ChunkPolicy, DecoderConfig},
    reader::{ChunkReader, MidiReadable, Truncated},
    warning::Warning,
    Chunk,
};

/// A fully decoded MIDI file: its header, every declared track, and anything odd found on the
/// way
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Sequence {
    /// Format, declared track count and division
    header: HeaderChunk,
    /// Tracks in file order
    tracks: Vec<TrackChunk>,
    /// Non-fatal findings, in the order they were met
    warnings: Vec<Warning>,
}

impl Sequence {
    /// Format, declared track count and division
    pub fn header(&self) -> &HeaderChunk {
        &self.header
    }

    /// Tracks in file order
    pub fn tracks(&self) -> &[TrackChunk] {
        &self.tracks
    }

    /// Non-fatal findings, in the order they were met
    pub fn warnings(&self) -> &[Warning] {
        &self.warnings
    }
}

/// Error from loading and then decoding a MIDI source
#[derive(Debug, Error)]
pub enum ReadError<E> {
    /// The source could not hand over its bytes
    #[error("Failed to load MIDI bytes: {0}")]
    Source(E),
    /// The bytes are not a valid MIDI file
    #[error(transparent)]
    Decode(#[from] DecodeError),
}

/// Decodes whole MIDI files according to a [`DecoderConfig`]
#[derive(Debug, Clone, Copy, Default)]
pub struct SequenceDecoder {
    /// Policy shared by every stage
    config: DecoderConfig,
}

impl SequenceDecoder {
    /// Creates a decoder with the given configuration
    pub fn new(config: DecoderConfig) -> Self {
        Self { config }
    }

    /// The decoder's configuration
    pub fn config(&self) -> &DecoderConfig {
        &self.config
    }

    /// Decodes a complete MIDI file held in `buffer`.
    ///
    /// Exactly as many tracks as the header declares are decoded; chunks after them are never
    /// visited. Any error aborts the whole decode.
    pub fn decode(&self, buffer: &[u8]) -> Result<Sequence, DecodeError> {
        let mut reader = ChunkReader::new(buffer);
        let (header, mut warnings) = HeaderChunk::decode(&mut reader)?;

        let declared = header.ntrks() as usize;
        let mut tracks = Vec::with_capacity(track_capacity(declared, buffer.len()));

        while tracks.len() < declared {
            let index = tracks.len();
            let chunk = reader.next_chunk()?.ok_or(Truncated {
                offset: reader.offset(),
            })?;

            match TrackChunk::decode(buffer, &chunk, index, &self.config) {
                Ok((track, track_warnings)) => {
                    tracks.push(track);
                    warnings.extend(track_warnings);
                }
                Err(TrackError::UnexpectedChunk(chunk_type))
                    if self.config.unexpected_chunk == ChunkPolicy::Skip =>
                {
                    Warning::SkippedChunk {
                        chunk_type,
                        offset: chunk.offset(),
                    }
                    .record(&mut warnings);
                }
                Err(source) => return Err(DecodeError::Track { index, source }),
            }
        }

        debug!(
            tracks = tracks.len(),
            warnings = warnings.len(),
            "decoded sequence"
        );

        Ok(Sequence {
            header,
            tracks,
            warnings,
        })
    }

    /// Loads the bytes from `source` and decodes them
    pub fn read<R: MidiReadable>(&self, source: R) -> Result<Sequence, ReadError<R::Error>> {
        let bytes = source.get_midi_bytes().map_err(ReadError::Source)?;
        Ok(self.decode(&bytes)?)
    }
}

/// Number of tracks worth reserving up front: no more than the buffer has room for chunk headers
fn track_capacity(declared: usize, buffer_len: usize) -> usize {
    declared.min(buffer_len / Chunk::HEADER_LEN)
}

/// Decodes a complete MIDI file with the default configuration
pub fn decode(buffer: &[u8]) -> Result<Sequence, DecodeError> {
    SequenceDecoder::default().decode(buffer)
}
