//! Chunk cursor over an in memory MIDI buffer, and the trait used to obtain that buffer

use std::{convert::Infallible, fs, path::Path};

use thiserror::Error;
use tracing::debug;

use crate::Chunk;

/// Error raised when a chunk header or body runs past the end of the buffer
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("Truncated input at offset {offset}")]
pub struct Truncated {
    /// Offset of the chunk header that could not be completed
    pub offset: usize,
}

/// Iterates tagged, length-prefixed chunks over a byte buffer.
///
/// Every step is bounds-checked. After a [`Truncated`] error the reader is parked at the end
/// of the buffer, so a corrupted length can never be used to resume mid-chunk.
#[derive(Debug, Clone)]
pub struct ChunkReader<'a> {
    /// The whole file
    buffer: &'a [u8],
    /// Offset of the next chunk header
    cursor: usize,
}

impl<'a> ChunkReader<'a> {
    /// Creates a reader positioned at the first chunk of `buffer`
    pub fn new(buffer: &'a [u8]) -> Self {
        Self { buffer, cursor: 0 }
    }

    /// Offset of the next chunk header
    pub fn offset(&self) -> usize {
        self.cursor
    }

    /// The buffer this reader walks
    pub fn buffer(&self) -> &'a [u8] {
        self.buffer
    }

    /// Reads the next chunk, advancing past its header and body.
    ///
    /// Returns `Ok(None)` once the cursor sits exactly on the end of the buffer.
    pub fn next_chunk(&mut self) -> Result<Option<Chunk>, Truncated> {
        let start = self.cursor;
        if start == self.buffer.len() {
            return Ok(None);
        }

        match self.locate(start) {
            Some(chunk) => {
                self.cursor = chunk.offset() + chunk.len();
                debug!(
                    chunk_type = %chunk.type_name(),
                    offset = start,
                    length = chunk.len(),
                    "read chunk"
                );
                Ok(Some(chunk))
            }
            None => {
                self.cursor = self.buffer.len();
                Err(Truncated { offset: start })
            }
        }
    }

    /// Finds the chunk whose header starts at `start`, if it fits in the buffer
    fn locate(&self, start: usize) -> Option<Chunk> {
        let header = self.buffer.get(start..start.checked_add(Chunk::HEADER_LEN)?)?;
        let &[a, b, c, d, l0, l1, l2, l3] = header else {
            return None;
        };
        let chunk_type = [a, b, c, d];
        let length = u32::from_be_bytes([l0, l1, l2, l3]);

        let body = start + Chunk::HEADER_LEN;
        let end = body.checked_add(length as usize)?;
        if end > self.buffer.len() {
            return None;
        }

        Some(Chunk::new(chunk_type, body, length))
    }
}

/// Trait that allows for different sources to hand over a complete MIDI byte buffer
pub trait MidiReadable {
    /// Error type that may be returned while loading the bytes
    type Error;
    /// Loads the entire source into memory
    fn get_midi_bytes(self) -> Result<Vec<u8>, Self::Error>;
}

/// Wrapper struct to allow passing Vec<u8> to MidiReadable trait
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MidiData(pub Vec<u8>);

impl MidiReadable for MidiData {
    type Error = Infallible;
    fn get_midi_bytes(self) -> Result<Vec<u8>, Self::Error> {
        Ok(self.0)
    }
}

impl<PATH> MidiReadable for PATH
where
    PATH: AsRef<Path>,
{
    type Error = std::io::Error;
    fn get_midi_bytes(self) -> Result<Vec<u8>, Self::Error> {
        fs::read(self.as_ref())
    }
}

#[cfg(test)]
mod tests {
    use super::{ChunkReader, MidiData, MidiReadable, Truncated};

    #[test]
    fn chunks_are_walked_in_order() {
        let data = [
            b'M', b'T', b'h', b'd', 0, 0, 0, 2, 0xAA, 0xBB, //
            b'J', b'U', b'N', b'K', 0, 0, 0, 0, //
            b'M', b'T', b'r', b'k', 0, 0, 0, 1, 0xCC,
        ];
        let mut reader = ChunkReader::new(&data);

        let first = reader.next_chunk().unwrap().unwrap();
        assert_eq!(&first.chunk_type, b"MThd");
        assert_eq!(first.body(&data), &[0xAA, 0xBB]);

        let second = reader.next_chunk().unwrap().unwrap();
        assert_eq!(&second.chunk_type, b"JUNK");
        assert!(second.is_empty());

        let third = reader.next_chunk().unwrap().unwrap();
        assert_eq!(third.body(&data), &[0xCC]);
        assert_eq!(reader.offset(), data.len());

        assert_eq!(reader.next_chunk(), Ok(None));
    }

    #[test]
    fn empty_buffer_is_done() {
        let mut reader = ChunkReader::new(&[]);
        assert_eq!(reader.next_chunk(), Ok(None));
    }

    #[test]
    fn partial_header_is_truncated() {
        let data = [b'M', b'T', b'r', b'k', 0, 0];
        let mut reader = ChunkReader::new(&data);

        assert_eq!(reader.next_chunk(), Err(Truncated { offset: 0 }));
        assert_eq!(reader.next_chunk(), Ok(None));
    }

    #[test]
    fn length_past_the_end_is_truncated_regardless_of_tag() {
        for tag in [b"MThd", b"MTrk", b"XFIH"] {
            let mut data = tag.to_vec();
            data.extend([0, 0, 0, 10, 1, 2, 3]);
            let mut reader = ChunkReader::new(&data);

            assert_eq!(reader.next_chunk(), Err(Truncated { offset: 0 }));
        }
    }

    #[test]
    fn huge_length_does_not_overflow() {
        let data = [b'M', b'T', b'r', b'k', 0xFF, 0xFF, 0xFF, 0xFF];
        let mut reader = ChunkReader::new(&data);

        assert_eq!(reader.next_chunk(), Err(Truncated { offset: 0 }));
    }

    #[test]
    fn midi_data_hands_over_its_bytes() {
        let bytes = MidiData(vec![1, 2, 3]).get_midi_bytes();
        assert_eq!(bytes, Ok(vec![1, 2, 3]));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let data = "this/file/does/not/exist.mid".get_midi_bytes();
        assert!(data.is_err())
    }
}
