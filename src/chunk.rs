//! Chunk level decoding: the header chunk and track chunks

use thiserror::Error;

use crate::reader::Truncated;

pub mod chunk_types;
pub mod header;
pub mod track;

/// Error type for a whole-file decode.
///
/// Any of these aborts the decode; no partially populated sequence is ever returned.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// The header chunk is missing or malformed
    #[error("Header chunk error: {0}")]
    Header(#[from] header::HeaderError),
    /// A track chunk failed to decode
    #[error("Track {index} error: {source}")]
    Track {
        /// Index of the failing track
        index: usize,
        /// Underlying track error
        source: track::TrackError,
    },
    /// A chunk overran the buffer, or fewer chunks exist than the header declares
    #[error(transparent)]
    Truncated(#[from] Truncated),
}

impl DecodeError {
    /// True if the input ended before an expected field or chunk was complete
    pub fn is_truncated(&self) -> bool {
        matches!(
            self,
            Self::Truncated(_)
                | Self::Header(header::HeaderError::Truncated(_))
                | Self::Track {
                    source: track::TrackError::Truncated { .. },
                    ..
                }
        )
    }
}
