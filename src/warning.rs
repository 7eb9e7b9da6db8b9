//! Non-fatal findings reported alongside a decoded sequence

use thiserror::Error;
use tracing::warn;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Something odd about the input that did not stop the decode
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Warning {
    /// Header format is not 0, 1 or 2
    #[error("Unrecognized header format {0}")]
    UnknownFormat(u16),
    /// Format 0 holds a single track, but the header declares more
    #[error("Single track format declares {declared} tracks")]
    SingleTrackFormatWithMultipleTracks {
        /// Track count from the header
        declared: u16,
    },
    /// Track chunk ran out without an End-Of-Track meta event
    #[error("Track {track} has no End-Of-Track event")]
    MissingEndOfTrack {
        /// Index of the track in the sequence
        track: usize,
    },
    /// Bytes left in a track chunk after its End-Of-Track event
    #[error("Track {track} has {count} bytes after End-Of-Track")]
    TrailingTrackBytes {
        /// Index of the track in the sequence
        track: usize,
        /// Number of ignored bytes
        count: usize,
    },
    /// A non-track chunk was skipped where a track was expected
    #[error("Skipped {} chunk at offset {offset}", String::from_utf8_lossy(.chunk_type))]
    SkippedChunk {
        /// Tag of the skipped chunk
        chunk_type: [u8; 4],
        /// Offset of the skipped chunk's body
        offset: usize,
    },
}

impl Warning {
    /// Logs the warning and appends it to `warnings`
    pub(crate) fn record(self, warnings: &mut Vec<Warning>) {
        warn!("{self}");
        warnings.push(self);
    }
}
