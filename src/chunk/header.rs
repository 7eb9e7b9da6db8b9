//! Header Chunk Enum and Struct Definitions

use thiserror::Error;
use tracing::debug;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{
    chunk::chunk_types::HEADER_CHUNK,
    reader::{ChunkReader, Truncated},
    warning::Warning,
};

/// Required body length of the `MThd` chunk
pub const HEADER_LEN: u32 = 6;

/// Error type for decoding the `MThd` chunk
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderError {
    /// The file ended before the header chunk did
    #[error("Header chunk is truncated")]
    Truncated(#[from] Truncated),
    /// First chunk is not `MThd`
    #[error("MThd signature not found, found {:?}", String::from_utf8_lossy(.0))]
    BadSignature([u8; 4]),
    /// `MThd` body is not exactly six bytes
    #[error("MThd chunk length is {0}, should be 6")]
    BadHeaderLength(u32),
    /// Metrical division of zero ticks per quarter note
    #[error("Division of zero ticks per quarter note")]
    InvalidDivision,
}

/// Header chunk data: the format, declared number of tracks and timing division
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct HeaderChunk {
    /// The MIDI format
    format: Format,
    /// Number of tracks the header declares
    ntrks: u16,
    /// Meaning of the delta-times
    division: Division,
}

impl HeaderChunk {
    /// Reads the first chunk of the file from `reader` and decodes it as the header.
    ///
    /// Unusual but structurally valid headers come back as warnings rather than errors.
    pub fn decode(reader: &mut ChunkReader<'_>) -> Result<(Self, Vec<Warning>), HeaderError> {
        let chunk = reader
            .next_chunk()?
            .ok_or(Truncated {
                offset: reader.offset(),
            })?;

        if chunk.chunk_type != HEADER_CHUNK {
            return Err(HeaderError::BadSignature(chunk.chunk_type));
        }
        if chunk.len() != HEADER_LEN as usize {
            return Err(HeaderError::BadHeaderLength(chunk.len() as u32));
        }

        let &[f0, f1, n0, n1, d0, d1] = chunk.body(reader.buffer()) else {
            return Err(HeaderError::BadHeaderLength(chunk.len() as u32));
        };
        let format = u16::from_be_bytes([f0, f1]);
        let ntrks = u16::from_be_bytes([n0, n1]);
        let division = Division::try_from([d0, d1])?;

        let header = Self {
            format: format.into(),
            ntrks,
            division,
        };
        debug!(format, ntrks, ?division, "decoded header");

        let mut warnings = vec![];
        if let Format::Unknown(raw) = header.format {
            Warning::UnknownFormat(raw).record(&mut warnings);
        }
        if header.format == Format::Zero && ntrks > 1 {
            Warning::SingleTrackFormatWithMultipleTracks { declared: ntrks }.record(&mut warnings);
        }

        Ok((header, warnings))
    }

    /// The MIDI format
    pub fn format(&self) -> Format {
        self.format
    }

    /// Number of tracks declared by the header, which may disagree with the format
    pub fn ntrks(&self) -> u16 {
        self.ntrks
    }

    /// Meaning of the delta-times
    pub fn division(&self) -> Division {
        self.division
    }
}

/// The overall organization of the MIDI file. Only three values are defined, anything else is
/// kept verbatim for forward compatibility
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Format {
    /// The file contains a single multi-channel track
    Zero,
    /// The file contains one or more simultaneous tracks (or MIDI outputs) of a sequence
    One,
    /// The file contains one or more sequentially independent single-track patterns
    Two,
    /// A format value this decoder does not know
    Unknown(u16),
}

impl Format {
    /// Short description of the format's track layout
    pub fn describe(&self) -> &'static str {
        match self {
            Self::Zero => "single track",
            Self::One => "several simultaneous tracks",
            Self::Two => "several independent tracks",
            Self::Unknown(_) => "invalid format",
        }
    }
}

impl From<u16> for Format {
    fn from(value: u16) -> Self {
        match value {
            0 => Format::Zero,
            1 => Format::One,
            2 => Format::Two,
            other => Format::Unknown(other),
        }
    }
}

impl From<Format> for u16 {
    fn from(value: Format) -> Self {
        match value {
            Format::Zero => 0,
            Format::One => 1,
            Format::Two => 2,
            Format::Unknown(other) => other,
        }
    }
}

/// The meaning of the delta-times in the MIDI sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Division {
    /// When the first byte is non-negative, the whole value is ticks per quarter note
    Metrical(u16),
    /// When the first byte is negative, it is the negated frame rate and the second byte is
    /// ticks per frame
    TimeCodeBased(SmpteTicks),
}

/// Division defined by time-code-based time
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SmpteTicks {
    /// Frames per second, conventionally 24, 25, 29 or 30
    fps: u8,
    /// Ticks per frame
    tpf: u8,
}

impl SmpteTicks {
    /// Creates a time-code division
    pub fn new(fps: u8, tpf: u8) -> Self {
        Self { fps, tpf }
    }
}

impl Division {
    /// Ticks per quarter note, if the division is metrical
    pub fn ticks_per_quarter_note(&self) -> Option<u16> {
        match self {
            Self::Metrical(ppqn) => Some(*ppqn),
            Self::TimeCodeBased(_) => None,
        }
    }

    /// Frames per second, if the division is time-code based
    pub fn frames_per_second(&self) -> Option<u8> {
        match self {
            Self::Metrical(_) => None,
            Self::TimeCodeBased(smpte) => Some(smpte.fps),
        }
    }

    /// Ticks per frame, if the division is time-code based
    pub fn ticks_per_frame(&self) -> Option<u8> {
        match self {
            Self::Metrical(_) => None,
            Self::TimeCodeBased(smpte) => Some(smpte.tpf),
        }
    }
}

impl TryFrom<[u8; 2]> for Division {
    type Error = HeaderError;
    fn try_from(value: [u8; 2]) -> Result<Self, Self::Error> {
        let first = value[0] as i8;

        if first >= 0 {
            match u16::from_be_bytes(value) {
                0 => Err(HeaderError::InvalidDivision),
                ppqn => Ok(Division::Metrical(ppqn)),
            }
        } else {
            // -128 has no i8 negation, so widen first
            let fps = (-(first as i16)) as u8;
            Ok(Division::TimeCodeBased(SmpteTicks {
                fps,
                tpf: value[1],
            }))
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use crate::{
        chunk::header::{Division, Format, HeaderChunk, HeaderError, SmpteTicks},
        reader::{ChunkReader, Truncated},
        warning::Warning,
    };

    fn header_bytes(format: u16, ntrks: u16, division: [u8; 2]) -> Vec<u8> {
        let mut bytes = b"MThd\0\0\0\x06".to_vec();
        bytes.extend(format.to_be_bytes());
        bytes.extend(ntrks.to_be_bytes());
        bytes.extend(division);
        bytes
    }

    fn decode(bytes: &[u8]) -> Result<(HeaderChunk, Vec<Warning>), HeaderError> {
        HeaderChunk::decode(&mut ChunkReader::new(bytes))
    }

    #[test]
    fn parsing_division_to_metrical_works() {
        let test = Division::try_from([0x4E, 0x20]).unwrap();

        assert_eq!(test, Division::Metrical(20000));
        assert_eq!(test.ticks_per_quarter_note(), Some(20000));
        assert_eq!(test.frames_per_second(), None);
        assert_eq!(test.ticks_per_frame(), None);
    }

    #[test]
    fn parsing_division_to_timecode_works() {
        let test = Division::try_from([0xE7, 0x28]).unwrap();

        assert_eq!(test, Division::TimeCodeBased(SmpteTicks::new(25, 40)));
        assert_eq!(test.frames_per_second(), Some(25));
        assert_eq!(test.ticks_per_frame(), Some(40));
        assert_eq!(test.ticks_per_quarter_note(), None);

        let test = Division::try_from([0xE2, 0x50]).unwrap();
        assert_eq!(test, Division::TimeCodeBased(SmpteTicks::new(30, 80)));
    }

    #[test]
    fn most_negative_frame_rate_does_not_overflow() {
        let test = Division::try_from([0x80, 0x01]).unwrap();
        assert_eq!(test, Division::TimeCodeBased(SmpteTicks::new(128, 1)));
    }

    #[test]
    fn zero_ppqn_is_invalid() {
        assert_eq!(
            Division::try_from([0x00, 0x00]),
            Err(HeaderError::InvalidDivision)
        );
    }

    #[test]
    fn header_chunk_reads_properly() {
        let bytes = header_bytes(1, 10, [0x01, 0x80]);
        let (header, warnings) = decode(&bytes).expect("Decode header chunk");

        assert_eq!(header.format(), Format::One);
        assert_eq!(header.ntrks(), 10);
        assert_eq!(header.division(), Division::Metrical(384));
        assert!(warnings.is_empty());
    }

    #[test]
    fn wrong_signature_is_rejected() {
        let mut bytes = header_bytes(0, 1, [0, 96]);
        bytes[..4].copy_from_slice(b"RIFF");

        assert_eq!(decode(&bytes), Err(HeaderError::BadSignature(*b"RIFF")));
    }

    #[test]
    fn wrong_length_is_rejected() {
        let bytes = b"MThd\0\0\0\x04\0\0\0\x01".to_vec();
        assert_eq!(decode(&bytes), Err(HeaderError::BadHeaderLength(4)));
    }

    #[test]
    fn empty_input_is_truncated() {
        assert_eq!(
            decode(&[]),
            Err(HeaderError::Truncated(Truncated { offset: 0 }))
        );
    }

    #[test]
    fn short_body_is_truncated() {
        let bytes = header_bytes(0, 1, [0, 96]);
        assert_eq!(
            decode(&bytes[..12]),
            Err(HeaderError::Truncated(Truncated { offset: 0 }))
        );
    }

    #[test]
    fn unknown_format_is_a_warning() {
        let bytes = header_bytes(3, 1, [0, 96]);
        let (header, warnings) = decode(&bytes).expect("Decode header chunk");

        assert_eq!(header.format(), Format::Unknown(3));
        assert_eq!(u16::from(header.format()), 3);
        assert_eq!(warnings, vec![Warning::UnknownFormat(3)]);
    }

    #[test]
    fn format_zero_with_many_tracks_is_a_warning() {
        let bytes = header_bytes(0, 2, [0, 96]);
        let (_, warnings) = decode(&bytes).expect("Decode header chunk");

        assert_eq!(
            warnings,
            vec![Warning::SingleTrackFormatWithMultipleTracks { declared: 2 }]
        );
    }

    #[test]
    fn format_descriptions() {
        assert_eq!(Format::from(0).describe(), "single track");
        assert_eq!(Format::from(2).describe(), "several independent tracks");
        assert_eq!(Format::from(9).describe(), "invalid format");
    }
}
