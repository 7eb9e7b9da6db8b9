//! Meta event classification

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Status byte that introduces every meta event
pub const META_STATUS: u8 = 0xFF;

/// Meta type of the End-Of-Track marker
pub const END_OF_TRACK: u8 = 0x2F;

/// The kind of a meta event, as named by its type byte
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum MetaKind {
    /// Sequence Number, tag 0x00
    SequenceNumber,
    /// Text metadata, tag 0x01
    Text,
    /// Copyright, tag 0x02
    Copyright,
    /// Sequence or track name, tag 0x03
    TrackName,
    /// Instrument name, tag 0x04
    InstrumentName,
    /// Lyric, tag 0x05
    Lyric,
    /// Marker, tag 0x06
    Marker,
    /// Cue Point, tag 0x07
    CuePoint,
    /// Program name, tag 0x08
    ProgramName,
    /// Device (port) name, tag 0x09
    DeviceName,
    /// Midi Channel Prefix, tag 0x20
    MidiChannelPrefix,
    /// End of Track Identifier, tag 0x2F
    EndOfTrack,
    /// Tempo, tag 0x51
    Tempo,
    /// Smpte Offset, tag 0x54
    SmpteOffset,
    /// Time signature, tag 0x58
    TimeSignature,
    /// Key Signature, tag 0x59
    KeySignature,
    /// Sequencer Specific, tag 0x7f
    SequencerSpecific,
    /// A type byte with no defined meaning
    Unknown(u8),
}

impl MetaKind {
    /// Returns the specific event's tag
    pub fn get_tag(&self) -> u8 {
        match self {
            Self::SequenceNumber => 0x00,
            Self::Text => 0x01,
            Self::Copyright => 0x02,
            Self::TrackName => 0x03,
            Self::InstrumentName => 0x04,
            Self::Lyric => 0x05,
            Self::Marker => 0x06,
            Self::CuePoint => 0x07,
            Self::ProgramName => 0x08,
            Self::DeviceName => 0x09,
            Self::MidiChannelPrefix => 0x20,
            Self::EndOfTrack => END_OF_TRACK,
            Self::Tempo => 0x51,
            Self::SmpteOffset => 0x54,
            Self::TimeSignature => 0x58,
            Self::KeySignature => 0x59,
            Self::SequencerSpecific => 0x7F,
            Self::Unknown(tag) => *tag,
        }
    }

    /// Human readable name of the kind
    pub fn name(&self) -> &'static str {
        match self {
            Self::SequenceNumber => "Sequence Number",
            Self::Text => "Text",
            Self::Copyright => "Copyright",
            Self::TrackName => "Sequence/Track Name",
            Self::InstrumentName => "Instrument",
            Self::Lyric => "Lyric",
            Self::Marker => "Marker",
            Self::CuePoint => "Cue Point",
            Self::ProgramName => "Program Name",
            Self::DeviceName => "Device (Port) Name",
            Self::MidiChannelPrefix => "MIDI Channel Prefix",
            Self::EndOfTrack => "End Of Track",
            Self::Tempo => "Tempo",
            Self::SmpteOffset => "SMPTE Offset",
            Self::TimeSignature => "Time Signature",
            Self::KeySignature => "Key Signature",
            Self::SequencerSpecific => "Proprietary Event",
            Self::Unknown(_) => "Unknown",
        }
    }

    /// True for the kinds whose payload is free-form text
    pub fn is_text(&self) -> bool {
        matches!(self.get_tag(), 0x01..=0x09)
    }
}

impl From<u8> for MetaKind {
    fn from(tag: u8) -> Self {
        match tag {
            0x00 => Self::SequenceNumber,
            0x01 => Self::Text,
            0x02 => Self::Copyright,
            0x03 => Self::TrackName,
            0x04 => Self::InstrumentName,
            0x05 => Self::Lyric,
            0x06 => Self::Marker,
            0x07 => Self::CuePoint,
            0x08 => Self::ProgramName,
            0x09 => Self::DeviceName,
            0x20 => Self::MidiChannelPrefix,
            END_OF_TRACK => Self::EndOfTrack,
            0x51 => Self::Tempo,
            0x54 => Self::SmpteOffset,
            0x58 => Self::TimeSignature,
            0x59 => Self::KeySignature,
            0x7F => Self::SequencerSpecific,
            other => Self::Unknown(other),
        }
    }
}
