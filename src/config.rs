//! Decode policy knobs

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Default cap on a single event's data body, comfortably above any legitimate meta text
pub const DEFAULT_MAX_EVENT_LEN: usize = 1 << 20;

/// What to do when a non-`MTrk` chunk shows up where a track was expected
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ChunkPolicy {
    /// Fail the whole decode
    #[default]
    Abort,
    /// Skip over the chunk, record a warning and try the next one
    Skip,
}

/// Configuration shared by every stage of a decode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct DecoderConfig {
    /// Largest data body a single event may carry before decoding fails
    pub max_event_len: usize,
    /// Handling of stray chunks between tracks
    pub unexpected_chunk: ChunkPolicy,
}

impl Default for DecoderConfig {
    fn default() -> Self {
        Self {
            max_event_len: DEFAULT_MAX_EVENT_LEN,
            unexpected_chunk: ChunkPolicy::default(),
        }
    }
}

impl DecoderConfig {
    /// Sets the per-event data cap
    pub fn with_max_event_len(mut self, max_event_len: usize) -> Self {
        self.max_event_len = max_event_len;
        self
    }

    /// Sets the stray chunk policy
    pub fn with_unexpected_chunk(mut self, policy: ChunkPolicy) -> Self {
        self.unexpected_chunk = policy;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::{ChunkPolicy, DecoderConfig, DEFAULT_MAX_EVENT_LEN};

    #[test]
    fn default_aborts_on_stray_chunks() {
        let config = DecoderConfig::default();

        assert_eq!(config.unexpected_chunk, ChunkPolicy::Abort);
        assert_eq!(config.max_event_len, DEFAULT_MAX_EVENT_LEN);
    }

    #[test]
    fn builder_overrides_fields() {
        let config = DecoderConfig::default()
            .with_max_event_len(16)
            .with_unexpected_chunk(ChunkPolicy::Skip);

        assert_eq!(
            config,
            DecoderConfig {
                max_event_len: 16,
                unexpected_chunk: ChunkPolicy::Skip,
            }
        );
    }
}
