//! Sections of the tag envelope: the derived audio descriptor, chapters and
//! lyrics.

pub mod chapters;
pub mod descriptor;
pub mod lyrics;

pub use descriptor::ExtendedAudioInfo;

use serde::{Deserialize, Serialize};

pub const CHAPTERS_KEY: &str = "chapters";
pub const LYRICS_KEY: &str = "lyrics";

/// Upper bounds on every string length read from an envelope, in bytes.
///
/// A declared length strictly greater than its bound fails the decode; it is
/// never truncated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecodeLimits {
    /// Top-level envelope keys
    pub max_key_len: u32,
    /// Keys inside chapter and lyrics entries
    pub max_field_key_len: u32,
    /// Chapter id and title, lyrics text
    pub max_value_len: u32,
    pub max_description_len: u32,
    pub max_language_len: u32,
}

impl Default for DecodeLimits {
    fn default() -> Self {
        Self {
            max_key_len: 255,
            max_field_key_len: 63,
            max_value_len: 16 * 1024 * 1024,
            max_description_len: 255,
            max_language_len: 15,
        }
    }
}
