//! Convert between an audio file's tag model and a compact MessagePack
//! envelope of its extended audio properties, chapters and lyrics.

pub mod codec;
pub mod envelope;
pub mod error;
pub mod format;
pub mod metadata;
pub mod wire;

pub use envelope::{read_tags, write_tags, TagSnapshot, TagUpdate};
pub use error::{Error, ErrorCode, Result};
