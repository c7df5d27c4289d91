//! Error types for the tag envelope boundary.

use thiserror::Error;

/// Structural problems found while reading an envelope.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("expected {expected}, found marker 0x{found:02x}")]
    TypeMismatch { expected: &'static str, found: u8 },

    #[error("string of {len} bytes exceeds limit of {limit} bytes")]
    StringTooLong { len: u32, limit: u32 },

    #[error("declared {needed} bytes but only {remaining} remain")]
    Truncated { needed: usize, remaining: usize },

    #[error("string is not valid UTF-8")]
    InvalidUtf8,

    #[error("integer does not fit in {0}")]
    OutOfRange(&'static str),

    #[error("unexpected end of input")]
    UnexpectedEnd,

    #[error("reserved marker 0xc1")]
    ReservedMarker,

    #[error("chapter id {0:?} appears more than once")]
    DuplicateChapterId(String),
}

/// Errors surfaced at the boundary.
#[derive(Error, Debug)]
pub enum Error {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("parse failed: {0}")]
    ParseFailed(#[from] ParseError),

    #[error("failed to allocate {requested} bytes")]
    MemoryAllocationFailed { requested: usize },

    #[error("serialize failed: {0}")]
    SerializeFailed(String),

    #[error("unsupported audio format")]
    UnsupportedFormat,

    #[error("failed to read file: {0}")]
    Read(#[source] std::io::Error),

    #[error("failed to save tag: {0}")]
    Save(#[source] id3::Error),

    #[error("tag error: {0}")]
    Tag(#[from] id3::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

/// Status codes understood by callers on the other side of the boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ErrorCode {
    Success = 0,
    InvalidInput = -1,
    IoRead = -2,
    IoWrite = -3,
    UnsupportedFormat = -4,
    ParseFailed = -5,
    MemoryAllocationFailed = -6,
    SerializeFailed = -7,
}

impl ErrorCode {
    /// Fixed human readable message for the code.
    pub fn message(self) -> &'static str {
        match self {
            ErrorCode::Success => "Success",
            ErrorCode::InvalidInput => "Invalid input parameters",
            ErrorCode::IoRead => "Failed to open file for reading",
            ErrorCode::IoWrite => "Failed to write tags to file",
            ErrorCode::UnsupportedFormat => "Unsupported audio format",
            ErrorCode::ParseFailed => "Failed to parse audio file",
            ErrorCode::MemoryAllocationFailed => "Memory allocation failed",
            ErrorCode::SerializeFailed => "Failed to serialize tag data",
        }
    }
}

impl Error {
    pub fn code(&self) -> ErrorCode {
        match self {
            Error::InvalidInput(_) => ErrorCode::InvalidInput,
            Error::ParseFailed(_) => ErrorCode::ParseFailed,
            Error::MemoryAllocationFailed { .. } => ErrorCode::MemoryAllocationFailed,
            Error::SerializeFailed(_) => ErrorCode::SerializeFailed,
            Error::UnsupportedFormat => ErrorCode::UnsupportedFormat,
            Error::Read(_) => ErrorCode::IoRead,
            Error::Save(_) => ErrorCode::IoWrite,
            // tags are only ever loaded through this variant
            Error::Tag(e) if matches!(e.kind, id3::ErrorKind::Io(_)) => ErrorCode::IoRead,
            Error::Tag(_) => ErrorCode::ParseFailed,
        }
    }
}
