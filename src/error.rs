// src/error.rs

use std::fmt;

use crate::lzw::LzwError;

/// The primary error type for all operations in this crate.
#[derive(Debug)]
pub enum GifError {
    /// An error occurred writing to the underlying byte sink.
    Io(std::io::Error),
    /// RGBA input was not a whole number of 4-byte pixels, or a palette
    /// exceeded 256 entries.
    InvalidInput(String),
    /// Auto mode's first `write_frame` call did not supply a palette.
    MissingFirstFramePalette,
    /// An invariant the encoder relies on did not hold. These are not
    /// expected to occur; they indicate a bug rather than bad input.
    Internal(String),
}

impl std::error::Error for GifError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            GifError::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl fmt::Display for GifError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GifError::Io(err) => write!(f, "I/O error: {err}"),
            GifError::InvalidInput(msg) => write!(f, "invalid input: {msg}"),
            GifError::MissingFirstFramePalette => {
                write!(f, "first frame in auto mode requires a palette")
            }
            GifError::Internal(msg) => write!(f, "internal invariant violated: {msg}"),
        }
    }
}

impl From<std::io::Error> for GifError {
    fn from(err: std::io::Error) -> Self {
        GifError::Io(err)
    }
}

impl From<LzwError> for GifError {
    fn from(err: LzwError) -> Self {
        GifError::Internal(format!("LZW encoder: {err}"))
    }
}

/// A specialized `Result` type for this crate's operations.
pub type Result<T> = std::result::Result<T, GifError>;
