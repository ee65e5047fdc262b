//! Error taxonomy for the display core
//!
//! Every failure aborts the current render and is reported to the immediate
//! caller. Nothing is retried.

use thiserror::Error;

/// Errors produced while building, encoding, animating or delivering frames
#[derive(Debug, Error)]
pub enum Error {
    /// Input text contains a character the glyph table cannot render
    #[error("invalid character {ch:?} at position {position}")]
    InvalidCharacter { ch: char, position: usize },

    /// A frame violates the row count or column-count invariants
    #[error("invalid frame geometry: {0}")]
    InvalidGeometry(String),

    /// The output transport reported a write failure
    #[error("output sink failed")]
    Sink(#[source] std::io::Error),

    /// A font table could not be parsed
    #[error("font table line {line}: {message}")]
    Font { line: usize, message: String },
}

/// Result alias for core operations
pub type Result<T> = std::result::Result<T, Error>;

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Sink(err)
    }
}
