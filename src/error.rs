use std::io;
use thiserror::Error;

/// Boxed error wrapped by a [`CellError`](crate::CellError).
///
/// Parse callbacks may return any error convertible into this type, which
/// includes `&str` and `String` messages.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Error type for decoding operations.
///
/// Cell-level parse failures are never reported through this type; they are
/// collected on the [`Row`](crate::Row) instead.
#[derive(Error, Debug)]
pub enum DecodeError {
    /// IO error during file operations.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// CSV tokenizing error.
    #[error("CSV parsing error: {0}")]
    Csv(#[from] csv::Error),

    /// Error raised by a custom record reader.
    #[error("record reader error: {0}")]
    Reader(BoxError),

    /// The input ended before a header record could be read.
    #[error("missing header record: input is empty")]
    MissingHeader,

    /// `parse_header` was called more than once on the same decoder.
    #[error("header has already been parsed")]
    HeaderAlreadyParsed,

    /// Invalid decoder configuration.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// A rule specification could not be parsed.
    #[error("Invalid rule: {0}")]
    InvalidRule(String),
}

/// Result type alias for decoding operations.
pub type Result<T> = std::result::Result<T, DecodeError>;
