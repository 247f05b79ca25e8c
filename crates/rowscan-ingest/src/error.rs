//! Error types for DSV ingestion.

use std::path::PathBuf;

use rowscan_model::ModelError;
use thiserror::Error;

/// Errors that can occur while opening or advancing a DSV cursor.
#[derive(Debug, Error)]
pub enum IngestError {
    // === Construction Errors ===
    /// Source file does not exist.
    #[error("DSV file not found: {path}")]
    FileNotFound { path: PathBuf },

    /// Header line is blank or the source is empty.
    #[error("header line is empty")]
    EmptyHeader,

    /// Header line does not contain the declared delimiter.
    #[error("delimiter '{delimiter}' not found in header line '{header}'")]
    MissingDelimiter { delimiter: String, header: String },

    /// Reader options are unusable.
    #[error("invalid reader options: {message}")]
    InvalidOptions { message: String },

    // === Structural Parse Errors ===
    /// Assembled record split into a different number of tokens than the header.
    #[error("row {row} (line {line}) has {actual} fields, expected {expected}")]
    ColumnCountMismatch {
        row: u64,
        line: u64,
        actual: usize,
        expected: usize,
    },

    /// Source ended inside a qualified field.
    #[error("unterminated qualified field in record ending at line {line}")]
    UnterminatedQualifier { line: u64 },

    /// Splitter rejected an assembled record.
    #[error("malformed record at line {line}: {message}")]
    MalformedRecord { line: u64, message: String },

    /// Record grew past the configured byte limit; `line` is where it started.
    #[error("record starting at line {line} exceeds {limit} bytes")]
    RecordTooLarge { line: u64, limit: usize },

    // === Control Flow ===
    /// Async read was cancelled before the record completed.
    #[error("read cancelled")]
    Cancelled,

    /// Field lookup or conversion failed.
    #[error(transparent)]
    Model(#[from] ModelError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for ingestion operations.
pub type Result<T> = std::result::Result<T, IngestError>;

impl IngestError {
    /// Create an InvalidOptions error.
    pub fn invalid_options(message: impl Into<String>) -> Self {
        Self::InvalidOptions {
            message: message.into(),
        }
    }

    /// Returns true for errors tied to one record; the cursor stays usable.
    pub fn is_record_error(&self) -> bool {
        matches!(
            self,
            Self::ColumnCountMismatch { .. }
                | Self::MalformedRecord { .. }
                | Self::RecordTooLarge { .. }
        )
    }
}
