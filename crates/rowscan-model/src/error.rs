//! Error types for field lookup and value conversion.

use thiserror::Error;

/// Errors raised by field tables and value coercions.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelError {
    /// No column with this name exists in the current record.
    #[error("column not found: {name}")]
    ColumnNotFound { name: String },

    /// Ordinal is past the end of the current record.
    #[error("ordinal {ordinal} is out of range for {count} fields")]
    OrdinalOutOfRange { ordinal: usize, count: usize },

    /// Key is not part of the table layout.
    #[error("unknown field key: {key}")]
    UnknownKey { key: String },

    /// Stored value cannot be coerced to the requested type.
    #[error("cannot convert {from} value '{value}' to {to}")]
    Conversion {
        from: &'static str,
        to: &'static str,
        value: String,
    },
}

/// Result type alias for model operations.
pub type Result<T> = std::result::Result<T, ModelError>;

impl ModelError {
    /// Create a ColumnNotFound error.
    pub fn column_not_found(name: impl Into<String>) -> Self {
        Self::ColumnNotFound { name: name.into() }
    }

    /// Create an OrdinalOutOfRange error.
    pub fn ordinal_out_of_range(ordinal: usize, count: usize) -> Self {
        Self::OrdinalOutOfRange { ordinal, count }
    }

    /// Create an UnknownKey error.
    pub fn unknown_key(key: impl Into<String>) -> Self {
        Self::UnknownKey { key: key.into() }
    }
}
