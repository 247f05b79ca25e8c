//! Error types for column mapping configuration.

use std::path::PathBuf;

use rowscan_model::KeyMode;
use thiserror::Error;

/// Errors raised while building a mapping set.
#[derive(Debug, Error)]
pub enum BulkError {
    /// A mapping set needs at least one entry.
    #[error("mapping set is empty")]
    EmptyMappings,

    /// Name-keyed and ordinal-keyed entries were mixed.
    #[error("mapping {index} uses {found:?} addressing but the set uses {expected:?}")]
    MixedMappingKinds {
        index: usize,
        expected: KeyMode,
        found: KeyMode,
    },

    /// Two entries target the same destination column.
    #[error("destination '{destination}' is mapped more than once")]
    DuplicateDestination { destination: String },

    /// Mapping JSON could not be parsed.
    #[error("invalid mapping configuration: {0}")]
    MappingConfig(#[from] serde_json::Error),

    /// Mapping file could not be read.
    #[error("failed to read mapping file {path}: {source}")]
    MappingFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Result type for mapping operations.
pub type Result<T> = std::result::Result<T, BulkError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_messages() {
        let err = BulkError::MixedMappingKinds {
            index: 1,
            expected: KeyMode::Name,
            found: KeyMode::Ordinal,
        };
        assert_eq!(
            err.to_string(),
            "mapping 1 uses Ordinal addressing but the set uses Name"
        );

        let err = BulkError::DuplicateDestination {
            destination: "B".to_string(),
        };
        assert_eq!(err.to_string(), "destination 'B' is mapped more than once");
    }
}
