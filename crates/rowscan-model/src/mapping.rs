//! Column mappings between a source row and destination columns.

use serde::{Deserialize, Serialize};

use crate::fields::{FieldKey, KeyMode};

/// One source → destination column pair.
///
/// An absent or blank `source` still occupies a destination slot but is
/// never populated from the source row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mapping {
    #[serde(default)]
    pub source: Option<FieldKey>,
    pub destination: FieldKey,
}

impl Mapping {
    pub fn new(source: impl Into<FieldKey>, destination: impl Into<FieldKey>) -> Self {
        Self {
            source: Some(source.into()),
            destination: destination.into(),
        }
    }

    /// A destination slot with no source column.
    pub fn unsourced(destination: impl Into<FieldKey>) -> Self {
        Self {
            source: None,
            destination: destination.into(),
        }
    }

    /// The populated source key, skipping blank names.
    pub fn source_key(&self) -> Option<&FieldKey> {
        self.source.as_ref().filter(|key| !key.is_blank())
    }

    /// Addressing modes of the populated source and the destination.
    pub fn modes(&self) -> (Option<KeyMode>, KeyMode) {
        (
            self.source_key().map(FieldKey::mode),
            self.destination.mode(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_source_is_skipped() {
        let mapping = Mapping::new("  ", "B");
        assert_eq!(mapping.source_key(), None);
        assert_eq!(mapping.modes(), (None, KeyMode::Name));
    }

    #[test]
    fn deserializes_from_config_shape() {
        let json = r#"[
            {"source": "b", "destination": "B"},
            {"destination": "M"},
            {"source": 2, "destination": 0}
        ]"#;
        let mappings: Vec<Mapping> = serde_json::from_str(json).unwrap();
        assert_eq!(mappings[0], Mapping::new("b", "B"));
        assert_eq!(mappings[1], Mapping::unsourced("M"));
        assert_eq!(mappings[2].modes(), (Some(KeyMode::Ordinal), KeyMode::Ordinal));
    }
}
