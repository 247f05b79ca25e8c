//! Validated mapping sets.

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use rowscan_model::{FieldKey, FieldTable, KeyMode, Mapping};

use crate::error::{BulkError, Result};

/// An ordered, validated list of [`Mapping`]s.
///
/// Every populated source key and every destination key use the same
/// addressing mode, and no destination appears twice.
#[derive(Debug, Clone)]
pub struct ColumnMappings {
    mappings: Vec<Mapping>,
    mode: KeyMode,
}

impl ColumnMappings {
    pub fn new(mappings: Vec<Mapping>) -> Result<Self> {
        let first = mappings.first().ok_or(BulkError::EmptyMappings)?;
        let mode = first.destination.mode();

        let mut seen = HashSet::new();
        for (index, mapping) in mappings.iter().enumerate() {
            let (source, destination) = mapping.modes();
            for found in source.into_iter().chain([destination]) {
                if found != mode {
                    return Err(BulkError::MixedMappingKinds {
                        index,
                        expected: mode,
                        found,
                    });
                }
            }
            if !seen.insert(destination_identity(&mapping.destination)) {
                return Err(BulkError::DuplicateDestination {
                    destination: mapping.destination.to_string(),
                });
            }
        }
        Ok(Self { mappings, mode })
    }

    /// Parse a JSON array of `{"source", "destination"}` objects.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let mappings: Vec<Mapping> = serde_json::from_str(json)?;
        Self::new(mappings)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path).map_err(|source| BulkError::MappingFile {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&contents)
    }

    pub fn key_mode(&self) -> KeyMode {
        self.mode
    }

    pub fn len(&self) -> usize {
        self.mappings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mappings.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Mapping> {
        self.mappings.iter()
    }

    /// Blank destination table, one slot per mapping in order.
    pub(crate) fn template(&self) -> FieldTable {
        match self.mode {
            KeyMode::Name => FieldTable::from_names(
                self.mappings
                    .iter()
                    .map(|mapping| mapping.destination.to_string()),
            ),
            KeyMode::Ordinal => FieldTable::from_ordinals(self.mappings.iter().filter_map(
                |mapping| match mapping.destination {
                    FieldKey::Ordinal(ordinal) => Some(ordinal),
                    FieldKey::Name(_) => None,
                },
            )),
        }
    }
}

impl<'a> IntoIterator for &'a ColumnMappings {
    type Item = &'a Mapping;
    type IntoIter = std::slice::Iter<'a, Mapping>;

    fn into_iter(self) -> Self::IntoIter {
        self.mappings.iter()
    }
}

fn destination_identity(key: &FieldKey) -> String {
    match key {
        FieldKey::Name(name) => name.to_lowercase(),
        FieldKey::Ordinal(ordinal) => ordinal.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_homogeneous_names() {
        let mappings = ColumnMappings::new(vec![
            Mapping::new("b", "B"),
            Mapping::unsourced("C"),
            Mapping::new("", "D"),
        ])
        .unwrap();
        assert_eq!(mappings.len(), 3);
        assert_eq!(mappings.key_mode(), KeyMode::Name);
        let template = mappings.template();
        assert_eq!(template.names().collect::<Vec<_>>(), vec!["B", "C", "D"]);
    }

    #[test]
    fn accepts_homogeneous_ordinals() {
        let mappings =
            ColumnMappings::new(vec![Mapping::new(2usize, 0usize), Mapping::new(0usize, 1usize)])
                .unwrap();
        assert_eq!(mappings.key_mode(), KeyMode::Ordinal);
        assert_eq!(mappings.template().key_mode(), KeyMode::Ordinal);
    }

    #[test]
    fn rejects_mixed_kinds() {
        let err = ColumnMappings::new(vec![Mapping::new("a", "A"), Mapping::new(1usize, 1usize)])
            .unwrap_err();
        assert!(matches!(err, BulkError::MixedMappingKinds { index: 1, .. }));

        let err = ColumnMappings::new(vec![Mapping::new(0usize, "A")]).unwrap_err();
        assert!(matches!(
            err,
            BulkError::MixedMappingKinds {
                index: 0,
                expected: KeyMode::Name,
                found: KeyMode::Ordinal
            }
        ));
    }

    #[test]
    fn rejects_empty_and_duplicates() {
        assert!(matches!(
            ColumnMappings::new(Vec::new()),
            Err(BulkError::EmptyMappings)
        ));
        let err = ColumnMappings::new(vec![Mapping::new("a", "X"), Mapping::new("b", "x")])
            .unwrap_err();
        assert!(matches!(err, BulkError::DuplicateDestination { .. }));
    }

    #[test]
    fn parses_json() {
        let mappings = ColumnMappings::from_json_str(
            r#"[{"source": "b", "destination": "B"}, {"destination": "M"}]"#,
        )
        .unwrap();
        assert_eq!(mappings.len(), 2);
        assert!(mappings.iter().nth(1).unwrap().source.is_none());

        let err = ColumnMappings::from_json_str("{").unwrap_err();
        assert!(matches!(err, BulkError::MappingConfig(_)));
    }
}
