//! Ordered, case-insensitive field tables.
//!
//! A [`FieldTable`] is the "current record" of a cursor. Its layout (keys,
//! display names and lookup indexes) is built once and shared behind an
//! [`Arc`]; only the value vector is per row. Cloning a table therefore
//! copies values without touching the shared layout, which is how cursors
//! populate a private working copy before swapping it in as current.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::{ModelError, Result};
use crate::value::Value;

/// Column key: a case-insensitive name or a zero-based ordinal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldKey {
    Ordinal(usize),
    Name(String),
}

impl FieldKey {
    pub fn name(name: impl Into<String>) -> Self {
        Self::Name(name.into())
    }

    /// Returns true for a name key that is empty after trimming.
    pub fn is_blank(&self) -> bool {
        matches!(self, Self::Name(name) if name.trim().is_empty())
    }

    pub fn mode(&self) -> KeyMode {
        match self {
            Self::Name(_) => KeyMode::Name,
            Self::Ordinal(_) => KeyMode::Ordinal,
        }
    }
}

impl fmt::Display for FieldKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Name(name) => f.write_str(name),
            Self::Ordinal(ordinal) => write!(f, "{ordinal}"),
        }
    }
}

impl From<&str> for FieldKey {
    fn from(value: &str) -> Self {
        Self::Name(value.to_string())
    }
}

impl From<String> for FieldKey {
    fn from(value: String) -> Self {
        Self::Name(value)
    }
}

impl From<usize> for FieldKey {
    fn from(value: usize) -> Self {
        Self::Ordinal(value)
    }
}

/// Addressing mode a table's identity keys were built with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum KeyMode {
    Name,
    Ordinal,
}

#[derive(Debug)]
struct FieldLayout {
    mode: KeyMode,
    keys: Vec<FieldKey>,
    names: Vec<String>,
    by_name: HashMap<String, usize>,
    by_ordinal: HashMap<usize, usize>,
}

impl FieldLayout {
    fn new(mode: KeyMode) -> Self {
        Self {
            mode,
            keys: Vec::new(),
            names: Vec::new(),
            by_name: HashMap::new(),
            by_ordinal: HashMap::new(),
        }
    }

    /// Append a key unless an equal one exists; duplicates share the first slot.
    fn push(&mut self, key: FieldKey) {
        let name = key.to_string();
        let folded = fold(&name);
        if self.by_name.contains_key(&folded) {
            return;
        }
        let position = self.keys.len();
        if let FieldKey::Ordinal(ordinal) = key {
            self.by_ordinal.insert(ordinal, position);
        }
        self.by_name.insert(folded, position);
        self.names.push(name);
        self.keys.push(key);
    }
}

fn fold(name: &str) -> String {
    name.to_lowercase()
}

/// Ordered collection of the current record's fields.
#[derive(Debug, Clone)]
pub struct FieldTable {
    layout: Arc<FieldLayout>,
    values: Vec<Value>,
}

impl FieldTable {
    /// Build a name-keyed table; every field starts as [`Value::Missing`].
    ///
    /// Names that differ only by case collapse into the first slot.
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut layout = FieldLayout::new(KeyMode::Name);
        for name in names {
            layout.push(FieldKey::Name(name.into()));
        }
        Self::with_layout(layout)
    }

    /// Build an ordinal-keyed table; every field starts as [`Value::Missing`].
    pub fn from_ordinals<I>(ordinals: I) -> Self
    where
        I: IntoIterator<Item = usize>,
    {
        let mut layout = FieldLayout::new(KeyMode::Ordinal);
        for ordinal in ordinals {
            layout.push(FieldKey::Ordinal(ordinal));
        }
        Self::with_layout(layout)
    }

    fn with_layout(layout: FieldLayout) -> Self {
        let values = vec![Value::Missing; layout.keys.len()];
        Self {
            layout: Arc::new(layout),
            values,
        }
    }

    /// A copy sharing this layout with every value reset to missing.
    pub fn blank(&self) -> Self {
        Self {
            layout: Arc::clone(&self.layout),
            values: vec![Value::Missing; self.values.len()],
        }
    }

    pub fn key_mode(&self) -> KeyMode {
        self.layout.mode
    }

    pub fn count(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Resolve a key to its position.
    ///
    /// Names match case-insensitively. Ordinals match identity keys on an
    /// ordinal-keyed table and positions on a name-keyed table.
    pub fn position_of(&self, key: &FieldKey) -> Option<usize> {
        match key {
            FieldKey::Name(name) => self.layout.by_name.get(&fold(name)).copied(),
            FieldKey::Ordinal(ordinal) => match self.layout.mode {
                KeyMode::Ordinal => self.layout.by_ordinal.get(ordinal).copied(),
                KeyMode::Name => (*ordinal < self.values.len()).then_some(*ordinal),
            },
        }
    }

    pub fn contains(&self, key: &FieldKey) -> bool {
        self.position_of(key).is_some()
    }

    pub fn contains_name(&self, name: &str) -> bool {
        self.layout.by_name.contains_key(&fold(name))
    }

    pub fn get(&self, key: &FieldKey) -> Option<&Value> {
        self.position_of(key).map(|position| &self.values[position])
    }

    pub fn get_by_name(&self, name: &str) -> Option<&Value> {
        self.layout
            .by_name
            .get(&fold(name))
            .map(|position| &self.values[*position])
    }

    pub fn value_at(&self, position: usize) -> Option<&Value> {
        self.values.get(position)
    }

    /// Display name at a position, or `""` when out of range.
    pub fn name_at(&self, position: usize) -> &str {
        self.layout
            .names
            .get(position)
            .map_or("", String::as_str)
    }

    /// Identity key at a position.
    pub fn key_at(&self, position: usize) -> Option<&FieldKey> {
        self.layout.keys.get(position)
    }

    pub fn ordinal_of(&self, name: &str) -> Result<usize> {
        self.layout
            .by_name
            .get(&fold(name))
            .copied()
            .ok_or_else(|| ModelError::column_not_found(name))
    }

    pub fn set(&mut self, key: &FieldKey, value: Value) -> Result<()> {
        let position = self
            .position_of(key)
            .ok_or_else(|| ModelError::unknown_key(key.to_string()))?;
        self.values[position] = value;
        Ok(())
    }

    pub fn set_by_name(&mut self, name: &str, value: Value) -> Result<()> {
        let position = self.ordinal_of(name)?;
        self.values[position] = value;
        Ok(())
    }

    pub fn set_at(&mut self, position: usize, value: Value) -> Result<()> {
        let count = self.values.len();
        let slot = self
            .values
            .get_mut(position)
            .ok_or_else(|| ModelError::ordinal_out_of_range(position, count))?;
        *slot = value;
        Ok(())
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.layout.names.iter().map(String::as_str)
    }

    pub fn values(&self) -> &[Value] {
        &self.values
    }

    /// Iterate `(name, value)` pairs in column order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.names().zip(self.values.iter())
    }

    /// Returns true when both tables were derived from the same template.
    pub fn shares_layout(&self, other: &FieldTable) -> bool {
        Arc::ptr_eq(&self.layout, &other.layout)
    }
}
