//! Forward-only cursor contract.
//!
//! A cursor starts [`CursorPosition::BeforeFirst`] and moves to
//! [`CursorPosition::Positioned`] after the first successful
//! [`RowCursor::advance`]. There is no terminal state: exhaustion is an
//! `Ok(false)` from `advance`, after which the last row stays readable and
//! every further call keeps returning `Ok(false)`.
//!
//! Accessors never perform I/O; only `advance` touches the source.

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::error::{ModelError, Result};
use crate::fields::{FieldKey, FieldTable};
use crate::value::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CursorPosition {
    #[default]
    BeforeFirst,
    Positioned,
}

/// Read access to the current record.
///
/// Implementors provide the field table and row counter; everything else
/// is derived. Before the first row the table is the blank template, so
/// names and counts are available while every value is missing.
pub trait Record {
    fn fields(&self) -> &FieldTable;

    /// Number of successful advances so far (1-based row number of the current row).
    fn row_number(&self) -> u64;

    fn field_count(&self) -> usize {
        self.fields().count()
    }

    /// Column name at an ordinal, or `""` when out of range.
    fn name_of(&self, ordinal: usize) -> &str {
        self.fields().name_at(ordinal)
    }

    fn ordinal_of(&self, name: &str) -> Result<usize> {
        self.fields().ordinal_of(name)
    }

    fn contains(&self, key: &FieldKey) -> bool {
        self.fields().contains(key)
    }

    fn get_value(&self, ordinal: usize) -> Result<&Value> {
        let fields = self.fields();
        fields
            .value_at(ordinal)
            .ok_or_else(|| ModelError::ordinal_out_of_range(ordinal, fields.count()))
    }

    fn get_value_by_name(&self, name: &str) -> Result<&Value> {
        self.fields()
            .get_by_name(name)
            .ok_or_else(|| ModelError::column_not_found(name))
    }

    fn is_null(&self, ordinal: usize) -> Result<bool> {
        Ok(self.get_value(ordinal)?.is_null())
    }

    fn type_name_of(&self, ordinal: usize) -> Result<&'static str> {
        Ok(self.get_value(ordinal)?.type_name())
    }

    fn get_bool(&self, ordinal: usize) -> Result<bool> {
        self.get_value(ordinal)?.to_bool()
    }

    fn get_i16(&self, ordinal: usize) -> Result<i16> {
        self.get_value(ordinal)?.to_i16()
    }

    fn get_i32(&self, ordinal: usize) -> Result<i32> {
        self.get_value(ordinal)?.to_i32()
    }

    fn get_i64(&self, ordinal: usize) -> Result<i64> {
        self.get_value(ordinal)?.to_i64()
    }

    fn get_f32(&self, ordinal: usize) -> Result<f32> {
        self.get_value(ordinal)?.to_f32()
    }

    fn get_f64(&self, ordinal: usize) -> Result<f64> {
        self.get_value(ordinal)?.to_f64()
    }

    fn get_decimal(&self, ordinal: usize) -> Result<Decimal> {
        self.get_value(ordinal)?.to_decimal()
    }

    fn get_datetime(&self, ordinal: usize) -> Result<NaiveDateTime> {
        self.get_value(ordinal)?.to_datetime()
    }

    fn get_guid(&self, ordinal: usize) -> Result<Uuid> {
        self.get_value(ordinal)?.to_guid()
    }

    fn get_char(&self, ordinal: usize) -> Result<char> {
        self.get_value(ordinal)?.to_char()
    }

    fn get_string(&self, ordinal: usize) -> Result<String> {
        self.get_value(ordinal)?.to_text()
    }

    fn get_bytes(&self, ordinal: usize) -> Result<Vec<u8>> {
        self.get_value(ordinal)?.to_bytes()
    }
}

/// A forward-only, pull-based row source.
pub trait RowCursor: Record {
    type Error: std::error::Error + From<ModelError>;

    /// Populate the next record.
    ///
    /// Returns `Ok(false)` once the source is exhausted, leaving the last
    /// row in place. The row counter moves only on `Ok(true)`.
    fn advance(&mut self) -> std::result::Result<bool, Self::Error>;

    /// Release the underlying source. Safe to call any number of times.
    fn close(&mut self);

    fn is_closed(&self) -> bool;
}

/// Consumer of projected rows, e.g. a bulk-insert writer.
pub trait RecordSink {
    type Error: std::error::Error;

    fn write_header(&mut self, names: &[&str]) -> std::result::Result<(), Self::Error>;

    fn write_row(&mut self, values: &[Value]) -> std::result::Result<(), Self::Error>;

    fn finish(&mut self) -> std::result::Result<(), Self::Error> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixed {
        fields: FieldTable,
    }

    impl Record for Fixed {
        fn fields(&self) -> &FieldTable {
            &self.fields
        }

        fn row_number(&self) -> u64 {
            1
        }
    }

    fn fixed() -> Fixed {
        let mut fields = FieldTable::from_names(["flag", "count", "label"]);
        fields.set_at(0, Value::from("true")).unwrap();
        fields.set_at(1, Value::Int(12)).unwrap();
        fields.set_at(2, Value::Null).unwrap();
        Fixed { fields }
    }

    #[test]
    fn typed_getters_coerce_stored_values() {
        let record = fixed();
        assert!(record.get_bool(0).unwrap());
        assert_eq!(record.get_i32(1).unwrap(), 12);
        assert_eq!(record.get_f64(1).unwrap(), 12.0);
        assert_eq!(record.get_string(1).unwrap(), "12");
    }

    #[test]
    fn is_null_covers_null_and_missing() {
        let mut record = fixed();
        assert!(record.is_null(2).unwrap());
        record.fields.set_at(2, Value::Missing).unwrap();
        assert!(record.is_null(2).unwrap());
        assert!(!record.is_null(1).unwrap());
    }

    #[test]
    fn lookups_report_structured_errors() {
        let record = fixed();
        assert_eq!(record.name_of(9), "");
        assert_eq!(record.ordinal_of("LABEL").unwrap(), 2);
        assert!(matches!(
            record.get_value(3),
            Err(ModelError::OrdinalOutOfRange { ordinal: 3, count: 3 })
        ));
        assert!(matches!(
            record.get_value_by_name("nope"),
            Err(ModelError::ColumnNotFound { .. })
        ));
        assert!(matches!(
            record.get_i32(2),
            Err(ModelError::Conversion { .. })
        ));
    }
}
