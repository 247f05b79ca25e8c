//! Data model shared by every row cursor.
//!
//! This crate defines the pieces a forward-only cursor is built from:
//!
//! - **Values**: [`Value`], a tagged union over the field types a row can
//!   carry, with culture-invariant coercions to concrete Rust types
//! - **Field tables**: [`FieldTable`], the ordered, case-insensitive
//!   "current record" shared by all cursor implementations
//! - **Mappings**: [`Mapping`], a source → destination column pair used to
//!   project one cursor's rows into another column shape
//! - **Cursor contract**: [`Record`] and [`RowCursor`], plus the
//!   [`RecordSink`] boundary consumed by bulk-insert collaborators
//!
//! # Example
//!
//! ```
//! use rowscan_model::{FieldTable, Value};
//!
//! let mut row = FieldTable::from_names(["id", "Name"]);
//! row.set_by_name("name", Value::from("Ada")).unwrap();
//!
//! assert_eq!(row.ordinal_of("NAME").unwrap(), 1);
//! assert_eq!(row.value_at(1), Some(&Value::Text("Ada".to_string())));
//! assert!(row.value_at(0).is_some_and(Value::is_null));
//! ```

mod convert;
pub mod cursor;
mod error;
pub mod fields;
pub mod mapping;
pub mod value;

pub use cursor::{CursorPosition, Record, RecordSink, RowCursor};
pub use error::{ModelError, Result};
pub use fields::{FieldKey, FieldTable, KeyMode};
pub use mapping::Mapping;
pub use value::Value;
