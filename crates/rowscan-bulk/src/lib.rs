//! Column-mapping projection for bulk copy.
//!
//! [`BulkCopyAdapter`] wraps any [`rowscan_model::RowCursor`] and exposes
//! only the destination columns of a validated [`ColumnMappings`] set, in
//! mapping order. [`copy_rows`] drains a cursor into a
//! [`rowscan_model::RecordSink`].
//!
//! # Example
//!
//! ```
//! use rowscan_bulk::{BulkCopyAdapter, ColumnMappings};
//! use rowscan_ingest::{DsvCursor, DsvOptions, ReaderLines};
//! use rowscan_model::{Mapping, Record, RowCursor};
//!
//! let text = "a,b,c\n1,\"x,y\",3\n";
//! let cursor = DsvCursor::new(ReaderLines::new(text.as_bytes()), DsvOptions::default())?;
//! let mappings = ColumnMappings::new(vec![
//!     Mapping::new("b", "B"),
//!     Mapping::new("missing", "M"),
//! ])?;
//! let mut adapter = BulkCopyAdapter::new(cursor, mappings);
//!
//! assert!(adapter.advance()?);
//! assert_eq!(adapter.field_count(), 2);
//! assert_eq!(adapter.name_of(0), "B");
//! assert_eq!(adapter.get_string(0)?, "x,y");
//! assert_eq!(adapter.name_of(1), "M");
//! assert!(adapter.is_null(1)?);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod adapter;
mod error;
mod mappings;

pub use adapter::{BulkCopyAdapter, copy_rows};
pub use error::{BulkError, Result};
pub use mappings::ColumnMappings;
