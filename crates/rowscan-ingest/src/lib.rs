//! Delimiter-separated value (DSV) cursors.
//!
//! This crate turns line-oriented text into forward-only rows:
//!
//! - **Line sources**: [`LineSource`] / [`AsyncLineSource`] supply one
//!   physical line at a time from readers, iterators or closures
//! - **Record assembly**: [`TokenAssembler`] joins physical lines until an
//!   open qualified field is closed, reading lazily
//! - **Splitting**: [`split_record`] tokenizes one logical record and
//!   [`join_record`] is its qualifier-aware inverse
//! - **Cursor**: [`DsvCursor`] binds a header to the above and exposes the
//!   [`rowscan_model::RowCursor`] contract, with a cancellable async path
//! - **Output**: [`DsvWriter`] writes rows back out as DSV text
//!
//! # Example
//!
//! ```
//! use rowscan_ingest::{DsvCursor, DsvOptions, ReaderLines};
//! use rowscan_model::{Record, RowCursor};
//!
//! let text = "a,b,c\n1,\"x,y\",3\n";
//! let mut cursor = DsvCursor::new(ReaderLines::new(text.as_bytes()), DsvOptions::default())?;
//!
//! assert!(cursor.advance()?);
//! assert_eq!(cursor.get_string(1)?, "x,y");
//! assert!(!cursor.advance()?);
//! # Ok::<(), rowscan_ingest::IngestError>(())
//! ```

mod assembler;
mod cursor;
mod error;
mod header;
mod options;
mod source;
mod split;
mod writer;

// === Error Types ===
pub use error::{IngestError, Result};

// === Line Sources ===
pub use source::{
    AsyncLineSource, AsyncReaderLines, CancelFlag, FnLines, IterLines, LINE_TERMINATOR,
    LineSource, ReaderLines,
};

// === Record Assembly and Splitting ===
pub use assembler::TokenAssembler;
pub use split::{SplitError, join_record, split_record};

// === Cursor ===
pub use cursor::{AsyncFileCursor, DsvCursor, FileCursor};
pub use header::normalize_header;
pub use options::{DsvOptions, TokenParser};

// === Output ===
pub use writer::DsvWriter;
