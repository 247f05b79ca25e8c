//! File-level operations behind the CLI subcommands.

use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use rowscan_bulk::{BulkCopyAdapter, ColumnMappings, copy_rows};
use rowscan_ingest::{DsvCursor, DsvOptions, DsvWriter, FileCursor};
use rowscan_model::{Record, RowCursor, Value};
use tracing::{debug, info, info_span, trace};

use crate::logging::row_values;

/// First rows of a file, ready for display.
#[derive(Debug, Clone, PartialEq)]
pub struct Preview {
    /// Field names after duplicate header names collapsed.
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Value>>,
    /// More rows follow the previewed ones.
    pub truncated: bool,
}

/// Interpret `\t` and `tab` as a tab character; other values pass through.
pub fn unescape_separator(value: &str) -> String {
    match value {
        "\\t" | "tab" => "\t".to_string(),
        other => other.to_string(),
    }
}

fn open(path: &Path, options: DsvOptions) -> Result<FileCursor> {
    DsvCursor::open(path, options).with_context(|| format!("open {}", path.display()))
}

fn log_row<R: Record>(record: &R) {
    trace!(
        row = record.row_number(),
        values = %row_values(record.fields().values()),
        "row read"
    );
}

/// Read up to `limit` rows.
pub fn preview(path: &Path, options: DsvOptions, limit: usize) -> Result<Preview> {
    let span = info_span!("preview", path = %path.display());
    let _guard = span.enter();

    let mut cursor = open(path, options)?;
    let columns = cursor.fields().names().map(String::from).collect();
    let mut rows = Vec::new();
    while rows.len() < limit && cursor.advance()? {
        log_row(&cursor);
        rows.push(cursor.fields().values().to_vec());
    }
    let truncated = rows.len() == limit && has_more_rows(&mut cursor)?;
    info!(rows = rows.len(), truncated, "preview read");
    Ok(Preview {
        columns,
        rows,
        truncated,
    })
}

/// A malformed record after the preview still means more rows follow.
fn has_more_rows(cursor: &mut FileCursor) -> Result<bool> {
    match cursor.advance() {
        Ok(more) => Ok(more),
        Err(err) if err.is_record_error() => {
            debug!(error = %err, "record after the preview is malformed");
            Ok(true)
        }
        Err(err) => Err(err.into()),
    }
}

/// Count the records of a file.
pub fn count_rows(path: &Path, options: DsvOptions) -> Result<u64> {
    let span = info_span!("count", path = %path.display());
    let _guard = span.enter();

    let mut cursor = open(path, options)?;
    while cursor.advance()? {
        log_row(&cursor);
    }
    info!(rows = cursor.row_number(), lines = cursor.line_number(), "count finished");
    Ok(cursor.row_number())
}

/// Project a file through `mappings` and write the result as DSV to `out`.
///
/// The output uses the same delimiter and qualifier as the input.
pub fn copy_file<W: Write>(
    path: &Path,
    options: DsvOptions,
    mappings: ColumnMappings,
    out: W,
) -> Result<u64> {
    let span = info_span!("copy", path = %path.display());
    let _guard = span.enter();

    let mut writer = DsvWriter::with_options(out, &options);
    let cursor = open(path, options)?;
    let mut adapter = BulkCopyAdapter::new(cursor, mappings);
    let rows = copy_rows::<_, _, anyhow::Error>(&mut adapter, &mut writer)
        .with_context(|| format!("copy rows from {}", path.display()))?;
    adapter.close();
    info!(rows, "copy finished");
    Ok(rows)
}
