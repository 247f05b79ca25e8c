//! Cursor projection through a mapping set.

use rowscan_model::{FieldTable, Record, RecordSink, RowCursor};
use tracing::{debug, trace};

use crate::mappings::ColumnMappings;

/// Projects a source cursor onto the destination columns of a mapping set.
///
/// The adapter has one field per mapping, named by the mapping's
/// destination. Each advance starts from a copy of the previous row, so a
/// mapping whose source key is absent from the current source row keeps
/// its prior value. Closing the adapter closes the source exactly once.
pub struct BulkCopyAdapter<C: RowCursor> {
    source: C,
    mappings: ColumnMappings,
    current: FieldTable,
    row_number: u64,
    closed: bool,
}

impl<C: RowCursor> BulkCopyAdapter<C> {
    pub fn new(source: C, mappings: ColumnMappings) -> Self {
        let current = mappings.template();
        debug!(
            columns = mappings.len(),
            mode = ?mappings.key_mode(),
            "bulk copy adapter ready"
        );
        Self {
            source,
            mappings,
            current,
            row_number: 0,
            closed: false,
        }
    }

    pub fn source(&self) -> &C {
        &self.source
    }

    pub fn mappings(&self) -> &ColumnMappings {
        &self.mappings
    }

    /// Destination column names in mapping order.
    pub fn destination_names(&self) -> impl Iterator<Item = &str> {
        self.current.names()
    }
}

impl<C: RowCursor> Record for BulkCopyAdapter<C> {
    fn fields(&self) -> &FieldTable {
        &self.current
    }

    fn row_number(&self) -> u64 {
        self.row_number
    }
}

impl<C: RowCursor> RowCursor for BulkCopyAdapter<C> {
    type Error = C::Error;

    fn advance(&mut self) -> Result<bool, C::Error> {
        if self.closed || !self.source.advance()? {
            return Ok(false);
        }
        let row = self.source.fields();
        let mut next = self.current.clone();
        for (position, mapping) in self.mappings.iter().enumerate() {
            let Some(key) = mapping.source_key() else {
                continue;
            };
            match row.get(key) {
                Some(value) => next.set_at(position, value.clone())?,
                None => trace!(
                    source = %key,
                    destination = %mapping.destination,
                    "source column absent; keeping previous value"
                ),
            }
        }
        self.current = next;
        self.row_number += 1;
        Ok(true)
    }

    fn close(&mut self) {
        if !self.closed {
            self.closed = true;
            self.source.close();
            debug!(rows = self.row_number, "bulk copy adapter closed");
        }
    }

    fn is_closed(&self) -> bool {
        self.closed
    }
}

impl<C: RowCursor> Drop for BulkCopyAdapter<C> {
    fn drop(&mut self) {
        self.close();
    }
}

/// Stream every remaining row of `cursor` into `sink`, header first.
///
/// Returns the number of rows written.
pub fn copy_rows<C, K, E>(cursor: &mut C, sink: &mut K) -> Result<u64, E>
where
    C: RowCursor,
    K: RecordSink,
    E: From<C::Error> + From<K::Error>,
{
    let names: Vec<&str> = cursor.fields().names().collect();
    sink.write_header(&names)?;

    let mut rows = 0u64;
    while cursor.advance()? {
        sink.write_row(cursor.fields().values())?;
        rows += 1;
    }
    sink.finish()?;
    debug!(rows, "bulk copy finished");
    Ok(rows)
}
