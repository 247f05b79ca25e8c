//! DSV output sink.

use std::io::Write;

use rowscan_model::{RecordSink, Value};
use tracing::debug;

use crate::error::{IngestError, Result};
use crate::options::DsvOptions;
use crate::split::join_record;

/// Writes a header and rows as delimiter-separated text, one record per line.
///
/// Values are rendered with their invariant `Display` form; null and
/// missing values become empty tokens.
pub struct DsvWriter<W: Write> {
    out: W,
    delimiter: String,
    qualifier: String,
    rows: u64,
}

impl<W: Write> DsvWriter<W> {
    /// Comma-delimited, double-quote-qualified output.
    pub fn new(out: W) -> Self {
        Self::with_options(out, &DsvOptions::default())
    }

    /// Use the delimiter and qualifier of `options`.
    pub fn with_options(out: W, options: &DsvOptions) -> Self {
        Self {
            out,
            delimiter: options.delimiter.clone(),
            qualifier: options.qualifier.clone(),
            rows: 0,
        }
    }

    pub fn rows_written(&self) -> u64 {
        self.rows
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn write_record<S: AsRef<str>>(&mut self, tokens: &[S]) -> Result<()> {
        let line = join_record(tokens, &self.delimiter, &self.qualifier);
        self.out.write_all(line.as_bytes())?;
        self.out.write_all(b"\n")?;
        Ok(())
    }
}

impl<W: Write> RecordSink for DsvWriter<W> {
    type Error = IngestError;

    fn write_header(&mut self, names: &[&str]) -> Result<()> {
        self.write_record(names)
    }

    fn write_row(&mut self, values: &[Value]) -> Result<()> {
        let tokens: Vec<String> = values.iter().map(Value::to_string).collect();
        self.write_record(&tokens)?;
        self.rows += 1;
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        self.out.flush()?;
        debug!(rows = self.rows, "DSV output flushed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writes_header_and_qualified_rows() {
        let mut writer = DsvWriter::new(Vec::new());
        writer.write_header(&["id", "note"]).unwrap();
        writer
            .write_row(&[Value::Int(1), Value::from("a,b")])
            .unwrap();
        writer.write_row(&[Value::Null, Value::Missing]).unwrap();
        writer.finish().unwrap();

        assert_eq!(writer.rows_written(), 2);
        let text = String::from_utf8(writer.into_inner()).unwrap();
        assert_eq!(text, "id,note\n1,\"a,b\"\n,\n");
    }

    #[test]
    fn honours_custom_delimiter() {
        let options = DsvOptions::new().with_delimiter("\t").with_qualifier("'");
        let mut writer = DsvWriter::with_options(Vec::new(), &options);
        writer.write_row(&[Value::from("it's"), Value::Bool(true)]).unwrap();
        let text = String::from_utf8(writer.into_inner()).unwrap();
        assert_eq!(text, "'it''s'\ttrue\n");
    }
}
