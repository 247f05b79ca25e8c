//! Forward-only cursor over delimiter-separated text.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use rowscan_model::{CursorPosition, FieldTable, Record, RowCursor};
use tracing::{debug, trace, warn};

use crate::assembler::TokenAssembler;
use crate::error::{IngestError, Result};
use crate::header::{duplicate_names, normalize_header};
use crate::options::DsvOptions;
use crate::source::{AsyncLineSource, AsyncReaderLines, CancelFlag, LineSource, ReaderLines};

/// Sync file-backed cursor.
pub type FileCursor = DsvCursor<ReaderLines<BufReader<File>>>;

/// Async file-backed cursor.
pub type AsyncFileCursor =
    DsvCursor<AsyncReaderLines<tokio::io::BufReader<tokio::fs::File>>>;

/// A [`RowCursor`] over a header-plus-records DSV source.
///
/// The header fixes the shape: every record must split into exactly as
/// many tokens as there are header names. Each token goes through the
/// configured [`TokenParser`](crate::TokenParser) and lands in a fresh copy
/// of the header template, which replaces the current row only once the
/// whole record parsed.
///
/// `S` is a [`LineSource`] for [`advance`](RowCursor::advance) or an
/// [`AsyncLineSource`] for [`advance_async`](Self::advance_async).
#[derive(Debug)]
pub struct DsvCursor<S> {
    source: Option<S>,
    options: DsvOptions,
    header: Vec<String>,
    /// Field slot per header column; duplicate names share a slot.
    slots: Vec<usize>,
    template: FieldTable,
    current: FieldTable,
    assembler: TokenAssembler,
    row_number: u64,
    position: CursorPosition,
    exhausted: bool,
}

impl<S: LineSource> DsvCursor<S> {
    /// Bind a cursor to `source`, reading the header from its first line
    /// unless `options.header` is set.
    pub fn new(mut source: S, options: DsvOptions) -> Result<Self> {
        options.validate()?;
        let mut assembler = header_assembler(&options);
        let header = match &options.header {
            Some(names) => names.clone(),
            None => {
                if !assembler.fill(&mut source)? {
                    return Err(IngestError::EmptyHeader);
                }
                read_header(&mut assembler)?
            }
        };
        Self::bind(source, options, assembler, header)
    }
}

impl FileCursor {
    /// Open a file-backed cursor.
    pub fn open(path: impl AsRef<Path>, options: DsvOptions) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| not_found_or_io(path, e))?;
        debug!(path = %path.display(), "opening DSV file");
        Self::new(ReaderLines::new(BufReader::new(file)), options)
    }
}

impl<S: AsyncLineSource> DsvCursor<S> {
    /// Async [`new`](DsvCursor::new); reading the header honours `cancel`.
    pub async fn new_async(mut source: S, options: DsvOptions, cancel: &CancelFlag) -> Result<Self> {
        options.validate()?;
        let mut assembler = header_assembler(&options);
        let header = match &options.header {
            Some(names) => names.clone(),
            None => {
                if !assembler.fill_async(&mut source, cancel).await? {
                    return Err(IngestError::EmptyHeader);
                }
                read_header(&mut assembler)?
            }
        };
        Self::bind(source, options, assembler, header)
    }

    /// Populate the next record, suspending only while reading a line.
    ///
    /// A cancelled or failed read leaves the current row untouched and keeps
    /// the partial record, so a later call resumes where this one stopped.
    pub async fn advance_async(&mut self, cancel: &CancelFlag) -> Result<bool> {
        if self.exhausted {
            return Ok(false);
        }
        let Some(source) = self.source.as_mut() else {
            return Ok(false);
        };
        let filled = self.assembler.fill_async(source, cancel).await;
        self.complete(filled)
    }
}

impl AsyncFileCursor {
    /// Open a file-backed async cursor.
    pub async fn open_async(
        path: impl AsRef<Path>,
        options: DsvOptions,
        cancel: &CancelFlag,
    ) -> Result<Self> {
        let path = path.as_ref();
        let file = tokio::fs::File::open(path)
            .await
            .map_err(|e| not_found_or_io(path, e))?;
        debug!(path = %path.display(), "opening DSV file");
        let source = AsyncReaderLines::new(tokio::io::BufReader::new(file));
        Self::new_async(source, options, cancel).await
    }
}

impl<S> DsvCursor<S> {
    fn bind(
        source: S,
        options: DsvOptions,
        assembler: TokenAssembler,
        header: Vec<String>,
    ) -> Result<Self> {
        let header: Vec<String> = if options.trim_headers {
            header.iter().map(|name| normalize_header(name)).collect()
        } else {
            header
        };
        let duplicates = duplicate_names(&header);
        if !duplicates.is_empty() {
            warn!(
                duplicates = ?duplicates,
                "duplicate header names share one field; the last token wins"
            );
        }
        let template = FieldTable::from_names(header.iter().map(String::as_str));
        let slots = header
            .iter()
            .map(|name| template.ordinal_of(name))
            .collect::<rowscan_model::Result<Vec<_>>>()?;
        let assembler = assembler
            .with_skip_blank_lines(options.skip_blank_lines)
            .with_expected_tokens(header.len());
        debug!(
            columns = header.len(),
            delimiter = %options.delimiter,
            "DSV cursor ready"
        );
        Ok(Self {
            source: Some(source),
            current: template.clone(),
            template,
            header,
            slots,
            options,
            assembler,
            row_number: 0,
            position: CursorPosition::BeforeFirst,
            exhausted: false,
        })
    }

    /// Header names in column order, duplicates included.
    pub fn header(&self) -> &[String] {
        &self.header
    }

    /// Physical lines consumed so far, header included.
    pub fn line_number(&self) -> u64 {
        self.assembler.line_number()
    }

    pub fn position(&self) -> CursorPosition {
        self.position
    }

    /// True once the source reported end of data.
    pub fn is_exhausted(&self) -> bool {
        self.exhausted
    }

    pub fn options(&self) -> &DsvOptions {
        &self.options
    }

    /// Drop the line source. Safe to call any number of times.
    pub fn close(&mut self) {
        if self.source.take().is_some() {
            debug!(rows = self.row_number, "DSV cursor closed");
        }
    }

    pub fn is_closed(&self) -> bool {
        self.source.is_none()
    }

    /// Turn one fill outcome into an advance result.
    fn complete(&mut self, filled: Result<bool>) -> Result<bool> {
        match filled {
            Ok(true) => {
                let parsed = self.populate();
                self.assembler.reset();
                parsed.map(|()| true)
            }
            Ok(false) => {
                self.exhausted = true;
                debug!(rows = self.row_number, "DSV source exhausted");
                Ok(false)
            }
            Err(err @ IngestError::UnterminatedQualifier { .. }) => {
                self.assembler.reset();
                self.exhausted = true;
                Err(err)
            }
            Err(err @ IngestError::RecordTooLarge { .. }) => {
                self.assembler.reset();
                Err(err)
            }
            Err(err) => Err(err),
        }
    }

    fn populate(&mut self) -> Result<()> {
        let line = self.assembler.line_number();
        let tokens = self.assembler.split()?;
        let expected = self.assembler.expected_tokens();
        if tokens.len() != expected {
            return Err(IngestError::ColumnCountMismatch {
                row: self.row_number + 1,
                line,
                actual: tokens.len(),
                expected,
            });
        }

        if self.assembler.line_count() > 1 {
            trace!(
                line,
                lines = self.assembler.line_count(),
                "record spans several physical lines"
            );
        }

        let mut row = self.template.clone();
        for (&slot, token) in self.slots.iter().zip(&tokens) {
            row.set_at(slot, self.options.parser.parse(token))?;
        }
        self.current = row;
        self.row_number += 1;
        self.position = CursorPosition::Positioned;
        trace!(row = self.row_number, line, "record parsed");
        Ok(())
    }
}

impl<S> Record for DsvCursor<S> {
    fn fields(&self) -> &FieldTable {
        &self.current
    }

    fn row_number(&self) -> u64 {
        self.row_number
    }
}

impl<S: LineSource> RowCursor for DsvCursor<S> {
    type Error = IngestError;

    fn advance(&mut self) -> Result<bool> {
        if self.exhausted {
            return Ok(false);
        }
        let Some(source) = self.source.as_mut() else {
            return Ok(false);
        };
        let filled = self.assembler.fill(source);
        self.complete(filled)
    }

    fn close(&mut self) {
        DsvCursor::close(self);
    }

    fn is_closed(&self) -> bool {
        DsvCursor::is_closed(self)
    }
}

/// Header lines are read with blank skipping off so a blank first line is
/// reported instead of silently passed over.
fn header_assembler(options: &DsvOptions) -> TokenAssembler {
    TokenAssembler::new(options.delimiter.as_str(), options.qualifier.as_str(), 0)
        .with_max_bytes(options.max_record_bytes)
}

fn read_header(assembler: &mut TokenAssembler) -> Result<Vec<String>> {
    let text = assembler.as_str();
    if text.trim().is_empty() {
        return Err(IngestError::EmptyHeader);
    }
    if !text.contains(assembler.delimiter()) {
        return Err(IngestError::MissingDelimiter {
            delimiter: assembler.delimiter().to_string(),
            header: text.to_string(),
        });
    }
    let names = assembler.split()?;
    assembler.reset();
    Ok(names)
}

fn not_found_or_io(path: &Path, e: std::io::Error) -> IngestError {
    if e.kind() == std::io::ErrorKind::NotFound {
        IngestError::FileNotFound {
            path: path.to_path_buf(),
        }
    } else {
        IngestError::Io(e)
    }
}
