//! Multi-line record assembly.
//!
//! A qualified field may contain line breaks, so one logical record can
//! span several physical lines. [`TokenAssembler`] keeps pulling lines
//! from a source and joining them with [`LINE_TERMINATOR`] until every
//! qualified section is closed. Lines are read only while the record is
//! still open.

use std::fmt;

use crate::error::{IngestError, Result};
use crate::source::{AsyncLineSource, CancelFlag, LINE_TERMINATOR, LineSource};
use crate::split::split_record;

/// Accumulates physical lines into one qualifier-balanced logical record.
#[derive(Debug, Clone)]
pub struct TokenAssembler {
    delimiter: String,
    qualifier: String,
    expected_tokens: usize,
    skip_blank_lines: bool,
    max_bytes: Option<usize>,
    text: String,
    line_count: usize,
    qualifiers: usize,
    /// Physical lines consumed by records that were already reset.
    line_base: u64,
    /// Physical lines consumed by the current record, skipped blanks included.
    lines_consumed: u64,
    /// Line number of the first line of the current record.
    record_start: u64,
    /// An oversized record ended inside a qualified field; lines are
    /// dropped until that field closes.
    discarding: bool,
}

impl TokenAssembler {
    pub fn new(
        delimiter: impl Into<String>,
        qualifier: impl Into<String>,
        expected_tokens: usize,
    ) -> Self {
        Self {
            delimiter: delimiter.into(),
            qualifier: qualifier.into(),
            expected_tokens,
            skip_blank_lines: false,
            max_bytes: None,
            text: String::new(),
            line_count: 0,
            qualifiers: 0,
            line_base: 0,
            lines_consumed: 0,
            record_start: 0,
            discarding: false,
        }
    }

    /// Ignore empty lines that arrive before a record has started.
    #[must_use]
    pub fn with_skip_blank_lines(mut self, enabled: bool) -> Self {
        self.skip_blank_lines = enabled;
        self
    }

    /// Fail with [`IngestError::RecordTooLarge`] once the text exceeds `limit` bytes.
    #[must_use]
    pub fn with_max_bytes(mut self, limit: Option<usize>) -> Self {
        self.max_bytes = limit;
        self
    }

    #[must_use]
    pub fn with_expected_tokens(mut self, expected_tokens: usize) -> Self {
        self.expected_tokens = expected_tokens;
        self
    }

    pub fn delimiter(&self) -> &str {
        &self.delimiter
    }

    pub fn qualifier(&self) -> &str {
        &self.qualifier
    }

    pub fn expected_tokens(&self) -> usize {
        self.expected_tokens
    }

    /// Append one physical line.
    ///
    /// A record that outgrows the byte limit is dropped. When it was cut
    /// off inside a qualified field, the lines up to the closing qualifier
    /// are dropped as well, so the next record starts on a record boundary.
    pub fn push_line(&mut self, line: &str) -> Result<()> {
        self.lines_consumed += 1;
        let qualifiers = self.count_qualifiers(line);
        if self.discarding {
            if qualifiers % 2 == 1 {
                self.discarding = false;
            }
            return Ok(());
        }
        if self.line_count == 0 {
            if self.skip_blank_lines && line.is_empty() {
                return Ok(());
            }
            self.record_start = self.line_number();
        } else {
            self.text.push_str(LINE_TERMINATOR);
        }
        self.text.push_str(line);
        self.line_count += 1;
        self.qualifiers += qualifiers;
        if let Some(limit) = self.max_bytes
            && self.text.len() > limit
        {
            self.discarding = !self.is_valid();
            return Err(IngestError::RecordTooLarge {
                line: self.record_start,
                limit,
            });
        }
        Ok(())
    }

    fn count_qualifiers(&self, line: &str) -> usize {
        if self.qualifier.is_empty() {
            0
        } else {
            line.matches(self.qualifier.as_str()).count()
        }
    }

    /// True while the tail of an oversized qualified field is being dropped.
    pub fn is_discarding(&self) -> bool {
        self.discarding
    }

    /// True when no qualified section is left open.
    pub fn is_valid(&self) -> bool {
        self.qualifiers % 2 == 0
    }

    /// True when no line has been accepted since the last reset.
    pub fn is_empty(&self) -> bool {
        self.line_count == 0
    }

    /// Physical lines joined into the current text.
    pub fn line_count(&self) -> usize {
        self.line_count
    }

    pub fn lines_consumed(&self) -> u64 {
        self.lines_consumed
    }

    /// 1-based number of the last physical line read, across resets.
    pub fn line_number(&self) -> u64 {
        self.line_base + self.lines_consumed
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Split the assembled text into raw tokens.
    pub fn split(&self) -> Result<Vec<String>> {
        split_record(&self.text, &self.delimiter, &self.qualifier).map_err(|err| {
            IngestError::MalformedRecord {
                line: self.line_number(),
                message: err.to_string(),
            }
        })
    }

    /// Drop the current text and start the next record.
    ///
    /// A pending discard of an oversized record's tail survives the reset.
    pub fn reset(&mut self) {
        self.line_base += self.lines_consumed;
        self.lines_consumed = 0;
        self.text.clear();
        self.line_count = 0;
        self.qualifiers = 0;
    }

    fn is_complete(&self) -> bool {
        !self.is_empty() && self.is_valid()
    }

    fn end_of_source(&self) -> Result<bool> {
        if self.is_empty() && !self.discarding {
            Ok(false)
        } else {
            Err(IngestError::UnterminatedQualifier {
                line: self.line_number(),
            })
        }
    }

    /// Read lines until a complete record is assembled.
    ///
    /// Returns `Ok(false)` when the source ends before any text was
    /// accepted. Partial text is kept on error so a retry resumes the same
    /// record.
    pub fn fill<S: LineSource + ?Sized>(&mut self, source: &mut S) -> Result<bool> {
        while !self.is_complete() {
            match source.next_line()? {
                Some(line) => self.push_line(&line)?,
                None => return self.end_of_source(),
            }
        }
        Ok(true)
    }

    /// Async [`fill`](Self::fill); `cancel` is checked before every read.
    pub async fn fill_async<S: AsyncLineSource>(
        &mut self,
        source: &mut S,
        cancel: &CancelFlag,
    ) -> Result<bool> {
        while !self.is_complete() {
            if cancel.is_cancelled() {
                return Err(IngestError::Cancelled);
            }
            match source.next_line().await? {
                Some(line) => self.push_line(&line)?,
                None => return self.end_of_source(),
            }
        }
        Ok(true)
    }
}

impl fmt::Display for TokenAssembler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}
