//! Reader options for DSV cursors.

use std::fmt;
use std::sync::Arc;

use rowscan_model::Value;

use crate::error::{IngestError, Result};

/// Injected token → value parser.
#[derive(Clone)]
pub struct TokenParser {
    name: &'static str,
    parse: Arc<dyn Fn(&str) -> Value + Send + Sync>,
}

impl TokenParser {
    /// Keep every token as raw text (the default).
    pub fn text() -> Self {
        Self {
            name: "text",
            parse: Arc::new(|token: &str| Value::Text(token.to_string())),
        }
    }

    /// Infer booleans, numbers, ISO date-times and GUIDs; empty tokens are missing.
    pub fn inferred() -> Self {
        Self {
            name: "inferred",
            parse: Arc::new(Value::infer),
        }
    }

    /// Use a custom parser.
    pub fn new<F>(parse: F) -> Self
    where
        F: Fn(&str) -> Value + Send + Sync + 'static,
    {
        Self {
            name: "custom",
            parse: Arc::new(parse),
        }
    }

    pub fn parse(&self, token: &str) -> Value {
        (self.parse)(token)
    }
}

impl Default for TokenParser {
    fn default() -> Self {
        Self::text()
    }
}

impl fmt::Debug for TokenParser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("TokenParser").field(&self.name).finish()
    }
}

/// Options for reading DSV text.
#[derive(Debug, Clone)]
pub struct DsvOptions {
    /// Token separator. Defaults to `,`.
    pub delimiter: String,

    /// Field qualifier. Defaults to `"`; empty disables qualified fields.
    pub qualifier: String,

    /// Explicit header. When `None` the first line of the source is the header.
    pub header: Option<Vec<String>>,

    /// Trim whitespace and a byte order mark from header names.
    /// Defaults to true.
    pub trim_headers: bool,

    /// Ignore empty physical lines between records.
    /// Defaults to false: an empty line is a record of one empty token.
    pub skip_blank_lines: bool,

    /// Upper bound on one assembled record, in bytes.
    /// Defaults to `None` (unbounded).
    pub max_record_bytes: Option<usize>,

    /// Token → value parser applied to every data token.
    pub parser: TokenParser,
}

impl Default for DsvOptions {
    fn default() -> Self {
        Self {
            delimiter: ",".to_string(),
            qualifier: "\"".to_string(),
            header: None,
            trim_headers: true,
            skip_blank_lines: false,
            max_record_bytes: None,
            parser: TokenParser::default(),
        }
    }
}

impl DsvOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the delimiter.
    #[must_use]
    pub fn with_delimiter(mut self, delimiter: impl Into<String>) -> Self {
        self.delimiter = delimiter.into();
        self
    }

    /// Set the qualifier.
    #[must_use]
    pub fn with_qualifier(mut self, qualifier: impl Into<String>) -> Self {
        self.qualifier = qualifier.into();
        self
    }

    /// Use an explicit header instead of the first line.
    #[must_use]
    pub fn with_header<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.header = Some(names.into_iter().map(Into::into).collect());
        self
    }

    #[must_use]
    pub fn with_trim_headers(mut self, enabled: bool) -> Self {
        self.trim_headers = enabled;
        self
    }

    #[must_use]
    pub fn with_skip_blank_lines(mut self, enabled: bool) -> Self {
        self.skip_blank_lines = enabled;
        self
    }

    #[must_use]
    pub fn with_max_record_bytes(mut self, limit: Option<usize>) -> Self {
        self.max_record_bytes = limit;
        self
    }

    #[must_use]
    pub fn with_parser(mut self, parser: TokenParser) -> Self {
        self.parser = parser;
        self
    }

    /// Check that the delimiter and qualifier can frame a record.
    pub fn validate(&self) -> Result<()> {
        if self.delimiter.is_empty() {
            return Err(IngestError::invalid_options("delimiter must not be empty"));
        }
        if self.delimiter == self.qualifier {
            return Err(IngestError::invalid_options(
                "delimiter and qualifier must differ",
            ));
        }
        for (label, value) in [("delimiter", &self.delimiter), ("qualifier", &self.qualifier)] {
            if value.contains(['\n', '\r']) {
                return Err(IngestError::invalid_options(format!(
                    "{label} must not contain a line break"
                )));
            }
        }
        if let Some(header) = &self.header
            && header.is_empty()
        {
            return Err(IngestError::EmptyHeader);
        }
        Ok(())
    }
}
