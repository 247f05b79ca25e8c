//! Turns parsed arguments into pipeline calls.

use std::fs::File;
use std::io::{self, BufWriter, Write};

use anyhow::{Context, Result};
use rowscan_bulk::ColumnMappings;
use rowscan_cli::pipeline::{Preview, copy_file, count_rows, preview, unescape_separator};
use rowscan_ingest::{DsvOptions, TokenParser};
use tracing::debug;

use crate::cli::{CopyArgs, CountArgs, PreviewArgs, ReaderArgs};

fn reader_options(args: &ReaderArgs) -> Result<DsvOptions> {
    let mut options = DsvOptions::new()
        .with_delimiter(unescape_separator(&args.delimiter))
        .with_qualifier(args.qualifier.clone())
        .with_skip_blank_lines(args.skip_blank_lines)
        .with_max_record_bytes(args.max_record_bytes);
    if !args.header.is_empty() {
        options = options.with_header(args.header.iter().cloned());
    }
    options.validate().context("reader options")?;
    Ok(options)
}

pub fn run_preview(args: &PreviewArgs) -> Result<Preview> {
    let mut options = reader_options(&args.reader)?;
    if args.infer {
        options = options.with_parser(TokenParser::inferred());
    }
    preview(&args.reader.file, options, args.limit)
}

pub fn run_count(args: &CountArgs) -> Result<u64> {
    let options = reader_options(&args.reader)?;
    count_rows(&args.reader.file, options)
}

pub fn run_copy(args: &CopyArgs) -> Result<u64> {
    let options = reader_options(&args.reader)?;
    let mappings = ColumnMappings::load(&args.mapping)
        .with_context(|| format!("load mapping {}", args.mapping.display()))?;
    debug!(mappings = mappings.len(), "mapping loaded");

    match &args.output {
        Some(path) => {
            let file =
                File::create(path).with_context(|| format!("create {}", path.display()))?;
            copy_file(&args.reader.file, options, mappings, BufWriter::new(file))
        }
        None => {
            let stdout = io::stdout();
            let rows = copy_file(&args.reader.file, options, mappings, stdout.lock())?;
            io::stdout().flush()?;
            Ok(rows)
        }
    }
}
