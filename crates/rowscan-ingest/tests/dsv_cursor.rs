//! Tests for reading DSV text through `DsvCursor`.

use std::io::Write;

use rowscan_ingest::{
    DsvCursor, DsvOptions, DsvWriter, FnLines, IngestError, IterLines, LINE_TERMINATOR,
    ReaderLines, TokenParser,
};
use rowscan_model::{CursorPosition, Record, RecordSink, RowCursor, Value};
use tempfile::NamedTempFile;

fn reader(text: &str) -> DsvCursor<ReaderLines<&[u8]>> {
    DsvCursor::new(ReaderLines::new(text.as_bytes()), DsvOptions::default()).expect("open cursor")
}

fn temp_file(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("create temp file");
    file.write_all(contents.as_bytes()).expect("write file");
    file.flush().expect("flush file");
    file
}

#[test]
fn qualified_field_keeps_delimiter() {
    let mut cursor = reader("a,b,c\n1,\"x,y\",3\n");

    assert!(cursor.advance().unwrap());
    assert_eq!(cursor.field_count(), 3);
    assert_eq!(cursor.get_value_by_name("a").unwrap(), &Value::from("1"));
    assert_eq!(cursor.get_value_by_name("b").unwrap(), &Value::from("x,y"));
    assert_eq!(cursor.get_value_by_name("c").unwrap(), &Value::from("3"));
    assert!(!cursor.advance().unwrap());
}

#[test]
fn qualified_field_spans_physical_lines() {
    let mut cursor = reader("q1,q2\n\"line1\nline2\",q2\n");

    assert!(cursor.advance().unwrap());
    assert_eq!(
        cursor.get_string(0).unwrap(),
        format!("line1{LINE_TERMINATOR}line2")
    );
    assert_eq!(cursor.get_string(1).unwrap(), "q2");
    assert_eq!(cursor.line_number(), 3);
    assert!(!cursor.advance().unwrap());
}

#[test]
fn crlf_input_is_accepted() {
    let mut cursor = reader("id,name\r\n1,Ann\r\n2,Bob\r\n");
    assert!(cursor.advance().unwrap());
    assert_eq!(cursor.get_string(1).unwrap(), "Ann");
    assert!(cursor.advance().unwrap());
    assert_eq!(cursor.get_string(1).unwrap(), "Bob");
}

#[test]
fn every_parsed_record_matches_header_width() {
    let mut cursor = reader("a,b,c\n1,2,3\n4,5\n6,7,8\n9,10,11,12\n");
    let mut widths = Vec::new();
    let mut failures = Vec::new();
    loop {
        match cursor.advance() {
            Ok(true) => widths.push(cursor.field_count()),
            Ok(false) => break,
            Err(IngestError::ColumnCountMismatch {
                actual, expected, ..
            }) => failures.push((actual, expected)),
            Err(err) => panic!("unexpected error: {err}"),
        }
    }
    assert_eq!(widths, vec![3, 3]);
    assert_eq!(failures, vec![(2, 3), (4, 3)]);
}

#[test]
fn exhaustion_is_idempotent_and_keeps_last_row() {
    let mut cursor = reader("a,b\n1,2\n3,4\n");
    assert!(cursor.advance().unwrap());
    assert!(cursor.advance().unwrap());
    for _ in 0..3 {
        assert!(!cursor.advance().unwrap());
        assert_eq!(cursor.get_string(0).unwrap(), "3");
        assert_eq!(cursor.get_string(1).unwrap(), "4");
        assert_eq!(cursor.position(), CursorPosition::Positioned);
    }
    assert!(cursor.is_exhausted());
}

#[test]
fn row_counter_counts_successful_advances() {
    let mut text = String::from("n,square\n");
    for n in 0..25 {
        text.push_str(&format!("{n},{}\n", n * n));
    }
    let mut cursor = reader(&text);

    let mut previous = cursor.row_number();
    while cursor.advance().unwrap() {
        assert_eq!(cursor.row_number(), previous + 1);
        previous = cursor.row_number();
    }
    assert_eq!(cursor.row_number(), 25);
    assert!(!cursor.advance().unwrap());
    assert_eq!(cursor.row_number(), 25);
}

#[test]
fn blank_lines_are_records_by_default() {
    let mut strict = reader("a,b\n\n1,2\n");
    assert!(matches!(
        strict.advance(),
        Err(IngestError::ColumnCountMismatch {
            row: 1,
            line: 2,
            actual: 1,
            expected: 2,
        })
    ));
    assert!(strict.advance().unwrap());
    assert_eq!(strict.get_string(1).unwrap(), "2");

    let options = DsvOptions::new().with_skip_blank_lines(true);
    let text = "a,b\n\n1,2\n\n\n3,4\n";
    let mut lenient = DsvCursor::new(ReaderLines::new(text.as_bytes()), options).unwrap();
    assert!(lenient.advance().unwrap());
    assert!(lenient.advance().unwrap());
    assert_eq!(lenient.row_number(), 2);
    assert!(!lenient.advance().unwrap());
}

#[test]
fn single_column_empty_rows_are_kept() {
    let options = DsvOptions::new().with_header(["x"]);
    let mut cursor = DsvCursor::new(IterLines::new(["1", "", "3"]), options).unwrap();
    let mut values = Vec::new();
    while cursor.advance().unwrap() {
        values.push(cursor.get_string(0).unwrap());
    }
    assert_eq!(values, vec!["1", "", "3"]);
    assert_eq!(cursor.row_number(), 3);
}

#[test]
fn single_column_empty_rows_survive_writer() {
    let mut writer = DsvWriter::new(Vec::new());
    writer.write_header(&["x"]).unwrap();
    for token in ["1", "", "3"] {
        writer.write_row(&[Value::from(token)]).unwrap();
    }
    writer.finish().unwrap();
    let text = String::from_utf8(writer.into_inner()).unwrap();
    assert_eq!(text, "x\n1\n\"\"\n3\n");

    // A one-column header carries no delimiter, so pass it explicitly.
    let options = DsvOptions::new().with_header(["x"]);
    let mut cursor = DsvCursor::new(IterLines::new(text.lines().skip(1)), options).unwrap();
    let mut values = Vec::new();
    while cursor.advance().unwrap() {
        values.push(cursor.get_string(0).unwrap());
    }
    assert_eq!(values, vec!["1", "", "3"]);
}

#[test]
fn inferred_parser_and_typed_getters() {
    let options = DsvOptions::new().with_parser(TokenParser::inferred());
    let text = "flag,count,price,when,id,note\n\
                true,42,19.5,2024-01-15T08:30:00,67e55044-10b1-426f-9247-bb680e5fe0c8,\n";
    let mut cursor = DsvCursor::new(ReaderLines::new(text.as_bytes()), options).unwrap();
    assert!(cursor.advance().unwrap());

    assert!(cursor.get_bool(0).unwrap());
    assert_eq!(cursor.get_i16(1).unwrap(), 42);
    assert_eq!(cursor.get_i64(1).unwrap(), 42);
    assert_eq!(cursor.get_f32(2).unwrap(), 19.5);
    assert_eq!(cursor.get_decimal(2).unwrap().to_string(), "19.5");
    assert_eq!(
        cursor.get_datetime(3).unwrap().to_string(),
        "2024-01-15 08:30:00"
    );
    assert_eq!(
        cursor.get_guid(4).unwrap().to_string(),
        "67e55044-10b1-426f-9247-bb680e5fe0c8"
    );
    assert!(cursor.is_null(5).unwrap());
    assert_eq!(cursor.type_name_of(1).unwrap(), "int");
    assert!(cursor.get_i32(5).is_err());
}

#[test]
fn custom_delimiter_and_qualifier() {
    let options = DsvOptions::new().with_delimiter("|").with_qualifier("'");
    let text = "name|quote\nAnn|'it''s | fine'\n";
    let mut cursor = DsvCursor::new(ReaderLines::new(text.as_bytes()), options).unwrap();
    assert!(cursor.advance().unwrap());
    assert_eq!(cursor.get_string(1).unwrap(), "it's | fine");
}

#[test]
fn header_bom_and_whitespace_are_trimmed() {
    let mut cursor = reader("\u{feff} id , name \n1,Ann\n");
    assert_eq!(cursor.header(), ["id", "name"]);
    assert_eq!(cursor.ordinal_of("NAME").unwrap(), 1);
    assert!(cursor.advance().unwrap());
}

#[test]
fn record_size_limit_skips_oversized_record() {
    let options = DsvOptions::new().with_max_record_bytes(Some(16));
    let text = "a,b\n1,0123456789abcdefghij\n2,ok\n";
    let mut cursor = DsvCursor::new(ReaderLines::new(text.as_bytes()), options).unwrap();

    let err = cursor.advance().unwrap_err();
    assert!(matches!(err, IngestError::RecordTooLarge { line: 2, limit: 16 }));
    assert!(err.is_record_error());
    assert!(cursor.advance().unwrap());
    assert_eq!(cursor.get_string(1).unwrap(), "ok");
}

#[test]
fn oversized_multi_line_record_does_not_swallow_next_rows() {
    let options = DsvOptions::new().with_max_record_bytes(Some(10));
    let text = "a,b\n1,\"0123456789\nmore\",x\n2,ok\n3,ok\n";
    let mut cursor = DsvCursor::new(ReaderLines::new(text.as_bytes()), options).unwrap();

    let err = cursor.advance().unwrap_err();
    assert!(matches!(err, IngestError::RecordTooLarge { line: 2, limit: 10 }));
    assert!(err.to_string().contains("starting at line 2"));

    let mut rows = Vec::new();
    while cursor.advance().unwrap() {
        rows.push(cursor.get_string(0).unwrap());
    }
    assert_eq!(rows, vec!["2", "3"]);
    assert_eq!(cursor.row_number(), 2);
}

#[test]
fn injected_line_function_is_read_lazily() {
    let mut lines = vec!["a,b", "1,2", "3,4"].into_iter();
    let mut reads = 0;
    let source = FnLines::new(|| {
        reads += 1;
        Ok::<_, std::io::Error>(lines.next().map(String::from))
    });
    let mut cursor = DsvCursor::new(source, DsvOptions::default()).unwrap();
    assert!(cursor.advance().unwrap());
    drop(cursor);
    assert_eq!(reads, 2);
}

#[test]
fn io_errors_surface_and_partial_record_resumes() {
    let mut script = vec![
        Ok(Some("a,b".to_string())),
        Ok(Some("\"multi".to_string())),
        Err(std::io::Error::other("transient")),
        Ok(Some("line\",2".to_string())),
        Ok(None),
    ]
    .into_iter();
    let source = FnLines::new(move || script.next().unwrap_or(Ok(None)));
    let mut cursor = DsvCursor::new(source, DsvOptions::default()).unwrap();

    assert!(matches!(cursor.advance(), Err(IngestError::Io(_))));
    assert_eq!(cursor.position(), CursorPosition::BeforeFirst);
    assert!(cursor.advance().unwrap());
    assert_eq!(
        cursor.get_string(0).unwrap(),
        format!("multi{LINE_TERMINATOR}line")
    );
}

#[test]
fn open_reads_file() {
    let file = temp_file("id,name\n1,Ann\n2,\"Smith, Bob\"\n");
    let mut cursor = DsvCursor::open(file.path(), DsvOptions::default()).unwrap();
    let mut names = Vec::new();
    while cursor.advance().unwrap() {
        names.push(cursor.get_string(1).unwrap());
    }
    assert_eq!(names, vec!["Ann", "Smith, Bob"]);

    cursor.close();
    cursor.close();
    assert!(cursor.is_closed());
}

#[test]
fn open_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let err = DsvCursor::open(dir.path().join("absent.csv"), DsvOptions::default()).unwrap_err();
    assert!(matches!(err, IngestError::FileNotFound { .. }));
}

#[test]
fn in_memory_lines() {
    let options = DsvOptions::new().with_header(["x", "y"]);
    let mut cursor = DsvCursor::new(IterLines::new(["1,2", "3,4"]), options).unwrap();
    assert!(cursor.advance().unwrap());
    assert!(cursor.advance().unwrap());
    assert_eq!(cursor.get_string(0).unwrap(), "3");
    assert_eq!(cursor.line_number(), 2);
}
