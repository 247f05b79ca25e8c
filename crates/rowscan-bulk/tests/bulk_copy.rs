//! Tests for projecting DSV cursors through column mappings.

use std::fs;

use rowscan_bulk::{BulkCopyAdapter, BulkError, ColumnMappings, copy_rows};
use rowscan_ingest::{DsvCursor, DsvOptions, DsvWriter, IngestError, ReaderLines};
use rowscan_model::{Mapping, Record, RowCursor, Value};

fn cursor(text: &str) -> DsvCursor<ReaderLines<&[u8]>> {
    DsvCursor::new(ReaderLines::new(text.as_bytes()), DsvOptions::default()).expect("open cursor")
}

#[test]
fn projects_destination_columns() {
    let mappings = ColumnMappings::new(vec![
        Mapping::new("b", "B"),
        Mapping::new("missing", "M"),
    ])
    .unwrap();
    let mut adapter = BulkCopyAdapter::new(cursor("a,b,c\n1,\"x,y\",3\n"), mappings);

    assert!(adapter.advance().unwrap());
    assert_eq!(adapter.field_count(), 2);
    assert_eq!(adapter.name_of(0), "B");
    assert_eq!(adapter.get_value(0).unwrap(), &Value::from("x,y"));
    assert_eq!(adapter.name_of(1), "M");
    assert_eq!(adapter.get_value(1).unwrap(), &Value::Missing);
    assert_eq!(adapter.row_number(), 1);
    assert!(!adapter.advance().unwrap());
}

#[test]
fn mixed_name_and_ordinal_mappings_are_rejected() {
    let result = ColumnMappings::new(vec![Mapping::new("a", "A"), Mapping::new(2usize, 1usize)]);
    assert!(matches!(result, Err(BulkError::MixedMappingKinds { .. })));

    let result = ColumnMappings::from_json_str(
        r#"[{"source": "a", "destination": "A"}, {"source": 2, "destination": "C"}]"#,
    );
    assert!(matches!(result, Err(BulkError::MixedMappingKinds { index: 1, .. })));
}

#[test]
fn ordinal_mappings_read_source_positions() {
    let mappings =
        ColumnMappings::new(vec![Mapping::new(2usize, 0usize), Mapping::new(0usize, 1usize)])
            .unwrap();
    let mut adapter = BulkCopyAdapter::new(cursor("a,b,c\n1,2,3\n"), mappings);

    assert_eq!(adapter.destination_names().collect::<Vec<_>>(), vec!["0", "1"]);
    assert!(adapter.advance().unwrap());
    assert_eq!(adapter.get_string(0).unwrap(), "3");
    assert_eq!(adapter.get_string(1).unwrap(), "1");
}

#[test]
fn source_errors_pass_through() {
    let mappings = ColumnMappings::new(vec![Mapping::new("a", "A")]).unwrap();
    let mut adapter = BulkCopyAdapter::new(cursor("a,b\n1,2,3\n4,5\n"), mappings);

    let err = adapter.advance().unwrap_err();
    assert!(matches!(err, IngestError::ColumnCountMismatch { .. }));
    assert_eq!(adapter.row_number(), 0);
    assert!(adapter.advance().unwrap());
    assert_eq!(adapter.get_string(0).unwrap(), "4");
}

#[test]
fn close_closes_source() {
    let mappings = ColumnMappings::new(vec![Mapping::new("a", "A")]).unwrap();
    let mut adapter = BulkCopyAdapter::new(cursor("a,b\n1,2\n"), mappings);
    adapter.close();
    adapter.close();
    assert!(adapter.is_closed());
    assert!(adapter.source().is_closed());
}

#[test]
fn copy_rows_writes_projected_dsv() {
    let mappings = ColumnMappings::new(vec![
        Mapping::new("name", "Name"),
        Mapping::unsourced("Note"),
        Mapping::new("id", "Id"),
    ])
    .unwrap();
    let text = "id,name\n1,\"Smith, Ann\"\n2,Bob\n";
    let mut adapter = BulkCopyAdapter::new(cursor(text), mappings);
    let mut writer = DsvWriter::new(Vec::new());

    let rows = copy_rows::<_, _, IngestError>(&mut adapter, &mut writer).unwrap();

    assert_eq!(rows, 2);
    let output = String::from_utf8(writer.into_inner()).unwrap();
    assert_eq!(output, "Name,Note,Id\n\"Smith, Ann\",,1\nBob,,2\n");
}

#[test]
fn load_reads_mapping_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("mapping.json");
    fs::write(
        &path,
        r#"[{"source": "b", "destination": "B"}, {"source": null, "destination": "M"}]"#,
    )
    .unwrap();

    let mappings = ColumnMappings::load(&path).unwrap();
    assert_eq!(mappings.len(), 2);

    let err = ColumnMappings::load(&dir.path().join("absent.json")).unwrap_err();
    assert!(matches!(err, BulkError::MappingFile { .. }));
}
