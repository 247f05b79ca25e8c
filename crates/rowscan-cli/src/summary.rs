//! Terminal rendering of command results.

use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Attribute, Cell, Color, ContentArrangement, Table};

use rowscan_cli::pipeline::Preview;
use rowscan_model::Value;

pub fn print_preview(preview: &Preview) {
    let mut table = Table::new();
    table.set_header(
        preview
            .columns
            .iter()
            .map(|name| header_cell(name))
            .collect::<Vec<_>>(),
    );
    apply_table_style(&mut table);
    for row in &preview.rows {
        table.add_row(row.iter().map(value_cell).collect::<Vec<_>>());
    }
    println!("{table}");
    if preview.truncated {
        println!("(showing first {} rows)", preview.rows.len());
    }
}

pub fn print_count(rows: u64) {
    println!("{rows}");
}

fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn value_cell(value: &Value) -> Cell {
    match value {
        Value::Null => dim_cell("null"),
        Value::Missing => dim_cell("-"),
        Value::Text(text) => Cell::new(text),
        other => Cell::new(other).fg(Color::Blue),
    }
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
