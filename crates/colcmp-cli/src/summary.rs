use std::path::PathBuf;

use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use colcmp_core::{CellDiff, MergedView, ReconSummary};
use colcmp_model::{ColumnType, Table as DataTable};

use crate::cache::format_bytes;
use crate::types::{CacheOutcome, ColumnsResult, CompareResult, GroupResult};

pub fn print_compare_summary(result: &CompareResult, preview_rows: usize) {
    println!("Left: {}", result.left.display());
    println!("Right: {}", result.right.display());
    println!(
        "Keys: {} <-> {}",
        result.report.left_keys.join(", "),
        result.report.right_keys.join(", ")
    );
    println!("{}", bucket_table(&result.report.summary));

    let recon = &result.reconciliation;
    for (title, table) in [
        ("Matched rows (left)", &recon.matched_left),
        ("Matched rows (right)", &recon.matched_right),
        ("Only in left", &recon.only_left),
        ("Only in right", &recon.only_right),
    ] {
        print_preview(title, table, preview_rows);
    }

    if let Some(view) = &result.merged {
        println!();
        println!("Merged view ({} rows)", view.table().height());
        if view.table().is_empty() {
            println!("(no matched rows)");
        } else {
            println!("{}", merged_preview_table(view, preview_rows));
            print_more(view.table().height(), preview_rows);
            if !view.compared_columns().is_empty() {
                println!("{}", difference_table(view));
            }
        }
    }
    print_outputs(result.output_dir.as_ref(), &result.files);
}

pub fn print_group_summary(result: &GroupResult, preview_rows: usize) {
    println!("Input: {}", result.input.display());
    if !result.deleted.is_empty() {
        println!("Deleted columns: {}", result.deleted.join(", "));
    }
    println!(
        "Grouped {} rows into {} groups",
        result.input_rows,
        result.grouped.height()
    );
    print_preview("Grouped", &result.grouped, preview_rows);
    print_outputs(result.output_dir.as_ref(), &result.files);
}

pub fn print_columns(result: &ColumnsResult) {
    if let Some(sheets) = &result.sheets {
        println!("Sheets: {}", sheets.join(", "));
    }
    println!("Table: {} ({} rows)", result.table, result.rows);
    println!("{}", columns_table(result));
}

pub fn print_cache(outcome: &CacheOutcome) {
    match outcome {
        CacheOutcome::Size { root, bytes } => {
            println!("Cache: {}", root.display());
            println!("Size: {}", format_bytes(*bytes));
        }
        CacheOutcome::Cleared { root, freed } => {
            println!("Cleared {} ({} freed)", root.display(), format_bytes(*freed));
        }
    }
}

/// Row and key counts per bucket.
pub fn bucket_table(summary: &ReconSummary) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Bucket"),
        header_cell("Rows"),
        header_cell("Keys"),
    ]);
    apply_summary_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    align_column(&mut table, 2, CellAlignment::Right);
    table.add_row(vec![
        Cell::new("Matched (left)"),
        count_cell(summary.matched_left_rows, Color::Green),
        count_cell(summary.matched_keys, Color::Green),
    ]);
    table.add_row(vec![
        Cell::new("Matched (right)"),
        count_cell(summary.matched_right_rows, Color::Green),
        count_cell(summary.matched_keys, Color::Green),
    ]);
    table.add_row(vec![
        Cell::new("Only in left"),
        count_cell(summary.only_left_rows, Color::Yellow),
        count_cell(summary.only_left_keys, Color::Yellow),
    ]);
    table.add_row(vec![
        Cell::new("Only in right"),
        count_cell(summary.only_right_rows, Color::Yellow),
        count_cell(summary.only_right_keys, Color::Yellow),
    ]);
    table.add_row(vec![
        Cell::new("TOTAL")
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        Cell::new(format!("{} / {}", summary.left_rows, summary.right_rows))
            .add_attribute(Attribute::Bold),
        dim_cell("-"),
    ]);
    table
}

/// The first `rows` rows of a table; numeric columns are right aligned.
pub fn preview_table(data: &DataTable, rows: usize) -> Table {
    let mut table = Table::new();
    table.set_header(data.columns().iter().map(|c| header_cell(c)));
    apply_table_style(&mut table);
    align_numeric_columns(&mut table, data);
    for row in data.rows().iter().take(rows) {
        table.add_row(row.iter().map(|value| Cell::new(value.to_string())));
    }
    table
}

/// Preview of the merged view with compared cells colored by their flag.
pub fn merged_preview_table(view: &MergedView, rows: usize) -> Table {
    let data = view.table();
    let mut table = Table::new();
    table.set_header(data.columns().iter().map(|c| header_cell(c)));
    apply_table_style(&mut table);
    align_numeric_columns(&mut table, data);
    for (row_idx, row) in data.rows().iter().enumerate().take(rows) {
        table.add_row(row.iter().enumerate().map(|(col_idx, value)| {
            let cell = Cell::new(value.to_string());
            match view.diff(row_idx, col_idx) {
                Some(CellDiff::Equal) => cell.fg(Color::Green),
                Some(CellDiff::Different) => cell.fg(Color::Red).add_attribute(Attribute::Bold),
                None => cell,
            }
        }));
    }
    table
}

/// Per compared column, how many merged rows differ.
pub fn difference_table(view: &MergedView) -> Table {
    let mut table = Table::new();
    table.set_header(vec![header_cell("Column"), header_cell("Differing rows")]);
    apply_summary_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    for (column, count) in view.difference_counts() {
        table.add_row(vec![Cell::new(column), count_cell(count, Color::Red)]);
    }
    table
}

pub fn columns_table(result: &ColumnsResult) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("#"),
        header_cell("Column"),
        header_cell("Type"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 0, CellAlignment::Right);
    for (idx, (name, column_type)) in result.columns.iter().enumerate() {
        let type_cell = match column_type {
            ColumnType::Empty => dim_cell(column_type),
            _ => Cell::new(column_type),
        };
        table.add_row(vec![dim_cell(idx + 1), Cell::new(name), type_cell]);
    }
    table
}

fn print_preview(title: &str, data: &DataTable, rows: usize) {
    println!();
    println!("{title} ({} rows)", data.height());
    if data.is_empty() || rows == 0 {
        return;
    }
    println!("{}", preview_table(data, rows));
    print_more(data.height(), rows);
}

fn print_more(total: usize, shown: usize) {
    if total > shown {
        println!("... {} more rows", total - shown);
    }
}

fn print_outputs(output_dir: Option<&PathBuf>, files: &[PathBuf]) {
    let Some(dir) = output_dir else {
        println!();
        println!("Dry run: no files written");
        return;
    };
    println!();
    println!("Output: {}", dir.display());
    for file in files {
        let name = file.strip_prefix(dir).unwrap_or(file);
        println!("  {}", name.display());
    }
}

fn align_numeric_columns(table: &mut Table, data: &DataTable) {
    for (idx, column_type) in data.schema().types().iter().enumerate() {
        if *column_type == ColumnType::Number {
            align_column(table, idx, CellAlignment::Right);
        }
    }
}

pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn apply_summary_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(80);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn count_cell(count: usize, color: Color) -> Cell {
    if count > 0 {
        Cell::new(count).fg(color).add_attribute(Attribute::Bold)
    } else {
        dim_cell(count)
    }
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
