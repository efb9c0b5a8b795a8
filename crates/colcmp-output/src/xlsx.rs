//! XLSX export via rust_xlsxwriter.

use std::path::Path;

use rust_xlsxwriter::{Color, Format, Workbook, Worksheet, XlsxError};
use tracing::debug;

use colcmp_core::{CellDiff, MergedView};
use colcmp_model::{ColumnType, Table, Value};

use crate::error::ExportError;

/// Name of the single worksheet written by every export.
pub const SHEET_NAME: &str = "Sheet1";

const MAX_ROWS: usize = 1_048_576;
const MAX_COLUMNS: usize = 16_384;
/// Integers beyond this magnitude lose precision as Excel doubles.
const MAX_EXACT_INT: u64 = 1 << 53;

const EQUAL_FILL: u32 = 0xC6EFCE;
const DIFFERENT_FILL: u32 = 0xFFC7CE;

/// Writes a table to a single-sheet workbook with a bold, frozen header row.
///
/// Numbers and booleans keep their cell type unless the column was inferred
/// as text, in which case every cell is written as a string so the column
/// reads back with one type.
pub fn write_xlsx(table: &Table, path: &Path) -> Result<(), ExportError> {
    write_workbook(table, path, |_, _| None)
}

/// Writes a merged view, filling compared cells green when both sides agree
/// and red when they differ.
pub fn write_merged_xlsx(view: &MergedView, path: &Path) -> Result<(), ExportError> {
    let equal = Format::new().set_background_color(Color::RGB(EQUAL_FILL));
    let different = Format::new().set_background_color(Color::RGB(DIFFERENT_FILL));
    write_workbook(view.table(), path, |row, col| {
        view.diff(row, col).map(|flag| match flag {
            CellDiff::Equal => &equal,
            CellDiff::Different => &different,
        })
    })
}

/// Fails with [`ExportError::SheetLimit`] when `table` plus its header row
/// does not fit on one worksheet.
pub(crate) fn check_sheet_size(table: &Table, path: &Path) -> Result<(), ExportError> {
    if table.height() + 1 > MAX_ROWS || table.width() > MAX_COLUMNS {
        return Err(ExportError::SheetLimit {
            path: path.to_path_buf(),
            rows: table.height(),
            columns: table.width(),
        });
    }
    Ok(())
}

fn write_workbook<'f, F>(table: &Table, path: &Path, fill: F) -> Result<(), ExportError>
where
    F: Fn(usize, usize) -> Option<&'f Format>,
{
    check_sheet_size(table, path)?;

    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    fill_sheet(worksheet, table, &fill).map_err(|e| ExportError::xlsx(path, e))?;
    workbook.save(path).map_err(|e| ExportError::xlsx(path, e))?;
    debug!(
        path = %path.display(),
        rows = table.height(),
        columns = table.width(),
        "wrote workbook"
    );
    Ok(())
}

// Sizes are checked against the sheet limits before the casts below.
fn fill_sheet<'f, F>(worksheet: &mut Worksheet, table: &Table, fill: &F) -> Result<(), XlsxError>
where
    F: Fn(usize, usize) -> Option<&'f Format>,
{
    worksheet.set_name(SHEET_NAME)?;
    let header = Format::new().set_bold();
    for (col, name) in table.columns().iter().enumerate() {
        worksheet.write_string_with_format(0, col as u16, name, &header)?;
    }
    worksheet.set_freeze_panes(1, 0)?;

    let plain = Format::new();
    for (row_idx, row) in table.rows().iter().enumerate() {
        let row_num = (row_idx + 1) as u32;
        for (col_idx, value) in row.iter().enumerate() {
            let col_num = col_idx as u16;
            let format = fill(row_idx, col_idx);
            let as_text = table.schema().column_type(col_idx) == ColumnType::Text;
            write_cell(
                worksheet,
                row_num,
                col_num,
                value,
                as_text,
                format.unwrap_or(&plain),
                format.is_some(),
            )?;
        }
    }
    Ok(())
}

fn write_cell(
    worksheet: &mut Worksheet,
    row: u32,
    col: u16,
    value: &Value,
    as_text: bool,
    format: &Format,
    highlighted: bool,
) -> Result<(), XlsxError> {
    match value {
        _ if value.is_missing() => {
            if highlighted {
                worksheet.write_blank(row, col, format)?;
            }
        }
        _ if as_text => {
            worksheet.write_string_with_format(row, col, value.to_string(), format)?;
        }
        Value::Int(v) if v.unsigned_abs() <= MAX_EXACT_INT => {
            worksheet.write_number_with_format(row, col, *v as f64, format)?;
        }
        Value::Float(v) => {
            worksheet.write_number_with_format(row, col, *v, format)?;
        }
        Value::Bool(b) => {
            worksheet.write_boolean_with_format(row, col, *b, format)?;
        }
        other => {
            worksheet.write_string_with_format(row, col, other.to_string(), format)?;
        }
    }
    Ok(())
}
