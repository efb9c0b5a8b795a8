//! Workbook loading via calamine.

use std::path::Path;

use calamine::{Data, Reader, Sheets, open_workbook_auto};
use tracing::debug;

use colcmp_model::{Table, Value};

use crate::csv_table::table_name;
use crate::error::IngestError;
use crate::header::normalize_headers;
use crate::loader::SheetSelection;

/// Sheet names of a workbook, in workbook order.
pub fn list_sheets(path: &Path) -> Result<Vec<String>, IngestError> {
    let workbook: Sheets<_> =
        open_workbook_auto(path).map_err(|e| IngestError::workbook(path, e))?;
    Ok(workbook.sheet_names().to_vec())
}

/// Reads one sheet of a workbook into a [`Table`].
///
/// The first row of the used range is the header. Rows where every cell is
/// empty are skipped. Date cells keep their serial number.
pub fn read_workbook_table(path: &Path, selection: &SheetSelection) -> Result<Table, IngestError> {
    let mut workbook: Sheets<_> =
        open_workbook_auto(path).map_err(|e| IngestError::workbook(path, e))?;
    let sheet_names: Vec<String> = workbook.sheet_names().to_vec();
    let sheet = select_sheet(path, &sheet_names, selection)?;
    let range = workbook
        .worksheet_range(&sheet)
        .map_err(|e| IngestError::workbook(path, e))?;

    let name = format!("{}/{sheet}", table_name(path));
    let mut rows = range.rows();
    let Some(header_row) = rows.next() else {
        return Ok(Table::new(name, Vec::new(), Vec::new())?);
    };
    let header_cells: Vec<String> = header_row
        .iter()
        .map(|cell| data_to_value(cell).to_string())
        .collect();
    let headers = normalize_headers(header_cells.iter().map(String::as_str));

    let data: Vec<Vec<Value>> = rows
        .map(|row| row.iter().map(data_to_value).collect::<Vec<_>>())
        .filter(|row| !row.iter().all(Value::is_missing))
        .collect();
    debug!(
        path = %path.display(),
        sheet = %sheet,
        rows = data.len(),
        columns = headers.len(),
        "read worksheet"
    );
    Ok(Table::new(name, headers, data)?)
}

fn select_sheet(
    path: &Path,
    names: &[String],
    selection: &SheetSelection,
) -> Result<String, IngestError> {
    if names.is_empty() {
        return Err(IngestError::NoSheets {
            path: path.to_path_buf(),
        });
    }
    match selection {
        SheetSelection::Named(wanted) => names
            .iter()
            .find(|name| *name == wanted)
            .cloned()
            .ok_or_else(|| IngestError::SheetNotFound {
                path: path.to_path_buf(),
                sheet: wanted.clone(),
                available: names.join(", "),
            }),
        SheetSelection::First => Ok(names[0].clone()),
        SheetSelection::Only => {
            if names.len() == 1 {
                Ok(names[0].clone())
            } else {
                Err(IngestError::AmbiguousSheet {
                    path: path.to_path_buf(),
                    count: names.len(),
                    available: names.join(", "),
                })
            }
        }
    }
}

fn data_to_value(cell: &Data) -> Value {
    match cell {
        Data::Empty => Value::Empty,
        Data::String(s) => Value::text(s.as_str()),
        Data::Float(v) => Value::float(*v),
        Data::Int(v) => Value::Int(*v),
        Data::Bool(b) => Value::Bool(*b),
        Data::DateTime(dt) => Value::float(dt.as_f64()),
        Data::DateTimeIso(s) | Data::DurationIso(s) => Value::text(s.as_str()),
        Data::Error(e) => Value::text(format!("#{e:?}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|n| (*n).to_string()).collect()
    }

    #[test]
    fn only_rejects_multiple_sheets() {
        let err = select_sheet(
            Path::new("book.xlsx"),
            &names(&["Sheet1", "Sheet2"]),
            &SheetSelection::Only,
        )
        .unwrap_err();
        assert!(matches!(err, IngestError::AmbiguousSheet { count: 2, .. }));
    }

    #[test]
    fn named_sheet_must_exist() {
        let err = select_sheet(
            Path::new("book.xlsx"),
            &names(&["Data"]),
            &SheetSelection::Named("Sheet1".to_string()),
        )
        .unwrap_err();
        assert_eq!(
            err.to_string(),
            "workbook book.xlsx has no sheet named 'Sheet1' (found: Data)"
        );
    }

    #[test]
    fn first_picks_first_sheet() {
        let picked = select_sheet(
            Path::new("book.xlsx"),
            &names(&["B", "A"]),
            &SheetSelection::First,
        )
        .unwrap();
        assert_eq!(picked, "B");
    }

    #[test]
    fn converts_cells() {
        assert_eq!(data_to_value(&Data::Float(5.0)), Value::Float(5.0));
        assert_eq!(data_to_value(&Data::String("  ".to_string())), Value::Empty);
        assert_eq!(data_to_value(&Data::Bool(false)), Value::Bool(false));
        assert_eq!(data_to_value(&Data::Empty), Value::Empty);
    }
}
