//! CSV export.

use std::io::Write;
use std::path::Path;

use csv::WriterBuilder;

use colcmp_core::MergedView;
use colcmp_model::Table;

use crate::error::ExportError;

/// Writes a table as comma-separated text with a header row.
///
/// Cells are written in display form: missing values as empty fields, whole
/// floats without a fractional part, booleans as `True`/`False`.
pub fn write_csv(table: &Table, path: &Path) -> Result<(), ExportError> {
    let file = std::fs::File::create(path).map_err(|e| ExportError::io(path, e))?;
    write_csv_to(table, file).map_err(|e| ExportError::csv(path, e))
}

/// Writes the merged table of a comparison. Diff flags have no CSV form.
pub fn write_merged_csv(view: &MergedView, path: &Path) -> Result<(), ExportError> {
    write_csv(view.table(), path)
}

/// Writes CSV to any writer; used by [`write_csv`] and handy for previews.
pub fn write_csv_to<W: Write>(table: &Table, writer: W) -> Result<(), csv::Error> {
    let mut writer = WriterBuilder::new().from_writer(writer);
    writer.write_record(table.columns())?;
    for row in table.rows() {
        writer.write_record(row.iter().map(ToString::to_string))?;
    }
    writer.flush()?;
    Ok(())
}
