use std::path::Path;

use csv::ReaderBuilder;
use polars::prelude::{CsvReadOptions, SerReader};
use tracing::debug;

use colcmp_model::Table;

use crate::error::IngestError;
use crate::header::normalize_headers;
use crate::polars_utils::dataframe_to_table;

/// Reads a delimited text file into a [`Table`].
///
/// The header row is read with the `csv` crate so that names can be
/// normalized and duplicates rejected before Polars sees the file. The data
/// rows are then parsed by Polars, which infers one dtype per column.
pub fn read_csv_table(path: &Path, separator: u8) -> Result<Table, IngestError> {
    let name = table_name(path);
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .delimiter(separator)
        .from_path(path)
        .map_err(|e| IngestError::csv(path, e))?;
    let mut records = reader.records();

    let Some(header) = records.next() else {
        return Ok(Table::new(name, Vec::new(), Vec::new())?);
    };
    let header = header.map_err(|e| IngestError::csv(path, e))?;
    let headers = normalize_headers(header.iter());
    // Fail on duplicate names before parsing any data.
    Table::new(name.as_str(), headers.clone(), Vec::new())?;

    let has_data = records.next().is_some();
    if !has_data {
        return Ok(Table::new(name, headers, Vec::new())?);
    }

    let df = CsvReadOptions::default()
        .with_has_header(false)
        .with_skip_rows(1)
        // Scan every row so a late text value widens the column instead of failing.
        .with_infer_schema_length(None)
        .map_parse_options(|options| {
            options
                .with_separator(separator)
                .with_truncate_ragged_lines(true)
        })
        .try_into_reader_with_file_path(Some(path.to_path_buf()))
        .map_err(|e| IngestError::polars(path, e))?
        .finish()
        .map_err(|e| IngestError::polars(path, e))?;
    debug!(
        path = %path.display(),
        rows = df.height(),
        columns = headers.len(),
        "parsed delimited file"
    );
    Ok(dataframe_to_table(&name, headers, &df)?)
}

pub(crate) fn table_name(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
