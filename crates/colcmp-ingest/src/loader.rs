//! Format detection and the single loading entry point.

use std::path::Path;

use tracing::{debug, info, info_span};

use colcmp_model::Table;

use crate::csv_table::read_csv_table;
use crate::error::IngestError;
use crate::workbook::read_workbook_table;

/// Supported input file families, detected from the file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    Csv,
    Tsv,
    Workbook,
}

impl FileKind {
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "csv" | "txt" => Some(Self::Csv),
            "tsv" | "tab" => Some(Self::Tsv),
            "xlsx" | "xlsm" | "xlsb" | "xls" | "ods" => Some(Self::Workbook),
            _ => None,
        }
    }

    pub fn is_workbook(self) -> bool {
        matches!(self, Self::Workbook)
    }
}

/// Which sheet of a workbook to read. Ignored for delimited files.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SheetSelection {
    /// The workbook must contain exactly one sheet.
    #[default]
    Only,
    First,
    Named(String),
}

#[derive(Debug, Clone, Default)]
pub struct LoadOptions {
    pub sheet: SheetSelection,
}

impl LoadOptions {
    pub fn with_sheet(mut self, sheet: SheetSelection) -> Self {
        self.sheet = sheet;
        self
    }
}

/// Loads a CSV, TSV or workbook file into a [`Table`].
pub fn load_table(path: &Path, options: &LoadOptions) -> Result<Table, IngestError> {
    let span = info_span!("load_table", path = %path.display());
    let _guard = span.enter();

    let kind = FileKind::from_path(path).ok_or_else(|| IngestError::UnsupportedFormat {
        path: path.to_path_buf(),
    })?;
    std::fs::metadata(path).map_err(|e| IngestError::io(path, e))?;
    debug!(?kind, sheet = ?options.sheet, "detected input format");

    let table = match kind {
        FileKind::Csv => read_csv_table(path, b',')?,
        FileKind::Tsv => read_csv_table(path, b'\t')?,
        FileKind::Workbook => read_workbook_table(path, &options.sheet)?,
    };
    info!(
        table = table.name(),
        rows = table.height(),
        columns = table.width(),
        "loaded table"
    );
    Ok(table)
}
