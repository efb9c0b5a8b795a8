//! Writing named result files into an output directory.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::Serialize;

use colcmp_core::MergedView;
use colcmp_model::Table;

use crate::error::ExportError;
use crate::session::ExportSession;
use crate::xlsx::check_sheet_size;

/// File formats a result can be exported to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Csv,
    #[default]
    Xlsx,
    Both,
}

impl ExportFormat {
    pub fn extensions(self) -> &'static [&'static str] {
        match self {
            Self::Csv => &["csv"],
            Self::Xlsx => &["xlsx"],
            Self::Both => &["csv", "xlsx"],
        }
    }

    pub fn includes_xlsx(self) -> bool {
        matches!(self, Self::Xlsx | Self::Both)
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Csv => "csv",
            Self::Xlsx => "xlsx",
            Self::Both => "both",
        })
    }
}

/// Checks that `table` can be exported as `<dir>/<stem>` in `format`
/// without writing anything.
pub fn check_export(
    dir: &Path,
    stem: &str,
    table: &Table,
    format: ExportFormat,
) -> Result<(), ExportError> {
    if format.includes_xlsx() {
        check_sheet_size(table, &dir.join(format!("{stem}.xlsx")))?;
    }
    Ok(())
}

/// Writes `table` as `<dir>/<stem>.<ext>` for each extension of `format`.
///
/// Returns the written paths in extension order. On error no file is left
/// behind.
pub fn export_table(
    dir: &Path,
    stem: &str,
    table: &Table,
    format: ExportFormat,
) -> Result<Vec<PathBuf>, ExportError> {
    check_export(dir, stem, table, format)?;
    let mut session = ExportSession::begin(dir)?;
    session.export_table(stem, table, format)?;
    session.commit()
}

/// Like [`export_table`] for a merged view. With `highlight`, the workbook
/// output carries green/red fills on compared cells.
pub fn export_merged(
    dir: &Path,
    stem: &str,
    view: &MergedView,
    format: ExportFormat,
    highlight: bool,
) -> Result<Vec<PathBuf>, ExportError> {
    check_export(dir, stem, view.table(), format)?;
    let mut session = ExportSession::begin(dir)?;
    session.export_merged(stem, view, format, highlight)?;
    session.commit()
}
