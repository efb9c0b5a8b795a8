use std::path::{Path, PathBuf};

use serde::Serialize;

use colcmp_core::{MergedView, ReconSummary, Reconciliation};
use colcmp_model::{ColumnType, Table};

#[derive(Debug)]
pub struct CompareResult {
    pub left: PathBuf,
    pub right: PathBuf,
    pub reconciliation: Reconciliation,
    pub merged: Option<MergedView>,
    pub report: CompareReport,
    /// `None` for a dry run.
    pub output_dir: Option<PathBuf>,
    pub files: Vec<PathBuf>,
}

/// Machine-readable outcome of a comparison, written as `summary.json`.
#[derive(Debug, Clone, Serialize)]
pub struct CompareReport {
    pub left: String,
    pub right: String,
    pub left_keys: Vec<String>,
    pub right_keys: Vec<String>,
    pub summary: ReconSummary,
    pub merged: Option<MergedReport>,
}

#[derive(Debug, Clone, Serialize)]
pub struct MergedReport {
    pub rows: usize,
    pub rows_with_differences: usize,
    pub differences: Vec<ColumnDifferences>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ColumnDifferences {
    pub column: String,
    pub rows: usize,
}

#[derive(Debug)]
pub struct GroupResult {
    pub input: PathBuf,
    pub input_rows: usize,
    pub deleted: Vec<String>,
    pub grouped: Table,
    pub output_dir: Option<PathBuf>,
    pub files: Vec<PathBuf>,
}

#[derive(Debug)]
pub struct ColumnsResult {
    pub table: String,
    pub rows: usize,
    pub columns: Vec<(String, ColumnType)>,
    /// Sheet names, for workbook inputs.
    pub sheets: Option<Vec<String>>,
}

#[derive(Debug)]
pub enum CacheOutcome {
    Size { root: PathBuf, bytes: u64 },
    Cleared { root: PathBuf, freed: u64 },
}

/// File name shown in reports, so that they do not depend on where inputs live.
pub fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
