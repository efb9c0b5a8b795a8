//! Error types for loading tables.

use std::path::PathBuf;

use thiserror::Error;

use colcmp_model::DataFormatError;

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse CSV {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("failed to load {path}: {source}")]
    Polars {
        path: PathBuf,
        #[source]
        source: polars::error::PolarsError,
    },

    #[error("failed to open workbook {path}: {source}")]
    Workbook {
        path: PathBuf,
        #[source]
        source: calamine::Error,
    },

    #[error("workbook {path} has no sheet named '{sheet}' (found: {available})")]
    SheetNotFound {
        path: PathBuf,
        sheet: String,
        available: String,
    },

    #[error("workbook {path} has {count} sheets; choose one of: {available}")]
    AmbiguousSheet {
        path: PathBuf,
        count: usize,
        available: String,
    },

    #[error("workbook {path} contains no sheets")]
    NoSheets { path: PathBuf },

    #[error("unsupported file type: {path}")]
    UnsupportedFormat { path: PathBuf },

    #[error(transparent)]
    DataFormat(#[from] DataFormatError),
}

impl IngestError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn csv(path: impl Into<PathBuf>, source: csv::Error) -> Self {
        Self::Csv {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn polars(path: impl Into<PathBuf>, source: polars::error::PolarsError) -> Self {
        Self::Polars {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn workbook(path: impl Into<PathBuf>, source: calamine::Error) -> Self {
        Self::Workbook {
            path: path.into(),
            source,
        }
    }
}
