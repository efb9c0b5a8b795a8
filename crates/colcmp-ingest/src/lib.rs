//! Loading spreadsheet files into [`colcmp_model::Table`] values.
//!
//! Delimited text is parsed with Polars so that column types are inferred
//! once per file; workbooks (xlsx, xls, xlsb, ods) are read with calamine.
//! Both paths share header normalization and duplicate-column detection.

pub mod csv_table;
pub mod error;
pub mod header;
pub mod loader;
pub mod polars_utils;
pub mod workbook;

pub use csv_table::read_csv_table;
pub use error::IngestError;
pub use loader::{FileKind, LoadOptions, SheetSelection, load_table};
pub use polars_utils::{any_to_value, dataframe_to_table};
pub use workbook::{list_sheets, read_workbook_table};
