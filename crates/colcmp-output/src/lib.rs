//! Export of colcmp results.
//!
//! - **CSV**: plain delimited text via the `csv` crate
//! - **XLSX**: single-sheet workbooks via `rust_xlsxwriter`, with optional
//!   green/red highlighting of compared cells in a merged view
//!
//! Multi-file exports go through an [`ExportSession`], which stages files and
//! moves them into place only once every write succeeded.

mod delimited;
mod error;
mod export;
mod session;
mod xlsx;

pub use delimited::{write_csv, write_csv_to, write_merged_csv};
pub use error::ExportError;
pub use export::{ExportFormat, check_export, export_merged, export_table};
pub use session::ExportSession;
pub use xlsx::{SHEET_NAME, write_merged_xlsx, write_xlsx};
