//! Tabular data model for column comparison and grouping.
//!
//! - **value**: cell values and their key-form normalization
//! - **schema**: per-column declared types, inferred once per table
//! - **table**: validated in-memory tables
//! - **error**: validation and data-format errors shared by all crates

pub mod error;
pub mod schema;
pub mod table;
pub mod value;

pub use error::{ColcmpError, DataFormatError, Result, ValidationError};
pub use schema::{ColumnType, Schema};
pub use table::Table;
pub use value::{KEY_SEPARATOR, Value, format_float};
