use thiserror::Error;

/// A column selection or option set that cannot be applied to a table.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required column selection is empty.
    #[error("no {what} selected")]
    EmptySelection { what: String },

    /// Both sides of a comparison must select the same number of key columns.
    #[error("key column count mismatch: {left} on the left, {right} on the right")]
    KeyCountMismatch { left: usize, right: usize },

    /// A selected column does not exist in the table.
    #[error("table '{table}' has no column named '{column}'")]
    UnknownColumn { table: String, column: String },

    /// A column is selected for grouping and merging at the same time.
    #[error("column '{column}' cannot be both a group-by and a merge column")]
    OverlappingColumns { column: String },

    /// Two output columns would end up with the same name.
    #[error("output column '{column}' would appear more than once")]
    ColumnCollision { column: String },
}

impl ValidationError {
    pub fn empty(what: impl Into<String>) -> Self {
        Self::EmptySelection { what: what.into() }
    }

    pub fn unknown_column(table: impl Into<String>, column: impl Into<String>) -> Self {
        Self::UnknownColumn {
            table: table.into(),
            column: column.into(),
        }
    }
}

/// A source table that is structurally invalid.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DataFormatError {
    #[error("table '{table}' has duplicate column name '{column}'")]
    DuplicateColumn { table: String, column: String },

    #[error("table '{table}' row {row} has {actual} value(s), expected {expected}")]
    RowWidth {
        table: String,
        row: usize,
        expected: usize,
        actual: usize,
    },
}

#[derive(Debug, Error)]
pub enum ColcmpError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    DataFormat(#[from] DataFormatError),
}

pub type Result<T> = std::result::Result<T, ColcmpError>;
