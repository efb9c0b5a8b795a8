#![deny(unsafe_code)]

use std::collections::BTreeSet;

use serde::Serialize;

use crate::error::{DataFormatError, ValidationError};
use crate::schema::{ColumnType, Schema};
use crate::value::Value;

/// An in-memory table: ordered, uniquely named columns and row-major values.
///
/// Construction validates the header and row widths and infers the schema,
/// so every `Table` in circulation is well formed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Table {
    name: String,
    columns: Vec<String>,
    rows: Vec<Vec<Value>>,
    schema: Schema,
}

impl Table {
    pub fn new(
        name: impl Into<String>,
        columns: Vec<String>,
        rows: Vec<Vec<Value>>,
    ) -> Result<Self, DataFormatError> {
        let name = name.into();
        check_unique_columns(&name, &columns)?;
        for (idx, row) in rows.iter().enumerate() {
            if row.len() != columns.len() {
                return Err(DataFormatError::RowWidth {
                    table: name,
                    row: idx + 1,
                    expected: columns.len(),
                    actual: row.len(),
                });
            }
        }
        let schema = Schema::infer(columns.len(), &rows);
        Ok(Self {
            name,
            columns,
            rows,
            schema,
        })
    }

    /// Builds a table whose schema is already known, e.g. a subset of another table.
    pub fn with_schema(
        name: impl Into<String>,
        columns: Vec<String>,
        rows: Vec<Vec<Value>>,
        schema: Schema,
    ) -> Result<Self, DataFormatError> {
        let mut table = Self::new(name, columns, Vec::new())?;
        for (idx, row) in rows.iter().enumerate() {
            if row.len() != table.columns.len() {
                return Err(DataFormatError::RowWidth {
                    table: table.name,
                    row: idx + 1,
                    expected: table.columns.len(),
                    actual: row.len(),
                });
            }
        }
        table.rows = rows;
        table.schema = schema;
        Ok(table)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<Value>] {
        &self.rows
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn height(&self) -> usize {
        self.rows.len()
    }

    pub fn width(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|column| column == name)
    }

    pub fn column_type(&self, name: &str) -> Option<ColumnType> {
        self.column_index(name)
            .map(|idx| self.schema.column_type(idx))
    }

    pub fn value(&self, row: usize, column: usize) -> Option<&Value> {
        self.rows.get(row).and_then(|values| values.get(column))
    }

    /// Resolves column names to indices, failing on the first unknown name.
    pub fn resolve_columns<S: AsRef<str>>(
        &self,
        names: &[S],
    ) -> Result<Vec<usize>, ValidationError> {
        names
            .iter()
            .map(|name| {
                let name = name.as_ref();
                self.column_index(name)
                    .ok_or_else(|| ValidationError::unknown_column(&self.name, name))
            })
            .collect()
    }

    /// A table with the same columns and schema holding the given rows, in order.
    #[must_use]
    pub fn select_rows(&self, indices: &[usize]) -> Table {
        Table {
            name: self.name.clone(),
            columns: self.columns.clone(),
            rows: indices
                .iter()
                .filter_map(|&idx| self.rows.get(idx).cloned())
                .collect(),
            schema: self.schema.clone(),
        }
    }

    /// A table holding only the given columns, in the given order.
    #[must_use]
    pub fn select_columns(&self, indices: &[usize]) -> Table {
        Table {
            name: self.name.clone(),
            columns: indices
                .iter()
                .map(|&idx| self.columns[idx].clone())
                .collect(),
            rows: self
                .rows
                .iter()
                .map(|row| indices.iter().map(|&idx| row[idx].clone()).collect())
                .collect(),
            schema: self.schema.project(indices),
        }
    }

    #[must_use]
    pub fn renamed(mut self, name: impl Into<String>) -> Table {
        self.name = name.into();
        self
    }

    pub fn into_rows(self) -> Vec<Vec<Value>> {
        self.rows
    }
}

fn check_unique_columns(table: &str, columns: &[String]) -> Result<(), DataFormatError> {
    let mut seen = BTreeSet::new();
    for column in columns {
        if !seen.insert(column.as_str()) {
            return Err(DataFormatError::DuplicateColumn {
                table: table.to_string(),
                column: column.clone(),
            });
        }
    }
    Ok(())
}
