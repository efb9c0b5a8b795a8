//! Declared column types.
//!
//! A table's schema is inferred once, when the table is built, and reused by
//! every consumer instead of inspecting values ad hoc.

use std::fmt;

use serde::Serialize;

use crate::value::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnType {
    Text,
    Number,
    Boolean,
    /// Every value in the column is missing.
    Empty,
}

impl ColumnType {
    /// Combines the type seen so far with the type of another value.
    ///
    /// Missing values never change the type; any disagreement widens to text.
    #[must_use]
    pub fn unify(self, other: ColumnType) -> ColumnType {
        match (self, other) {
            (ColumnType::Empty, t) | (t, ColumnType::Empty) => t,
            (a, b) if a == b => a,
            _ => ColumnType::Text,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ColumnType::Text => "text",
            ColumnType::Number => "number",
            ColumnType::Boolean => "boolean",
            ColumnType::Empty => "empty",
        }
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Schema {
    types: Vec<ColumnType>,
}

impl Schema {
    /// Infers one declared type per column from row-major data.
    pub fn infer(width: usize, rows: &[Vec<Value>]) -> Self {
        let mut types = vec![ColumnType::Empty; width];
        for row in rows {
            for (slot, value) in types.iter_mut().zip(row) {
                *slot = slot.unify(value.column_type());
            }
        }
        Self { types }
    }

    pub fn from_types(types: Vec<ColumnType>) -> Self {
        Self { types }
    }

    /// Declared type of the column at `index`; out-of-range columns are `Empty`.
    pub fn column_type(&self, index: usize) -> ColumnType {
        self.types.get(index).copied().unwrap_or(ColumnType::Empty)
    }

    pub fn types(&self) -> &[ColumnType] {
        &self.types
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Schema restricted to the given column indices, in that order.
    #[must_use]
    pub fn project(&self, indices: &[usize]) -> Schema {
        Schema {
            types: indices.iter().map(|&idx| self.column_type(idx)).collect(),
        }
    }

    /// Concatenates two schemas side by side.
    #[must_use]
    pub fn concat(&self, other: &Schema) -> Schema {
        let mut types = self.types.clone();
        types.extend_from_slice(&other.types);
        Schema { types }
    }
}
