//! Composite keys.

use colcmp_model::{KEY_SEPARATOR, Table, ValidationError, Value};

/// Builds the composite key of one row from the selected column indices.
///
/// Each value is reduced to its key form and the parts are joined with
/// [`KEY_SEPARATOR`], so `[5.0, "x "]` becomes `"5 | x"`.
pub fn composite_key(row: &[Value], indices: &[usize]) -> String {
    let mut key = String::new();
    for (pos, &idx) in indices.iter().enumerate() {
        if pos > 0 {
            key.push_str(KEY_SEPARATOR);
        }
        if let Some(value) = row.get(idx) {
            key.push_str(&value.key_form());
        }
    }
    key
}

/// Composite keys of every row, in row order.
pub fn table_keys(table: &Table, indices: &[usize]) -> Vec<String> {
    table
        .rows()
        .iter()
        .map(|row| composite_key(row, indices))
        .collect()
}

/// Key column indices for both sides of a comparison, already validated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyColumns {
    pub left: Vec<usize>,
    pub right: Vec<usize>,
}

impl KeyColumns {
    /// Validates a key selection against both tables.
    ///
    /// Empty selections are reported first, then a count mismatch, then the
    /// first unknown column.
    pub fn resolve<L, R>(
        left: &Table,
        left_keys: &[L],
        right: &Table,
        right_keys: &[R],
    ) -> Result<Self, ValidationError>
    where
        L: AsRef<str>,
        R: AsRef<str>,
    {
        if left_keys.is_empty() {
            return Err(ValidationError::empty(format!(
                "key columns for table '{}'",
                left.name()
            )));
        }
        if right_keys.is_empty() {
            return Err(ValidationError::empty(format!(
                "key columns for table '{}'",
                right.name()
            )));
        }
        if left_keys.len() != right_keys.len() {
            return Err(ValidationError::KeyCountMismatch {
                left: left_keys.len(),
                right: right_keys.len(),
            });
        }
        Ok(Self {
            left: left.resolve_columns(left_keys)?,
            right: right.resolve_columns(right_keys)?,
        })
    }
}
