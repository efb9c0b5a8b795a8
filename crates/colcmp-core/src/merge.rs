//! Side-by-side view of matched rows.
//!
//! Matched rows are inner-joined on their composite key. A key that repeats
//! on both sides yields every left/right combination (the cross-product), so
//! `n` left rows and `m` right rows sharing a key produce `n * m` merged rows.

use std::collections::{BTreeSet, HashMap};

use serde::Serialize;
use tracing::debug;

use colcmp_model::{ColumnType, Result, Schema, Table, ValidationError, Value};

use crate::reconcile::Reconciliation;

/// Column naming for the merged view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeOptions {
    /// Name of the leading column holding the shared key.
    pub key_column: String,
    pub left_prefix: String,
    pub right_prefix: String,
}

impl Default for MergeOptions {
    fn default() -> Self {
        Self {
            key_column: "Key".to_string(),
            left_prefix: "F1_".to_string(),
            right_prefix: "F2_".to_string(),
        }
    }
}

impl MergeOptions {
    #[must_use]
    pub fn with_key_column(mut self, name: impl Into<String>) -> Self {
        self.key_column = name.into();
        self
    }

    #[must_use]
    pub fn with_prefixes(mut self, left: impl Into<String>, right: impl Into<String>) -> Self {
        self.left_prefix = left.into();
        self.right_prefix = right.into();
        self
    }
}

/// Whether the two sides of a compared column hold the same value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CellDiff {
    Equal,
    Different,
}

/// A column name present in both tables, located in the merged table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ComparedColumn {
    pub name: String,
    pub left_index: usize,
    pub right_index: usize,
}

/// Merged rows plus per-row diff flags for every compared column.
#[derive(Debug, Clone)]
pub struct MergedView {
    table: Table,
    compared: Vec<ComparedColumn>,
    diffs: Vec<Vec<CellDiff>>,
}

impl MergedView {
    pub fn table(&self) -> &Table {
        &self.table
    }

    pub fn compared_columns(&self) -> &[ComparedColumn] {
        &self.compared
    }

    /// Flags of one merged row, aligned with [`Self::compared_columns`].
    pub fn row_diffs(&self, row: usize) -> &[CellDiff] {
        self.diffs.get(row).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Flag for a cell of the merged table.
    ///
    /// Both cells of a compared pair carry the same flag; the key column and
    /// columns present on one side only are unflagged.
    pub fn diff(&self, row: usize, column: usize) -> Option<CellDiff> {
        let flags = self.diffs.get(row)?;
        self.compared
            .iter()
            .position(|c| c.left_index == column || c.right_index == column)
            .map(|pos| flags[pos])
    }

    /// Number of merged rows with at least one differing compared column.
    pub fn rows_with_differences(&self) -> usize {
        self.diffs
            .iter()
            .filter(|flags| flags.contains(&CellDiff::Different))
            .count()
    }

    /// Per compared column, the number of merged rows where the sides differ.
    pub fn difference_counts(&self) -> Vec<(String, usize)> {
        self.compared
            .iter()
            .enumerate()
            .map(|(pos, column)| {
                let count = self
                    .diffs
                    .iter()
                    .filter(|flags| flags[pos] == CellDiff::Different)
                    .count();
                (column.name.clone(), count)
            })
            .collect()
    }
}

/// Joins the matched buckets of a reconciliation on equal key.
///
/// Output columns: the key column, every left column with the left prefix,
/// then every right column with the right prefix. Rows follow the left
/// bucket's order; for each left row the right rows sharing its key follow in
/// their own order.
///
/// # Errors
///
/// Returns [`ValidationError::ColumnCollision`] when two output columns would
/// share a name, e.g. equal prefixes on tables with a common column.
pub fn merge_side_by_side(recon: &Reconciliation, options: &MergeOptions) -> Result<MergedView> {
    let left = &recon.matched_left;
    let right = &recon.matched_right;

    let mut columns = Vec::with_capacity(1 + left.width() + right.width());
    columns.push(options.key_column.clone());
    columns.extend(
        left
            .columns()
            .iter()
            .map(|c| format!("{}{c}", options.left_prefix)),
    );
    columns.extend(
        right
            .columns()
            .iter()
            .map(|c| format!("{}{c}", options.right_prefix)),
    );
    check_collisions(&columns)?;

    let compared: Vec<ComparedColumn> = left
        .columns()
        .iter()
        .enumerate()
        .filter_map(|(li, name)| {
            right.column_index(name).map(|ri| ComparedColumn {
                name: name.clone(),
                left_index: 1 + li,
                right_index: 1 + left.width() + ri,
            })
        })
        .collect();

    let mut right_by_key: HashMap<&str, Vec<usize>> = HashMap::new();
    for (idx, key) in recon.matched_right_row_keys().iter().enumerate() {
        right_by_key.entry(key.as_str()).or_default().push(idx);
    }

    let mut rows = Vec::new();
    let mut diffs = Vec::new();
    for (li, key) in recon.matched_left_row_keys().iter().enumerate() {
        let Some(partners) = right_by_key.get(key.as_str()) else {
            continue;
        };
        let left_row = &left.rows()[li];
        for &ri in partners {
            let right_row = &right.rows()[ri];
            let mut row = Vec::with_capacity(columns.len());
            row.push(Value::text(key.clone()));
            row.extend(left_row.iter().cloned());
            row.extend(right_row.iter().cloned());

            let flags: Vec<CellDiff> = compared
                .iter()
                .map(|c| {
                    if row[c.left_index].key_form() == row[c.right_index].key_form() {
                        CellDiff::Equal
                    } else {
                        CellDiff::Different
                    }
                })
                .collect();
            rows.push(row);
            diffs.push(flags);
        }
    }

    let key_type = rows
        .iter()
        .fold(ColumnType::Empty, |acc, row| acc.unify(row[0].column_type()));
    let schema = Schema::from_types(vec![key_type])
        .concat(left.schema())
        .concat(right.schema());
    debug!(
        merged_rows = rows.len(),
        compared_columns = compared.len(),
        "built side-by-side view"
    );
    let table = Table::with_schema("merged", columns, rows, schema)?;
    Ok(MergedView {
        table,
        compared,
        diffs,
    })
}

fn check_collisions(columns: &[String]) -> std::result::Result<(), ValidationError> {
    let mut seen = BTreeSet::new();
    for column in columns {
        if !seen.insert(column.as_str()) {
            return Err(ValidationError::ColumnCollision {
                column: column.clone(),
            });
        }
    }
    Ok(())
}
