//! Key-based partition of two tables.

use std::collections::{BTreeSet, HashSet};

use serde::Serialize;
use tracing::{debug, debug_span};

use colcmp_model::{Result, Table};

use crate::key::{KeyColumns, table_keys};

/// Row and key counts of one reconciliation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReconSummary {
    pub left_rows: usize,
    pub right_rows: usize,
    pub matched_keys: usize,
    pub only_left_keys: usize,
    pub only_right_keys: usize,
    pub matched_left_rows: usize,
    pub matched_right_rows: usize,
    pub only_left_rows: usize,
    pub only_right_rows: usize,
}

/// The four row buckets of a comparison.
///
/// Rows in every bucket keep their relative order from the source table.
/// The key lists are sorted lexicographically.
#[derive(Debug, Clone)]
pub struct Reconciliation {
    pub matched_left: Table,
    pub matched_right: Table,
    pub only_left: Table,
    pub only_right: Table,
    pub match_keys: Vec<String>,
    pub only_left_keys: Vec<String>,
    pub only_right_keys: Vec<String>,
    matched_left_row_keys: Vec<String>,
    matched_right_row_keys: Vec<String>,
    left_rows: usize,
    right_rows: usize,
}

impl Reconciliation {
    pub fn summary(&self) -> ReconSummary {
        ReconSummary {
            left_rows: self.left_rows,
            right_rows: self.right_rows,
            matched_keys: self.match_keys.len(),
            only_left_keys: self.only_left_keys.len(),
            only_right_keys: self.only_right_keys.len(),
            matched_left_rows: self.matched_left.height(),
            matched_right_rows: self.matched_right.height(),
            only_left_rows: self.only_left.height(),
            only_right_rows: self.only_right.height(),
        }
    }

    /// Composite key of each row of `matched_left`, aligned by index.
    pub fn matched_left_row_keys(&self) -> &[String] {
        &self.matched_left_row_keys
    }

    /// Composite key of each row of `matched_right`, aligned by index.
    pub fn matched_right_row_keys(&self) -> &[String] {
        &self.matched_right_row_keys
    }
}

/// Partitions two tables into matched and unmatched rows by composite key.
///
/// `matched = keys(left) ∩ keys(right)`; a row lands in a matched bucket when
/// its key is in that intersection and in the `only_*` bucket of its side
/// otherwise. Keys may repeat within a table; every repeat is kept.
///
/// # Errors
///
/// Fails with a validation error, before any key is computed, when either
/// selection is empty, the selections differ in length, or a column is
/// unknown.
pub fn reconcile<L, R>(
    left: &Table,
    left_keys: &[L],
    right: &Table,
    right_keys: &[R],
) -> Result<Reconciliation>
where
    L: AsRef<str>,
    R: AsRef<str>,
{
    let span = debug_span!("reconcile", left = left.name(), right = right.name());
    let _guard = span.enter();

    let columns = KeyColumns::resolve(left, left_keys, right, right_keys)?;
    let left_row_keys = table_keys(left, &columns.left);
    let right_row_keys = table_keys(right, &columns.right);

    let left_set: HashSet<&str> = left_row_keys.iter().map(String::as_str).collect();
    let right_set: HashSet<&str> = right_row_keys.iter().map(String::as_str).collect();

    let (matched_left_idx, only_left_idx) = partition(&left_row_keys, &right_set);
    let (matched_right_idx, only_right_idx) = partition(&right_row_keys, &left_set);

    let match_keys: BTreeSet<&str> = left_set.intersection(&right_set).copied().collect();
    let only_left_keys: BTreeSet<&str> = left_set.difference(&right_set).copied().collect();
    let only_right_keys: BTreeSet<&str> = right_set.difference(&left_set).copied().collect();

    debug!(
        left_keys = left_set.len(),
        right_keys = right_set.len(),
        matched_keys = match_keys.len(),
        "computed key sets"
    );

    Ok(Reconciliation {
        matched_left: left.select_rows(&matched_left_idx),
        matched_right: right.select_rows(&matched_right_idx),
        only_left: left.select_rows(&only_left_idx),
        only_right: right.select_rows(&only_right_idx),
        match_keys: to_owned(match_keys),
        only_left_keys: to_owned(only_left_keys),
        only_right_keys: to_owned(only_right_keys),
        matched_left_row_keys: pick(&left_row_keys, &matched_left_idx),
        matched_right_row_keys: pick(&right_row_keys, &matched_right_idx),
        left_rows: left.height(),
        right_rows: right.height(),
    })
}

/// Splits row indices into (key in `other`, key not in `other`).
fn partition(keys: &[String], other: &HashSet<&str>) -> (Vec<usize>, Vec<usize>) {
    let mut inside = Vec::new();
    let mut outside = Vec::new();
    for (idx, key) in keys.iter().enumerate() {
        if other.contains(key.as_str()) {
            inside.push(idx);
        } else {
            outside.push(idx);
        }
    }
    (inside, outside)
}

fn pick(keys: &[String], indices: &[usize]) -> Vec<String> {
    indices.iter().map(|&idx| keys[idx].clone()).collect()
}

fn to_owned(keys: BTreeSet<&str>) -> Vec<String> {
    keys.into_iter().map(str::to_string).collect()
}
