//! Grouping with value merging.

use std::cmp::Ordering;
use std::collections::{BTreeSet, HashMap};

use tracing::debug;

use colcmp_model::{Result, Table, ValidationError, Value};

/// Delimiter used when none is chosen.
pub const DEFAULT_DELIMITER: &str = ", ";

/// Delimiters offered for joining merged values.
pub const DELIMITER_PRESETS: [&str; 5] = [", ", " | ", "; ", " / ", "||"];

/// Which value a non-merged column keeps for its group.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum KeepPolicy {
    /// The value of the group's first row, even when it is missing.
    #[default]
    FirstRow,
    /// The first non-missing value in row order, or missing if there is none.
    FirstNonEmpty,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupOptions {
    pub delimiter: String,
    pub keep: KeepPolicy,
}

impl Default for GroupOptions {
    fn default() -> Self {
        Self {
            delimiter: DEFAULT_DELIMITER.to_string(),
            keep: KeepPolicy::default(),
        }
    }
}

impl GroupOptions {
    #[must_use]
    pub fn with_delimiter(mut self, delimiter: impl Into<String>) -> Self {
        self.delimiter = delimiter.into();
        self
    }

    #[must_use]
    pub fn with_keep(mut self, keep: KeepPolicy) -> Self {
        self.keep = keep;
        self
    }
}

/// Collapses rows sharing the same group-by values into one row per group.
///
/// - group-by columns keep the group's values (missing values form a group
///   of their own);
/// - each merge column holds the distinct non-missing values of the group,
///   sorted and joined with the delimiter;
/// - every other column keeps one value per [`KeepPolicy`].
///
/// Output columns are `group_by + merge + remaining` with the remaining columns
/// in source order. Groups are sorted by their group-by values (see
/// [`Value::sort_cmp`]), missing values last.
///
/// Group-by values are matched on [`Value::key_form`], the same form used for
/// reconciliation keys: `" Eng"` and `"Eng"` fall into one group, as do the
/// text `"5"` and the number `5.0`.
///
/// # Errors
///
/// Fails when `group_by` is empty, a column is unknown, a column is both
/// grouped and merged, or a column is selected twice.
pub fn group_and_merge<G, M>(
    table: &Table,
    group_by: &[G],
    merge: &[M],
    options: &GroupOptions,
) -> Result<Table>
where
    G: AsRef<str>,
    M: AsRef<str>,
{
    if group_by.is_empty() {
        return Err(ValidationError::empty("group-by columns").into());
    }
    let group_idx = table.resolve_columns(group_by)?;
    let merge_idx = table.resolve_columns(merge)?;
    check_selection(table, &group_idx, &merge_idx)?;

    let remaining_idx: Vec<usize> = (0..table.width())
        .filter(|idx| !group_idx.contains(idx) && !merge_idx.contains(idx))
        .collect();

    let mut order: Vec<Vec<usize>> = Vec::new();
    let mut lookup: HashMap<Vec<String>, usize> = HashMap::new();
    for (row_idx, row) in table.rows().iter().enumerate() {
        let key: Vec<String> = group_idx.iter().map(|&idx| row[idx].key_form()).collect();
        match lookup.get(&key) {
            Some(&pos) => order[pos].push(row_idx),
            None => {
                lookup.insert(key, order.len());
                order.push(vec![row_idx]);
            }
        }
    }

    let rows = table.rows();
    order.sort_by(|a, b| {
        group_idx
            .iter()
            .map(|&idx| rows[a[0]][idx].sort_cmp(&rows[b[0]][idx]))
            .find(|ordering| ordering.is_ne())
            .unwrap_or(Ordering::Equal)
    });
    let mut out_rows = Vec::with_capacity(order.len());
    for members in &order {
        let first = &rows[members[0]];
        let mut out = Vec::with_capacity(table.width());
        out.extend(group_idx.iter().map(|&idx| first[idx].clone()));
        for &idx in &merge_idx {
            let distinct: BTreeSet<String> = members
                .iter()
                .map(|&row| &rows[row][idx])
                .filter(|value| !value.is_missing())
                .map(ToString::to_string)
                .collect();
            let joined = distinct
                .into_iter()
                .collect::<Vec<_>>()
                .join(&options.delimiter);
            out.push(Value::text(joined));
        }
        for &idx in &remaining_idx {
            let value = match options.keep {
                KeepPolicy::FirstRow => first[idx].clone(),
                KeepPolicy::FirstNonEmpty => members
                    .iter()
                    .map(|&row| &rows[row][idx])
                    .find(|value| !value.is_missing())
                    .cloned()
                    .unwrap_or_default(),
            };
            out.push(value);
        }
        out_rows.push(out);
    }

    let columns: Vec<String> = group_idx
        .iter()
        .chain(&merge_idx)
        .chain(&remaining_idx)
        .map(|&idx| table.columns()[idx].clone())
        .collect();
    debug!(
        table = table.name(),
        input_rows = table.height(),
        groups = out_rows.len(),
        "grouped rows"
    );
    Ok(Table::new(table.name(), columns, out_rows)?)
}

fn check_selection(
    table: &Table,
    group_idx: &[usize],
    merge_idx: &[usize],
) -> std::result::Result<(), ValidationError> {
    let mut seen = BTreeSet::new();
    for &idx in group_idx {
        if !seen.insert(idx) {
            return Err(ValidationError::ColumnCollision {
                column: table.columns()[idx].clone(),
            });
        }
    }
    let mut merged = BTreeSet::new();
    for &idx in merge_idx {
        if group_idx.contains(&idx) {
            return Err(ValidationError::OverlappingColumns {
                column: table.columns()[idx].clone(),
            });
        }
        if !merged.insert(idx) {
            return Err(ValidationError::ColumnCollision {
                column: table.columns()[idx].clone(),
            });
        }
    }
    Ok(())
}
