use colcmp_model::{Result, Table};

/// Returns a copy of `table` without the named columns.
///
/// Column order and declared types of the remaining columns are unchanged.
/// An unknown name fails instead of being ignored, so a later operation never
/// runs against a table the caller did not expect.
pub fn drop_columns<S: AsRef<str>>(table: &Table, names: &[S]) -> Result<Table> {
    let dropped = table.resolve_columns(names)?;
    let kept: Vec<usize> = (0..table.width())
        .filter(|idx| !dropped.contains(idx))
        .collect();
    Ok(table.select_columns(&kept))
}
