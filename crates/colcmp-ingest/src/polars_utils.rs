//! Polars `AnyValue` conversion.
//!
//! Polars infers one dtype per CSV column; these helpers carry that typed data
//! into the row-major [`Table`] model.

use polars::prelude::{AnyValue, DataFrame};

use colcmp_model::{DataFormatError, Table, Value};

/// Converts a Polars `AnyValue` into a cell [`Value`].
///
/// Nulls and float `NaN` become [`Value::Empty`], blank strings too. Unsigned
/// integers that do not fit in `i64` fall back to a float.
///
/// ```
/// use polars::prelude::AnyValue;
/// use colcmp_ingest::any_to_value;
/// use colcmp_model::Value;
///
/// assert_eq!(any_to_value(AnyValue::Null), Value::Empty);
/// assert_eq!(any_to_value(AnyValue::Int32(42)), Value::Int(42));
/// assert_eq!(any_to_value(AnyValue::String(" ")), Value::Empty);
/// ```
pub fn any_to_value(value: AnyValue<'_>) -> Value {
    match value {
        AnyValue::Null => Value::Empty,
        AnyValue::Boolean(b) => Value::Bool(b),
        AnyValue::Int8(v) => Value::Int(i64::from(v)),
        AnyValue::Int16(v) => Value::Int(i64::from(v)),
        AnyValue::Int32(v) => Value::Int(i64::from(v)),
        AnyValue::Int64(v) => Value::Int(v),
        AnyValue::UInt8(v) => Value::Int(i64::from(v)),
        AnyValue::UInt16(v) => Value::Int(i64::from(v)),
        AnyValue::UInt32(v) => Value::Int(i64::from(v)),
        AnyValue::UInt64(v) => i64::try_from(v).map_or(Value::Float(v as f64), Value::Int),
        AnyValue::Float32(v) => Value::float(f64::from(v)),
        AnyValue::Float64(v) => Value::float(v),
        AnyValue::String(s) => Value::text(s),
        AnyValue::StringOwned(s) => Value::text(s.to_string()),
        other => Value::text(other.to_string()),
    }
}

/// Converts a DataFrame into a [`Table`] using the given header names.
///
/// Columns are matched to headers by position. A frame narrower than the
/// header is padded with missing values; a wider one is a format error.
pub fn dataframe_to_table(
    name: &str,
    headers: Vec<String>,
    df: &DataFrame,
) -> Result<Table, DataFormatError> {
    let columns = df.get_columns();
    if columns.len() > headers.len() {
        return Err(DataFormatError::RowWidth {
            table: name.to_string(),
            row: 1,
            expected: headers.len(),
            actual: columns.len(),
        });
    }
    let height = df.height();
    let mut rows: Vec<Vec<Value>> = (0..height)
        .map(|_| Vec::with_capacity(headers.len()))
        .collect();
    for column in columns {
        for (idx, row) in rows.iter_mut().enumerate() {
            row.push(any_to_value(column.get(idx).unwrap_or(AnyValue::Null)));
        }
    }
    for row in &mut rows {
        row.resize(headers.len(), Value::Empty);
    }
    Table::new(name, headers, rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use polars::prelude::{Column, IntoColumn, NamedFrom, Series};

    #[test]
    fn converts_numeric_values() {
        assert_eq!(any_to_value(AnyValue::Int64(-7)), Value::Int(-7));
        assert_eq!(any_to_value(AnyValue::UInt64(u64::MAX)), Value::Float(u64::MAX as f64));
        assert_eq!(any_to_value(AnyValue::Float64(5.0)), Value::Float(5.0));
        assert_eq!(any_to_value(AnyValue::Float64(f64::NAN)), Value::Empty);
    }

    #[test]
    fn converts_text_and_bool() {
        assert_eq!(any_to_value(AnyValue::String("x")), Value::text("x"));
        assert_eq!(any_to_value(AnyValue::Boolean(true)), Value::Bool(true));
    }

    #[test]
    fn frame_to_table_pads_missing_columns() {
        let cols: Vec<Column> = vec![
            Series::new("column_1".into(), &[1_i64, 2]).into_column(),
            Series::new("column_2".into(), &["a", "b"]).into_column(),
        ];
        let df = DataFrame::new(cols).unwrap();
        let table = dataframe_to_table(
            "t",
            vec!["id".to_string(), "name".to_string(), "extra".to_string()],
            &df,
        )
        .unwrap();
        assert_eq!(table.columns(), &["id", "name", "extra"]);
        assert_eq!(
            table.rows()[1],
            vec![Value::Int(2), Value::text("b"), Value::Empty]
        );
    }

    #[test]
    fn frame_wider_than_header_is_rejected() {
        let cols: Vec<Column> = vec![
            Series::new("a".into(), &[1_i64]).into_column(),
            Series::new("b".into(), &[2_i64]).into_column(),
        ];
        let df = DataFrame::new(cols).unwrap();
        assert!(dataframe_to_table("t", vec!["a".to_string()], &df).is_err());
    }
}
