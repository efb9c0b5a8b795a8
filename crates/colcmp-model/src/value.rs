//! Cell values.
//!
//! Loaders produce one of five value shapes. Every comparison and grouping
//! operation works on the *key form* of a value (see [`Value::key_form`]) so
//! that a float `5.0` read from a workbook and the text `"5"` read from a CSV
//! file compare equal.

use std::cmp::Ordering;
use std::fmt;

use serde::Serialize;

use crate::schema::ColumnType;

/// Separator placed between the normalized parts of a composite key.
pub const KEY_SEPARATOR: &str = " | ";

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(tag = "kind", content = "value")]
pub enum Value {
    #[default]
    Empty,
    Text(String),
    Int(i64),
    Float(f64),
    Bool(bool),
}

impl Value {
    /// Builds a text value, mapping blank input to [`Value::Empty`].
    pub fn text(raw: impl Into<String>) -> Self {
        let raw = raw.into();
        if raw.trim().is_empty() {
            Value::Empty
        } else {
            Value::Text(raw)
        }
    }

    /// Builds a float value, mapping `NaN` to [`Value::Empty`].
    pub fn float(v: f64) -> Self {
        if v.is_nan() { Value::Empty } else { Value::Float(v) }
    }

    /// Returns true for missing values (`Empty`, or a stray `NaN`).
    pub fn is_missing(&self) -> bool {
        match self {
            Value::Empty => true,
            Value::Float(v) => v.is_nan(),
            _ => false,
        }
    }

    /// The declared type this single value would give a column.
    pub fn column_type(&self) -> ColumnType {
        match self {
            _ if self.is_missing() => ColumnType::Empty,
            Value::Text(_) => ColumnType::Text,
            Value::Int(_) | Value::Float(_) => ColumnType::Number,
            Value::Bool(_) => ColumnType::Boolean,
            Value::Empty => ColumnType::Empty,
        }
    }

    /// Normalized string used for key building and cell comparison.
    ///
    /// Missing values become the empty string, whole floats lose their
    /// fractional part and text is trimmed.
    pub fn key_form(&self) -> String {
        match self {
            Value::Text(s) => s.trim().to_string(),
            other => other.to_string(),
        }
    }

    /// Total order used to sort group rows: numbers by value, then booleans,
    /// then text by key form, with missing values last.
    pub fn sort_cmp(&self, other: &Value) -> Ordering {
        self.sort_rank()
            .cmp(&other.sort_rank())
            .then_with(|| match (self, other) {
                (Value::Bool(a), Value::Bool(b)) => a.cmp(b),
                (Value::Text(a), Value::Text(b)) => a.trim().cmp(b.trim()),
                _ => match (self.as_f64(), other.as_f64()) {
                    (Some(a), Some(b)) => a.total_cmp(&b),
                    _ => Ordering::Equal,
                },
            })
    }

    fn sort_rank(&self) -> u8 {
        match self {
            _ if self.is_missing() => 3,
            Value::Int(_) | Value::Float(_) => 0,
            Value::Bool(_) => 1,
            Value::Text(_) => 2,
            Value::Empty => 3,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Int(v) => Some(*v as f64),
            Value::Float(v) if !v.is_nan() => Some(*v),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Empty => Ok(()),
            Value::Text(s) => f.write_str(s),
            Value::Int(v) => write!(f, "{v}"),
            Value::Float(v) => f.write_str(&format_float(*v)),
            Value::Bool(true) => f.write_str("True"),
            Value::Bool(false) => f.write_str("False"),
        }
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::text(value)
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::text(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Int(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::float(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Value::Empty, Into::into)
    }
}

/// Formats a float, printing whole numbers in integer form.
///
/// ```
/// use colcmp_model::format_float;
///
/// assert_eq!(format_float(5.0), "5");
/// assert_eq!(format_float(-0.0), "0");
/// assert_eq!(format_float(2.5), "2.5");
/// assert_eq!(format_float(f64::NAN), "");
/// ```
pub fn format_float(v: f64) -> String {
    if v.is_nan() {
        return String::new();
    }
    if v.is_finite() && v.fract() == 0.0 {
        if v == 0.0 {
            return "0".to_string();
        }
        return format!("{v:.0}");
    }
    format!("{v}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn whole_float_and_text_share_key_form() {
        assert_eq!(Value::Float(5.0).key_form(), "5");
        assert_eq!(Value::text("5").key_form(), "5");
        assert_eq!(Value::text(" 5 ").key_form(), "5");
        assert_eq!(Value::Int(5).key_form(), "5");
    }

    #[test]
    fn fractional_float_keeps_fraction() {
        assert_eq!(Value::Float(1.25).key_form(), "1.25");
        assert_eq!(Value::Float(-3.5).key_form(), "-3.5");
    }

    #[test]
    fn large_whole_float_has_no_exponent() {
        assert_eq!(Value::Float(1e20).key_form(), "100000000000000000000");
    }

    #[test]
    fn missing_values_have_empty_key_form() {
        assert_eq!(Value::Empty.key_form(), "");
        assert_eq!(Value::Float(f64::NAN).key_form(), "");
        assert!(Value::Float(f64::NAN).is_missing());
        assert_eq!(Value::text("   "), Value::Empty);
        assert_eq!(Value::float(f64::NAN), Value::Empty);
    }

    #[test]
    fn sort_order_puts_missing_last() {
        let mut values = vec![
            Value::text("b"),
            Value::Empty,
            Value::Float(2.5),
            Value::text("a"),
            Value::Int(10),
            Value::Bool(true),
            Value::Int(-1),
        ];
        values.sort_by(Value::sort_cmp);
        assert_eq!(
            values,
            vec![
                Value::Int(-1),
                Value::Float(2.5),
                Value::Int(10),
                Value::Bool(true),
                Value::text("a"),
                Value::text("b"),
                Value::Empty,
            ]
        );
    }

    #[test]
    fn booleans_render_capitalized() {
        assert_eq!(Value::Bool(true).key_form(), "True");
        assert_eq!(Value::Bool(false).to_string(), "False");
    }

    #[test]
    fn column_type_of_values() {
        assert_eq!(Value::Empty.column_type(), ColumnType::Empty);
        assert_eq!(Value::Float(f64::NAN).column_type(), ColumnType::Empty);
        assert_eq!(Value::Int(1).column_type(), ColumnType::Number);
        assert_eq!(Value::Float(1.5).column_type(), ColumnType::Number);
        assert_eq!(Value::Bool(true).column_type(), ColumnType::Boolean);
        assert_eq!(Value::text("x").column_type(), ColumnType::Text);
    }

    #[test]
    fn option_conversion() {
        assert_eq!(Value::from(None::<i64>), Value::Empty);
        assert_eq!(Value::from(Some(3_i64)), Value::Int(3));
    }
}
