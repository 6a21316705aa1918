use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Declared scalar type of a column. Fixed when the column is created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ColumnType {
    Integer,
    Float,
    Text,
    /// Untyped column, stores whatever it is given
    Opaque,
}

impl ColumnType {
    pub fn name(&self) -> &'static str {
        match self {
            ColumnType::Integer => "integer",
            ColumnType::Float => "float",
            ColumnType::Text => "text",
            ColumnType::Opaque => "opaque",
        }
    }

    /// Coerce `value` into this column type.
    ///
    /// Integer columns go through a numeric conversion and truncate toward zero,
    /// so `"2.9"` becomes `2`. Float columns parse decimals. Text columns accept
    /// anything and store its display form. `Missing` is accepted everywhere.
    ///
    /// NaN and infinities are rejected by every column that would store them as
    /// a float, so a stored float always survives the JSON form.
    pub fn coerce(&self, value: CellValue) -> Result<CellValue, ValueError> {
        match (self, value) {
            (_, CellValue::Missing) => Ok(CellValue::Missing),
            (ColumnType::Opaque, CellValue::Float(f)) => finite(*self, f),
            (ColumnType::Opaque, value) => Ok(value),

            (ColumnType::Integer, CellValue::Integer(i)) => Ok(CellValue::Integer(i)),
            (ColumnType::Integer, CellValue::Float(f)) => truncate(f)
                .map(CellValue::Integer)
                .ok_or_else(|| ValueError::mismatch(*self, &CellValue::Float(f))),
            (ColumnType::Integer, CellValue::Text(s)) => parse_number(&s)
                .and_then(truncate)
                .map(CellValue::Integer)
                .ok_or(ValueError::TypeMismatch {
                    expected: ColumnType::Integer,
                    found: s,
                }),

            (ColumnType::Float, CellValue::Float(f)) => finite(*self, f),
            (ColumnType::Float, CellValue::Integer(i)) => Ok(CellValue::Float(i as f64)),
            (ColumnType::Float, CellValue::Text(s)) => parse_number(&s)
                .filter(|f| f.is_finite())
                .map(CellValue::Float)
                .ok_or(ValueError::TypeMismatch {
                    expected: ColumnType::Float,
                    found: s,
                }),

            (ColumnType::Text, CellValue::Text(s)) => Ok(CellValue::Text(s)),
            (ColumnType::Text, value) => Ok(CellValue::Text(value.to_string())),
        }
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

fn parse_number(text: &str) -> Option<f64> {
    text.trim().parse::<f64>().ok()
}

fn finite(column_type: ColumnType, f: f64) -> Result<CellValue, ValueError> {
    if f.is_finite() {
        Ok(CellValue::Float(f))
    } else {
        Err(ValueError::mismatch(column_type, &CellValue::Float(f)))
    }
}

// i64::MAX as f64 rounds up to 2^63, hence the strict upper bound.
fn truncate(f: f64) -> Option<i64> {
    let t = f.trunc();
    if t.is_finite() && t >= i64::MIN as f64 && t < i64::MAX as f64 {
        Some(t as i64)
    } else {
        None
    }
}

/// Error produced when a value cannot be stored in a column
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValueError {
    #[error("cannot store '{found}' in a {expected} column")]
    TypeMismatch { expected: ColumnType, found: String },
}

impl ValueError {
    fn mismatch(expected: ColumnType, value: &CellValue) -> Self {
        ValueError::TypeMismatch {
            expected,
            found: value.to_string(),
        }
    }
}

/// A single cell in the document.
///
/// Serialises untagged: `1`, `1.5`, `"text"` and `null` for missing.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    Integer(i64),
    Float(f64),
    Text(String),
    #[default]
    Missing,
}

impl CellValue {
    pub fn is_missing(&self) -> bool {
        matches!(self, CellValue::Missing)
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            CellValue::Integer(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Integer(i) => Some(*i as f64),
            CellValue::Float(f) => Some(*f),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            CellValue::Text(s) => Some(s),
            _ => None,
        }
    }
}

// Floats compare by bit pattern, so `0.0` and `-0.0` stay distinct edits and
// equality is reflexive for every value.
impl PartialEq for CellValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (CellValue::Integer(a), CellValue::Integer(b)) => a == b,
            (CellValue::Float(a), CellValue::Float(b)) => a.to_bits() == b.to_bits(),
            (CellValue::Text(a), CellValue::Text(b)) => a == b,
            (CellValue::Missing, CellValue::Missing) => true,
            _ => false,
        }
    }
}

impl Eq for CellValue {}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Integer(i) => write!(f, "{}", i),
            CellValue::Float(v) => write!(f, "{}", v),
            CellValue::Text(s) => f.write_str(s),
            CellValue::Missing => f.write_str("<NA>"),
        }
    }
}

impl From<i64> for CellValue {
    fn from(value: i64) -> Self {
        CellValue::Integer(value)
    }
}

impl From<i32> for CellValue {
    fn from(value: i32) -> Self {
        CellValue::Integer(value.into())
    }
}

impl From<f64> for CellValue {
    fn from(value: f64) -> Self {
        CellValue::Float(value)
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        CellValue::Text(value.to_string())
    }
}

impl From<String> for CellValue {
    fn from(value: String) -> Self {
        CellValue::Text(value)
    }
}

impl<T: Into<CellValue>> From<Option<T>> for CellValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(CellValue::Missing, Into::into)
    }
}
