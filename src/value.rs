use std::fmt;
use std::sync::Arc;

use crate::ast::ComparisonOp;
use crate::data_type::DataType;
use crate::error::{Error, Result};

/// Represents a single cell stored in a table or a literal in a query.
///
/// Integers and floats compare with each other through promotion to `f64`.
/// Text only compares with text. Any other pairing is a type mismatch.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// represents an empty or missing value.
    Null,
    /// A 64-bit signed integer value.
    Int(i64),
    /// A 64-bit floating-point value. Always finite.
    Float(f64),
    /// A UTF-8 string value, wrapped in an [Arc] for cheap cloning when
    /// rows are copied into a result set.
    Text(Arc<str>),
}

impl Value {
    /// Types a raw text field.
    ///
    /// Surrounding whitespace is ignored. An empty field is [Value::Null];
    /// otherwise an integer parse is attempted, then a float parse, and the
    /// trimmed text is kept as [Value::Text] when both fail. Spellings of
    /// non-finite floats (`NaN`, `inf`) stay text.
    ///
    /// ```
    /// # use memql::Value;
    /// assert_eq!(Value::infer(" 31 "), Value::Int(31));
    /// assert_eq!(Value::infer("2.5"), Value::Float(2.5));
    /// assert_eq!(Value::infer("Sales"), Value::Text("Sales".into()));
    /// assert_eq!(Value::infer("   "), Value::Null);
    /// ```
    pub fn infer(raw: &str) -> Value {
        let raw = raw.trim();
        if raw.is_empty() {
            return Value::Null;
        }
        if let Ok(i) = raw.parse::<i64>() {
            return Value::Int(i);
        }
        match raw.parse::<f64>() {
            Ok(f) if f.is_finite() => Value::Float(f),
            _ => Value::Text(raw.into()),
        }
    }

    /// Returns `true` if the value is [Value::Null].
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Returns `true` for [Value::Int] and [Value::Float].
    pub fn is_numeric(&self) -> bool {
        self.data_type().is_numeric()
    }

    /// Returns the numeric value promoted to `f64`, for both
    /// [Value::Int] and [Value::Float].
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Int(i) => Some(*i as f64),
            Self::Float(f) => Some(*f),
            _ => None,
        }
    }

    /// Returns the [DataType] of this value.
    pub fn data_type(&self) -> DataType {
        match self {
            Self::Null => DataType::Null,
            Self::Int(_) => DataType::Int,
            Self::Float(_) => DataType::Float,
            Self::Text(_) => DataType::Text,
        }
    }

    /// Evaluates `self <op> other`.
    ///
    /// # Rules
    /// - Numeric against numeric: compared as integers when both are
    ///   [Value::Int], otherwise both sides are promoted to `f64`.
    /// - Text against text: lexicographic, case-sensitive.
    /// - `=` and `!=` with a NULL operand: NULL equals only NULL.
    ///
    /// # Errors
    /// Returns [Error::TypeMismatch] for any other pairing, including an
    /// ordering comparator with a NULL operand.
    pub fn compare(&self, op: ComparisonOp, other: &Value) -> Result<bool> {
        if op.is_equality() && (self.is_null() || other.is_null()) {
            let equal = self.is_null() && other.is_null();
            return Ok(equal == (op == ComparisonOp::Eq));
        }

        let ordering = match (self, other) {
            (Value::Int(l), Value::Int(r)) => Some(l.cmp(r)),
            (Value::Text(l), Value::Text(r)) => Some(l.cmp(r)),
            _ => match (self.as_f64(), other.as_f64()) {
                (Some(l), Some(r)) => l.partial_cmp(&r),
                _ => {
                    return Err(Error::TypeMismatch {
                        left: self.data_type(),
                        right: other.data_type(),
                        operator: op,
                    });
                }
            },
        };

        Ok(ordering.is_some_and(|ordering| op.matches(ordering)))
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("NULL"),
            Self::Int(i) => write!(f, "{i}"),
            // Debug keeps the decimal point on integral floats
            Self::Float(v) => write!(f, "{v:?}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Int(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Float(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Text(value.into())
    }
}
