use std::fmt;

/// The kind of a [Value](crate::Value) as seen by the query engine.
///
/// Cells are typed one by one at ingestion, so a column may hold several
/// kinds. `Null` is the kind of an empty field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataType {
    /// A 64-bit signed integer.
    Int,
    /// A 64-bit floating-point number.
    Float,
    /// A variable-length UTF-8 character string.
    Text,
    /// An empty or missing value.
    Null,
}

impl DataType {
    /// Returns `true` for the kinds that take part in numeric promotion.
    pub fn is_numeric(&self) -> bool {
        matches!(self, Self::Int | Self::Float)
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Int => "INT",
            Self::Float => "FLOAT",
            Self::Text => "TEXT",
            Self::Null => "NULL",
        };
        f.write_str(name)
    }
}
