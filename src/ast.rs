use std::cmp::Ordering;
use std::fmt;

use crate::Value;

#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    Load(Load),
    Select(Select),
}

/// `LOAD <source> AS <table>`
#[derive(Debug, Clone, PartialEq)]
pub struct Load {
    pub source: String,
    pub table: String,
}

/// What a `COUNT(...)` projection counts.
#[derive(Debug, Clone, PartialEq)]
pub enum CountTarget {
    /// `COUNT(*)`: every surviving row.
    Star,
    /// `COUNT(col)`: surviving rows where `col` is not NULL.
    Column(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Projection {
    Star,
    Count(CountTarget),
    Columns(Vec<String>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComparisonOp {
    Eq,
    NotEq,
    Gt,
    Lt,
    GtEq,
    LtEq,
}

impl ComparisonOp {
    /// `=` and `!=`.
    pub fn is_equality(&self) -> bool {
        matches!(self, Self::Eq | Self::NotEq)
    }

    /// Returns whether an ordering between two operands satisfies the operator.
    pub fn matches(&self, ordering: Ordering) -> bool {
        match self {
            Self::Eq => ordering == Ordering::Equal,
            Self::NotEq => ordering != Ordering::Equal,
            Self::Gt => ordering == Ordering::Greater,
            Self::Lt => ordering == Ordering::Less,
            Self::GtEq => ordering != Ordering::Less,
            Self::LtEq => ordering != Ordering::Greater,
        }
    }
}

impl fmt::Display for ComparisonOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let symbol = match self {
            Self::Eq => "=",
            Self::NotEq => "!=",
            Self::Gt => ">",
            Self::Lt => "<",
            Self::GtEq => ">=",
            Self::LtEq => "<=",
        };
        f.write_str(symbol)
    }
}

/// A single `column <op> literal` condition.
#[derive(Debug, Clone, PartialEq)]
pub struct Predicate {
    pub column: String,
    pub op: ComparisonOp,
    pub literal: Value,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Select {
    pub projection: Projection,
    pub table: String,
    pub predicate: Option<Predicate>,
}
