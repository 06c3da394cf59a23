//! Text rendering of statement outputs for the shell.

use std::fmt;

use crate::engine::{Output, QueryResult};
use crate::value::Value;

impl fmt::Display for QueryResult {
    /// Renders a boxed table with upper-cased headers. Numbers are
    /// right-aligned, everything else left-aligned.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.rows.is_empty() {
            return write!(f, "(0 rows returned)");
        }

        let cells: Vec<Vec<String>> = self
            .rows
            .iter()
            .map(|row| row.iter().map(Value::to_string).collect())
            .collect();

        let widths: Vec<usize> = self
            .columns
            .iter()
            .enumerate()
            .map(|(i, name)| {
                cells
                    .iter()
                    .filter_map(|row| row.get(i))
                    .map(|cell| cell.chars().count())
                    .fold(name.chars().count(), usize::max)
            })
            .collect();

        let separator: String = widths
            .iter()
            .map(|w| format!("+{}", "-".repeat(w + 2)))
            .chain(std::iter::once("+".to_string()))
            .collect();

        writeln!(f, "{separator}")?;
        for (name, &width) in self.columns.iter().zip(&widths) {
            write!(f, "| {:<width$} ", name.to_uppercase())?;
        }
        writeln!(f, "|")?;
        writeln!(f, "{separator}")?;

        for (row, rendered) in self.rows.iter().zip(&cells) {
            for ((value, cell), &width) in row.iter().zip(rendered).zip(&widths) {
                if value.is_numeric() {
                    write!(f, "| {cell:>width$} ")?;
                } else {
                    write!(f, "| {cell:<width$} ")?;
                }
            }
            writeln!(f, "|")?;
        }

        writeln!(f, "{separator}")?;
        write!(f, "({} rows returned)", self.rows.len())
    }
}

impl fmt::Display for Output {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Output::Loaded { table, row_count } => {
                write!(f, "Loaded table '{table}' with {row_count} rows.")
            }
            Output::Rows(result) => fmt::Display::fmt(result, f),
            Output::Count { label, value } => {
                let result = QueryResult {
                    columns: vec![label.clone()],
                    rows: vec![vec![Value::Int(i64::try_from(*value).unwrap_or(i64::MAX))]],
                };
                fmt::Display::fmt(&result, f)
            }
        }
    }
}
