use crate::error::{Error, Result};
use crate::value::Value;

/// One typed value per column, in the table's column order.
pub type Row = Vec<Value>;

/// Header and data lines of a source, as plain text fields.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawTable {
    pub header: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

/// An immutable table built by ingestion.
///
/// Every row has exactly `columns.len()` values and column names are
/// unique and lowercase.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    pub name: String,
    columns: Vec<String>,
    rows: Vec<Row>,
}

impl Table {
    /// Builds a table from raw text.
    ///
    /// The table name and header entries are trimmed and lowercased; every
    /// data field is trimmed and typed with [Value::infer].
    ///
    /// # Errors
    /// - [Error::DuplicateColumn] if two header entries normalize to the same name.
    /// - [Error::MalformedRow] if a data row's field count differs from the header's.
    pub fn from_raw(name: &str, raw: RawTable) -> Result<Self> {
        let name = name.trim().to_lowercase();

        let mut columns: Vec<String> = Vec::with_capacity(raw.header.len());
        for column in &raw.header {
            let column = column.trim().to_lowercase();
            if columns.contains(&column) {
                return Err(Error::DuplicateColumn { name: column, table: name });
            }
            columns.push(column);
        }

        let rows = raw
            .rows
            .iter()
            .enumerate()
            .map(|(row_index, fields)| {
                if fields.len() != columns.len() {
                    return Err(Error::MalformedRow {
                        expected_fields: columns.len(),
                        actual_fields: fields.len(),
                        row_index,
                    });
                }
                Ok(fields.iter().map(|field| Value::infer(field)).collect())
            })
            .collect::<Result<Vec<Row>>>()?;

        Ok(Self { name, columns, rows })
    }

    /// Column names in declared order.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Rows in ingestion order.
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn get_row(&self, row_idx: usize) -> Option<&Row> {
        self.rows.get(row_idx)
    }

    /// Position of `name` in the column list. `name` must already be lowercase.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|col| col == name)
    }

    /// Like [Table::column_index], failing with [Error::ColumnNotFound].
    pub fn resolve_column(&self, name: &str) -> Result<usize> {
        self.column_index(name).ok_or_else(|| Error::ColumnNotFound {
            name: name.to_string(),
            table: self.name.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(header: &[&str], rows: &[&[&str]]) -> RawTable {
        RawTable {
            header: header.iter().map(|s| s.to_string()).collect(),
            rows: rows
                .iter()
                .map(|row| row.iter().map(|s| s.to_string()).collect())
                .collect(),
        }
    }

    #[test]
    fn test_table_from_raw() {
        let table = Table::from_raw(
            "Staff",
            raw(&["Name", " age ", "department"], &[&["Alice", " 31 ", " Sales"]]),
        )
        .unwrap();

        assert_eq!(table.name, "staff");
        assert_eq!(table.columns(), &["name", "age", "department"]);
        assert_eq!(table.row_count(), 1);
        assert_eq!(
            table.get_row(0),
            Some(&vec![
                Value::Text("Alice".into()),
                Value::Int(31),
                Value::Text("Sales".into()),
            ])
        );
    }

    #[test]
    fn test_empty_fields_are_null() {
        let raw_table = raw(&["id", "age"], &[&["1", ""], &["2", "  "]]);
        let table = Table::from_raw("t", raw_table).unwrap();
        assert_eq!(table.rows()[0], vec![Value::Int(1), Value::Null]);
        assert_eq!(table.rows()[1], vec![Value::Int(2), Value::Null]);
    }

    #[test]
    fn test_mixed_kinds_in_one_column() {
        let table = Table::from_raw("t", raw(&["v"], &[&["1"], &["1.5"], &["x"]])).unwrap();
        assert_eq!(table.rows()[0][0], Value::Int(1));
        assert_eq!(table.rows()[1][0], Value::Float(1.5));
        assert_eq!(table.rows()[2][0], Value::Text("x".into()));
    }

    #[test]
    fn test_column_count_mismatch() {
        let err = Table::from_raw("t", raw(&["id", "name"], &[&["1", "a"], &["2"]])).unwrap_err();
        assert!(matches!(
            err,
            Error::MalformedRow {
                expected_fields: 2,
                actual_fields: 1,
                row_index: 1,
            }
        ));

        // Too many fields
        let err = Table::from_raw("t", raw(&["id"], &[&["1", "2"]])).unwrap_err();
        assert!(matches!(err, Error::MalformedRow { actual_fields: 2, .. }));
    }

    #[test]
    fn test_duplicate_column() {
        let err = Table::from_raw("t", raw(&["id", "ID "], &[])).unwrap_err();
        assert!(matches!(err, Error::DuplicateColumn { ref name, .. } if name == "id"));
    }

    #[test]
    fn test_resolve_column() {
        let table = Table::from_raw("users", raw(&["id", "name"], &[])).unwrap();

        assert_eq!(table.column_index("id"), Some(0));
        assert_eq!(table.resolve_column("name").unwrap(), 1);
        assert!(matches!(
            table.resolve_column("age"),
            Err(Error::ColumnNotFound { ref name, ref table }) if name == "age" && table == "users"
        ));
    }
}
