use bitvec::prelude::*;
use tracing::debug;

use crate::ast::{CountTarget, Load, Predicate, Projection, Select, Statement};
use crate::error::Result;
use crate::loader::RowSource;
use crate::store::TableStore;
use crate::table::{Row, Table};

/// Represents the result of a successful `SELECT` returning rows.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryResult {
    /// The names of the columns included in the result set.
    pub columns: Vec<String>,
    /// The matching rows, each holding one [Value](crate::Value) per entry of `columns`.
    pub rows: Vec<Row>,
}

/// What a statement produced.
#[derive(Debug, Clone, PartialEq)]
pub enum Output {
    /// A `LOAD` succeeded.
    Loaded { table: String, row_count: usize },
    /// A `SELECT` with a column projection.
    Rows(QueryResult),
    /// A `SELECT COUNT(...)`.
    Count { label: String, value: usize },
}

/// Executes a parsed statement.
///
/// The engine keeps no state of its own: `LOAD` reads through `source` and
/// replaces a table in `store`, `SELECT` only reads `store`.
///
/// # Example
/// ```
/// use memql::{MemorySource, Output, RawTable, TableStore, execute, parse};
///
/// let source = MemorySource::new().with_source(
///     "staff.csv",
///     RawTable {
///         header: vec!["name".into(), "age".into()],
///         rows: vec![
///             vec!["Alice".into(), "31".into()],
///             vec!["Bob".into(), "25".into()],
///         ],
///     },
/// );
/// let mut store = TableStore::new();
///
/// execute(&parse("LOAD staff.csv AS staff").unwrap(), &mut store, &source).unwrap();
/// let output = execute(
///     &parse("SELECT COUNT(*) FROM staff WHERE age > 30").unwrap(),
///     &mut store,
///     &source,
/// )
/// .unwrap();
///
/// assert!(matches!(output, Output::Count { value: 1, .. }));
/// ```
pub fn execute(
    statement: &Statement,
    store: &mut TableStore,
    source: &dyn RowSource,
) -> Result<Output> {
    match statement {
        Statement::Load(load) => execute_load(load, store, source),
        Statement::Select(select) => execute_select(select, store),
    }
}

fn execute_load(load: &Load, store: &mut TableStore, source: &dyn RowSource) -> Result<Output> {
    debug!(source = %load.source, table = %load.table, "executing LOAD");
    let raw = source.read(&load.source)?;
    let table = store.load(&load.table, raw)?;

    Ok(Output::Loaded {
        table: table.name.clone(),
        row_count: table.row_count(),
    })
}

/// Executes a `SELECT` against `store`.
///
/// Column references are all resolved before any row is read, so a
/// misspelled column is reported even on an empty table. Rows are then
/// filtered in their original order and projected or counted.
///
/// # Errors
/// - [Error::TableNotFound](crate::Error::TableNotFound) if the table was never loaded.
/// - [Error::ColumnNotFound](crate::Error::ColumnNotFound) naming the first
///   unknown column, predicate column first.
/// - [Error::TypeMismatch](crate::Error::TypeMismatch) if the predicate
///   compares incompatible kinds on some row.
pub fn execute_select(select: &Select, store: &TableStore) -> Result<Output> {
    let table = store.get(&select.table)?;

    let predicate = match &select.predicate {
        Some(predicate) => Some((table.resolve_column(&predicate.column)?, predicate)),
        None => None,
    };

    match &select.projection {
        Projection::Count(target) => {
            let count_col = match target {
                CountTarget::Star => None,
                CountTarget::Column(name) => Some(table.resolve_column(name)?),
            };

            let selection = filter_rows(table, predicate)?;
            let value = match count_col {
                None => selection.count_ones(),
                Some(idx) => selection
                    .iter_ones()
                    .filter(|&row| !table.rows()[row][idx].is_null())
                    .count(),
            };

            debug!(table = %table.name, value, "count");
            Ok(Output::Count {
                label: count_label(target),
                value,
            })
        }
        Projection::Star => {
            let selection = filter_rows(table, predicate)?;
            let rows = selection
                .iter_ones()
                .map(|row| table.rows()[row].clone())
                .collect();

            Ok(Output::Rows(QueryResult {
                columns: table.columns().to_vec(),
                rows,
            }))
        }
        Projection::Columns(names) => {
            let indices = names
                .iter()
                .map(|name| table.resolve_column(name))
                .collect::<Result<Vec<usize>>>()?;

            let selection = filter_rows(table, predicate)?;
            let rows: Vec<Row> = selection
                .iter_ones()
                .map(|row| {
                    let full_row = &table.rows()[row];
                    indices.iter().map(|&idx| full_row[idx].clone()).collect()
                })
                .collect();

            debug!(table = %table.name, columns = indices.len(), rows = rows.len(), "projection");
            Ok(Output::Rows(QueryResult {
                columns: names.clone(),
                rows,
            }))
        }
    }
}

/// Evaluates the predicate against every row of `table`.
///
/// Returns one bit per row, set when the row is kept. Without a predicate
/// every bit is set. Stops at the first row whose comparison fails.
fn filter_rows(table: &Table, predicate: Option<(usize, &Predicate)>) -> Result<BitVec> {
    let Some((col_idx, predicate)) = predicate else {
        return Ok(bitvec![1; table.row_count()]);
    };

    let mut selection = BitVec::with_capacity(table.row_count());
    for row in table.rows() {
        selection.push(row[col_idx].compare(predicate.op, &predicate.literal)?);
    }

    debug!(
        table = %table.name,
        kept = selection.count_ones(),
        scanned = selection.len(),
        "filter"
    );
    Ok(selection)
}

fn count_label(target: &CountTarget) -> String {
    match target {
        CountTarget::Star => "count".to_string(),
        CountTarget::Column(name) => format!("count({name})"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;
    use crate::ast::ComparisonOp;
    use crate::data_type::DataType;
    use crate::loader::MemorySource;
    use crate::parser::parse;
    use crate::table::RawTable;
    use crate::value::Value;

    fn staff_source() -> MemorySource {
        let rows = [
            ["Alice", " 31 ", " Sales"],
            ["Bob", "25", "Support"],
            ["Carol", "42", "sales"],
            ["Dave", "", "Sales"],
            ["Erin", "30.5", "Support"],
        ];
        MemorySource::new().with_source(
            "staff.csv",
            RawTable {
                header: vec!["name".into(), "age".into(), "department".into()],
                rows: rows
                    .iter()
                    .map(|row| row.iter().map(|s| s.to_string()).collect())
                    .collect(),
            },
        )
    }

    fn loaded_store() -> (TableStore, MemorySource) {
        let source = staff_source();
        let mut store = TableStore::new();
        execute(&parse("LOAD staff.csv AS staff").unwrap(), &mut store, &source).unwrap();
        (store, source)
    }

    fn run(store: &mut TableStore, source: &MemorySource, sql: &str) -> Result<Output> {
        execute(&parse(sql).unwrap(), store, source)
    }

    fn rows(output: Output) -> QueryResult {
        match output {
            Output::Rows(result) => result,
            other => panic!("Expected rows, got {other:?}"),
        }
    }

    fn count(output: Output) -> usize {
        match output {
            Output::Count { value, .. } => value,
            other => panic!("Expected count, got {other:?}"),
        }
    }

    #[test]
    fn test_load() {
        let source = staff_source();
        let mut store = TableStore::new();

        let output = run(&mut store, &source, "LOAD staff.csv AS Staff").unwrap();
        assert_eq!(
            output,
            Output::Loaded {
                table: "staff".into(),
                row_count: 5,
            }
        );

        let table = store.get("staff").unwrap();
        assert_eq!(table.columns(), &["name", "age", "department"]);
        assert_eq!(
            table.rows()[0],
            vec![
                Value::Text("Alice".into()),
                Value::Int(31),
                Value::Text("Sales".into()),
            ]
        );
    }

    #[test]
    fn test_load_unknown_source() {
        let source = staff_source();
        let mut store = TableStore::new();

        let err = run(&mut store, &source, "LOAD other.csv AS other").unwrap_err();
        assert!(matches!(err, Error::SourceNotFound { .. }));
        assert!(store.is_empty());
    }

    #[test]
    fn test_load_twice_is_idempotent() {
        let (mut store, source) = loaded_store();
        let before = store.get("staff").unwrap().clone();

        run(&mut store, &source, "LOAD staff.csv AS staff").unwrap();

        assert_eq!(store.len(), 1);
        assert_eq!(store.get("staff").unwrap(), &before);
    }

    #[test]
    fn test_select_star() {
        let (mut store, source) = loaded_store();
        let result = rows(run(&mut store, &source, "SELECT * FROM staff").unwrap());

        assert_eq!(result.columns, vec!["name", "age", "department"]);
        assert_eq!(result.rows.len(), 5);
        assert_eq!(result.rows[3][1], Value::Null);
        assert_eq!(result.rows[4][1], Value::Float(30.5));
    }

    #[test]
    fn test_select_columns_in_requested_order() {
        let (mut store, source) = loaded_store();
        let result = rows(run(&mut store, &source, "SELECT department, NAME FROM staff").unwrap());

        assert_eq!(result.columns, vec!["department", "name"]);
        assert_eq!(
            result.rows[1],
            vec![Value::Text("Support".into()), Value::Text("Bob".into())]
        );
    }

    #[test]
    fn test_where_ordering_against_null_is_mismatch() {
        let (mut store, source) = loaded_store();
        let err = run(&mut store, &source, "SELECT name FROM staff WHERE age > 30").unwrap_err();

        // Dave has no age: ordering against NULL is a mismatch
        assert!(matches!(
            err,
            Error::TypeMismatch {
                left: DataType::Null,
                right: DataType::Int,
                operator: ComparisonOp::Gt,
            }
        ));
    }

    #[test]
    fn test_where_numeric_promotion_preserves_order() {
        let source = MemorySource::new().with_source(
            "n.csv",
            RawTable {
                header: vec!["name".into(), "age".into()],
                rows: vec![
                    vec!["Alice".into(), "31".into()],
                    vec!["Bob".into(), "25".into()],
                    vec!["Carol".into(), "42".into()],
                    vec!["Erin".into(), "30.5".into()],
                ],
            },
        );
        let mut store = TableStore::new();
        run(&mut store, &source, "LOAD n.csv AS people").unwrap();

        let result =
            rows(run(&mut store, &source, "SELECT name FROM people WHERE age > 30").unwrap());
        assert_eq!(
            result.rows,
            vec![
                vec![Value::Text("Alice".into())],
                vec![Value::Text("Carol".into())],
                vec![Value::Text("Erin".into())],
            ]
        );

        let result =
            rows(run(&mut store, &source, "SELECT name FROM people WHERE age <= 30.5").unwrap());
        assert_eq!(
            result.rows,
            vec![vec![Value::Text("Bob".into())], vec![Value::Text("Erin".into())]]
        );
    }

    #[test]
    fn test_where_text_is_case_sensitive() {
        let (mut store, source) = loaded_store();
        let result = rows(
            run(&mut store, &source, "SELECT name FROM staff WHERE department = 'Sales'").unwrap(),
        );

        assert_eq!(
            result.rows,
            vec![vec![Value::Text("Alice".into())], vec![Value::Text("Dave".into())]]
        );
    }

    #[test]
    fn test_where_null_equality() {
        let (mut store, source) = loaded_store();

        let result =
            rows(run(&mut store, &source, "SELECT name FROM staff WHERE age = NULL").unwrap());
        assert_eq!(result.rows, vec![vec![Value::Text("Dave".into())]]);

        let output = run(&mut store, &source, "SELECT COUNT(*) FROM staff WHERE age != NULL");
        let n = count(output.unwrap());
        assert_eq!(n, 4);
    }

    #[test]
    fn test_count() {
        let (mut store, source) = loaded_store();

        let mut count_of = |sql: &str| count(run(&mut store, &source, sql).unwrap());

        assert_eq!(count_of("SELECT COUNT(*) FROM staff"), 5);
        assert_eq!(count_of("SELECT COUNT(*) FROM staff WHERE department = 'Support'"), 2);
        assert_eq!(count_of("SELECT COUNT(*) FROM staff WHERE name = 'Nobody'"), 0);
    }

    #[test]
    fn test_count_column_skips_nulls() {
        let (mut store, source) = loaded_store();
        let output = run(&mut store, &source, "SELECT COUNT(age) FROM staff").unwrap();

        assert_eq!(
            output,
            Output::Count {
                label: "count(age)".into(),
                value: 4,
            }
        );
    }

    #[test]
    fn test_count_type_mismatch() {
        let (mut store, source) = loaded_store();
        let err = run(&mut store, &source, "SELECT COUNT(*) FROM staff WHERE age = 'thirty'")
            .unwrap_err();

        assert!(matches!(
            err,
            Error::TypeMismatch {
                left: DataType::Int,
                right: DataType::Text,
                operator: ComparisonOp::Eq,
            }
        ));
    }

    #[test]
    fn test_table_not_found() {
        let (mut store, source) = loaded_store();
        let err = run(&mut store, &source, "SELECT * FROM missing").unwrap_err();

        assert!(matches!(err, Error::TableNotFound { ref name } if name == "missing"));
    }

    #[test]
    fn test_column_not_found() {
        let (mut store, source) = loaded_store();

        let err = run(&mut store, &source, "SELECT dept FROM staff").unwrap_err();
        assert!(matches!(
            err,
            Error::ColumnNotFound { ref name, ref table } if name == "dept" && table == "staff"
        ));

        let err = run(&mut store, &source, "SELECT name FROM staff WHERE dept = 'x'").unwrap_err();
        assert!(matches!(err, Error::ColumnNotFound { ref name, .. } if name == "dept"));

        let err = run(&mut store, &source, "SELECT COUNT(dept) FROM staff").unwrap_err();
        assert!(matches!(err, Error::ColumnNotFound { ref name, .. } if name == "dept"));
    }

    #[test]
    fn test_column_not_found_names_first_missing() {
        let (mut store, source) = loaded_store();
        let err = run(&mut store, &source, "SELECT name, foo, bar FROM staff").unwrap_err();

        assert!(matches!(err, Error::ColumnNotFound { ref name, .. } if name == "foo"));
    }

    #[test]
    fn test_column_not_found_on_empty_result() {
        let source = MemorySource::new().with_source(
            "empty.csv",
            RawTable {
                header: vec!["id".into()],
                rows: vec![],
            },
        );
        let mut store = TableStore::new();
        run(&mut store, &source, "LOAD empty.csv AS empty").unwrap();

        let err = run(&mut store, &source, "SELECT * FROM empty WHERE nope = 1").unwrap_err();
        assert!(matches!(err, Error::ColumnNotFound { .. }));

        let n =
            count(run(&mut store, &source, "SELECT COUNT(*) FROM empty WHERE id = 'x'").unwrap());
        assert_eq!(n, 0);
    }

    #[test]
    fn test_keyword_named_columns() {
        let source = MemorySource::new().with_source(
            "inv.csv",
            RawTable {
                header: vec!["item".into(), "count".into(), "as".into()],
                rows: vec![
                    vec!["bolt".into(), "12".into(), "x".into()],
                    vec!["nut".into(), "3".into(), "y".into()],
                    vec!["gear".into(), "0".into(), "z".into()],
                ],
            },
        );
        let mut store = TableStore::new();
        run(&mut store, &source, "LOAD inv.csv AS inv").unwrap();

        let result = rows(run(&mut store, &source, "SELECT count, as FROM inv").unwrap());
        assert_eq!(result.columns, vec!["count", "as"]);
        assert_eq!(result.rows[0], vec![Value::Int(12), Value::Text("x".into())]);

        let result =
            rows(run(&mut store, &source, "SELECT item FROM inv WHERE count > 5").unwrap());
        assert_eq!(result.rows, vec![vec![Value::Text("bolt".into())]]);

        let result =
            rows(run(&mut store, &source, "SELECT item FROM inv WHERE count >= 1e0").unwrap());
        assert_eq!(result.rows.len(), 2);

        let output = run(&mut store, &source, "SELECT COUNT(count) FROM inv").unwrap();
        assert_eq!(
            output,
            Output::Count {
                label: "count(count)".into(),
                value: 3,
            }
        );
    }
}
