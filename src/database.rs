use tracing::debug;

use crate::{
    engine::{self, Output},
    error::Result,
    loader::{CsvSource, RowSource},
    parser::parse,
    store::TableStore,
    table::Table,
};

/// A query session: the loaded tables plus the source `LOAD` reads from.
///
/// This is the entry point used by the shell. It owns its [TableStore] and
/// lends it to the engine for the duration of each statement.
pub struct Database {
    store: TableStore,
    source: Box<dyn RowSource>,
}

impl Database {
    /// Creates an empty session that loads through `source`.
    pub fn new(source: impl RowSource + 'static) -> Self {
        Self {
            store: TableStore::new(),
            source: Box::new(source),
        }
    }

    /// Parses and executes one statement.
    ///
    /// # Errors
    /// Returns an error if parsing, loading, or execution fails. A failed
    /// statement leaves the loaded tables unchanged.
    ///
    /// # Example
    /// ```
    /// use memql::{Database, MemorySource, Output, RawTable, Value};
    ///
    /// let source = MemorySource::new().with_source(
    ///     "products.csv",
    ///     RawTable {
    ///         header: vec!["name".into(), "price".into()],
    ///         rows: vec![
    ///             vec!["Laptop".into(), "1200".into()],
    ///             vec!["Mouse".into(), "25".into()],
    ///         ],
    ///     },
    /// );
    /// let mut db = Database::new(source);
    /// db.run("LOAD products.csv AS products").unwrap();
    ///
    /// let output = db.run("SELECT name FROM products WHERE price < 100").unwrap();
    /// let Output::Rows(result) = output else {
    ///     panic!("expected rows");
    /// };
    /// assert_eq!(result.columns, vec!["name"]);
    /// assert_eq!(result.rows, vec![vec![Value::Text("Mouse".into())]]);
    /// ```
    pub fn run(&mut self, sql: &str) -> Result<Output> {
        let statement = parse(sql)?;
        debug!(?statement, "parsed statement");
        engine::execute(&statement, &mut self.store, self.source.as_ref())
    }

    /// Retrieves a loaded table by name, case-insensitively.
    pub fn table(&self, name: &str) -> Result<&Table> {
        self.store.get(name)
    }

    /// Returns a list of all table names currently loaded, sorted.
    pub fn list_tables(&self) -> Vec<&str> {
        self.store.list_tables()
    }

    pub fn store(&self) -> &TableStore {
        &self.store
    }
}

impl Default for Database {
    fn default() -> Self {
        Self::new(CsvSource::default())
    }
}
