use std::collections::HashMap;

use tracing::info;

use crate::error::{Error, Result};
use crate::table::{RawTable, Table};

/// The named tables of one session.
///
/// Only successful loads mutate the store. The store has no internal
/// locking: a host sharing it between threads must serialize access.
#[derive(Debug, Default)]
pub struct TableStore {
    /// Tables keyed by lowercase name.
    tables: HashMap<String, Table>,
}

impl TableStore {
    /// Creates a new, empty store.
    pub fn new() -> Self {
        Self {
            tables: HashMap::default(),
        }
    }

    /// Builds a table from raw text and inserts it under its normalized
    /// name, replacing any table previously loaded under that name.
    ///
    /// On error the store is left unchanged.
    ///
    /// # Example
    /// ```
    /// use memql::{RawTable, TableStore, Value};
    ///
    /// let mut store = TableStore::new();
    /// let raw = RawTable {
    ///     header: vec!["name".into(), "age".into()],
    ///     rows: vec![vec!["Alice".into(), " 31 ".into()]],
    /// };
    /// store.load("Staff", raw).unwrap();
    ///
    /// let table = store.get("STAFF").unwrap();
    /// assert_eq!(table.rows()[0][1], Value::Int(31));
    /// ```
    pub fn load(&mut self, name: &str, raw: RawTable) -> Result<&Table> {
        let table = Table::from_raw(name, raw)?;
        let key = table.name.clone();

        if self.tables.contains_key(&key) {
            info!(table = %key, rows = table.row_count(), "replacing loaded table");
        } else {
            info!(table = %key, rows = table.row_count(), "loaded table");
        }

        self.tables.insert(key.clone(), table);
        self.get(&key)
    }

    /// Case-insensitive lookup.
    ///
    /// # Errors
    /// Returns [Error::TableNotFound] if no table was loaded under `name`.
    pub fn get(&self, name: &str) -> Result<&Table> {
        let key = name.trim().to_lowercase();
        self.tables
            .get(&key)
            .ok_or(Error::TableNotFound { name: key })
    }

    pub fn contains(&self, name: &str) -> bool {
        self.tables.contains_key(&name.trim().to_lowercase())
    }

    /// Returns the names of all loaded tables, sorted.
    pub fn list_tables(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.tables.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}
