use std::collections::HashMap;
use std::fs::File;
use std::path::Path;

use tracing::debug;

use crate::config::Config;
use crate::error::{Error, Result};
use crate::table::RawTable;

/// Produces the header and data rows of a named source.
///
/// This is how `LOAD` reaches the outside world: the engine hands the
/// source name from the statement to a `RowSource` and never touches the
/// file system itself.
pub trait RowSource {
    fn read(&self, source: &str) -> Result<RawTable>;
}

/// Reads delimited text files with the [csv] crate.
///
/// Fields are passed through untrimmed; trimming and typing happen at
/// ingestion. Rows with a field count different from the header are
/// passed through as well so that ingestion can report them as malformed.
#[derive(Debug, Clone)]
pub struct CsvSource {
    delimiter: u8,
    require_csv_extension: bool,
}

impl CsvSource {
    pub fn new(config: &Config) -> Self {
        Self {
            delimiter: config.delimiter,
            require_csv_extension: config.require_csv_extension,
        }
    }
}

impl Default for CsvSource {
    fn default() -> Self {
        Self::new(&Config::default())
    }
}

impl RowSource for CsvSource {
    fn read(&self, source: &str) -> Result<RawTable> {
        let path = Path::new(source);

        let is_csv = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"));
        if self.require_csv_extension && !is_csv {
            return Err(Error::UnsupportedSource { path: path.into() });
        }

        let file = File::open(path).map_err(|err| match err.kind() {
            std::io::ErrorKind::NotFound => Error::SourceNotFound { path: path.into() },
            _ => Error::Io {
                path: path.into(),
                source: err,
            },
        })?;

        let mut reader = csv::ReaderBuilder::new()
            .delimiter(self.delimiter)
            .has_headers(true)
            .flexible(true)
            .from_reader(file);

        let header: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();

        let mut rows = Vec::new();
        for record in reader.records() {
            rows.push(record?.iter().map(str::to_string).collect::<Vec<_>>());
        }

        if header.is_empty() || rows.is_empty() {
            return Err(Error::EmptySource { path: path.into() });
        }

        debug!(path = %path.display(), rows = rows.len(), "read csv source");
        Ok(RawTable { header, rows })
    }
}

/// Sources kept in memory, keyed by the exact name used in `LOAD`.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    sources: HashMap<String, RawTable>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `raw` under `name`, replacing any previous entry.
    pub fn with_source(mut self, name: impl Into<String>, raw: RawTable) -> Self {
        self.insert(name, raw);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, raw: RawTable) {
        self.sources.insert(name.into(), raw);
    }
}

impl RowSource for MemorySource {
    fn read(&self, source: &str) -> Result<RawTable> {
        self.sources
            .get(source)
            .cloned()
            .ok_or_else(|| Error::SourceNotFound { path: source.into() })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn csv_file(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new()
            .suffix(".csv")
            .tempfile()
            .unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    fn path_of(file: &tempfile::NamedTempFile) -> &str {
        file.path().to_str().unwrap()
    }

    #[test]
    fn test_read_csv() {
        let file = csv_file("name,age,department\nAlice, 31 , Sales\nBob,25,Support\n");
        let raw = CsvSource::default().read(path_of(&file)).unwrap();

        assert_eq!(raw.header, vec!["name", "age", "department"]);
        assert_eq!(raw.rows.len(), 2);
        // Fields are not trimmed at this stage
        assert_eq!(raw.rows[0], vec!["Alice", " 31 ", " Sales"]);
    }

    #[test]
    fn test_read_ragged_rows() {
        let file = csv_file("a,b\n1,2\n3\n");
        let raw = CsvSource::default().read(path_of(&file)).unwrap();
        assert_eq!(raw.rows[1], vec!["3"]);
    }

    #[test]
    fn test_custom_delimiter() {
        let file = csv_file("a;b\n1;2\n");
        let config = Config {
            delimiter: b';',
            ..Config::default()
        };
        let raw = CsvSource::new(&config).read(path_of(&file)).unwrap();
        assert_eq!(raw.header, vec!["a", "b"]);
        assert_eq!(raw.rows[0], vec!["1", "2"]);
    }

    #[test]
    fn test_header_only_is_empty_source() {
        let file = csv_file("a,b\n");
        let err = CsvSource::default().read(path_of(&file)).unwrap_err();
        assert!(matches!(err, Error::EmptySource { .. }));
    }

    #[test]
    fn test_missing_file() {
        let err = CsvSource::default().read("no/such/file.csv").unwrap_err();
        assert!(matches!(err, Error::SourceNotFound { .. }));
    }

    #[test]
    fn test_extension_check() {
        let mut file = tempfile::Builder::new().suffix(".txt").tempfile().unwrap();
        file.write_all(b"a\n1\n").unwrap();
        let path = file.path().to_str().unwrap();

        let err = CsvSource::default().read(path).unwrap_err();
        assert!(matches!(err, Error::UnsupportedSource { .. }));

        let config = Config {
            require_csv_extension: false,
            ..Config::default()
        };
        assert!(CsvSource::new(&config).read(path).is_ok());
    }

    #[test]
    fn test_memory_source() {
        let raw = RawTable {
            header: vec!["id".into()],
            rows: vec![vec!["1".into()]],
        };
        let source = MemorySource::new().with_source("ids", raw.clone());

        assert_eq!(source.read("ids").unwrap(), raw);
        assert!(matches!(
            source.read("other"),
            Err(Error::SourceNotFound { .. })
        ));
    }
}
