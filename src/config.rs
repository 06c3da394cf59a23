/// Settings shared by the shell and the CSV row source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Field delimiter for loaded files.
    pub delimiter: u8,
    /// Refuse to load files whose name does not end in `.csv`.
    pub require_csv_extension: bool,
    /// Default verbosity of the shell's logger. `RUST_LOG` takes precedence.
    pub log_level: tracing::Level,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            delimiter: b',',
            require_csv_extension: true,
            log_level: tracing::Level::WARN,
        }
    }
}
