use std::io::{self, BufRead, Write};
use std::process::ExitCode;

use clap::Parser;
use memql::{Config, CsvSource, Database, logging};
use tracing::debug;

#[derive(Parser)]
#[command(name = "memql", about = "Query CSV files with a small SQL subset")]
struct Arguments {
    /// Statements to execute in order.
    ///
    /// If omitted, an interactive session will be started.
    #[arg(trailing_var_arg = true)]
    queries: Vec<String>,

    /// Field delimiter of loaded files.
    #[arg(long, env = "MEMQL_DELIMITER", default_value_t = ',')]
    delimiter: char,

    /// Load files regardless of their extension.
    #[arg(long, env = "MEMQL_ALLOW_ANY_EXTENSION")]
    allow_any_extension: bool,

    /// Log level used when RUST_LOG is not set.
    #[arg(long, env = "MEMQL_LOG", default_value = "warn")]
    log_level: tracing::Level,
}

impl Arguments {
    fn config(&self) -> Result<Config, String> {
        if !self.delimiter.is_ascii() {
            return Err(format!("delimiter {:?} is not an ASCII character", self.delimiter));
        }
        Ok(Config {
            delimiter: self.delimiter as u8,
            require_csv_extension: !self.allow_any_extension,
            log_level: self.log_level,
        })
    }
}

fn main() -> ExitCode {
    let args = Arguments::parse();
    let config = match args.config() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("ERROR: {e}");
            return ExitCode::FAILURE;
        }
    };
    logging::configure_global_logger(config.log_level);

    let mut db = Database::new(CsvSource::new(&config));

    if args.queries.is_empty() {
        return match interactive(&mut db) {
            Ok(()) => ExitCode::SUCCESS,
            Err(e) => {
                eprintln!("ERROR: {e}");
                ExitCode::FAILURE
            }
        };
    }

    for query in &args.queries {
        match db.run(query) {
            Ok(output) => println!("{output}"),
            Err(e) => {
                eprintln!("ERROR: {e}");
                return ExitCode::FAILURE;
            }
        }
    }
    ExitCode::SUCCESS
}

/// Read-eval-print loop over stdin. Statement errors are printed and the
/// loop continues; only I/O errors on the terminal end it.
fn interactive(db: &mut Database) -> io::Result<()> {
    let stdin = io::stdin();
    let mut stdout = io::stdout();

    println!("Welcome to memql.");
    println!("Commands: LOAD <filename> AS <table_name>, SELECT ... FROM ...");
    println!("Type 'exit' or 'quit' to close the session.");

    let mut lines = stdin.lock().lines();
    loop {
        write!(stdout, "\nmemql> ")?;
        stdout.flush()?;

        let Some(line) = lines.next().transpose()? else {
            println!();
            return Ok(());
        };
        let line = line.trim();

        if line.is_empty() {
            continue;
        }
        if line.eq_ignore_ascii_case("exit") || line.eq_ignore_ascii_case("quit") {
            println!("Goodbye!");
            return Ok(());
        }

        match db.run(line) {
            Ok(output) => println!("{output}"),
            Err(e) => {
                debug!(error = %e, "statement failed");
                println!("Error: {e}");
            }
        }
    }
}
