//! A small in-memory query engine over delimited text files.
//!
//! Tables are loaded with `LOAD <file> AS <table>` and queried with a
//! single-table `SELECT ... FROM ... [WHERE col <op> literal]`, including
//! `COUNT(*)`. Cells are typed at load time as integer, float, text or
//! null.

pub mod ast;
pub mod config;
pub mod data_type;
pub mod database;
pub mod engine;
pub mod error;
pub mod loader;
pub mod logging;
pub mod parser;
pub mod result_format;
pub mod store;
pub mod table;
pub mod tokenizer;
pub mod value;

pub use config::Config;
pub use data_type::DataType;
pub use database::Database;
pub use engine::{Output, QueryResult, execute};
pub use error::{Error, Result, SyntaxError};
pub use loader::{CsvSource, MemorySource, RowSource};
pub use parser::parse;
pub use store::TableStore;
pub use table::{RawTable, Row, Table};
pub use value::Value;
