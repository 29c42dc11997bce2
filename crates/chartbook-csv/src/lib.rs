//! CSV decoder for Chartbook.
//!
//! Turns comma-delimited text into a typed [`Table`]. Pure synchronous; no
//! HTTP or database dependencies.
//!
//! # Quick start
//!
//! ```no_run
//! let table = chartbook_csv::parse(b"name,value\nalpha,1\n").unwrap();
//! println!("{} rows, {} columns", table.row_count(), table.columns().len());
//! ```

pub mod error;
mod infer;
mod parse;

pub use error::{Error, Result};
use chartbook_core::table::Table;

/// Parse a CSV document whose first record is the header.
///
/// Column types are inferred from the data cells; missing-value markers
/// (empty fields, `NA`, `NaN`, `null`, ...) become nulls.
pub fn parse(input: &[u8]) -> Result<Table> { parse::parse_table(input) }
