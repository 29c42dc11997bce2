//! Error types for the chartbook-csv decoder.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("no columns to parse from file")]
  Empty,

  #[error("line {line}: expected {expected} fields, saw {found}")]
  RaggedRecord {
    line:     u64,
    expected: usize,
    found:    usize,
  },

  #[error("csv error: {0}")]
  Csv(#[from] csv::Error),

  #[error("table error: {0}")]
  Table(#[from] chartbook_core::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
