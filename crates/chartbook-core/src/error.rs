//! Error types for `chartbook-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("table is empty")]
  EmptyTable,

  #[error("required column {0:?} is absent")]
  MissingColumn(String),

  #[error("column {0:?} is not numeric")]
  NotNumeric(String),

  #[error("column {0:?} has non-finite values")]
  NonFinite(String),

  #[error("table has no numeric columns")]
  NoNumericColumns,

  #[error("table has no columns")]
  NoColumns,

  #[error("row {row} has {found} cells, expected {expected}")]
  RowWidth {
    row:      usize,
    expected: usize,
    found:    usize,
  },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
