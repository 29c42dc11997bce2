//! The tabular data model: [`Table`], [`Column`], [`ColumnType`] and
//! [`Cell`].
//!
//! A table is a rectangular grid of cells under a list of typed columns.
//! Column order is header order; row order is insertion order.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Column holding the plotted measurement.
pub const VALUE_COLUMN: &str = "value";

/// Column holding the grouping key.
pub const CATEGORY_COLUMN: &str = "category";

/// Label used for a null category cell.
pub const NULL_LABEL: &str = "(none)";

// ─── Column types ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnType {
  Integer,
  Real,
  Text,
}

impl ColumnType {
  /// The SQL type declared for a column of this type.
  pub fn sql_type(self) -> &'static str {
    match self {
      ColumnType::Integer => "INTEGER",
      ColumnType::Real => "REAL",
      ColumnType::Text => "TEXT",
    }
  }

  /// Map a declared SQL type back to a column type using SQLite's affinity
  /// rules.
  pub fn from_declared(declared: &str) -> Self {
    let upper = declared.to_ascii_uppercase();
    if upper.contains("INT") {
      ColumnType::Integer
    } else if upper.contains("REAL")
      || upper.contains("FLOA")
      || upper.contains("DOUB")
    {
      ColumnType::Real
    } else {
      ColumnType::Text
    }
  }

  pub fn is_numeric(self) -> bool {
    matches!(self, ColumnType::Integer | ColumnType::Real)
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Column {
  pub name: String,
  #[serde(rename = "type")]
  pub ty:   ColumnType,
}

impl Column {
  pub fn new(name: impl Into<String>, ty: ColumnType) -> Self {
    Self { name: name.into(), ty }
  }
}

// ─── Cells ────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
  Null,
  Integer(i64),
  Real(f64),
  Text(String),
}

impl Cell {
  pub fn is_null(&self) -> bool { matches!(self, Cell::Null) }

  /// Numeric value of the cell; `None` for null and text cells.
  pub fn as_f64(&self) -> Option<f64> {
    match self {
      Cell::Integer(i) => Some(*i as f64),
      Cell::Real(r) => Some(*r),
      Cell::Null | Cell::Text(_) => None,
    }
  }

  /// Grouping label of the cell when used as a category.
  pub fn label(&self) -> String {
    match self {
      Cell::Null => NULL_LABEL.to_owned(),
      other => other.to_string(),
    }
  }
}

impl fmt::Display for Cell {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Cell::Null => Ok(()),
      Cell::Integer(i) => write!(f, "{i}"),
      Cell::Real(r) => write!(f, "{r}"),
      Cell::Text(s) => f.write_str(s),
    }
  }
}

// ─── Table ────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub struct Table {
  columns: Vec<Column>,
  rows:    Vec<Vec<Cell>>,
}

impl Table {
  /// Build a table, checking that every row has one cell per column.
  pub fn new(columns: Vec<Column>, rows: Vec<Vec<Cell>>) -> Result<Self> {
    if columns.is_empty() {
      return Err(Error::NoColumns);
    }
    if let Some((row, cells)) =
      rows.iter().enumerate().find(|(_, r)| r.len() != columns.len())
    {
      return Err(Error::RowWidth {
        row,
        expected: columns.len(),
        found: cells.len(),
      });
    }
    Ok(Self { columns, rows })
  }

  pub fn columns(&self) -> &[Column] { &self.columns }

  pub fn rows(&self) -> &[Vec<Cell>] { &self.rows }

  pub fn into_parts(self) -> (Vec<Column>, Vec<Vec<Cell>>) {
    (self.columns, self.rows)
  }

  pub fn row_count(&self) -> usize { self.rows.len() }

  pub fn is_empty(&self) -> bool { self.rows.is_empty() }

  pub fn column_index(&self, name: &str) -> Option<usize> {
    self.columns.iter().position(|c| c.name == name)
  }

  /// Fail with [`Error::EmptyTable`] when the table has no rows.
  pub fn require_rows(&self) -> Result<()> {
    if self.is_empty() {
      Err(Error::EmptyTable)
    } else {
      Ok(())
    }
  }

  /// Per-row numeric values of column `name`; nulls are `None`.
  pub fn numeric_values(&self, name: &str) -> Result<Vec<Option<f64>>> {
    let idx = self
      .column_index(name)
      .ok_or_else(|| Error::MissingColumn(name.to_owned()))?;
    if !self.columns[idx].ty.is_numeric() {
      return Err(Error::NotNumeric(name.to_owned()));
    }
    Ok(self.rows.iter().map(|r| r[idx].as_f64()).collect())
  }

  /// Per-row category labels of column `name`.
  pub fn labels(&self, name: &str) -> Result<Vec<String>> {
    let idx = self
      .column_index(name)
      .ok_or_else(|| Error::MissingColumn(name.to_owned()))?;
    Ok(self.rows.iter().map(|r| r[idx].label()).collect())
  }

  /// The numeric columns, in table order.
  pub fn numeric_columns(&self) -> impl Iterator<Item = (usize, &Column)> {
    self
      .columns
      .iter()
      .enumerate()
      .filter(|(_, c)| c.ty.is_numeric())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn sample() -> Table {
    Table::new(
      vec![
        Column::new("name", ColumnType::Text),
        Column::new("value", ColumnType::Integer),
        Column::new("category", ColumnType::Text),
      ],
      vec![
        vec![Cell::Text("a".into()), Cell::Integer(1), Cell::Text("x".into())],
        vec![Cell::Text("b".into()), Cell::Null, Cell::Null],
      ],
    )
    .unwrap()
  }

  #[test]
  fn rejects_ragged_rows() {
    let err = Table::new(
      vec![Column::new("a", ColumnType::Text)],
      vec![vec![Cell::Null, Cell::Null]],
    )
    .unwrap_err();
    assert!(matches!(err, Error::RowWidth { row: 0, expected: 1, found: 2 }));
  }

  #[test]
  fn rejects_zero_columns() {
    assert!(matches!(Table::new(vec![], vec![]), Err(Error::NoColumns)));
  }

  #[test]
  fn numeric_values_keep_nulls() {
    let t = sample();
    assert_eq!(t.numeric_values("value").unwrap(), vec![Some(1.0), None]);
  }

  #[test]
  fn numeric_values_of_text_column_fail() {
    let t = sample();
    assert!(matches!(t.numeric_values("name"), Err(Error::NotNumeric(_))));
  }

  #[test]
  fn missing_column_is_reported_by_name() {
    let t = sample();
    match t.labels("colour") {
      Err(Error::MissingColumn(name)) => assert_eq!(name, "colour"),
      other => panic!("unexpected: {other:?}"),
    }
  }

  #[test]
  fn null_category_gets_placeholder_label() {
    let t = sample();
    assert_eq!(t.labels("category").unwrap(), vec!["x", NULL_LABEL]);
  }

  #[test]
  fn declared_types_follow_affinity() {
    assert_eq!(ColumnType::from_declared("BIGINT"), ColumnType::Integer);
    assert_eq!(ColumnType::from_declared("double precision"), ColumnType::Real);
    assert_eq!(ColumnType::from_declared("FLOAT"), ColumnType::Real);
    assert_eq!(ColumnType::from_declared("VARCHAR(20)"), ColumnType::Text);
    assert_eq!(ColumnType::from_declared(""), ColumnType::Text);
  }
}
