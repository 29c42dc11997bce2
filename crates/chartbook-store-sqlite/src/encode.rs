//! Conversions between [`Cell`]s and SQLite values, plus identifier quoting.

use chartbook_core::table::{Cell, Column, ColumnType};
use rusqlite::{
  ToSql,
  types::{ToSqlOutput, Value, ValueRef},
};

// ─── Cells ────────────────────────────────────────────────────────────────────

/// Borrowing [`ToSql`] adapter for a [`Cell`].
pub struct SqlCell<'a>(pub &'a Cell);

impl ToSql for SqlCell<'_> {
  fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
    Ok(match self.0 {
      Cell::Null => ToSqlOutput::Borrowed(ValueRef::Null),
      Cell::Integer(i) => ToSqlOutput::Borrowed(ValueRef::Integer(*i)),
      Cell::Real(r) => ToSqlOutput::Borrowed(ValueRef::Real(*r)),
      Cell::Text(s) => ToSqlOutput::Borrowed(ValueRef::Text(s.as_bytes())),
    })
  }
}

pub fn decode_value(value: Value) -> Cell {
  match value {
    Value::Null => Cell::Null,
    Value::Integer(i) => Cell::Integer(i),
    Value::Real(r) => Cell::Real(r),
    Value::Text(s) => Cell::Text(s),
    Value::Blob(b) => Cell::Text(String::from_utf8_lossy(&b).into_owned()),
  }
}

// ─── Identifiers ──────────────────────────────────────────────────────────────

/// Quote an identifier for use in SQL text.
pub fn quote_ident(name: &str) -> String {
  format!("\"{}\"", name.replace('"', "\"\""))
}

pub fn create_table_sql(table: &str, columns: &[Column]) -> String {
  let defs: Vec<String> = columns
    .iter()
    .map(|c| format!("{} {}", quote_ident(&c.name), c.ty.sql_type()))
    .collect();
  format!("CREATE TABLE {} ({})", quote_ident(table), defs.join(", "))
}

pub fn insert_sql(table: &str, columns: &[Column]) -> String {
  let names: Vec<String> = columns.iter().map(|c| quote_ident(&c.name)).collect();
  let slots: Vec<String> = (1..=columns.len()).map(|i| format!("?{i}")).collect();
  format!(
    "INSERT INTO {} ({}) VALUES ({})",
    quote_ident(table),
    names.join(", "),
    slots.join(", ")
  )
}

/// A column as reported by `PRAGMA table_info`.
pub fn decode_column(name: String, declared: &str) -> Column {
  Column::new(name, ColumnType::from_declared(declared))
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn quotes_are_doubled() {
    assert_eq!(quote_ident("we\"ird"), "\"we\"\"ird\"");
  }

  #[test]
  fn create_statement_lists_typed_columns() {
    let sql = create_table_sql(
      "data",
      &[
        Column::new("name", ColumnType::Text),
        Column::new("value", ColumnType::Real),
      ],
    );
    assert_eq!(sql, "CREATE TABLE \"data\" (\"name\" TEXT, \"value\" REAL)");
  }

  #[test]
  fn insert_statement_numbers_placeholders() {
    let sql = insert_sql(
      "data",
      &[
        Column::new("a", ColumnType::Integer),
        Column::new("b", ColumnType::Integer),
      ],
    );
    assert_eq!(sql, "INSERT INTO \"data\" (\"a\", \"b\") VALUES (?1, ?2)");
  }
}
