//! [`SqliteStore`] — the SQLite implementation of [`TableStore`].

use std::path::Path;

use chartbook_core::{
  store::TableStore,
  table::{CATEGORY_COLUMN, Column, Table, VALUE_COLUMN},
  view::{CategoryCount, CategoryMean, Overview},
};
use rusqlite::types::Value;

use crate::{
  Error, Result,
  encode::{SqlCell, create_table_sql, decode_column, decode_value, insert_sql, quote_ident},
  schema::{DATA_TABLE, SCHEMA},
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// The Chartbook table store backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Check the preconditions shared by the grouped aggregates and return the
  /// quoted `category` identifier.
  async fn grouped_shape(&self, needs_value: bool) -> Result<String> {
    let Overview { columns, row_count } = self.overview().await?;
    if row_count == 0 {
      return Err(chartbook_core::Error::EmptyTable.into());
    }
    require_column(&columns, CATEGORY_COLUMN)?;
    if needs_value {
      let value = require_column(&columns, VALUE_COLUMN)?;
      if !value.ty.is_numeric() {
        return Err(chartbook_core::Error::NotNumeric(VALUE_COLUMN.to_owned()).into());
      }
    }
    Ok(quote_ident(CATEGORY_COLUMN))
  }
}

// ─── Connection helpers ──────────────────────────────────────────────────────

fn read_columns(conn: &rusqlite::Connection) -> rusqlite::Result<Vec<Column>> {
  let mut stmt = conn.prepare(&format!("PRAGMA table_info({})", quote_ident(DATA_TABLE)))?;
  stmt
    .query_map([], |row| {
      let name: String = row.get(1)?;
      let declared: String = row.get(2)?;
      Ok(decode_column(name, &declared))
    })?
    .collect()
}

fn count_rows(conn: &rusqlite::Connection) -> rusqlite::Result<usize> {
  conn.query_row(
    &format!("SELECT COUNT(*) FROM {}", quote_ident(DATA_TABLE)),
    [],
    |row| row.get(0),
  )
}

fn require_column<'a>(columns: &'a [Column], name: &str) -> Result<&'a Column> {
  columns
    .iter()
    .find(|c| c.name == name)
    .ok_or_else(|| chartbook_core::Error::MissingColumn(name.to_owned()).into())
}

// ─── TableStore impl ─────────────────────────────────────────────────────────

impl TableStore for SqliteStore {
  type Error = Error;

  async fn replace(&self, table: Table) -> Result<usize> {
    let (columns, rows) = table.into_parts();
    let drop = format!("DROP TABLE IF EXISTS {}", quote_ident(DATA_TABLE));
    let create = create_table_sql(DATA_TABLE, &columns);
    let insert = insert_sql(DATA_TABLE, &columns);
    let column_count = columns.len();

    let written = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        tx.execute(&drop, [])?;
        tx.execute(&create, [])?;
        {
          let mut stmt = tx.prepare(&insert)?;
          for row in &rows {
            stmt.execute(rusqlite::params_from_iter(row.iter().map(SqlCell)))?;
          }
        }
        tx.commit()?;
        Ok(rows.len())
      })
      .await?;

    tracing::debug!(rows = written, columns = column_count, "replaced data table");
    Ok(written)
  }

  async fn load(&self) -> Result<Table> {
    let (columns, raw_rows) = self
      .conn
      .call(|conn| {
        let columns = read_columns(conn)?;
        let mut stmt = conn.prepare(&format!(
          "SELECT * FROM {} ORDER BY rowid",
          quote_ident(DATA_TABLE)
        ))?;
        let width = stmt.column_count();
        let rows = stmt
          .query_map([], |row| {
            (0..width)
              .map(|i| row.get::<_, Value>(i))
              .collect::<rusqlite::Result<Vec<_>>>()
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok((columns, rows))
      })
      .await?;

    let rows = raw_rows
      .into_iter()
      .map(|row| row.into_iter().map(decode_value).collect())
      .collect();
    Ok(Table::new(columns, rows)?)
  }

  async fn columns(&self) -> Result<Vec<Column>> {
    Ok(self.conn.call(|conn| Ok(read_columns(conn)?)).await?)
  }

  async fn row_count(&self) -> Result<usize> {
    Ok(self.conn.call(|conn| Ok(count_rows(conn)?)).await?)
  }

  async fn overview(&self) -> Result<Overview> {
    let overview = self
      .conn
      .call(|conn| {
        let columns = read_columns(conn)?;
        let row_count = count_rows(conn)?;
        Ok(Overview { columns, row_count })
      })
      .await?;
    Ok(overview)
  }

  async fn category_means(&self) -> Result<Vec<CategoryMean>> {
    let category = self.grouped_shape(true).await?;
    let sql = format!(
      "SELECT {category}, AVG({value}) FROM {table} GROUP BY {category} ORDER BY {category}",
      value = quote_ident(VALUE_COLUMN),
      table = quote_ident(DATA_TABLE),
    );

    let raws: Vec<(Value, Option<f64>)> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
          .query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    if raws.iter().all(|(_, mean)| mean.is_none()) {
      return Err(chartbook_core::Error::EmptyTable.into());
    }
    Ok(
      raws
        .into_iter()
        .map(|(category, mean)| CategoryMean {
          category: decode_value(category).label(),
          mean,
        })
        .collect(),
    )
  }

  async fn category_counts(&self) -> Result<Vec<CategoryCount>> {
    let category = self.grouped_shape(false).await?;
    let sql = format!(
      "SELECT {category}, COUNT(*) FROM {table} GROUP BY {category} ORDER BY {category}",
      table = quote_ident(DATA_TABLE),
    );

    let raws: Vec<(Value, i64)> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
          .query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    Ok(
      raws
        .into_iter()
        .map(|(category, count)| CategoryCount {
          category: decode_value(category).label(),
          count:    count.unsigned_abs(),
        })
        .collect(),
    )
  }
}
