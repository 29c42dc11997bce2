//! The `TableStore` trait.
//!
//! The trait is implemented by storage backends (e.g.
//! `chartbook-store-sqlite`). The HTML and JSON surfaces depend on this
//! abstraction, not on any concrete backend.

use std::future::Future;

use crate::{
  table::{Column, Table},
  view::{CategoryCount, CategoryMean, Overview},
};

/// Abstraction over the single backing table.
///
/// The table is replaced wholesale by [`TableStore::replace`] and is
/// otherwise read-only.
///
/// All methods return `Send` futures so the trait can be used in
/// multi-threaded async runtimes (e.g. tokio with `axum`).
pub trait TableStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Discard the current table (schema and rows) and persist `table` in its
  /// place. Returns the number of rows written.
  fn replace(
    &self,
    table: Table,
  ) -> impl Future<Output = Result<usize, Self::Error>> + Send + '_;

  /// Read the whole table in insertion order.
  fn load(&self) -> impl Future<Output = Result<Table, Self::Error>> + Send + '_;

  /// The current columns, in table order.
  fn columns(
    &self,
  ) -> impl Future<Output = Result<Vec<Column>, Self::Error>> + Send + '_;

  fn row_count(&self) -> impl Future<Output = Result<usize, Self::Error>> + Send + '_;

  /// Columns and row count, read together so a concurrent
  /// [`TableStore::replace`] is never half-observed.
  fn overview(
    &self,
  ) -> impl Future<Output = Result<Overview, Self::Error>> + Send + '_;

  /// Mean `value` grouped by `category`, ordered by category.
  fn category_means(
    &self,
  ) -> impl Future<Output = Result<Vec<CategoryMean>, Self::Error>> + Send + '_;

  /// Row count grouped by `category`, ordered by category.
  fn category_counts(
    &self,
  ) -> impl Future<Output = Result<Vec<CategoryCount>, Self::Error>> + Send + '_;
}
