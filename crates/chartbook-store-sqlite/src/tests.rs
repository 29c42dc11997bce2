//! Integration tests for `SqliteStore` against an in-memory database.

use chartbook_core::{
  store::TableStore,
  table::{Cell, Column, ColumnType, Table},
};

use crate::{Error, SqliteStore};

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

fn csv(text: &str) -> Table { chartbook_csv::parse(text.as_bytes()).unwrap() }

fn core_err(err: Error) -> chartbook_core::Error {
  match err {
    Error::Core(e) => e,
    other => panic!("expected a core error, got {other:?}"),
  }
}

// ─── Startup schema ──────────────────────────────────────────────────────────

#[tokio::test]
async fn fresh_store_has_reference_shape() {
  let s = store().await;
  let columns = s.columns().await.unwrap();
  assert_eq!(
    columns,
    vec![
      Column::new("id", ColumnType::Integer),
      Column::new("name", ColumnType::Text),
      Column::new("value", ColumnType::Integer),
      Column::new("category", ColumnType::Text),
    ]
  );
  assert_eq!(s.row_count().await.unwrap(), 0);
  assert!(s.load().await.unwrap().is_empty());
}

#[tokio::test]
async fn reopening_a_file_keeps_the_table() {
  let dir = tempfile::tempdir().unwrap();
  let path = dir.path().join("data.db");

  let s = SqliteStore::open(&path).await.unwrap();
  s.replace(csv("name,value,category\na,1,x\nb,2,y\n")).await.unwrap();
  drop(s);

  let reopened = SqliteStore::open(&path).await.unwrap();
  assert_eq!(reopened.row_count().await.unwrap(), 2);
  let names: Vec<String> =
    reopened.columns().await.unwrap().into_iter().map(|c| c.name).collect();
  assert_eq!(names, vec!["name", "value", "category"]);
}

// ─── Replace ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn replace_writes_every_data_row() {
  let s = store().await;
  let written = s
    .replace(csv("name,value,category\na,1,x\nb,2,y\nc,3,x\nd,4,z\n"))
    .await
    .unwrap();
  assert_eq!(written, 4);
  assert_eq!(s.row_count().await.unwrap(), 4);
}

#[tokio::test]
async fn second_upload_replaces_the_first() {
  let s = store().await;
  s.replace(csv("name,value,category\na,1,x\nb,2,y\nc,3,x\n"))
    .await
    .unwrap();
  s.replace(csv("name,value,category\nz,9,q\n")).await.unwrap();

  let t = s.load().await.unwrap();
  assert_eq!(t.row_count(), 1);
  assert_eq!(t.rows()[0][0], Cell::Text("z".into()));
}

#[tokio::test]
async fn schema_follows_the_uploaded_file() {
  let s = store().await;
  s.replace(csv("height,label\n1.5,tall\n0.5,short\n")).await.unwrap();
  assert_eq!(
    s.columns().await.unwrap(),
    vec![
      Column::new("height", ColumnType::Real),
      Column::new("label", ColumnType::Text),
    ]
  );
}

#[tokio::test]
async fn load_preserves_order_and_nulls() {
  let s = store().await;
  let input = csv("name,value,category\nc,3,\na,,x\nb,2.5,y\n");
  s.replace(input.clone()).await.unwrap();
  assert_eq!(s.load().await.unwrap(), input);
}

#[tokio::test]
async fn failed_replace_keeps_the_previous_table() {
  let s = store().await;
  s.replace(csv("name,value,category\na,1,x\nb,2,y\n")).await.unwrap();

  // SQLite identifiers are case-insensitive, so CREATE TABLE fails inside
  // the transaction.
  let clashing = Table::new(
    vec![
      Column::new("v", ColumnType::Integer),
      Column::new("V", ColumnType::Integer),
    ],
    vec![vec![Cell::Integer(1), Cell::Integer(2)]],
  )
  .unwrap();
  assert!(matches!(s.replace(clashing).await, Err(Error::Database(_))));

  assert_eq!(s.row_count().await.unwrap(), 2);
  let names: Vec<String> =
    s.columns().await.unwrap().into_iter().map(|c| c.name).collect();
  assert_eq!(names, vec!["name", "value", "category"]);
}

#[tokio::test]
async fn overview_pairs_columns_with_row_count() {
  let s = store().await;
  s.replace(csv("height,label\n1.5,tall\n0.5,short\n2.0,tall\n"))
    .await
    .unwrap();
  let overview = s.overview().await.unwrap();
  assert_eq!(overview.row_count, 3);
  assert_eq!(overview.columns, s.columns().await.unwrap());
}

#[tokio::test]
async fn header_only_upload_empties_the_table() {
  let s = store().await;
  s.replace(csv("name,value,category\na,1,x\n")).await.unwrap();
  assert_eq!(s.replace(csv("name,value,category\n")).await.unwrap(), 0);
  assert_eq!(s.row_count().await.unwrap(), 0);
}

#[tokio::test]
async fn awkward_column_names_survive() {
  let s = store().await;
  s.replace(csv("\"a \"\"quoted\"\" name\",select\n1,2\n")).await.unwrap();
  let names: Vec<String> =
    s.columns().await.unwrap().into_iter().map(|c| c.name).collect();
  assert_eq!(names, vec!["a \"quoted\" name", "select"]);
}

// ─── Grouped aggregates ──────────────────────────────────────────────────────

#[tokio::test]
async fn bar_aggregate_averages_per_category() {
  let s = store().await;
  s.replace(csv("name,value,category\na,2,x\nb,4,x\nc,10,y\n"))
    .await
    .unwrap();
  let means = s.category_means().await.unwrap();
  assert_eq!(means.len(), 2);
  assert_eq!(means[0].category, "x");
  assert_eq!(means[0].mean, Some(3.0));
  assert_eq!(means[1].category, "y");
  assert_eq!(means[1].mean, Some(10.0));
}

#[tokio::test]
async fn pie_aggregate_counts_per_category() {
  let s = store().await;
  s.replace(csv("name,value,category\na,1,x\nb,2,y\nc,3,x\nd,4,y\ne,5,x\n"))
    .await
    .unwrap();
  let counts = s.category_counts().await.unwrap();
  let pairs: Vec<(&str, u64)> =
    counts.iter().map(|c| (c.category.as_str(), c.count)).collect();
  assert_eq!(pairs, vec![("x", 3), ("y", 2)]);
  assert_eq!(counts.iter().map(|c| c.count).sum::<u64>(), 5);
}

#[tokio::test]
async fn null_categories_form_their_own_group() {
  let s = store().await;
  s.replace(csv("value,category\n1,\n2,x\n")).await.unwrap();
  let counts = s.category_counts().await.unwrap();
  assert_eq!(counts[0].category, chartbook_core::table::NULL_LABEL);
}

#[tokio::test]
async fn aggregates_fail_on_empty_table() {
  let s = store().await;
  assert!(matches!(
    core_err(s.category_means().await.unwrap_err()),
    chartbook_core::Error::EmptyTable
  ));
  assert!(matches!(
    core_err(s.category_counts().await.unwrap_err()),
    chartbook_core::Error::EmptyTable
  ));
}

#[tokio::test]
async fn aggregates_fail_without_required_columns() {
  let s = store().await;
  s.replace(csv("name,score\na,1\n")).await.unwrap();
  match core_err(s.category_counts().await.unwrap_err()) {
    chartbook_core::Error::MissingColumn(c) => assert_eq!(c, "category"),
    other => panic!("unexpected: {other:?}"),
  }

  s.replace(csv("name,category\na,x\n")).await.unwrap();
  match core_err(s.category_means().await.unwrap_err()) {
    chartbook_core::Error::MissingColumn(c) => assert_eq!(c, "value"),
    other => panic!("unexpected: {other:?}"),
  }
}

#[tokio::test]
async fn bar_aggregate_rejects_text_values() {
  let s = store().await;
  s.replace(csv("value,category\nhigh,x\n")).await.unwrap();
  assert!(matches!(
    core_err(s.category_means().await.unwrap_err()),
    chartbook_core::Error::NotNumeric(_)
  ));
}
