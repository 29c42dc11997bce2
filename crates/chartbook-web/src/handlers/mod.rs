pub mod index;
pub mod upload;
pub mod views;

use axum::response::Html;
use chartbook_core::{store::TableStore, table::Table};

use crate::{AppState, error::Error, render};

pub(super) fn html(title: &str, body: &str) -> Html<String> {
  Html(render::page(title, body))
}

/// Read the whole backing table.
pub(super) async fn load_table<S>(state: &AppState<S>) -> Result<Table, Error>
where
  S: TableStore + Clone + Send + Sync + 'static,
{
  state.store.load().await.map_err(Error::store)
}
