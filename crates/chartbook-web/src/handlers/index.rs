//! Landing page.

use axum::{extract::State, response::Html};
use chartbook_core::store::TableStore;

use crate::{AppState, error::Error, handlers::html, render};

/// `GET /` — current table shape, or an upload prompt when it is empty.
pub async fn handler<S>(
  State(state): State<AppState<S>>,
) -> Result<Html<String>, Error>
where
  S: TableStore + Clone + Send + Sync + 'static,
{
  let overview = state.store.overview().await.map_err(Error::store)?;
  Ok(html("Chartbook", &render::overview(&overview)))
}
