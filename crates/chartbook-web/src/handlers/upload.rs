//! Upload form and CSV ingestion.

use axum::{
  extract::{Multipart, State},
  response::{Html, IntoResponse, Redirect, Response},
};
use bytes::Bytes;
use chartbook_core::store::TableStore;

use crate::{AppState, error::Error, handlers::html, render};

/// Multipart field carrying the file.
const FILE_FIELD: &str = "file";

/// `GET /upload`
pub async fn form() -> Html<String> { html("Upload CSV", &render::upload_form()) }

/// `POST /upload` — retain the raw file, parse it, replace the table, and
/// redirect to `/`.
pub async fn handler<S>(
  State(state): State<AppState<S>>,
  multipart: Multipart,
) -> Result<Response, Error>
where
  S: TableStore + Clone + Send + Sync + 'static,
{
  let (filename, body) = read_file_field(multipart).await?.ok_or(Error::NoFile)?;
  if filename.is_empty() {
    return Err(Error::NoFilename);
  }
  let name = retained_name(&filename)?;

  let path = state.config.upload_dir.join(name);
  tokio::fs::write(&path, &body).await?;

  let table = chartbook_csv::parse(&body)?;
  let columns = table.columns().len();
  let rows = state.store.replace(table).await.map_err(Error::store)?;

  tracing::info!(file = name, bytes = body.len(), rows, columns, "ingested upload");
  Ok(Redirect::to("/").into_response())
}

/// The first file part named [`FILE_FIELD`], as `(client filename, bytes)`.
///
/// Parts without a filename are form values, not files, and are skipped.
async fn read_file_field(
  mut multipart: Multipart,
) -> Result<Option<(String, Bytes)>, Error> {
  while let Some(field) = multipart.next_field().await? {
    if field.name() != Some(FILE_FIELD) {
      continue;
    }
    let Some(filename) = field.file_name().map(str::to_owned) else {
      continue;
    };
    let body = field.bytes().await?;
    return Ok(Some((filename, body)));
  }
  Ok(None)
}

/// Final path component of a client-supplied filename.
///
/// Both `/` and `\` count as separators so a Windows path cannot escape the
/// upload directory.
fn retained_name(filename: &str) -> Result<&str, Error> {
  let name = filename.rsplit(['/', '\\']).next().unwrap_or_default().trim();
  if name.is_empty() || name == "." || name == ".." {
    return Err(Error::BadRequest(format!("invalid file name: {filename:?}")));
  }
  Ok(name)
}
