//! HTML front end for Chartbook.
//!
//! Exposes an axum [`Router`] serving the upload form, the landing page and
//! one page per chart, backed by any [`TableStore`]. The JSON API from
//! `chartbook-api` is mounted under `/api`.

pub mod chart;
pub mod error;
pub mod handlers;
pub mod render;

pub use error::Error;

use std::{path::PathBuf, sync::Arc};

use axum::{Router, extract::DefaultBodyLimit, routing::get};
use chartbook_core::store::TableStore;
use serde::Deserialize;

use handlers::{index, upload, views};

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml` and
/// `CHARTBOOK_*` environment variables.
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
  pub host:             String,
  pub port:             u16,
  pub database_path:    PathBuf,
  pub upload_dir:       PathBuf,
  pub max_upload_bytes: usize,
}

// ─── Application state ────────────────────────────────────────────────────────

/// Shared state threaded through all axum handlers.
#[derive(Clone)]
pub struct AppState<S: TableStore> {
  pub store:  Arc<S>,
  pub config: Arc<ServerConfig>,
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build the application router: HTML pages plus the JSON API under `/api`.
pub fn router<S>(state: AppState<S>) -> Router
where
  S: TableStore + Clone + Send + Sync + 'static,
{
  let api = chartbook_api::api_router(state.store.clone());
  let limit = state.config.max_upload_bytes;

  Router::new()
    .route("/",           get(index::handler::<S>))
    .route("/upload",     get(upload::form).post(upload::handler::<S>))
    .route("/visualize",  get(views::histogram::<S>))
    .route("/summary",    get(views::summary::<S>))
    .route("/scatter",    get(views::scatter::<S>))
    .route("/bar_chart",  get(views::bar::<S>))
    .route("/line_chart", get(views::line::<S>))
    .route("/box_plot",   get(views::box_plot::<S>))
    .route("/pie_chart",  get(views::pie::<S>))
    .route("/heatmap",    get(views::heatmap::<S>))
    .with_state(state)
    .nest("/api", api)
    .layer(DefaultBodyLimit::max(limit))
}

// ─── Integration tests ────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use super::*;

  use axum::{
    body::Body,
    http::{Request, StatusCode, header},
    response::Response,
  };
  use chartbook_store_sqlite::SqliteStore;
  use tempfile::TempDir;
  use tower::ServiceExt as _;

  const BOUNDARY: &str = "chartbook-test-boundary";
  const SAMPLE: &str = "name,value,category\na,1,x\nb,2,y\nc,3,x\nd,4,y\ne,5,x\n";

  /// State over an in-memory store; the upload directory lives as long as
  /// the returned `TempDir`.
  async fn make_state(max_upload_bytes: usize) -> (AppState<SqliteStore>, TempDir) {
    let dir   = tempfile::tempdir().unwrap();
    let store = SqliteStore::open_in_memory().await.unwrap();
    let state = AppState {
      store:  Arc::new(store),
      config: Arc::new(ServerConfig {
        host:             "127.0.0.1".to_string(),
        port:             5000,
        database_path:    PathBuf::from(":memory:"),
        upload_dir:       dir.path().to_path_buf(),
        max_upload_bytes,
      }),
    };
    (state, dir)
  }

  fn multipart(field: &str, filename: Option<&str>, content: &str) -> Body {
    let disposition = match filename {
      Some(f) => format!("form-data; name=\"{field}\"; filename=\"{f}\""),
      None    => format!("form-data; name=\"{field}\""),
    };
    Body::from(format!(
      "--{BOUNDARY}\r\nContent-Disposition: {disposition}\r\n\
       Content-Type: text/csv\r\n\r\n{content}\r\n--{BOUNDARY}--\r\n"
    ))
  }

  async fn post_upload(state: AppState<SqliteStore>, body: Body) -> Response {
    let req = Request::builder()
      .method("POST")
      .uri("/upload")
      .header(
        header::CONTENT_TYPE,
        format!("multipart/form-data; boundary={BOUNDARY}"),
      )
      .body(body)
      .unwrap();
    router(state).oneshot(req).await.unwrap()
  }

  async fn upload(state: AppState<SqliteStore>, filename: &str, content: &str) -> Response {
    post_upload(state, multipart("file", Some(filename), content)).await
  }

  async fn get(state: AppState<SqliteStore>, uri: &str) -> Response {
    let req = Request::builder().uri(uri).body(Body::empty()).unwrap();
    router(state).oneshot(req).await.unwrap()
  }

  async fn text(resp: Response) -> String {
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
  }

  // ── Upload ──────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn upload_redirects_home_and_replaces_table() {
    let (state, _dir) = make_state(1 << 20).await;
    let resp = upload(state.clone(), "data.csv", SAMPLE).await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(resp.headers()[header::LOCATION], "/");
    assert_eq!(state.store.row_count().await.unwrap(), 5);

    let home = text(get(state, "/").await).await;
    assert!(home.contains("5 rows"), "{home}");
  }

  #[tokio::test]
  async fn upload_retains_the_raw_file() {
    let (state, dir) = make_state(1 << 20).await;
    upload(state, "../sneaky.csv", SAMPLE).await;
    let kept = std::fs::read_to_string(dir.path().join("sneaky.csv")).unwrap();
    assert_eq!(kept, SAMPLE);
  }

  #[tokio::test]
  async fn second_upload_replaces_first() {
    let (state, _dir) = make_state(1 << 20).await;
    upload(state.clone(), "a.csv", SAMPLE).await;
    upload(state.clone(), "b.csv", "height,label\n1.5,tall\n").await;
    assert_eq!(state.store.row_count().await.unwrap(), 1);
    let names: Vec<String> =
      state.store.columns().await.unwrap().into_iter().map(|c| c.name).collect();
    assert_eq!(names, vec!["height", "label"]);
  }

  #[tokio::test]
  async fn upload_without_file_part_is_400() {
    let (state, _dir) = make_state(1 << 20).await;
    let resp = post_upload(state, multipart("comment", None, "hello")).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(text(resp).await, "No file uploaded");
  }

  #[tokio::test]
  async fn upload_with_empty_filename_is_400() {
    let (state, _dir) = make_state(1 << 20).await;
    let resp = upload(state, "", SAMPLE).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(text(resp).await, "No selected file");
  }

  #[tokio::test]
  async fn malformed_csv_is_500_and_keeps_previous_table() {
    let (state, _dir) = make_state(1 << 20).await;
    upload(state.clone(), "good.csv", SAMPLE).await;
    let resp = upload(state.clone(), "bad.csv", "a,b\n1,2\n3,4,5\n").await;
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(state.store.row_count().await.unwrap(), 5);
  }

  #[tokio::test]
  async fn oversized_upload_is_rejected() {
    let (state, _dir) = make_state(64).await;
    let big = format!("name,value,category\n{}", "a,1,x\n".repeat(100));
    let resp = upload(state.clone(), "big.csv", &big).await;
    assert_eq!(resp.status(), StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(state.store.row_count().await.unwrap(), 0);
  }

  #[tokio::test]
  async fn upload_form_is_served() {
    let (state, _dir) = make_state(1 << 20).await;
    let resp = get(state, "/upload").await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(text(resp).await.contains("enctype=\"multipart/form-data\""));
  }

  // ── Views ───────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn every_view_renders_after_upload() {
    let (state, _dir) = make_state(1 << 20).await;
    upload(state.clone(), "data.csv", SAMPLE).await;

    let images = ["/visualize", "/scatter", "/heatmap"];
    let inline = ["/bar_chart", "/line_chart", "/box_plot", "/pie_chart"];
    for uri in images {
      let resp = get(state.clone(), uri).await;
      assert_eq!(resp.status(), StatusCode::OK, "{uri}");
      assert!(text(resp).await.contains("data:image/svg+xml;base64,"), "{uri}");
    }
    for uri in inline {
      let resp = get(state.clone(), uri).await;
      assert_eq!(resp.status(), StatusCode::OK, "{uri}");
      assert!(text(resp).await.contains("<svg"), "{uri}");
    }

    let summary = text(get(state, "/summary").await).await;
    assert!(summary.contains("<tr><th>count</th><td>5.000000</td></tr>"), "{summary}");
    assert!(summary.contains("<tr><th>mean</th><td>3.000000</td></tr>"), "{summary}");
  }

  #[tokio::test]
  async fn views_on_empty_table_are_500() {
    let (state, _dir) = make_state(1 << 20).await;
    for uri in [
      "/visualize", "/summary", "/scatter", "/bar_chart",
      "/line_chart", "/box_plot", "/pie_chart", "/heatmap",
    ] {
      let resp = get(state.clone(), uri).await;
      assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR, "{uri}");
    }
  }

  #[tokio::test]
  async fn histogram_of_infinite_values_is_500() {
    let (state, _dir) = make_state(1 << 20).await;
    upload(state.clone(), "inf.csv", "name,value,category\na,1,x\nb,inf,x\nc,2,y\n").await;
    assert_eq!(state.store.row_count().await.unwrap(), 3);
    let resp = get(state, "/visualize").await;
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
  }

  #[tokio::test]
  async fn home_prompts_for_upload_when_empty() {
    let (state, _dir) = make_state(1 << 20).await;
    let resp = get(state, "/").await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(text(resp).await.contains("Upload a CSV file"));
  }

  // ── API ─────────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn api_is_mounted_under_prefix() {
    let (state, _dir) = make_state(1 << 20).await;
    upload(state.clone(), "data.csv", SAMPLE).await;

    let bar: serde_json::Value =
      serde_json::from_str(&text(get(state.clone(), "/api/bar").await).await).unwrap();
    assert_eq!(bar[0]["category"], "x");
    assert_eq!(bar[0]["mean"], 3.0);

    let pie: serde_json::Value =
      serde_json::from_str(&text(get(state, "/api/pie").await).await).unwrap();
    assert_eq!(pie[0]["count"], 3);
    assert_eq!(pie[1]["count"], 2);
  }
}
