//! Error types and axum `IntoResponse` implementation.

use axum::{
  extract::multipart::MultipartError,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("No file uploaded")]
  NoFile,
  #[error("No selected file")]
  NoFilename,
  #[error("bad request: {0}")]
  BadRequest(String),
  #[error("multipart error: {0}")]
  Multipart(#[from] MultipartError),
  #[error("ingestion error: {0}")]
  Ingest(#[from] chartbook_csv::Error),
  #[error("view error: {0}")]
  View(#[from] chartbook_core::Error),
  #[error("io error: {0}")]
  Io(#[from] std::io::Error),
  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl Error {
  pub fn store(e: impl std::error::Error + Send + Sync + 'static) -> Self {
    Error::Store(Box::new(e))
  }
}

impl IntoResponse for Error {
  fn into_response(self) -> Response {
    match self {
      Error::NoFile | Error::NoFilename => {
        (StatusCode::BAD_REQUEST, self.to_string()).into_response()
      }
      Error::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg).into_response(),
      Error::Multipart(e) => (e.status(), e.body_text()).into_response(),
      other => {
        tracing::error!(error = %other, "request failed");
        (StatusCode::INTERNAL_SERVER_ERROR, other.to_string()).into_response()
      }
    }
  }
}
