//! Handlers for the view endpoints.
//!
//! | Method | Path | Body |
//! |--------|------|------|
//! | `GET`  | `/table` | columns and row count |
//! | `GET`  | `/histogram` | bin edges and counts |
//! | `GET`  | `/summary` | per-column statistics |
//! | `GET`  | `/scatter` | `[{index, value, category}]` |
//! | `GET`  | `/line` | `[{index, value}]` |
//! | `GET`  | `/bar` | `[{category, mean}]` |
//! | `GET`  | `/box` | per-category box statistics |
//! | `GET`  | `/pie` | `[{category, count}]` |
//! | `GET`  | `/heatmap` | correlation matrix |

use std::sync::Arc;

use axum::{Json, extract::State};
use chartbook_core::{
  store::TableStore,
  table::Table,
  view::{
    self, BoxStats, CategoryCount, CategoryMean, Correlation, Histogram,
    LinePoint, Overview, ScatterPoint, Summary,
  },
};

use crate::error::ApiError;

async fn load<S: TableStore>(store: &S) -> Result<Table, ApiError> {
  store.load().await.map_err(|e| ApiError::Store(Box::new(e)))
}

/// `GET /table`
pub async fn table<S: TableStore>(
  State(store): State<Arc<S>>,
) -> Result<Json<Overview>, ApiError> {
  let overview = store
    .overview()
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok(Json(overview))
}

/// `GET /histogram`
pub async fn histogram<S: TableStore>(
  State(store): State<Arc<S>>,
) -> Result<Json<Histogram>, ApiError> {
  Ok(Json(view::histogram(&load(&*store).await?)?))
}

/// `GET /summary`
pub async fn summary<S: TableStore>(
  State(store): State<Arc<S>>,
) -> Result<Json<Summary>, ApiError> {
  Ok(Json(view::summary(&load(&*store).await?)?))
}

/// `GET /scatter`
pub async fn scatter<S: TableStore>(
  State(store): State<Arc<S>>,
) -> Result<Json<Vec<ScatterPoint>>, ApiError> {
  Ok(Json(view::scatter(&load(&*store).await?)?))
}

/// `GET /line`
pub async fn line<S: TableStore>(
  State(store): State<Arc<S>>,
) -> Result<Json<Vec<LinePoint>>, ApiError> {
  Ok(Json(view::line(&load(&*store).await?)?))
}

/// `GET /bar`
pub async fn bar<S: TableStore>(
  State(store): State<Arc<S>>,
) -> Result<Json<Vec<CategoryMean>>, ApiError> {
  let means = store
    .category_means()
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok(Json(means))
}

/// `GET /box`
pub async fn box_plot<S: TableStore>(
  State(store): State<Arc<S>>,
) -> Result<Json<Vec<BoxStats>>, ApiError> {
  Ok(Json(view::box_plot(&load(&*store).await?)?))
}

/// `GET /pie`
pub async fn pie<S: TableStore>(
  State(store): State<Arc<S>>,
) -> Result<Json<Vec<CategoryCount>>, ApiError> {
  let counts = store
    .category_counts()
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok(Json(counts))
}

/// `GET /heatmap`
pub async fn heatmap<S: TableStore>(
  State(store): State<Arc<S>>,
) -> Result<Json<Correlation>, ApiError> {
  Ok(Json(view::correlation(&load(&*store).await?)?))
}
