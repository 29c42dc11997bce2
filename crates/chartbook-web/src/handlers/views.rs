//! Chart and statistics pages.
//!
//! | Route | View | Embedding |
//! |-------|------|-----------|
//! | `/visualize`  | histogram  | image  |
//! | `/summary`    | statistics | table  |
//! | `/scatter`    | scatter    | image  |
//! | `/bar_chart`  | bar        | inline |
//! | `/line_chart` | line       | inline |
//! | `/box_plot`   | box        | inline |
//! | `/pie_chart`  | pie        | inline |
//! | `/heatmap`    | heatmap    | image  |

use axum::{extract::State, response::Html};
use chartbook_core::{store::TableStore, view};

use crate::{
  AppState, chart,
  error::Error,
  handlers::{html, load_table},
  render,
};

/// `GET /visualize`
pub async fn histogram<S>(
  State(state): State<AppState<S>>,
) -> Result<Html<String>, Error>
where
  S: TableStore + Clone + Send + Sync + 'static,
{
  let table = load_table(&state).await?;
  let svg = chart::histogram(&view::histogram(&table)?)?;
  Ok(html("Histogram of Values", &render::image(&svg, "Histogram of Values")))
}

/// `GET /summary`
pub async fn summary<S>(
  State(state): State<AppState<S>>,
) -> Result<Html<String>, Error>
where
  S: TableStore + Clone + Send + Sync + 'static,
{
  let table = load_table(&state).await?;
  let summary = view::summary(&table)?;
  Ok(html("Summary Statistics", &render::summary_table(&summary)))
}

/// `GET /scatter`
pub async fn scatter<S>(
  State(state): State<AppState<S>>,
) -> Result<Html<String>, Error>
where
  S: TableStore + Clone + Send + Sync + 'static,
{
  let table = load_table(&state).await?;
  let svg = chart::scatter(&view::scatter(&table)?)?;
  Ok(html("Scatter Plot of Values", &render::image(&svg, "Scatter Plot of Values")))
}

/// `GET /bar_chart`
pub async fn bar<S>(State(state): State<AppState<S>>) -> Result<Html<String>, Error>
where
  S: TableStore + Clone + Send + Sync + 'static,
{
  let means = state.store.category_means().await.map_err(Error::store)?;
  let svg = chart::bar(&means)?;
  Ok(html("Average Value per Category", &render::inline(&svg)))
}

/// `GET /line_chart`
pub async fn line<S>(State(state): State<AppState<S>>) -> Result<Html<String>, Error>
where
  S: TableStore + Clone + Send + Sync + 'static,
{
  let table = load_table(&state).await?;
  let svg = chart::line(&view::line(&table)?)?;
  Ok(html("Line Chart of Values", &render::inline(&svg)))
}

/// `GET /box_plot`
pub async fn box_plot<S>(
  State(state): State<AppState<S>>,
) -> Result<Html<String>, Error>
where
  S: TableStore + Clone + Send + Sync + 'static,
{
  let table = load_table(&state).await?;
  let svg = chart::box_plot(&view::box_plot(&table)?)?;
  Ok(html("Box Plot of Values by Category", &render::inline(&svg)))
}

/// `GET /pie_chart`
pub async fn pie<S>(State(state): State<AppState<S>>) -> Result<Html<String>, Error>
where
  S: TableStore + Clone + Send + Sync + 'static,
{
  let counts = state.store.category_counts().await.map_err(Error::store)?;
  let svg = chart::pie(&counts)?;
  Ok(html("Distribution of Categories", &render::inline(&svg)))
}

/// `GET /heatmap`
pub async fn heatmap<S>(
  State(state): State<AppState<S>>,
) -> Result<Html<String>, Error>
where
  S: TableStore + Clone + Send + Sync + 'static,
{
  let table = load_table(&state).await?;
  let svg = chart::heatmap(&view::correlation(&table)?)?;
  Ok(html("Heatmap of Correlations", &render::image(&svg, "Heatmap of Correlations")))
}
