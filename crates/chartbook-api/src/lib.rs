//! JSON REST API for Chartbook.
//!
//! Exposes an axum [`Router`] backed by any [`chartbook_core::store::TableStore`].
//! Every endpoint returns the data behind one HTML view.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", chartbook_api::api_router(store.clone()))
//! ```

pub mod error;
pub mod views;

use std::sync::Arc;

use axum::{Router, routing::get};
use chartbook_core::store::TableStore;

pub use error::ApiError;

/// Build the API router for `store`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(store: Arc<S>) -> Router<()>
where
  S: TableStore + 'static,
{
  Router::new()
    .route("/table", get(views::table::<S>))
    .route("/histogram", get(views::histogram::<S>))
    .route("/summary", get(views::summary::<S>))
    .route("/scatter", get(views::scatter::<S>))
    .route("/line", get(views::line::<S>))
    .route("/bar", get(views::bar::<S>))
    .route("/box", get(views::box_plot::<S>))
    .route("/pie", get(views::pie::<S>))
    .route("/heatmap", get(views::heatmap::<S>))
    .with_state(store)
}
