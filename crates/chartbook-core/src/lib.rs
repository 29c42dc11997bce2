//! Core types and view computations for Chartbook.
//!
//! This crate is deliberately free of HTTP and database dependencies.
//! Storage backends implement [`store::TableStore`]; the HTML and JSON
//! surfaces turn a loaded [`table::Table`] into views with [`view`].

pub mod error;
pub mod stats;
pub mod store;
pub mod table;
pub mod view;

pub use error::{Error, Result};
