//! SQL schema for the Chartbook SQLite store.
//!
//! Executed once at connection startup. Uploads drop and recreate the data
//! table with the uploaded file's own columns, so this shape only holds until
//! the first upload.

/// Name of the single backing table.
pub const DATA_TABLE: &str = "data";

/// Startup DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;

CREATE TABLE IF NOT EXISTS data (
    id       INTEGER PRIMARY KEY AUTOINCREMENT,
    name     TEXT,
    value    INTEGER,
    category TEXT
);
";
