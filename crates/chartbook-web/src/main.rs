//! chartbook server binary.
//!
//! Reads `config.toml` (or the path specified with `--config`) and
//! `CHARTBOOK_*` environment variables, opens the SQLite store, and serves
//! the HTML pages and JSON API over HTTP.

use std::{
  path::{Path, PathBuf},
  sync::Arc,
};

use anyhow::Context as _;
use chartbook_store_sqlite::SqliteStore;
use chartbook_web::{AppState, ServerConfig};
use clap::Parser;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "Chartbook CSV charting server")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "config.toml")]
  config: PathBuf,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  // Initialise tracing.
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();

  // Load configuration.
  let settings = config::Config::builder()
    .set_default("host", "127.0.0.1")?
    .set_default("port", 5000_i64)?
    .set_default("database_path", "data.db")?
    .set_default("upload_dir", "uploads")?
    .set_default("max_upload_bytes", 16_i64 * 1024 * 1024)?
    .add_source(config::File::from(cli.config).required(false))
    .add_source(config::Environment::with_prefix("CHARTBOOK"))
    .build()
    .context("failed to read config file")?;

  let mut server_cfg: ServerConfig = settings
    .try_deserialize()
    .context("failed to deserialise ServerConfig")?;
  server_cfg.database_path = expand_tilde(&server_cfg.database_path);
  server_cfg.upload_dir = expand_tilde(&server_cfg.upload_dir);

  tokio::fs::create_dir_all(&server_cfg.upload_dir)
    .await
    .with_context(|| format!("failed to create upload dir {:?}", server_cfg.upload_dir))?;

  let store = SqliteStore::open(&server_cfg.database_path)
    .await
    .with_context(|| format!("failed to open store at {:?}", server_cfg.database_path))?;

  let state = AppState {
    store:  Arc::new(store),
    config: Arc::new(server_cfg.clone()),
  };

  let app = chartbook_web::router(state).layer(TraceLayer::new_for_http());
  let address = format!("{}:{}", server_cfg.host, server_cfg.port);

  tracing::info!("Listening on http://{address}");
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, app).await.context("server error")?;

  Ok(())
}

/// Expand a leading `~` to the user's home directory.
fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}
