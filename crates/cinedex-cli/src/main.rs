//! cinedex binary.
//!
//! Reads `config.toml` (or the path specified with `--config`) plus
//! `CINEDEX_*` environment overrides, and runs one of three stages:
//! `load` (CSV extract → relational store), `migrate` (resolution,
//! flattening, assembly → document store), `serve` (JSON API).

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use cinedex_api::ApiState;
use cinedex_docstore::DocStore;
use cinedex_loader::Loader;
use cinedex_pipeline::{AssembleOptions, JoinMode};
use cinedex_store_sqlite::SqliteStore;
use clap::{Parser, Subcommand};
use serde::Deserialize;
use tokio::net::TcpListener;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "Cinedex movie catalog")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "config.toml")]
  config: PathBuf,

  #[command(subcommand)]
  command: Command,
}

#[derive(Subcommand)]
enum Command {
  /// Import the CSV extract into the relational store.
  Load {
    /// Extract directory; overrides the configured one.
    #[arg(short, long)]
    dir: Option<PathBuf>,
  },
  /// Resolve titles, mirror the tables, and assemble the document catalog.
  Migrate {
    /// Keep movies with missing titles or ratings instead of dropping them.
    #[arg(long)]
    outer: bool,

    /// Cap the number of assembled documents (lowest movie ids win).
    #[arg(long)]
    limit: Option<usize>,
  },
  /// Serve the JSON API.
  Serve {
    /// Port override.
    #[arg(long)]
    port: Option<u16>,
  },
}

#[derive(Debug, Clone, Deserialize)]
struct AppConfig {
  #[serde(default = "default_store_path")]
  store_path:  PathBuf,
  #[serde(default = "default_docs_path")]
  docs_path:   PathBuf,
  #[serde(default = "default_extract_dir")]
  extract_dir: PathBuf,
  #[serde(default = "default_host")]
  host:        String,
  #[serde(default = "default_port")]
  port:        u16,
}

fn default_store_path() -> PathBuf {
  PathBuf::from("cinedex.db")
}
fn default_docs_path() -> PathBuf {
  PathBuf::from("cinedex-docs.db")
}
fn default_extract_dir() -> PathBuf {
  PathBuf::from("extract")
}
fn default_host() -> String {
  "127.0.0.1".to_owned()
}
fn default_port() -> u16 {
  8080
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
    .add_source(config::File::from(cli.config).required(false))
    .add_source(config::Environment::with_prefix("CINEDEX"))
    .build()
    .context("failed to read config file")?;
  let app_cfg: AppConfig = settings
    .try_deserialize()
    .context("failed to deserialise AppConfig")?;

  let store_path = expand_tilde(&app_cfg.store_path);
  let store = SqliteStore::open(&store_path)
    .await
    .with_context(|| format!("failed to open store at {store_path:?}"))?;

  match cli.command {
    Command::Load { dir } => {
      let dir = dir.unwrap_or_else(|| expand_tilde(&app_cfg.extract_dir));
      let reports = Loader::new(store, &dir)
        .run()
        .await
        .with_context(|| format!("failed to load extract from {dir:?}"))?;
      let inserted: usize = reports.iter().map(|r| r.inserted).sum();
      let skipped: usize = reports.iter().map(|r| r.skipped).sum();
      tracing::info!(inserted, skipped, "load finished");
    }
    Command::Migrate { outer, limit } => {
      let docs = open_docs(&app_cfg).await?;
      let report = cinedex_pipeline::resolve_titles(&store)
        .await
        .context("title resolution failed")?;
      anyhow::ensure!(
        report.violations == 0,
        "{} movies left with inconsistent title flags",
        report.violations,
      );
      cinedex_pipeline::flatten(&store, &docs)
        .await
        .context("flattening failed")?;
      let options = AssembleOptions {
        mode: if outer { JoinMode::Outer } else { JoinMode::Inner },
        limit,
      };
      let documents = cinedex_pipeline::assemble(&docs, &options)
        .await
        .context("assembly failed")?;
      tracing::info!(documents, "migration finished");
    }
    Command::Serve { port } => {
      let docs = open_docs(&app_cfg).await?;
      let app = cinedex_api::api_router(ApiState { store, docs });
      let address = format!("{}:{}", app_cfg.host, port.unwrap_or(app_cfg.port));

      tracing::info!("Listening on http://{address}");
      let listener = TcpListener::bind(&address)
        .await
        .with_context(|| format!("failed to bind {address}"))?;
      axum::serve(listener, app).await.context("server error")?;
    }
  }

  Ok(())
}

async fn open_docs(cfg: &AppConfig) -> anyhow::Result<DocStore> {
  let docs_path = expand_tilde(&cfg.docs_path);
  DocStore::open(&docs_path)
    .await
    .with_context(|| format!("failed to open document store at {docs_path:?}"))
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
