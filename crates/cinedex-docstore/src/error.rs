//! Error type for `cinedex-docstore`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("core error: {0}")]
  Core(#[from] cinedex_core::Error),

  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("json error: {0}")]
  Json(#[from] serde_json::Error),

  /// A read against a collection that was never created. Usually means a
  /// migration stage ran out of order.
  #[error("collection does not exist: {0}")]
  MissingCollection(String),

  /// Collection names become table names, so only `[a-z0-9_]` is allowed.
  #[error("invalid collection name: {0:?}")]
  InvalidCollectionName(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
