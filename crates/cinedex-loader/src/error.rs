//! Error type for `cinedex-loader`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  /// A missing or malformed extract file. The loader stops at the first
  /// one; partial entities are never committed.
  #[error("csv error: {0}")]
  Csv(#[from] csv::Error),

  #[error("store error: {0}")]
  Store(#[from] cinedex_store_sqlite::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
