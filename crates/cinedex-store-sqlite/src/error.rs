//! Error type for `cinedex-store-sqlite`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("core error: {0}")]
  Core(#[from] cinedex_core::Error),

  /// A connection or engine level failure. The entity transaction in
  /// flight is rolled back; nothing is committed for it.
  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
