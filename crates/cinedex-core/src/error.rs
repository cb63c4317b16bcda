//! Error types for `cinedex-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  /// A sort-key string from an untyped boundary (CLI flag, query parameter)
  /// did not name a known [`crate::query::SortKey`].
  #[error("unknown sort key: {0:?}")]
  InvalidSortKey(String),

  #[error("unknown sort order: {0:?}")]
  InvalidSortOrder(String),

  /// Pages are 1-based; page 0 is rejected rather than silently clamped.
  #[error("invalid page number: {0} (pages are 1-based)")]
  InvalidPage(u32),

  #[error("serialization error: {0}")]
  Serialization(#[from] serde_json::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
