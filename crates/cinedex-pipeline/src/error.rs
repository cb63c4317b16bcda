//! Error type for `cinedex-pipeline`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("core error: {0}")]
  Core(#[from] cinedex_core::Error),

  #[error("relational store error: {0}")]
  Store(#[from] cinedex_store_sqlite::Error),

  /// Includes the missing-collection guard: assembly against a document
  /// store that was never flattened fails here instead of producing an
  /// empty catalog.
  #[error("document store error: {0}")]
  Doc(#[from] cinedex_docstore::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
