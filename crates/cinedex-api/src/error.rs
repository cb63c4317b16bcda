//! API error type and [`axum::response::IntoResponse`] implementation.

use axum::{
  Json,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error("not found: {0}")]
  NotFound(String),

  #[error("bad request: {0}")]
  BadRequest(String),

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let (status, message) = match &self {
      ApiError::NotFound(m) => (StatusCode::NOT_FOUND, m.clone()),
      ApiError::BadRequest(m) => (StatusCode::BAD_REQUEST, m.clone()),
      ApiError::Store(e) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
    };
    (status, Json(json!({ "error": message }))).into_response()
  }
}

impl From<cinedex_core::Error> for ApiError {
  fn from(err: cinedex_core::Error) -> Self {
    use cinedex_core::Error as E;
    match err {
      E::InvalidSortKey(_) | E::InvalidSortOrder(_) | E::InvalidPage(_) => {
        ApiError::BadRequest(err.to_string())
      }
      other => ApiError::Store(Box::new(other)),
    }
  }
}

impl From<cinedex_store_sqlite::Error> for ApiError {
  fn from(err: cinedex_store_sqlite::Error) -> Self {
    match err {
      cinedex_store_sqlite::Error::Core(core) => core.into(),
      other => ApiError::Store(Box::new(other)),
    }
  }
}

impl From<cinedex_docstore::Error> for ApiError {
  fn from(err: cinedex_docstore::Error) -> Self {
    match err {
      cinedex_docstore::Error::Core(core) => core.into(),
      other => ApiError::Store(Box::new(other)),
    }
  }
}
