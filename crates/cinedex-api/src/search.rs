//! Handlers for `/search/titles` and `/search/persons`.

use axum::{
  Json,
  extract::{Query, State},
};
use cinedex_core::query::{MovieSummary, Page};
use serde::Deserialize;

use crate::{ApiState, error::ApiError};

#[derive(Debug, Deserialize)]
pub struct SearchParams {
  /// Substring to search for; required.
  pub q:    String,
  pub page: Option<u32>,
}

/// `GET /search/titles?q=...[&page=...]`
pub async fn titles(
  State(state): State<ApiState>,
  Query(params): Query<SearchParams>,
) -> Result<Json<Page<MovieSummary>>, ApiError> {
  let page = state
    .store
    .search_by_title(&params.q, params.page.unwrap_or(1))
    .await?;
  Ok(Json(page))
}

/// `GET /search/persons?q=...[&page=...]`
pub async fn persons(
  State(state): State<ApiState>,
  Query(params): Query<SearchParams>,
) -> Result<Json<Page<MovieSummary>>, ApiError> {
  let page = state
    .store
    .search_by_person(&params.q, params.page.unwrap_or(1))
    .await?;
  Ok(Json(page))
}
