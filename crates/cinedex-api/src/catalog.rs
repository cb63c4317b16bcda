//! Handlers for the catalog summary endpoints.

use axum::{
  Json,
  extract::{Query, State},
};
use cinedex_core::query::{CatalogStats, MovieSummary, RankedMovie};
use serde::Deserialize;

use crate::{ApiState, error::ApiError};

#[derive(Debug, Deserialize, Default)]
pub struct SampleParams {
  pub n: Option<u32>,
}

/// `GET /stats`
pub async fn stats(
  State(state): State<ApiState>,
) -> Result<Json<CatalogStats>, ApiError> {
  Ok(Json(state.store.basic_stats().await?))
}

/// `GET /genres`
pub async fn genres(
  State(state): State<ApiState>,
) -> Result<Json<Vec<String>>, ApiError> {
  Ok(Json(state.store.genre_names().await?))
}

/// `GET /top[?n=...]` — ties share a rank, so the result may hold more
/// than `n` rows.
pub async fn top(
  State(state): State<ApiState>,
  Query(params): Query<SampleParams>,
) -> Result<Json<Vec<RankedMovie>>, ApiError> {
  let ranked = state
    .store
    .top_ranked_movies(params.n.unwrap_or(10))
    .await?;
  Ok(Json(ranked))
}

/// `GET /random[?n=...]` — thumbnail sample; nondeterministic by design.
pub async fn random(
  State(state): State<ApiState>,
  Query(params): Query<SampleParams>,
) -> Result<Json<Vec<MovieSummary>>, ApiError> {
  let sample = state.store.random_movies(params.n.unwrap_or(10)).await?;
  Ok(Json(sample))
}
