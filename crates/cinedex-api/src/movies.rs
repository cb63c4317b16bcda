//! Handlers for `/movies/:id` and its recommendation strip.

use axum::{
  Json,
  extract::{Path, Query, State},
};
use cinedex_core::{document::MovieComplete, query::MovieSummary};
use cinedex_docstore::names;
use serde::{Deserialize, Serialize};

use crate::{ApiState, error::ApiError};

/// `GET /movies/:id` — the assembled detail document; 404 if the movie is
/// not in the catalog.
pub async fn get_one(
  State(state): State<ApiState>,
  Path(id): Path<String>,
) -> Result<Json<MovieComplete>, ApiError> {
  let document: Option<MovieComplete> =
    state.docs.find_by_key(names::MOVIES_COMPLETE, &id).await?;
  document
    .map(Json)
    .ok_or_else(|| ApiError::NotFound(format!("movie {id}")))
}

#[derive(Debug, Deserialize)]
pub struct RelatedParams {
  /// Sample size per strip; defaults to 10.
  pub n: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct RelatedMovies {
  pub from_directors: Vec<MovieSummary>,
  pub from_genres:    Vec<MovieSummary>,
}

/// `GET /movies/:id/related[?n=...]` — random samples of movies sharing a
/// director or a genre with the given one. An unknown id yields empty
/// strips rather than a 404; the detail page fetches this independently.
pub async fn related(
  State(state): State<ApiState>,
  Path(id): Path<String>,
  Query(params): Query<RelatedParams>,
) -> Result<Json<RelatedMovies>, ApiError> {
  let n = params.n.unwrap_or(10);
  let from_directors = state.docs.related_by_directors(&id, n).await?;
  let from_genres = state.docs.related_by_genres(&id, n).await?;
  Ok(Json(RelatedMovies { from_directors, from_genres }))
}
