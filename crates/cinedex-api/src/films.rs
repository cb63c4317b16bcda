//! Handler for `GET /films`.
//!
//! Query params map onto [`FilmFilter`] plus the pagination contract.
//! `sort` and `order` are parsed through the closed enums; anything
//! outside them is a 400, never a query fragment.

use axum::{
  Json,
  extract::{Query, State},
};
use cinedex_core::query::{FilmFilter, FilmListEntry, Page, SortKey, SortOrder};
use serde::Deserialize;

use crate::{ApiState, error::ApiError};

#[derive(Debug, Deserialize, Default)]
pub struct FilmListParams {
  /// Genre name substring, matched case-insensitively.
  pub genre:      Option<String>,
  pub year_min:   Option<i64>,
  pub year_max:   Option<i64>,
  pub min_rating: Option<f64>,
  /// 1-based page number; defaults to the first page.
  pub page:       Option<u32>,
  /// `title`, `year`, or `rating`.
  pub sort:       Option<String>,
  /// `asc` or `desc`.
  pub order:      Option<String>,
}

/// `GET /films[?genre=...][&year_min=...][&year_max=...][&min_rating=...][&page=...][&sort=...][&order=...]`
pub async fn list(
  State(state): State<ApiState>,
  Query(params): Query<FilmListParams>,
) -> Result<Json<Page<FilmListEntry>>, ApiError> {
  let sort = params.sort.as_deref().unwrap_or("title").parse::<SortKey>()?;
  let order = params.order.as_deref().unwrap_or("asc").parse::<SortOrder>()?;

  let defaults = FilmFilter::default();
  let filter = FilmFilter {
    genre:      params.genre.unwrap_or(defaults.genre),
    year_min:   params.year_min.unwrap_or(defaults.year_min),
    year_max:   params.year_max.unwrap_or(defaults.year_max),
    min_rating: params.min_rating.unwrap_or(defaults.min_rating),
  };

  let page = state
    .store
    .film_list(&filter, params.page.unwrap_or(1), sort, order)
    .await?;
  Ok(Json(page))
}
