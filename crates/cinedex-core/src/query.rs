//! Query-library inputs and result records.
//!
//! Every analytical query projects into an explicit record type — one field
//! per column — so both the relational and the document implementations
//! return the same compile-checked shapes. Sort keys and directions are
//! closed enums; an out-of-enum value cannot reach query construction.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

// ─── Sorting ─────────────────────────────────────────────────────────────────

/// Column the film list can be sorted on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortKey {
  Title,
  Year,
  Rating,
}

impl FromStr for SortKey {
  type Err = Error;

  fn from_str(s: &str) -> Result<Self> {
    match s {
      "title" => Ok(Self::Title),
      "year" => Ok(Self::Year),
      "rating" => Ok(Self::Rating),
      other => Err(Error::InvalidSortKey(other.to_owned())),
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
  Asc,
  Desc,
}

impl FromStr for SortOrder {
  type Err = Error;

  fn from_str(s: &str) -> Result<Self> {
    match s {
      "asc" => Ok(Self::Asc),
      "desc" => Ok(Self::Desc),
      other => Err(Error::InvalidSortOrder(other.to_owned())),
    }
  }
}

// ─── Pagination ──────────────────────────────────────────────────────────────

/// Fixed page size of the browsing contract.
pub const PAGE_SIZE: u32 = 20;

/// One page of results plus the total match count, for building page
/// navigation. Pages are 1-based.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
  pub items: Vec<T>,
  pub page:  u32,
  pub total: u64,
}

impl<T> Page<T> {
  /// Number of pages needed to show `total` items.
  pub fn page_count(&self) -> u64 {
    self.total.div_ceil(u64::from(PAGE_SIZE))
  }
}

/// Validate a 1-based page number and return its row offset.
pub fn page_offset(page: u32) -> Result<u32> {
  if page == 0 {
    return Err(Error::InvalidPage(page));
  }
  Ok((page - 1) * PAGE_SIZE)
}

// ─── Filters ─────────────────────────────────────────────────────────────────

/// Filter set of the paginated film list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilmFilter {
  /// Genre name substring, matched case-insensitively.
  pub genre:      String,
  pub year_min:   i64,
  pub year_max:   i64,
  pub min_rating: f64,
}

impl Default for FilmFilter {
  fn default() -> Self {
    Self {
      genre:      String::new(),
      year_min:   1895,
      year_max:   i64::MAX >> 1,
      min_rating: 0.0,
    }
  }
}

// ─── Analytical result records ───────────────────────────────────────────────

/// One appearance in a person's filmography. `character` is null for
/// appearances with no cast entry (uncredited or crew-only).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilmographyEntry {
  pub title:     String,
  pub year:      Option<i64>,
  pub character: Option<String>,
  pub rating:    Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopMovie {
  pub movie_id: String,
  pub title:    String,
  pub year:     Option<i64>,
  pub rating:   f64,
  pub votes:    Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MultiRoleActor {
  pub person_id: String,
  pub name:      Option<String>,
  pub movie_id:  String,
  pub title:     String,
  /// Distinct characters played in this movie; always > 1.
  pub roles:     i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Collaboration {
  pub name:   Option<String>,
  /// Distinct movies shared with the queried actor.
  pub movies: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PopularGenre {
  pub genre:      String,
  pub avg_rating: f64,
  pub movies:     i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecadeActivity {
  pub decade:     i64,
  pub movies:     i64,
  pub avg_rating: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenreRankEntry {
  pub genre: String,
  pub title: String,
  /// Competition rank within the genre; ties share a rank and the next
  /// rank skips the tie-group size.
  pub rank:  i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Breakout {
  pub name:  Option<String>,
  pub title: String,
  pub year:  Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChildActor {
  pub name:  Option<String>,
  pub title: String,
  pub votes: i64,
  pub age:   i64,
}

// ─── Catalog result records ──────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedMovie {
  pub movie_id: String,
  pub title:    String,
  pub rank:     i64,
  pub rating:   f64,
  pub votes:    i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogStats {
  pub movies:    u64,
  pub actors:    u64,
  pub directors: u64,
}

/// Minimal movie reference for thumbnail strips and search results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovieSummary {
  pub movie_id: String,
  pub title:    String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilmListEntry {
  pub movie_id: String,
  pub title:    String,
  pub year:     Option<i64>,
  pub rating:   f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenreCount {
  pub genre:  String,
  pub movies: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecadeCount {
  pub decade: i64,
  pub movies: i64,
}
