//! Relational row types.
//!
//! One struct per table. The same shapes double as the flat documents
//! mirrored into the document store, so everything here is serde-friendly.
//! Absent source values are `None`, never zero.

use serde::{Deserialize, Serialize};

// ─── Independent entities ────────────────────────────────────────────────────

/// A movie. `primary_title` and `original_title` are the declared title
/// hints carried from the source extract; the resolved flags live on
/// [`TitleLinkRow`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovieRow {
  pub movie_id:        String,
  pub year:            Option<i64>,
  pub runtime_minutes: Option<i64>,
  pub primary_title:   Option<String>,
  pub original_title:  Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersonRow {
  pub person_id:  String,
  pub name:       Option<String>,
  pub birth_year: Option<i64>,
  pub death_year: Option<i64>,
}

/// A de-duplicated title string from the naming pool.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TitleRow {
  pub title_id:   i64,
  pub title_name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenreRow {
  pub genre_id:   i64,
  pub genre_name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfessionRow {
  pub profession_id: i64,
  pub job_name:      String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CharacterRow {
  pub character_id: i64,
  pub name:         String,
}

// ─── Associations ────────────────────────────────────────────────────────────

/// A movie-to-title association. `link_id` is assigned in insertion order
/// and serves as the deterministic tie-break for the resolution ladder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TitleLinkRow {
  pub link_id:     i64,
  pub movie_id:    String,
  pub title_id:    i64,
  pub is_primary:  bool,
  pub is_original: bool,
}

/// A localized title variant with its per-movie ordering index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TitleOrderingRow {
  pub movie_id: String,
  pub ordering: i64,
  pub title_id: i64,
  pub region:   Option<String>,
  pub language: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovieGenreRow {
  pub movie_id: String,
  pub genre_id: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersonProfessionRow {
  pub person_id:     String,
  pub profession_id: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KnownForRow {
  pub person_id: String,
  pub movie_id:  String,
}

/// A credited contributor with a billing order unique per movie.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrincipalRow {
  pub movie_id:      String,
  pub ordering:      i64,
  pub person_id:     String,
  /// Null when the source job name did not resolve to a known profession.
  pub profession_id: Option<i64>,
  pub category:      Option<String>,
}

/// One character played by one person in one movie. A person may play
/// several characters in the same movie; each is its own row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CastRow {
  pub movie_id:     String,
  pub person_id:    String,
  pub character_id: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RatingRow {
  pub movie_id:       String,
  pub average_rating: Option<f64>,
  pub num_votes:      Option<i64>,
}

// ─── Insert inputs ───────────────────────────────────────────────────────────
//
// Inputs to the store's batch inserts, before generated ids exist. Link
// inputs carry the source's name strings; the store resolves them with
// case-insensitive lookups.

#[derive(Debug, Clone)]
pub struct NewTitleLink {
  pub movie_id:    String,
  pub title_id:    i64,
  pub is_primary:  bool,
  pub is_original: bool,
}

/// A flag correction computed by the title-resolution ladder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TitleFlagFix {
  pub link_id:     i64,
  pub is_primary:  bool,
  pub is_original: bool,
}

#[derive(Debug, Clone)]
pub struct NewMovieGenre {
  pub movie_id:   String,
  pub genre_name: String,
}

#[derive(Debug, Clone)]
pub struct NewPersonProfession {
  pub person_id: String,
  pub job_name:  String,
}

#[derive(Debug, Clone)]
pub struct NewCastEntry {
  pub movie_id:       String,
  pub person_id:      String,
  pub character_name: String,
}

#[derive(Debug, Clone)]
pub struct NewPrincipal {
  pub movie_id:  String,
  pub ordering:  i64,
  pub person_id: String,
  pub job_name:  Option<String>,
  pub category:  Option<String>,
}
