//! The denormalized `MovieComplete` document.
//!
//! One self-contained document per movie, built once by the pipeline from a
//! fully-loaded relational snapshot and treated as immutable derived data.
//! A schema or source change requires a full rebuild, not a patch.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rating {
  pub average: Option<f64>,
  pub votes:   Option<i64>,
}

/// A director credit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Credit {
  pub person_id: String,
  pub name:      Option<String>,
}

/// A writer credit; `category` is the free-text job from the principal row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WriterCredit {
  pub person_id: String,
  pub name:      Option<String>,
  pub category:  Option<String>,
}

/// One cast member with the distinct set of characters they played and
/// their earliest-seen billing order in the movie.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CastMember {
  pub person_id:  String,
  pub name:       Option<String>,
  /// Distinct character names, sorted for stable output.
  pub characters: Vec<String>,
  pub ordering:   Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocalizedTitle {
  pub region: Option<String>,
  pub title:  String,
}

/// The full detail-page document.
///
/// Under inner-join assembly every document has `title` and `rating` set;
/// under outer-join assembly either may be absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovieComplete {
  pub movie_id:        String,
  pub title:           Option<String>,
  pub year:            Option<i64>,
  pub runtime_minutes: Option<i64>,
  pub genres:          Vec<String>,
  pub rating:          Option<Rating>,
  pub directors:       Vec<Credit>,
  pub writers:         Vec<WriterCredit>,
  pub cast:            Vec<CastMember>,
  pub titles:          Vec<LocalizedTitle>,
}
