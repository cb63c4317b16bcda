//! The nine-file CSV extract.
//!
//! One record struct per file, named after its header row. Empty fields
//! deserialize to `None`; downstream constraints decide whether a null is
//! acceptable, not the reader.

use std::path::Path;

use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::Result;

pub const MOVIES_FILE: &str = "movies.csv";
pub const PERSONS_FILE: &str = "persons.csv";
pub const GENRES_FILE: &str = "genres.csv";
pub const CHARACTERS_FILE: &str = "characters.csv";
pub const PROFESSIONS_FILE: &str = "professions.csv";
pub const RATINGS_FILE: &str = "ratings.csv";
pub const TITLES_FILE: &str = "titles.csv";
pub const PRINCIPALS_FILE: &str = "principals.csv";
pub const KNOWN_FOR_FILE: &str = "knownformovies.csv";

#[derive(Debug, Deserialize)]
pub struct MovieRecord {
  pub mid:             String,
  pub primary_title:   Option<String>,
  pub original_title:  Option<String>,
  pub year:            Option<i64>,
  pub runtime_minutes: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct PersonRecord {
  pub pid:        String,
  pub name:       Option<String>,
  pub birth_year: Option<i64>,
  pub death_year: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct GenreRecord {
  pub mid:   String,
  pub genre: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CharacterRecord {
  pub mid:  String,
  pub pid:  String,
  pub name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ProfessionRecord {
  pub pid:      String,
  pub job_name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RatingRecord {
  pub mid:            String,
  pub average_rating: Option<f64>,
  pub num_votes:      Option<i64>,
}

/// A localized title variant. `is_original` arrives as 0/1.
#[derive(Debug, Deserialize)]
pub struct TitleRecord {
  pub mid:         String,
  pub ordering:    i64,
  pub title:       Option<String>,
  pub region:      Option<String>,
  pub language:    Option<String>,
  pub is_original: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct PrincipalRecord {
  pub mid:      String,
  pub ordering: i64,
  pub pid:      String,
  pub job_name: Option<String>,
  pub category: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct KnownForRecord {
  pub pid: String,
  pub mid: String,
}

/// Read a whole extract file. A malformed row is an error, not a skip —
/// constraint handling belongs to the store, parse failures do not.
pub fn read_records<T: DeserializeOwned>(path: impl AsRef<Path>) -> Result<Vec<T>> {
  let mut reader = csv::Reader::from_path(path)?;
  let records = reader
    .deserialize()
    .collect::<csv::Result<Vec<T>>>()?;
  Ok(records)
}
