//! `movies_complete` assembly.
//!
//! Joins the flat collections back together into one document per movie.
//! Reads only the document store — by this stage the relational store is
//! out of the picture, and a missing dependency collection aborts the run
//! before anything is written.

use std::collections::{BTreeMap, HashMap};

use cinedex_core::{
  document::{
    CastMember, Credit, LocalizedTitle, MovieComplete, Rating, WriterCredit,
  },
  entity::{
    CastRow, CharacterRow, GenreRow, MovieGenreRow, MovieRow, PersonRow,
    PrincipalRow, ProfessionRow, RatingRow, TitleLinkRow, TitleOrderingRow,
    TitleRow,
  },
};
use cinedex_docstore::{DocStore, names};
use tracing::info;

use crate::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JoinMode {
  /// Movies lacking a primary title or a rating are excluded.
  #[default]
  Inner,
  /// Every movie is kept; missing pieces become `None` or empty.
  Outer,
}

#[derive(Debug, Clone, Default)]
pub struct AssembleOptions {
  pub mode:  JoinMode,
  /// Cap on the number of documents; lowest movie ids win. `None` builds
  /// the full catalog.
  pub limit: Option<usize>,
}

/// Build the `movies_complete` collection. Returns the document count.
pub async fn assemble(docs: &DocStore, options: &AssembleOptions) -> Result<usize> {
  let movies: Vec<MovieRow> = docs.find_all(names::MOVIES).await?;
  let persons: Vec<PersonRow> = docs.find_all(names::PERSONS).await?;
  let titles: Vec<TitleRow> = docs.find_all(names::TITLES).await?;
  let links: Vec<TitleLinkRow> = docs.find_all(names::MOVIE_TITLES).await?;
  let orderings: Vec<TitleOrderingRow> =
    docs.find_all(names::TITLE_ORDERING).await?;
  let genres: Vec<GenreRow> = docs.find_all(names::GENRES).await?;
  let movie_genres: Vec<MovieGenreRow> =
    docs.find_all(names::MOVIE_GENRES).await?;
  let professions: Vec<ProfessionRow> =
    docs.find_all(names::PROFESSIONS).await?;
  let principals: Vec<PrincipalRow> = docs.find_all(names::PRINCIPALS).await?;
  let cast: Vec<CastRow> = docs.find_all(names::MOVIE_CAST).await?;
  let characters: Vec<CharacterRow> = docs.find_all(names::CHARACTERS).await?;
  let ratings: Vec<RatingRow> = docs.find_all(names::RATINGS).await?;

  let person_names: HashMap<&str, &Option<String>> = persons
    .iter()
    .map(|p| (p.person_id.as_str(), &p.name))
    .collect();
  let title_names: HashMap<i64, &str> = titles
    .iter()
    .map(|t| (t.title_id, t.title_name.as_str()))
    .collect();
  let genre_names: HashMap<i64, &str> = genres
    .iter()
    .map(|g| (g.genre_id, g.genre_name.as_str()))
    .collect();
  let character_names: HashMap<i64, &str> = characters
    .iter()
    .map(|c| (c.character_id, c.name.as_str()))
    .collect();
  let job_names: HashMap<i64, String> = professions
    .iter()
    .map(|p| (p.profession_id, p.job_name.to_lowercase()))
    .collect();
  let rating_rows: HashMap<&str, &RatingRow> =
    ratings.iter().map(|r| (r.movie_id.as_str(), r)).collect();

  let mut primary_title: HashMap<&str, &str> = HashMap::new();
  for link in &links {
    if link.is_primary {
      if let Some(name) = title_names.get(&link.title_id).copied() {
        primary_title.entry(link.movie_id.as_str()).or_insert(name);
      }
    }
  }

  let mut localized: HashMap<&str, Vec<&TitleOrderingRow>> = HashMap::new();
  for row in &orderings {
    localized.entry(row.movie_id.as_str()).or_default().push(row);
  }

  let mut genre_lists: HashMap<&str, Vec<&str>> = HashMap::new();
  for row in &movie_genres {
    if let Some(name) = genre_names.get(&row.genre_id).copied() {
      genre_lists.entry(row.movie_id.as_str()).or_default().push(name);
    }
  }

  let mut credits: HashMap<&str, Vec<&PrincipalRow>> = HashMap::new();
  for row in &principals {
    credits.entry(row.movie_id.as_str()).or_default().push(row);
  }

  // (movie, person) → distinct characters, keyed with BTreeMap so cast
  // iteration order is already deterministic.
  let mut roles: HashMap<&str, BTreeMap<&str, Vec<String>>> = HashMap::new();
  for row in &cast {
    if let Some(name) = character_names.get(&row.character_id) {
      roles
        .entry(row.movie_id.as_str())
        .or_default()
        .entry(row.person_id.as_str())
        .or_default()
        .push((*name).to_owned());
    }
  }

  let mut ordered_movies: Vec<&MovieRow> = movies.iter().collect();
  ordered_movies.sort_by(|a, b| a.movie_id.cmp(&b.movie_id));

  let mut entries: Vec<(String, MovieComplete)> = Vec::new();
  for movie in ordered_movies {
    if let Some(limit) = options.limit {
      if entries.len() >= limit {
        break;
      }
    }
    let id = movie.movie_id.as_str();
    let title = primary_title.get(id).map(|t| (*t).to_owned());
    let rating = rating_rows.get(id).map(|r| Rating {
      average: r.average_rating,
      votes:   r.num_votes,
    });
    if options.mode == JoinMode::Inner && (title.is_none() || rating.is_none())
    {
      continue;
    }

    let mut movie_titles: Vec<&TitleOrderingRow> =
      localized.get(id).cloned().unwrap_or_default();
    movie_titles.sort_by_key(|t| t.ordering);
    let movie_titles = movie_titles
      .into_iter()
      .filter_map(|t| {
        title_names.get(&t.title_id).map(|name| LocalizedTitle {
          region: t.region.clone(),
          title:  (*name).to_owned(),
        })
      })
      .collect();

    let mut movie_genres: Vec<String> = genre_lists
      .get(id)
      .map(|list| list.iter().map(|g| (*g).to_owned()).collect())
      .unwrap_or_default();
    movie_genres.sort();

    let mut directors = Vec::new();
    let mut writers = Vec::new();
    let mut billing: HashMap<&str, i64> = HashMap::new();
    for principal in credits.get(id).into_iter().flatten() {
      let slot = billing
        .entry(principal.person_id.as_str())
        .or_insert(principal.ordering);
      *slot = (*slot).min(principal.ordering);

      let job = principal
        .profession_id
        .and_then(|pid| job_names.get(&pid))
        .map(String::as_str);
      let name = person_names
        .get(principal.person_id.as_str())
        .map(|n| (*n).clone())
        .unwrap_or(None);
      match job {
        Some("director") => directors.push(Credit {
          person_id: principal.person_id.clone(),
          name,
        }),
        Some("writer") => writers.push(WriterCredit {
          person_id: principal.person_id.clone(),
          name,
          category: principal.category.clone(),
        }),
        _ => {}
      }
    }

    let cast_members = roles
      .get(id)
      .map(|by_person| {
        by_person
          .iter()
          .map(|(person_id, characters)| {
            let mut characters = characters.clone();
            characters.sort();
            characters.dedup();
            CastMember {
              person_id:  (*person_id).to_owned(),
              name:       person_names
                .get(person_id)
                .map(|n| (*n).clone())
                .unwrap_or(None),
              characters,
              ordering:   billing.get(person_id).copied(),
            }
          })
          .collect()
      })
      .unwrap_or_default();

    entries.push((
      movie.movie_id.clone(),
      MovieComplete {
        movie_id: movie.movie_id.clone(),
        title,
        year: movie.year,
        runtime_minutes: movie.runtime_minutes,
        genres: movie_genres,
        rating,
        directors,
        writers,
        cast: cast_members,
        titles: movie_titles,
      },
    ));
  }

  docs.drop_collection(names::MOVIES_COMPLETE).await?;
  docs.create_collection(names::MOVIES_COMPLETE).await?;
  let written = docs.put_all_keyed(names::MOVIES_COMPLETE, &entries).await?;
  info!(documents = written, mode = ?options.mode, "catalog assembled");
  Ok(written)
}
