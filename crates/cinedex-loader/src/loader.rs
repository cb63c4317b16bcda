//! Dependency-ordered batch import.
//!
//! Independent entities land first (movies, persons, the naming pools),
//! then everything that references them. Title variants from the extract
//! become movie-title links here, with `is_primary` seeded from each
//! movie's declared primary title; the resolution pass in the pipeline
//! crate finishes the job for movies the extract leaves ambiguous.

use std::{
  collections::{HashMap, HashSet, hash_map::Entry},
  path::PathBuf,
};

use cinedex_core::{
  entity::{
    KnownForRow, MovieRow, NewCastEntry, NewMovieGenre, NewPersonProfession,
    NewPrincipal, NewTitleLink, PersonRow, RatingRow, TitleOrderingRow,
  },
  report::ImportReport,
};
use cinedex_store_sqlite::SqliteStore;
use tracing::info;

use crate::{
  Result,
  extract::{
    CHARACTERS_FILE, CharacterRecord, GENRES_FILE, GenreRecord,
    KNOWN_FOR_FILE, KnownForRecord, MOVIES_FILE, MovieRecord, PERSONS_FILE,
    PROFESSIONS_FILE, PRINCIPALS_FILE, PersonRecord, PrincipalRecord,
    ProfessionRecord, RATINGS_FILE, RatingRecord, TITLES_FILE, TitleRecord,
    read_records,
  },
};

/// Case-insensitive first-seen dedup, blanks discarded.
fn distinct_names<'a>(names: impl Iterator<Item = Option<&'a str>>) -> Vec<String> {
  let mut seen = HashSet::new();
  let mut pool = Vec::new();
  for name in names.flatten() {
    let trimmed = name.trim();
    if trimmed.is_empty() {
      continue;
    }
    if seen.insert(trimmed.to_lowercase()) {
      pool.push(trimmed.to_owned());
    }
  }
  pool
}

pub struct Loader {
  store: SqliteStore,
  dir:   PathBuf,
}

impl Loader {
  pub fn new(store: SqliteStore, dir: impl Into<PathBuf>) -> Self {
    Self { store, dir: dir.into() }
  }

  /// Run the full import and return one report per entity, in load order.
  pub async fn run(&self) -> Result<Vec<ImportReport>> {
    let movies: Vec<MovieRecord> = read_records(self.dir.join(MOVIES_FILE))?;
    let persons: Vec<PersonRecord> = read_records(self.dir.join(PERSONS_FILE))?;
    let titles: Vec<TitleRecord> = read_records(self.dir.join(TITLES_FILE))?;
    let genres: Vec<GenreRecord> = read_records(self.dir.join(GENRES_FILE))?;
    let professions: Vec<ProfessionRecord> =
      read_records(self.dir.join(PROFESSIONS_FILE))?;
    let characters: Vec<CharacterRecord> =
      read_records(self.dir.join(CHARACTERS_FILE))?;
    let ratings: Vec<RatingRecord> = read_records(self.dir.join(RATINGS_FILE))?;
    let principals: Vec<PrincipalRecord> =
      read_records(self.dir.join(PRINCIPALS_FILE))?;
    let known_for: Vec<KnownForRecord> =
      read_records(self.dir.join(KNOWN_FOR_FILE))?;

    let mut reports = Vec::new();
    let mut note = |report: ImportReport| {
      info!(
        entity = report.entity,
        attempted = report.attempted,
        inserted = report.inserted,
        skipped = report.skipped,
        "entity imported",
      );
      reports.push(report);
    };

    // Independent entities.
    note(
      self
        .store
        .import_movies(
          movies
            .iter()
            .map(|m| MovieRow {
              movie_id:        m.mid.clone(),
              year:            m.year,
              runtime_minutes: m.runtime_minutes,
              primary_title:   m.primary_title.clone(),
              original_title:  m.original_title.clone(),
            })
            .collect(),
        )
        .await?,
    );
    note(
      self
        .store
        .import_persons(
          persons
            .iter()
            .map(|p| PersonRow {
              person_id:  p.pid.clone(),
              name:       p.name.clone(),
              birth_year: p.birth_year,
              death_year: p.death_year,
            })
            .collect(),
        )
        .await?,
    );

    // Naming pools. The title pool also carries each movie's declared
    // primary and original titles so the resolution pass never has to
    // invent new pool entries.
    let title_pool = distinct_names(
      titles
        .iter()
        .map(|t| t.title.as_deref())
        .chain(movies.iter().map(|m| m.primary_title.as_deref()))
        .chain(movies.iter().map(|m| m.original_title.as_deref())),
    );
    note(self.store.import_titles(title_pool).await?);
    note(
      self
        .store
        .import_genres(distinct_names(
          genres.iter().map(|g| g.genre.as_deref()),
        ))
        .await?,
    );
    note(
      self
        .store
        .import_professions(distinct_names(
          professions.iter().map(|p| p.job_name.as_deref()),
        ))
        .await?,
    );
    note(
      self
        .store
        .import_characters(distinct_names(
          characters.iter().map(|c| c.name.as_deref()),
        ))
        .await?,
    );

    note(
      self
        .store
        .import_ratings(
          ratings
            .iter()
            .map(|r| RatingRow {
              movie_id:       r.mid.clone(),
              average_rating: r.average_rating,
              num_votes:      r.num_votes,
            })
            .collect(),
        )
        .await?,
    );

    // Title variants, resolved against the pool in one pass.
    let lookup = self.store.title_lookup().await?;
    let primary_by_movie: HashMap<&str, String> = movies
      .iter()
      .filter_map(|m| {
        m.primary_title
          .as_deref()
          .map(|t| (m.mid.as_str(), t.trim().to_lowercase()))
      })
      .collect();
    let (links, orderings) = title_links(&titles, &primary_by_movie, &lookup);
    note(self.store.import_title_links(links).await?);
    note(self.store.import_title_orderings(orderings).await?);

    // Remaining associations.
    note(
      self
        .store
        .import_movie_genres(
          genres
            .iter()
            .filter_map(|g| {
              g.genre.as_deref().map(|genre| NewMovieGenre {
                movie_id:   g.mid.clone(),
                genre_name: genre.to_owned(),
              })
            })
            .collect(),
        )
        .await?,
    );
    note(
      self
        .store
        .import_person_professions(
          professions
            .iter()
            .filter_map(|p| {
              p.job_name.as_deref().map(|job| NewPersonProfession {
                person_id: p.pid.clone(),
                job_name:  job.to_owned(),
              })
            })
            .collect(),
        )
        .await?,
    );
    note(
      self
        .store
        .import_cast_entries(
          characters
            .iter()
            .filter_map(|c| {
              c.name.as_deref().map(|name| NewCastEntry {
                movie_id:       c.mid.clone(),
                person_id:      c.pid.clone(),
                character_name: name.to_owned(),
              })
            })
            .collect(),
        )
        .await?,
    );
    note(
      self
        .store
        .import_principals(
          principals
            .iter()
            .map(|p| NewPrincipal {
              movie_id:  p.mid.clone(),
              ordering:  p.ordering,
              person_id: p.pid.clone(),
              job_name:  p.job_name.clone(),
              category:  p.category.clone(),
            })
            .collect(),
        )
        .await?,
    );
    note(
      self
        .store
        .import_known_for(
          known_for
            .iter()
            .map(|k| KnownForRow {
              person_id: k.pid.clone(),
              movie_id:  k.mid.clone(),
            })
            .collect(),
        )
        .await?,
    );

    Ok(reports)
  }
}

/// Turn title variants into link and ordering rows. Variants naming the
/// same title twice for one movie (different regions) merge into a single
/// link, OR-ing their flags.
fn title_links(
  titles: &[TitleRecord],
  primary_by_movie: &HashMap<&str, String>,
  lookup: &HashMap<String, i64>,
) -> (Vec<NewTitleLink>, Vec<TitleOrderingRow>) {
  let mut index: HashMap<(String, i64), usize> = HashMap::new();
  let mut links: Vec<NewTitleLink> = Vec::new();
  let mut orderings = Vec::new();

  for record in titles {
    let Some(name) = record
      .title
      .as_deref()
      .map(str::trim)
      .filter(|t| !t.is_empty())
    else {
      continue;
    };
    let lower = name.to_lowercase();
    let Some(&title_id) = lookup.get(&lower) else { continue };

    let is_primary = primary_by_movie
      .get(record.mid.as_str())
      .is_some_and(|declared| *declared == lower);
    let is_original = record.is_original == Some(1);

    match index.entry((record.mid.clone(), title_id)) {
      Entry::Occupied(slot) => {
        let link = &mut links[*slot.get()];
        link.is_primary |= is_primary;
        link.is_original |= is_original;
      }
      Entry::Vacant(slot) => {
        slot.insert(links.len());
        links.push(NewTitleLink {
          movie_id: record.mid.clone(),
          title_id,
          is_primary,
          is_original,
        });
      }
    }

    orderings.push(TitleOrderingRow {
      movie_id: record.mid.clone(),
      ordering: record.ordering,
      title_id,
      region: record.region.clone(),
      language: record.language.clone(),
    });
  }

  (links, orderings)
}
