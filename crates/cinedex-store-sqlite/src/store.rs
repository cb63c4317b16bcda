//! [`SqliteStore`] — batch writes and table dumps for the relational store.
//!
//! Every `import_*` method is one all-or-nothing transaction: a row that
//! violates a constraint is counted and skipped, a connection-level error
//! rolls the whole entity back. The loader drives these in dependency
//! order; nothing here re-orders or retries.

use std::{collections::HashMap, path::Path};

use cinedex_core::{
  entity::{
    CastRow, CharacterRow, GenreRow, KnownForRow, MovieGenreRow, MovieRow,
    NewCastEntry, NewMovieGenre, NewPersonProfession, NewPrincipal,
    NewTitleLink, PersonProfessionRow, PersonRow, PrincipalRow,
    ProfessionRow, RatingRow, TitleFlagFix, TitleLinkRow, TitleOrderingRow,
    TitleRow,
  },
  report::ImportReport,
};

use crate::{Result, schema::SCHEMA};

// ─── Store ───────────────────────────────────────────────────────────────────

/// The Cinedex relational store backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted. Writes
/// assume a single loader run at a time (implicit single-writer).
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

/// A uniqueness, foreign-key, or check failure on a single row — the
/// RowRejected case, never fatal to the batch.
fn is_row_rejection(err: &rusqlite::Error) -> bool {
  matches!(
    err,
    rusqlite::Error::SqliteFailure(e, _)
      if e.code == rusqlite::ErrorCode::ConstraintViolation
  )
}

/// Tally one insert attempt into `report`, propagating only non-constraint
/// failures.
fn count_row(
  res: rusqlite::Result<usize>,
  report: &mut ImportReport,
) -> tokio_rusqlite::Result<()> {
  report.attempted += 1;
  match res {
    Ok(_) => {
      report.inserted += 1;
      Ok(())
    }
    Err(e) if is_row_rejection(&e) => {
      report.skipped += 1;
      Ok(())
    }
    Err(e) => Err(e.into()),
  }
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  pub(crate) fn connection(&self) -> &tokio_rusqlite::Connection {
    &self.conn
  }

  // ── Batch imports — independent entities ──────────────────────────────────

  pub async fn import_movies(&self, rows: Vec<MovieRow>) -> Result<ImportReport> {
    let report = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let mut report = ImportReport::new("movies");
        {
          let mut stmt = tx.prepare(
            "INSERT INTO movies
               (movie_id, year, runtime_minutes, primary_title, original_title)
             VALUES (?1, ?2, ?3, ?4, ?5)",
          )?;
          for row in &rows {
            count_row(
              stmt.execute(rusqlite::params![
                row.movie_id,
                row.year,
                row.runtime_minutes,
                row.primary_title,
                row.original_title,
              ]),
              &mut report,
            )?;
          }
        }
        tx.commit()?;
        Ok(report)
      })
      .await?;
    Ok(report)
  }

  pub async fn import_persons(&self, rows: Vec<PersonRow>) -> Result<ImportReport> {
    let report = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let mut report = ImportReport::new("persons");
        {
          let mut stmt = tx.prepare(
            "INSERT INTO persons (person_id, name, birth_year, death_year)
             VALUES (?1, ?2, ?3, ?4)",
          )?;
          for row in &rows {
            count_row(
              stmt.execute(rusqlite::params![
                row.person_id,
                row.name,
                row.birth_year,
                row.death_year,
              ]),
              &mut report,
            )?;
          }
        }
        tx.commit()?;
        Ok(report)
      })
      .await?;
    Ok(report)
  }

  /// Insert distinct title strings into the naming pool. Residual
  /// duplicates are caught by the case-insensitive uniqueness constraint
  /// and counted as skipped.
  pub async fn import_titles(&self, names: Vec<String>) -> Result<ImportReport> {
    self.import_lookup("titles", "INSERT INTO titles (title_name) VALUES (?1)", names).await
  }

  pub async fn import_genres(&self, names: Vec<String>) -> Result<ImportReport> {
    self.import_lookup("genres", "INSERT INTO genres (genre_name) VALUES (?1)", names).await
  }

  pub async fn import_professions(&self, names: Vec<String>) -> Result<ImportReport> {
    self
      .import_lookup("professions", "INSERT INTO professions (job_name) VALUES (?1)", names)
      .await
  }

  pub async fn import_characters(&self, names: Vec<String>) -> Result<ImportReport> {
    self
      .import_lookup("characters", "INSERT INTO characters (name) VALUES (?1)", names)
      .await
  }

  async fn import_lookup(
    &self,
    entity: &'static str,
    sql: &'static str,
    names: Vec<String>,
  ) -> Result<ImportReport> {
    let report = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let mut report = ImportReport::new(entity);
        {
          let mut stmt = tx.prepare(sql)?;
          for name in &names {
            count_row(stmt.execute(rusqlite::params![name]), &mut report)?;
          }
        }
        tx.commit()?;
        Ok(report)
      })
      .await?;
    Ok(report)
  }

  // ── Batch imports — dependent entities ────────────────────────────────────

  pub async fn import_ratings(&self, rows: Vec<RatingRow>) -> Result<ImportReport> {
    let report = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let mut report = ImportReport::new("ratings");
        {
          let mut stmt = tx.prepare(
            "INSERT INTO ratings (movie_id, average_rating, num_votes)
             VALUES (?1, ?2, ?3)",
          )?;
          for row in &rows {
            count_row(
              stmt.execute(rusqlite::params![
                row.movie_id,
                row.average_rating,
                row.num_votes,
              ]),
              &mut report,
            )?;
          }
        }
        tx.commit()?;
        Ok(report)
      })
      .await?;
    Ok(report)
  }

  /// Genre names are resolved per row with a case-insensitive subselect;
  /// the genres table is small enough that this stays cheap.
  pub async fn import_movie_genres(
    &self,
    rows: Vec<NewMovieGenre>,
  ) -> Result<ImportReport> {
    let report = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let mut report = ImportReport::new("movie_genres");
        {
          let mut stmt = tx.prepare(
            "INSERT INTO movie_genres (movie_id, genre_id)
             VALUES (?1, (SELECT genre_id FROM genres
                          WHERE genre_name = ?2 COLLATE NOCASE LIMIT 1))",
          )?;
          for row in &rows {
            count_row(
              stmt.execute(rusqlite::params![row.movie_id, row.genre_name]),
              &mut report,
            )?;
          }
        }
        tx.commit()?;
        Ok(report)
      })
      .await?;
    Ok(report)
  }

  /// Title ids come pre-resolved: the titles pool is far too large for a
  /// subselect per row, so the loader resolves against [`Self::title_lookup`]
  /// once and passes ids in.
  pub async fn import_title_links(
    &self,
    rows: Vec<NewTitleLink>,
  ) -> Result<ImportReport> {
    let report = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let mut report = ImportReport::new("movie_titles");
        {
          let mut stmt = tx.prepare(
            "INSERT INTO movie_titles (movie_id, title_id, is_primary, is_original)
             VALUES (?1, ?2, ?3, ?4)",
          )?;
          for row in &rows {
            count_row(
              stmt.execute(rusqlite::params![
                row.movie_id,
                row.title_id,
                row.is_primary,
                row.is_original,
              ]),
              &mut report,
            )?;
          }
        }
        tx.commit()?;
        Ok(report)
      })
      .await?;
    Ok(report)
  }

  pub async fn import_person_professions(
    &self,
    rows: Vec<NewPersonProfession>,
  ) -> Result<ImportReport> {
    let report = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let mut report = ImportReport::new("person_profession");
        {
          let mut stmt = tx.prepare(
            "INSERT INTO person_profession (person_id, profession_id)
             VALUES (?1, (SELECT profession_id FROM professions
                          WHERE job_name = ?2 COLLATE NOCASE LIMIT 1))",
          )?;
          for row in &rows {
            count_row(
              stmt.execute(rusqlite::params![row.person_id, row.job_name]),
              &mut report,
            )?;
          }
        }
        tx.commit()?;
        Ok(report)
      })
      .await?;
    Ok(report)
  }

  pub async fn import_title_orderings(
    &self,
    rows: Vec<TitleOrderingRow>,
  ) -> Result<ImportReport> {
    let report = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let mut report = ImportReport::new("title_ordering");
        {
          let mut stmt = tx.prepare(
            "INSERT INTO title_ordering (movie_id, ordering, title_id, region, language)
             VALUES (?1, ?2, ?3, ?4, ?5)",
          )?;
          for row in &rows {
            count_row(
              stmt.execute(rusqlite::params![
                row.movie_id,
                row.ordering,
                row.title_id,
                row.region,
                row.language,
              ]),
              &mut report,
            )?;
          }
        }
        tx.commit()?;
        Ok(report)
      })
      .await?;
    Ok(report)
  }

  pub async fn import_known_for(&self, rows: Vec<KnownForRow>) -> Result<ImportReport> {
    let report = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let mut report = ImportReport::new("known_for");
        {
          let mut stmt = tx.prepare(
            "INSERT INTO known_for (person_id, movie_id) VALUES (?1, ?2)",
          )?;
          for row in &rows {
            count_row(
              stmt.execute(rusqlite::params![row.person_id, row.movie_id]),
              &mut report,
            )?;
          }
        }
        tx.commit()?;
        Ok(report)
      })
      .await?;
    Ok(report)
  }

  pub async fn import_cast_entries(
    &self,
    rows: Vec<NewCastEntry>,
  ) -> Result<ImportReport> {
    let report = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let mut report = ImportReport::new("movie_cast");
        {
          let mut stmt = tx.prepare(
            "INSERT INTO movie_cast (movie_id, person_id, character_id)
             VALUES (?1, ?2, (SELECT character_id FROM characters
                              WHERE name = ?3 COLLATE NOCASE LIMIT 1))",
          )?;
          for row in &rows {
            count_row(
              stmt.execute(rusqlite::params![
                row.movie_id,
                row.person_id,
                row.character_name,
              ]),
              &mut report,
            )?;
          }
        }
        tx.commit()?;
        Ok(report)
      })
      .await?;
    Ok(report)
  }

  pub async fn import_principals(
    &self,
    rows: Vec<NewPrincipal>,
  ) -> Result<ImportReport> {
    let report = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let mut report = ImportReport::new("principals");
        {
          let mut stmt = tx.prepare(
            "INSERT INTO principals (movie_id, ordering, person_id, profession_id, category)
             VALUES (?1, ?2, ?3, (SELECT profession_id FROM professions
                                  WHERE job_name = ?4 COLLATE NOCASE LIMIT 1), ?5)",
          )?;
          for row in &rows {
            count_row(
              stmt.execute(rusqlite::params![
                row.movie_id,
                row.ordering,
                row.person_id,
                row.job_name,
                row.category,
              ]),
              &mut report,
            )?;
          }
        }
        tx.commit()?;
        Ok(report)
      })
      .await?;
    Ok(report)
  }

  // ── Title resolution support ──────────────────────────────────────────────

  /// Lowercased title string → generated id, fetched in one pass.
  pub async fn title_lookup(&self) -> Result<HashMap<String, i64>> {
    let pairs: Vec<(i64, String)> = self
      .conn
      .call(|conn| {
        let mut stmt =
          conn.prepare("SELECT title_id, title_name FROM titles")?;
        let rows = stmt
          .query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    Ok(
      pairs
        .into_iter()
        .map(|(id, name)| (name.to_lowercase(), id))
        .collect(),
    )
  }

  /// The declared primary/original title hints per movie.
  pub async fn movie_title_hints(
    &self,
  ) -> Result<Vec<(String, Option<String>, Option<String>)>> {
    let hints = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(
          "SELECT movie_id, primary_title, original_title
           FROM movies ORDER BY movie_id",
        )?;
        let rows = stmt
          .query_map([], |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)))?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;
    Ok(hints)
  }

  /// All movie-title links in insertion order.
  pub async fn title_links(&self) -> Result<Vec<TitleLinkRow>> {
    let links = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(
          "SELECT link_id, movie_id, title_id, is_primary, is_original
           FROM movie_titles ORDER BY link_id",
        )?;
        let rows = stmt
          .query_map([], |row| {
            Ok(TitleLinkRow {
              link_id:     row.get(0)?,
              movie_id:    row.get(1)?,
              title_id:    row.get(2)?,
              is_primary:  row.get(3)?,
              is_original: row.get(4)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;
    Ok(links)
  }

  /// Apply flag corrections from the resolution ladder in one transaction.
  /// Returns the number of links updated.
  pub async fn update_title_flags(&self, fixes: Vec<TitleFlagFix>) -> Result<usize> {
    let updated = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let mut updated = 0usize;
        {
          let mut stmt = tx.prepare(
            "UPDATE movie_titles SET is_primary = ?2, is_original = ?3
             WHERE link_id = ?1",
          )?;
          for fix in &fixes {
            updated += stmt.execute(rusqlite::params![
              fix.link_id,
              fix.is_primary,
              fix.is_original,
            ])?;
          }
        }
        tx.commit()?;
        Ok(updated)
      })
      .await?;
    Ok(updated)
  }

  /// Movie ids whose links violate the one-primary/one-original invariant.
  /// Empty after a successful resolution pass.
  pub async fn title_flag_violations(&self) -> Result<Vec<String>> {
    let ids = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(
          "SELECT movie_id FROM movie_titles
           GROUP BY movie_id
           HAVING SUM(is_primary) != 1 OR SUM(is_original) != 1
           ORDER BY movie_id",
        )?;
        let rows = stmt
          .query_map([], |row| row.get(0))?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;
    Ok(ids)
  }

  // ── Table dumps — consumed by the denormalization pipeline ────────────────

  pub async fn dump_movies(&self) -> Result<Vec<MovieRow>> {
    let rows = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(
          "SELECT movie_id, year, runtime_minutes, primary_title, original_title
           FROM movies ORDER BY movie_id",
        )?;
        let rows = stmt
          .query_map([], |row| {
            Ok(MovieRow {
              movie_id:        row.get(0)?,
              year:            row.get(1)?,
              runtime_minutes: row.get(2)?,
              primary_title:   row.get(3)?,
              original_title:  row.get(4)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;
    Ok(rows)
  }

  pub async fn dump_persons(&self) -> Result<Vec<PersonRow>> {
    let rows = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(
          "SELECT person_id, name, birth_year, death_year
           FROM persons ORDER BY person_id",
        )?;
        let rows = stmt
          .query_map([], |row| {
            Ok(PersonRow {
              person_id:  row.get(0)?,
              name:       row.get(1)?,
              birth_year: row.get(2)?,
              death_year: row.get(3)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;
    Ok(rows)
  }

  pub async fn dump_titles(&self) -> Result<Vec<TitleRow>> {
    let rows = self
      .conn
      .call(|conn| {
        let mut stmt = conn
          .prepare("SELECT title_id, title_name FROM titles ORDER BY title_id")?;
        let rows = stmt
          .query_map([], |row| {
            Ok(TitleRow { title_id: row.get(0)?, title_name: row.get(1)? })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;
    Ok(rows)
  }

  pub async fn dump_genres(&self) -> Result<Vec<GenreRow>> {
    let rows = self
      .conn
      .call(|conn| {
        let mut stmt = conn
          .prepare("SELECT genre_id, genre_name FROM genres ORDER BY genre_id")?;
        let rows = stmt
          .query_map([], |row| {
            Ok(GenreRow { genre_id: row.get(0)?, genre_name: row.get(1)? })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;
    Ok(rows)
  }

  pub async fn dump_professions(&self) -> Result<Vec<ProfessionRow>> {
    let rows = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(
          "SELECT profession_id, job_name FROM professions ORDER BY profession_id",
        )?;
        let rows = stmt
          .query_map([], |row| {
            Ok(ProfessionRow {
              profession_id: row.get(0)?,
              job_name:      row.get(1)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;
    Ok(rows)
  }

  pub async fn dump_characters(&self) -> Result<Vec<CharacterRow>> {
    let rows = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(
          "SELECT character_id, name FROM characters ORDER BY character_id",
        )?;
        let rows = stmt
          .query_map([], |row| {
            Ok(CharacterRow { character_id: row.get(0)?, name: row.get(1)? })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;
    Ok(rows)
  }

  pub async fn dump_title_orderings(&self) -> Result<Vec<TitleOrderingRow>> {
    let rows = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(
          "SELECT movie_id, ordering, title_id, region, language
           FROM title_ordering ORDER BY movie_id, ordering",
        )?;
        let rows = stmt
          .query_map([], |row| {
            Ok(TitleOrderingRow {
              movie_id: row.get(0)?,
              ordering: row.get(1)?,
              title_id: row.get(2)?,
              region:   row.get(3)?,
              language: row.get(4)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;
    Ok(rows)
  }

  pub async fn dump_movie_genres(&self) -> Result<Vec<MovieGenreRow>> {
    let rows = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(
          "SELECT movie_id, genre_id FROM movie_genres ORDER BY movie_id, genre_id",
        )?;
        let rows = stmt
          .query_map([], |row| {
            Ok(MovieGenreRow { movie_id: row.get(0)?, genre_id: row.get(1)? })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;
    Ok(rows)
  }

  pub async fn dump_person_professions(&self) -> Result<Vec<PersonProfessionRow>> {
    let rows = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(
          "SELECT person_id, profession_id FROM person_profession
           ORDER BY person_id, profession_id",
        )?;
        let rows = stmt
          .query_map([], |row| {
            Ok(PersonProfessionRow {
              person_id:     row.get(0)?,
              profession_id: row.get(1)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;
    Ok(rows)
  }

  pub async fn dump_known_for(&self) -> Result<Vec<KnownForRow>> {
    let rows = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(
          "SELECT person_id, movie_id FROM known_for ORDER BY person_id, movie_id",
        )?;
        let rows = stmt
          .query_map([], |row| {
            Ok(KnownForRow { person_id: row.get(0)?, movie_id: row.get(1)? })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;
    Ok(rows)
  }

  pub async fn dump_principals(&self) -> Result<Vec<PrincipalRow>> {
    let rows = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(
          "SELECT movie_id, ordering, person_id, profession_id, category
           FROM principals ORDER BY movie_id, ordering",
        )?;
        let rows = stmt
          .query_map([], |row| {
            Ok(PrincipalRow {
              movie_id:      row.get(0)?,
              ordering:      row.get(1)?,
              person_id:     row.get(2)?,
              profession_id: row.get(3)?,
              category:      row.get(4)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;
    Ok(rows)
  }

  pub async fn dump_cast(&self) -> Result<Vec<CastRow>> {
    let rows = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(
          "SELECT movie_id, person_id, character_id FROM movie_cast
           ORDER BY movie_id, person_id, character_id",
        )?;
        let rows = stmt
          .query_map([], |row| {
            Ok(CastRow {
              movie_id:     row.get(0)?,
              person_id:    row.get(1)?,
              character_id: row.get(2)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;
    Ok(rows)
  }

  pub async fn dump_ratings(&self) -> Result<Vec<RatingRow>> {
    let rows = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(
          "SELECT movie_id, average_rating, num_votes FROM ratings
           ORDER BY movie_id",
        )?;
        let rows = stmt
          .query_map([], |row| {
            Ok(RatingRow {
              movie_id:       row.get(0)?,
              average_rating: row.get(1)?,
              num_votes:      row.get(2)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;
    Ok(rows)
  }

  /// All movie-title links, serialisable form for the flat mirror.
  pub async fn dump_title_links(&self) -> Result<Vec<TitleLinkRow>> {
    self.title_links().await
  }
}
