//! Relational side of the query library.
//!
//! Each query is a single SQL statement; result rows land in the explicit
//! record types from `cinedex_core::query`. Every ordering clause carries
//! an id-based secondary key so results are deterministic across engines.
//! Sort columns come from the [`SortKey`]/[`SortOrder`] enums — no caller
//! string ever reaches query construction.

use cinedex_core::query::{
  Breakout, CatalogStats, ChildActor, Collaboration, DecadeActivity,
  DecadeCount, FilmFilter, FilmListEntry, FilmographyEntry, GenreCount,
  GenreRankEntry, MovieSummary, MultiRoleActor, Page, PopularGenre,
  RankedMovie, SortKey, SortOrder, TopMovie, PAGE_SIZE, page_offset,
};

use crate::{Result, SqliteStore};

fn sort_column(key: SortKey) -> &'static str {
  match key {
    SortKey::Title => "t.title_name",
    SortKey::Year => "m.year",
    SortKey::Rating => "r.average_rating",
  }
}

fn sort_direction(order: SortOrder) -> &'static str {
  match order {
    SortOrder::Asc => "ASC",
    SortOrder::Desc => "DESC",
  }
}

impl SqliteStore {
  // ── Analytical queries ────────────────────────────────────────────────────

  /// Filmography of every person whose name contains `name`, newest first.
  /// `character` is null for appearances with no cast entry.
  pub async fn filmography(&self, name: &str) -> Result<Vec<FilmographyEntry>> {
    let pattern = format!("%{name}%");
    let rows = self
      .connection()
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT t.title_name, m.year, c.name, r.average_rating
           FROM movies m
           JOIN principals p ON m.movie_id = p.movie_id
           JOIN persons pe ON p.person_id = pe.person_id
           JOIN movie_titles mt ON m.movie_id = mt.movie_id
           JOIN titles t ON mt.title_id = t.title_id
           LEFT JOIN movie_cast ca
             ON pe.person_id = ca.person_id AND m.movie_id = ca.movie_id
           LEFT JOIN characters c ON c.character_id = ca.character_id
           LEFT JOIN ratings r ON m.movie_id = r.movie_id
           WHERE pe.name LIKE ?1
             AND mt.is_primary = 1
           ORDER BY m.year DESC, m.movie_id ASC, c.name ASC",
        )?;
        let rows = stmt
          .query_map(rusqlite::params![pattern], |row| {
            Ok(FilmographyEntry {
              title:     row.get(0)?,
              year:      row.get(1)?,
              character: row.get(2)?,
              rating:    row.get(3)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;
    Ok(rows)
  }

  /// Top `n` movies of a genre within `[start_year, end_year]` by rating.
  pub async fn top_n_by_genre(
    &self,
    genre: &str,
    start_year: i64,
    end_year: i64,
    n: u32,
  ) -> Result<Vec<TopMovie>> {
    let pattern = format!("%{genre}%");
    let rows = self
      .connection()
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT DISTINCT m.movie_id, t.title_name, m.year, r.average_rating, r.num_votes
           FROM movies m
           JOIN movie_titles mt ON m.movie_id = mt.movie_id
           JOIN titles t ON mt.title_id = t.title_id
           JOIN movie_genres mg ON m.movie_id = mg.movie_id
           JOIN genres g ON mg.genre_id = g.genre_id
           JOIN ratings r ON m.movie_id = r.movie_id
           WHERE g.genre_name LIKE ?1
             AND m.year >= ?2
             AND m.year <= ?3
             AND mt.is_primary = 1
             AND r.average_rating IS NOT NULL
           ORDER BY r.average_rating DESC, m.movie_id ASC
           LIMIT ?4",
        )?;
        let rows = stmt
          .query_map(
            rusqlite::params![pattern, start_year, end_year, n],
            |row| {
              Ok(TopMovie {
                movie_id: row.get(0)?,
                title:    row.get(1)?,
                year:     row.get(2)?,
                rating:   row.get(3)?,
                votes:    row.get(4)?,
              })
            },
          )?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;
    Ok(rows)
  }

  /// People who played more than one distinct character in the same movie.
  pub async fn multi_role_actors(&self) -> Result<Vec<MultiRoleActor>> {
    let rows = self
      .connection()
      .call(|conn| {
        let mut stmt = conn.prepare(
          "SELECT pe.person_id, pe.name, m.movie_id, t.title_name,
                  COUNT(DISTINCT ca.character_id) AS roles
           FROM persons pe
           JOIN movie_cast ca ON pe.person_id = ca.person_id
           JOIN movies m ON ca.movie_id = m.movie_id
           JOIN movie_titles mt ON m.movie_id = mt.movie_id
           JOIN titles t ON mt.title_id = t.title_id
           WHERE mt.is_primary = 1
           GROUP BY pe.person_id, pe.name, m.movie_id, t.title_name
           HAVING COUNT(DISTINCT ca.character_id) > 1
           ORDER BY roles DESC, pe.person_id ASC, m.movie_id ASC",
        )?;
        let rows = stmt
          .query_map([], |row| {
            Ok(MultiRoleActor {
              person_id: row.get(0)?,
              name:      row.get(1)?,
              movie_id:  row.get(2)?,
              title:     row.get(3)?,
              roles:     row.get(4)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;
    Ok(rows)
  }

  /// Directors credited on any movie where the named actor also appears as
  /// a principal with an actor profession, with the distinct shared-movie
  /// count.
  pub async fn collaborations(&self, actor: &str) -> Result<Vec<Collaboration>> {
    let pattern = format!("%{actor}%");
    let rows = self
      .connection()
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT pe.name, COUNT(DISTINCT pr.movie_id) AS movies
           FROM persons pe
           JOIN principals pr ON pe.person_id = pr.person_id
           LEFT JOIN professions p ON pr.profession_id = p.profession_id
           WHERE p.job_name LIKE 'director'
             AND pr.movie_id IN (
               SELECT pr2.movie_id
               FROM persons pe2
               JOIN principals pr2 ON pe2.person_id = pr2.person_id
               LEFT JOIN professions p2 ON pr2.profession_id = p2.profession_id
               WHERE pe2.name LIKE ?1
                 AND (p2.job_name LIKE 'actor' OR p2.job_name LIKE 'actress')
             )
           GROUP BY pe.person_id, pe.name
           ORDER BY movies DESC, pe.person_id ASC",
        )?;
        let rows = stmt
          .query_map(rusqlite::params![pattern], |row| {
            Ok(Collaboration { name: row.get(0)?, movies: row.get(1)? })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;
    Ok(rows)
  }

  /// Genres with average rating above 7.0 carried by more than 50 movies.
  pub async fn popular_genres(&self) -> Result<Vec<PopularGenre>> {
    let rows = self
      .connection()
      .call(|conn| {
        let mut stmt = conn.prepare(
          "SELECT g.genre_name, AVG(r.average_rating) AS avg_rating,
                  COUNT(mg.movie_id) AS movies
           FROM genres g
           JOIN movie_genres mg ON g.genre_id = mg.genre_id
           JOIN movies m ON mg.movie_id = m.movie_id
           JOIN ratings r ON m.movie_id = r.movie_id
           GROUP BY g.genre_id, g.genre_name
           HAVING AVG(r.average_rating) > 7.0
              AND COUNT(mg.movie_id) > 50
           ORDER BY avg_rating DESC, g.genre_name ASC",
        )?;
        let rows = stmt
          .query_map([], |row| {
            Ok(PopularGenre {
              genre:      row.get(0)?,
              avg_rating: row.get(1)?,
              movies:     row.get(2)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;
    Ok(rows)
  }

  /// Per-decade cast-appearance counts and average rating for people whose
  /// name contains `name`, most recent decade first.
  pub async fn career_by_decade(&self, name: &str) -> Result<Vec<DecadeActivity>> {
    let pattern = format!("%{name}%");
    let rows = self
      .connection()
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "WITH decades AS (
             SELECT movie_id, year - (year % 10) AS decade
             FROM movies
             WHERE year IS NOT NULL
           )
           SELECT decades.decade, COUNT(DISTINCT decades.movie_id),
                  AVG(r.average_rating)
           FROM decades
           JOIN movie_cast ca ON decades.movie_id = ca.movie_id
           JOIN persons pe ON ca.person_id = pe.person_id
           LEFT JOIN ratings r ON decades.movie_id = r.movie_id
           WHERE pe.name LIKE ?1
           GROUP BY decades.decade
           ORDER BY decades.decade DESC",
        )?;
        let rows = stmt
          .query_map(rusqlite::params![pattern], |row| {
            Ok(DecadeActivity {
              decade:     row.get(0)?,
              movies:     row.get(1)?,
              avg_rating: row.get(2)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;
    Ok(rows)
  }

  /// Top 3 movies per genre by rating with competition ranking: tied
  /// movies share a rank and the next rank skips the tie-group size.
  pub async fn genre_ranking(&self) -> Result<Vec<GenreRankEntry>> {
    let rows = self
      .connection()
      .call(|conn| {
        let mut stmt = conn.prepare(
          "WITH ranked AS (
             SELECT g.genre_name, t.title_name, RANK() OVER (
               PARTITION BY g.genre_id
               ORDER BY r.average_rating DESC
             ) AS rk
             FROM genres g
             JOIN movie_genres mg ON g.genre_id = mg.genre_id
             JOIN movies m ON mg.movie_id = m.movie_id
             JOIN movie_titles mt ON m.movie_id = mt.movie_id
             JOIN titles t ON mt.title_id = t.title_id
             JOIN ratings r ON m.movie_id = r.movie_id
             WHERE mt.is_primary = 1
               AND r.average_rating IS NOT NULL
           )
           SELECT genre_name, title_name, rk
           FROM ranked
           WHERE rk <= 3
           ORDER BY genre_name ASC, rk ASC, title_name ASC",
        )?;
        let rows = stmt
          .query_map([], |row| {
            Ok(GenreRankEntry {
              genre: row.get(0)?,
              title: row.get(1)?,
              rank:  row.get(2)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;
    Ok(rows)
  }

  /// People whose first movie above 200k votes comes strictly after their
  /// most recent movie at or below 200k votes, or who have no low-vote
  /// movie at all.
  pub async fn breakout_careers(&self) -> Result<Vec<Breakout>> {
    let rows = self
      .connection()
      .call(|conn| {
        let mut stmt = conn.prepare(
          "WITH first_hit AS (
             SELECT person_id, movie_id, year FROM (
               SELECT pe.person_id, m.movie_id, m.year, ROW_NUMBER() OVER (
                 PARTITION BY pe.person_id
                 ORDER BY m.year ASC, m.movie_id ASC
               ) AS hit_num
               FROM persons pe
               JOIN principals pr ON pe.person_id = pr.person_id
               JOIN movies m ON pr.movie_id = m.movie_id
               JOIN ratings r ON m.movie_id = r.movie_id
               WHERE r.num_votes > 200000
             ) WHERE hit_num = 1
           ), last_low AS (
             SELECT person_id, movie_id, year FROM (
               SELECT pe.person_id, m.movie_id, m.year, ROW_NUMBER() OVER (
                 PARTITION BY pe.person_id
                 ORDER BY m.year DESC, m.movie_id DESC
               ) AS low_num
               FROM persons pe
               JOIN principals pr ON pe.person_id = pr.person_id
               JOIN movies m ON pr.movie_id = m.movie_id
               JOIN ratings r ON m.movie_id = r.movie_id
               WHERE r.num_votes <= 200000
             ) WHERE low_num = 1
           )
           SELECT pe.name, t.title_name, fh.year
           FROM first_hit fh
           LEFT JOIN last_low ll ON fh.person_id = ll.person_id
           JOIN persons pe ON fh.person_id = pe.person_id
           JOIN movie_titles mt ON fh.movie_id = mt.movie_id
           JOIN titles t ON mt.title_id = t.title_id
           WHERE (ll.year IS NULL OR fh.year > ll.year)
             AND mt.is_primary = 1
           ORDER BY pe.name ASC, pe.person_id ASC",
        )?;
        let rows = stmt
          .query_map([], |row| {
            Ok(Breakout {
              name:  row.get(0)?,
              title: row.get(1)?,
              year:  row.get(2)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;
    Ok(rows)
  }

  /// Cast appearances in movies above 200k votes where the person was
  /// younger than 18 at release.
  pub async fn child_actors(&self) -> Result<Vec<ChildActor>> {
    let rows = self
      .connection()
      .call(|conn| {
        let mut stmt = conn.prepare(
          "WITH appearances AS (
             SELECT pe.name, t.title_name, r.num_votes,
                    (m.year - pe.birth_year) AS age
             FROM movie_cast ca
             JOIN movies m ON ca.movie_id = m.movie_id
             JOIN movie_titles mt ON m.movie_id = mt.movie_id
             JOIN titles t ON mt.title_id = t.title_id
             JOIN ratings r ON m.movie_id = r.movie_id
             JOIN persons pe ON ca.person_id = pe.person_id
             WHERE r.num_votes > 200000
               AND mt.is_primary = 1
           )
           SELECT name, title_name, num_votes, age
           FROM appearances
           WHERE age < 18
           ORDER BY name ASC, age ASC, title_name ASC",
        )?;
        let rows = stmt
          .query_map([], |row| {
            Ok(ChildActor {
              name:  row.get(0)?,
              title: row.get(1)?,
              votes: row.get(2)?,
              age:   row.get(3)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;
    Ok(rows)
  }

  // ── Catalog queries — browsing surface ────────────────────────────────────

  /// Movies ranked by rating among those with more than 100k votes; ties
  /// share a rank, so the result may hold more than `n` rows.
  pub async fn top_ranked_movies(&self, n: u32) -> Result<Vec<RankedMovie>> {
    let rows = self
      .connection()
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "WITH rm AS (
             SELECT m.movie_id, r.average_rating, r.num_votes, RANK() OVER (
               ORDER BY r.average_rating DESC
             ) AS rk
             FROM movies m
             JOIN ratings r ON m.movie_id = r.movie_id
             WHERE r.num_votes > 100000
               AND r.average_rating IS NOT NULL
           )
           SELECT rm.movie_id, t.title_name, rm.rk, rm.average_rating, rm.num_votes
           FROM rm
           JOIN movie_titles mt ON rm.movie_id = mt.movie_id
           JOIN titles t ON mt.title_id = t.title_id
           WHERE rm.rk <= ?1
             AND mt.is_primary = 1
           ORDER BY rm.rk ASC, rm.movie_id ASC",
        )?;
        let rows = stmt
          .query_map(rusqlite::params![n], |row| {
            Ok(RankedMovie {
              movie_id: row.get(0)?,
              title:    row.get(1)?,
              rank:     row.get(2)?,
              rating:   row.get(3)?,
              votes:    row.get(4)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;
    Ok(rows)
  }

  pub async fn basic_stats(&self) -> Result<CatalogStats> {
    let stats = self
      .connection()
      .call(|conn| {
        let movies: u64 =
          conn.query_row("SELECT COUNT(*) FROM movies", [], |r| r.get(0))?;
        let actors: u64 = conn.query_row(
          "SELECT COUNT(*) FROM persons pe
           JOIN person_profession pp ON pe.person_id = pp.person_id
           JOIN professions pr ON pp.profession_id = pr.profession_id
           WHERE pr.job_name LIKE 'actor' OR pr.job_name LIKE 'actress'",
          [],
          |r| r.get(0),
        )?;
        let directors: u64 = conn.query_row(
          "SELECT COUNT(*) FROM persons pe
           JOIN person_profession pp ON pe.person_id = pp.person_id
           JOIN professions pr ON pp.profession_id = pr.profession_id
           WHERE pr.job_name LIKE 'director'",
          [],
          |r| r.get(0),
        )?;
        Ok(CatalogStats { movies, actors, directors })
      })
      .await?;
    Ok(stats)
  }

  /// A random sample for the thumbnail strip. Intentionally nondeterministic.
  pub async fn random_movies(&self, n: u32) -> Result<Vec<MovieSummary>> {
    let rows = self
      .connection()
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT m.movie_id, t.title_name
           FROM movies m
           JOIN movie_titles mt ON m.movie_id = mt.movie_id
           JOIN titles t ON mt.title_id = t.title_id
           WHERE mt.is_primary = 1
           ORDER BY RANDOM()
           LIMIT ?1",
        )?;
        let rows = stmt
          .query_map(rusqlite::params![n], |row| {
            Ok(MovieSummary { movie_id: row.get(0)?, title: row.get(1)? })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;
    Ok(rows)
  }

  /// Paginated, filterable film list. `page` is 1-based; the result
  /// carries the total match count for page navigation.
  pub async fn film_list(
    &self,
    filter: &FilmFilter,
    page: u32,
    sort_key: SortKey,
    sort_order: SortOrder,
  ) -> Result<Page<FilmListEntry>> {
    let offset = page_offset(page)?;
    let pattern = format!("%{}%", filter.genre);
    let filter = filter.clone();
    // Only the enum-derived column and direction are interpolated.
    let sql = format!(
      "SELECT DISTINCT m.movie_id, t.title_name, m.year, r.average_rating
       FROM movies m
       JOIN movie_titles mt ON m.movie_id = mt.movie_id
       JOIN titles t ON mt.title_id = t.title_id
       JOIN ratings r ON m.movie_id = r.movie_id
       JOIN movie_genres mg ON m.movie_id = mg.movie_id
       JOIN genres g ON mg.genre_id = g.genre_id
       WHERE g.genre_name LIKE ?1
         AND m.year >= ?2
         AND m.year <= ?3
         AND r.average_rating >= ?4
         AND mt.is_primary = 1
       ORDER BY {} {}, m.movie_id ASC
       LIMIT {PAGE_SIZE} OFFSET ?5",
      sort_column(sort_key),
      sort_direction(sort_order),
    );

    let (items, total) = self
      .connection()
      .call(move |conn| {
        let mut stmt = conn.prepare(&sql)?;
        let items = stmt
          .query_map(
            rusqlite::params![
              pattern,
              filter.year_min,
              filter.year_max,
              filter.min_rating,
              offset,
            ],
            |row| {
              Ok(FilmListEntry {
                movie_id: row.get(0)?,
                title:    row.get(1)?,
                year:     row.get(2)?,
                rating:   row.get(3)?,
              })
            },
          )?
          .collect::<rusqlite::Result<Vec<_>>>()?;

        let total: u64 = conn.query_row(
          "SELECT COUNT(DISTINCT m.movie_id)
           FROM movies m
           JOIN ratings r ON m.movie_id = r.movie_id
           JOIN movie_genres mg ON m.movie_id = mg.movie_id
           JOIN genres g ON mg.genre_id = g.genre_id
           WHERE g.genre_name LIKE ?1
             AND m.year >= ?2
             AND m.year <= ?3
             AND r.average_rating >= ?4",
          rusqlite::params![
            pattern,
            filter.year_min,
            filter.year_max,
            filter.min_rating,
          ],
          |r| r.get(0),
        )?;

        Ok((items, total))
      })
      .await?;

    Ok(Page { items, page, total })
  }

  /// Title-substring search, paginated, alphabetical.
  pub async fn search_by_title(
    &self,
    title: &str,
    page: u32,
  ) -> Result<Page<MovieSummary>> {
    let offset = page_offset(page)?;
    let pattern = format!("%{title}%");

    let (items, total) = self
      .connection()
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT DISTINCT m.movie_id, t.title_name
           FROM movies m
           JOIN movie_titles mt ON m.movie_id = mt.movie_id
           JOIN titles t ON mt.title_id = t.title_id
           WHERE mt.is_primary = 1
             AND t.title_name LIKE ?1
           ORDER BY t.title_name ASC, m.movie_id ASC
           LIMIT ?2 OFFSET ?3",
        )?;
        let items = stmt
          .query_map(rusqlite::params![pattern, PAGE_SIZE, offset], |row| {
            Ok(MovieSummary { movie_id: row.get(0)?, title: row.get(1)? })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;

        let total: u64 = conn.query_row(
          "SELECT COUNT(DISTINCT m.movie_id)
           FROM movies m
           JOIN movie_titles mt ON m.movie_id = mt.movie_id
           JOIN titles t ON mt.title_id = t.title_id
           WHERE mt.is_primary = 1
             AND t.title_name LIKE ?1",
          rusqlite::params![pattern],
          |r| r.get(0),
        )?;

        Ok((items, total))
      })
      .await?;

    Ok(Page { items, page, total })
  }

  /// Person-substring search over principal credits, paginated.
  pub async fn search_by_person(
    &self,
    name: &str,
    page: u32,
  ) -> Result<Page<MovieSummary>> {
    let offset = page_offset(page)?;
    let pattern = format!("%{name}%");

    let (items, total) = self
      .connection()
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT DISTINCT m.movie_id, t.title_name
           FROM movies m
           JOIN movie_titles mt ON m.movie_id = mt.movie_id
           JOIN titles t ON mt.title_id = t.title_id
           JOIN principals pr ON m.movie_id = pr.movie_id
           JOIN persons pe ON pr.person_id = pe.person_id
           WHERE mt.is_primary = 1
             AND pe.name LIKE ?1
           ORDER BY t.title_name ASC, m.movie_id ASC
           LIMIT ?2 OFFSET ?3",
        )?;
        let items = stmt
          .query_map(rusqlite::params![pattern, PAGE_SIZE, offset], |row| {
            Ok(MovieSummary { movie_id: row.get(0)?, title: row.get(1)? })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;

        let total: u64 = conn.query_row(
          "SELECT COUNT(DISTINCT m.movie_id)
           FROM movies m
           JOIN movie_titles mt ON m.movie_id = mt.movie_id
           JOIN titles t ON mt.title_id = t.title_id
           JOIN principals pr ON m.movie_id = pr.movie_id
           JOIN persons pe ON pr.person_id = pe.person_id
           WHERE mt.is_primary = 1
             AND pe.name LIKE ?1",
          rusqlite::params![pattern],
          |r| r.get(0),
        )?;

        Ok((items, total))
      })
      .await?;

    Ok(Page { items, page, total })
  }

  pub async fn movies_count_by_genre(&self) -> Result<Vec<GenreCount>> {
    let rows = self
      .connection()
      .call(|conn| {
        let mut stmt = conn.prepare(
          "SELECT g.genre_name, COUNT(DISTINCT mg.movie_id)
           FROM movie_genres mg
           JOIN genres g ON mg.genre_id = g.genre_id
           GROUP BY g.genre_name
           ORDER BY g.genre_name ASC",
        )?;
        let rows = stmt
          .query_map([], |row| {
            Ok(GenreCount { genre: row.get(0)?, movies: row.get(1)? })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;
    Ok(rows)
  }

  pub async fn movies_count_by_decade(&self) -> Result<Vec<DecadeCount>> {
    let rows = self
      .connection()
      .call(|conn| {
        let mut stmt = conn.prepare(
          "WITH decades AS (
             SELECT movie_id, year - (year % 10) AS decade
             FROM movies
             WHERE year IS NOT NULL
           )
           SELECT decade, COUNT(movie_id)
           FROM decades
           GROUP BY decade
           ORDER BY decade ASC",
        )?;
        let rows = stmt
          .query_map([], |row| {
            Ok(DecadeCount { decade: row.get(0)?, movies: row.get(1)? })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;
    Ok(rows)
  }

  pub async fn genre_names(&self) -> Result<Vec<String>> {
    let rows = self
      .connection()
      .call(|conn| {
        let mut stmt =
          conn.prepare("SELECT genre_name FROM genres ORDER BY genre_name ASC")?;
        let rows = stmt
          .query_map([], |row| row.get(0))?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;
    Ok(rows)
  }
}
