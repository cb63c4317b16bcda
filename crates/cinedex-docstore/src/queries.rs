//! Document side of the query library.
//!
//! Same inputs and result records as the relational side, computed as
//! in-memory hash joins over the flat collections. Tie-breaks and null
//! ordering deliberately mirror the SQL versions (nulls sort first
//! ascending, last descending) so both sides return identical rows.

use std::collections::{HashMap, HashSet};

use cinedex_core::{
  document::MovieComplete,
  entity::{
    CastRow, CharacterRow, GenreRow, MovieGenreRow, MovieRow, PersonRow,
    PrincipalRow, ProfessionRow, RatingRow, TitleLinkRow, TitleRow,
  },
  query::{
    Breakout, ChildActor, Collaboration, DecadeActivity, FilmographyEntry,
    GenreRankEntry, MovieSummary, MultiRoleActor, PopularGenre, TopMovie,
  },
};

use crate::{DocStore, Result, names};

fn contains_ci(value: &Option<String>, needle_lower: &str) -> bool {
  value
    .as_deref()
    .is_some_and(|v| v.to_lowercase().contains(needle_lower))
}

// ─── Shared snapshot loaders ─────────────────────────────────────────────────

impl DocStore {
  /// Movie id → resolved primary title. Movies without a primary link are
  /// absent, which drops them from queries the same way an inner join does.
  async fn primary_title_by_movie(&self) -> Result<HashMap<String, String>> {
    let titles: Vec<TitleRow> = self.find_all(names::TITLES).await?;
    let links: Vec<TitleLinkRow> = self.find_all(names::MOVIE_TITLES).await?;

    let by_id: HashMap<i64, String> = titles
      .into_iter()
      .map(|t| (t.title_id, t.title_name))
      .collect();
    let mut by_movie = HashMap::new();
    for link in links {
      if link.is_primary {
        if let Some(name) = by_id.get(&link.title_id) {
          by_movie.entry(link.movie_id).or_insert_with(|| name.clone());
        }
      }
    }
    Ok(by_movie)
  }

  async fn ratings_by_movie(&self) -> Result<HashMap<String, RatingRow>> {
    let ratings: Vec<RatingRow> = self.find_all(names::RATINGS).await?;
    Ok(ratings.into_iter().map(|r| (r.movie_id.clone(), r)).collect())
  }

  async fn movies_by_id(&self) -> Result<HashMap<String, MovieRow>> {
    let movies: Vec<MovieRow> = self.find_all(names::MOVIES).await?;
    Ok(movies.into_iter().map(|m| (m.movie_id.clone(), m)).collect())
  }

  async fn persons_by_id(&self) -> Result<HashMap<String, PersonRow>> {
    let persons: Vec<PersonRow> = self.find_all(names::PERSONS).await?;
    Ok(persons.into_iter().map(|p| (p.person_id.clone(), p)).collect())
  }

  /// Genre name pattern → set of movie ids carrying a matching genre.
  async fn movies_with_genre(&self, needle_lower: &str) -> Result<HashSet<String>> {
    let genres: Vec<GenreRow> = self.find_all(names::GENRES).await?;
    let links: Vec<MovieGenreRow> = self.find_all(names::MOVIE_GENRES).await?;

    let matching: HashSet<i64> = genres
      .into_iter()
      .filter(|g| g.genre_name.to_lowercase().contains(needle_lower))
      .map(|g| g.genre_id)
      .collect();
    Ok(
      links
        .into_iter()
        .filter(|l| matching.contains(&l.genre_id))
        .map(|l| l.movie_id)
        .collect(),
    )
  }

  // ─── Analytical queries ────────────────────────────────────────────────────

  pub async fn filmography(&self, name: &str) -> Result<Vec<FilmographyEntry>> {
    let needle = name.to_lowercase();
    let persons = self.persons_by_id().await?;
    let principals: Vec<PrincipalRow> = self.find_all(names::PRINCIPALS).await?;
    let cast: Vec<CastRow> = self.find_all(names::MOVIE_CAST).await?;
    let characters: Vec<CharacterRow> = self.find_all(names::CHARACTERS).await?;
    let movies = self.movies_by_id().await?;
    let ratings = self.ratings_by_movie().await?;
    let titles = self.primary_title_by_movie().await?;

    let matched: HashSet<&String> = persons
      .iter()
      .filter(|(_, p)| contains_ci(&p.name, &needle))
      .map(|(id, _)| id)
      .collect();
    let character_names: HashMap<i64, String> = characters
      .into_iter()
      .map(|c| (c.character_id, c.name))
      .collect();
    let mut played: HashMap<(&str, &str), Vec<&str>> = HashMap::new();
    for entry in &cast {
      if let Some(name) = character_names.get(&entry.character_id) {
        played
          .entry((entry.movie_id.as_str(), entry.person_id.as_str()))
          .or_default()
          .push(name);
      }
    }

    let mut rows: Vec<(String, FilmographyEntry)> = Vec::new();
    for principal in &principals {
      if !matched.contains(&principal.person_id) {
        continue;
      }
      let Some(title) = titles.get(&principal.movie_id) else { continue };
      let year = movies.get(&principal.movie_id).and_then(|m| m.year);
      let rating = ratings
        .get(&principal.movie_id)
        .and_then(|r| r.average_rating);
      let entry = |character: Option<String>| FilmographyEntry {
        title: title.clone(),
        year,
        character,
        rating,
      };
      match played
        .get(&(principal.movie_id.as_str(), principal.person_id.as_str()))
      {
        Some(names) => {
          for name in names {
            rows
              .push((principal.movie_id.clone(), entry(Some((*name).to_owned()))));
          }
        }
        None => rows.push((principal.movie_id.clone(), entry(None))),
      }
    }

    rows.sort_by(|a, b| {
      b.1
        .year
        .cmp(&a.1.year)
        .then_with(|| a.0.cmp(&b.0))
        .then_with(|| a.1.character.cmp(&b.1.character))
    });
    Ok(rows.into_iter().map(|(_, e)| e).collect())
  }

  pub async fn top_n_by_genre(
    &self,
    genre: &str,
    start_year: i64,
    end_year: i64,
    n: u32,
  ) -> Result<Vec<TopMovie>> {
    let in_genre = self.movies_with_genre(&genre.to_lowercase()).await?;
    let movies = self.movies_by_id().await?;
    let ratings = self.ratings_by_movie().await?;
    let titles = self.primary_title_by_movie().await?;

    let mut top: Vec<TopMovie> = Vec::new();
    for movie_id in &in_genre {
      let Some(movie) = movies.get(movie_id) else { continue };
      let Some(title) = titles.get(movie_id) else { continue };
      let in_window = movie
        .year
        .is_some_and(|y| y >= start_year && y <= end_year);
      if !in_window {
        continue;
      }
      let Some(rating) = ratings.get(movie_id) else { continue };
      let Some(average) = rating.average_rating else { continue };
      top.push(TopMovie {
        movie_id: movie_id.clone(),
        title:    title.clone(),
        year:     movie.year,
        rating:   average,
        votes:    rating.num_votes,
      });
    }

    top.sort_by(|a, b| {
      b.rating
        .total_cmp(&a.rating)
        .then_with(|| a.movie_id.cmp(&b.movie_id))
    });
    top.truncate(n as usize);
    Ok(top)
  }

  pub async fn multi_role_actors(&self) -> Result<Vec<MultiRoleActor>> {
    let cast: Vec<CastRow> = self.find_all(names::MOVIE_CAST).await?;
    let persons = self.persons_by_id().await?;
    let titles = self.primary_title_by_movie().await?;

    let mut roles: HashMap<(&str, &str), HashSet<i64>> = HashMap::new();
    for entry in &cast {
      roles
        .entry((entry.person_id.as_str(), entry.movie_id.as_str()))
        .or_default()
        .insert(entry.character_id);
    }

    let mut actors: Vec<MultiRoleActor> = Vec::new();
    for ((person_id, movie_id), characters) in roles {
      if characters.len() < 2 {
        continue;
      }
      let Some(title) = titles.get(movie_id) else { continue };
      let name = persons.get(person_id).and_then(|p| p.name.clone());
      actors.push(MultiRoleActor {
        person_id: person_id.to_owned(),
        name,
        movie_id: movie_id.to_owned(),
        title: title.clone(),
        roles: characters.len() as i64,
      });
    }

    actors.sort_by(|a, b| {
      b.roles
        .cmp(&a.roles)
        .then_with(|| a.person_id.cmp(&b.person_id))
        .then_with(|| a.movie_id.cmp(&b.movie_id))
    });
    Ok(actors)
  }

  pub async fn collaborations(&self, actor: &str) -> Result<Vec<Collaboration>> {
    let needle = actor.to_lowercase();
    let persons = self.persons_by_id().await?;
    let principals: Vec<PrincipalRow> = self.find_all(names::PRINCIPALS).await?;
    let professions: Vec<ProfessionRow> =
      self.find_all(names::PROFESSIONS).await?;

    let jobs: HashMap<i64, String> = professions
      .into_iter()
      .map(|p| (p.profession_id, p.job_name.to_lowercase()))
      .collect();
    let job_of = |principal: &PrincipalRow| {
      principal
        .profession_id
        .and_then(|id| jobs.get(&id))
        .map(String::as_str)
    };

    // Movies where the queried actor holds an acting credit.
    let shared: HashSet<&str> = principals
      .iter()
      .filter(|p| {
        let acting = matches!(job_of(p), Some("actor" | "actress"));
        acting
          && persons
            .get(&p.person_id)
            .is_some_and(|person| contains_ci(&person.name, &needle))
      })
      .map(|p| p.movie_id.as_str())
      .collect();

    let mut movies_per_director: HashMap<&str, HashSet<&str>> = HashMap::new();
    for principal in &principals {
      if job_of(principal) == Some("director")
        && shared.contains(principal.movie_id.as_str())
      {
        movies_per_director
          .entry(principal.person_id.as_str())
          .or_default()
          .insert(principal.movie_id.as_str());
      }
    }

    let mut collabs: Vec<(String, Collaboration)> = movies_per_director
      .into_iter()
      .map(|(person_id, movies)| {
        let name = persons.get(person_id).and_then(|p| p.name.clone());
        (
          person_id.to_owned(),
          Collaboration { name, movies: movies.len() as i64 },
        )
      })
      .collect();

    collabs.sort_by(|a, b| {
      b.1.movies.cmp(&a.1.movies).then_with(|| a.0.cmp(&b.0))
    });
    Ok(collabs.into_iter().map(|(_, c)| c).collect())
  }

  pub async fn popular_genres(&self) -> Result<Vec<PopularGenre>> {
    let genres: Vec<GenreRow> = self.find_all(names::GENRES).await?;
    let links: Vec<MovieGenreRow> = self.find_all(names::MOVIE_GENRES).await?;
    let ratings = self.ratings_by_movie().await?;

    let mut tally: HashMap<i64, (i64, f64, i64)> = HashMap::new();
    for link in &links {
      let Some(rating) = ratings.get(&link.movie_id) else { continue };
      let entry = tally.entry(link.genre_id).or_default();
      entry.0 += 1;
      if let Some(average) = rating.average_rating {
        entry.1 += average;
        entry.2 += 1;
      }
    }

    let mut popular: Vec<PopularGenre> = Vec::new();
    for genre in genres {
      let Some(&(movies, sum, rated)) = tally.get(&genre.genre_id) else {
        continue;
      };
      if rated == 0 || movies <= 50 {
        continue;
      }
      let avg_rating = sum / rated as f64;
      if avg_rating > 7.0 {
        popular.push(PopularGenre { genre: genre.genre_name, avg_rating, movies });
      }
    }

    popular.sort_by(|a, b| {
      b.avg_rating
        .total_cmp(&a.avg_rating)
        .then_with(|| a.genre.cmp(&b.genre))
    });
    Ok(popular)
  }

  pub async fn career_by_decade(&self, name: &str) -> Result<Vec<DecadeActivity>> {
    let needle = name.to_lowercase();
    let persons = self.persons_by_id().await?;
    let cast: Vec<CastRow> = self.find_all(names::MOVIE_CAST).await?;
    let movies = self.movies_by_id().await?;
    let ratings = self.ratings_by_movie().await?;

    struct Bucket<'a> {
      movies: HashSet<&'a str>,
      sum:    f64,
      rated:  i64,
    }
    let mut buckets: HashMap<i64, Bucket> = HashMap::new();
    for entry in &cast {
      let matched = persons
        .get(&entry.person_id)
        .is_some_and(|p| contains_ci(&p.name, &needle));
      if !matched {
        continue;
      }
      let Some(year) = movies.get(&entry.movie_id).and_then(|m| m.year) else {
        continue;
      };
      let bucket = buckets.entry(year - year.rem_euclid(10)).or_insert(Bucket {
        movies: HashSet::new(),
        sum:    0.0,
        rated:  0,
      });
      bucket.movies.insert(entry.movie_id.as_str());
      if let Some(average) =
        ratings.get(&entry.movie_id).and_then(|r| r.average_rating)
      {
        bucket.sum += average;
        bucket.rated += 1;
      }
    }

    let mut decades: Vec<DecadeActivity> = buckets
      .into_iter()
      .map(|(decade, bucket)| DecadeActivity {
        decade,
        movies: bucket.movies.len() as i64,
        avg_rating: (bucket.rated > 0)
          .then(|| bucket.sum / bucket.rated as f64),
      })
      .collect();

    decades.sort_by(|a, b| b.decade.cmp(&a.decade));
    Ok(decades)
  }

  pub async fn genre_ranking(&self) -> Result<Vec<GenreRankEntry>> {
    let genres: Vec<GenreRow> = self.find_all(names::GENRES).await?;
    let links: Vec<MovieGenreRow> = self.find_all(names::MOVIE_GENRES).await?;
    let ratings = self.ratings_by_movie().await?;
    let titles = self.primary_title_by_movie().await?;

    let mut per_genre: HashMap<i64, Vec<(f64, &str)>> = HashMap::new();
    for link in &links {
      let Some(average) =
        ratings.get(&link.movie_id).and_then(|r| r.average_rating)
      else {
        continue;
      };
      let Some(title) = titles.get(&link.movie_id) else { continue };
      per_genre.entry(link.genre_id).or_default().push((average, title));
    }

    let mut ranking: Vec<GenreRankEntry> = Vec::new();
    for genre in genres {
      let Some(candidates) = per_genre.get_mut(&genre.genre_id) else {
        continue;
      };
      candidates.sort_by(|a, b| b.0.total_cmp(&a.0));

      // Competition ranking: ties share a rank, the next rank skips ahead.
      let mut rank = 0i64;
      let mut previous: Option<f64> = None;
      for (position, (rating, title)) in candidates.iter().enumerate() {
        if previous != Some(*rating) {
          rank = position as i64 + 1;
          previous = Some(*rating);
        }
        if rank > 3 {
          break;
        }
        ranking.push(GenreRankEntry {
          genre: genre.genre_name.clone(),
          title: (*title).to_owned(),
          rank,
        });
      }
    }

    ranking.sort_by(|a, b| {
      a.genre
        .cmp(&b.genre)
        .then_with(|| a.rank.cmp(&b.rank))
        .then_with(|| a.title.cmp(&b.title))
    });
    Ok(ranking)
  }

  pub async fn breakout_careers(&self) -> Result<Vec<Breakout>> {
    let persons = self.persons_by_id().await?;
    let principals: Vec<PrincipalRow> = self.find_all(names::PRINCIPALS).await?;
    let movies = self.movies_by_id().await?;
    let ratings = self.ratings_by_movie().await?;
    let titles = self.primary_title_by_movie().await?;

    // Per person: earliest movie above the vote threshold, and the most
    // recent one at or below it.
    let mut first_hit: HashMap<&str, (Option<i64>, &str)> = HashMap::new();
    let mut last_low: HashMap<&str, (Option<i64>, &str)> = HashMap::new();
    for principal in &principals {
      let Some(votes) =
        ratings.get(&principal.movie_id).and_then(|r| r.num_votes)
      else {
        continue;
      };
      let year = movies.get(&principal.movie_id).and_then(|m| m.year);
      let candidate = (year, principal.movie_id.as_str());
      if votes > 200_000 {
        let slot = first_hit
          .entry(principal.person_id.as_str())
          .or_insert(candidate);
        if candidate < *slot {
          *slot = candidate;
        }
      } else {
        let slot = last_low
          .entry(principal.person_id.as_str())
          .or_insert(candidate);
        if candidate > *slot {
          *slot = candidate;
        }
      }
    }

    let mut breakouts: Vec<(String, Breakout)> = Vec::new();
    for (person_id, (hit_year, hit_movie)) in first_hit {
      let rose = match last_low.get(person_id) {
        None => true,
        Some((low_year, _)) => match (hit_year, low_year) {
          (_, None) => true,
          (Some(hit), Some(low)) => hit > *low,
          (None, Some(_)) => false,
        },
      };
      if !rose {
        continue;
      }
      let Some(person) = persons.get(person_id) else { continue };
      let Some(title) = titles.get(hit_movie) else { continue };
      breakouts.push((
        person_id.to_owned(),
        Breakout { name: person.name.clone(), title: title.clone(), year: hit_year },
      ));
    }

    breakouts.sort_by(|a, b| {
      a.1.name.cmp(&b.1.name).then_with(|| a.0.cmp(&b.0))
    });
    Ok(breakouts.into_iter().map(|(_, b)| b).collect())
  }

  pub async fn child_actors(&self) -> Result<Vec<ChildActor>> {
    let persons = self.persons_by_id().await?;
    let cast: Vec<CastRow> = self.find_all(names::MOVIE_CAST).await?;
    let movies = self.movies_by_id().await?;
    let ratings = self.ratings_by_movie().await?;
    let titles = self.primary_title_by_movie().await?;

    let mut children: Vec<ChildActor> = Vec::new();
    for entry in &cast {
      let Some(votes) =
        ratings.get(&entry.movie_id).and_then(|r| r.num_votes)
      else {
        continue;
      };
      if votes <= 200_000 {
        continue;
      }
      let Some(title) = titles.get(&entry.movie_id) else { continue };
      let Some(person) = persons.get(&entry.person_id) else { continue };
      let age = match (
        movies.get(&entry.movie_id).and_then(|m| m.year),
        person.birth_year,
      ) {
        (Some(year), Some(birth)) => year - birth,
        _ => continue,
      };
      if age >= 18 {
        continue;
      }
      children.push(ChildActor {
        name: person.name.clone(),
        title: title.clone(),
        votes,
        age,
      });
    }

    children.sort_by(|a, b| {
      a.name
        .cmp(&b.name)
        .then_with(|| a.age.cmp(&b.age))
        .then_with(|| a.title.cmp(&b.title))
    });
    Ok(children)
  }

  // ─── Recommendation samples ────────────────────────────────────────────────

  /// Up to `n` movies sharing a director with `movie_id`, drawn at random
  /// from the assembled documents. The source movie is never returned;
  /// an unknown id yields an empty sample.
  pub async fn related_by_directors(
    &self,
    movie_id: &str,
    n: usize,
  ) -> Result<Vec<MovieSummary>> {
    let Some(source) = self
      .find_by_key::<MovieComplete>(names::MOVIES_COMPLETE, movie_id)
      .await?
    else {
      return Ok(Vec::new());
    };
    let directors: HashSet<&str> = source
      .directors
      .iter()
      .map(|d| d.person_id.as_str())
      .collect();
    if directors.is_empty() {
      return Ok(Vec::new());
    }

    let candidates: Vec<String> = self
      .find_all::<MovieComplete>(names::MOVIES_COMPLETE)
      .await?
      .into_iter()
      .filter(|m| {
        m.movie_id != movie_id
          && m
            .directors
            .iter()
            .any(|d| directors.contains(d.person_id.as_str()))
      })
      .map(|m| m.movie_id)
      .collect();
    self.sample_summaries(&candidates, n).await
  }

  /// Up to `n` movies sharing a genre with `movie_id`, drawn at random
  /// from the assembled documents.
  pub async fn related_by_genres(
    &self,
    movie_id: &str,
    n: usize,
  ) -> Result<Vec<MovieSummary>> {
    let Some(source) = self
      .find_by_key::<MovieComplete>(names::MOVIES_COMPLETE, movie_id)
      .await?
    else {
      return Ok(Vec::new());
    };
    let genres: HashSet<&str> =
      source.genres.iter().map(String::as_str).collect();
    if genres.is_empty() {
      return Ok(Vec::new());
    }

    let candidates: Vec<String> = self
      .find_all::<MovieComplete>(names::MOVIES_COMPLETE)
      .await?
      .into_iter()
      .filter(|m| {
        m.movie_id != movie_id
          && m.genres.iter().any(|g| genres.contains(g.as_str()))
      })
      .map(|m| m.movie_id)
      .collect();
    self.sample_summaries(&candidates, n).await
  }

  async fn sample_summaries(
    &self,
    keys: &[String],
    n: usize,
  ) -> Result<Vec<MovieSummary>> {
    let sampled: Vec<MovieComplete> =
      self.sample_by_keys(names::MOVIES_COMPLETE, keys, n).await?;
    Ok(
      sampled
        .into_iter()
        .map(|m| MovieSummary {
          movie_id: m.movie_id,
          title:    m.title.unwrap_or_default(),
        })
        .collect(),
    )
  }
}
