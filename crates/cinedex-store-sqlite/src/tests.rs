use cinedex_core::{
  entity::{
    MovieRow, NewCastEntry, NewMovieGenre, NewPrincipal, NewTitleLink,
    PersonRow, RatingRow, TitleFlagFix, TitleOrderingRow,
  },
  query::{FilmFilter, SortKey, SortOrder},
};

use crate::{Error, SqliteStore};

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory().await.expect("open in-memory store")
}

fn movie(id: &str, year: i64, title: &str) -> MovieRow {
  MovieRow {
    movie_id:        id.to_owned(),
    year:            Some(year),
    runtime_minutes: Some(100),
    primary_title:   Some(title.to_owned()),
    original_title:  None,
  }
}

fn person(id: &str, name: &str, birth_year: Option<i64>) -> PersonRow {
  PersonRow {
    person_id: id.to_owned(),
    name: Some(name.to_owned()),
    birth_year,
    death_year: None,
  }
}

fn rating(movie_id: &str, average: f64, votes: i64) -> RatingRow {
  RatingRow {
    movie_id:       movie_id.to_owned(),
    average_rating: Some(average),
    num_votes:      Some(votes),
  }
}

/// Register `title` in the naming pool and link it to `movie_id` as the
/// resolved primary and original title.
async fn link_primary_title(store: &SqliteStore, movie_id: &str, title: &str) {
  store.import_titles(vec![title.to_owned()]).await.unwrap();
  let lookup = store.title_lookup().await.unwrap();
  let title_id = lookup[&title.to_lowercase()];
  store
    .import_title_links(vec![NewTitleLink {
      movie_id: movie_id.to_owned(),
      title_id,
      is_primary: true,
      is_original: true,
    }])
    .await
    .unwrap();
}

async fn add_rated_movie(
  store: &SqliteStore,
  id: &str,
  year: i64,
  title: &str,
  average: f64,
  votes: i64,
) {
  store.import_movies(vec![movie(id, year, title)]).await.unwrap();
  link_primary_title(store, id, title).await;
  store.import_ratings(vec![rating(id, average, votes)]).await.unwrap();
}

async fn add_principal(
  store: &SqliteStore,
  movie_id: &str,
  ordering: i64,
  person_id: &str,
  job: &str,
) {
  store
    .import_principals(vec![NewPrincipal {
      movie_id:  movie_id.to_owned(),
      ordering,
      person_id: person_id.to_owned(),
      job_name:  Some(job.to_owned()),
      category:  Some(job.to_owned()),
    }])
    .await
    .unwrap();
}

async fn add_cast(
  store: &SqliteStore,
  movie_id: &str,
  person_id: &str,
  character: &str,
) {
  store.import_characters(vec![character.to_owned()]).await.unwrap();
  store
    .import_cast_entries(vec![NewCastEntry {
      movie_id:       movie_id.to_owned(),
      person_id:      person_id.to_owned(),
      character_name: character.to_owned(),
    }])
    .await
    .unwrap();
}

/// `count` rated movies sharing one genre, for aggregate boundary tests.
async fn seed_genre_block(
  store: &SqliteStore,
  genre: &str,
  prefix: &str,
  count: usize,
  average: f64,
) {
  store.import_genres(vec![genre.to_owned()]).await.unwrap();
  let movies: Vec<_> = (0..count)
    .map(|i| movie(&format!("{prefix}{i:03}"), 2000, "placeholder"))
    .collect();
  let ratings: Vec<_> = movies
    .iter()
    .map(|m| rating(&m.movie_id, average, 1000))
    .collect();
  let links: Vec<_> = movies
    .iter()
    .map(|m| NewMovieGenre {
      movie_id:   m.movie_id.clone(),
      genre_name: genre.to_owned(),
    })
    .collect();
  store.import_movies(movies).await.unwrap();
  store.import_ratings(ratings).await.unwrap();
  store.import_movie_genres(links).await.unwrap();
}

// ─── Import semantics ────────────────────────────────────────────────────────

#[tokio::test]
async fn movie_rows_violating_checks_are_skipped() {
  let store = store().await;
  let report = store
    .import_movies(vec![
      movie("tt1", 1999, "Fine"),
      movie("tt2", 1800, "Too Early"),
      MovieRow { runtime_minutes: Some(0), ..movie("tt3", 1999, "Zero Runtime") },
    ])
    .await
    .unwrap();

  assert_eq!(report.attempted, 3);
  assert_eq!(report.inserted, 1);
  assert_eq!(report.skipped, 2);
  assert_eq!(store.dump_movies().await.unwrap().len(), 1);
}

#[tokio::test]
async fn person_rows_violating_checks_are_skipped() {
  let store = store().await;
  let report = store
    .import_persons(vec![
      person("nm1", "Fine", Some(1950)),
      person("nm2", "Born Too Early", Some(1700)),
      PersonRow { death_year: Some(1940), ..person("nm3", "Died Before Birth", Some(1950)) },
    ])
    .await
    .unwrap();

  assert_eq!(report.inserted, 1);
  assert_eq!(report.skipped, 2);
}

#[tokio::test]
async fn rerunning_an_import_inserts_nothing() {
  let store = store().await;
  let rows = vec![movie("tt1", 2000, "Once"), movie("tt2", 2001, "Twice")];

  let first = store.import_movies(rows.clone()).await.unwrap();
  assert_eq!(first.inserted, 2);

  let second = store.import_movies(rows).await.unwrap();
  assert_eq!(second.inserted, 0);
  assert_eq!(second.skipped, 2);
  assert_eq!(store.dump_movies().await.unwrap().len(), 2);
}

#[tokio::test]
async fn title_pool_is_case_insensitively_unique() {
  let store = store().await;
  let report = store
    .import_titles(vec![
      "The Matrix".to_owned(),
      "the matrix".to_owned(),
      "THE MATRIX".to_owned(),
    ])
    .await
    .unwrap();

  assert_eq!(report.inserted, 1);
  assert_eq!(report.skipped, 2);

  let lookup = store.title_lookup().await.unwrap();
  assert_eq!(lookup.len(), 1);
  assert!(lookup.contains_key("the matrix"));
}

#[tokio::test]
async fn unresolvable_genre_name_skips_the_row() {
  let store = store().await;
  store.import_movies(vec![movie("tt1", 2000, "A")]).await.unwrap();
  store.import_genres(vec!["Drama".to_owned()]).await.unwrap();

  let report = store
    .import_movie_genres(vec![
      NewMovieGenre { movie_id: "tt1".to_owned(), genre_name: "drama".to_owned() },
      NewMovieGenre { movie_id: "tt1".to_owned(), genre_name: "NoSuchGenre".to_owned() },
    ])
    .await
    .unwrap();

  assert_eq!(report.inserted, 1);
  assert_eq!(report.skipped, 1);
}

#[tokio::test]
async fn title_ordering_requires_an_existing_link() {
  let store = store().await;
  store.import_movies(vec![movie("tt1", 2000, "A")]).await.unwrap();
  link_primary_title(&store, "tt1", "A").await;
  let title_id = store.title_lookup().await.unwrap()["a"];

  let report = store
    .import_title_orderings(vec![
      TitleOrderingRow {
        movie_id: "tt1".to_owned(),
        ordering: 1,
        title_id,
        region:   Some("US".to_owned()),
        language: None,
      },
      // No movie_titles link for this title id.
      TitleOrderingRow {
        movie_id: "tt1".to_owned(),
        ordering: 2,
        title_id: title_id + 999,
        region:   None,
        language: None,
      },
    ])
    .await
    .unwrap();

  assert_eq!(report.inserted, 1);
  assert_eq!(report.skipped, 1);
}

#[tokio::test]
async fn title_flag_fixes_clear_violations() {
  let store = store().await;
  store.import_movies(vec![movie("tt1", 2000, "A")]).await.unwrap();
  store
    .import_titles(vec!["A".to_owned(), "B".to_owned()])
    .await
    .unwrap();
  let lookup = store.title_lookup().await.unwrap();
  store
    .import_title_links(vec![
      NewTitleLink {
        movie_id:    "tt1".to_owned(),
        title_id:    lookup["a"],
        is_primary:  true,
        is_original: true,
      },
      NewTitleLink {
        movie_id:    "tt1".to_owned(),
        title_id:    lookup["b"],
        is_primary:  true,
        is_original: false,
      },
    ])
    .await
    .unwrap();

  assert_eq!(store.title_flag_violations().await.unwrap(), vec!["tt1"]);

  let links = store.title_links().await.unwrap();
  let extra = links.iter().find(|l| l.title_id == lookup["b"]).unwrap();
  let updated = store
    .update_title_flags(vec![TitleFlagFix {
      link_id:     extra.link_id,
      is_primary:  false,
      is_original: false,
    }])
    .await
    .unwrap();

  assert_eq!(updated, 1);
  assert!(store.title_flag_violations().await.unwrap().is_empty());
}

// ─── Analytical queries ──────────────────────────────────────────────────────

#[tokio::test]
async fn filmography_reports_uncredited_appearances_with_null_character() {
  let store = store().await;
  store
    .import_persons(vec![person("nm1", "Paula Star", Some(1970))])
    .await
    .unwrap();
  add_rated_movie(&store, "tt1", 2001, "Solo Flight", 7.2, 500).await;
  add_rated_movie(&store, "tt2", 2004, "Second Wind", 6.8, 500).await;
  add_principal(&store, "tt1", 1, "nm1", "actress").await;
  add_principal(&store, "tt2", 1, "nm1", "actress").await;
  add_cast(&store, "tt2", "nm1", "The Pilot").await;

  let entries = store.filmography("Paula").await.unwrap();
  assert_eq!(entries.len(), 2);
  // Newest first.
  assert_eq!(entries[0].title, "Second Wind");
  assert_eq!(entries[0].character.as_deref(), Some("The Pilot"));
  assert_eq!(entries[1].title, "Solo Flight");
  assert_eq!(entries[1].character, None);
}

#[tokio::test]
async fn top_n_by_genre_respects_year_window_and_limit() {
  let store = store().await;
  store.import_genres(vec!["Sci-Fi".to_owned()]).await.unwrap();
  add_rated_movie(&store, "tt1", 1999, "Edge of Night", 8.5, 1000).await;
  add_rated_movie(&store, "tt2", 2010, "Starfall", 9.0, 1000).await;
  add_rated_movie(&store, "tt3", 1980, "Old Glory", 9.5, 1000).await;
  for id in ["tt1", "tt2", "tt3"] {
    store
      .import_movie_genres(vec![NewMovieGenre {
        movie_id:   id.to_owned(),
        genre_name: "Sci-Fi".to_owned(),
      }])
      .await
      .unwrap();
  }

  let top = store.top_n_by_genre("sci", 1990, 2015, 2).await.unwrap();
  assert_eq!(top.len(), 2);
  assert_eq!(top[0].title, "Starfall");
  assert_eq!(top[1].title, "Edge of Night");
}

#[tokio::test]
async fn multi_role_actors_need_more_than_one_distinct_character() {
  let store = store().await;
  store
    .import_persons(vec![person("nm1", "Eddie Versatile", Some(1961))])
    .await
    .unwrap();
  add_rated_movie(&store, "tt1", 1996, "Mirror Act", 7.0, 100).await;
  add_rated_movie(&store, "tt2", 1998, "One Hat", 7.0, 100).await;
  add_cast(&store, "tt1", "nm1", "Hero").await;
  add_cast(&store, "tt1", "nm1", "Villain").await;
  add_cast(&store, "tt2", "nm1", "Hero").await;

  let actors = store.multi_role_actors().await.unwrap();
  assert_eq!(actors.len(), 1);
  assert_eq!(actors[0].movie_id, "tt1");
  assert_eq!(actors[0].roles, 2);
}

#[tokio::test]
async fn collaborations_count_distinct_shared_movies() {
  let store = store().await;
  store
    .import_persons(vec![
      person("nm1", "Avery Lead", Some(1970)),
      person("nm2", "Dana Helm", Some(1960)),
    ])
    .await
    .unwrap();
  store
    .import_professions(vec!["actor".to_owned(), "director".to_owned()])
    .await
    .unwrap();
  add_rated_movie(&store, "tt1", 2000, "First Cut", 7.0, 100).await;
  add_rated_movie(&store, "tt2", 2003, "Final Cut", 7.5, 100).await;
  for id in ["tt1", "tt2"] {
    add_principal(&store, id, 1, "nm1", "actor").await;
    add_principal(&store, id, 2, "nm2", "director").await;
  }

  let collabs = store.collaborations("Avery").await.unwrap();
  assert_eq!(collabs.len(), 1);
  assert_eq!(collabs[0].name.as_deref(), Some("Dana Helm"));
  assert_eq!(collabs[0].movies, 2);
}

#[tokio::test]
async fn popular_genres_require_strictly_more_than_fifty_movies() {
  let store = store().await;
  seed_genre_block(&store, "Epic", "ep", 51, 7.5).await;
  seed_genre_block(&store, "Short", "sh", 50, 9.0).await;

  let genres = store.popular_genres().await.unwrap();
  assert_eq!(genres.len(), 1);
  assert_eq!(genres[0].genre, "Epic");
  assert_eq!(genres[0].movies, 51);
}

#[tokio::test]
async fn popular_genres_require_average_strictly_above_seven() {
  let store = store().await;
  seed_genre_block(&store, "Flat", "fl", 51, 7.0).await;

  assert!(store.popular_genres().await.unwrap().is_empty());
}

#[tokio::test]
async fn career_by_decade_groups_and_sorts_descending() {
  let store = store().await;
  store
    .import_persons(vec![person("nm1", "Morgan Steady", Some(1955))])
    .await
    .unwrap();
  store.import_movies(vec![
    movie("tt1", 1994, "A"),
    movie("tt2", 1996, "B"),
    movie("tt3", 2003, "C"),
  ]).await.unwrap();
  store
    .import_ratings(vec![rating("tt1", 6.0, 100), rating("tt2", 8.0, 100)])
    .await
    .unwrap();
  for id in ["tt1", "tt2", "tt3"] {
    add_cast(&store, id, "nm1", "Lead").await;
  }

  let decades = store.career_by_decade("Morgan").await.unwrap();
  assert_eq!(decades.len(), 2);
  assert_eq!(decades[0].decade, 2000);
  assert_eq!(decades[0].movies, 1);
  assert_eq!(decades[0].avg_rating, None);
  assert_eq!(decades[1].decade, 1990);
  assert_eq!(decades[1].movies, 2);
  assert_eq!(decades[1].avg_rating, Some(7.0));
}

#[tokio::test]
async fn genre_ranking_skips_ranks_after_ties() {
  let store = store().await;
  store.import_genres(vec!["Noir".to_owned()]).await.unwrap();
  add_rated_movie(&store, "tt1", 1950, "Alpha Shadow", 9.0, 100).await;
  add_rated_movie(&store, "tt2", 1951, "Beta Shadow", 9.0, 100).await;
  add_rated_movie(&store, "tt3", 1952, "Gamma Shadow", 8.0, 100).await;
  add_rated_movie(&store, "tt4", 1953, "Delta Shadow", 7.0, 100).await;
  for id in ["tt1", "tt2", "tt3", "tt4"] {
    store
      .import_movie_genres(vec![NewMovieGenre {
        movie_id:   id.to_owned(),
        genre_name: "Noir".to_owned(),
      }])
      .await
      .unwrap();
  }

  let ranking = store.genre_ranking().await.unwrap();
  let ranks: Vec<_> =
    ranking.iter().map(|e| (e.rank, e.title.as_str())).collect();
  // Two tied at 1, the next rank is 3, and rank 4 falls outside the top 3.
  assert_eq!(
    ranks,
    vec![(1, "Alpha Shadow"), (1, "Beta Shadow"), (3, "Gamma Shadow")]
  );
}

#[tokio::test]
async fn breakout_careers_cover_all_three_cases() {
  let store = store().await;
  store
    .import_persons(vec![
      person("nm1", "Abel Riser", Some(1970)),
      person("nm2", "Bora Fader", Some(1970)),
      person("nm3", "Cato Sudden", Some(1970)),
      person("nm4", "Dale Edge", Some(1970)),
    ])
    .await
    .unwrap();
  store.import_professions(vec!["actor".to_owned()]).await.unwrap();

  // Abel: low-vote movie, then a hit afterwards.
  add_rated_movie(&store, "la1", 2000, "Small Start", 6.0, 1000).await;
  add_rated_movie(&store, "la2", 2005, "Big Break", 8.0, 300_000).await;
  add_principal(&store, "la1", 1, "nm1", "actor").await;
  add_principal(&store, "la2", 1, "nm1", "actor").await;

  // Bora: hit first, low-vote movie afterwards.
  add_rated_movie(&store, "hb1", 2000, "Early Peak", 8.0, 300_000).await;
  add_rated_movie(&store, "lb2", 2005, "Late Slide", 6.0, 1000).await;
  add_principal(&store, "hb1", 1, "nm2", "actor").await;
  add_principal(&store, "lb2", 1, "nm2", "actor").await;

  // Cato: only ever above the threshold.
  add_rated_movie(&store, "hc1", 2010, "Instant Hit", 8.5, 250_000).await;
  add_principal(&store, "hc1", 1, "nm3", "actor").await;

  // Dale: exactly 200k votes counts as the low side.
  add_rated_movie(&store, "ld1", 2010, "Near Miss", 8.5, 200_000).await;
  add_principal(&store, "ld1", 1, "nm4", "actor").await;

  let breakouts = store.breakout_careers().await.unwrap();
  let names: Vec<_> =
    breakouts.iter().map(|b| b.name.as_deref().unwrap()).collect();
  assert_eq!(names, vec!["Abel Riser", "Cato Sudden"]);
  assert_eq!(breakouts[0].title, "Big Break");
  assert_eq!(breakouts[0].year, Some(2005));
}

#[tokio::test]
async fn child_actors_apply_age_and_vote_boundaries() {
  let store = store().await;
  store
    .import_persons(vec![person("nm1", "Robin Young", Some(1990))])
    .await
    .unwrap();
  add_rated_movie(&store, "tt1", 2007, "Seventeen", 7.0, 200_001).await;
  add_rated_movie(&store, "tt2", 2008, "Eighteen", 7.0, 200_001).await;
  add_rated_movie(&store, "tt3", 2007, "Unseen", 7.0, 200_000).await;
  for id in ["tt1", "tt2", "tt3"] {
    add_cast(&store, id, "nm1", "The Kid").await;
  }

  let children = store.child_actors().await.unwrap();
  assert_eq!(children.len(), 1);
  assert_eq!(children[0].title, "Seventeen");
  assert_eq!(children[0].age, 17);
  assert_eq!(children[0].votes, 200_001);
}

// ─── Catalog queries ─────────────────────────────────────────────────────────

#[tokio::test]
async fn top_ranked_ties_share_a_rank_and_extend_the_result() {
  let store = store().await;
  add_rated_movie(&store, "tt1", 2000, "First Equal", 9.0, 150_000).await;
  add_rated_movie(&store, "tt2", 2001, "Also First", 9.0, 150_000).await;
  add_rated_movie(&store, "tt3", 2002, "Third Place", 8.0, 150_000).await;
  add_rated_movie(&store, "tt4", 2003, "Unpopular", 9.5, 50_000).await;

  let ranked = store.top_ranked_movies(1).await.unwrap();
  assert_eq!(ranked.len(), 2);
  assert!(ranked.iter().all(|m| m.rank == 1));
  // Under 100k votes never qualifies, whatever the rating.
  assert!(ranked.iter().all(|m| m.movie_id != "tt4"));
}

#[tokio::test]
async fn film_list_paginates_and_sorts() {
  let store = store().await;
  store.import_genres(vec!["Drama".to_owned()]).await.unwrap();
  for i in 0..25i64 {
    let id = format!("tt{i:03}");
    add_rated_movie(&store, &id, 2000 + i, &format!("Film {i:03}"), 5.0, 100)
      .await;
    store
      .import_movie_genres(vec![NewMovieGenre {
        movie_id:   id,
        genre_name: "Drama".to_owned(),
      }])
      .await
      .unwrap();
  }

  let filter = FilmFilter::default();
  let first = store
    .film_list(&filter, 1, SortKey::Year, SortOrder::Desc)
    .await
    .unwrap();
  assert_eq!(first.items.len(), 20);
  assert_eq!(first.total, 25);
  assert_eq!(first.page_count(), 2);
  assert_eq!(first.items[0].year, Some(2024));

  let second = store
    .film_list(&filter, 2, SortKey::Year, SortOrder::Desc)
    .await
    .unwrap();
  assert_eq!(second.items.len(), 5);
  assert_eq!(second.items[4].year, Some(2000));
}

#[tokio::test]
async fn film_list_rejects_page_zero() {
  let store = store().await;
  let err = store
    .film_list(&FilmFilter::default(), 0, SortKey::Title, SortOrder::Asc)
    .await
    .unwrap_err();
  assert!(matches!(err, Error::Core(cinedex_core::Error::InvalidPage(0))));
}

#[tokio::test]
async fn search_by_title_is_paginated_and_alphabetical() {
  let store = store().await;
  add_rated_movie(&store, "tt1", 2000, "Winter Light", 7.0, 100).await;
  add_rated_movie(&store, "tt2", 2001, "Autumn Light", 7.0, 100).await;
  add_rated_movie(&store, "tt3", 2002, "Dark Harbor", 7.0, 100).await;

  let page = store.search_by_title("Light", 1).await.unwrap();
  assert_eq!(page.total, 2);
  let titles: Vec<_> = page.items.iter().map(|m| m.title.as_str()).collect();
  assert_eq!(titles, vec!["Autumn Light", "Winter Light"]);
}

#[tokio::test]
async fn counts_by_genre_and_decade() {
  let store = store().await;
  store
    .import_genres(vec!["Drama".to_owned(), "Comedy".to_owned()])
    .await
    .unwrap();
  store.import_movies(vec![
    movie("tt1", 1994, "A"),
    movie("tt2", 1996, "B"),
    movie("tt3", 2003, "C"),
  ]).await.unwrap();
  store
    .import_movie_genres(vec![
      NewMovieGenre { movie_id: "tt1".to_owned(), genre_name: "Drama".to_owned() },
      NewMovieGenre { movie_id: "tt2".to_owned(), genre_name: "Drama".to_owned() },
      NewMovieGenre { movie_id: "tt3".to_owned(), genre_name: "Comedy".to_owned() },
    ])
    .await
    .unwrap();

  let by_genre = store.movies_count_by_genre().await.unwrap();
  let genre_counts: Vec<_> =
    by_genre.iter().map(|g| (g.genre.as_str(), g.movies)).collect();
  assert_eq!(genre_counts, vec![("Comedy", 1), ("Drama", 2)]);

  let by_decade = store.movies_count_by_decade().await.unwrap();
  let decade_counts: Vec<_> =
    by_decade.iter().map(|d| (d.decade, d.movies)).collect();
  assert_eq!(decade_counts, vec![(1990, 2), (2000, 1)]);
}

#[tokio::test]
async fn basic_stats_count_actors_and_directors() {
  let store = store().await;
  store
    .import_persons(vec![
      person("nm1", "Ada Act", Some(1970)),
      person("nm2", "Bea Act", Some(1971)),
      person("nm3", "Cal Helm", Some(1960)),
    ])
    .await
    .unwrap();
  store
    .import_professions(vec![
      "actor".to_owned(),
      "actress".to_owned(),
      "director".to_owned(),
    ])
    .await
    .unwrap();
  store
    .import_person_professions(vec![
      cinedex_core::entity::NewPersonProfession {
        person_id: "nm1".to_owned(),
        job_name:  "actor".to_owned(),
      },
      cinedex_core::entity::NewPersonProfession {
        person_id: "nm2".to_owned(),
        job_name:  "actress".to_owned(),
      },
      cinedex_core::entity::NewPersonProfession {
        person_id: "nm3".to_owned(),
        job_name:  "director".to_owned(),
      },
    ])
    .await
    .unwrap();

  let stats = store.basic_stats().await.unwrap();
  assert_eq!(stats.movies, 0);
  assert_eq!(stats.actors, 2);
  assert_eq!(stats.directors, 1);
}
