use std::{fs, path::Path};

use cinedex_store_sqlite::SqliteStore;

use crate::Loader;

fn write_extract(dir: &Path) {
  fs::write(
    dir.join("movies.csv"),
    "mid,primary_title,original_title,year,runtime_minutes\n\
     tt1,The Matrix,,1999,136\n\
     tt2,Amelie,Le Fabuleux Destin,2001,122\n\
     ttbad,Bad Movie,,1700,90\n",
  )
  .unwrap();
  fs::write(
    dir.join("persons.csv"),
    "pid,name,birth_year,death_year\n\
     nm1,Keanu Reeves,1964,\n\
     nm2,Too Old,1600,\n",
  )
  .unwrap();
  fs::write(
    dir.join("titles.csv"),
    "mid,ordering,title,region,language,is_original\n\
     tt1,1,The Matrix,US,,1\n\
     tt1,2,Matrix,DE,de,0\n\
     tt1,3,,,,\n\
     tt2,1,Amelie,US,,0\n\
     tt2,2,Le Fabuleux Destin,FR,fr,1\n",
  )
  .unwrap();
  fs::write(
    dir.join("genres.csv"),
    "mid,genre\n\
     tt1,Action\n\
     tt1,Sci-Fi\n\
     tt2,Comedy\n\
     ttbad,Action\n",
  )
  .unwrap();
  fs::write(
    dir.join("professions.csv"),
    "pid,job_name\nnm1,actor\n",
  )
  .unwrap();
  fs::write(
    dir.join("characters.csv"),
    "mid,pid,name\ntt1,nm1,Neo\n",
  )
  .unwrap();
  fs::write(
    dir.join("ratings.csv"),
    "mid,average_rating,num_votes\n\
     tt1,8.7,2000000\n\
     tt2,8.3,700000\n",
  )
  .unwrap();
  fs::write(
    dir.join("principals.csv"),
    "mid,ordering,pid,job_name,category\ntt1,1,nm1,actor,actor\n",
  )
  .unwrap();
  fs::write(
    dir.join("knownformovies.csv"),
    "pid,mid\nnm1,tt1\n",
  )
  .unwrap();
}

#[tokio::test]
async fn full_extract_loads_in_dependency_order() {
  let dir = tempfile::tempdir().unwrap();
  write_extract(dir.path());
  let store = SqliteStore::open_in_memory().await.unwrap();
  let loader = Loader::new(store.clone(), dir.path());

  let reports = loader.run().await.unwrap();
  let by_entity: Vec<_> = reports
    .iter()
    .map(|r| (r.entity, r.inserted, r.skipped))
    .collect();
  assert_eq!(
    by_entity,
    vec![
      ("movies", 2, 1),       // year 1700 fails the check constraint
      ("persons", 1, 1),      // birth year 1600 fails the check constraint
      ("titles", 5, 0),       // pool: 4 variants + the skipped movie's title
      ("genres", 3, 0),
      ("professions", 1, 0),
      ("characters", 1, 0),
      ("ratings", 2, 0),
      ("movie_titles", 4, 0), // the blank variant never becomes a link
      ("title_ordering", 4, 0),
      ("movie_genres", 3, 1), // ttbad was never inserted, so the FK rejects
      ("person_profession", 1, 0),
      ("movie_cast", 1, 0),
      ("principals", 1, 0),
      ("known_for", 1, 0),
    ],
  );
}

#[tokio::test]
async fn declared_primary_titles_seed_the_link_flags() {
  let dir = tempfile::tempdir().unwrap();
  write_extract(dir.path());
  let store = SqliteStore::open_in_memory().await.unwrap();
  Loader::new(store.clone(), dir.path()).run().await.unwrap();

  let lookup = store.title_lookup().await.unwrap();
  let links = store.title_links().await.unwrap();

  let matrix = links
    .iter()
    .find(|l| l.movie_id == "tt1" && l.title_id == lookup["the matrix"])
    .unwrap();
  assert!(matrix.is_primary);
  assert!(matrix.is_original);

  let variant = links
    .iter()
    .find(|l| l.movie_id == "tt1" && l.title_id == lookup["matrix"])
    .unwrap();
  assert!(!variant.is_primary);
  assert!(!variant.is_original);

  // Both movies end up with exactly one primary and one original flag.
  assert!(store.title_flag_violations().await.unwrap().is_empty());
}

#[tokio::test]
async fn rerunning_the_loader_inserts_nothing() {
  let dir = tempfile::tempdir().unwrap();
  write_extract(dir.path());
  let store = SqliteStore::open_in_memory().await.unwrap();
  let loader = Loader::new(store.clone(), dir.path());

  loader.run().await.unwrap();
  let second = loader.run().await.unwrap();

  assert!(second.iter().all(|r| r.inserted == 0));
  assert_eq!(store.dump_movies().await.unwrap().len(), 2);
}

#[tokio::test]
async fn a_missing_extract_file_is_an_error() {
  let dir = tempfile::tempdir().unwrap();
  let store = SqliteStore::open_in_memory().await.unwrap();
  let result = Loader::new(store, dir.path()).run().await;
  assert!(matches!(result, Err(crate::Error::Csv(_))));
}
