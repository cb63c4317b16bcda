//! Relational → flat-collection mirroring.
//!
//! Each table is dumped in primary-key order and rewritten wholesale as a
//! JSON collection of the same name. Re-running replaces prior contents.

use cinedex_docstore::{DocStore, names};
use cinedex_store_sqlite::SqliteStore;
use serde::Serialize;
use tracing::info;

use crate::Result;

async fn replace<T: Serialize>(
  docs: &DocStore,
  name: &str,
  rows: &[T],
) -> Result<()> {
  docs.drop_collection(name).await?;
  docs.create_collection(name).await?;
  let written = docs.put_all(name, rows).await?;
  info!(collection = name, documents = written, "collection mirrored");
  Ok(())
}

/// Mirror every relational table into the document store.
pub async fn flatten(store: &SqliteStore, docs: &DocStore) -> Result<()> {
  replace(docs, names::MOVIES, &store.dump_movies().await?).await?;
  replace(docs, names::PERSONS, &store.dump_persons().await?).await?;
  replace(docs, names::TITLES, &store.dump_titles().await?).await?;
  replace(docs, names::GENRES, &store.dump_genres().await?).await?;
  replace(docs, names::PROFESSIONS, &store.dump_professions().await?).await?;
  replace(docs, names::CHARACTERS, &store.dump_characters().await?).await?;
  replace(docs, names::MOVIE_TITLES, &store.dump_title_links().await?).await?;
  replace(docs, names::TITLE_ORDERING, &store.dump_title_orderings().await?)
    .await?;
  replace(docs, names::MOVIE_GENRES, &store.dump_movie_genres().await?).await?;
  replace(
    docs,
    names::PERSON_PROFESSION,
    &store.dump_person_professions().await?,
  )
  .await?;
  replace(docs, names::KNOWN_FOR, &store.dump_known_for().await?).await?;
  replace(docs, names::PRINCIPALS, &store.dump_principals().await?).await?;
  replace(docs, names::MOVIE_CAST, &store.dump_cast().await?).await?;
  replace(docs, names::RATINGS, &store.dump_ratings().await?).await?;
  Ok(())
}
