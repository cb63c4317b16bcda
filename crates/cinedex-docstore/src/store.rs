//! [`DocStore`] — named JSON collections persisted in SQLite.
//!
//! Each collection is its own table holding one JSON body per row, plus an
//! optional unique key for point lookups. A `collections` registry table
//! records which collections exist; reads against an unregistered
//! collection return [`Error::MissingCollection`] instead of an empty
//! result, so a mis-ordered migration surfaces immediately.

use std::path::Path;

use serde::{Serialize, de::DeserializeOwned};

use crate::{Error, Result};

const REGISTRY: &str = "
CREATE TABLE IF NOT EXISTS collections (
    name TEXT PRIMARY KEY
);
";

/// Only `[a-z0-9_]`, starting with a letter or underscore — the name is
/// interpolated into table DDL.
fn validate_name(name: &str) -> Result<()> {
  let mut chars = name.chars();
  let valid_head = matches!(chars.next(), Some('a'..='z' | '_'));
  let valid_tail =
    chars.all(|c| matches!(c, 'a'..='z' | '0'..='9' | '_'));
  if valid_head && valid_tail {
    Ok(())
  } else {
    Err(Error::InvalidCollectionName(name.to_owned()))
  }
}

fn table_name(name: &str) -> String {
  format!("doc_{name}")
}

#[derive(Clone)]
pub struct DocStore {
  conn: tokio_rusqlite::Connection,
}

impl DocStore {
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_registry().await?;
    Ok(store)
  }

  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_registry().await?;
    Ok(store)
  }

  async fn init_registry(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(REGISTRY)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Create `name` if it does not exist yet. Idempotent.
  pub async fn create_collection(&self, name: &str) -> Result<()> {
    validate_name(name)?;
    let ddl = format!(
      "CREATE TABLE IF NOT EXISTS {} (
         doc_id  INTEGER PRIMARY KEY AUTOINCREMENT,
         doc_key TEXT UNIQUE,
         body    TEXT NOT NULL
       )",
      table_name(name),
    );
    let name = name.to_owned();
    self
      .conn
      .call(move |conn| {
        conn.execute_batch(&ddl)?;
        conn.execute(
          "INSERT OR IGNORE INTO collections (name) VALUES (?1)",
          rusqlite::params![name],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Drop `name` and its registry entry. Dropping an absent collection is
  /// a no-op.
  pub async fn drop_collection(&self, name: &str) -> Result<()> {
    validate_name(name)?;
    let ddl = format!("DROP TABLE IF EXISTS {}", table_name(name));
    let name = name.to_owned();
    self
      .conn
      .call(move |conn| {
        conn.execute_batch(&ddl)?;
        conn.execute(
          "DELETE FROM collections WHERE name = ?1",
          rusqlite::params![name],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  pub async fn collection_names(&self) -> Result<Vec<String>> {
    let names = self
      .conn
      .call(|conn| {
        let mut stmt =
          conn.prepare("SELECT name FROM collections ORDER BY name")?;
        let rows = stmt
          .query_map([], |row| row.get(0))?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;
    Ok(names)
  }

  pub async fn has_collection(&self, name: &str) -> Result<bool> {
    let name = name.to_owned();
    let found: Option<i64> = self
      .conn
      .call(move |conn| {
        let row = conn
          .query_row(
            "SELECT 1 FROM collections WHERE name = ?1",
            rusqlite::params![name],
            |r| r.get(0),
          )
          .map(Some)
          .or_else(|e| match e {
            rusqlite::Error::QueryReturnedNoRows => Ok(None),
            e => Err(tokio_rusqlite::Error::from(e)),
          })?;
        Ok(row)
      })
      .await?;
    Ok(found.is_some())
  }

  async fn require_collection(&self, name: &str) -> Result<()> {
    if self.has_collection(name).await? {
      Ok(())
    } else {
      Err(Error::MissingCollection(name.to_owned()))
    }
  }

  /// Insert unkeyed documents in one transaction, preserving order.
  pub async fn put_all<T: Serialize>(
    &self,
    collection: &str,
    docs: &[T],
  ) -> Result<usize> {
    let bodies = docs
      .iter()
      .map(|d| serde_json::to_string(d).map(|b| (None, b)))
      .collect::<serde_json::Result<Vec<_>>>()?;
    self.insert_bodies(collection, bodies).await
  }

  /// Insert keyed documents in one transaction. Keys must be unique
  /// within the collection.
  pub async fn put_all_keyed<T: Serialize>(
    &self,
    collection: &str,
    entries: &[(String, T)],
  ) -> Result<usize> {
    let bodies = entries
      .iter()
      .map(|(k, d)| {
        serde_json::to_string(d).map(|b| (Some(k.clone()), b))
      })
      .collect::<serde_json::Result<Vec<_>>>()?;
    self.insert_bodies(collection, bodies).await
  }

  async fn insert_bodies(
    &self,
    collection: &str,
    bodies: Vec<(Option<String>, String)>,
  ) -> Result<usize> {
    self.require_collection(collection).await?;
    let sql = format!(
      "INSERT INTO {} (doc_key, body) VALUES (?1, ?2)",
      table_name(collection),
    );
    let inserted = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        {
          let mut stmt = tx.prepare(&sql)?;
          for (key, body) in &bodies {
            stmt.execute(rusqlite::params![key, body])?;
          }
        }
        tx.commit()?;
        Ok(bodies.len())
      })
      .await?;
    Ok(inserted)
  }

  /// All documents of a collection in insertion order.
  pub async fn find_all<T: DeserializeOwned>(
    &self,
    collection: &str,
  ) -> Result<Vec<T>> {
    self.require_collection(collection).await?;
    let sql = format!(
      "SELECT body FROM {} ORDER BY doc_id",
      table_name(collection),
    );
    let bodies: Vec<String> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
          .query_map([], |row| row.get(0))?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    bodies
      .iter()
      .map(|b| serde_json::from_str(b).map_err(Error::from))
      .collect()
  }

  /// Up to `n` documents drawn at random from `keys`. Order is random;
  /// keys not present in the collection are ignored.
  pub async fn sample_by_keys<T: DeserializeOwned>(
    &self,
    collection: &str,
    keys: &[String],
    n: usize,
  ) -> Result<Vec<T>> {
    self.require_collection(collection).await?;
    if keys.is_empty() || n == 0 {
      return Ok(Vec::new());
    }
    let placeholders = vec!["?"; keys.len()].join(", ");
    let sql = format!(
      "SELECT body FROM {} WHERE doc_key IN ({placeholders})
       ORDER BY RANDOM() LIMIT {n}",
      table_name(collection),
    );
    let keys = keys.to_vec();
    let bodies: Vec<String> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
          .query_map(rusqlite::params_from_iter(keys.iter()), |row| row.get(0))?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    bodies
      .iter()
      .map(|b| serde_json::from_str(b).map_err(Error::from))
      .collect()
  }

  /// Point lookup by document key.
  pub async fn find_by_key<T: DeserializeOwned>(
    &self,
    collection: &str,
    key: &str,
  ) -> Result<Option<T>> {
    self.require_collection(collection).await?;
    let sql = format!(
      "SELECT body FROM {} WHERE doc_key = ?1",
      table_name(collection),
    );
    let key = key.to_owned();
    let body: Option<String> = self
      .conn
      .call(move |conn| {
        let row = conn
          .query_row(&sql, rusqlite::params![key], |r| r.get(0))
          .map(Some)
          .or_else(|e| match e {
            rusqlite::Error::QueryReturnedNoRows => Ok(None),
            e => Err(tokio_rusqlite::Error::from(e)),
          })?;
        Ok(row)
      })
      .await?;

    match body {
      Some(body) => Ok(Some(serde_json::from_str(&body)?)),
      None => Ok(None),
    }
  }

  pub async fn count(&self, collection: &str) -> Result<u64> {
    self.require_collection(collection).await?;
    let sql = format!("SELECT COUNT(*) FROM {}", table_name(collection));
    let count = self
      .conn
      .call(move |conn| {
        let count: u64 = conn.query_row(&sql, [], |r| r.get(0))?;
        Ok(count)
      })
      .await?;
    Ok(count)
  }
}
