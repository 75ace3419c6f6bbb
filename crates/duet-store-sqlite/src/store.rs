//! [`SqliteStore`] — the SQLite implementation of [`DocumentStore`].

use std::path::Path;

use chrono::Utc;
use duet_core::store::DocumentStore;
use rusqlite::OptionalExtension as _;
use serde_json::Value;

use crate::{Error, Result, schema::SCHEMA};

/// A Duet document store backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
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
}

impl DocumentStore for SqliteStore {
  type Error = Error;

  async fn get(&self, key: &str) -> Result<Option<Value>> {
    let key = key.to_owned();

    let raw: Option<String> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT body FROM documents WHERE key = ?1",
              rusqlite::params![key],
              |row| row.get(0),
            )
            .optional()?,
        )
      })
      .await?;

    raw
      .map(|body| serde_json::from_str(&body))
      .transpose()
      .map_err(Error::Json)
  }

  async fn put(&self, key: &str, value: Value) -> Result<()> {
    let key = key.to_owned();
    let body = value.to_string();
    let updated_at = Utc::now().to_rfc3339();

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO documents (key, body, updated_at)
           VALUES (?1, ?2, ?3)
           ON CONFLICT (key) DO UPDATE
           SET body = excluded.body, updated_at = excluded.updated_at",
          rusqlite::params![key, body, updated_at],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn delete(&self, key: &str) -> Result<()> {
    let key = key.to_owned();

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "DELETE FROM documents WHERE key = ?1",
          rusqlite::params![key],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}
