use anyhow::{Context, Result};
use rusqlite::{params, Connection};
use serde::{de::DeserializeOwned, Serialize};
use std::path::Path;
use tracing::debug;

/// Storage keys for the four persisted collections.
pub(crate) const ENTRIES_KEY: &str = "budget.entries";
pub(crate) const MONTH_KEY: &str = "budget.month";
pub(crate) const CATEGORIES_KEY: &str = "budget.categories";
pub(crate) const SETTINGS_KEY: &str = "budget.settings";

/// String-keyed durable storage. Each collection is serialized wholesale as
/// a JSON document under its namespace key; writes are last-write-wins with
/// no cross-process coordination.
pub(crate) struct Store {
    conn: Connection,
}

impl Store {
    pub(crate) fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)
            .with_context(|| format!("Failed to open store: {}", path.display()))?;
        conn.execute_batch("PRAGMA journal_mode=WAL;")
            .context("Failed to set store pragmas")?;
        let store = Self { conn };
        store.init()?;
        Ok(store)
    }

    #[cfg(test)]
    pub(crate) fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let store = Self { conn };
        store.init()?;
        Ok(store)
    }

    fn init(&self) -> Result<()> {
        self.conn
            .execute_batch("CREATE TABLE IF NOT EXISTS kv (key TEXT PRIMARY KEY, value TEXT NOT NULL);")
            .context("Failed to create kv table")?;
        Ok(())
    }

    /// Load and deserialize a record. A missing key is `None`; a record
    /// that no longer parses into the expected shape is also treated as
    /// `None` so the caller falls back to defaults instead of trusting it.
    pub(crate) fn load<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        let Some(raw) = self.get_raw(key)? else {
            return Ok(None);
        };
        match serde_json::from_str(&raw) {
            Ok(value) => Ok(Some(value)),
            Err(e) => {
                debug!(key, error = %e, "Discarding malformed stored record");
                Ok(None)
            }
        }
    }

    /// Serialize and store a record, replacing any previous value.
    pub(crate) fn save<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<()> {
        let raw = serde_json::to_string(value)
            .with_context(|| format!("Failed to serialize record: {key}"))?;
        self.put_raw(key, &raw)
    }

    pub(crate) fn get_raw(&self, key: &str) -> Result<Option<String>> {
        let result = self
            .conn
            .query_row("SELECT value FROM kv WHERE key = ?1", params![key], |row| {
                row.get(0)
            });
        match result {
            Ok(v) => Ok(Some(v)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    pub(crate) fn put_raw(&self, key: &str, value: &str) -> Result<()> {
        self.conn
            .execute(
                "INSERT INTO kv (key, value) VALUES (?1, ?2)
                 ON CONFLICT(key) DO UPDATE SET value = ?2",
                params![key, value],
            )
            .with_context(|| format!("Failed to write record: {key}"))?;
        Ok(())
    }
}
