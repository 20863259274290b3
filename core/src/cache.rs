//! Local durable cache.
//!
//! A single key-value table over SQLite: string keys, JSON values. This is
//! the offline tier: every read the store serves without the network comes
//! from here, and every successful write lands here whether or not the remote
//! accepted it. The lock is a plain `std` mutex and is never held across an
//! await point.

use std::path::Path;
use std::sync::Mutex;

use anyhow::{Context, Result};
use rusqlite::{Connection, OptionalExtension, params};
use serde::Serialize;
use serde::de::DeserializeOwned;

/// Cache key namespace. Per-day entry lists append the ISO date to
/// [`keys::FOOD_ENTRIES_PREFIX`].
pub mod keys {
    pub const USER: &str = "user";
    pub const PROFILE: &str = "profile";
    pub const SESSION: &str = "session";
    pub const FOOD_ENTRIES_PREFIX: &str = "food_entries:";
    pub const WEIGHT_ENTRIES: &str = "weight_entries";
    pub const CUSTOM_FOODS: &str = "custom_foods";
    pub const FAVORITES: &str = "favorites";
    pub const RECENT_FOODS: &str = "recent_foods";

    #[must_use]
    pub fn food_entries(date: chrono::NaiveDate) -> String {
        format!("{FOOD_ENTRIES_PREFIX}{date}")
    }
}

const SCHEMA_VERSION: i64 = 1;

pub struct LocalCache {
    conn: Mutex<Connection>,
}

impl LocalCache {
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)
            .with_context(|| format!("failed to open cache at {}", path.display()))?;
        conn.pragma_update(None, "journal_mode", "WAL")?;
        conn.pragma_update(None, "foreign_keys", "ON")?;
        Self::migrate(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Self::migrate(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn migrate(conn: &Connection) -> Result<()> {
        let version: i64 = conn.query_row("PRAGMA user_version", [], |row| row.get(0))?;
        if version < 1 {
            conn.execute_batch(
                "CREATE TABLE IF NOT EXISTS kv (
                    key TEXT PRIMARY KEY,
                    value TEXT NOT NULL
                );",
            )?;
        }
        if version < SCHEMA_VERSION {
            conn.pragma_update(None, "user_version", SCHEMA_VERSION)?;
        }
        Ok(())
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| anyhow::anyhow!("cache lock poisoned"))
    }

    /// Fetch and deserialize the value at `key`, `None` when absent.
    /// A value that no longer parses as `T` is treated as absent; the store
    /// will overwrite it on the next successful remote read.
    pub fn get_json<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        let conn = self.lock()?;
        let raw: Option<String> = conn
            .query_row("SELECT value FROM kv WHERE key = ?1", params![key], |row| {
                row.get(0)
            })
            .optional()?;
        match raw {
            Some(text) => match serde_json::from_str(&text) {
                Ok(value) => Ok(Some(value)),
                Err(err) => {
                    tracing::warn!(key, %err, "discarding unreadable cache value");
                    Ok(None)
                }
            },
            None => Ok(None),
        }
    }

    pub fn set_json<T: Serialize>(&self, key: &str, value: &T) -> Result<()> {
        let text = serde_json::to_string(value)?;
        let conn = self.lock()?;
        conn.execute(
            "INSERT INTO kv (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
            params![key, text],
        )?;
        Ok(())
    }

    pub fn remove(&self, key: &str) -> Result<()> {
        let conn = self.lock()?;
        conn.execute("DELETE FROM kv WHERE key = ?1", params![key])?;
        Ok(())
    }

    /// Keys starting with `prefix`, sorted ascending. Used to enumerate the
    /// per-day entry lists for export and weekly summaries.
    pub fn keys_with_prefix(&self, prefix: &str) -> Result<Vec<String>> {
        let conn = self.lock()?;
        let pattern = format!("{}%", prefix.replace('%', "\\%").replace('_', "\\_"));
        let mut stmt = conn
            .prepare("SELECT key FROM kv WHERE key LIKE ?1 ESCAPE '\\' ORDER BY key ASC")?;
        let keys = stmt
            .query_map(params![pattern], |row| row.get(0))?
            .collect::<std::result::Result<Vec<String>, _>>()?;
        Ok(keys)
    }

    /// Wipe everything. Only logout uses this.
    pub fn clear_all(&self) -> Result<()> {
        let conn = self.lock()?;
        conn.execute("DELETE FROM kv", [])?;
        Ok(())
    }
}
