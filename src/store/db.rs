//! SQLite-backed snapshot store
//!
//! Every collection lives as one JSON document in the `snapshots` table,
//! keyed by its [`StorageKey`] name. The database defaults to
//! `~/.lumen/lumen.db`.

use std::path::Path;
use std::sync::{Arc, Mutex};

use anyhow::Context;
use rusqlite::{params, Connection, OptionalExtension};
use serde::de::DeserializeOwned;
use serde::Serialize;

use super::keys::StorageKey;
use crate::error::Result;

/// File name of the database inside the data directory
pub const DB_FILE_NAME: &str = "lumen.db";

/// Shared handle to the snapshot database
#[derive(Clone)]
pub struct Store {
    conn: Arc<Mutex<Connection>>,
}

impl Store {
    /// Open or create the store inside `data_dir`
    pub fn open_in_dir(data_dir: &Path) -> anyhow::Result<Self> {
        Self::open(&data_dir.join(DB_FILE_NAME))
    }

    /// Open or create the store at a specific path
    pub fn open(path: &Path) -> anyhow::Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create data dir: {}", parent.display()))?;
        }

        let conn = Connection::open(path)
            .with_context(|| format!("Failed to open store: {}", path.display()))?;
        conn.pragma_update(None, "journal_mode", "WAL")?;
        conn.pragma_update(None, "synchronous", "NORMAL")?;

        let store = Self::from_connection(conn)?;
        tracing::info!(path = %path.display(), "Opened store");
        Ok(store)
    }

    /// Throwaway store that lives as long as the handle
    pub fn open_in_memory() -> anyhow::Result<Self> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> anyhow::Result<Self> {
        conn.execute_batch(SCHEMA_SQL)
            .context("Failed to initialize store schema")?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    fn conn(&self) -> std::sync::MutexGuard<'_, Connection> {
        self.conn.lock().expect("Store lock poisoned")
    }

    /// Raw JSON stored under `key`, if any
    pub fn get_raw(&self, key: StorageKey) -> Result<Option<String>> {
        let conn = self.conn();
        let value = conn
            .query_row(
                "SELECT value FROM snapshots WHERE key = ?1",
                params![key.as_str()],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(value)
    }

    pub fn put_raw(&self, key: StorageKey, json: &str) -> Result<()> {
        let conn = self.conn();
        conn.execute(
            "INSERT INTO snapshots (key, value, updated_at) VALUES (?1, ?2, strftime('%s','now'))
             ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
            params![key.as_str(), json],
        )?;
        Ok(())
    }

    /// Decode the snapshot under `key`, or `None` when nothing was saved yet
    pub fn load<T: DeserializeOwned>(&self, key: StorageKey) -> Result<Option<T>> {
        match self.get_raw(key)? {
            Some(json) => Ok(Some(serde_json::from_str(&json)?)),
            None => Ok(None),
        }
    }

    pub fn save<T: Serialize + ?Sized>(&self, key: StorageKey, value: &T) -> Result<()> {
        let json = serde_json::to_string(value)?;
        self.put_raw(key, &json)?;
        tracing::debug!(key = %key, bytes = json.len(), "Saved snapshot");
        Ok(())
    }

    /// Remove every snapshot
    pub fn clear(&self) -> Result<()> {
        self.conn().execute("DELETE FROM snapshots", [])?;
        Ok(())
    }

    /// Keys that currently hold a snapshot
    pub fn keys(&self) -> Result<Vec<StorageKey>> {
        let conn = self.conn();
        let mut stmt = conn.prepare("SELECT key FROM snapshots ORDER BY key")?;
        let names = stmt
            .query_map([], |row| row.get::<_, String>(0))?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(names
            .iter()
            .filter_map(|name| StorageKey::from_str(name))
            .collect())
    }
}

const SCHEMA_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS snapshots (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL,
    updated_at INTEGER NOT NULL
);
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_open_creates_parent_dir() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("lumen.db");
        let store = Store::open(&path).unwrap();
        assert!(path.exists());
        assert!(store.keys().unwrap().is_empty());
    }

    #[test]
    fn test_save_load_overwrite() {
        let store = Store::open_in_memory().unwrap();
        assert_eq!(store.load::<Vec<String>>(StorageKey::Goals).unwrap(), None);

        store.save(StorageKey::Goals, &vec!["a".to_string()]).unwrap();
        store.save(StorageKey::Goals, &vec!["b".to_string(), "c".to_string()]).unwrap();

        let goals: Vec<String> = store.load(StorageKey::Goals).unwrap().unwrap();
        assert_eq!(goals, vec!["b", "c"]);
        assert_eq!(store.keys().unwrap(), vec![StorageKey::Goals]);
    }

    #[test]
    fn test_corrupt_snapshot_is_an_error() {
        let store = Store::open_in_memory().unwrap();
        store.put_raw(StorageKey::Tasks, "{not json").unwrap();
        let err = store.load::<Vec<String>>(StorageKey::Tasks).unwrap_err();
        assert!(matches!(err, crate::error::LumenError::Serialization(_)));
    }

    #[test]
    fn test_clear_removes_every_key() {
        let store = Store::open_in_memory().unwrap();
        store.save(StorageKey::Chat, &Vec::<String>::new()).unwrap();
        store.save(StorageKey::Moods, &Vec::<String>::new()).unwrap();
        assert_eq!(store.keys().unwrap(), vec![StorageKey::Chat, StorageKey::Moods]);
        store.clear().unwrap();
        assert!(store.keys().unwrap().is_empty());
    }
}
