//! Persistence hooks notified on every accepted append.

use crate::{Result, TweakError};
use chrono::Utc;
use rusqlite::{Connection, params};
use std::path::Path;
use std::sync::Mutex;
use tracing::debug;

/// Collaborator called once per value accepted into the store.
///
/// `entries` is the store content after the append, so `value` is always its
/// last element. The return value only signals failure.
pub trait PersistenceHook: Send + Sync {
    fn update(&self, entries: &[String], value: &str) -> Result<()>;
}

/// Hook that persists nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopHook;

impl PersistenceHook for NoopHook {
    fn update(&self, _entries: &[String], _value: &str) -> Result<()> {
        Ok(())
    }
}

/// Write-through hook recording every accepted value in SQLite.
///
/// Rows are never deleted: a `clear` on the store leaves the log intact.
pub struct SqliteHook {
    conn: Mutex<Connection>,
}

impl SqliteHook {
    /// Open or create the database at the given path.
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(path)?;
        let hook = Self {
            conn: Mutex::new(conn),
        };
        hook.init_schema()?;
        Ok(hook)
    }

    /// Open a private in-memory database.
    pub fn in_memory() -> Result<Self> {
        let hook = Self {
            conn: Mutex::new(Connection::open_in_memory()?),
        };
        hook.init_schema()?;
        Ok(hook)
    }

    fn init_schema(&self) -> Result<()> {
        let conn = self.lock()?;
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS entries (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                position INTEGER NOT NULL,
                value TEXT NOT NULL,
                recorded_at TEXT NOT NULL
            );
            "#,
        )?;
        Ok(())
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| TweakError::Persistence("database connection lock poisoned".into()))
    }

    /// Number of values recorded so far.
    pub fn count(&self) -> Result<usize> {
        let conn = self.lock()?;
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM entries", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    /// All recorded values, oldest first.
    pub fn recorded_values(&self) -> Result<Vec<String>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare("SELECT value FROM entries ORDER BY id")?;
        let values = stmt
            .query_map([], |row| row.get(0))?
            .collect::<std::result::Result<Vec<String>, _>>()?;
        Ok(values)
    }
}

impl PersistenceHook for SqliteHook {
    fn update(&self, entries: &[String], value: &str) -> Result<()> {
        let conn = self.lock()?;
        conn.execute(
            "INSERT INTO entries (position, value, recorded_at) VALUES (?1, ?2, ?3)",
            params![entries.len() as i64, value, Utc::now().to_rfc3339()],
        )?;
        debug!(target: "tweak::persistence", "Recorded value at position {}", entries.len());
        Ok(())
    }
}
