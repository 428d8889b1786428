//! SQLite-backed `StateStore`.
//!
//! Owns the single connection to `<data_dir>/mcp_anywhere.db`. The schema of
//! persisted entities belongs to the server layer; this store only creates and
//! checks `schema_meta`.

use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};

use anyhow::Result;
use rusqlite::Connection;
use thiserror::Error;
use tracing::debug;

use crate::application::ports::{DbStatus, StateStore};

/// Current `schema_meta.version`.
pub const SCHEMA_VERSION: u32 = 1;

const SCHEMA_SQL: &str = "
CREATE TABLE IF NOT EXISTS schema_meta (
    key   TEXT PRIMARY KEY,
    value TEXT NOT NULL
);
";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store initialization failed: {0}")]
    Init(String),

    #[error("store query failed: {0}")]
    Query(String),

    #[error("schema version mismatch: expected {expected}, found {found}. Run 'mcp-anywhere reset' to start fresh.")]
    SchemaMismatch { expected: u32, found: u32 },

    #[error("database is not open")]
    Closed,
}

pub struct SqliteStore {
    conn: Mutex<Option<Connection>>,
    db_path: PathBuf,
}

/// Enable WAL mode so the web UI and tool servers can read while we write.
fn configure_connection(conn: &Connection) -> Result<(), StoreError> {
    let mode: String = conn
        .pragma_update_and_check(None, "journal_mode", "wal", |row| row.get(0))
        .map_err(|e| StoreError::Init(format!("cannot set WAL mode: {e}")))?;
    if mode != "wal" {
        return Err(StoreError::Init(format!(
            "failed to enable WAL mode: journal_mode is '{mode}'"
        )));
    }
    Ok(())
}

impl SqliteStore {
    /// A store for `path` that has not been opened yet.
    #[must_use]
    pub fn new(path: &Path) -> Self {
        Self {
            conn: Mutex::new(None),
            db_path: path.to_path_buf(),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Option<Connection>> {
        self.conn.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Open the database, creating the data directory if needed, and make
    /// sure `schema_meta` exists at the expected version.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened or was written by an
    /// incompatible schema version.
    pub fn open_and_init(&self) -> Result<(), StoreError> {
        if let Some(parent) = self.db_path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                StoreError::Init(format!("cannot create directory {}: {e}", parent.display()))
            })?;
        }

        let conn = Connection::open(&self.db_path).map_err(|e| {
            StoreError::Init(format!("cannot open database {}: {e}", self.db_path.display()))
        })?;
        configure_connection(&conn)?;

        conn.execute_batch(SCHEMA_SQL)
            .map_err(|e| StoreError::Init(format!("cannot create schema: {e}")))?;

        let initialized_at = chrono::Utc::now().to_rfc3339();
        conn.execute(
            "INSERT OR IGNORE INTO schema_meta (key, value) VALUES ('version', ?1), ('initialized_at', ?2)",
            rusqlite::params![SCHEMA_VERSION.to_string(), initialized_at],
        )
        .map_err(|e| StoreError::Init(format!("cannot write schema_meta: {e}")))?;

        let stored: String = conn
            .query_row(
                "SELECT value FROM schema_meta WHERE key = 'version'",
                [],
                |row| row.get(0),
            )
            .map_err(|e| StoreError::Query(format!("cannot read schema version: {e}")))?;
        let found = stored.parse().unwrap_or(0);
        if found != SCHEMA_VERSION {
            return Err(StoreError::SchemaMismatch {
                expected: SCHEMA_VERSION,
                found,
            });
        }

        debug!(db_path = %self.db_path.display(), "database opened");
        *self.lock() = Some(conn);
        Ok(())
    }

    #[must_use]
    pub fn is_open(&self) -> bool {
        self.lock().is_some()
    }

    fn db_status(&self) -> Result<DbStatus, StoreError> {
        let guard = self.lock();
        let conn = guard.as_ref().ok_or(StoreError::Closed)?;
        let table_count: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name NOT LIKE 'sqlite_%'",
                [],
                |row| row.get(0),
            )
            .map_err(|e| StoreError::Query(format!("cannot count tables: {e}")))?;
        let table_count = usize::try_from(table_count).unwrap_or(0);
        let size_bytes = std::fs::metadata(&self.db_path).map(|m| m.len()).ok();

        Ok(DbStatus {
            path: self.db_path.to_string_lossy().to_string(),
            table_count,
            size_bytes,
        })
    }
}

impl StateStore for SqliteStore {
    fn status(&self) -> Result<DbStatus> {
        Ok(self.db_status()?)
    }

    async fn close(&self) -> Result<()> {
        let conn = self.lock().take();
        match conn {
            None => {
                debug!("database was not open; nothing to close");
                Ok(())
            }
            Some(conn) => conn.close().map_err(|(_, e)| {
                anyhow::anyhow!("cannot close database {}: {e}", self.db_path.display())
            }),
        }
    }
}
