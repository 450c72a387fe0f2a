//! SQLite-based session log and preference store.
//!
//! Provides persistent storage for:
//! - Completed work intervals and their focus verdicts
//! - Stored user preferences (JSON under the `preferences` kv key)
//! - Key-value store for application state

use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection};
use tracing::warn;

use super::{data_dir, migrations};
use crate::error::{AdapterError, CoreError, DatabaseError};
use crate::ports::{PreferenceStore, SessionLog};
use crate::session::{FocusVerdict, SessionRecord};
use crate::settings::StoredPreferences;

const PREFERENCES_KEY: &str = "preferences";

/// SQLite database backing the local adapters.
pub struct Database {
    conn: Mutex<Connection>,
}

impl Database {
    /// Open the database at `~/.config/focusroom/focusroom.db`.
    ///
    /// Creates the database file and schema if they don't exist.
    ///
    /// # Errors
    /// Returns an error if the data directory is unavailable or the database
    /// cannot be opened or migrated.
    pub fn open() -> Result<Self, CoreError> {
        let path = data_dir()?.join("focusroom.db");
        Ok(Self::open_at(&path)?)
    }

    /// # Errors
    /// Returns an error if the database cannot be opened or migrated.
    pub fn open_at(path: &Path) -> Result<Self, DatabaseError> {
        let conn = Connection::open(path).map_err(|source| DatabaseError::OpenFailed {
            path: path.to_path_buf(),
            source,
        })?;
        Self::with_connection(conn)
    }

    /// Open an in-memory database.
    ///
    /// # Errors
    /// Returns an error if the schema cannot be created.
    pub fn open_memory() -> Result<Self, DatabaseError> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> Result<Self, DatabaseError> {
        migrations::migrate(&conn).map_err(|e| DatabaseError::MigrationFailed(e.to_string()))?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>, DatabaseError> {
        self.conn.lock().map_err(|_| DatabaseError::Locked)
    }

    /// Append a completed work interval.
    ///
    /// # Errors
    /// Returns an error if the insert fails.
    pub fn record_session(
        &self,
        result: FocusVerdict,
        duration_secs: u64,
        completed_at: DateTime<Utc>,
    ) -> Result<i64, DatabaseError> {
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO sessions (result, duration_secs, completed_at) VALUES (?1, ?2, ?3)",
            params![result.as_str(), duration_secs, completed_at.to_rfc3339()],
        )?;
        Ok(conn.last_insert_rowid())
    }

    /// Every recorded session, oldest first.
    ///
    /// # Errors
    /// Returns an error if the query fails or a row cannot be decoded.
    pub fn sessions(&self) -> Result<Vec<SessionRecord>, DatabaseError> {
        let conn = self.conn()?;
        let mut stmt =
            conn.prepare("SELECT result, duration_secs, completed_at FROM sessions ORDER BY id")?;
        let rows = stmt.query_map([], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, u64>(1)?,
                row.get::<_, String>(2)?,
            ))
        })?;

        let mut records = Vec::new();
        for row in rows {
            let (result, duration_secs, completed_at) = row?;
            let result = result.parse::<FocusVerdict>().map_err(|e| corrupt(e.to_string()))?;
            let timestamp = DateTime::parse_from_rfc3339(&completed_at)
                .map_err(|e| corrupt(e.to_string()))?
                .with_timezone(&Utc);
            records.push(SessionRecord {
                result,
                duration_secs,
                timestamp,
            });
        }
        Ok(records)
    }

    /// Remove every session record. Returns how many were deleted.
    ///
    /// # Errors
    /// Returns an error if the delete fails.
    pub fn clear_sessions(&self) -> Result<usize, DatabaseError> {
        Ok(self.conn()?.execute("DELETE FROM sessions", [])?)
    }

    /// Stored preferences; an absent or unreadable record reads as empty.
    ///
    /// # Errors
    /// Returns an error if the kv lookup fails.
    pub fn load_preferences(&self) -> Result<StoredPreferences, DatabaseError> {
        let Some(json) = self.kv_get(PREFERENCES_KEY)? else {
            return Ok(StoredPreferences::default());
        };
        match serde_json::from_str(&json) {
            Ok(stored) => Ok(stored),
            Err(e) => {
                warn!(error = %e, "stored preferences are malformed, ignoring them");
                Ok(StoredPreferences::default())
            }
        }
    }

    /// Overlay `update` onto the stored preferences and write the result.
    ///
    /// # Errors
    /// Returns an error if reading or writing the kv store fails.
    pub fn merge_preferences(
        &self,
        update: StoredPreferences,
    ) -> Result<StoredPreferences, CoreError> {
        let mut stored = self.load_preferences()?;
        stored.merge(update);
        let json = serde_json::to_string(&stored)?;
        self.kv_set(PREFERENCES_KEY, &json)?;
        Ok(stored)
    }

    /// Get a value from the kv store.
    pub fn kv_get(&self, key: &str) -> Result<Option<String>, DatabaseError> {
        let conn = self.conn()?;
        let result = conn.query_row("SELECT value FROM kv WHERE key = ?1", params![key], |row| {
            row.get::<_, String>(0)
        });
        match result {
            Ok(v) => Ok(Some(v)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Set a value in the kv store.
    pub fn kv_set(&self, key: &str, value: &str) -> Result<(), DatabaseError> {
        self.conn()?.execute(
            "INSERT OR REPLACE INTO kv (key, value) VALUES (?1, ?2)",
            params![key, value],
        )?;
        Ok(())
    }
}

fn corrupt(message: String) -> DatabaseError {
    DatabaseError::CorruptRow {
        table: "sessions".into(),
        message,
    }
}

#[async_trait]
impl SessionLog for Database {
    async fn fetch_history(&self) -> Result<Vec<SessionRecord>, AdapterError> {
        Ok(self.sessions()?)
    }

    async fn append_session(
        &self,
        result: FocusVerdict,
        duration_secs: u64,
    ) -> Result<(), AdapterError> {
        self.record_session(result, duration_secs, Utc::now())?;
        Ok(())
    }
}

#[async_trait]
impl PreferenceStore for Database {
    async fn fetch_preferences(&self) -> Result<StoredPreferences, AdapterError> {
        Ok(self.load_preferences()?)
    }

    async fn update_preferences(&self, update: StoredPreferences) -> Result<(), AdapterError> {
        match self.merge_preferences(update) {
            Ok(_) => Ok(()),
            Err(CoreError::Database(e)) => Err(AdapterError::Database(e)),
            Err(CoreError::Json(e)) => Err(AdapterError::Json(e)),
            Err(other) => Err(AdapterError::unavailable("preference store", other.to_string())),
        }
    }
}
