//! Session Store
//!
//! Persists the signed-in user, the current analysis snapshot, the active
//! student profile and the mission in progress as whole JSON records under
//! fixed keys, the same layout the web client kept in local storage. Every save rewrites the
//! records in full; logout clears them.
//!
//! Decoding is defensive: a malformed record is logged and treated as
//! absent rather than failing the load.

use super::missions::Mission;
use super::types::{AnalysisResult, StudentProfile, User};
use chrono::Utc;
use log::{debug, warn};
use rusqlite::{params, Connection, OptionalExtension};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use thiserror::Error;

pub const USER_KEY: &str = "career_gps_user";
pub const ANALYSIS_KEY: &str = "career_gps_analysis";
pub const PROFILE_KEY: &str = "career_gps_profile";
pub const MISSION_KEY: &str = "career_gps_mission";
pub const SCHEMA_KEY: &str = "career_gps_schema";

/// Bumped whenever a record layout changes incompatibly
pub const SCHEMA_VERSION: u32 = 1;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Session database error: {0}")]
    Storage(#[from] rusqlite::Error),

    #[error("Failed to encode session record: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("Session store lock poisoned")]
    Poisoned,
}

// ============================================================
// SESSION SNAPSHOT
// ============================================================

/// Everything the app restores on startup
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Session {
    pub user: Option<User>,
    pub analysis: Option<AnalysisResult>,
    pub profile: Option<StudentProfile>,
    /// Mission in progress, kept so a mission can span several runs
    pub mission: Option<Mission>,
}

impl Session {
    pub fn is_empty(&self) -> bool {
        self.user.is_none()
            && self.analysis.is_none()
            && self.profile.is_none()
            && self.mission.is_none()
    }
}

// ============================================================
// STORE INTERFACE
// ============================================================

/// String-keyed record storage with session-level load/save/clear
pub trait SessionStore: Send + Sync {
    fn get_record(&self, key: &str) -> Result<Option<String>, SessionError>;
    fn put_record(&self, key: &str, value: &str) -> Result<(), SessionError>;
    fn remove_record(&self, key: &str) -> Result<(), SessionError>;

    /// Restores the session, falling back to "no session" for records that
    /// cannot be decoded or were written by a newer schema.
    fn load(&self) -> Result<Session, SessionError> {
        if let Some(raw) = self.get_record(SCHEMA_KEY)? {
            match raw.trim().parse::<u32>() {
                Ok(version) if version > SCHEMA_VERSION => {
                    warn!(
                        "Session written by schema v{} (supported v{}), starting fresh",
                        version, SCHEMA_VERSION
                    );
                    return Ok(Session::default());
                }
                Ok(_) => {}
                Err(_) => warn!("Unreadable session schema marker '{}', ignoring", raw),
            }
        }

        Ok(Session {
            user: decode_record(self, USER_KEY)?,
            analysis: decode_record(self, ANALYSIS_KEY)?,
            profile: decode_record(self, PROFILE_KEY)?,
            mission: decode_record(self, MISSION_KEY)?,
        })
    }

    /// Rewrites every record; absent parts are removed
    fn save(&self, session: &Session) -> Result<(), SessionError> {
        self.put_record(SCHEMA_KEY, &SCHEMA_VERSION.to_string())?;
        write_record(self, USER_KEY, session.user.as_ref())?;
        write_record(self, ANALYSIS_KEY, session.analysis.as_ref())?;
        write_record(self, PROFILE_KEY, session.profile.as_ref())?;
        write_record(self, MISSION_KEY, session.mission.as_ref())?;
        Ok(())
    }

    fn clear(&self) -> Result<(), SessionError> {
        for key in [USER_KEY, ANALYSIS_KEY, PROFILE_KEY, MISSION_KEY, SCHEMA_KEY] {
            self.remove_record(key)?;
        }
        debug!("Session records cleared");
        Ok(())
    }
}

fn decode_record<S, T>(store: &S, key: &str) -> Result<Option<T>, SessionError>
where
    S: SessionStore + ?Sized,
    T: DeserializeOwned,
{
    let Some(raw) = store.get_record(key)? else {
        return Ok(None);
    };
    match serde_json::from_str(&raw) {
        Ok(value) => Ok(Some(value)),
        Err(e) => {
            warn!("Discarding malformed '{}' record: {}", key, e);
            Ok(None)
        }
    }
}

fn write_record<S, T>(store: &S, key: &str, value: Option<&T>) -> Result<(), SessionError>
where
    S: SessionStore + ?Sized,
    T: Serialize,
{
    match value {
        Some(v) => store.put_record(key, &serde_json::to_string(v)?),
        None => store.remove_record(key),
    }
}

// ============================================================
// IN-MEMORY STORE
// ============================================================

/// Volatile store, used by tests and one-shot runs
#[derive(Debug, Default, Clone)]
pub struct MemorySessionStore {
    records: Arc<Mutex<HashMap<String, String>>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.lock().map(|r| r.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl SessionStore for MemorySessionStore {
    fn get_record(&self, key: &str) -> Result<Option<String>, SessionError> {
        let records = self.records.lock().map_err(|_| SessionError::Poisoned)?;
        Ok(records.get(key).cloned())
    }

    fn put_record(&self, key: &str, value: &str) -> Result<(), SessionError> {
        let mut records = self.records.lock().map_err(|_| SessionError::Poisoned)?;
        records.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_record(&self, key: &str) -> Result<(), SessionError> {
        let mut records = self.records.lock().map_err(|_| SessionError::Poisoned)?;
        records.remove(key);
        Ok(())
    }
}

// ============================================================
// SQLITE STORE
// ============================================================

const CREATE_TABLE: &str = "CREATE TABLE IF NOT EXISTS session_records (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL,
    updated_at TEXT NOT NULL
)";

/// SQLite-backed key/value store
pub struct SqliteSessionStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteSessionStore {
    /// Opens (or creates) the session database
    pub fn new(db_path: Option<PathBuf>) -> Result<Self, SessionError> {
        let path = db_path.unwrap_or_else(|| PathBuf::from("career_gps.db"));
        let conn = Connection::open(path)?;
        conn.execute(CREATE_TABLE, [])?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Create an in-memory store for testing
    pub fn in_memory() -> Result<Self, SessionError> {
        let conn = Connection::open_in_memory()?;
        conn.execute(CREATE_TABLE, [])?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }
}

impl SessionStore for SqliteSessionStore {
    fn get_record(&self, key: &str) -> Result<Option<String>, SessionError> {
        let conn = self.conn.lock().map_err(|_| SessionError::Poisoned)?;
        let value = conn
            .query_row(
                "SELECT value FROM session_records WHERE key = ?1",
                [key],
                |row| row.get(0),
            )
            .optional()?;
        Ok(value)
    }

    fn put_record(&self, key: &str, value: &str) -> Result<(), SessionError> {
        let conn = self.conn.lock().map_err(|_| SessionError::Poisoned)?;
        conn.execute(
            "INSERT INTO session_records (key, value, updated_at)
             VALUES (?1, ?2, ?3)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
            params![key, value, Utc::now().to_rfc3339()],
        )?;
        Ok(())
    }

    fn remove_record(&self, key: &str) -> Result<(), SessionError> {
        let conn = self.conn.lock().map_err(|_| SessionError::Poisoned)?;
        conn.execute("DELETE FROM session_records WHERE key = ?1", [key])?;
        Ok(())
    }
}
