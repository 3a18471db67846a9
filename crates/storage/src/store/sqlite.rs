#![forbid(unsafe_code)]

use super::{Backend, CheckpointStore, StoreError, now_ms_i64, validate_checkpoint_key};
use rusqlite::{Connection, OptionalExtension, params};
use scene_core::CheckpointData;
use std::path::Path;
use std::sync::Mutex;
use std::time::Duration;

const DB_FILE_NAME: &str = "scene_checkpoints.db";

/// File-backed store under a local storage directory.
///
/// Rows carry an absolute expiry; expired rows read as absent and are swept
/// when the store is opened and on every save.
#[derive(Debug)]
pub struct SqliteStore {
    conn: Mutex<Connection>,
    ttl: Option<Duration>,
}

impl SqliteStore {
    pub fn open(storage_dir: impl AsRef<Path>, ttl: Option<Duration>) -> Result<Self, StoreError> {
        let storage_dir = storage_dir.as_ref();
        std::fs::create_dir_all(storage_dir)?;

        let conn = Connection::open(storage_dir.join(DB_FILE_NAME))?;
        conn.busy_timeout(Duration::from_secs(5))?;
        install_schema(&conn)?;

        let swept = purge_expired(&conn, now_ms_i64())?;
        if swept > 0 {
            tracing::debug!(swept, "removed expired checkpoints");
        }

        Ok(Self {
            conn: Mutex::new(conn),
            ttl,
        })
    }

    fn expires_at_ms(&self, now_ms: i64) -> Option<i64> {
        let ttl = self.ttl?;
        let ttl_ms = i64::try_from(ttl.as_millis()).unwrap_or(i64::MAX);
        Some(now_ms.saturating_add(ttl_ms))
    }
}

impl CheckpointStore for SqliteStore {
    fn backend(&self) -> Backend {
        Backend::Sqlite
    }

    fn save(&self, id: &str, data: &CheckpointData) -> Result<(), StoreError> {
        validate_checkpoint_key(id)?;
        let data_json = serde_json::to_string(data)?;
        let now_ms = now_ms_i64();
        let expires_at_ms = self.expires_at_ms(now_ms);

        let conn = self.conn.lock()?;
        let swept = purge_expired(&conn, now_ms)?;
        if swept > 0 {
            tracing::debug!(swept, "removed expired checkpoints");
        }
        conn.execute(
            "INSERT INTO checkpoints(id, data_json, created_at_ms, expires_at_ms) \
             VALUES (?1, ?2, ?3, ?4) \
             ON CONFLICT(id) DO UPDATE SET \
               data_json=excluded.data_json, \
               created_at_ms=excluded.created_at_ms, \
               expires_at_ms=excluded.expires_at_ms",
            params![id, data_json, now_ms, expires_at_ms],
        )?;
        Ok(())
    }

    fn load(&self, id: &str) -> Result<Option<CheckpointData>, StoreError> {
        let conn = self.conn.lock()?;
        let row = conn
            .query_row(
                "SELECT data_json FROM checkpoints \
                 WHERE id=?1 AND (expires_at_ms IS NULL OR expires_at_ms > ?2)",
                params![id, now_ms_i64()],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        match row {
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            None => Ok(None),
        }
    }
}

fn install_schema(conn: &Connection) -> Result<(), StoreError> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS checkpoints (\
           id TEXT PRIMARY KEY, \
           data_json TEXT NOT NULL, \
           created_at_ms INTEGER NOT NULL, \
           expires_at_ms INTEGER\
         );\
         CREATE INDEX IF NOT EXISTS idx_checkpoints_expiry ON checkpoints(expires_at_ms);",
    )?;
    Ok(())
}

fn purge_expired(conn: &Connection, now_ms: i64) -> Result<usize, StoreError> {
    let removed = conn.execute(
        "DELETE FROM checkpoints WHERE expires_at_ms IS NOT NULL AND expires_at_ms <= ?1",
        params![now_ms],
    )?;
    Ok(removed)
}
