use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use chrono::{DateTime, Utc};
use rusqlite::{Connection, OptionalExtension};
use tracing::{debug, info};

use crate::error::PersistError;
use crate::store::{InstallationState, PersistenceStore};
use crate::version::semver::SemanticVersion;

/// Installation state stored in SQLite, keyed by application id
pub struct SqliteStore {
    conn: Mutex<Connection>,
    app_id: String,
}

impl SqliteStore {
    pub fn new(db_path: &Path, app_id: &str) -> Result<Self, PersistError> {
        info!("Initializing state database at {:?}", db_path);

        let conn = Connection::open(db_path)?;

        conn.pragma_update(None, "journal_mode", "WAL")?;
        conn.pragma_update(None, "synchronous", "NORMAL")?;
        conn.pragma_update(None, "foreign_keys", "ON")?;

        let store = Self {
            conn: Mutex::new(conn),
            app_id: app_id.to_string(),
        };

        store.create_schema()?;
        debug!("State database ready for {}", app_id);

        Ok(store)
    }

    fn lock_conn(&self) -> Result<MutexGuard<'_, Connection>, PersistError> {
        self.conn.lock().map_err(|_| PersistError::LockPoisoned)
    }

    fn create_schema(&self) -> Result<(), PersistError> {
        let conn = self.lock_conn()?;

        conn.execute(
            r#"
            CREATE TABLE IF NOT EXISTS installations (
                app_id TEXT PRIMARY KEY,
                last_prompted_version TEXT,
                last_prompt_at_ns INTEGER
            )
            "#,
            [],
        )?;

        conn.execute(
            r#"
            CREATE TABLE IF NOT EXISTS skipped_versions (
                app_id TEXT NOT NULL,
                version TEXT NOT NULL,
                FOREIGN KEY (app_id) REFERENCES installations(app_id) ON DELETE CASCADE,
                UNIQUE(app_id, version)
            )
            "#,
            [],
        )?;

        Ok(())
    }
}

fn parse_stored_version(raw: &str) -> Result<SemanticVersion, PersistError> {
    raw.parse()
        .map_err(|e| PersistError::Corrupt(format!("stored version: {e}")))
}

/// Timestamps are stored as nanoseconds so a saved state loads back unchanged
fn timestamp_to_nanos(at: DateTime<Utc>) -> Result<i64, PersistError> {
    at.timestamp_nanos_opt().ok_or(PersistError::TimestampOutOfRange(at))
}

impl PersistenceStore for SqliteStore {
    fn load(&self) -> Result<InstallationState, PersistError> {
        let conn = self.lock_conn()?;

        let row: Option<(Option<String>, Option<i64>)> = conn
            .query_row(
                "SELECT last_prompted_version, last_prompt_at_ns FROM installations WHERE app_id = ?1",
                [&self.app_id],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .optional()?;

        let Some((version, prompted_at)) = row else {
            debug!("No stored state for {}", self.app_id);
            return Ok(InstallationState::default());
        };

        let mut stmt = conn.prepare("SELECT version FROM skipped_versions WHERE app_id = ?1")?;
        let skipped = stmt
            .query_map([&self.app_id], |row| row.get::<_, String>(0))?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(InstallationState {
            last_prompted_version: version.as_deref().map(parse_stored_version).transpose()?,
            last_prompt_timestamp: prompted_at.map(DateTime::from_timestamp_nanos),
            skipped_versions: skipped
                .iter()
                .map(|v| parse_stored_version(v))
                .collect::<Result<_, _>>()?,
        })
    }

    fn save(&self, state: &InstallationState) -> Result<(), PersistError> {
        let prompted_at = state
            .last_prompt_timestamp
            .map(timestamp_to_nanos)
            .transpose()?;

        let mut conn = self.lock_conn()?;
        let tx = conn.transaction()?;

        tx.execute(
            r#"
            INSERT INTO installations (app_id, last_prompted_version, last_prompt_at_ns)
            VALUES (?1, ?2, ?3)
            ON CONFLICT(app_id) DO UPDATE SET
                last_prompted_version = excluded.last_prompted_version,
                last_prompt_at_ns = excluded.last_prompt_at_ns
            "#,
            (
                &self.app_id,
                state.last_prompted_version.map(|v| v.to_string()),
                prompted_at,
            ),
        )?;

        tx.execute(
            "DELETE FROM skipped_versions WHERE app_id = ?1",
            [&self.app_id],
        )?;

        {
            let mut stmt =
                tx.prepare("INSERT INTO skipped_versions (app_id, version) VALUES (?1, ?2)")?;
            for version in &state.skipped_versions {
                stmt.execute((&self.app_id, version.to_string()))?;
            }
        }

        tx.commit()?;

        debug!(
            "Saved state for {} ({} skipped versions)",
            self.app_id,
            state.skipped_versions.len()
        );
        Ok(())
    }

    fn clear(&self) -> Result<(), PersistError> {
        let conn = self.lock_conn()?;
        conn.execute("DELETE FROM installations WHERE app_id = ?1", [&self.app_id])?;
        conn.execute(
            "DELETE FROM skipped_versions WHERE app_id = ?1",
            [&self.app_id],
        )?;
        info!("Cleared stored state for {}", self.app_id);
        Ok(())
    }
}
