pub mod metrics;
pub mod schema;
pub mod writers;

use std::path::Path;
use std::sync::Mutex;

use anyhow::{Context, Result};
use rusqlite::Connection;
use tracing::debug;

pub use metrics::{MetricsFilter, PieSlice};

/// A stored speaker row.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct Speaker {
    pub id: i64,
    pub name: String,
}

/// A stored meeting transcript row.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct MeetingTranscript {
    pub id: i64,
    pub name: String,
    pub date: String,
}

/// SQLite-backed store for speakers, transcripts, messages, and tags.
///
/// Each writer call runs in its own implicit transaction and commits before
/// returning; there are no long-lived transactions spanning messages.
pub struct Database {
    conn: Mutex<Connection>,
}

impl Database {
    /// Open (or create) the database at the given path and apply the schema.
    pub fn open(db_path: &Path) -> Result<Self> {
        if let Some(parent) = db_path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).context("Failed to create database directory")?;
            }
        }

        let conn = Connection::open(db_path).context("Failed to open database")?;

        conn.execute("PRAGMA foreign_keys = ON", [])
            .context("Failed to enable foreign keys")?;

        schema::init_schema(&conn).context("Failed to initialize database schema")?;

        debug!("Database initialized at {:?}", db_path);

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Execute a function with access to the database connection
    pub(crate) fn with_connection<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Connection) -> Result<T>,
    {
        let conn = self
            .conn
            .lock()
            .map_err(|e| anyhow::anyhow!("Failed to lock database connection: {}", e))?;
        f(&conn)
    }

    /// All speakers, ordered by name.
    pub fn all_speakers(&self) -> Result<Vec<Speaker>> {
        self.with_connection(|conn| {
            let mut stmt = conn
                .prepare("SELECT id, name FROM speakers ORDER BY name")
                .context("Failed to prepare speakers query")?;
            let rows = stmt
                .query_map([], |row| {
                    Ok(Speaker {
                        id: row.get(0)?,
                        name: row.get(1)?,
                    })
                })
                .context("Failed to query speakers")?;
            rows.collect::<std::result::Result<Vec<_>, _>>()
                .context("Failed to collect speakers")
        })
    }

    /// All meeting transcripts, most recent first.
    pub fn all_transcripts(&self) -> Result<Vec<MeetingTranscript>> {
        self.with_connection(|conn| {
            let mut stmt = conn
                .prepare("SELECT id, name, date FROM meeting_transcripts ORDER BY date DESC")
                .context("Failed to prepare transcripts query")?;
            let rows = stmt
                .query_map([], |row| {
                    Ok(MeetingTranscript {
                        id: row.get(0)?,
                        name: row.get(1)?,
                        date: row.get(2)?,
                    })
                })
                .context("Failed to query transcripts")?;
            rows.collect::<std::result::Result<Vec<_>, _>>()
                .context("Failed to collect transcripts")
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_database_creation() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("test.db");

        let db = Database::open(&db_path).unwrap();
        assert!(db_path.exists());

        assert!(db.all_speakers().unwrap().is_empty());
        assert!(db.all_transcripts().unwrap().is_empty());
    }

    #[test]
    fn test_reopen_is_idempotent() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("test.db");

        {
            let db = Database::open(&db_path).unwrap();
            db.get_or_create_speaker("Speaker A").unwrap();
        }
        let db = Database::open(&db_path).unwrap();
        assert_eq!(db.all_speakers().unwrap().len(), 1);
    }
}
