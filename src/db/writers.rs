use anyhow::{Context, Result};
use chrono::Utc;
use rusqlite::params;

use super::Database;
use crate::models::Category;

impl Database {
    /// Look up a speaker by unique name, inserting on miss. Returns the id.
    ///
    /// Insert-then-select against the UNIQUE constraint, so two writers racing
    /// on a new name both land on the single winning row.
    pub fn get_or_create_speaker(&self, name: &str) -> Result<i64> {
        self.with_connection(|conn| {
            conn.execute(
                "INSERT INTO speakers (name) VALUES (?1) ON CONFLICT(name) DO NOTHING",
                params![name],
            )
            .context("Failed to insert speaker")?;

            conn.query_row(
                "SELECT id FROM speakers WHERE name = ?1",
                params![name],
                |row| row.get(0),
            )
            .context("Failed to look up speaker")
        })
    }

    /// Create a meeting transcript row. The date defaults to now; names are
    /// not de-duplicated.
    pub fn create_meeting_transcript(&self, name: &str, date: Option<&str>) -> Result<i64> {
        let date = date
            .map(str::to_string)
            .unwrap_or_else(|| Utc::now().to_rfc3339());

        self.with_connection(|conn| {
            conn.execute(
                "INSERT INTO meeting_transcripts (name, date) VALUES (?1, ?2)",
                params![name, date],
            )
            .context("Failed to create meeting transcript")?;
            Ok(conn.last_insert_rowid())
        })
    }

    pub fn create_transcript_message(
        &self,
        meeting_transcript_id: i64,
        speaker_id: i64,
        text: &str,
    ) -> Result<i64> {
        self.with_connection(|conn| {
            conn.execute(
                "INSERT INTO transcript_messages (meeting_transcript_id, speaker_id, text)
                 VALUES (?1, ?2, ?3)",
                params![meeting_transcript_id, speaker_id, text],
            )
            .context("Failed to create transcript message")?;
            Ok(conn.last_insert_rowid())
        })
    }

    /// Attach one (category, sub_category, label, score) fact to a message.
    pub fn create_transcript_message_tag(
        &self,
        transcript_message_id: i64,
        category: Category,
        sub_category: Option<&str>,
        label: Option<&str>,
        score: Option<f64>,
    ) -> Result<i64> {
        self.with_connection(|conn| {
            conn.execute(
                "INSERT INTO transcript_message_tags
                 (transcript_message_id, category, sub_category, label, score)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![
                    transcript_message_id,
                    category.as_str(),
                    sub_category,
                    label,
                    score
                ],
            )
            .context("Failed to create transcript message tag")?;
            Ok(conn.last_insert_rowid())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn create_test_db() -> (tempfile::TempDir, Database) {
        let dir = tempdir().unwrap();
        let db = Database::open(&dir.path().join("test.db")).unwrap();
        (dir, db)
    }

    #[test]
    fn test_get_or_create_speaker_idempotent() {
        let (_dir, db) = create_test_db();

        let first = db.get_or_create_speaker("Speaker A").unwrap();
        let second = db.get_or_create_speaker("Speaker A").unwrap();

        assert_eq!(first, second);
        assert_eq!(db.all_speakers().unwrap().len(), 1);
    }

    #[test]
    fn test_distinct_speakers_get_distinct_ids() {
        let (_dir, db) = create_test_db();

        let a = db.get_or_create_speaker("Speaker A").unwrap();
        let b = db.get_or_create_speaker("Speaker B").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_create_meeting_transcript_defaults_date() {
        let (_dir, db) = create_test_db();

        let id = db.create_meeting_transcript("standup.wav", None).unwrap();
        let transcripts = db.all_transcripts().unwrap();
        assert_eq!(transcripts.len(), 1);
        assert_eq!(transcripts[0].id, id);
        assert!(!transcripts[0].date.is_empty());

        // Explicit dates are stored verbatim; no name de-duplication.
        db.create_meeting_transcript("standup.wav", Some("2026-01-15T09:00:00Z"))
            .unwrap();
        let transcripts = db.all_transcripts().unwrap();
        assert_eq!(transcripts.len(), 2);
    }

    #[test]
    fn test_message_and_tag_round_trip() {
        let (_dir, db) = create_test_db();

        let speaker = db.get_or_create_speaker("Speaker A").unwrap();
        let transcript = db.create_meeting_transcript("m", None).unwrap();
        let message = db
            .create_transcript_message(transcript, speaker, "hello")
            .unwrap();

        let tag = db
            .create_transcript_message_tag(
                message,
                Category::Sentiment,
                None,
                Some("positive"),
                None,
            )
            .unwrap();
        assert!(tag > 0);
    }
}
