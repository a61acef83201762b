use anyhow::{Context, Result};
use rusqlite::Connection;

/// Create tables and indexes if they don't exist.
///
/// Speaker name uniqueness is enforced here, at the storage layer, so that
/// concurrent writers racing to create the same speaker cannot produce
/// duplicate rows.
pub fn init_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS speakers (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL UNIQUE
        );

        CREATE TABLE IF NOT EXISTS meeting_transcripts (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            date TEXT NOT NULL,
            created_at TEXT DEFAULT CURRENT_TIMESTAMP
        );

        CREATE TABLE IF NOT EXISTS transcript_messages (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            meeting_transcript_id INTEGER NOT NULL,
            speaker_id INTEGER NOT NULL,
            text TEXT NOT NULL,
            created_at TEXT DEFAULT CURRENT_TIMESTAMP,
            FOREIGN KEY (meeting_transcript_id) REFERENCES meeting_transcripts(id),
            FOREIGN KEY (speaker_id) REFERENCES speakers(id)
        );

        CREATE TABLE IF NOT EXISTS transcript_message_tags (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            transcript_message_id INTEGER NOT NULL,
            category TEXT NOT NULL,
            sub_category TEXT,
            label TEXT,
            score REAL,
            FOREIGN KEY (transcript_message_id) REFERENCES transcript_messages(id)
        );

        CREATE INDEX IF NOT EXISTS idx_tags_category ON transcript_message_tags(category);
        CREATE INDEX IF NOT EXISTS idx_tags_sub_category ON transcript_message_tags(sub_category);
        CREATE INDEX IF NOT EXISTS idx_messages_transcript ON transcript_messages(meeting_transcript_id);
        CREATE INDEX IF NOT EXISTS idx_messages_speaker ON transcript_messages(speaker_id);",
    )
    .context("Failed to create tables")
}
