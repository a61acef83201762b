use anyhow::Result;
use tracing::debug;

use crate::db::Database;
use crate::models::{Category, CategoryOutcome, MergedMessage, RubricPayload};

/// What one storage pass wrote.
#[derive(Debug)]
pub struct StoreSummary {
    pub transcript_id: i64,
    pub messages_stored: usize,
    pub tags_written: usize,
}

/// Normalize merged messages into the relational schema.
///
/// Sentiment becomes one label-only tag; each rubric becomes an `overall`
/// score tag plus one adherence tag per judged skill. Absent and failed
/// category fields write no tags at all; failures stay observable only on the
/// merged record upstream.
pub fn store_analysis(
    db: &Database,
    name: &str,
    date: Option<&str>,
    messages: &[MergedMessage],
) -> Result<StoreSummary> {
    let transcript_id = db.create_meeting_transcript(name, date)?;
    let mut tags_written = 0usize;

    for message in messages {
        let speaker_id = db.get_or_create_speaker(&message.speaker)?;
        let message_id = db.create_transcript_message(transcript_id, speaker_id, &message.text)?;

        if let CategoryOutcome::Present(sentiment) = &message.sentiment {
            db.create_transcript_message_tag(
                message_id,
                Category::Sentiment,
                None,
                Some(&sentiment.label),
                None,
            )?;
            tags_written += 1;
        }

        if let CategoryOutcome::Present(rubric) = &message.dear_man {
            tags_written += store_rubric_tags(db, message_id, Category::DearMan, rubric)?;
        }
        if let CategoryOutcome::Present(rubric) = &message.fast {
            tags_written += store_rubric_tags(db, message_id, Category::Fast, rubric)?;
        }
    }

    debug!(
        "Stored transcript {} ({} messages, {} tags)",
        transcript_id,
        messages.len(),
        tags_written
    );

    Ok(StoreSummary {
        transcript_id,
        messages_stored: messages.len(),
        tags_written,
    })
}

fn store_rubric_tags(
    db: &Database,
    message_id: i64,
    category: Category,
    rubric: &RubricPayload,
) -> Result<usize> {
    let mut written = 0usize;

    db.create_transcript_message_tag(
        message_id,
        category,
        Some("overall"),
        None,
        Some(rubric.score),
    )?;
    written += 1;

    // Only the named skills of the rubric are persisted; stray breakdown keys
    // from the model are ignored.
    for &skill in category.skills() {
        let Some(judgment) = rubric.breakdown.get(skill) else {
            continue;
        };
        let (label, score) = if judgment.adhered {
            ("adhered", 1.0)
        } else {
            ("did_not_adhere", 0.0)
        };
        db.create_transcript_message_tag(message_id, category, Some(skill), Some(label), Some(score))?;
        written += 1;
    }

    Ok(written)
}
