use std::path::Path;

use anyhow::{Context, Result};
use serde_json::Value;

use crate::models::{DiarizedSegment, RawUtterance, TranscriptionSource};

/// Parse a transcription input file into one of the three source shapes.
pub fn parse_transcription_file(path: &Path) -> Result<TranscriptionSource> {
    let content =
        std::fs::read_to_string(path).with_context(|| format!("Failed to read file: {:?}", path))?;
    parse_transcription_json(&content)
}

/// Detect and parse a transcription source from JSON.
///
/// Accepted shapes, tried in order:
/// - a top-level array of `{speaker, message}` records (canonical);
/// - an object with a `transcript` array (the cached artifact form of the
///   canonical list);
/// - an object with a non-empty `utterances` array of speaker-tagged
///   segments (diarized);
/// - an object with a `text` string (no diarization).
pub fn parse_transcription_json(json: &str) -> Result<TranscriptionSource> {
    let value: Value = serde_json::from_str(json).context("Failed to parse transcription JSON")?;

    if value.is_array() {
        let entries: Vec<RawUtterance> =
            serde_json::from_value(value).context("Failed to parse canonical utterance list")?;
        return Ok(TranscriptionSource::Canonical(entries));
    }

    let Value::Object(object) = value else {
        anyhow::bail!("Unrecognized transcription format: expected an array or object");
    };

    if let Some(cached) = object.get("transcript").filter(|v| v.is_array()) {
        let entries: Vec<RawUtterance> = serde_json::from_value(cached.clone())
            .context("Failed to parse cached transcript list")?;
        return Ok(TranscriptionSource::Canonical(entries));
    }

    if let Some(utterances) = object.get("utterances").and_then(Value::as_array) {
        if !utterances.is_empty() {
            let segments: Vec<DiarizedSegment> =
                serde_json::from_value(Value::Array(utterances.clone()))
                    .context("Failed to parse diarized utterances")?;
            return Ok(TranscriptionSource::Diarized(segments));
        }
    }

    if let Some(text) = object.get("text").and_then(Value::as_str) {
        return Ok(TranscriptionSource::PlainText(text.to_string()));
    }

    anyhow::bail!(
        "Unrecognized transcription format: expected a canonical list, `utterances`, or `text`"
    )
}
