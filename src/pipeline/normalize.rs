use thiserror::Error;

use crate::models::{TranscriptionSource, Utterance};

/// Speaker placeholder when the source carries no diarization at all.
const GENERIC_SPEAKER: &str = "Speaker";

/// Error from validating an already-canonical utterance list.
///
/// Malformed canonical input is rejected outright; guessing at missing
/// fields would corrupt the positional correlation every later stage
/// depends on.
#[derive(Debug, Error)]
pub enum NormalizeError {
    #[error("canonical utterance {index} is missing the `{field}` field")]
    MissingField { index: usize, field: &'static str },
}

/// Convert any transcription source into the canonical ordered utterance
/// sequence.
///
/// Canonical input passes through after validation; diarized segments get the
/// human-readable "Speaker " prefix where absent; plain text collapses to a
/// single utterance under a generic speaker label.
pub fn normalize(source: TranscriptionSource) -> Result<Vec<Utterance>, NormalizeError> {
    match source {
        TranscriptionSource::Canonical(raw) => raw
            .into_iter()
            .enumerate()
            .map(|(index, entry)| {
                let speaker = entry.speaker.ok_or(NormalizeError::MissingField {
                    index,
                    field: "speaker",
                })?;
                let message = entry.message.ok_or(NormalizeError::MissingField {
                    index,
                    field: "message",
                })?;
                Ok(Utterance { speaker, message })
            })
            .collect(),

        TranscriptionSource::Diarized(segments) => Ok(segments
            .into_iter()
            .map(|segment| {
                let label = segment.speaker.unwrap_or_else(|| "Unknown".to_string());
                let speaker = if label.starts_with("Speaker") {
                    label
                } else {
                    format!("Speaker {}", label)
                };
                Utterance {
                    speaker,
                    message: segment.text,
                }
            })
            .collect()),

        TranscriptionSource::PlainText(text) => Ok(vec![Utterance {
            speaker: GENERIC_SPEAKER.to_string(),
            message: text,
        }]),
    }
}

/// Format utterances as "speaker: message" blocks for the evaluation prompts.
pub fn format_with_speakers(utterances: &[Utterance]) -> String {
    utterances
        .iter()
        .map(|u| format!("{}: {}", u.speaker, u.message))
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Single-newline rendition kept in the analysis artifact.
pub fn format_flat(utterances: &[Utterance]) -> String {
    utterances
        .iter()
        .map(|u| format!("{}: {}", u.speaker, u.message))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DiarizedSegment, RawUtterance};

    fn raw(speaker: Option<&str>, message: Option<&str>) -> RawUtterance {
        RawUtterance {
            speaker: speaker.map(str::to_string),
            message: message.map(str::to_string),
        }
    }

    #[test]
    fn test_canonical_passes_through() {
        let source = TranscriptionSource::Canonical(vec![
            raw(Some("Speaker A"), Some("hello")),
            raw(Some("Speaker B"), Some("hi")),
        ]);
        let utterances = normalize(source).unwrap();
        assert_eq!(
            utterances,
            vec![
                Utterance::new("Speaker A", "hello"),
                Utterance::new("Speaker B", "hi"),
            ]
        );
    }

    #[test]
    fn test_canonical_missing_message_rejected() {
        let source = TranscriptionSource::Canonical(vec![
            raw(Some("Speaker A"), Some("hello")),
            raw(Some("Speaker B"), None),
        ]);
        let err = normalize(source).unwrap_err();
        assert_eq!(
            err.to_string(),
            "canonical utterance 1 is missing the `message` field"
        );
    }

    #[test]
    fn test_canonical_missing_speaker_rejected() {
        let source = TranscriptionSource::Canonical(vec![raw(None, Some("hello"))]);
        assert!(normalize(source).is_err());
    }

    #[test]
    fn test_diarized_prefixes_speaker_labels() {
        let source = TranscriptionSource::Diarized(vec![
            DiarizedSegment {
                speaker: Some("A".to_string()),
                text: "first".to_string(),
            },
            DiarizedSegment {
                speaker: Some("Speaker B".to_string()),
                text: "second".to_string(),
            },
            DiarizedSegment {
                speaker: None,
                text: "third".to_string(),
            },
        ]);
        let utterances = normalize(source).unwrap();
        assert_eq!(utterances[0].speaker, "Speaker A");
        assert_eq!(utterances[1].speaker, "Speaker B");
        assert_eq!(utterances[2].speaker, "Speaker Unknown");
    }

    #[test]
    fn test_plain_text_single_utterance() {
        let source = TranscriptionSource::PlainText("the whole recording".to_string());
        let utterances = normalize(source).unwrap();
        assert_eq!(utterances.len(), 1);
        assert_eq!(utterances[0].speaker, "Speaker");
        assert_eq!(utterances[0].message, "the whole recording");
    }

    #[test]
    fn test_formatting() {
        let utterances = vec![
            Utterance::new("Speaker A", "hello"),
            Utterance::new("Speaker B", "hi"),
        ];
        assert_eq!(
            format_with_speakers(&utterances),
            "Speaker A: hello\n\nSpeaker B: hi"
        );
        assert_eq!(format_flat(&utterances), "Speaker A: hello\nSpeaker B: hi");
    }
}
