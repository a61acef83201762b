use serde::{Deserialize, Serialize};

/// One ordered speaker+text unit of the canonical transcript.
///
/// Position in the sequence is the sole correlation key used downstream;
/// utterances carry no identifier of their own.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Utterance {
    pub speaker: String,
    pub message: String,
}

impl Utterance {
    pub fn new(speaker: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            speaker: speaker.into(),
            message: message.into(),
        }
    }
}

/// A not-yet-validated canonical utterance as it appears on disk.
///
/// Both fields are optional so the normalizer can reject malformed entries
/// with a precise error instead of failing inside serde.
#[derive(Debug, Clone, Deserialize)]
pub struct RawUtterance {
    #[serde(default)]
    pub speaker: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

/// One speaker-tagged segment of a diarized transcript.
#[derive(Debug, Clone, Deserialize)]
pub struct DiarizedSegment {
    #[serde(default)]
    pub speaker: Option<String>,
    pub text: String,
}

/// The three shapes a transcription source can arrive in.
#[derive(Debug, Clone)]
pub enum TranscriptionSource {
    /// An already-canonical ordered `{speaker, message}` list (cache hit).
    Canonical(Vec<RawUtterance>),
    /// A diarized transcript exposing ordered speaker-tagged segments.
    Diarized(Vec<DiarizedSegment>),
    /// A transcript with no diarization, just the full text.
    PlainText(String),
}
