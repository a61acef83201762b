use serde::Serialize;

use crate::models::{CategoryOutcome, RubricPayload, SentimentPayload};

/// The reconciled per-message record: one per input utterance, same ordinal
/// position. Each category field is independently absent, failed, or present.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MergedMessage {
    pub speaker: String,
    pub text: String,
    #[serde(skip_serializing_if = "CategoryOutcome::is_absent")]
    pub sentiment: CategoryOutcome<SentimentPayload>,
    #[serde(skip_serializing_if = "CategoryOutcome::is_absent")]
    pub dear_man: CategoryOutcome<RubricPayload>,
    #[serde(skip_serializing_if = "CategoryOutcome::is_absent")]
    pub fast: CategoryOutcome<RubricPayload>,
}

impl MergedMessage {
    /// A merged message with all category fields still unwritten.
    pub fn bare(speaker: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            speaker: speaker.into(),
            text: text.into(),
            sentiment: CategoryOutcome::Absent,
            dear_man: CategoryOutcome::Absent,
            fast: CategoryOutcome::Absent,
        }
    }
}
