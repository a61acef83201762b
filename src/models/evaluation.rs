use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Structured sentiment payload for one message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SentimentPayload {
    /// One of "positive", "negative", "neutral" (as judged by the model).
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
}

/// Per-skill adherence judgment within a rubric payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillJudgment {
    pub adhered: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
}

/// Structured rubric payload (DEAR MAN or FAST) for one message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RubricPayload {
    /// Total score, one point per adhered skill (0-7 or 0-4).
    pub score: f64,
    /// Per-skill judgments keyed by skill name.
    #[serde(default)]
    pub breakdown: BTreeMap<String, SkillJudgment>,
}

/// Opaque failure captured from an evaluation attempt.
///
/// At least one of the two fields is populated: `raw_response` carries the
/// model text we could not parse, `error` the reason.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryFailure {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw_response: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl CategoryFailure {
    /// Failure with no salvageable model output (transport errors and the like).
    pub fn error_only(error: impl Into<String>) -> Self {
        Self {
            raw_response: None,
            error: Some(error.into()),
        }
    }

    /// Failure that preserves the unparseable model output.
    pub fn unparseable(raw_response: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            raw_response: Some(raw_response.into()),
            error: Some(error.into()),
        }
    }
}

/// Per-message outcome for one category field.
///
/// `Absent` means the category response did not cover this position (no
/// data); `Failed` means it covered it with an error marker. The distinction
/// is load-bearing: absent fields are silently skipped at persistence time,
/// failed fields are visible on the merged record.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum CategoryOutcome<T> {
    Absent,
    Failed(CategoryFailure),
    Present(T),
}

impl<T> CategoryOutcome<T> {
    pub fn is_absent(&self) -> bool {
        matches!(self, CategoryOutcome::Absent)
    }

    pub fn payload(&self) -> Option<&T> {
        match self {
            CategoryOutcome::Present(payload) => Some(payload),
            _ => None,
        }
    }
}

/// Result of evaluating one category over the whole transcript.
///
/// `Failure` applies uniformly to every message of the category; a `Success`
/// carries one outcome per returned entry, positionally aligned with the
/// utterance sequence.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum CategoryResult<T> {
    Success { messages: Vec<CategoryOutcome<T>> },
    Failure(CategoryFailure),
}

impl<T> CategoryResult<T> {
    pub fn is_failure(&self) -> bool {
        matches!(self, CategoryResult::Failure(_))
    }
}

/// The three category results of one pipeline run, obtained independently.
#[derive(Debug, Clone, Serialize)]
pub struct CategoryResults {
    pub sentiment: CategoryResult<SentimentPayload>,
    pub dear_man: CategoryResult<RubricPayload>,
    pub fast: CategoryResult<RubricPayload>,
}
