use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Serialize;

use crate::models::{CategoryResults, MergedMessage};

/// Durable record of one full pipeline run, written for audit and replay.
///
/// Nothing inside the pipeline reads it back.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisArtifact {
    pub run_id: String,
    pub transcript: String,
    pub transcript_with_speakers: String,
    pub raw_category_results: CategoryResults,
    pub messages: Vec<MergedMessage>,
}

impl AnalysisArtifact {
    /// Write to a JSON file, creating parent directories as needed.
    pub fn write_json(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create artifact directory: {:?}", parent))?;
            }
        }
        let file = std::fs::File::create(path)
            .with_context(|| format!("Failed to create file: {:?}", path))?;
        serde_json::to_writer_pretty(file, self).context("Failed to write artifact JSON")?;
        Ok(())
    }
}

/// Artifact location for a run: `<dir>/<stem>_analysis.json`.
pub fn artifact_path(dir: &Path, stem: &str) -> PathBuf {
    dir.join(format!("{}_analysis.json", stem))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        CategoryFailure, CategoryOutcome, CategoryResult, MergedMessage, SentimentPayload,
    };
    use tempfile::tempdir;

    #[test]
    fn test_write_artifact_json() {
        let dir = tempdir().unwrap();
        let artifact = AnalysisArtifact {
            run_id: "run-1".to_string(),
            transcript: "Speaker A: hello".to_string(),
            transcript_with_speakers: "Speaker A: hello".to_string(),
            raw_category_results: CategoryResults {
                sentiment: CategoryResult::Success {
                    messages: vec![CategoryOutcome::Present(SentimentPayload {
                        label: "positive".to_string(),
                        explanation: None,
                    })],
                },
                dear_man: CategoryResult::Failure(CategoryFailure::unparseable(
                    "garbled",
                    "expected value",
                )),
                fast: CategoryResult::Success { messages: vec![] },
            },
            messages: vec![MergedMessage::bare("Speaker A", "hello")],
        };

        let path = artifact_path(dir.path().join("nested").as_path(), "standup");
        artifact.write_json(&path).unwrap();

        let written: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(written["run_id"], "run-1");
        assert_eq!(
            written["raw_category_results"]["dear_man"]["error"],
            "expected value"
        );
        assert_eq!(
            written["raw_category_results"]["sentiment"]["messages"][0]["label"],
            "positive"
        );
        // Absent category fields are omitted entirely from merged messages.
        assert!(written["messages"][0].get("sentiment").is_none());
    }
}
