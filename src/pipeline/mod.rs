pub mod evaluate;
pub mod merge;
pub mod normalize;
pub mod persist;

pub use evaluate::{evaluate_all, evaluate_category};
pub use merge::merge;
pub use normalize::{format_flat, format_with_speakers, normalize, NormalizeError};
pub use persist::{store_analysis, StoreSummary};

use std::path::PathBuf;

use anyhow::{Context, Result};
use tracing::info;

use crate::io::artifact::{artifact_path, AnalysisArtifact};
use crate::llm::{OpenRouterClient, OpenRouterConfig};
use crate::models::{CategoryResults, MergedMessage, TranscriptionSource, Utterance};

/// Explicit configuration for one pipeline run.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Model and credentials for the evaluation calls.
    pub api: OpenRouterConfig,
    /// Where to write the per-run analysis artifact; None disables it.
    pub artifact_dir: Option<PathBuf>,
}

/// Everything produced by one full pipeline run.
#[derive(Debug)]
pub struct AnalysisRun {
    pub run_id: String,
    pub utterances: Vec<Utterance>,
    pub results: CategoryResults,
    pub messages: Vec<MergedMessage>,
    pub artifact_path: Option<PathBuf>,
}

/// Run the full analysis pipeline over one transcription source:
/// normalize, evaluate the three categories, merge, and write the audit
/// artifact.
///
/// Persistence is a separate step (`store_analysis`) so callers can inspect
/// or replay a run without touching the database.
pub async fn run_analysis(
    config: &PipelineConfig,
    source: TranscriptionSource,
    run_name: &str,
) -> Result<AnalysisRun> {
    let run_id = uuid::Uuid::new_v4().to_string();

    let utterances = normalize(source).context("Failed to normalize transcription input")?;
    info!("Normalized {} utterances", utterances.len());

    let transcript_with_speakers = format_with_speakers(&utterances);

    let client = OpenRouterClient::new(config.api.clone());
    let results = evaluate_all(&client, &transcript_with_speakers).await;
    for (category, failed) in [
        ("sentiment", results.sentiment.is_failure()),
        ("dear_man", results.dear_man.is_failure()),
        ("fast", results.fast.is_failure()),
    ] {
        if failed {
            info!("Category {} degraded to a uniform failure", category);
        }
    }

    let messages = merge(&utterances, &results);

    let artifact_path = match &config.artifact_dir {
        Some(dir) => {
            let artifact = AnalysisArtifact {
                run_id: run_id.clone(),
                transcript: format_flat(&utterances),
                transcript_with_speakers,
                raw_category_results: results.clone(),
                messages: messages.clone(),
            };
            let path = artifact_path(dir, run_name);
            artifact.write_json(&path)?;
            info!("Wrote analysis artifact to {:?}", path);
            Some(path)
        }
        None => None,
    };

    Ok(AnalysisRun {
        run_id,
        utterances,
        results,
        messages,
        artifact_path,
    })
}
