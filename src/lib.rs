pub mod db;
pub mod io;
pub mod llm;
pub mod models;
pub mod pipeline;

pub use db::{Database, MeetingTranscript, MetricsFilter, PieSlice, Speaker};
pub use io::{parse_transcription_file, parse_transcription_json, AnalysisArtifact};
pub use llm::{OpenRouterClient, OpenRouterConfig};
pub use models::{
    Category, CategoryFailure, CategoryOutcome, CategoryResult, CategoryResults, MergedMessage,
    RubricPayload, SentimentPayload, SkillJudgment, TranscriptionSource, Utterance,
};
pub use pipeline::{
    merge, normalize, run_analysis, store_analysis, AnalysisRun, PipelineConfig, StoreSummary,
};
