pub mod artifact;
pub mod input;

pub use artifact::AnalysisArtifact;
pub use input::{parse_transcription_file, parse_transcription_json};
