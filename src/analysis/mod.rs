//! Analysis result aggregation
//!
//! Result and metadata types produced by the full pipeline:
//! - Perceived-gender labels and classification scores
//! - The complete per-recording analysis record

pub mod result;

pub use result::{AnalysisMetadata, ClassificationResult, GenderLabel, VoiceAnalysis};
