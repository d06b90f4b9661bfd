//! Error types for the voice analysis engine

use std::fmt;

/// Errors that can occur during voice analysis
///
/// Malformed numeric input is never an error: invalid frequencies and
/// undefined statistics propagate as NaN markers through the pipeline. The
/// variants here cover caller misuse only.
#[derive(Debug, Clone)]
pub enum AnalysisError {
    /// Invalid input parameters (mismatched series lengths, etc.)
    InvalidInput(String),

    /// The classifier capability violated its contract (wrong arity,
    /// non-probability outputs)
    ClassifierContract(String),

    /// Processing error during analysis
    ProcessingError(String),
}

impl fmt::Display for AnalysisError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnalysisError::InvalidInput(msg) => write!(f, "Invalid input: {}", msg),
            AnalysisError::ClassifierContract(msg) => {
                write!(f, "Classifier contract violation: {}", msg)
            }
            AnalysisError::ProcessingError(msg) => write!(f, "Processing error: {}", msg),
        }
    }
}

impl std::error::Error for AnalysisError {}
