//! Analysis result types

use crate::features::FeatureVector;
use crate::track::Frame;
use serde::{Deserialize, Serialize};

/// Perceived-gender label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GenderLabel {
    /// Masculine-read voice
    Masc,
    /// Feminine-read voice
    Femme,
    /// Androgynous-read voice
    Andro,
    /// Androgynous, leaning masculine
    AndroMasc,
    /// Androgynous, leaning feminine
    AndroFemme,
    /// Masculine voice with falsetto pitch behavior
    MascFalsetto,
    /// Feminine read produced by falsetto rather than vocal support
    FemmeFalsetto,
    /// Androgynous read produced by falsetto
    AndroFalsetto,
}

impl GenderLabel {
    /// Canonical uppercase wire name (e.g. `"ANDRO_FEMME"`).
    ///
    /// These are the exact strings downstream persistence constrains labels
    /// to, so they must not drift.
    pub fn as_str(&self) -> &'static str {
        match self {
            GenderLabel::Masc => "MASC",
            GenderLabel::Femme => "FEMME",
            GenderLabel::Andro => "ANDRO",
            GenderLabel::AndroMasc => "ANDRO_MASC",
            GenderLabel::AndroFemme => "ANDRO_FEMME",
            GenderLabel::MascFalsetto => "MASC_FALSETTO",
            GenderLabel::FemmeFalsetto => "FEMME_FALSETTO",
            GenderLabel::AndroFalsetto => "ANDRO_FALSETTO",
        }
    }
}

impl std::fmt::Display for GenderLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Final classification: label plus confidence score in [0, 1]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClassificationResult {
    /// Perceived-gender label
    pub label: GenderLabel,
    /// Confidence score in [0, 1]
    pub score: f64,
}

/// Analysis metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisMetadata {
    /// Raw frames presented to the filter
    pub frames_total: usize,

    /// Frames surviving the frequency filter
    pub frames_accepted: usize,

    /// Analysis steps in the raw pitch series
    pub pitch_steps_total: usize,

    /// Processing time in milliseconds
    pub processing_time_ms: f64,

    /// Algorithm version
    pub algorithm_version: String,
}

/// Complete voice analysis result
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VoiceAnalysis {
    /// Accepted subsequence of the raw track
    pub accepted: Vec<Frame>,

    /// Prepared feature vector (support features derived, clip ranges
    /// applied), exactly what the classifier and cascade saw
    pub features: FeatureVector,

    /// Final label and confidence score
    pub classification: ClassificationResult,

    /// Analysis metadata
    pub metadata: AnalysisMetadata,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_wire_names() {
        assert_eq!(GenderLabel::Masc.as_str(), "MASC");
        assert_eq!(GenderLabel::AndroFemme.as_str(), "ANDRO_FEMME");
        assert_eq!(GenderLabel::FemmeFalsetto.as_str(), "FEMME_FALSETTO");
        assert_eq!(GenderLabel::AndroFalsetto.to_string(), "ANDRO_FALSETTO");
    }

    #[test]
    fn test_label_serde_uses_wire_names() {
        let json = serde_json::to_string(&GenderLabel::AndroMasc).unwrap();
        assert_eq!(json, "\"ANDRO_MASC\"");
        let back: GenderLabel = serde_json::from_str("\"MASC_FALSETTO\"").unwrap();
        assert_eq!(back, GenderLabel::MascFalsetto);
    }
}
