//! Classifier capability boundary
//!
//! The trained pipeline lives outside this crate; the core sees it only as a
//! pure scoring function over an ordered row of feature columns. The model
//! configuration carries the trained pipeline's column order and per-feature
//! clip ranges, the two pieces of metadata shipped alongside the model blob.

use crate::error::AnalysisError;
use crate::features::vector::{FeatureVector, FEATURE_NAMES};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Epsilon used when deriving the pitch-support ratio
pub const SUPPORT_RATIO_EPSILON: f64 = 1e-6;

/// Tolerance for the probabilities-sum-to-one contract check
const PROBABILITY_SUM_TOLERANCE: f64 = 1e-6;

/// Pure scoring capability of the pre-trained two-class model
///
/// Implementations receive one row of feature values, ordered per
/// [`ModelConfig::feature_names`], and return
/// `(p_masc, p_femme)` with the probabilities summing to 1. Any object
/// honoring this contract can stand in for the real pipeline, including
/// fixed-probability stubs in tests.
pub trait GenderScorer {
    /// Score one feature row.
    ///
    /// # Arguments
    ///
    /// * `row` - Feature values in the configured column order; missing
    ///   features arrive as NaN
    ///
    /// # Returns
    ///
    /// `(p_masc, p_femme)` probabilities
    fn score(&self, row: &[f64]) -> Result<(f64, f64), AnalysisError>;
}

/// Model metadata: column order and clip ranges
///
/// Deserializable so the trained pipeline's sidecar metadata can ship as
/// JSON. Features named here but missing from the vector are fed to the
/// scorer as NaN (the reindex-with-undefined convention); clip ranges for
/// unknown names are ignored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    /// Column order the trained pipeline expects
    pub feature_names: Vec<String>,

    /// Per-feature `[lo, hi]` clip ranges applied before scoring
    #[serde(default)]
    pub clip_ranges: HashMap<String, (f64, f64)>,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            feature_names: FEATURE_NAMES.iter().map(|s| s.to_string()).collect(),
            clip_ranges: HashMap::new(),
        }
    }
}

/// Prepare a feature vector for scoring.
///
/// Derives the pitch-support features from the accepted-track pitch
/// statistics, then clamps every feature with a configured clip range.
/// Undefined values pass through both steps unchanged. The guardrail
/// cascade reads the same prepared (clipped) values the model scores.
///
/// # Arguments
///
/// * `features` - Flattened feature vector
/// * `config` - Model metadata with clip ranges
///
/// # Returns
///
/// The prepared copy of the vector
pub fn prepare_features(features: &FeatureVector, config: &ModelConfig) -> FeatureVector {
    let mut prepared = *features;

    prepared.pitch_support_gap_hz = prepared.f0_med - prepared.f0_p5;
    prepared.pitch_support_ratio =
        (prepared.f0_p5 + SUPPORT_RATIO_EPSILON) / (prepared.f0_med + SUPPORT_RATIO_EPSILON);

    for (name, &(lo, hi)) in &config.clip_ranges {
        if lo > hi {
            log::warn!("Ignoring inverted clip range for {}: [{}, {}]", name, lo, hi);
            continue;
        }
        if let Some(value) = prepared.get(name) {
            if value.is_finite() {
                prepared.set(name, value.clamp(lo, hi));
            }
        }
    }

    prepared
}

/// Score a prepared feature vector through the classifier capability.
///
/// Orders the columns per the model configuration (unknown names become
/// NaN), invokes the scorer, and validates the probability contract: both
/// values finite, inside [0, 1], and summing to 1. A contract violation is
/// the one hard failure of the pipeline.
///
/// # Arguments
///
/// * `scorer` - The classifier capability
/// * `features` - Prepared feature vector (see [`prepare_features`])
/// * `config` - Model metadata with the column order
///
/// # Returns
///
/// `(p_masc, p_femme)`
///
/// # Errors
///
/// [`AnalysisError::ClassifierContract`] when the scorer output is not a
/// valid probability pair
pub fn score_features(
    scorer: &dyn GenderScorer,
    features: &FeatureVector,
    config: &ModelConfig,
) -> Result<(f64, f64), AnalysisError> {
    let row: Vec<f64> = config
        .feature_names
        .iter()
        .map(|name| features.get(name).unwrap_or(f64::NAN))
        .collect();

    let (p_masc, p_femme) = scorer.score(&row)?;

    if !p_masc.is_finite() || !p_femme.is_finite() {
        return Err(AnalysisError::ClassifierContract(format!(
            "non-finite probabilities ({}, {})",
            p_masc, p_femme
        )));
    }
    if !(0.0..=1.0).contains(&p_masc) || !(0.0..=1.0).contains(&p_femme) {
        return Err(AnalysisError::ClassifierContract(format!(
            "probabilities out of range ({}, {})",
            p_masc, p_femme
        )));
    }
    if ((p_masc + p_femme) - 1.0).abs() > PROBABILITY_SUM_TOLERANCE {
        return Err(AnalysisError::ClassifierContract(format!(
            "probabilities sum to {}, expected 1",
            p_masc + p_femme
        )));
    }

    log::debug!("Classifier probabilities: masc={:.4} femme={:.4}", p_masc, p_femme);

    Ok((p_masc, p_femme))
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Scorer returning fixed probabilities, recording nothing.
    struct FixedScorer(f64, f64);

    impl GenderScorer for FixedScorer {
        fn score(&self, _row: &[f64]) -> Result<(f64, f64), AnalysisError> {
            Ok((self.0, self.1))
        }
    }

    /// Scorer that echoes the row it received through a closure check.
    struct RowProbe<F: Fn(&[f64])>(F);

    impl<F: Fn(&[f64])> GenderScorer for RowProbe<F> {
        fn score(&self, row: &[f64]) -> Result<(f64, f64), AnalysisError> {
            (self.0)(row);
            Ok((0.5, 0.5))
        }
    }

    #[test]
    fn test_prepare_derives_support_features() {
        let mut features = FeatureVector::undefined();
        features.f0_med = 200.0;
        features.f0_p5 = 150.0;

        let prepared = prepare_features(&features, &ModelConfig::default());
        assert!((prepared.pitch_support_gap_hz - 50.0).abs() < 1e-9);
        assert!((prepared.pitch_support_ratio - 150.000001 / 200.000001).abs() < 1e-12);
    }

    #[test]
    fn test_prepare_support_features_undefined_without_pitch() {
        let prepared = prepare_features(&FeatureVector::undefined(), &ModelConfig::default());
        assert!(prepared.pitch_support_gap_hz.is_nan());
        assert!(prepared.pitch_support_ratio.is_nan());
    }

    #[test]
    fn test_prepare_applies_clip_ranges() {
        let mut features = FeatureVector::undefined();
        features.f1_med = 1200.0;
        features.hnr_mean_db = -5.0;

        let mut config = ModelConfig::default();
        config.clip_ranges.insert("F1_med".to_string(), (250.0, 950.0));
        config.clip_ranges.insert("hnr_mean_db".to_string(), (0.0, 40.0));
        config.clip_ranges.insert("voiced_frac".to_string(), (0.0, 1.0));

        let prepared = prepare_features(&features, &config);
        assert_eq!(prepared.f1_med, 950.0);
        assert_eq!(prepared.hnr_mean_db, 0.0);
        // Undefined features are never clipped into existence
        assert!(prepared.voiced_frac.is_nan());
    }

    #[test]
    fn test_score_orders_columns_and_fills_unknown_with_nan() {
        let mut features = FeatureVector::undefined();
        features.f0_med = 180.0;
        features.f1_med = 480.0;

        let config = ModelConfig {
            feature_names: vec![
                "F1_med".to_string(),
                "F0_med".to_string(),
                "not_a_feature".to_string(),
            ],
            clip_ranges: HashMap::new(),
        };

        let probe = RowProbe(|row: &[f64]| {
            assert_eq!(row.len(), 3);
            assert_eq!(row[0], 480.0);
            assert_eq!(row[1], 180.0);
            assert!(row[2].is_nan());
        });
        score_features(&probe, &features, &config).unwrap();
    }

    #[test]
    fn test_contract_violations_are_hard_failures() {
        let features = FeatureVector::undefined();
        let config = ModelConfig::default();

        let bad_sum = FixedScorer(0.7, 0.7);
        assert!(matches!(
            score_features(&bad_sum, &features, &config),
            Err(AnalysisError::ClassifierContract(_))
        ));

        let non_finite = FixedScorer(f64::NAN, 1.0);
        assert!(score_features(&non_finite, &features, &config).is_err());

        let out_of_range = FixedScorer(-0.2, 1.2);
        assert!(score_features(&out_of_range, &features, &config).is_err());

        let ok = FixedScorer(0.4, 0.6);
        assert_eq!(score_features(&ok, &features, &config).unwrap(), (0.4, 0.6));
    }

    #[test]
    fn test_model_config_from_json() {
        let json = r#"{
            "feature_names": ["F0_med", "F3_med", "breathiness_index"],
            "clip_ranges": {"F0_med": [75.0, 600.0]}
        }"#;
        let config: ModelConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.feature_names.len(), 3);
        assert_eq!(config.clip_ranges["F0_med"], (75.0, 600.0));
    }
}
