//! # Vocal Profile
//!
//! A voice analysis engine for perceived-gender profiling, turning noisy
//! per-frame pitch and formant estimates into a cleaned frequency track and
//! a categorical perceived-gender label with a confidence score.
//!
//! ## Features
//!
//! - **Frequency-track filtering**: Stateful plausibility/continuity gating
//!   against the last accepted frame, robust to estimator glitches
//! - **Feature summarization**: Formant medians and spacing ratios,
//!   intonation statistics, breathiness (HNR) statistics
//! - **Guardrailed classification**: A pre-trained two-class model behind a
//!   capability trait, corrected by a deterministic cascade of acoustic
//!   guardrail rules (falsetto, weak vocal support, pitch spikes)
//!
//! ## Quick Start
//!
//! ```
//! use vocal_profile::{analyze_voice, AnalysisConfig, AnalysisError, ModelConfig};
//! use vocal_profile::classify::GenderScorer;
//! use vocal_profile::features::pitch::PitchSeries;
//! use vocal_profile::track::Frame;
//!
//! /// Deterministic stand-in for the trained pipeline.
//! struct StubScorer;
//!
//! impl GenderScorer for StubScorer {
//!     fn score(&self, _row: &[f64]) -> Result<(f64, f64), AnalysisError> {
//!         Ok((0.49, 0.51))
//!     }
//! }
//!
//! let track = vec![Frame::new(0.0, 120.0, 500.0, 1500.0, 2500.0, 3500.0)];
//! let pitch = PitchSeries::new(vec![0.0], vec![120.0]);
//! let result = analyze_voice(
//!     &track,
//!     &pitch,
//!     &[],
//!     &StubScorer,
//!     &ModelConfig::default(),
//!     &AnalysisConfig::default(),
//! )?;
//!
//! println!(
//!     "{} (score {:.2})",
//!     result.classification.label, result.classification.score
//! );
//! # Ok::<(), vocal_profile::AnalysisError>(())
//! ```
//!
//! ## Architecture
//!
//! The analysis pipeline flows strictly forward:
//!
//! ```text
//! Raw frames -> Filter (stateful) -> Summarizer (pure) -> Scorer (external) -> Cascade (pure) -> Result
//! ```
//!
//! The filter is the only stateful stage; its state is created fresh per
//! call, so independent recordings may be analyzed in parallel by the
//! caller without any shared state or locking.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod analysis;
pub mod classify;
pub mod config;
pub mod error;
pub mod features;
pub mod filter;
pub mod track;

// Re-export main types
pub use analysis::result::{AnalysisMetadata, ClassificationResult, GenderLabel, VoiceAnalysis};
pub use classify::{GenderScorer, ModelConfig};
pub use config::AnalysisConfig;
pub use error::AnalysisError;
pub use features::FeatureVector;
pub use filter::FrequencyTrackFilter;
pub use track::Frame;

use features::breathiness::breathiness_stats;
use features::formants::summarize_formants;
use features::pitch::{intonation_stats, PitchSeries};

/// Algorithm version stamped into every analysis result
const ALGORITHM_VERSION: &str = "0.1.0";

/// Main analysis function
///
/// Runs the full pipeline on one recording: filters the raw frequency
/// track, summarizes the accepted frames plus the raw pitch/harmonicity
/// series into a feature vector, scores it through the classifier
/// capability, and resolves the final label through the guardrail cascade.
///
/// An all-rejected track is not an error: features come out undefined, the
/// guardrails all stand down, and the label follows the classifier
/// probabilities alone.
///
/// # Arguments
///
/// * `track` - Chronologically ordered raw frames (see
///   [`track::collate_track`] for assembling these from parallel series)
/// * `pitch` - Raw pitch series over the whole analysis window
/// * `harmonicity` - HNR series in dB, with unvoiced steps at the
///   configured sentinel value
/// * `scorer` - The pre-trained classifier capability
/// * `model` - Model metadata: column order and clip ranges
/// * `config` - Analysis configuration
///
/// # Returns
///
/// [`VoiceAnalysis`] with the accepted track, prepared features, final
/// classification, and metadata
///
/// # Errors
///
/// [`AnalysisError::InvalidInput`] for mismatched pitch series lengths;
/// [`AnalysisError::ClassifierContract`] when the scorer violates its
/// probability contract
pub fn analyze_voice(
    track: &[Frame],
    pitch: &PitchSeries,
    harmonicity: &[f64],
    scorer: &dyn GenderScorer,
    model: &ModelConfig,
    config: &AnalysisConfig,
) -> Result<VoiceAnalysis, AnalysisError> {
    use std::time::Instant;
    let start_time = Instant::now();

    log::debug!(
        "Starting voice analysis: {} frames, {} pitch steps, {} harmonicity steps",
        track.len(),
        pitch.len(),
        harmonicity.len()
    );

    if pitch.times.len() != pitch.f0_hz.len() {
        return Err(AnalysisError::InvalidInput(format!(
            "pitch series length mismatch: {} times vs {} values",
            pitch.times.len(),
            pitch.f0_hz.len()
        )));
    }

    // Stage 1: frequency-track filtering (fresh state per call)
    let mut filter = FrequencyTrackFilter::new();
    let accepted = filter.filter(track);
    if accepted.is_empty() {
        log::warn!("No frames survived filtering; features will be undefined");
    }

    // Stage 2: feature summarization
    let formants = summarize_formants(&accepted);
    let intonation = intonation_stats(pitch, config);
    let breathiness = breathiness_stats(harmonicity, config.unvoiced_sentinel_db);
    let features = FeatureVector::flatten(&formants, &intonation, &breathiness);

    // Stage 3: preparation + scoring through the capability boundary
    let prepared = classify::prepare_features(&features, model);
    let (p_masc, p_femme) = classify::score_features(scorer, &prepared, model)?;

    // Stage 4: guardrail cascade
    let classification = classify::classify(&prepared, p_masc, p_femme);

    let processing_time_ms = start_time.elapsed().as_secs_f64() * 1000.0;
    log::debug!(
        "Classified as {} (score {:.3}) in {:.2} ms",
        classification.label,
        classification.score,
        processing_time_ms
    );

    Ok(VoiceAnalysis {
        metadata: AnalysisMetadata {
            frames_total: track.len(),
            frames_accepted: accepted.len(),
            pitch_steps_total: pitch.len(),
            processing_time_ms,
            algorithm_version: ALGORITHM_VERSION.to_string(),
        },
        accepted,
        features: prepared,
        classification,
    })
}
