//! The flattened feature vector fed to the classifier
//!
//! Merges the formant, intonation, and breathiness summaries into one flat
//! record of named scalars. Field access by name uses the trained pipeline's
//! column-name strings (`"F0_med"`, `"f0_p5_hz"`, ...), so a model
//! configuration can order and clip features without knowing this struct.

use super::breathiness::BreathinessStats;
use super::formants::FormantSummary;
use super::pitch::IntonationStats;
use serde::{Deserialize, Serialize};

/// Column names understood by [`FeatureVector::get`] and
/// [`FeatureVector::set`], in canonical order.
///
/// The capitalized names are statistics of the accepted (filtered) track;
/// lowercase pitch names come from the raw pitch series over the whole
/// analysis window.
pub const FEATURE_NAMES: [&str; 27] = [
    "F0_med",
    "F0_p5",
    "F0_p95",
    "F1_med",
    "F2_med",
    "F3_med",
    "F4_med",
    "F2_over_F1",
    "F3_over_F2",
    "F4_over_F3",
    "f0_mean_hz",
    "f0_sd_hz",
    "f0_min_hz",
    "f0_max_hz",
    "f0_p5_hz",
    "f0_p95_hz",
    "range_semitones",
    "range_st_5_95",
    "slope_st_per_sec",
    "f0_sd_st",
    "voiced_frac",
    "hnr_mean_db",
    "hnr_median_db",
    "hnr_voiced_fraction",
    "breathiness_index",
    "pitch_support_gap_hz",
    "pitch_support_ratio",
];

/// Flat record of the acoustic features describing one recording
///
/// Every scalar may be NaN (undefined) when the source data was
/// insufficient; undefined values propagate and are never an error.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct FeatureVector {
    /// Median pitch over the accepted track, in Hz
    pub f0_med: f64,
    /// 5th percentile of accepted pitch, in Hz
    pub f0_p5: f64,
    /// 95th percentile of accepted pitch, in Hz
    pub f0_p95: f64,
    /// Median F1, in Hz
    pub f1_med: f64,
    /// Median F2, in Hz
    pub f2_med: f64,
    /// Median F3, in Hz
    pub f3_med: f64,
    /// Median F4, in Hz
    pub f4_med: f64,
    /// Spacing ratio F2_med / F1_med
    pub f2_over_f1: f64,
    /// Spacing ratio F3_med / F2_med
    pub f3_over_f2: f64,
    /// Spacing ratio F4_med / F3_med
    pub f4_over_f3: f64,
    /// Mean voiced pitch over the whole window, in Hz
    pub f0_mean_hz: f64,
    /// Sample standard deviation of voiced pitch, in Hz
    pub f0_sd_hz: f64,
    /// Minimum voiced pitch, in Hz
    pub f0_min_hz: f64,
    /// Maximum voiced pitch, in Hz
    pub f0_max_hz: f64,
    /// 5th percentile of voiced pitch, in Hz
    pub f0_p5_hz: f64,
    /// 95th percentile of voiced pitch, in Hz
    pub f0_p95_hz: f64,
    /// Full pitch range, in semitones
    pub range_semitones: f64,
    /// 5th-95th percentile pitch range, in semitones
    pub range_st_5_95: f64,
    /// Least-squares slope of semitone pitch over time
    pub slope_st_per_sec: f64,
    /// Sample standard deviation of semitone pitch
    pub f0_sd_st: f64,
    /// Fraction of analysis steps that are voiced
    pub voiced_frac: f64,
    /// Mean HNR over voiced frames, in dB
    pub hnr_mean_db: f64,
    /// Median HNR over voiced frames, in dB
    pub hnr_median_db: f64,
    /// Voiced harmonicity frames as a fraction of the window
    pub hnr_voiced_fraction: f64,
    /// Negated mean HNR; higher means breathier
    pub breathiness_index: f64,
    /// F0_med - F0_p5: how far the low pitch tail collapses below center
    pub pitch_support_gap_hz: f64,
    /// (F0_p5 + eps) / (F0_med + eps): low tail relative to center
    pub pitch_support_ratio: f64,
}

impl FeatureVector {
    /// Vector with every feature undefined.
    pub fn undefined() -> Self {
        Self {
            f0_med: f64::NAN,
            f0_p5: f64::NAN,
            f0_p95: f64::NAN,
            f1_med: f64::NAN,
            f2_med: f64::NAN,
            f3_med: f64::NAN,
            f4_med: f64::NAN,
            f2_over_f1: f64::NAN,
            f3_over_f2: f64::NAN,
            f4_over_f3: f64::NAN,
            f0_mean_hz: f64::NAN,
            f0_sd_hz: f64::NAN,
            f0_min_hz: f64::NAN,
            f0_max_hz: f64::NAN,
            f0_p5_hz: f64::NAN,
            f0_p95_hz: f64::NAN,
            range_semitones: f64::NAN,
            range_st_5_95: f64::NAN,
            slope_st_per_sec: f64::NAN,
            f0_sd_st: f64::NAN,
            voiced_frac: f64::NAN,
            hnr_mean_db: f64::NAN,
            hnr_median_db: f64::NAN,
            hnr_voiced_fraction: f64::NAN,
            breathiness_index: f64::NAN,
            pitch_support_gap_hz: f64::NAN,
            pitch_support_ratio: f64::NAN,
        }
    }

    /// Merge the three summaries into one flat vector.
    ///
    /// Defines `breathiness_index = -hnr_mean_db` (undefined propagates), so
    /// a higher index means a breathier voice. The pitch-support features
    /// stay undefined here; they are derived during feature preparation,
    /// just before scoring.
    pub fn flatten(
        formants: &FormantSummary,
        intonation: &IntonationStats,
        breathiness: &BreathinessStats,
    ) -> Self {
        let breathiness_index = if breathiness.hnr_mean_db.is_finite() {
            -breathiness.hnr_mean_db
        } else {
            f64::NAN
        };

        Self {
            f0_med: formants.f0_med,
            f0_p5: formants.f0_p5,
            f0_p95: formants.f0_p95,
            f1_med: formants.f1_med,
            f2_med: formants.f2_med,
            f3_med: formants.f3_med,
            f4_med: formants.f4_med,
            f2_over_f1: formants.f2_over_f1,
            f3_over_f2: formants.f3_over_f2,
            f4_over_f3: formants.f4_over_f3,
            f0_mean_hz: intonation.f0_mean_hz,
            f0_sd_hz: intonation.f0_sd_hz,
            f0_min_hz: intonation.f0_min_hz,
            f0_max_hz: intonation.f0_max_hz,
            f0_p5_hz: intonation.f0_p5_hz,
            f0_p95_hz: intonation.f0_p95_hz,
            range_semitones: intonation.range_semitones,
            range_st_5_95: intonation.range_st_5_95,
            slope_st_per_sec: intonation.slope_st_per_sec,
            f0_sd_st: intonation.f0_sd_st,
            voiced_frac: intonation.voiced_frac,
            hnr_mean_db: breathiness.hnr_mean_db,
            hnr_median_db: breathiness.hnr_median_db,
            hnr_voiced_fraction: breathiness.hnr_voiced_fraction,
            breathiness_index,
            pitch_support_gap_hz: f64::NAN,
            pitch_support_ratio: f64::NAN,
        }
    }

    /// Look up a feature by its column name.
    ///
    /// Returns `None` for names outside [`FEATURE_NAMES`].
    pub fn get(&self, name: &str) -> Option<f64> {
        let value = match name {
            "F0_med" => self.f0_med,
            "F0_p5" => self.f0_p5,
            "F0_p95" => self.f0_p95,
            "F1_med" => self.f1_med,
            "F2_med" => self.f2_med,
            "F3_med" => self.f3_med,
            "F4_med" => self.f4_med,
            "F2_over_F1" => self.f2_over_f1,
            "F3_over_F2" => self.f3_over_f2,
            "F4_over_F3" => self.f4_over_f3,
            "f0_mean_hz" => self.f0_mean_hz,
            "f0_sd_hz" => self.f0_sd_hz,
            "f0_min_hz" => self.f0_min_hz,
            "f0_max_hz" => self.f0_max_hz,
            "f0_p5_hz" => self.f0_p5_hz,
            "f0_p95_hz" => self.f0_p95_hz,
            "range_semitones" => self.range_semitones,
            "range_st_5_95" => self.range_st_5_95,
            "slope_st_per_sec" => self.slope_st_per_sec,
            "f0_sd_st" => self.f0_sd_st,
            "voiced_frac" => self.voiced_frac,
            "hnr_mean_db" => self.hnr_mean_db,
            "hnr_median_db" => self.hnr_median_db,
            "hnr_voiced_fraction" => self.hnr_voiced_fraction,
            "breathiness_index" => self.breathiness_index,
            "pitch_support_gap_hz" => self.pitch_support_gap_hz,
            "pitch_support_ratio" => self.pitch_support_ratio,
            _ => return None,
        };
        Some(value)
    }

    /// Set a feature by its column name.
    ///
    /// Returns false (and changes nothing) for unknown names.
    pub fn set(&mut self, name: &str, value: f64) -> bool {
        let slot = match name {
            "F0_med" => &mut self.f0_med,
            "F0_p5" => &mut self.f0_p5,
            "F0_p95" => &mut self.f0_p95,
            "F1_med" => &mut self.f1_med,
            "F2_med" => &mut self.f2_med,
            "F3_med" => &mut self.f3_med,
            "F4_med" => &mut self.f4_med,
            "F2_over_F1" => &mut self.f2_over_f1,
            "F3_over_F2" => &mut self.f3_over_f2,
            "F4_over_F3" => &mut self.f4_over_f3,
            "f0_mean_hz" => &mut self.f0_mean_hz,
            "f0_sd_hz" => &mut self.f0_sd_hz,
            "f0_min_hz" => &mut self.f0_min_hz,
            "f0_max_hz" => &mut self.f0_max_hz,
            "f0_p5_hz" => &mut self.f0_p5_hz,
            "f0_p95_hz" => &mut self.f0_p95_hz,
            "range_semitones" => &mut self.range_semitones,
            "range_st_5_95" => &mut self.range_st_5_95,
            "slope_st_per_sec" => &mut self.slope_st_per_sec,
            "f0_sd_st" => &mut self.f0_sd_st,
            "voiced_frac" => &mut self.voiced_frac,
            "hnr_mean_db" => &mut self.hnr_mean_db,
            "hnr_median_db" => &mut self.hnr_median_db,
            "hnr_voiced_fraction" => &mut self.hnr_voiced_fraction,
            "breathiness_index" => &mut self.breathiness_index,
            "pitch_support_gap_hz" => &mut self.pitch_support_gap_hz,
            "pitch_support_ratio" => &mut self.pitch_support_ratio,
            _ => return false,
        };
        *slot = value;
        true
    }
}
