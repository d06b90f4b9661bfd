//! Intonation statistics over the raw pitch series
//!
//! Works on the full analysis window as delivered by the upstream pitch
//! estimator, not the filtered track: voiced fraction and variability are
//! properties of the whole recording.

use super::stats;
use crate::config::AnalysisConfig;
use serde::{Deserialize, Serialize};

/// Raw pitch series for one recording
///
/// One pitch value per analysis step. Unvoiced steps carry zero or NaN, the
/// conventions of the upstream estimator.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PitchSeries {
    /// Time stamps in seconds, one per analysis step
    pub times: Vec<f64>,
    /// Pitch values in Hz, same length as `times`
    pub f0_hz: Vec<f64>,
}

impl PitchSeries {
    /// Build a series from parallel time and pitch vectors.
    pub fn new(times: Vec<f64>, f0_hz: Vec<f64>) -> Self {
        Self { times, f0_hz }
    }

    /// Number of analysis steps.
    pub fn len(&self) -> usize {
        self.f0_hz.len()
    }

    /// True when the series carries no steps.
    pub fn is_empty(&self) -> bool {
        self.f0_hz.is_empty()
    }
}

/// Intonation statistics
///
/// Any field may be NaN (undefined). When fewer than the configured minimum
/// of voiced frames fall inside the pitch band, every field is undefined,
/// including the voiced fraction.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct IntonationStats {
    /// Mean voiced pitch, in Hz
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
    /// Least-squares slope of semitone pitch over time, in semitones/second
    pub slope_st_per_sec: f64,
    /// Sample standard deviation of semitone pitch
    pub f0_sd_st: f64,
    /// Fraction of analysis steps that are voiced
    pub voiced_frac: f64,
}

impl IntonationStats {
    /// Statistics with every field undefined.
    pub fn undefined() -> Self {
        Self {
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
        }
    }
}

/// Convert a frequency to semitones above the reference.
pub fn hz_to_semitones(hz: f64, ref_hz: f64) -> f64 {
    12.0 * (hz / ref_hz).log2()
}

/// Signed semitone interval between two frequencies.
///
/// Undefined unless both frequencies are positive.
pub fn semitone_interval(upper_hz: f64, lower_hz: f64) -> f64 {
    if upper_hz > 0.0 && lower_hz > 0.0 {
        12.0 * (upper_hz / lower_hz).log2()
    } else {
        f64::NAN
    }
}

/// Compute intonation statistics over a raw pitch series.
///
/// Voiced steps are those with positive pitch; the variability statistics
/// restrict further to finite values inside the closed
/// `[pitch_floor_hz, pitch_ceiling_hz]` band. Fewer than
/// `min_voiced_frames` banded values yields all-undefined statistics.
///
/// # Arguments
///
/// * `series` - Raw pitch series for the whole analysis window
/// * `config` - Pitch band and evidence thresholds
///
/// # Returns
///
/// Intonation statistics; all-undefined for insufficient voiced evidence
pub fn intonation_stats(series: &PitchSeries, config: &AnalysisConfig) -> IntonationStats {
    let total_steps = series.len();

    // Voiced = positive pitch (NaN and zero both read as unvoiced)
    let mut voiced_f0 = Vec::with_capacity(total_steps);
    let mut banded_f0 = Vec::new();
    let mut banded_t = Vec::new();
    for (i, &f0) in series.f0_hz.iter().enumerate() {
        if f0 > 0.0 {
            voiced_f0.push(f0);
            if f0.is_finite() && f0 >= config.pitch_floor_hz && f0 <= config.pitch_ceiling_hz {
                banded_f0.push(f0);
                banded_t.push(*series.times.get(i).unwrap_or(&f64::NAN));
            }
        }
    }

    if banded_f0.len() < config.min_voiced_frames {
        log::debug!(
            "Intonation undefined: {} banded voiced frames (< {})",
            banded_f0.len(),
            config.min_voiced_frames
        );
        return IntonationStats::undefined();
    }

    let st: Vec<f64> = banded_f0
        .iter()
        .map(|&f0| hz_to_semitones(f0, config.semitone_ref_hz))
        .collect();

    let mean = banded_f0.iter().sum::<f64>() / banded_f0.len() as f64;
    let min = banded_f0.iter().cloned().fold(f64::INFINITY, f64::min);
    let max = banded_f0.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    let p5 = stats::percentile(&banded_f0, 5.0);
    let p95 = stats::percentile(&banded_f0, 95.0);

    IntonationStats {
        f0_mean_hz: mean,
        f0_sd_hz: stats::sample_std(&voiced_f0),
        f0_min_hz: min,
        f0_max_hz: max,
        f0_p5_hz: p5,
        f0_p95_hz: p95,
        range_semitones: semitone_interval(max, min),
        range_st_5_95: semitone_interval(p95, p5),
        slope_st_per_sec: stats::ols_slope(&banded_t, &st),
        f0_sd_st: stats::sample_std(&st),
        voiced_frac: if total_steps > 0 {
            voiced_f0.len() as f64 / total_steps as f64
        } else {
            f64::NAN
        },
    }
}
