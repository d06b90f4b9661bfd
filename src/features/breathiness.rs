//! Breathiness statistics from the harmonicity series
//!
//! HNR (harmonics-to-noise ratio) in dB is the breathiness proxy: low
//! harmonicity reads as a breathy or noisy voice. The upstream estimator
//! marks unvoiced frames with a reserved sentinel value that must be
//! excluded from every statistic except the voiced fraction's denominator.

use super::stats;
use serde::{Deserialize, Serialize};

/// Breathiness (HNR) statistics
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct BreathinessStats {
    /// Mean HNR over voiced frames, in dB (NaN when no voiced frames)
    pub hnr_mean_db: f64,
    /// Median HNR over voiced frames, in dB (NaN when no voiced frames)
    pub hnr_median_db: f64,
    /// Voiced frames as a fraction of the entire analysis window
    pub hnr_voiced_fraction: f64,
    /// Total harmonicity frames in the window
    pub frames_total: usize,
    /// Frames that carried a voiced harmonicity value
    pub voiced_frames: usize,
}

impl BreathinessStats {
    /// Statistics with every value undefined (empty window).
    pub fn undefined() -> Self {
        Self {
            hnr_mean_db: f64::NAN,
            hnr_median_db: f64::NAN,
            hnr_voiced_fraction: f64::NAN,
            frames_total: 0,
            voiced_frames: 0,
        }
    }
}

/// Compute breathiness statistics over a harmonicity series.
///
/// Frames equal to `unvoiced_sentinel_db` (and non-finite frames) are
/// unvoiced; means and medians cover voiced frames only, while the voiced
/// fraction is taken over the entire window.
///
/// # Arguments
///
/// * `hnr_db` - Harmonicity per analysis step, in dB
/// * `unvoiced_sentinel_db` - Reserved value marking unvoiced steps
///
/// # Returns
///
/// Breathiness statistics; undefined means for an all-unvoiced window
pub fn breathiness_stats(hnr_db: &[f64], unvoiced_sentinel_db: f64) -> BreathinessStats {
    if hnr_db.is_empty() {
        return BreathinessStats::undefined();
    }

    let voiced: Vec<f64> = hnr_db
        .iter()
        .copied()
        .filter(|v| v.is_finite() && *v != unvoiced_sentinel_db)
        .collect();

    let (mean, median) = if voiced.is_empty() {
        (f64::NAN, f64::NAN)
    } else {
        (
            voiced.iter().sum::<f64>() / voiced.len() as f64,
            stats::median(&voiced),
        )
    };

    log::debug!(
        "Breathiness: {} voiced of {} harmonicity frames",
        voiced.len(),
        hnr_db.len()
    );

    BreathinessStats {
        hnr_mean_db: mean,
        hnr_median_db: median,
        hnr_voiced_fraction: voiced.len() as f64 / hnr_db.len() as f64,
        frames_total: hnr_db.len(),
        voiced_frames: voiced.len(),
    }
}
