//! Formant summary over the accepted track
//!
//! Per-channel medians, pitch percentiles, and the spacing ratios F2/F1,
//! F3/F2, F4/F3 that capture vocal-tract brightness.

use super::stats;
use crate::track::Frame;
use serde::{Deserialize, Serialize};

/// Summary of the accepted frequency track
///
/// Every field may be NaN (undefined) when the track carries no usable
/// values for it; an empty track yields an all-undefined summary.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct FormantSummary {
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
}

impl FormantSummary {
    /// Summary with every field undefined.
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
        }
    }
}

/// Summarize the accepted track into per-channel medians and ratios.
///
/// Medians and percentiles consider positive finite values only. Accepted
/// frames may carry individually inadmissible formant values; those still
/// participate here as long as they are positive and finite. Each ratio is
/// undefined when either operand is undefined or the denominator is
/// undefined.
///
/// # Arguments
///
/// * `accepted` - Output of the frequency filter
///
/// # Returns
///
/// Formant summary; all-undefined for an empty track
pub fn summarize_formants(accepted: &[Frame]) -> FormantSummary {
    if accepted.is_empty() {
        return FormantSummary::undefined();
    }

    let positive = |select: fn(&Frame) -> f64| -> Vec<f64> {
        accepted
            .iter()
            .map(select)
            .filter(|v| v.is_finite() && *v > 0.0)
            .collect()
    };

    let f0 = positive(|f| f.f0);
    let f1 = positive(|f| f.f1);
    let f2 = positive(|f| f.f2);
    let f3 = positive(|f| f.f3);
    let f4 = positive(|f| f.f4);

    let f1_med = stats::median(&f1);
    let f2_med = stats::median(&f2);
    let f3_med = stats::median(&f3);
    let f4_med = stats::median(&f4);

    FormantSummary {
        f0_med: stats::median(&f0),
        f0_p5: stats::percentile(&f0, 5.0),
        f0_p95: stats::percentile(&f0, 95.0),
        f1_med,
        f2_med,
        f3_med,
        f4_med,
        f2_over_f1: ratio(f2_med, f1_med),
        f3_over_f2: ratio(f3_med, f2_med),
        f4_over_f3: ratio(f4_med, f3_med),
    }
}

/// Guarded division: undefined unless the denominator is finite and nonzero.
fn ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator.is_finite() && denominator != 0.0 {
        numerator / denominator
    } else {
        f64::NAN
    }
}
