//! Configuration parameters for voice analysis

use serde::{Deserialize, Serialize};

/// Analysis configuration parameters
///
/// These mirror the analysis settings of the upstream estimator: the voiced
/// pitch band, the minimum evidence needed for intonation statistics, and the
/// sentinel conventions of the harmonicity series. The filter's plausibility
/// bands and continuity thresholds are fixed policy constants and live with
/// the filter itself.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Lowest pitch considered voiced, in Hz (default: 75.0)
    pub pitch_floor_hz: f64,

    /// Highest pitch considered voiced, in Hz (default: 600.0)
    pub pitch_ceiling_hz: f64,

    /// Minimum voiced pitch frames required before intonation statistics are
    /// defined (default: 5)
    pub min_voiced_frames: usize,

    /// Reference frequency for semitone conversion, in Hz (default: 55.0, A1)
    pub semitone_ref_hz: f64,

    /// Reserved harmonicity value marking unvoiced frames, in dB
    /// (default: -200.0)
    pub unvoiced_sentinel_db: f64,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            pitch_floor_hz: 75.0,
            pitch_ceiling_hz: 600.0,
            min_voiced_frames: 5,
            semitone_ref_hz: 55.0,
            unvoiced_sentinel_db: -200.0,
        }
    }
}
