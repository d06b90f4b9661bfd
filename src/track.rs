//! Frame and track types shared by the filter and the summarizers
//!
//! A track is the raw per-frame output of an external pitch/formant
//! estimator: one time-stamped sample of F0 plus four formant frequencies per
//! analysis step. Invalid estimates are carried as NaN, never coerced to
//! zero.

use serde::{Deserialize, Serialize};

/// One time-stamped sample of pitch and formant frequencies.
///
/// Channel values are in Hz. A non-finite or non-positive value marks an
/// invalid estimate for that channel; the frame as a whole may still be
/// usable if enough channels are valid (see the frequency filter).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    /// Frame time in seconds from the start of the recording
    pub time: f64,

    /// Fundamental frequency (pitch) in Hz
    pub f0: f64,

    /// First formant frequency in Hz
    pub f1: f64,

    /// Second formant frequency in Hz
    pub f2: f64,

    /// Third formant frequency in Hz
    pub f3: f64,

    /// Fourth formant frequency in Hz
    pub f4: f64,
}

impl Frame {
    /// Construct a frame from a time stamp and the five channel values.
    pub fn new(time: f64, f0: f64, f1: f64, f2: f64, f3: f64, f4: f64) -> Self {
        Self {
            time,
            f0,
            f1,
            f2,
            f3,
            f4,
        }
    }

    /// Get the value for one frequency channel.
    pub fn value(&self, channel: Channel) -> f64 {
        match channel {
            Channel::F0 => self.f0,
            Channel::F1 => self.f1,
            Channel::F2 => self.f2,
            Channel::F3 => self.f3,
            Channel::F4 => self.f4,
        }
    }
}

/// Frequency channel identifier: pitch (F0) or one of four formants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Channel {
    /// Fundamental frequency (pitch)
    F0,
    /// First formant
    F1,
    /// Second formant
    F2,
    /// Third formant
    F3,
    /// Fourth formant
    F4,
}

impl Channel {
    /// All five channels in frame order.
    pub const ALL: [Channel; 5] = [
        Channel::F0,
        Channel::F1,
        Channel::F2,
        Channel::F3,
        Channel::F4,
    ];

    /// The four formant channels (everything but pitch).
    pub const FORMANTS: [Channel; 4] = [Channel::F1, Channel::F2, Channel::F3, Channel::F4];
}

/// Collate aligned per-time-step series into a track.
///
/// Upstream estimators produce one value per channel per time step. A time
/// step contributes a frame only when all five channel estimates are finite;
/// steps where the estimator produced no value for any channel are dropped
/// before filtering, matching the ingestion behavior of the original
/// analysis pipeline.
///
/// # Arguments
///
/// * `times` - Time stamps in seconds, one per analysis step
/// * `f0` - Pitch series, same length as `times`
/// * `f1`..`f4` - Formant series, same length as `times`
///
/// # Returns
///
/// Chronological track of frames where all channels are finite. Returns an
/// empty track when the input series lengths disagree.
pub fn collate_track(
    times: &[f64],
    f0: &[f64],
    f1: &[f64],
    f2: &[f64],
    f3: &[f64],
    f4: &[f64],
) -> Vec<Frame> {
    let n = times.len();
    if [f0, f1, f2, f3, f4].iter().any(|s| s.len() != n) {
        log::warn!("collate_track: series length mismatch, returning empty track");
        return Vec::new();
    }

    let mut track = Vec::with_capacity(n);
    for i in 0..n {
        let frame = Frame::new(times[i], f0[i], f1[i], f2[i], f3[i], f4[i]);
        let all_finite = Channel::ALL.iter().all(|&ch| frame.value(ch).is_finite());
        if all_finite {
            track.push(frame);
        }
    }

    log::debug!(
        "Collated {} frames from {} time steps",
        track.len(),
        n
    );

    track
}
