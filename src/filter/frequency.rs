//! Frequency-track filter
//!
//! Gates each incoming frame for plausibility and continuity against the
//! last accepted frame, producing a cleaned subsequence of the raw track.
//!
//! Algorithm, per frame:
//! 1. Skip the frame outright if pitch is invalid
//! 2. Evaluate admissibility of every channel (spacing, plausibility band,
//!    jump-rate for pitch, semitone continuity)
//! 3. Accept iff pitch is admissible and at least 3 of 4 formants are
//! 4. On acceptance, overwrite the last-accepted record for all five
//!    channels with this frame's raw values
//!
//! Gating against the last *accepted* sample rather than a global trend
//! keeps the filter resilient to bursts of estimator glitches (octave jumps,
//! formant merging) while still admitting genuine vocal glides.

use super::state::TrackState;
use crate::track::{Channel, Frame};

/// Frames closer than this to the last accepted frame are rejected as
/// oversampled near-duplicates (applies only when time strictly increases).
pub const MIN_FRAME_SPACING_SECS: f64 = 0.02;

/// Plausible pitch band in Hz (strict interior; boundary values rejected)
pub const F0_BAND_HZ: (f64, f64) = (75.0, 600.0);
/// Plausible F1 band in Hz
pub const F1_BAND_HZ: (f64, f64) = (250.0, 950.0);
/// Plausible F2 band in Hz
pub const F2_BAND_HZ: (f64, f64) = (700.0, 3300.0);
/// Plausible F3 band in Hz
pub const F3_BAND_HZ: (f64, f64) = (1500.0, 3700.0);
/// Plausible F4 band in Hz
pub const F4_BAND_HZ: (f64, f64) = (2700.0, 5000.0);

/// Maximum pitch jump from the last accepted frame, in semitones
pub const F0_MAX_JUMP_ST: f64 = 4.0;
/// Maximum pitch jump rate, in semitones per second (2 octaves/sec)
pub const F0_MAX_JUMP_RATE_ST_PER_SEC: f64 = 24.0;
/// Maximum F1 jump from the last accepted frame, in semitones
pub const F1_MAX_JUMP_ST: f64 = 5.0;
/// Maximum F2 jump from the last accepted frame, in semitones
pub const F2_MAX_JUMP_ST: f64 = 7.0;
/// Maximum F3 jump from the last accepted frame, in semitones
pub const F3_MAX_JUMP_ST: f64 = 8.0;
/// Maximum F4 jump from the last accepted frame, in semitones
pub const F4_MAX_JUMP_ST: f64 = 9.0;

/// Minimum number of admissible formant channels for frame acceptance
pub const MIN_ADMISSIBLE_FORMANTS: usize = 3;

/// Plausibility band for a channel, in Hz.
pub fn plausibility_band(channel: Channel) -> (f64, f64) {
    match channel {
        Channel::F0 => F0_BAND_HZ,
        Channel::F1 => F1_BAND_HZ,
        Channel::F2 => F2_BAND_HZ,
        Channel::F3 => F3_BAND_HZ,
        Channel::F4 => F4_BAND_HZ,
    }
}

/// Continuity threshold for a formant channel, in semitones.
///
/// Pitch has its own pair of gates (`F0_MAX_JUMP_ST`,
/// `F0_MAX_JUMP_RATE_ST_PER_SEC`) and is not covered here.
fn formant_max_jump_st(channel: Channel) -> f64 {
    match channel {
        Channel::F0 => F0_MAX_JUMP_ST,
        Channel::F1 => F1_MAX_JUMP_ST,
        Channel::F2 => F2_MAX_JUMP_ST,
        Channel::F3 => F3_MAX_JUMP_ST,
        Channel::F4 => F4_MAX_JUMP_ST,
    }
}

/// Absolute semitone distance between two frequencies.
fn semitone_distance(a: f64, b: f64) -> f64 {
    12.0 * (a / b).log2().abs()
}

/// Stateful single-pass frequency-track filter
///
/// Owns the per-session [`TrackState`]. Construct a fresh filter (or call
/// [`reset`](FrequencyTrackFilter::reset)) before each recording; a filter
/// instance must not be shared across concurrently analyzed recordings.
///
/// # Example
///
/// ```
/// use vocal_profile::filter::FrequencyTrackFilter;
/// use vocal_profile::track::Frame;
///
/// let track = vec![Frame::new(0.0, 120.0, 500.0, 1500.0, 2500.0, 3500.0)];
/// let mut filter = FrequencyTrackFilter::new();
/// let accepted = filter.filter(&track);
/// assert_eq!(accepted.len(), 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct FrequencyTrackFilter {
    state: TrackState,
}

impl FrequencyTrackFilter {
    /// Create a filter with fresh (empty) session state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Reset the session state, making the filter ready for a new recording.
    pub fn reset(&mut self) {
        self.state.reset();
    }

    /// Filter a raw track into its accepted subsequence.
    ///
    /// Single left-to-right pass with no lookahead. The result preserves
    /// input order and contains only frames that passed every gate; an
    /// all-rejected track yields an empty sequence, which callers treat as
    /// "insufficient signal" rather than an error.
    ///
    /// # Arguments
    ///
    /// * `track` - Chronologically ordered raw frames
    ///
    /// # Returns
    ///
    /// The accepted subsequence of `track`
    pub fn filter(&mut self, track: &[Frame]) -> Vec<Frame> {
        let mut accepted = Vec::with_capacity(track.len());

        for frame in track {
            // Frames without a usable pitch estimate carry no information
            // for this pipeline
            if !frame.f0.is_finite() || frame.f0 <= 0.0 {
                continue;
            }

            let f0_ok = self.admissible(Channel::F0, frame.f0, frame.time);
            let formants_ok = Channel::FORMANTS
                .iter()
                .filter(|&&ch| self.admissible(ch, frame.value(ch), frame.time))
                .count();

            if f0_ok && formants_ok >= MIN_ADMISSIBLE_FORMANTS {
                accepted.push(*frame);
                self.state.record(frame);
            }
        }

        log::debug!(
            "Frequency filter accepted {} of {} frames",
            accepted.len(),
            track.len()
        );

        accepted
    }

    /// Check whether one channel value passes every gate against the current
    /// session state.
    ///
    /// Gates, in order: invalid-value check, spacing gate, plausibility
    /// band, jump-rate gate (pitch only), continuity gate. The continuity
    /// gate applies only when a positive last-accepted value exists for the
    /// channel; spacing and plausibility always apply.
    pub fn admissible(&self, channel: Channel, value: f64, time: f64) -> bool {
        if !value.is_finite() || value <= 0.0 {
            return false;
        }

        // Spacing gate: suppress oversampled near-duplicates
        if let Some(prev_time) = self.state.last_time() {
            if time > prev_time && time - prev_time <= MIN_FRAME_SPACING_SECS {
                return false;
            }
        }

        // Plausibility gate: strict interior of the channel band
        let (lo, hi) = plausibility_band(channel);
        if value <= lo || value >= hi {
            return false;
        }

        // Continuity gate, judged against the last accepted value
        let prev = match self.state.last_value(channel) {
            Some(prev) if prev > 0.0 => prev,
            _ => return true,
        };
        let st = semitone_distance(value, prev);

        if channel == Channel::F0 {
            // Jump-rate gate: anything at or past 2 octaves/sec is an
            // estimator glitch, not a glide
            if let Some(prev_time) = self.state.last_time() {
                if time > prev_time {
                    let dt = time - prev_time;
                    if st / dt > F0_MAX_JUMP_RATE_ST_PER_SEC {
                        return false;
                    }
                }
            }
            st <= F0_MAX_JUMP_ST
        } else {
            st <= formant_max_jump_st(channel)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// A frame with every channel comfortably inside its plausibility band.
    fn plausible_frame(time: f64, f0: f64) -> Frame {
        Frame::new(time, f0, 500.0, 1500.0, 2500.0, 3500.0)
    }

    #[test]
    fn test_first_plausible_frame_accepted() {
        let mut filter = FrequencyTrackFilter::new();
        let accepted = filter.filter(&[plausible_frame(0.0, 120.0)]);
        assert_eq!(accepted.len(), 1);
    }

    #[test]
    fn test_invalid_pitch_skips_frame() {
        let mut filter = FrequencyTrackFilter::new();
        let mut frame = plausible_frame(0.0, 120.0);
        frame.f0 = f64::NAN;
        assert!(filter.filter(&[frame]).is_empty());

        frame.f0 = 0.0;
        assert!(filter.filter(&[frame]).is_empty());
    }

    #[test]
    fn test_plausibility_band_is_strict_interior() {
        let filter = FrequencyTrackFilter::new();

        // Boundary values are rejected
        assert!(!filter.admissible(Channel::F0, 75.0, 0.0));
        assert!(!filter.admissible(Channel::F0, 600.0, 0.0));
        assert!(!filter.admissible(Channel::F1, 250.0, 0.0));
        assert!(!filter.admissible(Channel::F4, 5000.0, 0.0));

        // Interior values pass
        assert!(filter.admissible(Channel::F0, 75.1, 0.0));
        assert!(filter.admissible(Channel::F0, 599.9, 0.0));
        assert!(filter.admissible(Channel::F1, 251.0, 0.0));
    }

    #[test]
    fn test_spacing_gate_rejects_near_duplicate() {
        let mut filter = FrequencyTrackFilter::new();
        let track = [plausible_frame(1.000, 150.0), plausible_frame(1.010, 150.0)];
        let accepted = filter.filter(&track);

        // The second frame has identical, valid values and fails purely on
        // the 20 ms spacing gate
        assert_eq!(accepted.len(), 1);
        assert_eq!(accepted[0].time, 1.000);
    }

    #[test]
    fn test_spacing_gate_allows_wider_gap() {
        let mut filter = FrequencyTrackFilter::new();
        let track = [plausible_frame(1.000, 150.0), plausible_frame(1.021, 150.0)];
        assert_eq!(filter.filter(&track).len(), 2);
    }

    #[test]
    fn test_f0_continuity_rejects_fast_jump() {
        let mut filter = FrequencyTrackFilter::new();
        // 150 -> 200 Hz over 50 ms: ~4.98 st, ~100 st/s. Both the 4-semitone
        // continuity gate and the 24 st/s rate gate reject it.
        let track = [plausible_frame(1.00, 150.0), plausible_frame(1.05, 200.0)];
        let accepted = filter.filter(&track);
        assert_eq!(accepted.len(), 1);
        assert_eq!(accepted[0].f0, 150.0);
    }

    #[test]
    fn test_f0_continuity_admits_slow_glide() {
        let mut filter = FrequencyTrackFilter::new();
        // A gradual rise of ~1.1 st per 100 ms stays inside both pitch gates
        let track: Vec<Frame> = (0..10)
            .map(|i| plausible_frame(i as f64 * 0.1, 150.0 + 10.0 * i as f64))
            .collect();
        assert_eq!(filter.filter(&track).len(), 10);
    }

    #[test]
    fn test_formant_count_boundary() {
        let mut filter = FrequencyTrackFilter::new();
        filter.filter(&[plausible_frame(0.0, 150.0)]);

        // Exactly 3 of 4 formants admissible: accepted (f1 jumps far outside
        // its continuity threshold)
        let three_ok = Frame::new(0.1, 150.0, 950.0 - 1.0, 1500.0, 2500.0, 3500.0);
        assert_eq!(filter.filter(&[three_ok]).len(), 1);

        // Exactly 2 of 4 formants admissible: rejected (f1 and f2 both jump)
        let mut filter = FrequencyTrackFilter::new();
        filter.filter(&[plausible_frame(0.0, 150.0)]);
        let two_ok = Frame::new(0.1, 150.0, 949.0, 3299.0, 2500.0, 3500.0);
        assert!(filter.filter(&[two_ok]).is_empty());
    }

    #[test]
    fn test_rejection_leaves_state_untouched() {
        let mut filter = FrequencyTrackFilter::new();
        let track = [
            plausible_frame(1.00, 150.0),
            // Octave glitch, rejected
            plausible_frame(1.10, 300.0),
            // Continuous with the last *accepted* frame, so accepted
            plausible_frame(1.20, 155.0),
        ];
        let accepted = filter.filter(&track);
        assert_eq!(accepted.len(), 2);
        assert_eq!(accepted[1].f0, 155.0);
    }

    #[test]
    fn test_acceptance_overwrites_inadmissible_formant() {
        let mut filter = FrequencyTrackFilter::new();
        filter.filter(&[Frame::new(0.0, 150.0, 500.0, 3250.0, 2500.0, 3500.0)]);

        // f2 collapses by ~26 st (inadmissible on continuity) but the frame
        // is accepted via f1/f3/f4
        let collapse = Frame::new(0.1, 150.0, 500.0, 701.0, 2500.0, 3500.0);
        assert_eq!(filter.filter(&[collapse]).len(), 1);

        // The collapsed value was still recorded: the next frame's f2 is
        // judged against 701 Hz, not 3250 Hz
        assert!(filter.admissible(Channel::F2, 710.0, 0.2));
        assert!(!filter.admissible(Channel::F2, 3250.0, 0.2));
    }

    #[test]
    fn test_all_rejected_track_yields_empty() {
        let mut filter = FrequencyTrackFilter::new();
        let track: Vec<Frame> = (0..5)
            .map(|i| Frame::new(i as f64 * 0.1, 50.0, 500.0, 1500.0, 2500.0, 3500.0))
            .collect();
        assert!(filter.filter(&track).is_empty());
    }

    #[test]
    fn test_deterministic_across_reset() {
        let track: Vec<Frame> = (0..50)
            .map(|i| {
                let t = i as f64 * 0.05;
                plausible_frame(t, 150.0 + 30.0 * (i as f64 * 0.7).sin())
            })
            .collect();

        let mut filter = FrequencyTrackFilter::new();
        let first = filter.filter(&track);
        filter.reset();
        let second = filter.filter(&track);
        assert_eq!(first, second);
    }

    #[test]
    fn test_output_is_order_preserving_subsequence() {
        let track: Vec<Frame> = (0..40)
            .map(|i| {
                let t = i as f64 * 0.03;
                // Every 7th frame carries an implausible pitch
                let f0 = if i % 7 == 0 { 650.0 } else { 140.0 + i as f64 };
                plausible_frame(t, f0)
            })
            .collect();

        let mut filter = FrequencyTrackFilter::new();
        let accepted = filter.filter(&track);
        assert!(!accepted.is_empty());
        assert!(accepted.len() < track.len());

        // Every accepted frame appears in the input, in the same order
        let mut cursor = 0;
        for frame in &accepted {
            let pos = track[cursor..]
                .iter()
                .position(|f| f == frame)
                .expect("accepted frame must come from the input");
            cursor += pos + 1;
        }
    }
}
