//! Per-session filter state

use crate::track::{Channel, Frame};

/// Last-accepted record for one analysis session
///
/// Holds the most recently accepted value per channel and its timestamp.
/// The record is mutated only by frame acceptance: rejected frames leave it
/// untouched, so every gate compares against the last *accepted* frame, not
/// the last seen one. Create a fresh instance per recording; instances are
/// never shared across concurrent sessions.
#[derive(Debug, Clone, Default)]
pub struct TrackState {
    last_time: Option<f64>,
    last_f0: Option<f64>,
    last_f1: Option<f64>,
    last_f2: Option<f64>,
    last_f3: Option<f64>,
    last_f4: Option<f64>,
}

impl TrackState {
    /// Create an empty state (no accepted frames yet).
    pub fn new() -> Self {
        Self::default()
    }

    /// Clear all last-accepted values, returning the state to its initial
    /// condition.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Timestamp of the last accepted frame, if any.
    pub fn last_time(&self) -> Option<f64> {
        self.last_time
    }

    /// Last accepted value for a channel, if any.
    pub fn last_value(&self, channel: Channel) -> Option<f64> {
        match channel {
            Channel::F0 => self.last_f0,
            Channel::F1 => self.last_f1,
            Channel::F2 => self.last_f2,
            Channel::F3 => self.last_f3,
            Channel::F4 => self.last_f4,
        }
    }

    /// Record an accepted frame.
    ///
    /// Overwrites the stored value for all five channels and the timestamp
    /// unconditionally, including channels whose value failed their
    /// individual gates this frame. Continuity for the next frame is judged
    /// against what was actually accepted, glitches included.
    pub fn record(&mut self, frame: &Frame) {
        self.last_time = Some(frame.time);
        self.last_f0 = Some(frame.f0);
        self.last_f1 = Some(frame.f1);
        self.last_f2 = Some(frame.f2);
        self.last_f3 = Some(frame.f3);
        self.last_f4 = Some(frame.f4);
    }
}
