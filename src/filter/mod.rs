//! Frequency-track filtering
//!
//! Gates each raw frame for plausibility and continuity against the last
//! accepted frame:
//! - Per-session state (last accepted value per channel + timestamp)
//! - Spacing, plausibility-band, jump-rate, and continuity gates
//! - Single left-to-right pass, no lookahead

pub mod frequency;
pub mod state;

pub use frequency::FrequencyTrackFilter;
pub use state::TrackState;
