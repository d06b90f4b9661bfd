//! Acoustic feature summarization
//!
//! Pure functions turning the accepted track and the externally supplied
//! pitch/harmonicity series into a flat numeric feature record:
//! - Formant medians, percentiles, and spacing ratios
//! - Intonation (pitch) statistics
//! - Breathiness (HNR) statistics
//! - The flattened feature vector fed to the classifier

pub mod breathiness;
pub mod formants;
pub mod pitch;
pub mod stats;
pub mod vector;

pub use vector::FeatureVector;
