//! Classification: probabilistic model gateway + guardrail cascade
//!
//! The pre-trained two-class model is an opaque capability behind the
//! [`GenderScorer`] trait; this module prepares features for it, validates
//! its probability contract, and corrects its known failure modes with a
//! deterministic, order-sensitive cascade of acoustic guardrail rules.

pub mod cascade;
pub mod guardrails;
pub mod model;

pub use cascade::classify;
pub use model::{prepare_features, score_features, GenderScorer, ModelConfig};
