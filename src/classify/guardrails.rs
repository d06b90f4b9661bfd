//! Post-cascade acoustic guardrails
//!
//! Pure predicates over the prepared feature vector that detect the known
//! classifier failure modes: pitch spikes on masculine resonance, feminine
//! reads without vocal support, and soft-masc voices the model calls hard
//! masc. Each predicate only says whether its guardrail applies; the
//! cascade owns the downgrade that follows. A predicate whose required
//! inputs are undefined does not apply (it fails toward the raw classifier
//! decision).

use crate::features::vector::FeatureVector;

/// Pitch-spike trap: masculine resonance anchor (F1 at or below this)
pub const SPIKE_TRAP_F1_CEIL_HZ: f64 = 410.0;
/// Pitch-spike trap: noisy-signal HNR ceiling
pub const SPIKE_TRAP_HNR_CEIL_DB: f64 = 12.5;
/// Pitch-spike trap: weak-voicing ceiling
pub const SPIKE_TRAP_VOICED_CEIL: f64 = 0.50;
/// Pitch-spike trap: spike floor on maximum pitch
pub const SPIKE_TRAP_F0_MAX_FLOOR_HZ: f64 = 430.0;
/// Pitch-spike trap: spike floor on full pitch range
pub const SPIKE_TRAP_RANGE_FLOOR_ST: f64 = 26.0;
/// Pitch-spike trap: spike floor on the accepted-track 95th percentile
pub const SPIKE_TRAP_F0_P95_FLOOR_HZ: f64 = 225.0;
/// Pitch-spike trap: pitch centers at or above this are clearly femme and
/// never trapped
pub const SPIKE_TRAP_F0_MED_CEIL_HZ: f64 = 220.0;

/// Pitch-spike trap: a false-femme read produced by pitch spikes on top of
/// masculine resonance plus a harsh/noisy/low-voiced signal.
///
/// True means a `FEMME` decision should be overridden.
pub fn pitch_spike_trap(features: &FeatureVector) -> bool {
    // Absolute F1 is a strong cue for masculine resonance
    let masc_anchor =
        features.f1_med.is_finite() && features.f1_med <= SPIKE_TRAP_F1_CEIL_HZ;

    // Noisy or weakly voiced signal (not femme-coded acoustically)
    let noisy_or_unvoiced = (features.hnr_mean_db.is_finite()
        && features.hnr_mean_db <= SPIKE_TRAP_HNR_CEIL_DB)
        || (features.voiced_frac.is_finite()
            && features.voiced_frac <= SPIKE_TRAP_VOICED_CEIL);

    // Pitch spike behavior that fools classifiers
    let pitch_spike = (features.f0_max_hz.is_finite()
        && features.f0_max_hz >= SPIKE_TRAP_F0_MAX_FLOOR_HZ)
        || (features.range_semitones.is_finite()
            && features.range_semitones >= SPIKE_TRAP_RANGE_FLOOR_ST)
        || (features.f0_p95.is_finite() && features.f0_p95 >= SPIKE_TRAP_F0_P95_FLOOR_HZ);

    let not_clearly_femme_pitch =
        features.f0_med.is_finite() && features.f0_med < SPIKE_TRAP_F0_MED_CEIL_HZ;

    masc_anchor && noisy_or_unvoiced && pitch_spike && not_clearly_femme_pitch
}

/// Femme support: strong-pitch center floor (median)
pub const STRONG_PITCH_MED_FLOOR_HZ: f64 = 200.0;
/// Femme support: strong-pitch mean floor
pub const STRONG_PITCH_MEAN_FLOOR_HZ: f64 = 205.0;
/// Femme support: strong-pitch low-tail floor (raw pitch series)
pub const STRONG_PITCH_P5_FLOOR_HZ: f64 = 175.0;
/// Femme support: strong-pitch low-tail floor (accepted track)
pub const STRONG_PITCH_TRACK_P5_FLOOR_HZ: f64 = 170.0;
/// Femme support: general pitch-support median floor
pub const PITCH_SUPPORT_MED_FLOOR_HZ: f64 = 175.0;
/// Femme support: general pitch-support mean floor
pub const PITCH_SUPPORT_MEAN_FLOOR_HZ: f64 = 180.0;
/// Femme support: voicing floor when pitch is strong
pub const VOICING_FLOOR_STRONG_PITCH: f64 = 0.40;
/// Femme support: voicing floor otherwise
pub const VOICING_FLOOR: f64 = 0.58;
/// Femme support: noise-support HNR floor
pub const NOISE_SUPPORT_HNR_FLOOR_DB: f64 = 12.4;
/// Femme support: resonance F1 floor
pub const RESONANCE_F1_FLOOR_HZ: f64 = 450.0;
/// Femme support: relaxed resonance F1 floor (needs ratio support)
pub const RESONANCE_F1_RELAXED_FLOOR_HZ: f64 = 410.0;
/// Femme support: F3/F2 floor accompanying the relaxed F1 cutoff
pub const RESONANCE_F3F2_FLOOR: f64 = 1.55;
/// Femme support: F2/F1 floor for the two-ratio resonance path
pub const RESONANCE_F2F1_FLOOR: f64 = 3.3;
/// Femme support: F3/F2 floor for the two-ratio resonance path
pub const RESONANCE_F3F2_RELAXED_FLOOR: f64 = 1.52;
/// Femme support: supports required out of {voicing, noise, resonance}
/// when pitch is strong
pub const STRONG_PITCH_MIN_SUPPORTS: usize = 2;
/// Femme support: supports required out of {pitch, voicing, resonance,
/// noise} otherwise
pub const WEAK_PITCH_MIN_SUPPORTS: usize = 3;

/// Femme-support guardrail: a `FEMME` read lacking enough acoustic support.
///
/// Strong pitch (sustained center with the low tail also high) buys a
/// relaxed voicing floor and needs only 2 of {voicing, noise, resonance};
/// otherwise 3 of {pitch, voicing, resonance, noise} are required. True
/// means downgrade.
pub fn femme_support_missing(features: &FeatureVector) -> bool {
    // Sustained high center, and the low tail holds up too (blocks
    // "tail-only" reads)
    let strong_pitch = features.f0_med >= STRONG_PITCH_MED_FLOOR_HZ
        && features.f0_mean_hz >= STRONG_PITCH_MEAN_FLOOR_HZ
        && (features.f0_p5_hz >= STRONG_PITCH_P5_FLOOR_HZ
            || features.f0_p5 >= STRONG_PITCH_TRACK_P5_FLOOR_HZ);

    let pitch_supported = features.f0_med >= PITCH_SUPPORT_MED_FLOOR_HZ
        && features.f0_mean_hz >= PITCH_SUPPORT_MEAN_FLOOR_HZ;

    // Strong pitch accepts weaker voicing
    let voicing_floor = if strong_pitch {
        VOICING_FLOOR_STRONG_PITCH
    } else {
        VOICING_FLOOR
    };
    let voicing_supported = features.voiced_frac >= voicing_floor;

    let noise_supported = features.hnr_mean_db >= NOISE_SUPPORT_HNR_FLOOR_DB;

    // Resonance only counts as dark when it is quite dark
    let resonance_supported = features.f1_med >= RESONANCE_F1_FLOOR_HZ
        || (features.f1_med >= RESONANCE_F1_RELAXED_FLOOR_HZ
            && features.f3_over_f2 >= RESONANCE_F3F2_FLOOR)
        || (features.f1_med >= RESONANCE_F1_RELAXED_FLOOR_HZ
            && features.f2_over_f1 >= RESONANCE_F2F1_FLOOR
            && features.f3_over_f2 >= RESONANCE_F3F2_RELAXED_FLOOR);

    if strong_pitch {
        let supports = [voicing_supported, noise_supported, resonance_supported]
            .iter()
            .filter(|&&s| s)
            .count();
        supports < STRONG_PITCH_MIN_SUPPORTS
    } else {
        let supports = [
            pitch_supported,
            voicing_supported,
            resonance_supported,
            noise_supported,
        ]
        .iter()
        .filter(|&&s| s)
        .count();
        supports < WEAK_PITCH_MIN_SUPPORTS
    }
}

/// Soft masc: masculine resonance ceiling
pub const SOFT_MASC_F1_CEIL_HZ: f64 = 440.0;
/// Soft masc: pitch-center band, low edge
pub const SOFT_MASC_F0_MED_LO_HZ: f64 = 150.0;
/// Soft masc: pitch-center band, high edge
pub const SOFT_MASC_F0_MED_HI_HZ: f64 = 175.0;
/// Soft masc: expressive-prosody floor on the 5th-95th percentile range
pub const EXPRESSIVE_RANGE_5_95_FLOOR_ST: f64 = 16.0;
/// Soft masc: expressive-prosody floor on semitone pitch variability
pub const EXPRESSIVE_SD_FLOOR_ST: f64 = 4.9;
/// Soft masc: expressive-prosody floor on the accepted-track 95th percentile
pub const EXPRESSIVE_F0_P95_FLOOR_HZ: f64 = 185.0;
/// Soft masc: expressive-prosody floor on maximum pitch
pub const EXPRESSIVE_F0_MAX_FLOOR_HZ: f64 = 430.0;
/// Soft masc: apply only while masc/femme odds stay at or below this
pub const SOFT_MASC_MAX_PROB_RATIO: f64 = 4.5;
/// Epsilon stabilizing the masc/femme odds ratio
pub const PROB_RATIO_EPSILON: f64 = 1e-9;

/// Soft-masc-androgyny guardrail: the model says `MASC` confidently, but the
/// acoustics read androgynous-masc (moderate pitch center, high
/// variability, still masc-resonant).
///
/// True means downgrade `MASC` to `ANDRO_MASC`.
pub fn soft_masc_androgyny(features: &FeatureVector, p_masc: f64, p_femme: f64) -> bool {
    // Anything brighter than this is true-andro or andro-femme territory
    let masc_resonance =
        features.f1_med.is_finite() && features.f1_med <= SOFT_MASC_F1_CEIL_HZ;

    let soft_masc_center = features.f0_med.is_finite()
        && features.f0_med >= SOFT_MASC_F0_MED_LO_HZ
        && features.f0_med <= SOFT_MASC_F0_MED_HI_HZ;

    // Expressive, variable prosody that softens a hard-masc read
    let expressive = (features.range_st_5_95.is_finite()
        && features.range_st_5_95 >= EXPRESSIVE_RANGE_5_95_FLOOR_ST)
        || (features.f0_sd_st.is_finite() && features.f0_sd_st >= EXPRESSIVE_SD_FLOOR_ST)
        || (features.f0_p95.is_finite() && features.f0_p95 >= EXPRESSIVE_F0_P95_FLOOR_HZ)
        || (features.f0_max_hz.is_finite()
            && features.f0_max_hz >= EXPRESSIVE_F0_MAX_FLOOR_HZ);

    // Leave lopsided model calls alone
    let ratio = (p_masc + PROB_RATIO_EPSILON) / (p_femme + PROB_RATIO_EPSILON);
    let not_extreme_masc = ratio <= SOFT_MASC_MAX_PROB_RATIO;

    masc_resonance && soft_masc_center && expressive && not_extreme_masc
}
