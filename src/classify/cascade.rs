//! Guardrail cascade decision engine
//!
//! Maps the prepared feature vector plus the raw classifier probabilities to
//! the final label and score. The cascade is an ordered sequence of pure
//! override rules over an immutable decision record; later rules replace the
//! decisions of earlier ones, and rule order is load-bearing. Every
//! threshold is a named constant next to the rule it governs so each rule
//! can be audited and tested in isolation.
//!
//! Two asymmetries are kept on purpose because the thresholds below were
//! tuned against them:
//! - the masc arms of the base decision and of the unstable-expressive
//!   override report the femme probability as their score
//! - the non-significant near-tie resolves to `ANDRO` and returns without
//!   visiting the post-cascade guardrails, while its sibling arms fall
//!   through to them

use super::guardrails;
use crate::analysis::result::{ClassificationResult, GenderLabel};
use crate::features::vector::FeatureVector;

/// Probabilities are significant when the larger exceeds the smaller by
/// this ratio
pub const SIGNIFICANCE_RATIO: f64 = 1.25;
/// Epsilon stabilizing the significance ratio against zero probabilities
pub const PROB_EPSILON: f64 = 1e-9;
/// Probability difference at or below this is a near tie
pub const NEAR_TIE_MARGIN: f64 = 0.05;

/// Base decision: F3 medians at or below this block a femme read
pub const FEMME_F3_FLOOR_HZ: f64 = 2500.0;

/// Near-tie femme lean: breathiness index ceiling (more negative = cleaner)
pub const BREATHY_FEMME_INDEX_CEIL: f64 = -11.0;
/// Near-tie femme lean: F1 floor marking bright resonance
pub const ANDRO_FEMME_F1_FLOOR_HZ: f64 = 450.0;

/// Unstable-expressive: pitch-center floor
pub const UNSTABLE_F0_MED_FLOOR_HZ: f64 = 160.0;
/// Unstable-expressive: floor on the pitch-support gap (big tail collapse)
pub const UNSTABLE_SUPPORT_GAP_FLOOR_HZ: f64 = 60.0;
/// Unstable-expressive: ceiling on the pitch-support ratio (low tail)
pub const UNSTABLE_SUPPORT_RATIO_CEIL: f64 = 0.70;
/// Unstable-expressive: pitch-range floor
pub const UNSTABLE_RANGE_FLOOR_ST: f64 = 28.0;
/// Unstable-expressive: pitch-variability floor
pub const UNSTABLE_SD_FLOOR_ST: f64 = 5.0;

/// Falsetto-femme: floor on minimum pitch
pub const FALSETTO_FEMME_F0_MIN_FLOOR_HZ: f64 = 290.0;
/// Falsetto-femme: floor on the 5th-percentile pitch
pub const FALSETTO_FEMME_F0_P5_FLOOR_HZ: f64 = 280.0;
/// Falsetto-femme: F2 ceiling marking dark resonance
pub const FALSETTO_FEMME_F2_CEIL_HZ: f64 = 1650.0;
/// Falsetto-femme: HNR ceiling marking a noisy signal
pub const FALSETTO_FEMME_HNR_CEIL_DB: f64 = 16.0;
/// Falsetto-femme: variability ceiling marking a flat delivery
pub const FALSETTO_FEMME_SD_CEIL_ST: f64 = 2.4;

/// Falsetto-andro: F1 ceiling for the low-resonance femme arm
pub const FALSETTO_ANDRO_F1_CEIL_HZ: f64 = 315.0;
/// Falsetto-andro: voicing ceiling
pub const FALSETTO_ANDRO_VOICED_CEIL: f64 = 0.60;
/// Falsetto-andro: F2 ceiling for the low-resonance femme arm
pub const FALSETTO_ANDRO_F2_CEIL_HZ: f64 = 1600.0;
/// Falsetto-andro: F2/F1 ceiling for the low-resonance femme arm
pub const FALSETTO_ANDRO_F2F1_CEIL: f64 = 4.5;
/// Falsetto-andro: pitch-center floor for the high-steady arm
pub const FALSETTO_ANDRO_F0_MED_FLOOR_HZ: f64 = 240.0;
/// Falsetto-andro: 5th-percentile pitch floor for the high-steady arm
pub const FALSETTO_ANDRO_F0_P5_FLOOR_HZ: f64 = 215.0;
/// Falsetto-andro: percentile-range ceiling for the high-steady arm
pub const FALSETTO_ANDRO_RANGE_5_95_CEIL_ST: f64 = 10.8;
/// Falsetto-andro: variability ceiling for the high-steady arm
pub const FALSETTO_ANDRO_SD_CEIL_ST: f64 = 4.5;
/// Falsetto-andro: breathiness-index ceiling for the high-steady arm
pub const FALSETTO_ANDRO_BREATHINESS_CEIL: f64 = -18.0;

/// Falsetto-masc: ceiling on minimum pitch (true low register present)
pub const FALSETTO_MASC_F0_MIN_CEIL_HZ: f64 = 80.0;
/// Falsetto-masc: pitch-center floor
pub const FALSETTO_MASC_F0_MED_FLOOR_HZ: f64 = 140.0;
/// Falsetto-masc: floor on maximum pitch
pub const FALSETTO_MASC_F0_MAX_FLOOR_HZ: f64 = 480.0;
/// Falsetto-masc: percentile-range floor
pub const FALSETTO_MASC_RANGE_5_95_FLOOR_ST: f64 = 18.0;
/// Falsetto-masc: full-range floor
pub const FALSETTO_MASC_RANGE_FLOOR_ST: f64 = 28.0;
/// Falsetto-masc: variability floor
pub const FALSETTO_MASC_SD_FLOOR_ST: f64 = 5.5;
/// Falsetto-masc: HNR ceiling
pub const FALSETTO_MASC_HNR_CEIL_DB: f64 = 12.0;
/// Falsetto-masc: F3/F2 ceiling
pub const FALSETTO_MASC_F3F2_CEIL: f64 = 1.55;
/// Falsetto-masc: F2/F1 ceiling
pub const FALSETTO_MASC_F2F1_CEIL: f64 = 3.2;

/// Score reported by every falsetto override
pub const FALSETTO_SCORE: f64 = 0.5;

/// Pitch-spike downgrade: F1 pivot for the support penalty
pub const PITCH_SPIKE_F1_PIVOT_HZ: f64 = 400.0;
/// Pitch-spike downgrade: Hz-to-score penalty scale
pub const PITCH_SPIKE_PENALTY_SCALE: f64 = 1000.0;
/// Pitch-spike downgrade: base score before the penalty
pub const PITCH_SPIKE_BASE_SCORE: f64 = 0.55;
/// Scores below this read as androgynous-masc
pub const ANDRO_MASC_SCORE_CEIL: f64 = 0.45;
/// Scores above this read as androgynous-femme
pub const ANDRO_FEMME_SCORE_FLOOR: f64 = 0.55;

/// Femme-support downgrade: pitch centers below this cap the andro score
pub const WEAK_PITCH_CENTER_CEIL_HZ: f64 = 140.0;
/// Femme-support downgrade: cap applied for weak pitch centers
pub const WEAK_PITCH_SCORE_CAP: f64 = 0.45;
/// Femme-support downgrade: F2/F1 band, low edge
pub const RATIO_DOWNGRADE_F2F1_LO: f64 = 3.55;
/// Femme-support downgrade: F2/F1 band, high edge (also the penalty pivot)
pub const RATIO_DOWNGRADE_F2F1_HI: f64 = 4.0;
/// Femme-support downgrade: F3/F2 floor
pub const RATIO_DOWNGRADE_F3F2_FLOOR: f64 = 1.5;
/// Femme-support downgrade: pitch-center split between the masc-leaning and
/// femme-leaning arms
pub const RATIO_DOWNGRADE_F0_SPLIT_HZ: f64 = 165.0;
/// Femme-support downgrade: base score before ratio penalties
pub const RATIO_DOWNGRADE_BASE_SCORE: f64 = 0.65;
/// Femme-support downgrade: extra penalty for very low pitch centers
pub const LOW_PITCH_EXTRA_PENALTY: f64 = 0.15;
/// Femme-support downgrade: pitch centers below this take the extra penalty
pub const LOW_PITCH_PENALTY_CEIL_HZ: f64 = 145.0;
/// Femme-support downgrade: F2/F1 pivot for the femme-leaning penalty
pub const ANDRO_FEMME_F2F1_PIVOT: f64 = 3.54;
/// Femme-support downgrade: penalty scale for the femme-leaning arm
pub const ANDRO_FEMME_PENALTY_SCALE: f64 = 10.0;

/// Classify a recording from its prepared features and the raw classifier
/// probabilities.
///
/// Pure function: identical inputs always yield the identical decision, and
/// any [`GenderScorer`](super::GenderScorer) stub upstream makes the whole
/// path deterministic for regression tests. Guardrails whose inputs are
/// undefined do not apply, so the decision falls back toward the raw
/// classifier probabilities rather than failing.
///
/// # Arguments
///
/// * `features` - Prepared feature vector (support features derived, clips
///   applied)
/// * `p_masc` - Classifier probability of a masculine read
/// * `p_femme` - Classifier probability of a feminine read
///
/// # Returns
///
/// Final label and confidence score
pub fn classify(features: &FeatureVector, p_masc: f64, p_femme: f64) -> ClassificationResult {
    let p_min = p_masc.min(p_femme);
    let p_max = p_masc.max(p_femme);
    let significant =
        p_max + PROB_EPSILON > SIGNIFICANCE_RATIO * (p_min + PROB_EPSILON);

    let decision = if significant {
        let mut decision = base_decision(features, p_masc, p_femme);
        for rule in [
            unstable_expressive_override(features, p_masc, p_femme),
            falsetto_femme_override(features),
            falsetto_andro_override(features, p_masc, p_femme),
            falsetto_masc_override(features),
        ] {
            if let Some(replacement) = rule {
                decision = replacement;
            }
        }
        decision
    } else {
        let diff = p_femme - p_masc;
        log::debug!("Probabilities not significant (diff {:.4})", diff);

        if diff.abs() <= NEAR_TIE_MARGIN {
            // Near ties end the decision here; no guardrail sees them
            return ClassificationResult {
                label: GenderLabel::Andro,
                score: (0.5 - p_min).max(0.5 + p_min),
            };
        }

        let breathy_or_bright = features.breathiness_index < BREATHY_FEMME_INDEX_CEIL
            || features.f1_med > ANDRO_FEMME_F1_FLOOR_HZ;
        if diff > 0.0 && breathy_or_bright {
            ClassificationResult {
                label: GenderLabel::AndroFemme,
                score: p_max,
            }
        } else {
            ClassificationResult {
                label: GenderLabel::AndroMasc,
                score: p_min,
            }
        }
    };

    apply_post_guardrails(features, p_masc, p_femme, decision)
}

/// Base decision for significant probabilities.
///
/// A femme-leaning model call needs the F3 median behind it; everything
/// else reads masc. The scores are what the tuned thresholds downstream
/// expect: the masc-leaning arm reports the femme probability.
fn base_decision(features: &FeatureVector, p_masc: f64, p_femme: f64) -> ClassificationResult {
    if p_femme > p_masc {
        if features.f3_med > FEMME_F3_FLOOR_HZ {
            ClassificationResult {
                label: GenderLabel::Femme,
                score: p_femme,
            }
        } else {
            ClassificationResult {
                label: GenderLabel::Masc,
                score: p_masc,
            }
        }
    } else {
        ClassificationResult {
            label: GenderLabel::Masc,
            score: p_femme,
        }
    }
}

/// Unstable-expressive override: a high pitch center whose low tail
/// collapses, with wide or volatile range, re-resolves as if the
/// probabilities were tied.
fn unstable_expressive_override(
    features: &FeatureVector,
    p_masc: f64,
    p_femme: f64,
) -> Option<ClassificationResult> {
    let unstable = features.f0_med >= UNSTABLE_F0_MED_FLOOR_HZ
        && features.pitch_support_gap_hz >= UNSTABLE_SUPPORT_GAP_FLOOR_HZ
        && features.pitch_support_ratio <= UNSTABLE_SUPPORT_RATIO_CEIL
        && (features.range_semitones >= UNSTABLE_RANGE_FLOOR_ST
            || features.f0_sd_st >= UNSTABLE_SD_FLOOR_ST);
    if !unstable {
        return None;
    }
    log::debug!("Unstable-expressive override applies");

    let p_min = p_masc.min(p_femme);
    let diff = p_femme - p_masc;

    let decision = if diff.abs() <= NEAR_TIE_MARGIN {
        ClassificationResult {
            label: GenderLabel::Andro,
            score: (p_femme - p_min).max(p_masc + p_min),
        }
    } else if diff > 0.0 && features.breathiness_index < BREATHY_FEMME_INDEX_CEIL {
        ClassificationResult {
            label: GenderLabel::Femme,
            score: p_femme,
        }
    } else {
        // Masc arm reports the femme probability, as in the base decision
        ClassificationResult {
            label: GenderLabel::Masc,
            score: p_femme,
        }
    };
    Some(decision)
}

/// Falsetto-femme override: pitch never leaves the falsetto register and
/// the resonance or signal quality undercuts a genuine femme read.
fn falsetto_femme_override(features: &FeatureVector) -> Option<ClassificationResult> {
    let falsetto_pitch = features.f0_min_hz > FALSETTO_FEMME_F0_MIN_FLOOR_HZ
        || features.f0_p5_hz > FALSETTO_FEMME_F0_P5_FLOOR_HZ;
    let undercut = features.f2_med < FALSETTO_FEMME_F2_CEIL_HZ
        || features.hnr_mean_db < FALSETTO_FEMME_HNR_CEIL_DB
        || features.f0_sd_st < FALSETTO_FEMME_SD_CEIL_ST;

    if falsetto_pitch && undercut {
        log::debug!("Falsetto-femme override applies");
        Some(ClassificationResult {
            label: GenderLabel::FemmeFalsetto,
            score: FALSETTO_SCORE,
        })
    } else {
        None
    }
}

/// Falsetto-androgynous override: either a femme-leaning call on very dark,
/// weakly voiced resonance, or a high steady pitch with almost no range and
/// a very clean signal.
fn falsetto_andro_override(
    features: &FeatureVector,
    p_masc: f64,
    p_femme: f64,
) -> Option<ClassificationResult> {
    let dark_weak_femme = p_femme > p_masc
        && features.f1_med <= FALSETTO_ANDRO_F1_CEIL_HZ
        && features.voiced_frac < FALSETTO_ANDRO_VOICED_CEIL
        && features.f2_med < FALSETTO_ANDRO_F2_CEIL_HZ
        && features.f2_over_f1 < FALSETTO_ANDRO_F2F1_CEIL;

    let high_steady = (features.f0_med >= FALSETTO_ANDRO_F0_MED_FLOOR_HZ
        || features.f0_p5_hz >= FALSETTO_ANDRO_F0_P5_FLOOR_HZ)
        && features.range_st_5_95 < FALSETTO_ANDRO_RANGE_5_95_CEIL_ST
        && features.f0_sd_st < FALSETTO_ANDRO_SD_CEIL_ST
        && features.voiced_frac < FALSETTO_ANDRO_VOICED_CEIL
        && features.breathiness_index < FALSETTO_ANDRO_BREATHINESS_CEIL;

    if dark_weak_femme || high_steady {
        log::debug!("Falsetto-androgynous override applies");
        Some(ClassificationResult {
            label: GenderLabel::AndroFalsetto,
            score: FALSETTO_SCORE,
        })
    } else {
        None
    }
}

/// Falsetto-masc override: a true low register is present but the pitch
/// rockets through a huge, volatile range with masc-packed formant spacing.
fn falsetto_masc_override(features: &FeatureVector) -> Option<ClassificationResult> {
    let applies = features.f0_min_hz <= FALSETTO_MASC_F0_MIN_CEIL_HZ
        && features.f0_med > FALSETTO_MASC_F0_MED_FLOOR_HZ
        && features.f0_max_hz > FALSETTO_MASC_F0_MAX_FLOOR_HZ
        && features.range_st_5_95 > FALSETTO_MASC_RANGE_5_95_FLOOR_ST
        && (features.range_semitones > FALSETTO_MASC_RANGE_FLOOR_ST
            || features.f0_sd_st > FALSETTO_MASC_SD_FLOOR_ST
            || features.hnr_mean_db < FALSETTO_MASC_HNR_CEIL_DB)
        && features.f3_over_f2 < FALSETTO_MASC_F3F2_CEIL
        && features.f2_over_f1 < FALSETTO_MASC_F2F1_CEIL;

    if applies {
        log::debug!("Falsetto-masc override applies");
        Some(ClassificationResult {
            label: GenderLabel::MascFalsetto,
            score: FALSETTO_SCORE,
        })
    } else {
        None
    }
}

/// Apply the post-cascade guardrails.
///
/// Both guardrail groups key off the label as it stood on entry: a FEMME
/// decision downgraded to MASC here is not then re-examined by the
/// soft-masc guardrail in the same pass.
fn apply_post_guardrails(
    features: &FeatureVector,
    p_masc: f64,
    p_femme: f64,
    decision: ClassificationResult,
) -> ClassificationResult {
    let p_min = p_masc.min(p_femme);
    let andro_threshold = (0.5 - p_min).min(0.5 + p_min);
    let entry_label = decision.label;
    let mut decision = decision;

    if entry_label == GenderLabel::Femme {
        if guardrails::pitch_spike_trap(features) {
            log::debug!("Pitch-spike trap downgrades FEMME");
            decision = pitch_spike_downgrade(features, p_femme, andro_threshold);
        } else if guardrails::femme_support_missing(features) {
            log::debug!("Femme-support guardrail downgrades FEMME");
            decision = femme_support_downgrade(features, andro_threshold);
        }
    }

    if entry_label == GenderLabel::Masc
        && guardrails::soft_masc_androgyny(features, p_masc, p_femme)
    {
        log::debug!("Soft-masc guardrail downgrades MASC");
        decision = ClassificationResult {
            label: GenderLabel::AndroMasc,
            score: p_masc,
        };
    }

    decision
}

/// Resolve a pitch-spike-trapped FEMME into the androgynous band.
///
/// Dark resonance (F1 below the pivot) pays a proportional support penalty
/// whose resulting score selects the leaning; resonance at or above the
/// pivot resolves to a plain ANDRO capped by the femme probability.
fn pitch_spike_downgrade(
    features: &FeatureVector,
    p_femme: f64,
    andro_threshold: f64,
) -> ClassificationResult {
    if features.f1_med < PITCH_SPIKE_F1_PIVOT_HZ {
        let penalty =
            (features.f1_med - PITCH_SPIKE_F1_PIVOT_HZ).abs() / PITCH_SPIKE_PENALTY_SCALE;
        let score = (PITCH_SPIKE_BASE_SCORE - penalty).abs();
        let label = if score < ANDRO_MASC_SCORE_CEIL {
            GenderLabel::AndroMasc
        } else if score > ANDRO_FEMME_SCORE_FLOOR {
            GenderLabel::AndroFemme
        } else {
            GenderLabel::Andro
        };
        ClassificationResult { label, score }
    } else {
        ClassificationResult {
            label: GenderLabel::Andro,
            score: andro_threshold.min(p_femme),
        }
    }
}

/// Resolve an unsupported FEMME via the numeric sub-rules.
///
/// The pitch center and the formant-spacing ratios select among ANDRO,
/// ANDRO_MASC, ANDRO_FEMME, and MASC, with scores blending ratio distances
/// against the shared base score.
fn femme_support_downgrade(
    features: &FeatureVector,
    andro_threshold: f64,
) -> ClassificationResult {
    let mut andro_threshold = andro_threshold;
    if features.f0_med < WEAK_PITCH_CENTER_CEIL_HZ {
        andro_threshold = andro_threshold.min(WEAK_PITCH_SCORE_CAP);
    }

    if andro_threshold > ANDRO_MASC_SCORE_CEIL && andro_threshold < ANDRO_FEMME_SCORE_FLOOR {
        ClassificationResult {
            label: GenderLabel::Andro,
            score: andro_threshold,
        }
    } else if features.f2_over_f1 >= RATIO_DOWNGRADE_F2F1_LO
        && features.f2_over_f1 < RATIO_DOWNGRADE_F2F1_HI
        && features.f3_over_f2 > RATIO_DOWNGRADE_F3F2_FLOOR
        && features.f0_med < RATIO_DOWNGRADE_F0_SPLIT_HZ
    {
        let mut score =
            RATIO_DOWNGRADE_BASE_SCORE - (features.f2_over_f1 - RATIO_DOWNGRADE_F2F1_HI).abs();
        if features.f0_med < LOW_PITCH_PENALTY_CEIL_HZ {
            score -= LOW_PITCH_EXTRA_PENALTY;
        }
        ClassificationResult {
            label: GenderLabel::AndroMasc,
            score,
        }
    } else if features.f0_med > RATIO_DOWNGRADE_F0_SPLIT_HZ
        && features.f3_over_f2 > RATIO_DOWNGRADE_F3F2_FLOOR
    {
        let penalty = (round2(features.f2_over_f1) - ANDRO_FEMME_F2F1_PIVOT).abs()
            / ANDRO_FEMME_PENALTY_SCALE;
        let score = RATIO_DOWNGRADE_BASE_SCORE - round2(penalty);
        ClassificationResult {
            label: GenderLabel::AndroFemme,
            score,
        }
    } else {
        ClassificationResult {
            label: GenderLabel::Masc,
            score: andro_threshold,
        }
    }
}

/// Round to two decimal places.
fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn undefined() -> FeatureVector {
        FeatureVector::undefined()
    }

    #[test]
    fn test_near_tie_is_andro() {
        // 0.51 / 0.49 is a ratio of ~1.04, below 1.25: not significant;
        // |diff| = 0.02 <= 0.05: near tie
        let result = classify(&undefined(), 0.49, 0.51);
        assert_eq!(result.label, GenderLabel::Andro);
        assert!((result.score - 0.99).abs() < 1e-12);
    }

    #[test]
    fn test_near_tie_symmetry() {
        let result = classify(&undefined(), 0.51, 0.49);
        assert_eq!(result.label, GenderLabel::Andro);
        assert!((result.score - 0.99).abs() < 1e-12);
    }

    #[test]
    fn test_non_significant_lean_femme_needs_breath_or_brightness() {
        // diff = 0.08: outside the near-tie margin but not significant
        // (0.54 / 0.46 ~ 1.17)
        let mut features = undefined();
        features.breathiness_index = -15.0;
        let result = classify(&features, 0.46, 0.54);
        assert_eq!(result.label, GenderLabel::AndroFemme);
        assert_eq!(result.score, 0.54);

        // Bright resonance works as the alternative lean
        let mut features = undefined();
        features.f1_med = 470.0;
        let result = classify(&features, 0.46, 0.54);
        assert_eq!(result.label, GenderLabel::AndroFemme);

        // Neither: masc lean with the smaller probability as score
        let result = classify(&undefined(), 0.46, 0.54);
        assert_eq!(result.label, GenderLabel::AndroMasc);
        assert_eq!(result.score, 0.46);
    }

    /// A well-supported femme voice profile: the post-cascade guardrails
    /// have nothing to object to.
    fn supported_femme() -> FeatureVector {
        let mut f = undefined();
        f.f0_med = 210.0;
        f.f0_mean_hz = 212.0;
        f.f0_p5 = 178.0;
        f.f0_p5_hz = 180.0;
        f.voiced_frac = 0.65;
        f.hnr_mean_db = 15.0;
        f.f1_med = 470.0;
        f
    }

    #[test]
    fn test_base_femme_needs_f3_support() {
        let mut features = supported_femme();
        features.f3_med = 2700.0;
        let result = classify(&features, 0.2, 0.8);
        assert_eq!(result.label, GenderLabel::Femme);
        assert_eq!(result.score, 0.8);

        // F3 at the floor exactly does not support a femme read
        features.f3_med = 2500.0;
        let result = classify(&features, 0.2, 0.8);
        assert_eq!(result.label, GenderLabel::Masc);
        assert_eq!(result.score, 0.2);
    }

    #[test]
    fn test_base_masc_reports_femme_probability() {
        // Kept deliberately: the masc base arm scores with p_femme
        let result = classify(&undefined(), 0.8, 0.2);
        assert_eq!(result.label, GenderLabel::Masc);
        assert_eq!(result.score, 0.2);
    }

    #[test]
    fn test_undefined_features_follow_probabilities_only() {
        // With every feature undefined no override or guardrail applies
        let result = classify(&undefined(), 0.9, 0.1);
        assert_eq!(result.label, GenderLabel::Masc);
        let result = classify(&undefined(), 0.1, 0.9);
        // F3 undefined blocks the femme read
        assert_eq!(result.label, GenderLabel::Masc);
        assert_eq!(result.score, 0.1);
    }

    /// A supported femme profile whose pitch tail collapses expressively.
    fn unstable_features() -> FeatureVector {
        let mut f = supported_femme();
        f.f3_med = 2700.0;
        f.pitch_support_gap_hz = 70.0;
        f.pitch_support_ratio = 0.6;
        f.f0_sd_st = 5.5;
        f
    }

    #[test]
    fn test_unstable_expressive_near_tie() {
        // With probabilities summing to 1 the significance test implies a
        // difference above the tie margin, so exercise the tie arm with a
        // raw (non-complementary) pair: 0.14/0.10 is significant (ratio
        // 1.4) yet |diff| = 0.04 is a tie
        let result = classify(&unstable_features(), 0.10, 0.14);
        assert_eq!(result.label, GenderLabel::Andro);
        // max(p_femme - min, p_masc + min) = max(0.04, 0.20)
        assert!((result.score - 0.20).abs() < 1e-12);
    }

    #[test]
    fn test_unstable_expressive_femme_needs_breathiness() {
        let mut features = unstable_features();
        features.breathiness_index = -15.0;
        let result = classify(&features, 0.3, 0.7);
        assert_eq!(result.label, GenderLabel::Femme);
        assert_eq!(result.score, 0.7);

        // Without the breathiness support the same profile reads masc,
        // scored with the femme probability
        features.breathiness_index = -5.0;
        let result = classify(&features, 0.3, 0.7);
        assert_eq!(result.label, GenderLabel::Masc);
        assert_eq!(result.score, 0.7);
    }

    #[test]
    fn test_unstable_expressive_requires_every_leg() {
        let mut features = unstable_features();
        features.pitch_support_ratio = 0.8; // tail holds up
        let result = classify(&features, 0.3, 0.7);
        assert_eq!(result.label, GenderLabel::Femme);
    }

    #[test]
    fn test_falsetto_femme_override() {
        let mut features = undefined();
        features.f3_med = 2700.0;
        features.f0_min_hz = 300.0;
        features.f0_sd_st = 2.0;
        let result = classify(&features, 0.2, 0.8);
        assert_eq!(result.label, GenderLabel::FemmeFalsetto);
        assert_eq!(result.score, 0.5);
    }

    #[test]
    fn test_falsetto_femme_via_p5_and_noise() {
        let mut features = undefined();
        features.f0_p5_hz = 285.0;
        features.hnr_mean_db = 14.0;
        let result = classify(&features, 0.8, 0.2);
        assert_eq!(result.label, GenderLabel::FemmeFalsetto);
    }

    #[test]
    fn test_falsetto_andro_dark_weak_femme_arm() {
        let mut features = undefined();
        features.f1_med = 300.0;
        features.voiced_frac = 0.5;
        features.f2_med = 1500.0;
        features.f2_over_f1 = 4.0;
        let result = classify(&features, 0.3, 0.7);
        assert_eq!(result.label, GenderLabel::AndroFalsetto);
        assert_eq!(result.score, 0.5);

        // The same profile under a masc-leaning call does not trigger
        let result = classify(&features, 0.7, 0.3);
        assert_ne!(result.label, GenderLabel::AndroFalsetto);
    }

    #[test]
    fn test_falsetto_andro_high_steady_arm() {
        let mut features = undefined();
        features.f0_med = 250.0;
        features.range_st_5_95 = 8.0;
        features.f0_sd_st = 3.0;
        features.voiced_frac = 0.5;
        features.breathiness_index = -20.0;
        let result = classify(&features, 0.8, 0.2);
        assert_eq!(result.label, GenderLabel::AndroFalsetto);
    }

    #[test]
    fn test_falsetto_masc_override() {
        let mut features = undefined();
        features.f0_min_hz = 78.0;
        features.f0_med = 150.0;
        features.f0_max_hz = 500.0;
        features.range_st_5_95 = 20.0;
        features.f0_sd_st = 6.0;
        features.f3_over_f2 = 1.4;
        features.f2_over_f1 = 3.0;
        let result = classify(&features, 0.8, 0.2);
        assert_eq!(result.label, GenderLabel::MascFalsetto);
        assert_eq!(result.score, 0.5);
    }

    #[test]
    fn test_falsetto_masc_requires_low_register() {
        let mut features = undefined();
        features.f0_min_hz = 95.0; // no true low register
        features.f0_med = 150.0;
        features.f0_max_hz = 500.0;
        features.range_st_5_95 = 20.0;
        features.f0_sd_st = 6.0;
        features.f3_over_f2 = 1.4;
        features.f2_over_f1 = 3.0;
        let result = classify(&features, 0.8, 0.2);
        assert_eq!(result.label, GenderLabel::Masc);
    }

    /// Femme-read features that trip the pitch-spike trap.
    fn spike_trapped_femme() -> FeatureVector {
        let mut f = undefined();
        f.f3_med = 2700.0;
        f.f1_med = 380.0;
        f.hnr_mean_db = 11.0;
        f.f0_max_hz = 440.0;
        f.f0_med = 170.0;
        f
    }

    #[test]
    fn test_pitch_spike_downgrade_penalty_band() {
        // F1 of 380: penalty 0.02, score 0.53 -> plain ANDRO
        let result = classify(&spike_trapped_femme(), 0.3, 0.7);
        assert_eq!(result.label, GenderLabel::Andro);
        assert!((result.score - 0.53).abs() < 1e-12);

        // F1 of 290: penalty 0.11, score 0.44 -> ANDRO_MASC
        let mut features = spike_trapped_femme();
        features.f1_med = 290.0;
        let result = classify(&features, 0.3, 0.7);
        assert_eq!(result.label, GenderLabel::AndroMasc);
        assert!((result.score - 0.44).abs() < 1e-12);
    }

    #[test]
    fn test_pitch_spike_downgrade_bright_arm() {
        // F1 between the pivot (400) and the trap ceiling (410)
        let mut features = spike_trapped_femme();
        features.f1_med = 405.0;
        let result = classify(&features, 0.3, 0.7);
        assert_eq!(result.label, GenderLabel::Andro);
        // min(andro_threshold, p_femme) with andro_threshold = 0.2
        assert!((result.score - 0.2).abs() < 1e-12);
    }

    /// Femme-read features that fail the support guardrail but not the
    /// spike trap.
    fn unsupported_femme() -> FeatureVector {
        let mut f = undefined();
        f.f3_med = 2700.0;
        f.f1_med = 500.0; // escapes the spike trap's masc anchor
        f.f0_med = 150.0;
        f.f0_mean_hz = 155.0;
        f.voiced_frac = 0.3;
        f.hnr_mean_db = 10.0;
        f
    }

    #[test]
    fn test_femme_support_downgrade_andro_band() {
        // p_min = 0.02: andro_threshold = 0.48, inside (0.45, 0.55)
        let result = classify(&unsupported_femme(), 0.02, 0.98);
        assert_eq!(result.label, GenderLabel::Andro);
        assert!((result.score - 0.48).abs() < 1e-12);
    }

    #[test]
    fn test_femme_support_downgrade_weak_pitch_caps_threshold() {
        let mut features = unsupported_femme();
        features.f0_med = 130.0;
        features.f2_over_f1 = 3.7;
        features.f3_over_f2 = 1.6;
        // Cap forces the threshold to 0.45, leaving the andro band; the
        // ratio sub-rule then applies: score = 0.65 - |3.7 - 4.0| - 0.15
        let result = classify(&features, 0.02, 0.98);
        assert_eq!(result.label, GenderLabel::AndroMasc);
        assert!((result.score - 0.2).abs() < 1e-9);
    }

    #[test]
    fn test_femme_support_downgrade_femme_leaning_arm() {
        let mut features = unsupported_femme();
        features.f0_med = 170.0;
        features.f0_mean_hz = 172.0;
        features.f2_over_f1 = 3.9;
        features.f3_over_f2 = 1.6;
        // andro_threshold = 0.5 - 0.1 = 0.4: outside the andro band;
        // f0 above the 165 split with ratio support: ANDRO_FEMME with
        // penalty |3.9 - 3.54| / 10 rounded = 0.04
        let result = classify(&features, 0.1, 0.9);
        assert_eq!(result.label, GenderLabel::AndroFemme);
        assert!((result.score - 0.61).abs() < 1e-9);
    }

    #[test]
    fn test_femme_support_downgrade_fallback_masc() {
        let mut features = unsupported_femme();
        features.f0_med = 150.0;
        // No ratio evidence at all: falls back to MASC at the threshold
        let result = classify(&features, 0.1, 0.9);
        assert_eq!(result.label, GenderLabel::Masc);
        assert!((result.score - 0.4).abs() < 1e-12);
    }

    #[test]
    fn test_soft_masc_downgrade() {
        let mut features = undefined();
        features.f1_med = 430.0;
        features.f0_med = 160.0;
        features.f0_sd_st = 5.0;
        let result = classify(&features, 0.7, 0.3);
        assert_eq!(result.label, GenderLabel::AndroMasc);
        assert_eq!(result.score, 0.7);
    }

    #[test]
    fn test_soft_masc_skipped_after_femme_downgrade() {
        // A FEMME entry downgraded to MASC by the support guardrail is not
        // re-examined by the soft-masc guardrail in the same pass
        let mut features = unsupported_femme();
        features.f0_med = 160.0;
        features.f0_sd_st = 6.0;
        features.f1_med = 430.0;
        // Support guardrail: weak pitch, no voicing/noise support and the
        // relaxed resonance paths need ratios -> downgrade. Ratios are
        // undefined, so the fallback MASC arm fires.
        let result = classify(&features, 0.1, 0.9);
        assert_eq!(result.label, GenderLabel::Masc);
        assert!((result.score - 0.4).abs() < 1e-12);
    }

    #[test]
    fn test_guardrails_skip_falsetto_labels() {
        // A FEMME_FALSETTO result is not a FEMME for the post guardrails
        let mut features = spike_trapped_femme();
        features.f0_min_hz = 300.0;
        features.f0_sd_st = 2.0;
        let result = classify(&features, 0.3, 0.7);
        assert_eq!(result.label, GenderLabel::FemmeFalsetto);
        assert_eq!(result.score, 0.5);
    }

    #[test]
    fn test_round2() {
        assert_eq!(round2(0.6549), 0.65);
        assert_eq!(round2(3.917), 3.92);
        assert_eq!(round2(-0.125), -0.13);
    }
}
