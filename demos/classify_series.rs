//! Demo: classify a synthetic recording
//!
//! Runs the full pipeline on a synthesized voice with a stub scorer and
//! prints the cleaned track size, the feature summary, and the final label.
//!
//! Usage:
//!   cargo run --release --example classify_series

use vocal_profile::classify::GenderScorer;
use vocal_profile::features::pitch::PitchSeries;
use vocal_profile::track::Frame;
use vocal_profile::{analyze_voice, AnalysisConfig, AnalysisError, ModelConfig};

/// Fixed-probability stand-in for the trained pipeline.
struct StubScorer;

impl GenderScorer for StubScorer {
    fn score(&self, _row: &[f64]) -> Result<(f64, f64), AnalysisError> {
        Ok((0.28, 0.72))
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logger
    env_logger::init();

    // Synthesize 10 seconds of a gently wobbling voice at 10 ms steps
    let steps = 1000;
    let mut track = Vec::with_capacity(steps);
    let mut times = Vec::with_capacity(steps);
    let mut f0_series = Vec::with_capacity(steps);
    let mut hnr = Vec::with_capacity(steps);

    for i in 0..steps {
        let t = i as f64 * 0.01;
        let wobble = (t * 2.4).sin();
        let voiced = i % 9 != 0;
        let f0 = 205.0 + 8.0 * wobble;
        track.push(Frame::new(
            t,
            f0,
            495.0 + 15.0 * wobble,
            1680.0 + 40.0 * wobble,
            2780.0 + 35.0 * wobble,
            3580.0 + 30.0 * wobble,
        ));
        times.push(t);
        f0_series.push(if voiced { f0 } else { 0.0 });
        hnr.push(if voiced { 17.0 + wobble } else { -200.0 });
    }

    let pitch = PitchSeries::new(times, f0_series);
    let result = analyze_voice(
        &track,
        &pitch,
        &hnr,
        &StubScorer,
        &ModelConfig::default(),
        &AnalysisConfig::default(),
    )?;

    println!("Analysis Results:");
    println!(
        "  Accepted frames: {} of {}",
        result.metadata.frames_accepted, result.metadata.frames_total
    );
    println!("  F0 median: {:.1} Hz", result.features.f0_med);
    println!(
        "  F1/F2/F3 medians: {:.0} / {:.0} / {:.0} Hz",
        result.features.f1_med, result.features.f2_med, result.features.f3_med
    );
    println!("  Voiced fraction: {:.2}", result.features.voiced_frac);
    println!("  Breathiness index: {:.1}", result.features.breathiness_index);
    println!(
        "  Label: {} (score {:.2})",
        result.classification.label, result.classification.score
    );
    println!(
        "  Processing time: {:.2} ms",
        result.metadata.processing_time_ms
    );

    Ok(())
}
