//! Instrumental Synthesizer
//!
//! Builds a backing track from three additive layers:
//! 1. A continuous bass sine
//! 2. A kick pulse: a sine at the beat rate gated to its peaks
//! 3. A major-triad chord progression, one chord per equal segment
//!
//! The sum goes through a short convolution reverb and an edge fade before
//! being normalized to 80% of full scale.

use std::f64::consts::TAU;

use crate::engine::{AudioBuffer, SAMPLE_RATE};
use crate::error::{AuraError, Result};
use crate::synth::effects::{kernel_reverb, normalize_to_int16};
use crate::synth::envelope::apply_edge_fade;
use crate::synth::genre::{profile_for, GenreProfile};
use crate::synth::SynthesisRequest;

const BASS_AMPLITUDE: f64 = 0.3;
const KICK_AMPLITUDE: f64 = 0.2;

/// The kick sine only sounds while its instantaneous value exceeds this
const KICK_GATE: f64 = 0.7;

/// Root, major third and perfect fifth as (frequency ratio, amplitude)
const TRIAD: [(f64, f64); 3] = [(1.0, 0.2), (1.25, 0.15), (1.5, 0.15)];

const REVERB_KERNEL: [f64; 3] = [1.0, 0.3, 0.1];
const REVERB_WET: f64 = 0.3;
const EDGE_FADE_SECS: f64 = 0.1;
const PEAK_FRACTION: f64 = 0.8;

/// Render an instrumental for the request's genre
pub fn synthesize_instrumental(request: &SynthesisRequest) -> Result<AudioBuffer> {
    synthesize_instrumental_with_profile(request, &profile_for(&request.genre))
}

/// Render an instrumental from an explicit profile
///
/// Profiles with no chord frequencies render bass and kick only.
///
/// # Errors
/// * `InvalidInput` - If the request duration is invalid
/// * `SynthesisFailure` - If the profile produces non-finite audio
pub fn synthesize_instrumental_with_profile(
    request: &SynthesisRequest,
    profile: &GenreProfile,
) -> Result<AudioBuffer> {
    request.validate()?;

    let num_samples = request.num_samples();
    tracing::debug!(
        genre = %profile.name,
        tempo_bpm = profile.tempo_bpm,
        bass_hz = profile.bass_frequency_hz,
        duration = request.duration_seconds,
        num_samples,
        "synthesizing instrumental"
    );

    let mut audio = vec![0.0; num_samples];
    add_chord_progression(
        &mut audio,
        &profile.chord_frequencies_hz,
        request.duration_seconds,
    );
    add_bass_and_kick(&mut audio, profile);

    kernel_reverb(&mut audio, &REVERB_KERNEL, REVERB_WET);
    apply_edge_fade(&mut audio, EDGE_FADE_SECS);

    let samples = normalize_to_int16(&audio, PEAK_FRACTION).map_err(|e| match e {
        AuraError::SynthesisFailure { details, .. } => AuraError::synthesis(
            "instrumental",
            format!(
                "{} [genre={}, tempo_bpm={}, bass_hz={}, chords_hz={:?}]",
                details,
                profile.name,
                profile.tempo_bpm,
                profile.bass_frequency_hz,
                profile.chord_frequencies_hz
            ),
        ),
        other => other,
    })?;

    Ok(AudioBuffer::from_samples(samples))
}

/// Bass tone plus the gated beat pulse, summed over the whole track
fn add_bass_and_kick(audio: &mut [f64], profile: &GenreProfile) {
    let bass_hz = profile.bass_frequency_hz;
    let beat_hz = profile.beat_frequency_hz();

    for (i, sample) in audio.iter_mut().enumerate() {
        let t = i as f64 / SAMPLE_RATE as f64;
        let bass = (TAU * bass_hz * t).sin() * BASS_AMPLITUDE;
        let pulse = (TAU * beat_hz * t).sin();
        let kick = if pulse > KICK_GATE {
            pulse * KICK_AMPLITUDE
        } else {
            0.0
        };
        *sample += bass + kick;
    }
}

/// One major triad per equal-length segment; phase restarts at each segment
fn add_chord_progression(audio: &mut [f64], roots_hz: &[f64], duration_secs: f64) {
    if roots_hz.is_empty() || audio.is_empty() {
        return;
    }

    let sample_rate = SAMPLE_RATE as f64;
    let chord_secs = duration_secs / roots_hz.len() as f64;

    for (i, &root) in roots_hz.iter().enumerate() {
        let start_secs = i as f64 * chord_secs;
        let start = ((start_secs * sample_rate) as usize).min(audio.len());
        let end = if i + 1 == roots_hz.len() {
            audio.len()
        } else {
            (((i + 1) as f64 * chord_secs * sample_rate) as usize).min(audio.len())
        };

        for (idx, sample) in audio[start..end].iter_mut().enumerate() {
            let t = (start + idx) as f64 / sample_rate - start_secs;
            *sample += TRIAD
                .iter()
                .map(|&(ratio, amplitude)| amplitude * (TAU * root * ratio * t).sin())
                .sum::<f64>();
        }
    }
}
