//! Vocal Melody Synthesizer
//!
//! Approximates a sung line: one note per lyric word (at most 20), each
//! note an additive tone with two harmonics and a light vibrato, walking
//! up the genre's scale.

use std::f64::consts::TAU;
use std::sync::OnceLock;

use regex::Regex;

use crate::engine::{AudioBuffer, SAMPLE_RATE};
use crate::error::{AuraError, Result};
use crate::synth::effects::{delay_reverb, normalize_to_int16};
use crate::synth::envelope::{apply_edge_fade, apply_note_envelope};
use crate::synth::genre::{vocal_profile_for, VocalProfile};
use crate::synth::SynthesisRequest;

/// Upper bound on the number of melodic notes
pub const MAX_NOTES: usize = 20;

const VIBRATO_RATE_HZ: f64 = 5.0;
const VIBRATO_DEPTH: f64 = 0.02;

/// (harmonic number, amplitude)
const HARMONICS: [(f64, f64); 3] = [(1.0, 1.0), (2.0, 0.3), (3.0, 0.2)];

const NOTE_GAIN: f64 = 0.4;
const NOTE_ATTACK_SECS: f64 = 0.05;
const NOTE_RELEASE_SECS: f64 = 0.1;

const EDGE_FADE_SECS: f64 = 0.1;
const ECHO_DELAY_SECS: f64 = 0.1;
const ECHO_WET: f64 = 0.2;
const ECHO_TAP_GAIN: f64 = 0.3;
const PEAK_FRACTION: f64 = 0.7;

fn section_markers() -> &'static Regex {
    static MARKERS: OnceLock<Regex> = OnceLock::new();
    MARKERS.get_or_init(|| {
        Regex::new(concat!(
            r"(?i)\[\s*(?:verse(?:\s*\d+)?|chorus|bridge|outro)\s*\]:?",
            r"|\b(?:verse(?:\s*\d+)?|chorus|bridge|outro)\s*:",
        ))
        .expect("section marker pattern is valid")
    })
}

/// Lyrics with section headings such as `Verse 1:` or `[Chorus]` removed
pub fn strip_section_markers(lyrics: &str) -> String {
    section_markers().replace_all(lyrics, " ").into_owned()
}

/// Number of sung words once section headings are removed
pub fn count_lyric_words(lyrics: &str) -> usize {
    strip_section_markers(lyrics).split_whitespace().count()
}

/// Render a vocal melody for the request's genre
pub fn synthesize_vocals(request: &SynthesisRequest) -> Result<AudioBuffer> {
    synthesize_vocals_with_profile(request, &vocal_profile_for(&request.genre))
}

/// Render a vocal melody from an explicit profile
///
/// Lyrics without any words produce silence of the requested length.
pub fn synthesize_vocals_with_profile(
    request: &SynthesisRequest,
    profile: &VocalProfile,
) -> Result<AudioBuffer> {
    request.validate()?;

    let num_samples = request.num_samples();
    let num_notes = count_lyric_words(&request.lyrics).min(MAX_NOTES);
    tracing::debug!(
        genre = %profile.name,
        base_hz = profile.base_frequency_hz,
        num_notes,
        duration = request.duration_seconds,
        "synthesizing vocals"
    );

    let mut audio = vec![0.0; num_samples];
    if num_notes > 0 && !profile.scale_ratios.is_empty() {
        add_melody(&mut audio, profile, num_notes, request.duration_seconds);
    }

    apply_edge_fade(&mut audio, EDGE_FADE_SECS);
    delay_reverb(&mut audio, ECHO_DELAY_SECS, ECHO_WET, ECHO_TAP_GAIN);

    let samples = normalize_to_int16(&audio, PEAK_FRACTION).map_err(|e| match e {
        AuraError::SynthesisFailure { details, .. } => AuraError::synthesis(
            "vocals",
            format!(
                "{} [genre={}, base_hz={}, scale={:?}, notes={}]",
                details, profile.name, profile.base_frequency_hz, profile.scale_ratios, num_notes
            ),
        ),
        other => other,
    })?;

    Ok(AudioBuffer::from_samples(samples))
}

/// Lay `num_notes` equal-length notes over the buffer
fn add_melody(audio: &mut [f64], profile: &VocalProfile, num_notes: usize, duration_secs: f64) {
    let sample_rate = SAMPLE_RATE as f64;
    let note_secs = duration_secs / num_notes as f64;

    for i in 0..num_notes {
        let start_secs = i as f64 * note_secs;
        let start = ((start_secs * sample_rate) as usize).min(audio.len());
        let end = (((i + 1) as f64 * note_secs * sample_rate) as usize).min(audio.len());
        if start >= end {
            continue;
        }

        let ratio = profile.scale_ratios[i % profile.scale_ratios.len()];
        let mut note = render_note(profile.base_frequency_hz * ratio, start, end, start_secs);
        apply_note_envelope(&mut note, NOTE_ATTACK_SECS, NOTE_RELEASE_SECS);

        for (sample, value) in audio[start..end].iter_mut().zip(note) {
            *sample += value * NOTE_GAIN;
        }
    }
}

/// Harmonic tone with vibrato for samples `start..end`, time measured from
/// `start_secs`
fn render_note(frequency_hz: f64, start: usize, end: usize, start_secs: f64) -> Vec<f64> {
    (start..end)
        .map(|idx| {
            let t = idx as f64 / SAMPLE_RATE as f64 - start_secs;
            let vibrato = 1.0 + VIBRATO_DEPTH * (TAU * VIBRATO_RATE_HZ * t).sin();
            HARMONICS
                .iter()
                .map(|&(harmonic, amplitude)| {
                    amplitude * (TAU * frequency_hz * harmonic * vibrato * t).sin()
                })
                .sum::<f64>()
        })
        .collect()
}
