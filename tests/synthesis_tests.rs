//! Integration tests for the offline synthesizer and mixer
//!
//! These tests verify:
//! - Track lengths and normalization levels
//! - Determinism
//! - Genre character in the spectrum
//! - Mixing of tracks with different lengths

use auralynx::engine::{read_wav, write_wav, AudioBuffer, SAMPLE_RATE};
use auralynx::mixer::{mix, MixRequest, Mixer};
use auralynx::synth::{synthesize_instrumental, synthesize_vocals, SynthesisRequest};
use test_case::test_case;

/// Magnitude of the DFT bin at `freq_hz` over `samples`, scaled to the
/// amplitude of a matching sinusoid
fn tone_magnitude(samples: &[i16], freq_hz: f64) -> f64 {
    let w = std::f64::consts::TAU * freq_hz / SAMPLE_RATE as f64;
    let (re, im) = samples
        .iter()
        .enumerate()
        .fold((0.0, 0.0), |(re, im), (n, &s)| {
            let phase = w * n as f64;
            (re + s as f64 * phase.cos(), im - s as f64 * phase.sin())
        });
    2.0 * (re * re + im * im).sqrt() / samples.len() as f64
}

fn second(buffer: &AudioBuffer, index: usize) -> &[i16] {
    &buffer.samples()[index * 44100..(index + 1) * 44100]
}

// ============================================================================
// Instrumental
// ============================================================================

#[test_case(0.5, 22050 ; "half second")]
#[test_case(1.0, 44100 ; "one second")]
#[test_case(2.25, 99225 ; "fractional")]
#[test_case(1.0 / 3.0, 14700 ; "third of a second")]
fn test_instrumental_sample_count(duration: f64, expected: usize) {
    let req = SynthesisRequest::instrumental("", "pop").with_duration(duration);
    assert_eq!(synthesize_instrumental(&req).unwrap().num_samples(), expected);
}

#[test]
fn test_default_lengths() {
    let inst = synthesize_instrumental(&SynthesisRequest::instrumental("", "pop")).unwrap();
    let voc = synthesize_vocals(&SynthesisRequest::vocals("la la", "pop")).unwrap();
    assert_eq!(inst.num_samples(), 30 * 44100);
    assert_eq!(voc.num_samples(), 25 * 44100);
}

#[test_case("pop")]
#[test_case("rock")]
#[test_case("electronic")]
#[test_case("jazz")]
#[test_case("hip-hop")]
fn test_instrumental_peak_bound(genre: &str) {
    let req = SynthesisRequest::instrumental("", genre).with_duration(2.0);
    let buf = synthesize_instrumental(&req).unwrap();
    assert_eq!(buf.peak(), 26213);
}

#[test]
fn test_synthesis_is_deterministic() {
    let req = SynthesisRequest::instrumental("anything", "electronic").with_duration(1.5);
    assert_eq!(
        synthesize_instrumental(&req).unwrap(),
        synthesize_instrumental(&req).unwrap()
    );

    let req = SynthesisRequest::vocals("the same words again", "rock").with_duration(1.5);
    assert_eq!(synthesize_vocals(&req).unwrap(), synthesize_vocals(&req).unwrap());
}

#[test]
fn test_unknown_genre_sounds_like_pop() {
    let pop = SynthesisRequest::instrumental("", "pop").with_duration(1.0);
    let other = SynthesisRequest::instrumental("", "sea shanty").with_duration(1.0);
    let (pop, other) = (synthesize_instrumental(&pop), synthesize_instrumental(&other));
    assert_eq!(pop.unwrap(), other.unwrap());
}

#[test]
fn test_rock_spectrum() {
    // Four one-second chord segments: 165, 208, 247, 165 Hz
    let req = SynthesisRequest::instrumental("", "rock").with_duration(4.0);
    let buf = synthesize_instrumental(&req).unwrap();

    let bass = tone_magnitude(buf.samples(), 55.0);
    let off_bass = tone_magnitude(buf.samples(), 100.0);
    assert!(bass > 10.0 * off_bass, "bass {} vs {}", bass, off_bass);

    let first = second(&buf, 0);
    assert!(tone_magnitude(first, 165.0) > 10.0 * tone_magnitude(first, 100.0));

    let next = second(&buf, 1);
    let root = tone_magnitude(next, 208.0);
    let previous_root = tone_magnitude(next, 165.0);
    assert!(root > 10.0 * previous_root, "208 Hz {} vs 165 Hz {}", root, previous_root);

    let third = second(&buf, 2);
    let root = tone_magnitude(third, 247.0);
    let previous_root = tone_magnitude(third, 208.0);
    assert!(root > 10.0 * previous_root, "247 Hz {} vs 208 Hz {}", root, previous_root);

    let last = second(&buf, 3);
    let root = tone_magnitude(last, 165.0);
    let off = tone_magnitude(last, 100.0);
    assert!(root > 10.0 * off, "165 Hz {} vs 100 Hz {}", root, off);
}

// ============================================================================
// Vocals
// ============================================================================

#[test_case("" ; "empty")]
#[test_case("Verse 1:\nChorus:\nBridge:\nOutro:" ; "only markers")]
#[test_case("  \n " ; "whitespace")]
fn test_vocals_without_words_are_silent(lyrics: &str) {
    let req = SynthesisRequest::vocals(lyrics, "pop").with_duration(1.0);
    let buf = synthesize_vocals(&req).unwrap();
    assert_eq!(buf.num_samples(), 44100);
    assert!(buf.is_silent());
}

#[test]
fn test_vocal_peak_bound() {
    let req = SynthesisRequest::vocals("Verse 1:\nwe sing tonight", "pop").with_duration(2.0);
    let buf = synthesize_vocals(&req).unwrap();
    assert_eq!(buf.peak(), 22936);
}

// ============================================================================
// Mixing
// ============================================================================

#[test]
fn test_full_length_mix() {
    let instrumental =
        synthesize_instrumental(&SynthesisRequest::instrumental("", "pop")).unwrap();
    let vocals =
        synthesize_vocals(&SynthesisRequest::vocals("walking in the sun", "pop")).unwrap();

    let mixed = mix(&instrumental, &vocals).unwrap();
    assert_eq!(mixed.num_samples(), 30 * 44100);

    // Past 25 s only the instrumental remains
    let instrumental_only = Mixer::default()
        .mix(&MixRequest {
            instrumental: Some(instrumental),
            vocals: None,
            genre: "pop".to_string(),
        })
        .unwrap();
    assert_eq!(
        &mixed.samples()[25 * 44100..30 * 44100],
        &instrumental_only.samples()[25 * 44100..30 * 44100]
    );
}

#[test]
fn test_wav_round_trip_is_lossless() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("vocals.wav");

    let req = SynthesisRequest::vocals("one two three", "hip-hop").with_duration(0.5);
    let buf = synthesize_vocals(&req).unwrap();
    write_wav(&buf, &path).unwrap();
    assert_eq!(read_wav(&path).unwrap(), buf);
}
