//! Envelope shaping
//!
//! Linear amplitude ramps used to keep segment and track boundaries free of
//! clicks. Both functions work in place on float sample slices at 44.1kHz.

use crate::engine::SAMPLE_RATE;

/// Maximum share of a note taken by its attack ramp
pub const MAX_ATTACK_FRACTION: f64 = 0.2;

/// Maximum share of a note taken by its release ramp
pub const MAX_RELEASE_FRACTION: f64 = 0.3;

/// Whole samples spanned by `seconds`, truncated; negative or NaN counts as zero
#[inline]
fn seconds_to_samples(seconds: f64) -> usize {
    (seconds.max(0.0) * SAMPLE_RATE as f64) as usize
}

/// Value `i` of an inclusive linear ramp from 0 to 1 over `len` points
#[inline]
fn ramp_up(i: usize, len: usize) -> f64 {
    if len > 1 {
        i as f64 / (len - 1) as f64
    } else {
        0.0
    }
}

/// Multiply the first `len` samples by a 0→1 ramp
fn fade_in(samples: &mut [f64], len: usize) {
    for (i, sample) in samples.iter_mut().take(len).enumerate() {
        *sample *= ramp_up(i, len);
    }
}

/// Multiply the last `len` samples by a 1→0 ramp
fn fade_out(samples: &mut [f64], len: usize) {
    let start = samples.len() - len;
    for (i, sample) in samples[start..].iter_mut().enumerate() {
        *sample *= 1.0 - ramp_up(i, len);
    }
}

/// Fade the whole buffer in and out over `fade_seconds` at each edge
///
/// The ramp length is clamped to half the buffer so the two fades never
/// overlap.
pub fn apply_edge_fade(buffer: &mut [f64], fade_seconds: f64) {
    let fade_len = seconds_to_samples(fade_seconds).min(buffer.len() / 2);
    if fade_len == 0 {
        return;
    }
    fade_in(buffer, fade_len);
    fade_out(buffer, fade_len);
}

/// Shape a single note with a linear attack and release
///
/// `attack_seconds` is clamped to 20% and `release_seconds` to 30% of the
/// segment duration. The region between the ramps is left at full level.
pub fn apply_note_envelope(segment: &mut [f64], attack_seconds: f64, release_seconds: f64) {
    let note_seconds = segment.len() as f64 / SAMPLE_RATE as f64;
    let attack = attack_seconds.min(note_seconds * MAX_ATTACK_FRACTION);
    let release = release_seconds.min(note_seconds * MAX_RELEASE_FRACTION);

    let attack_len = seconds_to_samples(attack);
    let release_len = seconds_to_samples(release);

    if attack_len > 0 && segment.len() > attack_len {
        fade_in(segment, attack_len);
    }
    if release_len > 0 && segment.len() > release_len {
        fade_out(segment, release_len);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_edge_fade_ramps() {
        let mut buf = vec![1.0; 44100];
        apply_edge_fade(&mut buf, 0.1);

        assert_eq!(buf[0], 0.0);
        assert_relative_eq!(buf[4409], 1.0);
        assert_relative_eq!(buf[2205], 2205.0 / 4409.0);
        assert_eq!(buf[20000], 1.0);
        assert_relative_eq!(buf[44100 - 4410], 1.0);
        assert_eq!(buf[44099], 0.0);
    }

    #[test]
    fn test_edge_fade_clamps_to_half() {
        let mut buf = vec![1.0; 100];
        apply_edge_fade(&mut buf, 1.0);

        assert_eq!(buf[0], 0.0);
        assert_eq!(buf[99], 0.0);
        assert_relative_eq!(buf[49], 1.0);
        assert_relative_eq!(buf[50], 1.0);
    }

    #[test]
    fn test_edge_fade_empty_and_tiny() {
        let mut empty: Vec<f64> = Vec::new();
        apply_edge_fade(&mut empty, 0.1);

        let mut one = vec![0.5];
        apply_edge_fade(&mut one, 0.1);
        assert_eq!(one, vec![0.5]);
    }

    #[test]
    fn test_note_envelope_long_note() {
        // One second: attack 0.05s (2205 samples), release 0.1s (4410 samples)
        let mut note = vec![1.0; 44100];
        apply_note_envelope(&mut note, 0.05, 0.1);

        assert_eq!(note[0], 0.0);
        assert_relative_eq!(note[2204], 1.0);
        assert_eq!(note[2205], 1.0);
        assert_eq!(note[44100 - 4411], 1.0);
        assert_relative_eq!(note[44100 - 4410], 1.0);
        assert_eq!(note[44099], 0.0);
    }

    #[test]
    fn test_note_envelope_short_note_is_clamped() {
        // 0.1s note: attack limited to 0.02s, release to 0.03s
        let mut note = vec![1.0; 4410];
        apply_note_envelope(&mut note, 0.05, 0.1);

        assert_eq!(note[0], 0.0);
        assert!(note[1..870].iter().all(|&v| v > 0.0 && v < 1.0));
        assert!(note[890..3080].iter().all(|&v| v == 1.0));
        assert!(note[3100..4409].iter().all(|&v| v > 0.0 && v < 1.0));
        assert_eq!(note[4409], 0.0);
    }
}
