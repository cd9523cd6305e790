//! Audio Buffer
//!
//! The PCM buffer handed between synthesizers, providers and the mixer.
//! All audio is mono 16-bit at 44.1kHz.

// ============================================================================
// Constants
// ============================================================================

/// Sample rate of every buffer produced or consumed by the core (44.1kHz)
pub const SAMPLE_RATE: u32 = 44100;

/// Channel count of every buffer (mono)
pub const CHANNELS: u16 = 1;

/// Full-scale value of a signed 16-bit sample
pub const I16_FULL_SCALE: f64 = 32767.0;

// ============================================================================
// Helper Functions
// ============================================================================

/// Number of samples covering `duration_secs` at [`SAMPLE_RATE`]
///
/// Rounds to the nearest sample so that durations which are not exactly
/// representable in binary (e.g. `2.3`) still land on the expected count.
#[inline]
pub fn samples_for_duration(duration_secs: f64) -> usize {
    (duration_secs * SAMPLE_RATE as f64).round().max(0.0) as usize
}

/// Convert decibels to linear amplitude
#[inline]
pub fn db_to_linear(db: f64) -> f64 {
    10.0_f64.powf(db / 20.0)
}

// ============================================================================
// AudioBuffer
// ============================================================================

/// Mono 16-bit PCM buffer at 44.1kHz
///
/// Once constructed the samples are never mutated; stages that transform
/// audio build a new buffer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AudioBuffer {
    samples: Vec<i16>,
}

impl AudioBuffer {
    /// Wrap existing samples
    pub fn from_samples(samples: Vec<i16>) -> Self {
        Self { samples }
    }

    /// Sample rate in Hz
    pub fn sample_rate(&self) -> u32 {
        SAMPLE_RATE
    }

    /// Number of channels
    pub fn channels(&self) -> u16 {
        CHANNELS
    }

    /// Number of samples
    pub fn num_samples(&self) -> usize {
        self.samples.len()
    }

    /// True when the buffer holds no samples
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Duration in seconds
    pub fn duration_secs(&self) -> f64 {
        self.samples.len() as f64 / SAMPLE_RATE as f64
    }

    /// Borrow the samples
    pub fn samples(&self) -> &[i16] {
        &self.samples
    }

    /// Largest absolute sample value
    pub fn peak(&self) -> u16 {
        self.samples
            .iter()
            .map(|s| s.unsigned_abs())
            .max()
            .unwrap_or(0)
    }

    /// True when every sample is zero
    pub fn is_silent(&self) -> bool {
        self.samples.iter().all(|&s| s == 0)
    }

    /// Copy of this buffer extended with trailing silence up to `len` samples
    ///
    /// Buffers already at least `len` long are returned unchanged.
    pub fn padded_to(&self, len: usize) -> Self {
        let mut samples = self.samples.clone();
        if samples.len() < len {
            samples.resize(len, 0);
        }
        Self { samples }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_samples_for_duration() {
        assert_eq!(samples_for_duration(30.0), 1_323_000);
        assert_eq!(samples_for_duration(2.3), 101_430);
        assert_eq!(samples_for_duration(0.0), 0);
    }

    #[test]
    fn test_buffer_shape() {
        let buf = AudioBuffer::from_samples(vec![0; 66150]);
        assert_eq!(buf.duration_secs(), 1.5);
        assert!(buf.is_silent());
        assert_eq!(buf.sample_rate(), 44100);
        assert_eq!(buf.channels(), 1);
    }

    #[test]
    fn test_padding() {
        let buf = AudioBuffer::from_samples(vec![1, -2, 3]);
        let padded = buf.padded_to(5);
        assert_eq!(padded.samples(), &[1, -2, 3, 0, 0]);
        assert_eq!(buf.padded_to(2), buf);
    }

    #[test]
    fn test_peak_handles_min_value() {
        let buf = AudioBuffer::from_samples(vec![0, i16::MIN, 100]);
        assert_eq!(buf.peak(), 32768);
    }
}
