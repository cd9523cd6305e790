//! Mixer
//!
//! Combines an instrumental and a vocal track into the final song. Each
//! track is peak-normalized on its own, offset by a named gain (the vocal
//! sits 1.5 dB above the instrumental by default), padded with trailing
//! silence to the longer length and overlaid with hard clipping.

use serde::{Deserialize, Serialize};

use crate::engine::buffer::db_to_linear;
use crate::engine::AudioBuffer;
use crate::error::{AuraError, Result};

/// Largest 16-bit magnitude, used as the normalization reference
const MAX_AMPLITUDE: f64 = 32768.0;

/// The two tracks to combine, by role
#[derive(Debug, Clone, Default)]
pub struct MixRequest {
    /// Backing track
    pub instrumental: Option<AudioBuffer>,
    /// Vocal track
    pub vocals: Option<AudioBuffer>,
    /// Genre of the song; reserved for genre-specific mix settings
    pub genre: String,
}

impl MixRequest {
    /// Request with both tracks present
    pub fn new(instrumental: AudioBuffer, vocals: AudioBuffer) -> Self {
        Self {
            instrumental: Some(instrumental),
            vocals: Some(vocals),
            genre: crate::synth::genre::DEFAULT_GENRE.to_string(),
        }
    }

    /// Set the genre
    pub fn with_genre(mut self, genre: impl Into<String>) -> Self {
        self.genre = genre.into();
        self
    }
}

/// Mix levels
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Mixer {
    /// Gain applied to the normalized instrumental, in dB
    pub instrumental_gain_db: f64,
    /// Gain applied to the normalized vocals, in dB
    pub vocal_gain_db: f64,
    /// Distance of the normalized peak below full scale, in dB
    pub headroom_db: f64,
}

impl Default for Mixer {
    fn default() -> Self {
        Self {
            instrumental_gain_db: -3.0,
            vocal_gain_db: -1.5,
            headroom_db: 0.1,
        }
    }
}

impl Mixer {
    /// Mix the request's tracks
    ///
    /// A missing or empty track is treated as silence; the output is as long
    /// as the longer track.
    ///
    /// # Errors
    /// * `InvalidInput` - If neither track has any samples, or a gain is not finite
    pub fn mix(&self, request: &MixRequest) -> Result<AudioBuffer> {
        if ![self.instrumental_gain_db, self.vocal_gain_db, self.headroom_db]
            .iter()
            .all(|v| v.is_finite())
        {
            return Err(AuraError::invalid_input(format!(
                "mixer levels must be finite: {:?}",
                self
            )));
        }

        let tracks: Vec<(&AudioBuffer, f64)> = [
            (request.instrumental.as_ref(), self.instrumental_gain_db),
            (request.vocals.as_ref(), self.vocal_gain_db),
        ]
        .into_iter()
        .filter_map(|(track, gain)| track.filter(|t| !t.is_empty()).map(|t| (t, gain)))
        .collect();

        if tracks.is_empty() {
            return Err(AuraError::invalid_input(
                "mix requires at least one non-empty track",
            ));
        }

        let len = tracks.iter().map(|(t, _)| t.num_samples()).max().unwrap_or(0);
        let mut sum = vec![0i32; len];
        for (track, gain_db) in &tracks {
            let padded = track.padded_to(len);
            for (acc, sample) in sum.iter_mut().zip(self.level(&padded, *gain_db)) {
                *acc += sample;
            }
        }

        tracing::info!(
            genre = %request.genre,
            tracks = tracks.len(),
            duration = len as f64 / crate::engine::SAMPLE_RATE as f64,
            "mixed tracks"
        );

        Ok(AudioBuffer::from_samples(
            sum.into_iter()
                .map(|s| s.clamp(i16::MIN as i32, i16::MAX as i32) as i16)
                .collect(),
        ))
    }

    /// Normalize a track's peak to the headroom, then apply `gain_db`
    fn level(&self, track: &AudioBuffer, gain_db: f64) -> Vec<i32> {
        let peak = track.peak() as f64;
        if peak == 0.0 {
            return vec![0; track.num_samples()];
        }
        let factor = MAX_AMPLITUDE * db_to_linear(-self.headroom_db) / peak * db_to_linear(gain_db);
        track
            .samples()
            .iter()
            .map(|&s| (s as f64 * factor) as i32)
            .collect()
    }
}

/// Mix with the default levels
pub fn mix(instrumental: &AudioBuffer, vocals: &AudioBuffer) -> Result<AudioBuffer> {
    Mixer::default().mix(&MixRequest::new(instrumental.clone(), vocals.clone()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn constant(value: i16, len: usize) -> AudioBuffer {
        AudioBuffer::from_samples(vec![value; len])
    }

    #[test]
    fn test_output_length_is_max() {
        let out = mix(&constant(100, 10), &constant(100, 4)).unwrap();
        assert_eq!(out.num_samples(), 10);

        let out = mix(&constant(100, 3), &constant(100, 8)).unwrap();
        assert_eq!(out.num_samples(), 8);
    }

    #[test]
    fn test_equal_lengths_are_not_padded() {
        let out = mix(&constant(100, 7), &constant(-50, 7)).unwrap();
        assert_eq!(out.num_samples(), 7);
    }

    #[test]
    fn test_vocals_sit_above_instrumental() {
        let request = MixRequest {
            instrumental: Some(constant(1000, 4)),
            vocals: None,
            genre: "pop".to_string(),
        };
        let inst_only = Mixer::default().mix(&request).unwrap();

        let request = MixRequest {
            instrumental: None,
            vocals: Some(constant(1000, 4)),
            genre: "pop".to_string(),
        };
        let vocal_only = Mixer::default().mix(&request).unwrap();

        // 32768 * 10^(-0.1/20) * 10^(-3/20) and 10^(-1.5/20)
        assert_eq!(inst_only.samples()[0], 22932);
        assert_eq!(vocal_only.samples()[0], 27255);
        assert!(vocal_only.peak() > inst_only.peak());
    }

    #[test]
    fn test_shorter_track_padded_with_silence() {
        let out = mix(&constant(1000, 2), &constant(1000, 5)).unwrap();
        assert_eq!(&out.samples()[..2], &[i16::MAX, i16::MAX]);
        assert_eq!(&out.samples()[2..], &[27255, 27255, 27255]);
    }

    #[test]
    fn test_overlay_clips() {
        let out = mix(&constant(i16::MAX, 4), &constant(i16::MAX, 4)).unwrap();
        assert!(out.samples().iter().all(|&s| s == i16::MAX));

        let out = mix(&constant(i16::MIN, 4), &constant(-5, 4)).unwrap();
        assert!(out.samples().iter().all(|&s| s == i16::MIN));
    }

    #[test]
    fn test_silent_track_stays_silent() {
        let out = mix(&constant(0, 5), &constant(0, 5)).unwrap();
        assert!(out.is_silent());
    }

    #[test]
    fn test_missing_tracks_rejected() {
        let err = Mixer::default().mix(&MixRequest::default()).unwrap_err();
        assert_eq!(err.error_code(), "INVALID_INPUT");

        let err = mix(&AudioBuffer::from_samples(vec![]), &AudioBuffer::from_samples(vec![]))
            .unwrap_err();
        assert_eq!(err.error_code(), "INVALID_INPUT");
    }

    #[test]
    fn test_non_finite_levels_rejected() {
        let mixer = Mixer {
            vocal_gain_db: f64::NAN,
            ..Mixer::default()
        };
        let request = MixRequest::new(constant(1, 2), constant(1, 2));
        assert!(mixer.mix(&request).is_err());
    }
}
