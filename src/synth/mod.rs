//! Offline Waveform Synthesizer
//!
//! Deterministic placeholder audio used whenever no external generation
//! provider is configured or reachable:
//! - Genre parameter table
//! - Envelope shaping and effects
//! - Instrumental backing track (bass, kick pulse, chord progression)
//! - Vocal melody driven by the lyric word count
//!
//! Every function here is pure: identical requests produce identical
//! samples.

pub mod effects;
pub mod envelope;
pub mod genre;
pub mod instrumental;
pub mod vocals;

use serde::{Deserialize, Serialize};

use crate::engine::samples_for_duration;
use crate::error::{AuraError, Result};

pub use effects::{delay_reverb, kernel_reverb, normalize_to_int16, simple_delay_reverb};
pub use envelope::{apply_edge_fade, apply_note_envelope};
pub use genre::{known_genres, profile_for, vocal_profile_for, GenreProfile, VocalProfile};
pub use instrumental::{synthesize_instrumental, synthesize_instrumental_with_profile};
pub use vocals::{count_lyric_words, synthesize_vocals, synthesize_vocals_with_profile};

/// Default length of a synthesized instrumental in seconds
pub const DEFAULT_INSTRUMENTAL_SECS: f64 = 30.0;

/// Default length of a synthesized vocal track in seconds
pub const DEFAULT_VOCAL_SECS: f64 = 25.0;

/// Longest track the synthesizer will render (2 hours)
pub const MAX_SYNTHESIS_SECS: f64 = 7200.0;

/// Input to both synthesizers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SynthesisRequest {
    /// Song lyrics; may be empty
    pub lyrics: String,
    /// Genre name; unknown names use the pop profile
    pub genre: String,
    /// Length of the rendered track
    pub duration_seconds: f64,
}

impl SynthesisRequest {
    /// Request for an instrumental with the default 30 second length
    pub fn instrumental(lyrics: impl Into<String>, genre: impl Into<String>) -> Self {
        Self {
            lyrics: lyrics.into(),
            genre: genre.into(),
            duration_seconds: DEFAULT_INSTRUMENTAL_SECS,
        }
    }

    /// Request for a vocal track with the default 25 second length
    pub fn vocals(lyrics: impl Into<String>, genre: impl Into<String>) -> Self {
        Self {
            lyrics: lyrics.into(),
            genre: genre.into(),
            duration_seconds: DEFAULT_VOCAL_SECS,
        }
    }

    /// Override the duration
    pub fn with_duration(mut self, duration_seconds: f64) -> Self {
        self.duration_seconds = duration_seconds;
        self
    }

    /// Number of samples the rendered track will hold
    pub fn num_samples(&self) -> usize {
        samples_for_duration(self.duration_seconds)
    }

    /// Reject negative, non-finite or excessive durations
    pub fn validate(&self) -> Result<()> {
        if !self.duration_seconds.is_finite() || self.duration_seconds < 0.0 {
            return Err(AuraError::invalid_input(format!(
                "duration must be finite and non-negative, got {}",
                self.duration_seconds
            )));
        }
        if self.duration_seconds > MAX_SYNTHESIS_SECS {
            return Err(AuraError::invalid_input(format!(
                "duration {:.1}s exceeds the {:.0}s maximum",
                self.duration_seconds, MAX_SYNTHESIS_SECS
            )));
        }
        Ok(())
    }
}
