//! Synthetic providers
//!
//! The offline synthesizers exposed as providers. They never touch the
//! network and are always available, so they close the instrumental and
//! vocal chains.

use super::provider::{
    GeneratedAudio, InstrumentalGenerator, Provider, ProviderInfo, VocalGenerator,
};
use crate::config::Settings;
use crate::error::Result;
use crate::synth::{
    synthesize_instrumental, synthesize_vocals, SynthesisRequest, DEFAULT_INSTRUMENTAL_SECS,
    DEFAULT_VOCAL_SECS,
};

/// Instrumental rendered by the built-in synthesizer
pub struct SyntheticInstrumental {
    info: ProviderInfo,
    duration_secs: f64,
}

impl SyntheticInstrumental {
    pub fn new(duration_secs: f64) -> Self {
        Self {
            info: ProviderInfo::new(
                "synthetic-instrumental",
                "Synthetic Instrumental",
                "Bass, kick pulse and chord progression from the genre table",
                &["instrumental"],
                false,
            ),
            duration_secs,
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(settings.instrumental_duration_secs)
    }

    pub fn duration_secs(&self) -> f64 {
        self.duration_secs
    }
}

impl Default for SyntheticInstrumental {
    fn default() -> Self {
        Self::new(DEFAULT_INSTRUMENTAL_SECS)
    }
}

impl Provider for SyntheticInstrumental {
    fn info(&self) -> &ProviderInfo {
        &self.info
    }
}

impl InstrumentalGenerator for SyntheticInstrumental {
    fn generate_instrumental(&self, lyrics: &str, genre: &str) -> Result<GeneratedAudio> {
        let request =
            SynthesisRequest::instrumental(lyrics, genre).with_duration(self.duration_secs);
        synthesize_instrumental(&request).map(GeneratedAudio::from_buffer)
    }
}

/// Vocal melody rendered by the built-in synthesizer
pub struct SyntheticVocals {
    info: ProviderInfo,
    duration_secs: f64,
}

impl SyntheticVocals {
    pub fn new(duration_secs: f64) -> Self {
        Self {
            info: ProviderInfo::new(
                "synthetic-vocals",
                "Synthetic Vocals",
                "One harmonic note per lyric word over the genre scale",
                &["vocals"],
                false,
            ),
            duration_secs,
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(settings.vocal_duration_secs)
    }

    pub fn duration_secs(&self) -> f64 {
        self.duration_secs
    }
}

impl Default for SyntheticVocals {
    fn default() -> Self {
        Self::new(DEFAULT_VOCAL_SECS)
    }
}

impl Provider for SyntheticVocals {
    fn info(&self) -> &ProviderInfo {
        &self.info
    }
}

impl VocalGenerator for SyntheticVocals {
    fn generate_vocals(&self, lyrics: &str, genre: &str) -> Result<GeneratedAudio> {
        let request = SynthesisRequest::vocals(lyrics, genre).with_duration(self.duration_secs);
        synthesize_vocals(&request).map(GeneratedAudio::from_buffer)
    }
}
