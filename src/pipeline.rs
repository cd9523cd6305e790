//! Song generation pipeline
//!
//! Wires the provider chains to the temp audio directory:
//!
//! ```text
//! theme ──► lyrics ──┬──► instrumental ──┐
//!                    └──► vocals ────────┴──► mix
//! ```
//!
//! Every produced track is written as a uniquely named WAV and described by
//! a [`TrackArtifact`].

use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::config::Settings;
use crate::engine::{file_sha256, read_wav, write_wav, AudioBuffer, TempAudioDir};
use crate::error::{AuraError, Result};
use crate::mixer::{MixRequest, Mixer};
use crate::providers::{
    ChainOutcome, GeneratedAudio, HuggingFaceLyrics, HuggingFaceTranscriber,
    InstrumentalGenerator, LyricsGenerator, MusicBridge, ProviderChain, SyntheticInstrumental,
    SyntheticVocals, TemplateLyrics, Transcriber, VocalGenerator,
};
use crate::synth::genre::DEFAULT_GENRE;
use crate::synth::{DEFAULT_INSTRUMENTAL_SECS, DEFAULT_VOCAL_SECS};

/// Provider name recorded for mixed tracks
pub const MIXER_PROVIDER: &str = "mixer";

/// A WAV file produced by the pipeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackArtifact {
    /// Location of the file in the temp audio directory
    pub path: PathBuf,
    /// Track length in seconds
    pub duration_secs: f64,
    /// ID of the provider that produced the audio
    pub provider: String,
    /// Hex SHA-256 of the file contents
    pub sha256: String,
}

impl TrackArtifact {
    /// File name, used as the public URL tail
    pub fn file_name(&self) -> Option<&str> {
        self.path.file_name().and_then(|n| n.to_str())
    }
}

/// Everything produced by [`SongPipeline::generate_song`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SongOutcome {
    pub genre: String,
    pub lyrics: String,
    pub lyrics_provider: String,
    pub instrumental: TrackArtifact,
    pub vocals: TrackArtifact,
    pub mix: TrackArtifact,
}

/// Resolve an empty genre to the default
fn genre_or_default(genre: &str) -> &str {
    let genre = genre.trim();
    if genre.is_empty() {
        DEFAULT_GENRE
    } else {
        genre
    }
}

// =============================================================================
// Pipeline
// =============================================================================

/// Provider chains plus the directory their output lands in
pub struct SongPipeline {
    temp: TempAudioDir,
    transcribers: ProviderChain<dyn Transcriber>,
    lyricists: ProviderChain<dyn LyricsGenerator>,
    instrumentals: ProviderChain<dyn InstrumentalGenerator>,
    vocalists: ProviderChain<dyn VocalGenerator>,
    mixer: Mixer,
}

impl SongPipeline {
    /// Start assembling a pipeline that writes into `temp`
    pub fn builder(temp: TempAudioDir) -> SongPipelineBuilder {
        SongPipelineBuilder::new(temp)
    }

    /// Pipeline with every provider the settings enable
    ///
    /// Order per chain: remote providers that are configured, then the
    /// offline fallback.
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        settings.validate()?;
        let temp = TempAudioDir::open(&settings.temp_audio_dir)?;

        let mut builder = Self::builder(temp)
            .durations(
                settings.instrumental_duration_secs,
                settings.vocal_duration_secs,
            )
            .transcriber(Arc::new(HuggingFaceTranscriber::new(settings)))
            .lyricist(Arc::new(HuggingFaceLyrics::new(settings)));

        if let Some(bridge) = MusicBridge::from_settings(settings) {
            let bridge = Arc::new(bridge);
            builder = builder.instrumental(bridge.clone()).vocalist(bridge);
        }

        let pipeline = builder.build();
        tracing::info!(
            temp_dir = %pipeline.temp.root().display(),
            lyrics = ?pipeline.lyricists.ids(),
            instrumental = ?pipeline.instrumentals.ids(),
            vocals = ?pipeline.vocalists.ids(),
            "song pipeline ready"
        );
        Ok(pipeline)
    }

    /// Directory the pipeline writes into
    pub fn temp_dir(&self) -> &TempAudioDir {
        &self.temp
    }

    /// Mixer levels in use
    pub fn mixer(&self) -> &Mixer {
        &self.mixer
    }

    /// Transcribe an audio file to text
    ///
    /// # Errors
    /// * `FileNotFound` - If `audio_path` does not exist
    /// * `AllProvidersFailed` - If no transcriber succeeded
    pub fn transcribe(&self, audio_path: &Path) -> Result<ChainOutcome<String>> {
        if !audio_path.exists() {
            return Err(AuraError::FileNotFound {
                path: audio_path.display().to_string(),
            });
        }
        self.transcribers.run(|p| p.transcribe(audio_path))
    }

    /// Write lyrics about `input_text`
    ///
    /// # Errors
    /// * `InvalidInput` - If `input_text` is blank
    pub fn generate_lyrics(&self, input_text: &str, genre: &str) -> Result<ChainOutcome<String>> {
        let input_text = input_text.trim();
        if input_text.is_empty() {
            return Err(AuraError::invalid_input("input text is required"));
        }
        let genre = genre_or_default(genre);
        self.lyricists.run(|p| p.generate_lyrics(input_text, genre))
    }

    /// Produce and store an instrumental track
    pub fn generate_instrumental(&self, lyrics: &str, genre: &str) -> Result<TrackArtifact> {
        let (audio, provider) = self.render_instrumental(lyrics, genre_or_default(genre))?;
        self.store_track("instrumental", &audio, provider)
    }

    /// Produce and store a vocal track
    pub fn generate_vocals(&self, lyrics: &str, genre: &str) -> Result<TrackArtifact> {
        let (audio, provider) = self.render_vocals(lyrics, genre_or_default(genre))?;
        self.store_track("vocals", &audio, provider)
    }

    /// Mix two WAV files into a new track
    ///
    /// # Errors
    /// * `FileNotFound` - If either file does not exist
    /// * `InvalidInput` - If both files are empty
    pub fn mix_files(
        &self,
        instrumental: &Path,
        vocals: &Path,
        genre: &str,
    ) -> Result<TrackArtifact> {
        let request = MixRequest {
            instrumental: Some(read_wav(instrumental)?),
            vocals: Some(read_wav(vocals)?),
            genre: genre_or_default(genre).to_string(),
        };
        self.mix_buffers(&request)
    }

    /// Mix in-memory tracks into a new track
    pub fn mix_buffers(&self, request: &MixRequest) -> Result<TrackArtifact> {
        let mixed = self.mixer.mix(request)?;
        let audio = GeneratedAudio::from_buffer(mixed);
        self.store_track("mixed", &audio, MIXER_PROVIDER.to_string())
    }

    /// Full run: lyrics, instrumental, vocals, mix
    pub fn generate_song(&self, input_text: &str, genre: &str) -> Result<SongOutcome> {
        let genre = genre_or_default(genre);
        tracing::info!(genre, "generating song");

        let lyrics = self.generate_lyrics(input_text, genre)?;

        let (instrumental_audio, instrumental_provider) =
            self.render_instrumental(&lyrics.value, genre)?;
        let instrumental =
            self.store_track("instrumental", &instrumental_audio, instrumental_provider)?;

        let (vocal_audio, vocal_provider) = self.render_vocals(&lyrics.value, genre)?;
        let vocals = self.store_track("vocals", &vocal_audio, vocal_provider)?;

        let request = MixRequest {
            instrumental: Some(instrumental_audio.buffer),
            vocals: Some(vocal_audio.buffer),
            genre: genre.to_string(),
        };
        let mix = self.mix_buffers(&request)?;

        tracing::info!(
            genre,
            lyrics_provider = %lyrics.provider,
            mix = %mix.path.display(),
            duration = mix.duration_secs,
            "song generated"
        );

        Ok(SongOutcome {
            genre: genre.to_string(),
            lyrics: lyrics.value,
            lyrics_provider: lyrics.provider,
            instrumental,
            vocals,
            mix,
        })
    }

    fn render_instrumental(&self, lyrics: &str, genre: &str) -> Result<(GeneratedAudio, String)> {
        let outcome = self
            .instrumentals
            .run(|p| p.generate_instrumental(lyrics, genre))?;
        Ok((outcome.value, outcome.provider))
    }

    fn render_vocals(&self, lyrics: &str, genre: &str) -> Result<(GeneratedAudio, String)> {
        let outcome = self.vocalists.run(|p| p.generate_vocals(lyrics, genre))?;
        Ok((outcome.value, outcome.provider))
    }

    /// Write `audio` as `<prefix>_<uuid>.wav` and describe it
    fn store_track(
        &self,
        prefix: &str,
        audio: &GeneratedAudio,
        provider: String,
    ) -> Result<TrackArtifact> {
        let path = self.temp.allocate(prefix);
        write_wav(&audio.buffer, &path)?;
        let sha256 = file_sha256(&path)?;

        tracing::info!(
            track = prefix,
            provider = %provider,
            path = %path.display(),
            duration = audio.duration_secs,
            "track written"
        );

        Ok(TrackArtifact {
            path,
            duration_secs: audio.duration_secs,
            provider,
            sha256,
        })
    }
}

// =============================================================================
// Builder
// =============================================================================

/// Assembles a [`SongPipeline`]
///
/// Providers are tried in the order they are added. Unless
/// [`without_fallbacks`](Self::without_fallbacks) is called, `build` appends
/// the offline providers to the end of each generation chain.
pub struct SongPipelineBuilder {
    temp: TempAudioDir,
    transcribers: ProviderChain<dyn Transcriber>,
    lyricists: ProviderChain<dyn LyricsGenerator>,
    instrumentals: ProviderChain<dyn InstrumentalGenerator>,
    vocalists: ProviderChain<dyn VocalGenerator>,
    mixer: Mixer,
    instrumental_secs: f64,
    vocal_secs: f64,
    fallbacks: bool,
}

impl SongPipelineBuilder {
    fn new(temp: TempAudioDir) -> Self {
        Self {
            temp,
            transcribers: ProviderChain::new("transcription"),
            lyricists: ProviderChain::new("lyrics"),
            instrumentals: ProviderChain::new("instrumental"),
            vocalists: ProviderChain::new("vocals"),
            mixer: Mixer::default(),
            instrumental_secs: DEFAULT_INSTRUMENTAL_SECS,
            vocal_secs: DEFAULT_VOCAL_SECS,
            fallbacks: true,
        }
    }

    pub fn transcriber(mut self, provider: Arc<dyn Transcriber>) -> Self {
        self.transcribers.push(provider);
        self
    }

    pub fn lyricist(mut self, provider: Arc<dyn LyricsGenerator>) -> Self {
        self.lyricists.push(provider);
        self
    }

    pub fn instrumental(mut self, provider: Arc<dyn InstrumentalGenerator>) -> Self {
        self.instrumentals.push(provider);
        self
    }

    pub fn vocalist(mut self, provider: Arc<dyn VocalGenerator>) -> Self {
        self.vocalists.push(provider);
        self
    }

    pub fn mixer(mut self, mixer: Mixer) -> Self {
        self.mixer = mixer;
        self
    }

    /// Lengths used by the offline synthesizers
    pub fn durations(mut self, instrumental_secs: f64, vocal_secs: f64) -> Self {
        self.instrumental_secs = instrumental_secs;
        self.vocal_secs = vocal_secs;
        self
    }

    /// Do not append the offline providers
    pub fn without_fallbacks(mut self) -> Self {
        self.fallbacks = false;
        self
    }

    pub fn build(mut self) -> SongPipeline {
        if self.fallbacks {
            self.lyricists.push(Arc::new(TemplateLyrics::new()));
            self.instrumentals
                .push(Arc::new(SyntheticInstrumental::new(self.instrumental_secs)));
            self.vocalists
                .push(Arc::new(SyntheticVocals::new(self.vocal_secs)));
        }

        SongPipeline {
            temp: self.temp,
            transcribers: self.transcribers,
            lyricists: self.lyricists,
            instrumentals: self.instrumentals,
            vocalists: self.vocalists,
            mixer: self.mixer,
        }
    }
}

/// Read a stored track back, for callers that only hold the artifact
pub fn load_track(artifact: &TrackArtifact) -> Result<AudioBuffer> {
    read_wav(&artifact.path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::mock::{MockInstrumental, MockLyrics, MockTranscriber, MockVocals};
    use pretty_assertions::assert_eq;

    fn offline(dir: &Path) -> SongPipeline {
        SongPipeline::builder(TempAudioDir::open(dir).unwrap())
            .durations(1.0, 0.5)
            .build()
    }

    #[test]
    fn test_blank_input_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let err = offline(dir.path()).generate_lyrics("  ", "pop").unwrap_err();
        assert_eq!(err.error_code(), "INVALID_INPUT");
    }

    #[test]
    fn test_template_closes_lyrics_chain() {
        let dir = tempfile::tempdir().unwrap();
        let pipeline = SongPipeline::builder(TempAudioDir::open(dir.path()).unwrap())
            .lyricist(Arc::new(MockLyrics::failing("remote")))
            .build();

        let outcome = pipeline.generate_lyrics("ocean", "").unwrap();
        assert_eq!(outcome.provider, "template-lyrics");
        assert_eq!(outcome.failures.len(), 1);
        assert!(outcome.value.contains("Like a pop melody"));
    }

    #[test]
    fn test_instrumental_artifact() {
        let dir = tempfile::tempdir().unwrap();
        let artifact = offline(dir.path())
            .generate_instrumental("hello", "rock")
            .unwrap();

        assert_eq!(artifact.provider, "synthetic-instrumental");
        assert_eq!(artifact.duration_secs, 1.0);
        assert!(artifact.file_name().unwrap().starts_with("instrumental_"));
        assert_eq!(artifact.sha256, file_sha256(&artifact.path).unwrap());
        assert_eq!(load_track(&artifact).unwrap().num_samples(), 44100);
    }

    #[test]
    fn test_mock_provider_preferred() {
        let dir = tempfile::tempdir().unwrap();
        let mock = Arc::new(MockVocals::returning(
            "studio",
            AudioBuffer::from_samples(vec![100; 10]),
        ));
        let pipeline = SongPipeline::builder(TempAudioDir::open(dir.path()).unwrap())
            .vocalist(mock.clone())
            .build();

        let artifact = pipeline.generate_vocals("la", "pop").unwrap();
        assert_eq!(artifact.provider, "studio");
        assert_eq!(mock.calls(), 1);
    }

    #[test]
    fn test_no_fallbacks_fails() {
        let dir = tempfile::tempdir().unwrap();
        let pipeline = SongPipeline::builder(TempAudioDir::open(dir.path()).unwrap())
            .instrumental(Arc::new(MockInstrumental::offline("gpu")))
            .without_fallbacks()
            .build();

        let err = pipeline.generate_instrumental("", "pop").unwrap_err();
        assert_eq!(err.error_code(), "ALL_PROVIDERS_FAILED");
    }

    #[test]
    fn test_transcribe_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let pipeline = SongPipeline::builder(TempAudioDir::open(dir.path()).unwrap())
            .transcriber(Arc::new(MockTranscriber::returning("stt", "hi")))
            .build();

        let err = pipeline
            .transcribe(&dir.path().join("missing.wav"))
            .unwrap_err();
        assert_eq!(err.error_code(), "FILE_NOT_FOUND");
    }

    #[test]
    fn test_song_lengths() {
        let dir = tempfile::tempdir().unwrap();
        let song = offline(dir.path()).generate_song("city lights", "jazz").unwrap();

        assert_eq!(song.genre, "jazz");
        assert_eq!(song.instrumental.duration_secs, 1.0);
        assert_eq!(song.vocals.duration_secs, 0.5);
        assert_eq!(song.mix.duration_secs, 1.0);
        assert_eq!(song.mix.provider, MIXER_PROVIDER);
        assert!(song.mix.file_name().unwrap().starts_with("mixed_"));
    }
}
