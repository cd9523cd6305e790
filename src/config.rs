//! Runtime configuration
//!
//! `Settings` is built once at startup, from the environment or a JSON
//! file, and handed to the provider constructors. Synthesis itself takes
//! no configuration.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{AuraError, Result};
use crate::synth::{DEFAULT_INSTRUMENTAL_SECS, DEFAULT_VOCAL_SECS, MAX_SYNTHESIS_SECS};

/// Prefix shared by all environment variables
pub const ENV_PREFIX: &str = "AURALYNX_";

/// Token variable also honoured without the prefix
pub const HUGGINGFACE_TOKEN_VAR: &str = "HUGGINGFACE_API_TOKEN";

/// Service configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Where generated WAV files are written
    pub temp_audio_dir: PathBuf,
    /// JSON file backing the song store
    pub songs_path: PathBuf,
    /// Bearer token for the Hugging Face inference router
    pub huggingface_api_token: Option<String>,
    /// Inference router base URL; the model name is appended
    pub huggingface_base_url: String,
    /// Text generation model used for lyrics
    pub lyrics_model: String,
    /// Speech recognition model
    pub transcription_model: String,
    /// Base URL of the external music generation bridge, if any
    pub music_bridge_url: Option<String>,
    /// Timeout for Hugging Face requests
    pub request_timeout_ms: u64,
    /// Timeout for bridge generation requests
    pub bridge_timeout_ms: u64,
    /// Length of synthesized instrumentals
    pub instrumental_duration_secs: f64,
    /// Length of synthesized vocal tracks
    pub vocal_duration_secs: f64,
    /// Largest audio file accepted for transcription
    pub max_audio_size_mb: u64,
}

impl Default for Settings {
    fn default() -> Self {
        let base = std::env::temp_dir().join("auralynx");
        Self {
            temp_audio_dir: base.join("audio"),
            songs_path: base.join("songs.json"),
            huggingface_api_token: None,
            huggingface_base_url: "https://router.huggingface.co/hf-inference/models".to_string(),
            lyrics_model: "gpt2-large".to_string(),
            transcription_model: "openai/whisper-base".to_string(),
            music_bridge_url: None,
            request_timeout_ms: 20_000,
            bridge_timeout_ms: 300_000,
            instrumental_duration_secs: DEFAULT_INSTRUMENTAL_SECS,
            vocal_duration_secs: DEFAULT_VOCAL_SECS,
            max_audio_size_mb: 100,
        }
    }
}

impl Settings {
    /// Load from `AURALYNX_*` environment variables over the defaults
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load from a map of variables (same keys as [`from_env`](Self::from_env))
    pub fn from_vars(vars: &HashMap<String, String>) -> Result<Self> {
        Self::from_lookup(|key| vars.get(key).cloned())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let var = |name: &str| {
            lookup(&format!("{}{}", ENV_PREFIX, name)).filter(|v| !v.trim().is_empty())
        };
        let mut settings = Self::default();

        if let Some(v) = var("TEMP_AUDIO_DIR") {
            settings.temp_audio_dir = PathBuf::from(v);
        }
        if let Some(v) = var("SONGS_PATH") {
            settings.songs_path = PathBuf::from(v);
        }
        settings.huggingface_api_token = var(HUGGINGFACE_TOKEN_VAR)
            .or_else(|| lookup(HUGGINGFACE_TOKEN_VAR).filter(|v| !v.trim().is_empty()));
        if let Some(v) = var("HUGGINGFACE_BASE_URL") {
            settings.huggingface_base_url = v;
        }
        if let Some(v) = var("LYRICS_MODEL") {
            settings.lyrics_model = v;
        }
        if let Some(v) = var("TRANSCRIPTION_MODEL") {
            settings.transcription_model = v;
        }
        settings.music_bridge_url = var("MUSIC_BRIDGE_URL");
        if let Some(v) = var("REQUEST_TIMEOUT_MS") {
            settings.request_timeout_ms = parse_var("REQUEST_TIMEOUT_MS", &v)?;
        }
        if let Some(v) = var("BRIDGE_TIMEOUT_MS") {
            settings.bridge_timeout_ms = parse_var("BRIDGE_TIMEOUT_MS", &v)?;
        }
        if let Some(v) = var("INSTRUMENTAL_SECS") {
            settings.instrumental_duration_secs = parse_var("INSTRUMENTAL_SECS", &v)?;
        }
        if let Some(v) = var("VOCAL_SECS") {
            settings.vocal_duration_secs = parse_var("VOCAL_SECS", &v)?;
        }
        if let Some(v) = var("MAX_AUDIO_SIZE_MB") {
            settings.max_audio_size_mb = parse_var("MAX_AUDIO_SIZE_MB", &v)?;
        }

        settings.validate()?;
        Ok(settings)
    }

    /// Load from a JSON file; missing keys take their defaults
    pub fn from_json_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(AuraError::FileNotFound {
                path: path.display().to_string(),
            });
        }
        let content = fs::read_to_string(path)?;
        let settings: Settings = serde_json::from_str(&content)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Check durations, timeouts and limits
    ///
    /// # Errors
    /// * `Config` - On the first invalid value
    pub fn validate(&self) -> Result<()> {
        for (name, secs) in [
            ("instrumental_duration_secs", self.instrumental_duration_secs),
            ("vocal_duration_secs", self.vocal_duration_secs),
        ] {
            if !secs.is_finite() || secs <= 0.0 || secs > MAX_SYNTHESIS_SECS {
                return Err(AuraError::Config {
                    reason: format!(
                        "{} must be in (0, {}], got {}",
                        name, MAX_SYNTHESIS_SECS, secs
                    ),
                });
            }
        }
        for (name, value) in [
            ("request_timeout_ms", self.request_timeout_ms),
            ("bridge_timeout_ms", self.bridge_timeout_ms),
            ("max_audio_size_mb", self.max_audio_size_mb),
        ] {
            if value == 0 {
                return Err(AuraError::Config {
                    reason: format!("{} must be positive", name),
                });
            }
        }
        if self.max_audio_size_mb.checked_mul(1024 * 1024).is_none() {
            return Err(AuraError::Config {
                reason: format!(
                    "max_audio_size_mb {} does not fit in bytes",
                    self.max_audio_size_mb
                ),
            });
        }
        if self.huggingface_base_url.trim().is_empty() {
            return Err(AuraError::Config {
                reason: "huggingface_base_url is empty".to_string(),
            });
        }
        Ok(())
    }

    /// Create the audio directory and the store's parent directory
    pub fn ensure_dirs(&self) -> Result<()> {
        fs::create_dir_all(&self.temp_audio_dir)?;
        if let Some(parent) = self.songs_path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        Ok(())
    }

    /// Transcription size limit in bytes
    pub fn max_audio_size_bytes(&self) -> u64 {
        self.max_audio_size_mb.saturating_mul(1024 * 1024)
    }
}

fn parse_var<T: FromStr>(name: &str, value: &str) -> Result<T>
where
    T::Err: std::fmt::Display,
{
    value.trim().parse().map_err(|e: T::Err| AuraError::Config {
        reason: format!("{}{} = {:?}: {}", ENV_PREFIX, name, value, e),
    })
}
