//! Music generation bridge
//!
//! HTTP client for an external generation service (a local model server
//! fronting a music or singing-voice model). The bridge writes a WAV file
//! to the path it is given, which is read back into an [`AudioBuffer`].
//!
//! Endpoints:
//! - `GET  {url}/health`
//! - `POST {url}/generate`
//!
//! [`AudioBuffer`]: crate::engine::AudioBuffer

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::provider::{
    GeneratedAudio, InstrumentalGenerator, Provider, ProviderInfo, VocalGenerator,
};
use crate::config::Settings;
use crate::engine::{read_wav, AudioBuffer};
use crate::error::{AuraError, Result};

/// Which track the bridge should produce
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrackKind {
    Instrumental,
    Vocals,
}

impl TrackKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Instrumental => "instrumental",
            Self::Vocals => "vocals",
        }
    }
}

/// Request sent to `/generate`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenerateRequest {
    pub kind: TrackKind,
    pub lyrics: String,
    pub genre: String,
    pub prompt: String,
    pub output_path: String,
    pub duration_seconds: f64,
}

/// Response from `/generate`
#[derive(Debug, Clone, Deserialize)]
#[cfg_attr(not(feature = "remote"), allow(dead_code))]
struct GenerateResponse {
    success: bool,
    output_path: Option<String>,
    #[serde(default)]
    duration_seconds: Option<f64>,
    #[serde(default)]
    error_message: Option<String>,
}

/// Text prompt describing the wanted track
pub fn generation_prompt(kind: TrackKind, lyrics: &str, genre: &str) -> String {
    match kind {
        TrackKind::Instrumental => {
            let first_line = lyrics
                .lines()
                .next()
                .filter(|l| !l.trim().is_empty())
                .unwrap_or("instrumental music");
            format!(
                "A {} song instrumental with {}. High quality studio production.",
                genre,
                first_line.trim().to_lowercase()
            )
        }
        TrackKind::Vocals => format!("Clear {} lead vocals singing the given lyrics.", genre),
    }
}

/// Client for the generation bridge
pub struct MusicBridge {
    info: ProviderInfo,
    url: String,
    #[cfg_attr(not(feature = "remote"), allow(dead_code))]
    timeout_ms: u64,
    output_dir: PathBuf,
    instrumental_secs: f64,
    vocal_secs: f64,
}

impl MusicBridge {
    /// Create a bridge client with explicit configuration
    pub fn new(url: impl Into<String>, timeout_ms: u64, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            info: ProviderInfo::new(
                "music-bridge",
                "Music Bridge",
                "External music and singing-voice generation over HTTP",
                &["instrumental", "vocals"],
                true,
            ),
            url: url.into().trim_end_matches('/').to_string(),
            timeout_ms,
            output_dir: output_dir.into(),
            instrumental_secs: crate::synth::DEFAULT_INSTRUMENTAL_SECS,
            vocal_secs: crate::synth::DEFAULT_VOCAL_SECS,
        }
    }

    /// Bridge configured from settings, or `None` when no URL is set
    pub fn from_settings(settings: &Settings) -> Option<Self> {
        settings.music_bridge_url.as_ref().map(|url| {
            let mut bridge = Self::new(
                url.clone(),
                settings.bridge_timeout_ms,
                settings.temp_audio_dir.clone(),
            );
            bridge.instrumental_secs = settings.instrumental_duration_secs;
            bridge.vocal_secs = settings.vocal_duration_secs;
            bridge
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Build the request for one track
    pub fn build_request(&self, kind: TrackKind, lyrics: &str, genre: &str) -> GenerateRequest {
        let output_path = self.output_dir.join(format!(
            "bridge_{}_{}.wav",
            kind.as_str(),
            uuid::Uuid::new_v4()
        ));
        GenerateRequest {
            kind,
            lyrics: lyrics.to_string(),
            genre: genre.to_string(),
            prompt: generation_prompt(kind, lyrics, genre),
            output_path: output_path.to_string_lossy().to_string(),
            duration_seconds: match kind {
                TrackKind::Instrumental => self.instrumental_secs,
                TrackKind::Vocals => self.vocal_secs,
            },
        }
    }

    fn generate(&self, kind: TrackKind, lyrics: &str, genre: &str) -> Result<GeneratedAudio> {
        let request = self.build_request(kind, lyrics, genre);
        tracing::info!(kind = kind.as_str(), url = %self.url, "requesting track from bridge");

        let response = self.send_request(&request)?;
        if !response.success {
            return Err(AuraError::ProviderFailed {
                provider: self.info.id.clone(),
                reason: response
                    .error_message
                    .unwrap_or_else(|| "unknown bridge error".to_string()),
            });
        }

        let produced = PathBuf::from(response.output_path.unwrap_or(request.output_path));
        let buffer = take_output(&produced)?;

        let duration_secs = response
            .duration_seconds
            .unwrap_or_else(|| buffer.duration_secs());
        Ok(GeneratedAudio {
            buffer,
            duration_secs,
        })
    }

    #[cfg(feature = "remote")]
    fn check_bridge_health(&self) -> bool {
        let client = match reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(5))
            .build()
        {
            Ok(client) => client,
            Err(_) => return false,
        };

        let url = format!("{}/health", self.url);
        match client.get(&url).send() {
            Ok(resp) => resp.status().is_success(),
            Err(_) => false,
        }
    }

    #[cfg(not(feature = "remote"))]
    fn check_bridge_health(&self) -> bool {
        false
    }

    #[cfg(feature = "remote")]
    fn send_request(&self, request: &GenerateRequest) -> Result<GenerateResponse> {
        let provider = self.info.id.clone();
        let client = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_millis(self.timeout_ms))
            .build()
            .map_err(|e| AuraError::ProviderUnavailable {
                provider: provider.clone(),
                reason: e.to_string(),
            })?;

        let url = format!("{}/generate", self.url);
        let response = client.post(&url).json(request).send().map_err(|e| {
            if e.is_timeout() {
                AuraError::ProviderFailed {
                    provider: provider.clone(),
                    reason: format!("timed out after {} ms", self.timeout_ms),
                }
            } else if e.is_connect() {
                AuraError::ProviderUnavailable {
                    provider: provider.clone(),
                    reason: format!("cannot connect to bridge at {}: {}", self.url, e),
                }
            } else {
                AuraError::ProviderFailed {
                    provider: provider.clone(),
                    reason: e.to_string(),
                }
            }
        })?;

        if !response.status().is_success() {
            return Err(AuraError::ProviderFailed {
                provider,
                reason: format!("bridge returned error: {}", response.status()),
            });
        }

        response
            .json::<GenerateResponse>()
            .map_err(|e| AuraError::ProviderFailed {
                provider,
                reason: format!("invalid response from bridge: {}", e),
            })
    }

    #[cfg(not(feature = "remote"))]
    fn send_request(&self, _request: &GenerateRequest) -> Result<GenerateResponse> {
        Err(AuraError::ProviderUnavailable {
            provider: self.info.id.clone(),
            reason: "remote providers not compiled. Build with --features remote".to_string(),
        })
    }
}

/// Read the bridge's file and remove it, whether or not it decoded
fn take_output(path: &Path) -> Result<AudioBuffer> {
    let read = read_wav(path);
    discard(path);
    read
}

fn discard(path: &Path) {
    if let Err(e) = fs::remove_file(path) {
        tracing::warn!(path = %path.display(), error = %e, "could not remove bridge output");
    }
}

impl Provider for MusicBridge {
    fn info(&self) -> &ProviderInfo {
        &self.info
    }

    fn is_available(&self) -> bool {
        self.check_bridge_health()
    }
}

impl InstrumentalGenerator for MusicBridge {
    fn generate_instrumental(&self, lyrics: &str, genre: &str) -> Result<GeneratedAudio> {
        self.generate(TrackKind::Instrumental, lyrics, genre)
    }
}

impl VocalGenerator for MusicBridge {
    fn generate_vocals(&self, lyrics: &str, genre: &str) -> Result<GeneratedAudio> {
        self.generate(TrackKind::Vocals, lyrics, genre)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_instrumental_prompt_uses_first_line() {
        assert_eq!(
            generation_prompt(TrackKind::Instrumental, "Verse 1:\nSun rises", "rock"),
            "A rock song instrumental with verse 1:. High quality studio production."
        );
        assert_eq!(
            generation_prompt(TrackKind::Instrumental, "", "jazz"),
            "A jazz song instrumental with instrumental music. High quality studio production."
        );
    }

    #[test]
    fn test_request_serialization() {
        let bridge = MusicBridge::new("http://localhost:8001/", 1000, "/tmp/out");
        assert_eq!(bridge.url(), "http://localhost:8001");

        let request = bridge.build_request(TrackKind::Vocals, "la la", "pop");
        assert!(request.output_path.starts_with("/tmp/out"));
        assert!(request.output_path.contains("bridge_vocals_"));
        assert_eq!(request.duration_seconds, 25.0);

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["kind"], "vocals");
        assert_eq!(json["genre"], "pop");
    }

    #[test]
    fn test_from_settings_requires_url() {
        assert!(MusicBridge::from_settings(&Settings::default()).is_none());

        let settings = Settings {
            music_bridge_url: Some("http://bridge:9000".to_string()),
            instrumental_duration_secs: 12.0,
            ..Settings::default()
        };
        let bridge = MusicBridge::from_settings(&settings).unwrap();
        let request = bridge.build_request(TrackKind::Instrumental, "", "pop");
        assert_eq!(request.duration_seconds, 12.0);
    }

    #[test]
    fn test_response_parsing() {
        let body = r#"{"success": false, "output_path": null, "error_message": "oom"}"#;
        let response: GenerateResponse = serde_json::from_str(body).unwrap();
        assert!(!response.success);
        assert_eq!(response.error_message.as_deref(), Some("oom"));
        assert_eq!(response.duration_seconds, None);
    }

    #[test]
    fn test_output_removed_after_read() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bridge_vocals.wav");
        crate::engine::write_wav(&AudioBuffer::from_samples(vec![1, 2, 3]), &path).unwrap();

        let buffer = take_output(&path).unwrap();
        assert_eq!(buffer.samples(), &[1, 2, 3]);
        assert!(!path.exists());
    }

    #[test]
    fn test_undecodable_output_still_removed() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bridge_instrumental.wav");
        fs::write(&path, b"not a wav file").unwrap();

        assert!(take_output(&path).is_err());
        assert!(!path.exists());
    }
}
