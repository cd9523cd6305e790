//! Hugging Face inference providers
//!
//! Lyrics via a text generation model and transcription via a speech
//! recognition model, both through the hosted inference router. The HTTP
//! calls compile only with the `remote` feature; without it both providers
//! report themselves unavailable.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::provider::{LyricsGenerator, Provider, ProviderInfo, Transcriber};
use crate::config::Settings;
use crate::error::{AuraError, Result};

#[cfg_attr(not(feature = "remote"), allow(dead_code))]
const MAX_NEW_TOKENS: u32 = 150;
#[cfg_attr(not(feature = "remote"), allow(dead_code))]
const TEMPERATURE: f64 = 0.8;

/// Generations this short are treated as failures
const MIN_GENERATED_CHARS: usize = 20;

/// Text generation request body
#[derive(Debug, Serialize)]
#[cfg_attr(not(feature = "remote"), allow(dead_code))]
struct TextGenerationRequest<'a> {
    inputs: &'a str,
    parameters: GenerationParameters,
}

#[derive(Debug, Serialize)]
#[cfg_attr(not(feature = "remote"), allow(dead_code))]
struct GenerationParameters {
    max_new_tokens: u32,
    temperature: f64,
    return_full_text: bool,
}

/// One element of the text generation response array
#[derive(Debug, Deserialize)]
struct GeneratedText {
    #[serde(default)]
    generated_text: String,
}

/// Speech recognition response body
#[derive(Debug, Deserialize)]
struct TranscriptionResponse {
    text: String,
}

/// Prompt that opens the first verse, so the model continues it
pub fn structured_prompt(theme: &str, genre: &str) -> String {
    format!("Write a {} song about {}:\n\nVerse 1:", genre, theme)
}

/// Accept a text generation response, or explain why it is unusable
fn accept_generation(provider: &str, prompt: &str, body: &str) -> Result<String> {
    let items: Vec<GeneratedText> = serde_json::from_str(body).map_err(|e| {
        AuraError::ProviderFailed {
            provider: provider.to_string(),
            reason: format!("unexpected response: {}", e),
        }
    })?;

    let generated = items
        .first()
        .map(|item| item.generated_text.trim())
        .unwrap_or_default();

    if generated.chars().count() <= MIN_GENERATED_CHARS {
        return Err(AuraError::ProviderFailed {
            provider: provider.to_string(),
            reason: format!("generation too short ({} chars)", generated.chars().count()),
        });
    }

    Ok(format!("{}\n{}", prompt, generated))
}

fn parse_transcription(provider: &str, body: &str) -> Result<String> {
    let response: TranscriptionResponse =
        serde_json::from_str(body).map_err(|e| AuraError::ProviderFailed {
            provider: provider.to_string(),
            reason: format!("unexpected response: {}", e),
        })?;
    Ok(response.text.trim().to_string())
}

/// MIME type sent with an uploaded audio file
pub fn audio_content_type(path: &Path) -> Result<&'static str> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .unwrap_or_default();

    match ext.as_str() {
        "wav" => Ok("audio/wav"),
        "mp3" => Ok("audio/mpeg"),
        "flac" => Ok("audio/flac"),
        "ogg" => Ok("audio/ogg"),
        "m4a" => Ok("audio/mp4"),
        "webm" => Ok("audio/webm"),
        _ => Err(AuraError::UnsupportedFormat { format: ext }),
    }
}

// =============================================================================
// Shared HTTP plumbing
// =============================================================================

/// Endpoint and credentials shared by both providers
#[derive(Debug, Clone)]
#[cfg_attr(not(feature = "remote"), allow(dead_code))]
struct InferenceEndpoint {
    url: String,
    token: Option<String>,
    timeout_ms: u64,
}

impl InferenceEndpoint {
    fn new(settings: &Settings, model: &str) -> Self {
        Self {
            url: format!(
                "{}/{}",
                settings.huggingface_base_url.trim_end_matches('/'),
                model
            ),
            token: settings.huggingface_api_token.clone(),
            timeout_ms: settings.request_timeout_ms,
        }
    }

    fn is_configured(&self) -> bool {
        cfg!(feature = "remote") && self.token.is_some()
    }

    fn token(&self, provider: &str) -> Result<&str> {
        self.token
            .as_deref()
            .ok_or_else(|| AuraError::ProviderUnavailable {
                provider: provider.to_string(),
                reason: "HUGGINGFACE_API_TOKEN is not set".to_string(),
            })
    }

    /// POST and return the response body text
    #[cfg(feature = "remote")]
    fn post(
        &self,
        provider: &str,
        build: impl FnOnce(reqwest::blocking::RequestBuilder) -> reqwest::blocking::RequestBuilder,
    ) -> Result<String> {
        let token = self.token(provider)?;
        let client = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_millis(self.timeout_ms))
            .build()
            .map_err(|e| AuraError::ProviderUnavailable {
                provider: provider.to_string(),
                reason: e.to_string(),
            })?;

        let response = build(client.post(&self.url).bearer_auth(token))
            .send()
            .map_err(|e| {
                if e.is_timeout() {
                    AuraError::ProviderFailed {
                        provider: provider.to_string(),
                        reason: format!("timed out after {} ms", self.timeout_ms),
                    }
                } else if e.is_connect() {
                    AuraError::ProviderUnavailable {
                        provider: provider.to_string(),
                        reason: format!("cannot connect to {}: {}", self.url, e),
                    }
                } else {
                    AuraError::ProviderFailed {
                        provider: provider.to_string(),
                        reason: e.to_string(),
                    }
                }
            })?;

        let status = response.status();
        let body = response.text().map_err(|e| AuraError::ProviderFailed {
            provider: provider.to_string(),
            reason: e.to_string(),
        })?;

        if !status.is_success() {
            return Err(AuraError::ProviderFailed {
                provider: provider.to_string(),
                reason: format!("HTTP {}: {}", status, body.chars().take(200).collect::<String>()),
            });
        }
        Ok(body)
    }
}

#[cfg(not(feature = "remote"))]
fn remote_disabled(provider: &str) -> AuraError {
    AuraError::ProviderUnavailable {
        provider: provider.to_string(),
        reason: "remote providers not compiled. Build with --features remote".to_string(),
    }
}

// =============================================================================
// Lyrics
// =============================================================================

/// Lyrics from a hosted text generation model
pub struct HuggingFaceLyrics {
    info: ProviderInfo,
    endpoint: InferenceEndpoint,
}

impl HuggingFaceLyrics {
    pub fn new(settings: &Settings) -> Self {
        Self {
            info: ProviderInfo::new(
                "huggingface-lyrics",
                "Hugging Face Lyrics",
                &format!("Text generation with {}", settings.lyrics_model),
                &["lyrics"],
                true,
            ),
            endpoint: InferenceEndpoint::new(settings, &settings.lyrics_model),
        }
    }

    /// Full model URL
    pub fn url(&self) -> &str {
        &self.endpoint.url
    }

    #[cfg(feature = "remote")]
    fn request(&self, prompt: &str) -> Result<String> {
        let payload = TextGenerationRequest {
            inputs: prompt,
            parameters: GenerationParameters {
                max_new_tokens: MAX_NEW_TOKENS,
                temperature: TEMPERATURE,
                return_full_text: false,
            },
        };
        self.endpoint.post(&self.info.id, |req| req.json(&payload))
    }

    #[cfg(not(feature = "remote"))]
    fn request(&self, _prompt: &str) -> Result<String> {
        Err(remote_disabled(&self.info.id))
    }
}

impl Provider for HuggingFaceLyrics {
    fn info(&self) -> &ProviderInfo {
        &self.info
    }

    fn is_available(&self) -> bool {
        self.endpoint.is_configured()
    }
}

impl LyricsGenerator for HuggingFaceLyrics {
    fn generate_lyrics(&self, prompt: &str, genre: &str) -> Result<String> {
        self.endpoint.token(&self.info.id)?;
        let prompt = structured_prompt(prompt.trim(), genre.trim());
        tracing::debug!(url = %self.endpoint.url, "requesting lyrics");

        let body = self.request(&prompt)?;
        accept_generation(&self.info.id, &prompt, &body)
    }
}

// =============================================================================
// Transcription
// =============================================================================

/// Speech recognition with a hosted model
pub struct HuggingFaceTranscriber {
    info: ProviderInfo,
    endpoint: InferenceEndpoint,
    max_bytes: u64,
}

impl HuggingFaceTranscriber {
    pub fn new(settings: &Settings) -> Self {
        Self {
            info: ProviderInfo::new(
                "huggingface-transcriber",
                "Hugging Face Transcriber",
                &format!("Speech recognition with {}", settings.transcription_model),
                &["transcription"],
                true,
            ),
            endpoint: InferenceEndpoint::new(settings, &settings.transcription_model),
            max_bytes: settings.max_audio_size_bytes(),
        }
    }

    /// Read the upload, enforcing the size limit
    fn load_audio(&self, audio_path: &Path) -> Result<(Vec<u8>, &'static str)> {
        if !audio_path.exists() {
            return Err(AuraError::FileNotFound {
                path: audio_path.display().to_string(),
            });
        }
        let content_type = audio_content_type(audio_path)?;
        let size = fs::metadata(audio_path)?.len();
        if size > self.max_bytes {
            return Err(AuraError::invalid_input(format!(
                "audio file is {} bytes, limit is {} bytes",
                size, self.max_bytes
            )));
        }
        Ok((fs::read(audio_path)?, content_type))
    }

    #[cfg(feature = "remote")]
    fn request(&self, bytes: Vec<u8>, content_type: &'static str) -> Result<String> {
        self.endpoint.post(&self.info.id, |req| {
            req.header(reqwest::header::CONTENT_TYPE, content_type)
                .body(bytes)
        })
    }

    #[cfg(not(feature = "remote"))]
    fn request(&self, _bytes: Vec<u8>, _content_type: &'static str) -> Result<String> {
        Err(remote_disabled(&self.info.id))
    }
}

impl Provider for HuggingFaceTranscriber {
    fn info(&self) -> &ProviderInfo {
        &self.info
    }

    fn is_available(&self) -> bool {
        self.endpoint.is_configured()
    }
}

impl Transcriber for HuggingFaceTranscriber {
    fn transcribe(&self, audio_path: &Path) -> Result<String> {
        let (bytes, content_type) = self.load_audio(audio_path)?;
        self.endpoint.token(&self.info.id)?;
        tracing::debug!(
            path = %audio_path.display(),
            bytes = bytes.len(),
            "uploading audio for transcription"
        );

        let body = self.request(bytes, content_type)?;
        parse_transcription(&self.info.id, &body)
    }
}
