//! Provider traits and core types
//!
//! Every generation stage is a capability trait on top of a common
//! [`Provider`] base, so remote APIs, the offline synthesizer and test
//! doubles are interchangeable.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::engine::AudioBuffer;
use crate::error::Result;

/// Information about a provider
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderInfo {
    /// Provider identifier (e.g., "huggingface-lyrics", "synthetic-vocals")
    pub id: String,

    /// Human-readable name
    pub name: String,

    /// Description of what the provider does
    pub description: String,

    /// Capabilities list ("transcription", "lyrics", "instrumental", "vocals")
    pub capabilities: Vec<String>,

    /// Whether the provider talks to a remote service
    pub remote: bool,
}

impl ProviderInfo {
    /// Build provider info from string slices
    pub fn new(
        id: &str,
        name: &str,
        description: &str,
        capabilities: &[&str],
        remote: bool,
    ) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            description: description.to_string(),
            capabilities: capabilities.iter().map(|c| c.to_string()).collect(),
            remote,
        }
    }
}

/// Audio returned by an instrumental or vocal provider
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedAudio {
    /// The rendered track
    pub buffer: AudioBuffer,
    /// Duration reported by the provider, in seconds
    pub duration_secs: f64,
}

impl GeneratedAudio {
    /// Wrap a buffer, taking the duration from its length
    pub fn from_buffer(buffer: AudioBuffer) -> Self {
        let duration_secs = buffer.duration_secs();
        Self {
            buffer,
            duration_secs,
        }
    }
}

/// Base trait shared by every provider
pub trait Provider: Send + Sync {
    /// Get provider information
    fn info(&self) -> &ProviderInfo;

    /// Check if the provider is configured and reachable
    fn is_available(&self) -> bool {
        true
    }

    /// Get provider ID (convenience method)
    fn id(&self) -> &str {
        &self.info().id
    }
}

/// Speech-to-text
pub trait Transcriber: Provider {
    /// Transcribe the audio file at `audio_path`
    fn transcribe(&self, audio_path: &Path) -> Result<String>;
}

/// Lyric writing from a theme or prompt
pub trait LyricsGenerator: Provider {
    /// Write lyrics for `prompt` in the style of `genre`
    fn generate_lyrics(&self, prompt: &str, genre: &str) -> Result<String>;
}

/// Backing track generation
pub trait InstrumentalGenerator: Provider {
    /// Produce an instrumental for `lyrics` in `genre`
    fn generate_instrumental(&self, lyrics: &str, genre: &str) -> Result<GeneratedAudio>;
}

/// Sung vocal generation
pub trait VocalGenerator: Provider {
    /// Produce a vocal track singing `lyrics` in `genre`
    fn generate_vocals(&self, lyrics: &str, genre: &str) -> Result<GeneratedAudio>;
}
