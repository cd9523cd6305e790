//! Mock providers for testing
//!
//! Scripted stand-ins for every capability: each mock either returns a
//! fixed value, fails with a `ProviderFailed` error, or reports itself
//! unavailable. Invocations are counted so tests can check which links of
//! a chain actually ran.

use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};

use super::provider::{
    GeneratedAudio, InstrumentalGenerator, LyricsGenerator, Provider, ProviderInfo, Transcriber,
    VocalGenerator,
};
use crate::engine::AudioBuffer;
use crate::error::{AuraError, Result};

/// What a mock does when invoked
#[derive(Debug, Clone, PartialEq)]
pub enum MockBehavior<T> {
    /// Return a clone of the value
    Succeed(T),
    /// Fail with the given reason
    Fail(String),
    /// Report `is_available() == false`
    Unavailable,
}

/// State shared by all mocks
struct MockCore<T> {
    info: ProviderInfo,
    behavior: MockBehavior<T>,
    calls: AtomicUsize,
}

impl<T: Clone> MockCore<T> {
    fn new(id: &str, capability: &str, behavior: MockBehavior<T>) -> Self {
        Self {
            info: ProviderInfo::new(
                id,
                &format!("Mock {}", capability),
                &format!("Scripted {} provider (MOCK)", capability),
                &[capability],
                false,
            ),
            behavior,
            calls: AtomicUsize::new(0),
        }
    }

    fn invoke(&self) -> Result<T> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.behavior {
            MockBehavior::Succeed(value) => Ok(value.clone()),
            MockBehavior::Fail(reason) => Err(AuraError::ProviderFailed {
                provider: self.info.id.clone(),
                reason: reason.clone(),
            }),
            MockBehavior::Unavailable => Err(AuraError::ProviderUnavailable {
                provider: self.info.id.clone(),
                reason: "mock is offline".to_string(),
            }),
        }
    }

    fn is_available(&self) -> bool {
        !matches!(self.behavior, MockBehavior::Unavailable)
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

macro_rules! mock_constructors {
    ($name:ident, $capability:literal, $value:ty) => {
        impl $name {
            /// Mock with an explicit behavior
            pub fn with_behavior(id: &str, behavior: MockBehavior<$value>) -> Self {
                Self {
                    core: MockCore::new(id, $capability, behavior),
                }
            }

            /// Mock that always succeeds with `value`
            pub fn returning(id: &str, value: impl Into<$value>) -> Self {
                Self::with_behavior(id, MockBehavior::Succeed(value.into()))
            }

            /// Mock that always fails
            pub fn failing(id: &str) -> Self {
                Self::with_behavior(id, MockBehavior::Fail("scripted failure".to_string()))
            }

            /// Mock that reports itself unavailable
            pub fn offline(id: &str) -> Self {
                Self::with_behavior(id, MockBehavior::Unavailable)
            }

            /// Number of times the capability method was invoked
            pub fn calls(&self) -> usize {
                self.core.calls()
            }
        }

        impl Provider for $name {
            fn info(&self) -> &ProviderInfo {
                &self.core.info
            }

            fn is_available(&self) -> bool {
                self.core.is_available()
            }
        }
    };
}

/// Mock speech-to-text
pub struct MockTranscriber {
    core: MockCore<String>,
}

mock_constructors!(MockTranscriber, "transcription", String);

impl Transcriber for MockTranscriber {
    fn transcribe(&self, _audio_path: &Path) -> Result<String> {
        self.core.invoke()
    }
}

/// Mock lyric writer
pub struct MockLyrics {
    core: MockCore<String>,
}

mock_constructors!(MockLyrics, "lyrics", String);

impl LyricsGenerator for MockLyrics {
    fn generate_lyrics(&self, _prompt: &str, _genre: &str) -> Result<String> {
        self.core.invoke()
    }
}

/// Mock instrumental generator
pub struct MockInstrumental {
    core: MockCore<AudioBuffer>,
}

mock_constructors!(MockInstrumental, "instrumental", AudioBuffer);

impl InstrumentalGenerator for MockInstrumental {
    fn generate_instrumental(&self, _lyrics: &str, _genre: &str) -> Result<GeneratedAudio> {
        self.core.invoke().map(GeneratedAudio::from_buffer)
    }
}

/// Mock vocal generator
pub struct MockVocals {
    core: MockCore<AudioBuffer>,
}

mock_constructors!(MockVocals, "vocals", AudioBuffer);

impl VocalGenerator for MockVocals {
    fn generate_vocals(&self, _lyrics: &str, _genre: &str) -> Result<GeneratedAudio> {
        self.core.invoke().map(GeneratedAudio::from_buffer)
    }
}
