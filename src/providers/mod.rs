//! Generation providers
//!
//! Each pipeline stage is served by an ordered [`ProviderChain`]. Remote
//! providers (Hugging Face inference, the music bridge) come first when
//! configured; the offline template lyricist and waveform synthesizers
//! close every chain so a song can always be produced.

pub mod bridge;
pub mod chain;
pub mod huggingface;
pub mod mock;
pub mod provider;
pub mod synthetic;
pub mod template;

pub use bridge::{MusicBridge, TrackKind};
pub use chain::{ChainOutcome, ProviderChain};
pub use huggingface::{HuggingFaceLyrics, HuggingFaceTranscriber};
pub use provider::{
    GeneratedAudio, InstrumentalGenerator, LyricsGenerator, Provider, ProviderInfo, Transcriber,
    VocalGenerator,
};
pub use synthetic::{SyntheticInstrumental, SyntheticVocals};
pub use template::TemplateLyrics;
