//! AuraLynx - Song Generation Backend
//!
//! Turns a theme (typed or transcribed) into a finished song:
//! lyrics, an instrumental, a vocal track and their mix.
//!
//! # Architecture
//!
//! Each stage is served by an ordered chain of providers. Remote model
//! services are tried first when configured; a deterministic waveform
//! synthesizer and a template lyricist close every chain, so generation
//! always yields audio:
//! - `synth`: genre table, envelopes, effects, instrumental and vocal synthesis
//! - `mixer`: level-matched overlay of the two tracks
//! - `providers`: capability traits, remote clients, offline fallbacks
//! - `pipeline`: the stages wired to a temp audio directory
//! - `store`: persisted song records

pub mod cli;
pub mod config;
pub mod engine;
pub mod error;
pub mod mixer;
pub mod pipeline;
pub mod providers;
pub mod store;
pub mod synth;

pub use config::Settings;
pub use error::{AuraError, Result};
pub use mixer::{MixRequest, Mixer};
pub use pipeline::{SongOutcome, SongPipeline, TrackArtifact};
