//! Audio Engine Module
//!
//! Core audio plumbing shared by every stage:
//! - PCM buffer type
//! - WAV file I/O
//! - Temporary audio directory management

pub mod buffer;
pub mod io;
pub mod temp_dir;

pub use buffer::{samples_for_duration, AudioBuffer, CHANNELS, SAMPLE_RATE};
pub use io::{file_sha256, read_wav, write_wav};
pub use temp_dir::{PruneReport, TempAudioDir};
