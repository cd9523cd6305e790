//! CLI Command Implementations
//!
//! Implements the actual logic for each CLI command.

use std::fs;
use std::path::Path;
use std::time::Duration;

use tracing::info;

use crate::config::Settings;
use crate::engine::TempAudioDir;
use crate::error::Result;
use crate::pipeline::{SongPipeline, TrackArtifact};
use crate::store::{JsonSongStore, NewSong, SongStore};
use crate::synth::{known_genres, profile_for, vocal_profile_for};

/// Settings from a JSON file, or from the environment
pub fn load_settings(config: Option<&Path>) -> Result<Settings> {
    let settings = match config {
        Some(path) => Settings::from_json_file(path)?,
        None => Settings::from_env()?,
    };
    settings.ensure_dirs()?;
    Ok(settings)
}

/// Print the genre table.
pub fn genres() -> Result<()> {
    for name in known_genres() {
        let profile = profile_for(name);
        let vocal = vocal_profile_for(name);
        println!(
            "{:<12} {:>3} bpm  bass {:>6.1} Hz  chords {:?}  voice {:.1} Hz",
            profile.name,
            profile.tempo_bpm,
            profile.bass_frequency_hz,
            profile.chord_frequencies_hz,
            vocal.base_frequency_hz
        );
    }
    Ok(())
}

/// Generate an instrumental track.
pub fn instrumental(
    settings: &Settings,
    lyrics: &str,
    genre: &str,
    duration: Option<f64>,
    output: Option<&Path>,
) -> Result<()> {
    let settings = with_durations(settings, duration, None)?;
    info!("Generating {} instrumental", genre);

    let artifact = SongPipeline::from_settings(&settings)?.generate_instrumental(lyrics, genre)?;
    deliver(&artifact, output)
}

/// Generate a vocal track.
pub fn vocals(
    settings: &Settings,
    lyrics: &str,
    genre: &str,
    duration: Option<f64>,
    output: Option<&Path>,
) -> Result<()> {
    let settings = with_durations(settings, None, duration)?;
    info!("Generating {} vocals", genre);

    let artifact = SongPipeline::from_settings(&settings)?.generate_vocals(lyrics, genre)?;
    deliver(&artifact, output)
}

/// Mix two WAV files.
pub fn mix(
    settings: &Settings,
    instrumental: &Path,
    vocals: &Path,
    genre: &str,
    output: Option<&Path>,
) -> Result<()> {
    info!(
        "Mixing {} with {}",
        instrumental.display(),
        vocals.display()
    );

    let artifact = SongPipeline::from_settings(settings)?.mix_files(instrumental, vocals, genre)?;
    deliver(&artifact, output)
}

/// Write lyrics about a theme.
pub fn lyrics(settings: &Settings, input: &str, genre: &str) -> Result<()> {
    let outcome = SongPipeline::from_settings(settings)?.generate_lyrics(input, genre)?;
    info!("Lyrics written by {}", outcome.provider);
    println!("{}", outcome.value);
    Ok(())
}

/// Transcribe an audio file.
pub fn transcribe(settings: &Settings, path: &Path) -> Result<()> {
    let outcome = SongPipeline::from_settings(settings)?.transcribe(path)?;
    info!("Transcribed by {}", outcome.provider);
    println!("{}", outcome.value);
    Ok(())
}

/// Generate a full song, optionally recording it in the store.
pub fn song(
    settings: &Settings,
    input: &str,
    genre: &str,
    title: Option<&str>,
    owner: Option<&str>,
    save: bool,
) -> Result<()> {
    let outcome = SongPipeline::from_settings(settings)?.generate_song(input, genre)?;
    println!("{}", serde_json::to_string_pretty(&outcome)?);

    if save {
        let mut song = NewSong::from_outcome(title.unwrap_or(input.trim()), &outcome);
        if let Some(owner) = owner {
            song = song.with_owner(owner);
        }
        let record = JsonSongStore::open(&settings.songs_path).create(song)?;
        println!("Saved song {} to {}", record.id, settings.songs_path.display());
    }

    Ok(())
}

/// List stored songs.
pub fn songs(settings: &Settings, owner: Option<&str>) -> Result<()> {
    let records = JsonSongStore::open(&settings.songs_path).list(owner)?;
    if records.is_empty() {
        println!("No songs");
        return Ok(());
    }

    for record in records {
        println!(
            "{}  {}  {:<10} {}  {}",
            record.created_at.format("%Y-%m-%d %H:%M"),
            record.id,
            record.genre,
            record.title,
            record.mix_url
        );
    }
    Ok(())
}

/// Delete stale WAV files from the temp directory.
pub fn prune(settings: &Settings, max_age_mins: u64) -> Result<()> {
    let temp = TempAudioDir::open(&settings.temp_audio_dir)?;
    let report = temp.prune(Duration::from_secs(max_age_mins.saturating_mul(60)))?;
    println!(
        "Removed {} files ({} bytes) from {}",
        report.removed,
        report.bytes_freed,
        temp.root().display()
    );
    Ok(())
}

fn with_durations(
    settings: &Settings,
    instrumental_secs: Option<f64>,
    vocal_secs: Option<f64>,
) -> Result<Settings> {
    let mut settings = settings.clone();
    if let Some(secs) = instrumental_secs {
        settings.instrumental_duration_secs = secs;
    }
    if let Some(secs) = vocal_secs {
        settings.vocal_duration_secs = secs;
    }
    settings.validate()?;
    Ok(settings)
}

/// Print the artifact and copy it to `output` when given
fn deliver(artifact: &TrackArtifact, output: Option<&Path>) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(artifact)?);
    if let Some(output) = output {
        fs::copy(&artifact.path, output)?;
        println!("Copied to {}", output.display());
    }
    Ok(())
}
