//! Song storage
//!
//! Generated songs are persisted as [`SongRecord`]s behind the
//! [`SongStore`] trait. Listing is always newest first and can be
//! restricted to one owner.

mod json;
mod memory;

pub use json::JsonSongStore;
pub use memory::MemorySongStore;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{AuraError, Result};
use crate::pipeline::SongOutcome;
use crate::synth::genre::DEFAULT_GENRE;

pub const MAX_TITLE_CHARS: usize = 255;
pub const MAX_GENRE_CHARS: usize = 50;
pub const MAX_URL_CHARS: usize = 500;

/// A stored song
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SongRecord {
    pub id: Uuid,
    /// Owning user; `None` for anonymous generations
    pub owner: Option<String>,
    pub title: String,
    pub genre: String,
    pub lyrics: String,
    pub instrumental_url: String,
    pub vocals_url: String,
    pub mix_url: String,
    pub duration_seconds: Option<u32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields supplied when creating a song
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NewSong {
    pub owner: Option<String>,
    pub title: String,
    /// Blank means the default genre
    pub genre: String,
    pub lyrics: String,
    pub instrumental_url: String,
    pub vocals_url: String,
    pub mix_url: String,
    pub duration_seconds: Option<u32>,
}

impl NewSong {
    pub fn new(title: impl Into<String>, lyrics: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            lyrics: lyrics.into(),
            ..Self::default()
        }
    }

    /// Song from a pipeline run; URLs are the artifact file names
    pub fn from_outcome(title: impl Into<String>, outcome: &SongOutcome) -> Self {
        let url =
            |a: &crate::pipeline::TrackArtifact| a.file_name().unwrap_or_default().to_string();
        Self {
            owner: None,
            title: title.into(),
            genre: outcome.genre.clone(),
            lyrics: outcome.lyrics.clone(),
            instrumental_url: url(&outcome.instrumental),
            vocals_url: url(&outcome.vocals),
            mix_url: url(&outcome.mix),
            duration_seconds: Some(outcome.mix.duration_secs.round() as u32),
        }
    }

    pub fn with_owner(mut self, owner: impl Into<String>) -> Self {
        self.owner = Some(owner.into());
        self
    }

    pub fn with_genre(mut self, genre: impl Into<String>) -> Self {
        self.genre = genre.into();
        self
    }

    /// Check field lengths
    ///
    /// # Errors
    /// * `InvalidInput` - Naming the first offending field
    pub fn validate(&self) -> Result<()> {
        let title = self.title.trim();
        if title.is_empty() {
            return Err(AuraError::invalid_input("title is required"));
        }
        check_len("title", title, MAX_TITLE_CHARS)?;
        check_len("genre", self.genre.trim(), MAX_GENRE_CHARS)?;
        check_len("instrumental_url", &self.instrumental_url, MAX_URL_CHARS)?;
        check_len("vocals_url", &self.vocals_url, MAX_URL_CHARS)?;
        check_len("mix_url", &self.mix_url, MAX_URL_CHARS)?;
        Ok(())
    }

    /// Validate and stamp into a record
    pub fn into_record(self, now: DateTime<Utc>) -> Result<SongRecord> {
        self.validate()?;
        let genre = match self.genre.trim() {
            "" => DEFAULT_GENRE.to_string(),
            g => g.to_string(),
        };
        Ok(SongRecord {
            id: Uuid::new_v4(),
            owner: self.owner,
            title: self.title.trim().to_string(),
            genre,
            lyrics: self.lyrics,
            instrumental_url: self.instrumental_url,
            vocals_url: self.vocals_url,
            mix_url: self.mix_url,
            duration_seconds: self.duration_seconds,
            created_at: now,
            updated_at: now,
        })
    }
}

fn check_len(field: &str, value: &str, max: usize) -> Result<()> {
    let len = value.chars().count();
    if len > max {
        return Err(AuraError::invalid_input(format!(
            "{} is {} characters, limit is {}",
            field, len, max
        )));
    }
    Ok(())
}

/// Persistent song collection
pub trait SongStore: Send + Sync {
    /// Validate and store a new song
    fn create(&self, song: NewSong) -> Result<SongRecord>;

    /// Songs newest first, optionally only those of `owner`
    fn list(&self, owner: Option<&str>) -> Result<Vec<SongRecord>>;

    /// Look up one song
    fn get(&self, id: Uuid) -> Result<Option<SongRecord>> {
        Ok(self.list(None)?.into_iter().find(|s| s.id == id))
    }
}

/// Filter by owner and order newest first; equal timestamps keep the later
/// insertion first
fn select(records: &[SongRecord], owner: Option<&str>) -> Vec<SongRecord> {
    let mut selected: Vec<SongRecord> = records
        .iter()
        .rev()
        .filter(|r| owner.map_or(true, |o| r.owner.as_deref() == Some(o)))
        .cloned()
        .collect();
    selected.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    selected
}

fn poisoned() -> AuraError {
    AuraError::Store {
        reason: "song store lock poisoned".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use test_case::test_case;

    #[test]
    fn test_blank_genre_defaults_to_pop() {
        let record = NewSong::new("Title", "la").into_record(Utc::now()).unwrap();
        assert_eq!(record.genre, "pop");
        assert_eq!(record.created_at, record.updated_at);
    }

    #[test_case(NewSong::new("", "x") ; "empty title")]
    #[test_case(NewSong::new("   ", "x") ; "blank title")]
    #[test_case(NewSong::new("t".repeat(256), "x") ; "long title")]
    #[test_case(NewSong::new("t", "x").with_genre("g".repeat(51)) ; "long genre")]
    #[test_case(NewSong { mix_url: "u".repeat(501), ..NewSong::new("t", "x") } ; "long url")]
    fn test_invalid_songs(song: NewSong) {
        let err = song.validate().unwrap_err();
        assert_eq!(err.error_code(), "INVALID_INPUT");
    }

    #[test]
    fn test_limits_are_inclusive() {
        let song = NewSong::new("t".repeat(255), "x").with_genre("g".repeat(50));
        song.validate().unwrap();
    }
}
