//! JSON file song store
//!
//! The whole collection lives in one pretty-printed JSON array, rewritten
//! on every insert.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use chrono::Utc;

use super::{poisoned, select, NewSong, SongRecord, SongStore};
use crate::error::{AuraError, Result};

/// Songs persisted to a JSON file
#[derive(Debug)]
pub struct JsonSongStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl JsonSongStore {
    /// Use `path` as the backing file; it is created on first insert
    pub fn open(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<Vec<SongRecord>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let content = fs::read_to_string(&self.path)?;
        if content.trim().is_empty() {
            return Ok(Vec::new());
        }
        serde_json::from_str(&content).map_err(|e| AuraError::Store {
            reason: format!("cannot parse {}: {}", self.path.display(), e),
        })
    }

    fn save(&self, songs: &[SongRecord]) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }
        let content = serde_json::to_string_pretty(songs)?;
        fs::write(&self.path, content)?;
        Ok(())
    }
}

impl SongStore for JsonSongStore {
    fn create(&self, song: NewSong) -> Result<SongRecord> {
        let record = song.into_record(Utc::now())?;

        let _guard = self.lock.lock().map_err(|_| poisoned())?;
        let mut songs = self.load()?;
        songs.push(record.clone());
        self.save(&songs)?;

        tracing::debug!(id = %record.id, path = %self.path.display(), "song stored");
        Ok(record)
    }

    fn list(&self, owner: Option<&str>) -> Result<Vec<SongRecord>> {
        let _guard = self.lock.lock().map_err(|_| poisoned())?;
        Ok(select(&self.load()?, owner))
    }
}
