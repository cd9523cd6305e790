//! In-memory song store

use std::sync::Mutex;

use chrono::Utc;

use super::{poisoned, select, NewSong, SongRecord, SongStore};
use crate::error::Result;

/// Songs kept in memory for the life of the process
#[derive(Debug, Default)]
pub struct MemorySongStore {
    songs: Mutex<Vec<SongRecord>>,
}

impl MemorySongStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SongStore for MemorySongStore {
    fn create(&self, song: NewSong) -> Result<SongRecord> {
        let record = song.into_record(Utc::now())?;
        self.songs.lock().map_err(|_| poisoned())?.push(record.clone());
        tracing::debug!(id = %record.id, title = %record.title, "song stored");
        Ok(record)
    }

    fn list(&self, owner: Option<&str>) -> Result<Vec<SongRecord>> {
        let songs = self.songs.lock().map_err(|_| poisoned())?;
        Ok(select(&songs, owner))
    }
}
