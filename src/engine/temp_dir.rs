//! Temporary audio directory
//!
//! Generated tracks are written here under unique names and pruned once
//! they are older than a configurable age.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use uuid::Uuid;
use walkdir::WalkDir;

use crate::error::Result;

/// Result of a prune pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PruneReport {
    /// Number of files removed
    pub removed: usize,
    /// Bytes reclaimed
    pub bytes_freed: u64,
}

/// Directory holding generated WAV files
#[derive(Debug, Clone)]
pub struct TempAudioDir {
    root: PathBuf,
}

impl TempAudioDir {
    /// Use `root` as the temp directory, creating it if needed
    pub fn open(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    /// The directory path
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// A fresh path of the form `<prefix>_<uuid>.wav`
    pub fn allocate(&self, prefix: &str) -> PathBuf {
        self.root.join(format!("{}_{}.wav", prefix, Uuid::new_v4()))
    }

    /// Resolve a file name or URL tail to a path inside this directory
    ///
    /// Only the last path segment is kept, so `https://host/temp-audio/x.wav`
    /// and `../x.wav` both resolve to `<root>/x.wav`.
    pub fn resolve(&self, name_or_url: &str) -> PathBuf {
        let file_name = name_or_url
            .trim_end_matches('/')
            .rsplit(|c: char| c == '/' || c == '\\')
            .next()
            .unwrap_or(name_or_url);
        self.root.join(file_name)
    }

    /// Remove `.wav` files last modified more than `max_age` ago
    pub fn prune(&self, max_age: Duration) -> Result<PruneReport> {
        let now = SystemTime::now();
        let mut report = PruneReport::default();

        for entry in WalkDir::new(&self.root)
            .max_depth(1)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
            .filter(|e| e.path().extension().map_or(false, |ext| ext == "wav"))
        {
            let metadata = entry.metadata().map_err(std::io::Error::from)?;
            let age = metadata
                .modified()
                .ok()
                .and_then(|m| now.duration_since(m).ok())
                .unwrap_or_default();

            if age > max_age {
                fs::remove_file(entry.path())?;
                report.removed += 1;
                report.bytes_freed += metadata.len();
                tracing::debug!(path = %entry.path().display(), "pruned temp audio");
            }
        }

        if report.removed > 0 {
            tracing::info!(
                removed = report.removed,
                bytes = report.bytes_freed,
                "pruned temp audio directory"
            );
        }
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_allocate_is_unique() {
        let dir = tempdir().unwrap();
        let temp = TempAudioDir::open(dir.path()).unwrap();

        let a = temp.allocate("vocals");
        let b = temp.allocate("vocals");
        assert_ne!(a, b);
        assert!(a.file_name().unwrap().to_string_lossy().starts_with("vocals_"));
        assert_eq!(a.extension().unwrap(), "wav");
    }

    #[test]
    fn test_resolve_url_tail() {
        let dir = tempdir().unwrap();
        let temp = TempAudioDir::open(dir.path()).unwrap();

        assert_eq!(
            temp.resolve("http://localhost:8000/temp-audio/mixed_1.wav"),
            dir.path().join("mixed_1.wav")
        );
        assert_eq!(temp.resolve("../../etc/x.wav"), dir.path().join("x.wav"));
    }

    #[test]
    fn test_prune_only_removes_old_wavs() {
        let dir = tempdir().unwrap();
        let temp = TempAudioDir::open(dir.path()).unwrap();
        fs::write(dir.path().join("old.wav"), b"RIFF").unwrap();
        fs::write(dir.path().join("notes.txt"), b"keep").unwrap();

        let report = temp.prune(Duration::from_secs(3600)).unwrap();
        assert_eq!(report.removed, 0);

        std::thread::sleep(Duration::from_millis(20));
        let report = temp.prune(Duration::ZERO).unwrap();
        assert_eq!(report.removed, 1);
        assert_eq!(report.bytes_freed, 4);
        assert!(!dir.path().join("old.wav").exists());
        assert!(dir.path().join("notes.txt").exists());
    }
}
