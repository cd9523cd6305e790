//! Integration tests for the song pipeline
//!
//! These tests verify:
//! - Provider fallback order
//! - Track files and their metadata
//! - Song persistence

use std::sync::Arc;

use auralynx::engine::{file_sha256, read_wav, write_wav, AudioBuffer, TempAudioDir};
use auralynx::providers::mock::{MockInstrumental, MockLyrics, MockTranscriber, MockVocals};
use auralynx::store::{JsonSongStore, MemorySongStore, NewSong, SongStore};
use auralynx::{AuraError, Settings, SongPipeline};
use pretty_assertions::assert_eq;

fn settings_in(dir: &std::path::Path) -> Settings {
    Settings {
        temp_audio_dir: dir.join("audio"),
        songs_path: dir.join("songs.json"),
        instrumental_duration_secs: 2.0,
        vocal_duration_secs: 1.5,
        ..Settings::default()
    }
}

// ============================================================================
// Fallback
// ============================================================================

#[test]
fn test_unconfigured_settings_use_offline_providers() {
    let dir = tempfile::tempdir().unwrap();
    let pipeline = SongPipeline::from_settings(&settings_in(dir.path())).unwrap();

    let song = pipeline.generate_song("neon rain", "electronic").unwrap();

    assert_eq!(song.lyrics_provider, "template-lyrics");
    assert_eq!(song.instrumental.provider, "synthetic-instrumental");
    assert_eq!(song.vocals.provider, "synthetic-vocals");
    assert_eq!(song.instrumental.duration_secs, 2.0);
    assert_eq!(song.vocals.duration_secs, 1.5);
    assert_eq!(song.mix.duration_secs, 2.0);
    assert!(song.lyrics.contains("neon rain"));
}

#[test]
fn test_failed_remote_falls_back_to_synth() {
    let dir = tempfile::tempdir().unwrap();
    let remote = Arc::new(MockInstrumental::failing("remote-music"));
    let offline = Arc::new(MockInstrumental::offline("gpu-box"));

    let pipeline = SongPipeline::builder(TempAudioDir::open(dir.path()).unwrap())
        .instrumental(offline.clone())
        .instrumental(remote.clone())
        .durations(1.0, 1.0)
        .build();

    let artifact = pipeline.generate_instrumental("lyrics", "rock").unwrap();
    assert_eq!(artifact.provider, "synthetic-instrumental");
    assert_eq!(remote.calls(), 1);
    assert_eq!(offline.calls(), 0);
}

#[test]
fn test_first_working_provider_wins() {
    let dir = tempfile::tempdir().unwrap();
    let pipeline = SongPipeline::builder(TempAudioDir::open(dir.path()).unwrap())
        .lyricist(Arc::new(MockLyrics::offline("a")))
        .lyricist(Arc::new(MockLyrics::returning("b", "Verse 1:\nfrom b")))
        .build();

    let lyrics = pipeline.generate_lyrics("anything", "pop").unwrap();
    assert_eq!(lyrics.provider, "b");
    assert_eq!(lyrics.value, "Verse 1:\nfrom b");
    assert_eq!(lyrics.failures, vec!["a: unavailable".to_string()]);
}

#[test]
fn test_transcription_has_no_offline_fallback() {
    let dir = tempfile::tempdir().unwrap();
    let clip = dir.path().join("clip.wav");
    write_wav(&AudioBuffer::from_samples(vec![0; 100]), &clip).unwrap();

    let pipeline = SongPipeline::builder(TempAudioDir::open(dir.path()).unwrap()).build();
    match pipeline.transcribe(&clip) {
        Err(AuraError::AllProvidersFailed { capability, .. }) => {
            assert_eq!(capability, "transcription")
        }
        other => panic!("expected AllProvidersFailed, got {:?}", other),
    }

    let pipeline = SongPipeline::builder(TempAudioDir::open(dir.path()).unwrap())
        .transcriber(Arc::new(MockTranscriber::returning("stt", "a song about trains")))
        .build();
    assert_eq!(pipeline.transcribe(&clip).unwrap().value, "a song about trains");
}

// ============================================================================
// Tracks
// ============================================================================

#[test]
fn test_song_files_are_written() {
    let dir = tempfile::tempdir().unwrap();
    let pipeline = SongPipeline::builder(TempAudioDir::open(dir.path()).unwrap())
        .vocalist(Arc::new(MockVocals::returning(
            "studio-singer",
            AudioBuffer::from_samples(vec![1000; 4410]),
        )))
        .durations(0.5, 0.5)
        .build();

    let song = pipeline.generate_song("trains", "hip hop").unwrap();

    assert_eq!(song.genre, "hip hop");
    assert_eq!(song.vocals.provider, "studio-singer");
    for artifact in [&song.instrumental, &song.vocals, &song.mix] {
        assert!(artifact.path.exists());
        assert!(artifact.path.starts_with(dir.path()));
        assert_eq!(artifact.sha256, file_sha256(&artifact.path).unwrap());
    }
    assert_eq!(read_wav(&song.vocals.path).unwrap().num_samples(), 4410);
    assert_eq!(read_wav(&song.mix.path).unwrap().num_samples(), 22050);
}

#[test]
fn test_mix_files() {
    let dir = tempfile::tempdir().unwrap();
    let pipeline = SongPipeline::builder(TempAudioDir::open(dir.path()).unwrap())
        .durations(1.0, 0.25)
        .build();

    let inst = pipeline.generate_instrumental("", "jazz").unwrap();
    let voc = pipeline.generate_vocals("hello there", "jazz").unwrap();

    let mixed = pipeline.mix_files(&inst.path, &voc.path, "jazz").unwrap();
    assert_eq!(mixed.duration_secs, 1.0);
    assert!(mixed.file_name().unwrap().starts_with("mixed_"));

    let err = pipeline
        .mix_files(&inst.path, &dir.path().join("gone.wav"), "jazz")
        .unwrap_err();
    assert_eq!(err.error_code(), "FILE_NOT_FOUND");
}

#[test]
fn test_prune_removes_generated_tracks() {
    let dir = tempfile::tempdir().unwrap();
    let temp = TempAudioDir::open(dir.path()).unwrap();
    let pipeline = SongPipeline::builder(temp.clone()).durations(0.1, 0.1).build();

    pipeline.generate_instrumental("", "pop").unwrap();
    pipeline.generate_vocals("la", "pop").unwrap();
    std::thread::sleep(std::time::Duration::from_millis(20));

    let report = temp.prune(std::time::Duration::ZERO).unwrap();
    assert_eq!(report.removed, 2);
}

// ============================================================================
// Storage
// ============================================================================

#[test]
fn test_song_outcome_is_stored() {
    let dir = tempfile::tempdir().unwrap();
    let settings = settings_in(dir.path());
    let pipeline = SongPipeline::from_settings(&settings).unwrap();
    let song = pipeline.generate_song("late night drive", "rock").unwrap();

    let store = JsonSongStore::open(&settings.songs_path);
    let record = store
        .create(NewSong::from_outcome("Late Night Drive", &song).with_owner("ana"))
        .unwrap();

    assert_eq!(record.genre, "rock");
    assert_eq!(record.duration_seconds, Some(2));
    assert_eq!(Some(record.mix_url.as_str()), song.mix.file_name());
    assert_eq!(
        TempAudioDir::open(&settings.temp_audio_dir)
            .unwrap()
            .resolve(&format!("https://example.com/media/{}", record.mix_url)),
        song.mix.path
    );

    assert_eq!(store.list(Some("ana")).unwrap(), vec![record]);
    assert!(store.list(Some("bo")).unwrap().is_empty());
}

#[test]
fn test_stores_share_behavior() {
    let dir = tempfile::tempdir().unwrap();
    let stores: Vec<Box<dyn SongStore>> = vec![
        Box::new(MemorySongStore::new()),
        Box::new(JsonSongStore::open(dir.path().join("songs.json"))),
    ];

    for store in stores {
        store.create(NewSong::new("old", "a")).unwrap();
        store.create(NewSong::new("new", "b").with_genre("jazz")).unwrap();
        assert!(store.create(NewSong::new("", "c")).is_err());

        let songs = store.list(None).unwrap();
        assert_eq!(songs.len(), 2);
        assert_eq!(songs[0].title, "new");
        assert_eq!(songs[0].genre, "jazz");
        assert_eq!(songs[1].genre, "pop");
    }
}
