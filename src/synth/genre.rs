//! Genre Parameter Table
//!
//! Static numeric parameters that give each synthesized track its genre
//! character. Lookups are case-insensitive and never fail: anything unknown
//! resolves to the pop profile.

use serde::Serialize;

/// Name of the profile used for unknown genres
pub const DEFAULT_GENRE: &str = "pop";

/// Major-scale ratios shared by the pop and rock vocal profiles
const MAJOR_SCALE: [f64; 8] = [1.0, 1.125, 1.25, 1.33, 1.5, 1.67, 1.875, 2.0];

/// Scale ratios used by the hip-hop vocal profile
const HIP_HOP_SCALE: [f64; 8] = [1.0, 1.2, 1.25, 1.4, 1.5, 1.7, 1.8, 2.0];

/// Parameters for the instrumental synthesizer
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenreProfile {
    /// Canonical genre name
    pub name: String,
    /// Tempo in beats per minute (drives the kick pulse)
    pub tempo_bpm: u32,
    /// Frequency of the continuous bass tone in Hz
    pub bass_frequency_hz: f64,
    /// Chord roots in Hz, one per equal-length segment of the track
    pub chord_frequencies_hz: Vec<f64>,
}

/// Parameters for the vocal melody synthesizer
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VocalProfile {
    /// Canonical genre name
    pub name: String,
    /// Frequency of scale degree one in Hz
    pub base_frequency_hz: f64,
    /// Frequency ratios of the eight scale degrees (all >= 1.0)
    pub scale_ratios: Vec<f64>,
}

impl GenreProfile {
    fn builtin(name: &str, tempo_bpm: u32, bass_frequency_hz: f64, chords: [f64; 4]) -> Self {
        Self {
            name: name.to_string(),
            tempo_bpm,
            bass_frequency_hz,
            chord_frequencies_hz: chords.to_vec(),
        }
    }

    /// Kick pulse rate in Hz
    pub fn beat_frequency_hz(&self) -> f64 {
        self.tempo_bpm as f64 / 60.0
    }
}

impl VocalProfile {
    fn builtin(name: &str, base_frequency_hz: f64, scale: &[f64; 8]) -> Self {
        Self {
            name: name.to_string(),
            base_frequency_hz,
            scale_ratios: scale.to_vec(),
        }
    }
}

/// Lowercased, trimmed genre name with the hip-hop spellings folded together
pub fn canonical(genre: &str) -> String {
    let key = genre.trim().to_lowercase();
    match key.as_str() {
        "hiphop" | "hip hop" | "hip_hop" => "hip-hop".to_string(),
        _ => key,
    }
}

/// Genres with a dedicated instrumental profile
pub fn known_genres() -> &'static [&'static str] {
    &["pop", "rock", "electronic", "jazz", "hip-hop"]
}

/// Instrumental profile for a genre, falling back to pop
pub fn profile_for(genre: &str) -> GenreProfile {
    match canonical(genre).as_str() {
        "rock" => GenreProfile::builtin("rock", 140, 55.0, [165.0, 208.0, 247.0, 165.0]),
        "electronic" => {
            GenreProfile::builtin("electronic", 128, 40.0, [440.0, 554.0, 659.0, 440.0])
        }
        "jazz" => GenreProfile::builtin("jazz", 100, 65.0, [196.0, 247.0, 294.0, 349.0]),
        "hip-hop" => GenreProfile::builtin("hip-hop", 90, 45.0, [131.0, 165.0, 196.0, 131.0]),
        _ => GenreProfile::builtin(DEFAULT_GENRE, 120, 60.0, [220.0, 277.0, 330.0, 220.0]),
    }
}

/// Vocal profile for a genre, falling back to pop
///
/// Pop and rock share the major scale (rock sits lower, on G3); hip-hop
/// uses its own scale on E3.
pub fn vocal_profile_for(genre: &str) -> VocalProfile {
    match canonical(genre).as_str() {
        "rock" => VocalProfile::builtin("rock", 196.0, &MAJOR_SCALE),
        "hip-hop" => VocalProfile::builtin("hip-hop", 165.0, &HIP_HOP_SCALE),
        _ => VocalProfile::builtin(DEFAULT_GENRE, 220.0, &MAJOR_SCALE),
    }
}
