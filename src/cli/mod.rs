//! CLI Module
//!
//! Command-line interface for the AuraLynx song generator.

pub mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// AuraLynx - AI-assisted song generation
#[derive(Parser, Debug)]
#[command(name = "auralynx")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// JSON settings file (defaults to AURALYNX_* environment variables)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List the genre profiles
    #[command(name = "genres")]
    Genres,

    /// Generate an instrumental track
    #[command(name = "instrumental")]
    Instrumental {
        /// Lyrics the track accompanies
        #[arg(short, long, default_value = "")]
        lyrics: String,

        /// Genre
        #[arg(short, long, default_value = "pop")]
        genre: String,

        /// Length of the synthesized fallback, in seconds
        #[arg(short, long)]
        duration: Option<f64>,

        /// Copy the result to this path
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Generate a vocal track
    #[command(name = "vocals")]
    Vocals {
        /// Lyrics to sing
        #[arg(short, long)]
        lyrics: String,

        /// Genre
        #[arg(short, long, default_value = "pop")]
        genre: String,

        /// Length of the synthesized fallback, in seconds
        #[arg(short, long)]
        duration: Option<f64>,

        /// Copy the result to this path
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Mix an instrumental and a vocal WAV
    #[command(name = "mix")]
    Mix {
        /// Instrumental WAV
        instrumental: PathBuf,

        /// Vocal WAV
        vocals: PathBuf,

        /// Genre
        #[arg(short, long, default_value = "pop")]
        genre: String,

        /// Copy the result to this path
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Write lyrics about a theme
    #[command(name = "lyrics")]
    Lyrics {
        /// Theme, prompt or partial lyrics
        input: String,

        /// Genre
        #[arg(short, long, default_value = "pop")]
        genre: String,
    },

    /// Transcribe an audio file
    #[command(name = "transcribe")]
    Transcribe {
        /// Audio file
        path: PathBuf,
    },

    /// Generate a complete song and store it
    #[command(name = "song")]
    Song {
        /// Theme, prompt or partial lyrics
        input: String,

        /// Genre
        #[arg(short, long, default_value = "pop")]
        genre: String,

        /// Song title (defaults to the theme)
        #[arg(short, long)]
        title: Option<String>,

        /// Owner recorded with the song
        #[arg(long)]
        owner: Option<String>,

        /// Do not record the song in the store
        #[arg(long)]
        no_save: bool,
    },

    /// List stored songs, newest first
    #[command(name = "songs")]
    Songs {
        /// Only songs of this owner
        #[arg(long)]
        owner: Option<String>,
    },

    /// Delete old generated WAV files
    #[command(name = "prune")]
    Prune {
        /// Remove files older than this many minutes
        #[arg(long, default_value_t = 60)]
        max_age_mins: u64,
    },
}
