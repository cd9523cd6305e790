//! AuraLynx CLI - Song Generation
//!
//! Command-line interface for the AuraLynx song generator.

use anyhow::Context;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use auralynx::cli::commands;
use auralynx::cli::{Cli, Commands};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    info!("AuraLynx v{}", env!("CARGO_PKG_VERSION"));

    let Some(cmd) = cli.command else {
        println!("AuraLynx v{}", env!("CARGO_PKG_VERSION"));
        println!("Use --help for available commands");
        return Ok(());
    };

    if let Commands::Genres = cmd {
        return commands::genres().context("listing genres");
    }

    let settings = commands::load_settings(cli.config.as_deref()).context("loading settings")?;
    handle_command(cmd, &settings)
}

fn handle_command(cmd: Commands, settings: &auralynx::Settings) -> anyhow::Result<()> {
    match cmd {
        Commands::Genres => commands::genres().context("listing genres"),
        Commands::Instrumental {
            lyrics,
            genre,
            duration,
            output,
        } => commands::instrumental(settings, &lyrics, &genre, duration, output.as_deref())
            .context("generating instrumental"),
        Commands::Vocals {
            lyrics,
            genre,
            duration,
            output,
        } => commands::vocals(settings, &lyrics, &genre, duration, output.as_deref())
            .context("generating vocals"),
        Commands::Mix {
            instrumental,
            vocals,
            genre,
            output,
        } => commands::mix(settings, &instrumental, &vocals, &genre, output.as_deref())
            .context("mixing tracks"),
        Commands::Lyrics { input, genre } => {
            commands::lyrics(settings, &input, &genre).context("generating lyrics")
        }
        Commands::Transcribe { path } => {
            commands::transcribe(settings, &path)
                .with_context(|| format!("transcribing {}", path.display()))
        }
        Commands::Song {
            input,
            genre,
            title,
            owner,
            no_save,
        } => commands::song(
            settings,
            &input,
            &genre,
            title.as_deref(),
            owner.as_deref(),
            !no_save,
        )
        .context("generating song"),
        Commands::Songs { owner } => {
            commands::songs(settings, owner.as_deref()).context("listing songs")
        }
        Commands::Prune { max_age_mins } => {
            commands::prune(settings, max_age_mins).context("pruning temp audio")
        }
    }
}
