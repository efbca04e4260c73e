//! Quizbot - operator CLI for the music quiz bot.
//!
//! Exercises the core against the real catalog: verify credentials, list the
//! playable previews of a playlist, or print the command definition to
//! register with the chat platform.

mod config;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use quizbot_core::{
    bootstrap_services, quiz_command, BootstrappedServices, CatalogLink, LinkKind,
    LoggingEventEmitter, QuizError, Track,
};

use crate::config::BotConfig;

/// Quizbot - music quiz bot tooling.
#[derive(Parser, Debug)]
#[command(name = "quizbot")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the configuration file (JSON).
    #[arg(short, long, value_name = "FILE", default_value = "config.json", env = "QUIZBOT_CONFIG")]
    config: PathBuf,

    /// Log level (error, warn, info, debug, trace). Overrides the config file.
    #[arg(short, long, env = "QUIZBOT_LOG_LEVEL")]
    log_level: Option<log::LevelFilter>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Request a catalog token and report how long it stays valid.
    Token,

    /// List the tracks of a playlist link that have a playable preview.
    Tracks {
        /// A catalog playlist link.
        link: String,
    },

    /// Print the slash command definition as JSON.
    Command,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    if let Command::Command = args.command {
        init_logging(args.log_level.unwrap_or(log::LevelFilter::Info));
        let json = serde_json::to_string_pretty(&quiz_command())
            .context("Failed to serialize command definition")?;
        println!("{}", json);
        return Ok(());
    }

    let config = BotConfig::load(&args.config).context("Failed to load configuration")?;
    init_logging(
        args.log_level
            .or_else(|| config.log_level_filter())
            .unwrap_or(log::LevelFilter::Info),
    );

    log::info!("Quizbot v{}", env!("CARGO_PKG_VERSION"));

    let services = bootstrap_services(&config.to_core_config(), Arc::new(LoggingEventEmitter))
        .context("Failed to bootstrap services")?;

    let result = match args.command {
        Command::Token => check_token(&services).await,
        Command::Tracks { link } => list_tracks(&services, &link).await,
        Command::Command => Ok(()),
    };

    services.shutdown().await;
    result
}

fn init_logging(level: log::LevelFilter) {
    env_logger::Builder::new()
        .filter_level(level)
        .format_timestamp_millis()
        .init();
}

async fn check_token(services: &BootstrappedServices) -> Result<()> {
    services
        .tokens
        .get_token()
        .await
        .context("Failed to obtain catalog token")?;

    match services.tokens.remaining().await {
        Some(remaining) => println!("Token OK, valid for {}s", remaining.as_secs()),
        None => println!("Token OK"),
    }
    Ok(())
}

async fn list_tracks(services: &BootstrappedServices, input: &str) -> Result<()> {
    let Some(link) = CatalogLink::parse(input) else {
        bail!(QuizError::InvalidLink.user_message());
    };
    if link.kind != LinkKind::Playlist {
        bail!(QuizError::unsupported(link.kind));
    }

    let items = services
        .catalog
        .get_playlist(&link.id)
        .await
        .with_context(|| format!("Failed to fetch playlist {}", link.id))?;
    let tracks = Track::playable(&items);

    println!(
        "{} of {} track(s) have a preview",
        tracks.len(),
        items.len()
    );
    for track in &tracks {
        println!(
            "{}\t{} - {}\t{}",
            track.id(),
            track.artist(),
            track.name(),
            track.preview_url()
        );
    }
    Ok(())
}
