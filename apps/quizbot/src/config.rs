//! Bot configuration.
//!
//! Loaded from a JSON file with environment variable overrides for secrets.
//! A missing file is replaced by a default one and reported as an error so
//! the operator can fill it in.

use std::path::Path;

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

/// Connection settings for the bot database.
///
/// Carried for compatibility with existing config files; nothing reads it yet.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    pub address: String,
    pub user: String,
    pub password: String,
    pub database: String,
    pub insecure: bool,
    pub verbose: bool,
}

/// Catalog client credentials.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SpotifyConfig {
    /// Override: `QUIZBOT_SPOTIFY_CLIENT_ID`
    pub client_id: String,
    /// Override: `QUIZBOT_SPOTIFY_CLIENT_SECRET`
    pub client_secret: String,
}

/// Bot configuration file.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BotConfig {
    /// Register commands in `guild_id` only instead of globally.
    pub dev_mode: bool,
    pub guild_id: u64,
    /// Log level (error, warn, info, debug, trace).
    pub log_level: String,
    /// Chat platform bot token.
    /// Override: `QUIZBOT_TOKEN`
    pub token: String,
    /// Push the command definition on startup.
    pub sync_commands: bool,
    pub database: DatabaseConfig,
    pub spotify: SpotifyConfig,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            dev_mode: false,
            guild_id: 0,
            log_level: "info".to_string(),
            token: String::new(),
            sync_commands: false,
            database: DatabaseConfig::default(),
            spotify: SpotifyConfig::default(),
        }
    }
}

impl BotConfig {
    /// Loads the config file, then applies environment overrides.
    ///
    /// # Errors
    ///
    /// If `path` does not exist a default config is written there and an
    /// error is returned anyway.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            Self::default()
                .save(path)
                .with_context(|| format!("Failed to create config file: {}", path.display()))?;
            bail!("{} not found, created new one", path.display());
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let mut config: Self = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        config.apply_env_overrides();
        Ok(config)
    }

    /// Writes the config as pretty-printed JSON.
    pub fn save(&self, path: &Path) -> Result<()> {
        let data = serde_json::to_string_pretty(self).context("Failed to serialize config")?;
        std::fs::write(path, data)
            .with_context(|| format!("Failed to write config file: {}", path.display()))
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(val) = std::env::var("QUIZBOT_TOKEN") {
            self.token = val;
        }
        if let Ok(val) = std::env::var("QUIZBOT_SPOTIFY_CLIENT_ID") {
            self.spotify.client_id = val;
        }
        if let Ok(val) = std::env::var("QUIZBOT_SPOTIFY_CLIENT_SECRET") {
            self.spotify.client_secret = val;
        }
    }

    /// Parsed `log_level`, if it names a valid level.
    pub fn log_level_filter(&self) -> Option<log::LevelFilter> {
        self.log_level.parse().ok()
    }

    /// Converts to quizbot-core's Config type.
    pub fn to_core_config(&self) -> quizbot_core::Config {
        quizbot_core::Config {
            catalog: quizbot_core::CatalogConfig {
                client_id: self.spotify.client_id.clone(),
                client_secret: self.spotify.client_secret.clone(),
                ..Default::default()
            },
            ..Default::default()
        }
    }
}
