//! Core configuration types.
//!
//! The binary owns the on-disk format and maps it into [`Config`] before
//! bootstrapping. Every field has a default so partial configs deserialize.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::protocol_constants::{CATALOG_ACCOUNTS_URL, CATALOG_API_URL};

/// Credentials and endpoints for the music catalog.
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct CatalogConfig {
    /// OAuth client id used for the client-credentials grant.
    pub client_id: String,

    /// OAuth client secret used for the client-credentials grant.
    pub client_secret: String,

    /// Base URL of the accounts service hosting the token endpoint.
    pub accounts_url: String,

    /// Base URL of the Web API.
    pub api_url: String,

    /// Market used to resolve track availability.
    pub market: String,

    /// Number of playlist items requested per call.
    pub page_limit: u32,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            client_id: String::new(),
            client_secret: String::new(),
            accounts_url: CATALOG_ACCOUNTS_URL.to_string(),
            api_url: CATALOG_API_URL.to_string(),
            market: "US".to_string(),
            page_limit: 5,
        }
    }
}

/// What a session does after a track fails to fetch or decode.
///
/// The failure is always reported through the session's error handler first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailurePolicy {
    /// Stop advancing and tear the session down.
    #[default]
    Stop,
    /// Drop the failed track and continue with the next queued one.
    SkipTrack,
}

/// Configuration for the quiz bot core.
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct Config {
    /// Catalog credentials and endpoints.
    pub catalog: CatalogConfig,

    /// Upper bound for the voice connect handshake (seconds).
    pub voice_connect_timeout_secs: u64,

    /// Behaviour after a per-track playback failure.
    pub failure_policy: FailurePolicy,

    /// Edit the original reply when playback fails after the quiz started.
    pub report_playback_errors: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            catalog: CatalogConfig::default(),
            voice_connect_timeout_secs: 10,
            failure_policy: FailurePolicy::default(),
            report_playback_errors: true,
        }
    }
}

impl Config {
    /// Returns the voice connect timeout as a [`Duration`].
    #[must_use]
    pub fn voice_connect_timeout(&self) -> Duration {
        Duration::from_secs(self.voice_connect_timeout_secs)
    }

    /// Validates the configuration values.
    pub fn validate(&self) -> Result<(), String> {
        if self.catalog.client_id.is_empty() || self.catalog.client_secret.is_empty() {
            return Err("catalog client_id and client_secret must be set".to_string());
        }
        if self.catalog.page_limit == 0 {
            return Err("catalog page_limit must be >= 1".to_string());
        }
        if self.voice_connect_timeout_secs == 0 {
            return Err("voice_connect_timeout_secs must be >= 1".to_string());
        }
        Ok(())
    }
}
