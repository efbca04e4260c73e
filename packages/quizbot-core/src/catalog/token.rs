//! Client-credentials token handling.
//!
//! [`TokenCache`] hands out a bearer token for catalog requests and refreshes
//! it through a [`TokenSource`] when it is missing or expired. Refreshes are
//! serialized by an async mutex: the first caller refreshes, concurrent
//! callers wait on the lock and reuse the fresh token.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tokio::sync::Mutex;
use tokio::time::Instant;

use super::retry::with_fixed_retry;
use super::{CatalogError, CatalogResult};
use crate::config::CatalogConfig;
use crate::protocol_constants::{
    TOKEN_EXPIRY_MARGIN_SECS, TOKEN_MAX_LIFETIME_SECS, TOKEN_PATH, TOKEN_REFRESH_ATTEMPTS,
    TOKEN_RETRY_DELAY_MS,
};

/// A bearer token as issued by the token endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessToken {
    /// The opaque bearer value.
    pub value: String,
    /// Lifetime announced by the server.
    pub expires_in: Duration,
}

/// Source of fresh access tokens.
///
/// Implemented by [`ClientCredentials`] for the real catalog; tests provide
/// counting stubs.
#[async_trait]
pub trait TokenSource: Send + Sync {
    /// Requests a new token. Called once per refresh attempt.
    async fn request_token(&self) -> CatalogResult<AccessToken>;
}

// ─────────────────────────────────────────────────────────────────────────────
// Client Credentials Grant
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: u64,
}

/// Token source performing the OAuth2 client-credentials grant.
pub struct ClientCredentials {
    http: Client,
    token_url: String,
    client_id: String,
    client_secret: String,
}

impl ClientCredentials {
    /// Creates a token source for the accounts service configured in `config`.
    pub fn new(http: Client, config: &CatalogConfig) -> Self {
        Self {
            http,
            token_url: format!("{}{}", config.accounts_url.trim_end_matches('/'), TOKEN_PATH),
            client_id: config.client_id.clone(),
            client_secret: config.client_secret.clone(),
        }
    }
}

#[async_trait]
impl TokenSource for ClientCredentials {
    async fn request_token(&self) -> CatalogResult<AccessToken> {
        log::debug!("[Token] POST {}", self.token_url);

        let response = self
            .http
            .post(&self.token_url)
            .basic_auth(&self.client_id, Some(&self.client_secret))
            .header("Content-Type", "application/x-www-form-urlencoded")
            .body("grant_type=client_credentials")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(CatalogError::TokenRejected(status.as_u16(), body));
        }

        let body = response.bytes().await?;
        let token: TokenResponse = serde_json::from_slice(&body)?;
        Ok(AccessToken {
            value: token.access_token,
            expires_in: Duration::from_secs(token.expires_in),
        })
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Token Cache
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Default)]
struct CachedToken {
    value: String,
    expires_at: Option<Instant>,
}

impl CachedToken {
    /// A token must be refreshed when it is empty or already expired.
    fn needs_refresh(&self, now: Instant) -> bool {
        self.value.is_empty() || self.expires_at.map_or(true, |at| now >= at)
    }
}

/// Caches the catalog bearer token and refreshes it on demand.
pub struct TokenCache {
    source: Arc<dyn TokenSource>,
    cached: Mutex<CachedToken>,
    attempts: usize,
    retry_delay: Duration,
}

impl TokenCache {
    /// Creates an empty cache backed by `source`.
    pub fn new(source: Arc<dyn TokenSource>) -> Self {
        Self {
            source,
            cached: Mutex::new(CachedToken::default()),
            attempts: TOKEN_REFRESH_ATTEMPTS,
            retry_delay: Duration::from_millis(TOKEN_RETRY_DELAY_MS),
        }
    }

    /// Returns a valid bearer token, refreshing it first if needed.
    ///
    /// # Errors
    ///
    /// Returns the last refresh error after all attempts failed.
    pub async fn get_token(&self) -> CatalogResult<String> {
        let mut cached = self.cached.lock().await;
        if !cached.needs_refresh(Instant::now()) {
            return Ok(cached.value.clone());
        }

        let token = with_fixed_retry("token refresh", self.attempts, self.retry_delay, || {
            self.source.request_token()
        })
        .await?;

        let lifetime = token
            .expires_in
            .saturating_sub(Duration::from_secs(TOKEN_EXPIRY_MARGIN_SECS))
            .min(Duration::from_secs(TOKEN_MAX_LIFETIME_SECS));
        cached.value = token.value;
        // None (unrepresentable instant) just means the next call refreshes
        cached.expires_at = Instant::now().checked_add(lifetime);

        log::info!("[Token] Refreshed catalog token (valid for {:?})", lifetime);
        Ok(cached.value.clone())
    }

    /// Drops the cached token so the next call refreshes.
    ///
    /// Used when the API rejects a token before its announced expiry.
    pub async fn invalidate(&self) {
        let mut cached = self.cached.lock().await;
        cached.value.clear();
        cached.expires_at = None;
    }

    /// Returns the remaining validity of the cached token, if any.
    pub async fn remaining(&self) -> Option<Duration> {
        let cached = self.cached.lock().await;
        if cached.needs_refresh(Instant::now()) {
            return None;
        }
        cached
            .expires_at
            .map(|at| at.saturating_duration_since(Instant::now()))
    }
}
