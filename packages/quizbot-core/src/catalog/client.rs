//! Authenticated access to catalog metadata.
//!
//! Every request carries a bearer token from the shared [`TokenCache`].
//! Metadata requests are not retried: the first failure is returned.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;

use super::models::{Page, PlaylistItem};
use super::token::TokenCache;
use super::{CatalogError, CatalogResult};
use crate::config::CatalogConfig;
use crate::protocol_constants::PLAYLIST_TRACK_FIELDS;

/// Trait for fetching the track list of a playlist.
///
/// Used by `QuizService` so the start-quiz flow can run against a stub catalog.
#[async_trait]
pub trait PlaylistSource: Send + Sync {
    /// Returns the items of the playlist with the given catalog id.
    async fn playlist_tracks(&self, playlist_id: &str) -> CatalogResult<Vec<PlaylistItem>>;
}

/// HTTP client for the catalog Web API.
pub struct CatalogClient {
    http: Client,
    tokens: Arc<TokenCache>,
    api_url: String,
    market: String,
    page_limit: u32,
}

impl CatalogClient {
    /// Creates a client using the shared HTTP client and token cache.
    pub fn new(http: Client, tokens: Arc<TokenCache>, config: &CatalogConfig) -> Self {
        Self {
            http,
            tokens,
            api_url: config.api_url.trim_end_matches('/').to_string(),
            market: config.market.clone(),
            page_limit: config.page_limit,
        }
    }

    /// Returns the token cache backing this client.
    pub fn tokens(&self) -> &Arc<TokenCache> {
        &self.tokens
    }

    /// Performs an authenticated GET and decodes the JSON body.
    ///
    /// `path` is appended to the API base URL and may contain a query string.
    ///
    /// # Errors
    ///
    /// * `CatalogError::Status` - the API answered with a non-success status
    /// * `CatalogError::Http` - transport failure
    /// * `CatalogError::Decode` - the body did not match `T`
    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> CatalogResult<T> {
        let token = self.tokens.get_token().await?;
        let url = format!("{}{}", self.api_url, path);

        log::debug!("[Catalog] GET {}", url);

        let response = self.http.get(&url).bearer_auth(token).send().await?;
        let status = response.status();

        if status == StatusCode::UNAUTHORIZED {
            // Token revoked before its announced expiry; next call refreshes
            self.tokens.invalidate().await;
        }
        if !status.is_success() {
            log::warn!("[Catalog] GET {} returned {}", url, status);
            return Err(CatalogError::Status(status.as_u16()));
        }

        let body = response.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }

    /// Fetches one page of a playlist's tracks and returns its items.
    pub async fn get_playlist(&self, playlist_id: &str) -> CatalogResult<Vec<PlaylistItem>> {
        let path = format!(
            "/playlists/{}/tracks?market={}&limit={}&fields={}",
            playlist_id, self.market, self.page_limit, PLAYLIST_TRACK_FIELDS
        );
        let page: Page<PlaylistItem> = self.get_json(&path).await?;

        log::info!(
            "[Catalog] Playlist {} returned {} item(s)",
            playlist_id,
            page.items.len()
        );
        Ok(page.items)
    }
}

#[async_trait]
impl PlaylistSource for CatalogClient {
    async fn playlist_tracks(&self, playlist_id: &str) -> CatalogResult<Vec<PlaylistItem>> {
        self.get_playlist(playlist_id).await
    }
}
