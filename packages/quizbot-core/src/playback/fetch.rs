//! Preview audio download.

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::Client;

use super::{PlaybackError, PlaybackResult};

/// Downloads the complete preview clip of a track.
#[async_trait]
pub trait PreviewFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> PlaybackResult<Bytes>;
}

/// Fetches previews with the shared HTTP client.
///
/// No timeout is set beyond the client default.
#[derive(Clone)]
pub struct HttpPreviewFetcher {
    http: Client,
}

impl HttpPreviewFetcher {
    pub fn new(http: Client) -> Self {
        Self { http }
    }
}

#[async_trait]
impl PreviewFetcher for HttpPreviewFetcher {
    async fn fetch(&self, url: &str) -> PlaybackResult<Bytes> {
        let response = self.http.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            log::warn!("[Session] Preview {} returned {}", url, status);
            return Err(PlaybackError::FetchStatus(status.as_u16()));
        }
        Ok(response.bytes().await?)
    }
}
