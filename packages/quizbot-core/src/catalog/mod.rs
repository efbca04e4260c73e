//! Music catalog access.
//!
//! # Module Structure
//!
//! - `token` - Client-credentials token source and the refreshing token cache
//! - `client` - Authenticated metadata requests (playlist tracks)
//! - `models` - Wire types returned by the catalog
//! - `link` - Recognition of shared catalog links
//! - `retry` - Fixed-delay retry loop used by token refresh

pub mod client;
pub mod link;
pub mod models;
pub(crate) mod retry;
pub mod token;

use thiserror::Error;

pub use client::{CatalogClient, PlaylistSource};
pub use link::{CatalogLink, LinkKind};
pub use models::{Page, PlaylistItem};
pub use token::{AccessToken, ClientCredentials, TokenCache, TokenSource};

// ─────────────────────────────────────────────────────────────────────────────
// Error Types
// ─────────────────────────────────────────────────────────────────────────────

/// Errors that can occur while talking to the catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The HTTP request itself failed (connect, timeout, body read).
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The API answered with a non-success status.
    #[error("http code: {0}")]
    Status(u16),

    /// The token endpoint refused to issue a token.
    #[error("failed to get token (response status {0}): {1}")]
    TokenRejected(u16, String),

    /// The response body could not be decoded.
    #[error("failed to decode catalog response: {0}")]
    Decode(#[from] serde_json::Error),
}

impl CatalogError {
    /// Returns the HTTP status carried by this error, if any.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status(code) | Self::TokenRejected(code, _) => Some(*code),
            Self::Http(e) => e.status().map(|s| s.as_u16()),
            Self::Decode(_) => None,
        }
    }
}

/// Convenient Result alias for catalog operations.
pub type CatalogResult<T> = Result<T, CatalogError>;
