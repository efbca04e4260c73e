//! Quiz tracks.

use serde::Serialize;

use crate::catalog::models::{CatalogTrack, PlaylistItem};

/// A playable quiz track.
///
/// Built once from catalog metadata and never modified afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Track {
    id: String,
    name: String,
    artist: String,
    artwork_url: Option<String>,
    preview_url: String,
}

impl Track {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        artist: impl Into<String>,
        artwork_url: Option<String>,
        preview_url: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            artist: artist.into(),
            artwork_url,
            preview_url: preview_url.into(),
        }
    }

    /// Converts catalog metadata into a quiz track.
    ///
    /// Returns `None` when the catalog has no preview for the track, since
    /// such tracks cannot be played in a quiz.
    #[must_use]
    pub fn from_catalog(track: &CatalogTrack) -> Option<Self> {
        let preview_url = track.preview_url.clone()?;
        let artist = track
            .artists
            .first()
            .map(|a| a.name.clone())
            .unwrap_or_default();
        let artwork_url = track
            .album
            .as_ref()
            .and_then(|album| album.images.first())
            .and_then(|image| image.url.clone());

        Some(Self {
            id: track.id.clone().unwrap_or_default(),
            name: track.name.clone(),
            artist,
            artwork_url,
            preview_url,
        })
    }

    /// Keeps the playlist entries that have a preview, in playlist order.
    #[must_use]
    pub fn playable(items: &[PlaylistItem]) -> Vec<Self> {
        items
            .iter()
            .filter_map(|item| item.track.as_ref())
            .filter_map(Self::from_catalog)
            .collect()
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn artist(&self) -> &str {
        &self.artist
    }

    pub fn artwork_url(&self) -> Option<&str> {
        self.artwork_url.as_deref()
    }

    pub fn preview_url(&self) -> &str {
        &self.preview_url
    }
}
