//! Wire types returned by the catalog Web API.
//!
//! Requests use a field selector, so most fields are optional or defaulted:
//! the API omits everything that was not asked for.

use serde::Deserialize;

/// Generic paged envelope used by list endpoints.
#[derive(Debug, Clone, Deserialize)]
pub struct Page<T> {
    #[serde(default)]
    pub href: Option<String>,
    #[serde(default = "Vec::new")]
    pub items: Vec<T>,
    #[serde(default)]
    pub limit: u32,
    #[serde(default)]
    pub next: Option<String>,
    #[serde(default)]
    pub offset: u32,
    #[serde(default)]
    pub previous: Option<String>,
    #[serde(default)]
    pub total: u32,
}

/// One entry of a playlist's track list.
#[derive(Debug, Clone, Deserialize)]
pub struct PlaylistItem {
    /// `null` for entries whose track was removed from the catalog.
    #[serde(default)]
    pub track: Option<CatalogTrack>,
}

/// Track metadata as returned by the catalog.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CatalogTrack {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub artists: Vec<Artist>,
    #[serde(default)]
    pub album: Option<Album>,
    /// Short audio clip URL; `null` when the catalog has no preview.
    #[serde(default)]
    pub preview_url: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Artist {
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Album {
    #[serde(default)]
    pub images: Vec<Image>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Image {
    #[serde(default)]
    pub url: Option<String>,
}
