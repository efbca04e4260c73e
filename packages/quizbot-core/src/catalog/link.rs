//! Recognition of shared catalog links.
//!
//! Links look like `https://open.spotify.com/{type}/{id}`, optionally without
//! scheme, with `www.`, or with a legacy `user/{name}/` segment.

use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use regex::Regex;

/// Kind of catalog resource a link points to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LinkKind {
    Track,
    Album,
    Playlist,
    Artist,
}

impl LinkKind {
    /// Path segment used by the catalog for this kind.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Track => "track",
            Self::Album => "album",
            Self::Playlist => "playlist",
            Self::Artist => "artist",
        }
    }
}

impl fmt::Display for LinkKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LinkKind {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "track" => Ok(Self::Track),
            "album" => Ok(Self::Album),
            "playlist" => Ok(Self::Playlist),
            "artist" => Ok(Self::Artist),
            _ => Err(()),
        }
    }
}

/// A parsed catalog link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogLink {
    pub kind: LinkKind,
    pub id: String,
}

fn link_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r"(https?://)?(www\.)?open\.spotify\.com/(user/[\w-]+/)?(?P<type>track|album|playlist|artist)/(?P<identifier>[\w-]+)",
        )
        .expect("catalog link pattern is valid")
    })
}

impl CatalogLink {
    /// Finds the first catalog link in `input`.
    ///
    /// Returns `None` when nothing in the input looks like a catalog link.
    #[must_use]
    pub fn parse(input: &str) -> Option<Self> {
        let captures = link_regex().captures(input)?;
        let kind = captures.name("type")?.as_str().parse().ok()?;
        let id = captures.name("identifier")?.as_str().to_string();
        Some(Self { kind, id })
    }
}
