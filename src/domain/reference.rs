use std::{fmt::Display, str::FromStr};

use thiserror::Error;

/// What a catalog reference points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReferenceKind {
    /// a single track
    Item,
    /// an album
    Collection,
    /// a playlist
    NamedOrderedCollection,
}

impl ReferenceKind {
    fn from_segment(segment: &str) -> Option<Self> {
        match segment {
            "track" => Some(Self::Item),
            "album" => Some(Self::Collection),
            "playlist" => Some(Self::NamedOrderedCollection),
            _ => None,
        }
    }
}

impl Display for ReferenceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ReferenceKind::Item => "track",
            ReferenceKind::Collection => "album",
            ReferenceKind::NamedOrderedCollection => "playlist",
        };
        write!(f, "{s}")
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ReferenceError {
    #[error("unsupported reference kind '{0}'")]
    UnsupportedKind(String),

    #[error("malformed reference '{0}'")]
    Malformed(String),
}

/// Parsed catalog reference, e.g. `https://open.spotify.com/album/<id>?si=...`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogReference {
    pub kind: ReferenceKind,
    pub id: String,
}

impl CatalogReference {
    /// Accepts web links (`.../<kind>/<id>?query`) and URIs (`spotify:<kind>:<id>`).
    ///
    /// The segment right before the trailing identifier decides the kind.
    pub fn parse(reference: &str) -> Result<Self, ReferenceError> {
        let trimmed = reference.trim();
        let malformed = || ReferenceError::Malformed(trimmed.to_string());

        let without_query = trimmed.split(['?', '#']).next().unwrap_or_default();
        let path = without_query.trim_end_matches('/');

        let separator = if path.contains('/') { '/' } else { ':' };
        let mut segments = path.rsplit(separator);

        let id = segments.next().filter(|s| !s.is_empty()).ok_or_else(malformed)?;
        let kind = segments.next().filter(|s| !s.is_empty()).ok_or_else(malformed)?;

        let kind = ReferenceKind::from_segment(kind)
            .ok_or_else(|| ReferenceError::UnsupportedKind(kind.to_string()))?;

        Ok(Self {
            kind,
            id: id.to_string(),
        })
    }
}

impl FromStr for CatalogReference {
    type Err = ReferenceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Display for CatalogReference {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.kind, self.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_track_link_and_strips_query() {
        let r = CatalogReference::parse(
            "https://open.spotify.com/track/4uLU6hMCjMI75M1A2tKUQC?si=abc123",
        )
        .unwrap();
        assert_eq!(r.kind, ReferenceKind::Item);
        assert_eq!(r.id, "4uLU6hMCjMI75M1A2tKUQC");
    }

    #[test]
    fn parses_album_and_playlist_links() {
        let album =
            CatalogReference::parse("https://open.spotify.com/album/1DFixLWuPkv3KT3TnV35m3")
                .unwrap();
        assert_eq!(album.kind, ReferenceKind::Collection);

        let link = "https://open.spotify.com/intl-de/playlist/37i9dQZF1DXcBWIGoYBM5M/";
        let playlist: CatalogReference = link.parse().unwrap();
        assert_eq!(playlist.kind, ReferenceKind::NamedOrderedCollection);
        assert_eq!(playlist.id, "37i9dQZF1DXcBWIGoYBM5M");
    }

    #[test]
    fn parses_uri_form() {
        let r = CatalogReference::parse("spotify:playlist:37i9dQZF1DXcBWIGoYBM5M").unwrap();
        assert_eq!(r.kind, ReferenceKind::NamedOrderedCollection);
        assert_eq!(r.id, "37i9dQZF1DXcBWIGoYBM5M");
    }

    #[test]
    fn artist_link_is_unsupported_not_a_crash() {
        let err = CatalogReference::parse("https://open.spotify.com/artist/0OdUWJ0sBjDrqHygGUXeCF")
            .unwrap_err();
        assert_eq!(err, ReferenceError::UnsupportedKind("artist".to_string()));
    }

    #[test]
    fn bare_identifier_is_malformed() {
        assert!(matches!(
            CatalogReference::parse("4uLU6hMCjMI75M1A2tKUQC"),
            Err(ReferenceError::Malformed(_))
        ));
        assert!(matches!(
            CatalogReference::parse(""),
            Err(ReferenceError::Malformed(_))
        ));
    }
}
