//! Expands catalog references into ordered work items

use log::{debug, info};
use serde::Deserialize;

use crate::{
    catalog::error::{CatalogError, ResolveError},
    domain::{
        reference::{CatalogReference, ReferenceKind},
        sanitize::sanitize,
        track::{ArtworkRef, CollectionContext, TrackMetadata, WorkItem},
    },
};

pub mod error;
pub mod spotify;

/// Number of playlist entries requested per page
pub const PLAYLIST_PAGE_SIZE: usize = 100;

const UNKNOWN_ARTIST: &str = "Unknown Artist";

/// Read-only access to a music catalog.
pub trait CatalogProvider {
    /// full record of a single track
    fn track(&self, id: &str) -> Result<TrackRecord, CatalogError>;

    /// ids of all tracks of an album, in album order
    fn album_track_ids(&self, id: &str) -> Result<Vec<String>, CatalogError>;

    /// display name of a playlist
    fn playlist_name(&self, id: &str) -> Result<String, CatalogError>;

    /// One page of playlist entries starting at `offset`.
    ///
    /// Entries without a playable track are `None`, an empty page means the end.
    fn playlist_page(
        &self,
        id: &str,
        offset: usize,
        limit: usize,
    ) -> Result<Vec<Option<TrackRecord>>, CatalogError>;
}

#[derive(Debug, Clone, Deserialize)]
pub struct TrackRecord {
    pub name: String,
    #[serde(default)]
    pub artists: Vec<ArtistRecord>,
    pub album: AlbumRecord,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ArtistRecord {
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AlbumRecord {
    pub name: String,
    #[serde(default)]
    pub images: Vec<ImageRecord>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ImageRecord {
    pub url: String,
}

impl TrackRecord {
    pub fn into_metadata(self) -> TrackMetadata {
        let artist = self
            .artists
            .into_iter()
            .next()
            .map(|a| a.name)
            .unwrap_or_else(|| UNKNOWN_ARTIST.to_string());
        let artwork = self
            .album
            .images
            .into_iter()
            .next()
            .map(|image| ArtworkRef(image.url));

        TrackMetadata {
            title: self.name,
            artist,
            album: self.album.name,
            artwork,
        }
    }
}

/// Result of expanding a reference: the work to do and how to lay it out on disk
#[derive(Debug)]
pub struct Resolved {
    pub items: Vec<WorkItem>,
    pub context: CollectionContext,
}

pub struct CatalogResolver {
    provider: Box<dyn CatalogProvider + Send>,
}

impl CatalogResolver {
    pub fn new(provider: Box<dyn CatalogProvider + Send>) -> Self {
        Self { provider }
    }

    /// Parses `reference` and resolves it
    pub fn resolve_str(&self, reference: &str) -> Result<Resolved, ResolveError> {
        let reference = CatalogReference::parse(reference)?;
        Ok(self.resolve(&reference)?)
    }

    pub fn resolve(&self, reference: &CatalogReference) -> Result<Resolved, CatalogError> {
        info!("Resolving {reference}");
        let resolved = match reference.kind {
            ReferenceKind::Item => Resolved {
                items: vec![WorkItem::new(self.provider.track(&reference.id)?.into_metadata())],
                context: CollectionContext::PerArtistAlbum,
            },
            ReferenceKind::Collection => Resolved {
                items: self.resolve_album(&reference.id)?,
                context: CollectionContext::PerArtistAlbum,
            },
            ReferenceKind::NamedOrderedCollection => self.resolve_playlist(&reference.id)?,
        };
        info!("Resolved {reference} into {} items", resolved.items.len());
        Ok(resolved)
    }

    fn resolve_album(&self, id: &str) -> Result<Vec<WorkItem>, CatalogError> {
        self.provider
            .album_track_ids(id)?
            .iter()
            .map(|track_id| Ok(WorkItem::new(self.provider.track(track_id)?.into_metadata())))
            .collect()
    }

    fn resolve_playlist(&self, id: &str) -> Result<Resolved, CatalogError> {
        let folder = sanitize(&self.provider.playlist_name(id)?);
        let context = if folder.is_empty() {
            debug!("playlist {id}: name is empty once sanitized, grouping by artist and album");
            CollectionContext::PerArtistAlbum
        } else {
            CollectionContext::NamedFolder(folder)
        };

        let mut items = Vec::new();
        let mut offset = 0;
        loop {
            let page = self.provider.playlist_page(id, offset, PLAYLIST_PAGE_SIZE)?;
            if page.is_empty() {
                break;
            }
            debug!("playlist {id}: page at offset {offset} has {} entries", page.len());

            for (position, record) in page.into_iter().enumerate() {
                match record {
                    Some(record) => items.push(WorkItem::new(record.into_metadata())),
                    None => debug!(
                        "playlist {id}: skipping entry {} without a track",
                        offset + position
                    ),
                }
            }
            offset += PLAYLIST_PAGE_SIZE;
        }

        Ok(Resolved { items, context })
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use std::{
        collections::HashMap,
        sync::{Arc, Mutex},
    };

    use super::*;

    pub(crate) fn record(
        title: &str,
        artist: &str,
        album: &str,
        artwork: Option<&str>,
    ) -> TrackRecord {
        TrackRecord {
            name: title.to_string(),
            artists: vec![ArtistRecord {
                name: artist.to_string(),
            }],
            album: AlbumRecord {
                name: album.to_string(),
                images: artwork
                    .map(|url| vec![ImageRecord { url: url.to_string() }])
                    .unwrap_or_default(),
            },
        }
    }

    /// In-memory catalog recording which playlist offsets were requested
    #[derive(Default, Clone)]
    pub(crate) struct FakeCatalog {
        pub tracks: HashMap<String, TrackRecord>,
        pub albums: HashMap<String, Vec<String>>,
        pub playlists: HashMap<String, (String, Vec<Option<TrackRecord>>)>,
        pub requested_offsets: Arc<Mutex<Vec<usize>>>,
    }

    impl CatalogProvider for FakeCatalog {
        fn track(&self, id: &str) -> Result<TrackRecord, CatalogError> {
            self.tracks
                .get(id)
                .cloned()
                .ok_or_else(|| CatalogError::NotFound(format!("track {id}")))
        }

        fn album_track_ids(&self, id: &str) -> Result<Vec<String>, CatalogError> {
            self.albums
                .get(id)
                .cloned()
                .ok_or_else(|| CatalogError::NotFound(format!("album {id}")))
        }

        fn playlist_name(&self, id: &str) -> Result<String, CatalogError> {
            self.playlists
                .get(id)
                .map(|(name, _)| name.clone())
                .ok_or_else(|| CatalogError::NotFound(format!("playlist {id}")))
        }

        fn playlist_page(
            &self,
            id: &str,
            offset: usize,
            limit: usize,
        ) -> Result<Vec<Option<TrackRecord>>, CatalogError> {
            self.requested_offsets.lock().unwrap().push(offset);
            let (_, entries) = self
                .playlists
                .get(id)
                .ok_or_else(|| CatalogError::NotFound(format!("playlist {id}")))?;
            Ok(entries.iter().skip(offset).take(limit).cloned().collect())
        }
    }

    fn playlist_of(n: usize) -> Vec<Option<TrackRecord>> {
        (0..n)
            .map(|i| Some(record(&format!("Song {i}"), "Artist", "Album", None)))
            .collect()
    }

    #[test]
    fn single_track_resolves_to_one_item() {
        let mut catalog = FakeCatalog::default();
        catalog.tracks.insert(
            "t1".into(),
            record("Windowlicker", "Aphex Twin", "Windowlicker", Some("http://img/1")),
        );
        let resolver = CatalogResolver::new(Box::new(catalog));

        let resolved = resolver.resolve_str("https://open.spotify.com/track/t1").unwrap();

        assert_eq!(resolved.context, CollectionContext::PerArtistAlbum);
        assert_eq!(resolved.items.len(), 1);
        let item = &resolved.items[0];
        assert_eq!(item.display_query, "Windowlicker Aphex Twin");
        assert_eq!(item.metadata.artwork, Some(ArtworkRef("http://img/1".into())));
    }

    #[test]
    fn album_keeps_membership_order() {
        let mut catalog = FakeCatalog::default();
        for (id, title) in [("c", "Third"), ("a", "First"), ("b", "Second")] {
            catalog.tracks.insert(id.into(), record(title, "Band", "LP", None));
        }
        catalog
            .albums
            .insert("lp".into(), vec!["a".into(), "b".into(), "c".into()]);
        let resolver = CatalogResolver::new(Box::new(catalog));

        let resolved = resolver.resolve_str("spotify:album:lp").unwrap();

        let titles: Vec<_> = resolved.items.iter().map(|i| i.metadata.title.as_str()).collect();
        assert_eq!(titles, vec!["First", "Second", "Third"]);
        assert_eq!(resolved.context, CollectionContext::PerArtistAlbum);
    }

    #[test]
    fn playlist_pages_until_empty_and_preserves_order() {
        let mut catalog = FakeCatalog::default();
        let entries = playlist_of(250);
        catalog
            .playlists
            .insert("pl".into(), ("Road: Trip?".into(), entries.clone()));
        let offsets = catalog.requested_offsets.clone();
        let resolver = CatalogResolver::new(Box::new(catalog));

        let resolved = resolver.resolve_str("https://open.spotify.com/playlist/pl").unwrap();

        assert_eq!(*offsets.lock().unwrap(), vec![0, 100, 200, 300]);
        let expected: Vec<_> = entries
            .into_iter()
            .flatten()
            .map(|r| WorkItem::new(r.into_metadata()))
            .collect();
        assert_eq!(resolved.items, expected);
        assert_eq!(
            resolved.context,
            CollectionContext::NamedFolder("Road Trip".into())
        );
    }

    #[test]
    fn playlist_skips_entries_without_track() {
        let mut catalog = FakeCatalog::default();
        let mut entries = playlist_of(150);
        entries[42] = None;
        catalog.playlists.insert("pl".into(), ("Mix".into(), entries));
        let resolver = CatalogResolver::new(Box::new(catalog));

        let resolved = resolver.resolve_str("spotify:playlist:pl").unwrap();

        assert_eq!(resolved.items.len(), 149);
        assert!(resolved.items.iter().all(|i| i.metadata.title != "Song 42"));
        assert_eq!(resolved.items[42].metadata.title, "Song 43");
    }

    #[test]
    fn playlist_with_unusable_name_groups_by_artist_and_album() {
        let mut catalog = FakeCatalog::default();
        catalog
            .playlists
            .insert("pl".into(), ("???".into(), playlist_of(3)));
        let resolver = CatalogResolver::new(Box::new(catalog));

        let resolved = resolver.resolve_str("spotify:playlist:pl").unwrap();

        assert_eq!(resolved.items.len(), 3);
        assert_eq!(resolved.context, CollectionContext::PerArtistAlbum);
    }

    #[test]
    fn unsupported_kind_produces_no_items() {
        let resolver = CatalogResolver::new(Box::new(FakeCatalog::default()));

        let err = resolver
            .resolve_str("https://open.spotify.com/artist/xyz")
            .unwrap_err();

        assert!(err.is_unsupported());
    }

    #[test]
    fn catalog_failure_is_not_reported_as_unsupported() {
        let resolver = CatalogResolver::new(Box::new(FakeCatalog::default()));

        let err = resolver.resolve_str("spotify:track:missing").unwrap_err();

        assert!(!err.is_unsupported());
    }

    #[test]
    fn missing_artist_and_artwork_fall_back() {
        let record = TrackRecord {
            name: "Untitled".into(),
            artists: vec![],
            album: AlbumRecord {
                name: "Demos".into(),
                images: vec![],
            },
        };

        let metadata = record.into_metadata();

        assert_eq!(metadata.artist, UNKNOWN_ARTIST);
        assert_eq!(metadata.artwork, None);
    }
}
