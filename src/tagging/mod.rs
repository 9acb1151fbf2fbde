//! Best-effort tagging of downloaded files

use std::path::Path;

use log::{debug, warn};

use crate::{
    domain::track::TrackMetadata,
    tagging::{artwork::cover_mime, error::TagError},
};

pub mod artwork;
pub mod error;
pub mod id3_store;

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct TextTags {
    pub title: Option<String>,
    pub artist: Option<String>,
    pub album: Option<String>,
}

#[derive(Debug, Clone)]
pub struct Cover {
    pub mime_type: &'static str,
    pub data: Vec<u8>,
}

/// Read-modify-write access to the metadata container of an audio file
pub trait TagStore {
    /// Sets the given text fields, keeping everything else in the container.
    /// A missing or unreadable container is replaced with a fresh one.
    fn write_text(&self, path: &Path, tags: &TextTags) -> Result<(), TagError>;

    /// Replaces the front cover picture
    fn embed_cover(&self, path: &Path, cover: &Cover) -> Result<(), TagError>;
}

pub trait ArtworkSource {
    fn fetch(&self, url: &str) -> Result<Vec<u8>, TagError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoverOutcome {
    Embedded,
    NoArtwork,
    FetchFailed,
    EmbedFailed,
}

/// What the tagger managed to do for one file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TagOutcome {
    pub text_written: bool,
    pub cover: CoverOutcome,
}

impl TagOutcome {
    pub fn is_complete(&self) -> bool {
        self.text_written
            && matches!(self.cover, CoverOutcome::Embedded | CoverOutcome::NoArtwork)
    }
}

pub struct Tagger {
    store: Box<dyn TagStore + Send>,
    artwork: Box<dyn ArtworkSource + Send>,
}

impl Tagger {
    pub fn new(store: Box<dyn TagStore + Send>, artwork: Box<dyn ArtworkSource + Send>) -> Self {
        Self { store, artwork }
    }

    /// Writes title, artist and album, then embeds the cover if there is one.
    ///
    /// Never fails: every problem is logged and reported in the outcome,
    /// and the file keeps whatever was written before the failure.
    pub fn tag(&self, path: &Path, metadata: &TrackMetadata) -> TagOutcome {
        let text = TextTags {
            title: Some(metadata.title.clone()),
            artist: Some(metadata.artist.clone()),
            album: Some(metadata.album.clone()),
        };
        let text_written = match self.store.write_text(path, &text) {
            Ok(()) => true,
            Err(e) => {
                warn!("failed to write tags to {}: {e}", path.to_string_lossy());
                false
            }
        };

        let cover = match &metadata.artwork {
            None => CoverOutcome::NoArtwork,
            Some(artwork) => match self.artwork.fetch(&artwork.0) {
                Err(e) => {
                    warn!("failed to download cover for '{}': {e}", metadata.title);
                    CoverOutcome::FetchFailed
                }
                Ok(data) => {
                    let cover = Cover {
                        mime_type: cover_mime(&data),
                        data,
                    };
                    match self.store.embed_cover(path, &cover) {
                        Ok(()) => CoverOutcome::Embedded,
                        Err(e) => {
                            warn!("failed to embed cover into {}: {e}", path.to_string_lossy());
                            CoverOutcome::EmbedFailed
                        }
                    }
                }
            },
        };

        debug!("tagged {}: text={text_written}, cover={cover:?}", path.to_string_lossy());
        TagOutcome { text_written, cover }
    }
}
