/// Descriptive metadata of a track, as reported by the catalog
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackMetadata {
    pub title: String,
    pub artist: String,
    pub album: String,
    pub artwork: Option<ArtworkRef>,
}

/// Remote location of the album cover
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtworkRef(pub String);

/// One unit of pipeline work.
///
/// `display_query` is what gets searched for and shown in progress messages,
/// file names are derived from `metadata` later.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkItem {
    pub display_query: String,
    pub metadata: TrackMetadata,
}

impl WorkItem {
    pub fn new(metadata: TrackMetadata) -> Self {
        let display_query = format!("{} {}", metadata.title, metadata.artist);
        Self {
            display_query,
            metadata,
        }
    }
}

/// How downloaded files of one run are grouped on disk
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CollectionContext {
    /// `<base>/<artist>/<album>/`
    PerArtistAlbum,
    /// `<base>/<folder name>/`, the name is already sanitized
    NamedFolder(String),
}
