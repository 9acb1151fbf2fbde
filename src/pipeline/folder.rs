use std::path::{Path, PathBuf};

use crate::domain::{sanitize::sanitize, track::CollectionContext, track::TrackMetadata};

/// Directory a track of the given collection ends up in
pub fn target_folder(
    base_dir: &Path,
    context: &CollectionContext,
    metadata: &TrackMetadata,
) -> PathBuf {
    match context {
        CollectionContext::NamedFolder(name) => base_dir.join(name),
        CollectionContext::PerArtistAlbum => base_dir
            .join(sanitize(&metadata.artist))
            .join(sanitize(&metadata.album)),
    }
}

/// Creates the folder and its parents, fine if it already exists
pub fn ensure_folder(path: &Path) -> std::io::Result<()> {
    std::fs::create_dir_all(path)
}
