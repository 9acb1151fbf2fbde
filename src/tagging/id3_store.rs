use std::path::Path;

use id3::{
    Tag, TagLike, Version,
    frame::{Picture, PictureType},
};
use log::debug;

use crate::tagging::{Cover, TagStore, TextTags, error::TagError};

/// ID3v2.3 is what older players and car stereos understand
const TAG_VERSION: Version = Version::Id3v23;

/// Reads and writes ID3 tags in place
#[derive(Debug, Default, Clone, Copy)]
pub struct Id3Store;

impl Id3Store {
    /// existing tag of the file, or an empty one if it has none or it cannot be read
    fn existing_or_empty(path: &Path) -> Tag {
        match Tag::read_from_path(path) {
            Ok(tag) => tag,
            Err(e) => {
                debug!("starting with empty tag for {}: {e}", path.to_string_lossy());
                Tag::new()
            }
        }
    }
}

impl TagStore for Id3Store {
    fn write_text(&self, path: &Path, tags: &TextTags) -> Result<(), TagError> {
        let mut tag = Self::existing_or_empty(path);
        if let Some(title) = &tags.title {
            tag.set_title(title);
        }
        if let Some(artist) = &tags.artist {
            tag.set_artist(artist);
        }
        if let Some(album) = &tags.album {
            tag.set_album(album);
        }
        tag.write_to_path(path, TAG_VERSION)?;
        Ok(())
    }

    fn embed_cover(&self, path: &Path, cover: &Cover) -> Result<(), TagError> {
        let mut tag = Self::existing_or_empty(path);
        tag.remove_picture_by_type(PictureType::CoverFront);
        tag.add_frame(Picture {
            mime_type: cover.mime_type.to_string(),
            picture_type: PictureType::CoverFront,
            description: "Cover".to_string(),
            data: cover.data.clone(),
        });
        tag.write_to_path(path, TAG_VERSION)?;
        Ok(())
    }
}
