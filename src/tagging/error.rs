use thiserror::Error;

#[derive(Debug, Error)]
pub enum TagError {
    #[error("id3 error: {0}")]
    Id3(#[from] id3::Error),

    #[error("artwork download failed: {0}")]
    Artwork(#[from] Box<ureq::Error>),

    #[error("artwork is larger than {limit} bytes")]
    ArtworkTooLarge { limit: u64 },

    #[error("filesystem error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<ureq::Error> for TagError {
    fn from(err: ureq::Error) -> Self {
        TagError::Artwork(Box::new(err))
    }
}
