use std::{io::Read, time::Duration};

use log::debug;

use crate::tagging::{ArtworkSource, error::TagError};

/// Covers larger than this are rejected
const MAX_ARTWORK_BYTES: u64 = 10 * 1024 * 1024;

/// Downloads cover images over HTTP
pub struct HttpArtwork {
    agent: ureq::Agent,
}

impl HttpArtwork {
    pub fn new(timeout: Duration) -> Self {
        Self {
            agent: ureq::AgentBuilder::new().timeout(timeout).build(),
        }
    }
}

impl ArtworkSource for HttpArtwork {
    fn fetch(&self, url: &str) -> Result<Vec<u8>, TagError> {
        debug!("GET {url}");
        let response = self.agent.get(url).call()?;
        read_capped(response.into_reader(), MAX_ARTWORK_BYTES)
    }
}

/// Reads the whole image, failing instead of truncating when it exceeds `limit`
fn read_capped(reader: impl Read, limit: u64) -> Result<Vec<u8>, TagError> {
    let mut data = Vec::new();
    reader.take(limit + 1).read_to_end(&mut data)?;
    if data.len() as u64 > limit {
        return Err(TagError::ArtworkTooLarge { limit });
    }
    Ok(data)
}

/// Guesses the image type from its magic bytes, JPEG unless it is clearly PNG
pub fn cover_mime(data: &[u8]) -> &'static str {
    if data.starts_with(&[0x89, b'P', b'N', b'G']) {
        "image/png"
    } else {
        "image/jpeg"
    }
}
