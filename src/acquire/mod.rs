//! Finds audio for a search query and materializes it next to its final location

use std::path::{Path, PathBuf};

use log::{debug, warn};

use crate::acquire::error::AcquireError;

pub mod error;
pub mod ytdlp;

/// Placeholder the fetcher replaces with the produced file extension
pub const EXT_PLACEHOLDER: &str = "%(ext)s";

/// Codec every download is transcoded to, also the file extension.
/// Tags are written as ID3, so nothing else is offered.
pub const AUDIO_CODEC: &str = "mp3";

/// Target encoding of downloaded audio
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioFormat {
    pub bitrate_kbps: u32,
}

impl Default for AudioFormat {
    fn default() -> Self {
        Self { bitrate_kbps: 192 }
    }
}

#[derive(Debug)]
pub struct FetchRequest<'a> {
    pub query: &'a str,
    /// output path containing [`EXT_PLACEHOLDER`]
    pub output_template: &'a Path,
    pub format: &'a AudioFormat,
}

/// Search-and-fetch provider: takes the first search hit for a query
/// and writes it transcoded to `output_template`.
pub trait MediaFetcher {
    fn fetch(&self, request: &FetchRequest) -> Result<(), AcquireError>;
}

pub struct AcquisitionEngine {
    fetcher: Box<dyn MediaFetcher + Send>,
    format: AudioFormat,
}

impl AcquisitionEngine {
    pub fn new(fetcher: Box<dyn MediaFetcher + Send>, format: AudioFormat) -> Self {
        Self { fetcher, format }
    }

    /// Downloads the best match for `query` into `target_folder`.
    ///
    /// Returns the temporary file path, the caller is responsible for moving it
    /// to the final name. On failure nothing is left behind.
    pub fn acquire(
        &self,
        query: &str,
        target_folder: &Path,
        sanitized_title: &str,
    ) -> Result<PathBuf, AcquireError> {
        let template = target_folder.join(format!("temp_{sanitized_title}.{EXT_PLACEHOLDER}"));
        let output = target_folder.join(format!("temp_{sanitized_title}.{AUDIO_CODEC}"));

        // a leftover from an earlier run would make the fetcher skip the download
        remove_leftover(&output);

        let request = FetchRequest {
            query,
            output_template: &template,
            format: &self.format,
        };
        debug!("fetching '{query}' into {}", template.to_string_lossy());

        if let Err(e) = self.fetcher.fetch(&request) {
            remove_leftover(&output);
            return Err(e);
        }

        if !is_valid_audio_file(&output) {
            remove_leftover(&output);
            return Err(AcquireError::MissingOutput(output));
        }

        Ok(output)
    }
}

fn remove_leftover(path: &Path) {
    if path.exists() {
        if let Err(e) = std::fs::remove_file(path) {
            warn!("could not remove {}: {e}", path.to_string_lossy());
        }
    }
}

/// Best-effort check that the fetcher really produced something:
/// the path exists, is a regular file and is not empty.
pub fn is_valid_audio_file(path: &Path) -> bool {
    match std::fs::metadata(path) {
        Ok(meta) => meta.is_file() && meta.len() > 0,
        Err(_) => false,
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use std::{
        collections::HashSet,
        sync::{Arc, Mutex},
    };

    use tempfile::TempDir;

    use super::*;

    /// Writes fake audio for every query except the failing ones
    #[derive(Default, Clone)]
    pub(crate) struct FakeFetcher {
        pub failing_queries: HashSet<String>,
        pub produce_nothing: bool,
        pub queries: Arc<Mutex<Vec<String>>>,
    }

    impl MediaFetcher for FakeFetcher {
        fn fetch(&self, request: &FetchRequest) -> Result<(), AcquireError> {
            self.queries.lock().unwrap().push(request.query.to_string());
            if self.failing_queries.contains(request.query) {
                return Err(AcquireError::Provider {
                    query: request.query.to_string(),
                    status: "exit status: 1".into(),
                    stderr: "ERROR: no results".into(),
                });
            }
            if self.produce_nothing {
                return Ok(());
            }
            let path = request
                .output_template
                .to_string_lossy()
                .replace(EXT_PLACEHOLDER, AUDIO_CODEC);
            std::fs::write(path, format!("audio for {}", request.query)).unwrap();
            Ok(())
        }
    }

    #[test]
    fn acquire_returns_temporary_file() {
        let dir = TempDir::new().unwrap();
        let engine =
            AcquisitionEngine::new(Box::new(FakeFetcher::default()), AudioFormat::default());

        let path = engine.acquire("Song Artist", dir.path(), "Song").unwrap();

        assert_eq!(path, dir.path().join("temp_Song.mp3"));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "audio for Song Artist");
    }

    #[test]
    fn provider_failure_leaves_nothing_behind() {
        let dir = TempDir::new().unwrap();
        let stale = dir.path().join("temp_Song.mp3");
        std::fs::write(&stale, b"stale").unwrap();

        let fetcher = FakeFetcher {
            failing_queries: HashSet::from(["Song Artist".to_string()]),
            ..Default::default()
        };
        let engine = AcquisitionEngine::new(Box::new(fetcher), AudioFormat::default());

        let err = engine.acquire("Song Artist", dir.path(), "Song").unwrap_err();

        assert!(matches!(err, AcquireError::Provider { .. }));
        assert!(!stale.exists());
    }

    #[test]
    fn missing_output_is_a_failure() {
        let dir = TempDir::new().unwrap();
        let fetcher = FakeFetcher {
            produce_nothing: true,
            ..Default::default()
        };
        let engine = AcquisitionEngine::new(Box::new(fetcher), AudioFormat::default());

        let err = engine.acquire("Song Artist", dir.path(), "Song").unwrap_err();

        let expected = dir.path().join("temp_Song.mp3");
        assert!(matches!(err, AcquireError::MissingOutput(p) if p == expected));
    }

    #[test]
    fn empty_file_is_not_valid_audio() {
        let dir = TempDir::new().unwrap();
        let empty = dir.path().join("empty.mp3");
        std::fs::write(&empty, b"").unwrap();

        assert!(!is_valid_audio_file(&empty));
        assert!(!is_valid_audio_file(dir.path()));
        assert!(!is_valid_audio_file(&dir.path().join("absent.mp3")));
    }
}
