use std::path::PathBuf;

use thiserror::Error;

use crate::acquire::error::AcquireError;

/// Why a single item was dropped. Never aborts the run.
#[derive(Debug, Error)]
pub enum ItemError {
    #[error("cannot create folder {}: {source}", .path.to_string_lossy())]
    Folder {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("acquisition failed: {0}")]
    Acquire(#[from] AcquireError),

    #[error("cannot move {} into place: {source}", .path.to_string_lossy())]
    Rename {
        path: PathBuf,
        source: std::io::Error,
    },
}
