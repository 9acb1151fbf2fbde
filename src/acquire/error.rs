use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AcquireError {
    #[error("failed to run {program}: {source}")]
    Spawn {
        program: String,
        source: std::io::Error,
    },

    #[error("search for '{query}' failed ({status}): {stderr}")]
    Provider {
        query: String,
        status: String,
        stderr: String,
    },

    #[error("expected output {} is missing or empty", .0.to_string_lossy())]
    MissingOutput(PathBuf),
}
