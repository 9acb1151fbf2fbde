use std::{ffi::OsString, process::Command};

use log::{debug, info};

use crate::acquire::{AUDIO_CODEC, FetchRequest, MediaFetcher, error::AcquireError};

/// Searches YouTube and extracts audio through the `yt-dlp` executable (ffmpeg required)
pub struct YtDlp {
    program: String,
}

impl YtDlp {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    fn arguments(request: &FetchRequest) -> Vec<OsString> {
        let quality = format!("{}K", request.format.bitrate_kbps);
        let mut args: Vec<OsString> = [
            "--format",
            "bestaudio/best",
            "--no-playlist",
            "--quiet",
            "--no-warnings",
            "--extract-audio",
            "--audio-format",
            AUDIO_CODEC,
            "--audio-quality",
            quality.as_str(),
            "--output",
        ]
        .into_iter()
        .map(OsString::from)
        .collect();

        args.push(request.output_template.as_os_str().to_owned());
        // first search hit only
        args.push(format!("ytsearch1:{}", request.query).into());
        args
    }
}

impl MediaFetcher for YtDlp {
    fn fetch(&self, request: &FetchRequest) -> Result<(), AcquireError> {
        info!("Searching for '{}'", request.query);
        let output = Command::new(&self.program)
            .args(Self::arguments(request))
            .output()
            .map_err(|source| AcquireError::Spawn {
                program: self.program.clone(),
                source,
            })?;

        if !output.status.success() {
            return Err(AcquireError::Provider {
                query: request.query.to_string(),
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        debug!("{} finished for '{}'", self.program, request.query);
        Ok(())
    }
}
