use anyhow::{Context, bail};
use serde::Deserialize;
use std::{
    path::{Path, PathBuf},
    time::Duration,
};

use crate::{acquire::AudioFormat, catalog::spotify::Credentials};

pub const CLIENT_ID_VAR: &str = "SPOTIFY_CLIENT_ID";
pub const CLIENT_SECRET_VAR: &str = "SPOTIFY_CLIENT_SECRET";

#[derive(Debug, Deserialize)]
pub struct Config {
    pub version: u32,
    #[serde(default)]
    pub spotify: SpotifyConfig,
    #[serde(default)]
    pub download: DownloadConfig,
    #[serde(default)]
    pub http: HttpConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: 1,
            spotify: Default::default(),
            download: Default::default(),
            http: Default::default(),
        }
    }
}

impl Config {
    pub fn load(path: &Path) -> anyhow::Result<Config> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.to_string_lossy()))?;
        toml::from_str(&contents).with_context(|| "Failed to parse config TOML")
    }

    /// Loads `path` if it exists, otherwise falls back to defaults
    pub fn load_or_default(path: &Path) -> anyhow::Result<Config> {
        if path.exists() {
            Self::load(path)
        } else {
            log::info!(
                "config {} not found, using defaults",
                path.to_string_lossy()
            );
            Ok(Config::default())
        }
    }
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct SpotifyConfig {
    pub client_id: Option<String>,
    pub client_secret: Option<String>,
}

impl SpotifyConfig {
    /// Credentials from the config, falling back to the environment
    pub fn credentials(&self) -> anyhow::Result<Credentials> {
        self.credentials_with(|name| std::env::var(name).ok())
    }

    fn credentials_with(
        &self,
        env: impl Fn(&str) -> Option<String>,
    ) -> anyhow::Result<Credentials> {
        let client_id = self.client_id.clone().or_else(|| env(CLIENT_ID_VAR));
        let client_secret = self.client_secret.clone().or_else(|| env(CLIENT_SECRET_VAR));

        match (client_id, client_secret) {
            (Some(client_id), Some(client_secret)) => Ok(Credentials {
                client_id,
                client_secret,
            }),
            _ => bail!(
                "Spotify credentials missing: set [spotify] in the config \
                 or {CLIENT_ID_VAR} and {CLIENT_SECRET_VAR}"
            ),
        }
    }
}

/// Output is always MP3, only the bitrate is configurable.
/// Unknown keys such as `audio_format` are rejected.
#[derive(Debug, Deserialize, Clone)]
#[serde(default, deny_unknown_fields)]
pub struct DownloadConfig {
    pub base_dir: Option<PathBuf>,
    pub ytdlp_path: String,
    pub bitrate_kbps: u32,
}

impl Default for DownloadConfig {
    fn default() -> Self {
        Self {
            base_dir: None,
            ytdlp_path: "yt-dlp".to_string(),
            bitrate_kbps: AudioFormat::default().bitrate_kbps,
        }
    }
}

impl DownloadConfig {
    pub fn audio_format(&self) -> AudioFormat {
        AudioFormat {
            bitrate_kbps: self.bitrate_kbps,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct HttpConfig {
    pub timeout_secs: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self { timeout_secs: 15 }
    }
}

impl HttpConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}
