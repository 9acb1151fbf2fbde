use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::acquire::{AcquisitionEngine, ytdlp::YtDlp};
use crate::catalog::{CatalogResolver, spotify::SpotifyClient};
use crate::config;
use crate::pipeline::{Pipeline, events::RunEvent};
use crate::tagging::{Tagger, artwork::HttpArtwork, id3_store::Id3Store};

#[derive(Parser)]
#[command(name = "mpfree")]
#[command(version = "0.1")]
#[command(about = "Downloads Spotify tracks, albums and playlists as tagged MP3s")]
pub struct Cli {
    /// Path to the config TOML file
    #[arg(short, long, default_value = "mpfree.toml")]
    pub config: PathBuf,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Download a track, album or playlist
    Fetch {
        /// Spotify link or URI
        reference: String,
        /// Folder to save into, overrides the config
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
    /// Show what would be downloaded and where, without downloading
    Resolve {
        /// Spotify link or URI
        reference: String,
        /// Folder to save into, overrides the config
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
}

fn build_pipeline(cfg: &config::Config) -> anyhow::Result<Pipeline> {
    let credentials = cfg.spotify.credentials()?;
    let timeout = cfg.http.timeout();

    Ok(Pipeline::new(
        CatalogResolver::new(Box::new(SpotifyClient::new(credentials, timeout))),
        AcquisitionEngine::new(
            Box::new(YtDlp::new(cfg.download.ytdlp_path.clone())),
            cfg.download.audio_format(),
        ),
        Tagger::new(Box::new(Id3Store), Box::new(HttpArtwork::new(timeout))),
    ))
}

fn base_dir(cfg: &config::Config, out: &Option<PathBuf>) -> anyhow::Result<PathBuf> {
    match out.clone().or_else(|| cfg.download.base_dir.clone()) {
        Some(dir) => Ok(dir),
        None => bail!("No save folder: pass --out or set download.base_dir in the config"),
    }
}

/// Entrypoint for CLI
pub fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let cfg = config::Config::load_or_default(&cli.config)?;

    match &cli.command {
        Commands::Fetch { reference, out } => {
            let base_dir = base_dir(&cfg, out)?;
            let pipeline = build_pipeline(&cfg)?;

            println!("Saving into {}", base_dir.to_string_lossy());
            let mut handle = pipeline
                .spawn(reference.clone(), base_dir)
                .with_context(|| "Failed to start download worker")?;

            let mut aborted = None;
            for event in handle.by_ref() {
                match event {
                    RunEvent::Progress(progress) => println!("{progress}"),
                    RunEvent::Aborted(progress) => aborted = Some(progress.message),
                    RunEvent::Cancelled { summary } => {
                        println!(
                            "Cancelled, {} of {} downloaded",
                            summary.downloaded, summary.total
                        );
                    }
                    RunEvent::Done { progress, summary } => {
                        println!("{progress}");
                        println!(
                            "{} downloaded, {} failed, {} with incomplete tags",
                            summary.downloaded, summary.failed, summary.partially_tagged
                        );
                    }
                }
            }
            handle.join();

            if let Some(message) = aborted {
                bail!("{message}");
            }
        }

        Commands::Resolve { reference, out } => {
            let base_dir = base_dir(&cfg, out)?;
            let pipeline = build_pipeline(&cfg)?;

            let planned = pipeline.plan(reference, &base_dir)?;
            println!("{} tracks:", planned.len());
            for (i, entry) in planned.iter().enumerate() {
                println!("  {:>3}. {}", i + 1, entry.item.display_query);
                println!("       -> {}", entry.folder.to_string_lossy());
            }
        }
    }

    Ok(())
}
