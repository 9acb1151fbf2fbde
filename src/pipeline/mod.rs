//! Resolve-then-materialize pipeline
//!
//! A run first expands the reference into the complete list of work items,
//! then downloads, tags and moves each item into place, strictly one at a time.
//! Per-item failures are logged and counted but never stop the run.

use std::path::{Path, PathBuf};

use log::{info, warn};

use crate::{
    acquire::{AUDIO_CODEC, AcquisitionEngine},
    catalog::{CatalogResolver, Resolved, error::ResolveError},
    domain::{
        sanitize::sanitize,
        track::{CollectionContext, WorkItem},
    },
    pipeline::{
        error::ItemError,
        events::{COMPLETE_MESSAGE, ProgressEvent, RunEvent, RunSummary, UNSUPPORTED_MESSAGE},
        folder::{ensure_folder, target_folder},
    },
    tagging::{TagOutcome, Tagger},
};

pub mod error;
pub mod events;
pub mod folder;
pub mod worker;

pub use worker::{CancelToken, RunHandle};

/// A work item together with the folder it will be saved to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedItem {
    pub item: WorkItem,
    pub folder: PathBuf,
}

/// Successful result of one item
#[derive(Debug)]
struct Materialized {
    path: PathBuf,
    tags: TagOutcome,
}

pub struct Pipeline {
    resolver: CatalogResolver,
    engine: AcquisitionEngine,
    tagger: Tagger,
}

impl Pipeline {
    pub fn new(resolver: CatalogResolver, engine: AcquisitionEngine, tagger: Tagger) -> Self {
        Self {
            resolver,
            engine,
            tagger,
        }
    }

    /// Resolves `reference` and computes where every item would be saved, without downloading
    pub fn plan(&self, reference: &str, base_dir: &Path) -> Result<Vec<PlannedItem>, ResolveError> {
        let Resolved { items, context } = self.resolver.resolve_str(reference)?;
        Ok(items
            .into_iter()
            .map(|item| PlannedItem {
                folder: target_folder(base_dir, &context, &item.metadata),
                item,
            })
            .collect())
    }

    /// Runs the whole pipeline on the calling thread.
    ///
    /// Events are handed to `emit` in order: one `Progress` per item, then `Done`.
    /// A reference that cannot be resolved yields a single `Aborted` instead.
    /// `cancel` is checked before every item.
    pub fn run(
        &self,
        reference: &str,
        base_dir: &Path,
        cancel: &CancelToken,
        mut emit: impl FnMut(RunEvent),
    ) {
        let Resolved { items, context } = match self.resolver.resolve_str(reference) {
            Ok(resolved) => resolved,
            Err(e) => {
                warn!("cannot resolve '{reference}': {e}");
                let message = if e.is_unsupported() {
                    UNSUPPORTED_MESSAGE.to_string()
                } else {
                    format!("Failed to resolve {reference}: {e}")
                };
                emit(RunEvent::Aborted(ProgressEvent::new(0, message)));
                return;
            }
        };

        let total = items.len();
        let mut summary = RunSummary {
            total,
            ..Default::default()
        };

        for (index, item) in items.iter().enumerate() {
            if cancel.is_cancelled() {
                info!("run cancelled after {index} of {total} items");
                emit(RunEvent::Cancelled { summary });
                return;
            }

            emit(RunEvent::Progress(ProgressEvent::for_item(
                index + 1,
                total,
                &item.display_query,
            )));

            match self.materialize(item, base_dir, &context) {
                Ok(done) => {
                    info!("saved {}", done.path.to_string_lossy());
                    summary.downloaded += 1;
                    if !done.tags.is_complete() {
                        summary.partially_tagged += 1;
                    }
                }
                Err(e) => {
                    warn!("skipping '{}': {e}", item.display_query);
                    summary.failed += 1;
                }
            }
        }

        info!(
            "run finished: {} downloaded, {} failed of {total}",
            summary.downloaded, summary.failed
        );
        emit(RunEvent::Done {
            progress: ProgressEvent::new(100, COMPLETE_MESSAGE),
            summary,
        });
    }

    /// folder, download, tag, move into place
    fn materialize(
        &self,
        item: &WorkItem,
        base_dir: &Path,
        context: &CollectionContext,
    ) -> Result<Materialized, ItemError> {
        let folder = target_folder(base_dir, context, &item.metadata);
        ensure_folder(&folder).map_err(|source| ItemError::Folder {
            path: folder.clone(),
            source,
        })?;

        let title = sanitize(&item.metadata.title);
        let temp = self.engine.acquire(&item.display_query, &folder, &title)?;

        let tags = self.tagger.tag(&temp, &item.metadata);

        let path = folder.join(format!("{title}.{AUDIO_CODEC}"));
        if path.exists() {
            warn!("replacing existing file {}", path.to_string_lossy());
        }
        std::fs::rename(&temp, &path).map_err(|source| ItemError::Rename {
            path: path.clone(),
            source,
        })?;

        Ok(Materialized { path, tags })
    }
}
