//! Runs a pipeline on its own thread and streams events back to the caller

use std::{
    path::PathBuf,
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
        mpsc::{self, Receiver},
    },
    thread::{self, JoinHandle},
};

use log::{debug, error};

use crate::pipeline::{Pipeline, events::RunEvent};

/// Events buffered before the worker waits for the caller to catch up
pub const EVENT_CHANNEL_CAPACITY: usize = 16;

/// Cooperative cancellation flag, checked by the pipeline before every item
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Caller side of a running pipeline.
///
/// Iterating yields events in order and ends once the worker is finished.
pub struct RunHandle {
    events: Receiver<RunEvent>,
    cancel: CancelToken,
    worker: Option<JoinHandle<()>>,
}

impl RunHandle {
    /// Stops listening and waits for the worker thread to exit.
    ///
    /// A worker that is still downloading finishes its current item
    /// and stops before the next one.
    pub fn join(self) {
        let RunHandle {
            events,
            cancel,
            worker,
        } = self;
        cancel.cancel();
        drop(events);
        if let Some(worker) = worker {
            if worker.join().is_err() {
                error!("pipeline worker panicked");
            }
        }
    }
}

impl Iterator for RunHandle {
    type Item = RunEvent;

    fn next(&mut self) -> Option<Self::Item> {
        self.events.recv().ok()
    }
}

impl Pipeline {
    /// Starts the pipeline on a dedicated worker thread
    pub fn spawn(self, reference: String, base_dir: PathBuf) -> std::io::Result<RunHandle> {
        let (tx, rx) = mpsc::sync_channel(EVENT_CHANNEL_CAPACITY);
        let cancel = CancelToken::new();
        let worker_cancel = cancel.clone();

        let worker = thread::Builder::new()
            .name("pipeline-worker".to_string())
            .spawn(move || {
                self.run(&reference, &base_dir, &worker_cancel, |event| {
                    if tx.send(event).is_err() {
                        // nobody is listening anymore, stop downloading
                        debug!("event receiver dropped, cancelling run");
                        worker_cancel.cancel();
                    }
                });
            })?;

        Ok(RunHandle {
            events: rx,
            cancel,
            worker: Some(worker),
        })
    }
}
