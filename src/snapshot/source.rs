//! Snapshot sources and the background poller that feeds the UI loop.
//!
//! The poller runs on its own thread and hands each complete snapshot (or the
//! source's failure) to the UI thread through a bounded channel. Source
//! failures are the source's business: they are reported, never retried here
//! beyond the next tick.

use std::fs;
use std::path::{Path, PathBuf};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crossbeam_channel::{Receiver, Sender, TryRecvError, bounded, select, tick};

use super::Snapshot;
use crate::core::errors::{QtopError, Result};

/// Outcome of one poll, as delivered to the UI loop.
pub type PollResult = Result<Snapshot>;

/// Something that can produce the current snapshot on demand.
pub trait SnapshotSource: Send {
    /// Produce the current snapshot.
    fn poll(&mut self) -> Result<Snapshot>;

    /// Short human label for status lines and logs.
    fn describe(&self) -> String;
}

/// Reads a JSON snapshot file written by an external collector.
#[derive(Debug, Clone)]
pub struct JsonFileSource {
    path: PathBuf,
}

impl JsonFileSource {
    #[must_use]
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SnapshotSource for JsonFileSource {
    fn poll(&mut self) -> Result<Snapshot> {
        let raw = fs::read_to_string(&self.path).map_err(|source| QtopError::io(&self.path, source))?;
        Snapshot::from_json_str(&raw).map_err(|error| match error {
            QtopError::Serialization { details, .. } => QtopError::SnapshotDecode {
                path: self.path.clone(),
                details,
            },
            other => other,
        })
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

/// Handle to a running poller thread. Dropping it stops the thread.
pub struct Poller {
    snapshots: Receiver<PollResult>,
    stop: Option<Sender<()>>,
    handle: Option<JoinHandle<()>>,
}

impl Poller {
    /// Start polling `source` immediately and then once per `interval`.
    pub fn spawn(mut source: Box<dyn SnapshotSource>, interval: Duration) -> Self {
        // Capacity 1: the poller waits on a slow UI instead of queueing stale snapshots.
        let (tx, rx) = bounded::<PollResult>(1);
        let (stop_tx, stop_rx) = bounded::<()>(0);

        let handle = thread::spawn(move || {
            let ticker = tick(interval);
            loop {
                if matches!(stop_rx.try_recv(), Err(TryRecvError::Disconnected)) {
                    return;
                }
                let result = source.poll();
                select! {
                    send(tx, result) -> sent => {
                        if sent.is_err() {
                            return;
                        }
                    }
                    recv(stop_rx) -> _ => return,
                }
                select! {
                    recv(ticker) -> _ => {}
                    recv(stop_rx) -> _ => return,
                }
            }
        });

        Self {
            snapshots: rx,
            stop: Some(stop_tx),
            handle: Some(handle),
        }
    }

    /// Next pending poll result, without blocking.
    pub fn try_next(&self) -> Option<PollResult> {
        self.snapshots.try_recv().ok()
    }

    /// Block until the next poll result arrives or the poller exits.
    pub fn recv_timeout(&self, timeout: Duration) -> Option<PollResult> {
        self.snapshots.recv_timeout(timeout).ok()
    }
}

impl Drop for Poller {
    fn drop(&mut self) {
        // Disconnecting the stop channel wakes the thread wherever it waits.
        drop(self.stop.take());
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}
