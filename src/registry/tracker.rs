//! Change tracking for loaded dialect sources.
//!
//! Hosts report file changes in batches through [`ChangeTracker::notify`].
//! Batches touching tracked paths are queued to a single worker thread that
//! reloads each affected source and swaps it into the registry, so updates
//! are applied in arrival order and never interleave. `notify` itself never
//! waits for a reload.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::thread::JoinHandle;
use std::time::Duration;

use indexmap::IndexSet;
use parking_lot::{Condvar, Mutex, RwLock};
use rustc_hash::FxHashMap;
use tokio_util::sync::CancellationToken;

use super::tree::{DialectRegistry, ProjectLoadObserver};
use crate::base::{ProjectKey, SourcePath};

/// Paths changed or removed since the last notification.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ChangeBatch {
    pub changed: Vec<PathBuf>,
    pub removed: Vec<PathBuf>,
}

impl ChangeBatch {
    pub fn changed(paths: impl IntoIterator<Item = impl Into<PathBuf>>) -> Self {
        Self {
            changed: paths.into_iter().map(Into::into).collect(),
            removed: Vec::new(),
        }
    }

    pub fn removed(paths: impl IntoIterator<Item = impl Into<PathBuf>>) -> Self {
        Self {
            changed: Vec::new(),
            removed: paths.into_iter().map(Into::into).collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.changed.is_empty() && self.removed.is_empty()
    }
}

/// Tracked file-system paths and the sources they back.
///
/// An archive path backs every entry loaded from it.
#[derive(Clone, Default)]
pub struct TrackedSources {
    paths: Arc<RwLock<FxHashMap<PathBuf, IndexSet<(ProjectKey, SourcePath)>>>>,
}

impl TrackedSources {
    /// Start tracking a source. Embedded sources cannot change and are not
    /// tracked. Returns whether the source was newly tracked.
    pub fn track(&self, project: &ProjectKey, source: &SourcePath) -> bool {
        let Some(path) = source.tracked_path() else {
            return false;
        };
        self.paths
            .write()
            .entry(path.to_path_buf())
            .or_default()
            .insert((project.clone(), source.clone()))
    }

    pub fn is_tracked(&self, path: &Path) -> bool {
        self.paths.read().contains_key(path)
    }

    /// Sources backed by the path.
    pub fn sources_for(&self, path: &Path) -> Vec<(ProjectKey, SourcePath)> {
        self.paths
            .read()
            .get(path)
            .map(|sources| sources.iter().cloned().collect())
            .unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.paths.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl ProjectLoadObserver for TrackedSources {
    fn project_loaded(&self, project: &ProjectKey, sources: &[SourcePath]) {
        for source in sources {
            self.track(project, source);
        }
    }
}

#[derive(Debug)]
struct Reload {
    project: ProjectKey,
    source: SourcePath,
    removed: bool,
}

/// Count of queued batches, for [`ChangeTracker::wait_until_idle`].
#[derive(Default)]
struct Pending {
    count: Mutex<usize>,
    idle: Condvar,
}

impl Pending {
    fn increment(&self) {
        *self.count.lock() += 1;
    }

    fn decrement(&self) {
        let mut count = self.count.lock();
        *count = count.saturating_sub(1);
        if *count == 0 {
            self.idle.notify_all();
        }
    }
}

/// Serialized reload queue for tracked dialect sources.
pub struct ChangeTracker {
    registry: Arc<DialectRegistry>,
    tracked: TrackedSources,
    sender: Mutex<Option<Sender<Vec<Reload>>>>,
    worker: Mutex<Option<(JoinHandle<()>, Receiver<()>)>>,
    pending: Arc<Pending>,
    cancel: CancellationToken,
    grace_period: Duration,
}

impl ChangeTracker {
    /// Start the worker and register for the registry's project loads.
    pub fn new(registry: Arc<DialectRegistry>) -> Self {
        let tracked = TrackedSources::default();
        registry.set_load_observer(Arc::new(tracked.clone()));

        let cancel = registry.cancellation().child_token();
        let pending = Arc::new(Pending::default());
        let grace_period = registry.config().shutdown_grace_period;

        let (tx, rx) = mpsc::channel::<Vec<Reload>>();
        let (done_tx, done_rx) = mpsc::channel();

        let worker = {
            let registry = registry.clone();
            let pending = pending.clone();
            let cancel = cancel.clone();
            std::thread::Builder::new()
                .name("dialect-change-tracker".into())
                .spawn(move || {
                    while let Ok(batch) = rx.recv() {
                        if !cancel.is_cancelled() {
                            apply_batch(&registry, &cancel, batch);
                        }
                        pending.decrement();
                    }
                    let _ = done_tx.send(());
                })
        };

        let (sender, worker) = match worker {
            Ok(handle) => (Some(tx), Some((handle, done_rx))),
            Err(e) => {
                tracing::error!("Could not start change tracker worker: {e}");
                (None, None)
            }
        };

        Self {
            registry,
            tracked,
            sender: Mutex::new(sender),
            worker: Mutex::new(worker),
            pending,
            cancel,
            grace_period,
        }
    }

    pub fn tracked(&self) -> &TrackedSources {
        &self.tracked
    }

    /// Track one source of a project.
    pub fn track(&self, project: &ProjectKey, source: &SourcePath) -> bool {
        self.tracked.track(project, source)
    }

    /// Queue reloads for every tracked source touched by the batch.
    ///
    /// Returns the number of sources queued. Untracked paths are ignored.
    pub fn notify(&self, batch: ChangeBatch) -> usize {
        let mut reloads = Vec::new();
        for (paths, removed) in [(&batch.changed, false), (&batch.removed, true)] {
            for path in paths {
                for (project, source) in self.tracked.sources_for(path) {
                    reloads.push(Reload {
                        project,
                        source,
                        removed,
                    });
                }
            }
        }

        if reloads.is_empty() {
            return 0;
        }
        let count = reloads.len();

        let sender = self.sender.lock();
        let Some(sender) = sender.as_ref() else {
            if self.cancel.is_cancelled() {
                tracing::debug!("Change tracker shut down; discarding {count} reloads");
                return 0;
            }
            // No worker thread; apply on the caller
            apply_batch(&self.registry, &self.cancel, reloads);
            return count;
        };

        self.pending.increment();
        if sender.send(reloads).is_err() {
            self.pending.decrement();
            tracing::debug!("Change tracker worker gone; discarding {count} reloads");
            return 0;
        }
        count
    }

    /// Block until every queued batch has been applied, or the timeout
    /// elapses. Returns whether the queue is idle.
    pub fn wait_until_idle(&self, timeout: Duration) -> bool {
        let mut count = self.pending.count.lock();
        if *count == 0 {
            return true;
        }
        let _ = self.pending.idle.wait_while_for(&mut count, |c| *c > 0, timeout);
        *count == 0
    }

    /// Drain the queue within the grace period, then cancel what is left.
    ///
    /// Reloads still in flight after cancellation finish reading but their
    /// results are discarded.
    pub fn shutdown(&self) {
        // Closing the channel lets the worker exit once drained
        self.sender.lock().take();

        let Some((handle, done)) = self.worker.lock().take() else {
            self.cancel.cancel();
            return;
        };

        match done.recv_timeout(self.grace_period) {
            Ok(()) | Err(RecvTimeoutError::Disconnected) => {
                let _ = handle.join();
            }
            Err(RecvTimeoutError::Timeout) => {
                tracing::warn!(
                    "Change tracker did not drain within {:?}; cancelling outstanding reloads",
                    self.grace_period
                );
            }
        }
        self.cancel.cancel();
    }
}

impl Drop for ChangeTracker {
    fn drop(&mut self) {
        self.sender.get_mut().take();
        self.cancel.cancel();
    }
}

fn apply_batch(registry: &DialectRegistry, cancel: &CancellationToken, batch: Vec<Reload>) {
    for reload in batch {
        if cancel.is_cancelled() {
            return;
        }

        let items = if reload.removed {
            tracing::info!("Dialect source {} removed", reload.source);
            None
        } else {
            tracing::info!("Reloading dialect source {}", reload.source);
            registry.reload_source(&reload.source)
        };

        if cancel.is_cancelled() {
            tracing::debug!("Discarding reload of {} after shutdown", reload.source);
            return;
        }
        registry.update_source(&reload.project, &reload.source, items);
    }
}
