//! Project dependency scanning.
//!
//! Every [`ResourceGroup`] is scanned as one task on a bounded worker pool.
//! A candidate is accepted only when it is an XML document whose root element
//! is bound to the dialect schema namespace, which means each candidate has to
//! be opened and read up to its root start tag.

use std::path::Path;
use std::sync::mpsc::{self, RecvTimeoutError};
use std::time::{Duration, Instant};

use tokio_util::sync::CancellationToken;
use walkdir::WalkDir;

use super::locator::{
    DialectLocator, DialectSource, ResourceGroup, is_archive, is_definition_candidate,
    read_archive_candidates,
};
use crate::base::{AssistConfig, SourcePath};
use crate::dialect::is_dialect_definition;

/// Locates dialect definitions among a project's dependency resources.
pub struct ProjectDependencyLocator {
    groups: Vec<ResourceGroup>,
    workers: usize,
    grace_period: Duration,
    cancel: CancellationToken,
}

impl ProjectDependencyLocator {
    pub fn new(groups: Vec<ResourceGroup>) -> Self {
        Self::from_config(groups, &AssistConfig::default())
    }

    pub fn from_config(groups: Vec<ResourceGroup>, config: &AssistConfig) -> Self {
        Self {
            groups,
            workers: config.scan_worker_count(),
            grace_period: config.scan_grace_period,
            cancel: CancellationToken::new(),
        }
    }

    /// Ties the scan to an outer cancellation token (host shutdown).
    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    fn scan_sequentially(&self, cancel: &CancellationToken) -> Vec<DialectSource> {
        self.groups
            .iter()
            .flat_map(|group| scan_group(group, cancel))
            .collect()
    }
}

impl DialectLocator for ProjectDependencyLocator {
    fn locate(&self) -> Vec<DialectSource> {
        if self.groups.is_empty() || self.cancel.is_cancelled() {
            return Vec::new();
        }

        let start = Instant::now();
        let scan_cancel = self.cancel.child_token();

        let pool = match rayon::ThreadPoolBuilder::new()
            .num_threads(self.workers.min(self.groups.len()).max(1))
            .thread_name(|i| format!("dialect-scan-{i}"))
            .build()
        {
            Ok(pool) => pool,
            Err(e) => {
                tracing::warn!("Could not start scan workers, scanning on caller thread: {e}");
                return self.scan_sequentially(&scan_cancel);
            }
        };

        let (tx, rx) = mpsc::channel();
        for (index, group) in self.groups.iter().cloned().enumerate() {
            let tx = tx.clone();
            let cancel = scan_cancel.clone();
            pool.spawn(move || {
                if cancel.is_cancelled() {
                    return;
                }
                let sources = scan_group(&group, &cancel);
                // Receiver gone means the scan timed out
                let _ = tx.send((index, sources));
            });
        }
        drop(tx);

        // Results are kept in group order regardless of completion order
        let mut results: Vec<Option<Vec<DialectSource>>> =
            (0..self.groups.len()).map(|_| None).collect();
        // A grace period past the clock's range waits without a deadline
        let deadline = start.checked_add(self.grace_period);
        let mut outstanding = self.groups.len();

        while outstanding > 0 {
            let received = match deadline {
                Some(deadline) => {
                    rx.recv_timeout(deadline.saturating_duration_since(Instant::now()))
                }
                None => rx.recv().map_err(|_| RecvTimeoutError::Disconnected),
            };
            match received {
                Ok((index, sources)) => {
                    results[index] = Some(sources);
                    outstanding -= 1;
                }
                Err(RecvTimeoutError::Timeout) => {
                    tracing::warn!(
                        "Dialect scan exceeded {:?}; cancelling {outstanding} outstanding resource groups",
                        self.grace_period
                    );
                    scan_cancel.cancel();
                    break;
                }
                Err(RecvTimeoutError::Disconnected) => break,
            }
        }

        let sources: Vec<DialectSource> = results.into_iter().flatten().flatten().collect();
        tracing::info!(
            "Found {} dialect definitions in {} resource groups in {:?}",
            sources.len(),
            self.groups.len(),
            start.elapsed()
        );
        sources
    }
}

fn scan_group(group: &ResourceGroup, cancel: &CancellationToken) -> Vec<DialectSource> {
    let mut sources = Vec::new();
    match group {
        ResourceGroup::Directory(dir) => {
            for entry in WalkDir::new(dir)
                .sort_by_file_name()
                .into_iter()
                .filter_map(|e| e.ok())
                .filter(|e| e.file_type().is_file())
            {
                if cancel.is_cancelled() {
                    break;
                }
                scan_path(entry.path(), cancel, &mut sources);
            }
        }
        ResourceGroup::Archive(archive) => scan_archive(archive, cancel, &mut sources),
        ResourceGroup::Files(files) => {
            for file in files {
                if cancel.is_cancelled() {
                    break;
                }
                scan_path(file, cancel, &mut sources);
            }
        }
    }
    sources
}

fn scan_path(path: &Path, cancel: &CancellationToken, sources: &mut Vec<DialectSource>) {
    if is_archive(path) {
        scan_archive(path, cancel, sources);
    } else if is_definition_candidate(path) {
        match std::fs::read(path) {
            Ok(bytes) => accept(SourcePath::file(path), bytes, sources),
            Err(e) => tracing::debug!("Skipping unreadable candidate {}: {e}", path.display()),
        }
    }
}

fn scan_archive(archive: &Path, cancel: &CancellationToken, sources: &mut Vec<DialectSource>) {
    match read_archive_candidates(archive) {
        Ok(entries) => {
            for (entry, bytes) in entries {
                if cancel.is_cancelled() {
                    break;
                }
                accept(SourcePath::archive_entry(archive, entry), bytes, sources);
            }
        }
        Err(e) => tracing::debug!("Skipping unreadable archive {}: {e}", archive.display()),
    }
}

fn accept(path: SourcePath, bytes: Vec<u8>, sources: &mut Vec<DialectSource>) {
    if is_dialect_definition(&bytes) {
        tracing::debug!("Found dialect definition {path}");
        sources.push(DialectSource::new(path, bytes));
    }
}
