//! Configuration options

use std::path::PathBuf;
use std::time::Duration;

use super::constants::{DEFAULT_SCAN_GRACE_PERIOD, DEFAULT_SHUTDOWN_GRACE_PERIOD};

/// Tunables for the dialect assist core.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct AssistConfig {
    /// Worker count for project dependency scans (`None` = available parallelism)
    pub scan_threads: Option<usize>,
    /// Maximum wait for scan workers before outstanding work is cancelled
    pub scan_grace_period: Duration,
    /// Drain window for the change tracker queue on shutdown
    pub shutdown_grace_period: Duration,
    /// Dialect mode for projects without an explicit setting. When on, every
    /// dialect visible to the project is in scope without namespace declarations.
    pub dialect_mode_default: bool,
    /// Override for the bundled dialect directory
    pub bundled_dir: Option<PathBuf>,
}

impl Default for AssistConfig {
    fn default() -> Self {
        Self {
            scan_threads: None,
            scan_grace_period: DEFAULT_SCAN_GRACE_PERIOD,
            shutdown_grace_period: DEFAULT_SHUTDOWN_GRACE_PERIOD,
            dialect_mode_default: false,
            bundled_dir: None,
        }
    }
}

impl AssistConfig {
    pub fn with_scan_threads(mut self, threads: usize) -> Self {
        self.scan_threads = Some(threads.max(1));
        self
    }

    pub fn with_scan_grace_period(mut self, grace: Duration) -> Self {
        self.scan_grace_period = grace;
        self
    }

    pub fn with_shutdown_grace_period(mut self, grace: Duration) -> Self {
        self.shutdown_grace_period = grace;
        self
    }

    pub fn with_dialect_mode_default(mut self, enabled: bool) -> Self {
        self.dialect_mode_default = enabled;
        self
    }

    pub fn with_bundled_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.bundled_dir = Some(dir.into());
        self
    }

    /// Resolved scan worker count.
    pub fn scan_worker_count(&self) -> usize {
        self.scan_threads.unwrap_or_else(|| {
            std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1)
        })
    }
}
