use std::path::PathBuf;
use std::sync::Arc;

use walkdir::WalkDir;

use super::locator::{DialectLocator, DialectSource, is_definition_candidate};
use crate::base::constants::BUNDLED_DIALECTS_DIR;
use crate::base::{AssistConfig, SourcePath};

/// Locates the dialects shipped with the host.
///
/// Embedded sources come first, then the definition files of the bundled
/// directory sorted by file name. Never fails; a missing directory just
/// contributes nothing.
pub struct BundledDialectLocator {
    dir: Option<PathBuf>,
    embedded: Vec<(Arc<str>, Arc<[u8]>)>,
}

impl BundledDialectLocator {
    /// Creates a locator with automatic directory discovery.
    ///
    /// Searches for the bundled directory in these locations (in order):
    /// 1. Next to the current executable (for installed binaries)
    /// 2. `CARGO_MANIFEST_DIR` (for development)
    /// 3. The relative default `dialects/`
    pub fn new() -> Self {
        Self::with_dir(Self::discover_path())
    }

    /// Creates a locator reading a specific directory.
    pub fn with_dir(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: Some(dir.into()),
            embedded: Vec::new(),
        }
    }

    /// Creates a locator with embedded sources only.
    pub fn embedded_only() -> Self {
        Self {
            dir: None,
            embedded: Vec::new(),
        }
    }

    pub fn from_config(config: &AssistConfig) -> Self {
        match &config.bundled_dir {
            Some(dir) => Self::with_dir(dir.clone()),
            None => Self::new(),
        }
    }

    /// Adds an in-memory definition.
    pub fn with_embedded(mut self, name: impl Into<Arc<str>>, bytes: impl Into<Arc<[u8]>>) -> Self {
        self.embedded.push((name.into(), bytes.into()));
        self
    }

    pub fn dir(&self) -> Option<&PathBuf> {
        self.dir.as_ref()
    }

    /// Returns the first existing path, or falls back to the default.
    fn discover_path() -> PathBuf {
        // Try next to the executable first (for installed binaries)
        if let Some(exe_dir) = std::env::current_exe()
            .ok()
            .and_then(|exe| exe.parent().map(|p| p.to_path_buf()))
        {
            let next_to_exe = exe_dir.join(BUNDLED_DIALECTS_DIR);
            if next_to_exe.is_dir() {
                return next_to_exe;
            }
        }

        if let Some(manifest_dir) = std::env::var_os("CARGO_MANIFEST_DIR") {
            let in_manifest = PathBuf::from(manifest_dir).join(BUNDLED_DIALECTS_DIR);
            if in_manifest.is_dir() {
                return in_manifest;
            }
        }

        PathBuf::from(BUNDLED_DIALECTS_DIR)
    }
}

impl Default for BundledDialectLocator {
    fn default() -> Self {
        Self::new()
    }
}

impl DialectLocator for BundledDialectLocator {
    fn locate(&self) -> Vec<DialectSource> {
        let mut sources: Vec<DialectSource> = self
            .embedded
            .iter()
            .map(|(name, bytes)| DialectSource::new(SourcePath::Embedded(name.clone()), bytes.clone()))
            .collect();

        let Some(dir) = self.dir.as_ref().filter(|dir| dir.is_dir()) else {
            return sources;
        };

        tracing::info!("Loading bundled dialects from {}", dir.display());

        for entry in WalkDir::new(dir)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file() && is_definition_candidate(e.path()))
        {
            match std::fs::read(entry.path()) {
                Ok(bytes) => {
                    sources.push(DialectSource::new(SourcePath::file(entry.path()), bytes));
                }
                Err(e) => {
                    tracing::warn!(
                        "Could not read bundled dialect {}: {e}",
                        entry.path().display()
                    );
                }
            }
        }

        sources
    }
}
