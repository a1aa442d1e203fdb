//! Identity keys for projects and dialect definition sources.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Identifies a host project (workspace folder, module, build unit).
///
/// Cheap to clone; the host decides what the string means.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ProjectKey(Arc<str>);

impl ProjectKey {
    pub fn new(name: impl Into<Arc<str>>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProjectKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ProjectKey {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

/// Where a dialect definition came from.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SourcePath {
    /// A plain file on disk.
    File(PathBuf),
    /// An entry inside a packaged dependency (jar/zip).
    ArchiveEntry { archive: PathBuf, entry: String },
    /// An in-memory source with no backing file (bundled with the host).
    Embedded(Arc<str>),
}

impl SourcePath {
    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self::File(path.into())
    }

    pub fn archive_entry(archive: impl Into<PathBuf>, entry: impl Into<String>) -> Self {
        Self::ArchiveEntry {
            archive: archive.into(),
            entry: entry.into(),
        }
    }

    /// The file-system path whose changes affect this source.
    ///
    /// Archive entries are tracked through their archive. Embedded sources
    /// never change.
    pub fn tracked_path(&self) -> Option<&Path> {
        match self {
            SourcePath::File(path) => Some(path),
            SourcePath::ArchiveEntry { archive, .. } => Some(archive),
            SourcePath::Embedded(_) => None,
        }
    }

    /// Last path segment, for log messages.
    pub fn file_name(&self) -> String {
        match self {
            SourcePath::File(path) => path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| path.display().to_string()),
            SourcePath::ArchiveEntry { entry, .. } => {
                entry.rsplit('/').next().unwrap_or(entry).to_string()
            }
            SourcePath::Embedded(name) => name.to_string(),
        }
    }
}

impl fmt::Display for SourcePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourcePath::File(path) => write!(f, "{}", path.display()),
            SourcePath::ArchiveEntry { archive, entry } => {
                write!(f, "{}!/{}", archive.display(), entry)
            }
            SourcePath::Embedded(name) => write!(f, "embedded:{name}"),
        }
    }
}
