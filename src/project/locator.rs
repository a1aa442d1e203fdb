//! Dialect source locators and raw source reading.

use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use zip::ZipArchive;

use crate::base::SourcePath;
use crate::base::constants::{ARCHIVE_EXTENSIONS, DIALECT_FILE_EXTENSION};
use crate::dialect::DialectError;

/// Raw bytes of one dialect definition plus where they came from.
#[derive(Clone, Debug)]
pub struct DialectSource {
    pub path: SourcePath,
    pub bytes: Arc<[u8]>,
}

impl DialectSource {
    pub fn new(path: SourcePath, bytes: impl Into<Arc<[u8]>>) -> Self {
        Self {
            path,
            bytes: bytes.into(),
        }
    }
}

/// A strategy that enumerates dialect definition sources.
///
/// Locators return raw sources only; parsing is the loader's job. Failures
/// for individual candidates are logged and the candidate is left out.
pub trait DialectLocator {
    fn locate(&self) -> Vec<DialectSource>;
}

/// An independent group of project resources, scanned as one task.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ResourceGroup {
    /// A directory tree (source folder, output folder, unpacked dependency).
    Directory(PathBuf),
    /// A packaged dependency whose entries are scanned.
    Archive(PathBuf),
    /// Loose files.
    Files(Vec<PathBuf>),
}

/// Reads the single source behind a [`SourcePath`].
pub struct SingleFileLocator {
    path: SourcePath,
}

impl SingleFileLocator {
    pub fn new(path: SourcePath) -> Self {
        Self { path }
    }
}

impl DialectLocator for SingleFileLocator {
    fn locate(&self) -> Vec<DialectSource> {
        match read_source(&self.path) {
            Ok(source) => vec![source],
            Err(e) => {
                tracing::debug!("Could not read dialect source {}: {e}", self.path);
                Vec::new()
            }
        }
    }
}

/// Read the bytes behind a source path.
pub fn read_source(path: &SourcePath) -> Result<DialectSource, DialectError> {
    let bytes = match path {
        SourcePath::File(file) => std::fs::read(file)?,
        SourcePath::ArchiveEntry { archive, entry } => read_archive_entry(archive, entry)?,
        SourcePath::Embedded(name) => {
            return Err(DialectError::Invalid {
                kind: "source",
                message: format!("embedded source {name} has no backing file"),
            });
        }
    };
    Ok(DialectSource::new(path.clone(), bytes))
}

pub(crate) fn has_extension(path: &Path, extension: &str) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case(extension))
}

pub(crate) fn is_definition_candidate(path: &Path) -> bool {
    has_extension(path, DIALECT_FILE_EXTENSION)
}

pub(crate) fn is_archive(path: &Path) -> bool {
    ARCHIVE_EXTENSIONS.iter().any(|ext| has_extension(path, ext))
}

fn open_archive(archive: &Path) -> Result<ZipArchive<File>, DialectError> {
    let file = File::open(archive)?;
    ZipArchive::new(file).map_err(|e| {
        DialectError::archive(format!("Failed to open archive {}: {e}", archive.display()))
    })
}

/// Read one entry of a packaged dependency.
pub fn read_archive_entry(archive: &Path, entry: &str) -> Result<Vec<u8>, DialectError> {
    let mut zip = open_archive(archive)?;
    let mut file = zip
        .by_name(entry)
        .map_err(|e| DialectError::archive(format!("Failed to read {entry}: {e}")))?;

    let mut content = Vec::new();
    file.read_to_end(&mut content)
        .map_err(|e| DialectError::archive(format!("Failed to read {entry}: {e}")))?;
    Ok(content)
}

/// Read every definition candidate entry of an archive, in archive order.
///
/// Unreadable entries are skipped.
pub fn read_archive_candidates(archive: &Path) -> Result<Vec<(String, Vec<u8>)>, DialectError> {
    let mut zip = open_archive(archive)?;

    let names: Vec<String> = (0..zip.len())
        .filter_map(|i| {
            let file = zip.by_index(i).ok()?;
            let name = file.name().to_string();
            if !file.is_dir() && is_definition_candidate(Path::new(&name)) {
                Some(name)
            } else {
                None
            }
        })
        .collect();

    let mut entries = Vec::with_capacity(names.len());
    for name in names {
        let mut content = Vec::new();
        let read = zip
            .by_name(&name)
            .map_err(|e| e.to_string())
            .and_then(|mut file| file.read_to_end(&mut content).map_err(|e| e.to_string()));
        match read {
            Ok(_) => entries.push((name, content)),
            Err(e) => {
                tracing::debug!("Skipping unreadable entry {name} in {}: {e}", archive.display());
            }
        }
    }
    Ok(entries)
}
