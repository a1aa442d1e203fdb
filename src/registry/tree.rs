//! The dialect registry.
//!
//! Holds bundled dialects (visible to every project) and, per project, one
//! [`ItemSet`] per definition source. Every mutation replaces whole
//! [`ProjectSnapshot`]s under the state lock; readers clone the snapshot
//! `Arc` and never hold the lock while matching.

use std::io::ErrorKind;
use std::sync::Arc;
use std::time::{Duration, SystemTime};

use indexmap::IndexMap;
use parking_lot::RwLock;
use rustc_hash::FxHashMap;
use tokio_util::sync::CancellationToken;

use super::item_set::ItemSet;
use super::snapshot::{BundledSet, ItemView, ProjectSnapshot, ProjectView};
use crate::base::{AssistConfig, ProjectKey, SourcePath};
use crate::dialect::{
    AttributeProcessor, Dialect, DialectItem, ElementProcessor, ExpressionHelperMethod,
};
use crate::project::{
    DialectLoader, DialectLocator, NoProjectResources, ProjectDependencyLocator, ProjectResources,
    SingleFileLocator,
};

/// File timestamps come from a coarser clock than `SystemTime::now`.
const MODIFIED_TIME_SLACK: Duration = Duration::from_secs(1);

/// Receives the sources discovered by a project's first load.
pub trait ProjectLoadObserver: Send + Sync {
    fn project_loaded(&self, project: &ProjectKey, sources: &[SourcePath]);
}

#[derive(Default)]
struct RegistryState {
    bundled: Arc<BundledSet>,
    projects: FxHashMap<ProjectKey, Arc<ProjectSnapshot>>,
}

/// Bundled and per-project dialects with memoized, sorted item views.
pub struct DialectRegistry {
    config: AssistConfig,
    loader: DialectLoader,
    resources: Arc<dyn ProjectResources>,
    state: RwLock<RegistryState>,
    dialect_modes: RwLock<FxHashMap<ProjectKey, bool>>,
    observer: RwLock<Option<Arc<dyn ProjectLoadObserver>>>,
    cancel: CancellationToken,
}

impl Default for DialectRegistry {
    fn default() -> Self {
        Self::new(AssistConfig::default())
    }
}

impl DialectRegistry {
    pub fn new(config: AssistConfig) -> Self {
        Self {
            config,
            loader: DialectLoader::default(),
            resources: Arc::new(NoProjectResources),
            state: RwLock::new(RegistryState::default()),
            dialect_modes: RwLock::new(FxHashMap::default()),
            observer: RwLock::new(None),
            cancel: CancellationToken::new(),
        }
    }

    pub fn with_loader(mut self, loader: DialectLoader) -> Self {
        self.loader = loader;
        self
    }

    pub fn with_resources(mut self, resources: Arc<dyn ProjectResources>) -> Self {
        self.resources = resources;
        self
    }

    pub fn config(&self) -> &AssistConfig {
        &self.config
    }

    /// Token cancelled on shutdown; project scans stop when it fires.
    pub fn cancellation(&self) -> &CancellationToken {
        &self.cancel
    }

    pub fn set_load_observer(&self, observer: Arc<dyn ProjectLoadObserver>) {
        *self.observer.write() = Some(observer);
    }

    // ========================================================================
    // Bundled dialects
    // ========================================================================

    /// Load every bundled source from a locator. Returns the number of
    /// dialects registered.
    pub fn load_bundled(&self, locator: &dyn DialectLocator) -> usize {
        let loaded = self.loader.load_dialects(locator);
        let count = loaded.len();
        for dialect in loaded {
            self.add_bundled_dialect(dialect.dialect, dialect.items);
        }
        count
    }

    /// Register a bundled dialect. Items of a dialect registered twice are
    /// merged. Every loaded project is rebased onto the new bundled set.
    pub fn add_bundled_dialect(&self, dialect: Arc<Dialect>, items: Vec<DialectItem>) {
        let mut state = self.state.write();

        let mut bundled = BundledSet::clone(&state.bundled);
        let set = match bundled.get(&dialect) {
            Some(existing) => existing.merged(items),
            None => ItemSet::new(items),
        };
        tracing::debug!("Registered bundled dialect {dialect} ({} items)", set.len());
        bundled.insert(dialect, Arc::new(set));

        let bundled = Arc::new(bundled);
        for snapshot in state.projects.values_mut() {
            *snapshot = Arc::new(snapshot.rebased(bundled.clone()));
        }
        state.bundled = bundled;
    }

    pub fn bundled_dialects(&self) -> Vec<Arc<Dialect>> {
        self.state.read().bundled.keys().cloned().collect()
    }

    // ========================================================================
    // Projects
    // ========================================================================

    pub fn contains_project(&self, project: &ProjectKey) -> bool {
        self.state.read().projects.contains_key(project)
    }

    /// Load the project's dialects unless already loaded.
    ///
    /// The scan runs without holding the state lock; the result is inserted
    /// only if no other load won the race. Sources whose files changed after
    /// the scan started are reloaded once the observer has seen them. Returns
    /// the sources registered by this call, or `None` if nothing was loaded.
    pub fn ensure_project_loaded(&self, project: &ProjectKey) -> Option<Vec<SourcePath>> {
        if self.contains_project(project) {
            return None;
        }

        tracing::info!("Loading dialects for project {project}");
        let scan_started = SystemTime::now()
            .checked_sub(MODIFIED_TIME_SLACK)
            .unwrap_or(SystemTime::UNIX_EPOCH);
        let locator = ProjectDependencyLocator::from_config(
            self.resources.resource_groups(project),
            &self.config,
        )
        .with_cancellation(self.cancel.clone());
        let loaded = self.loader.load_dialects(&locator);

        let mut sources = IndexMap::new();
        for dialect in loaded {
            sources.insert(dialect.source, Arc::new(ItemSet::new(dialect.items)));
        }
        let paths: Vec<SourcePath> = sources.keys().cloned().collect();

        {
            let mut state = self.state.write();
            if state.projects.contains_key(project) {
                tracing::debug!("Project {project} was loaded concurrently; discarding scan");
                return None;
            }
            let snapshot = ProjectSnapshot::new(state.bundled.clone(), sources);
            state.projects.insert(project.clone(), Arc::new(snapshot));
        }

        tracing::info!("Loaded {} dialect sources for project {project}", paths.len());

        let observer = self.observer.read().clone();
        if let Some(observer) = observer {
            observer.project_loaded(project, &paths);
        }
        self.reload_changed_since(project, &paths, scan_started);
        Some(paths)
    }

    fn reload_changed_since(&self, project: &ProjectKey, paths: &[SourcePath], since: SystemTime) {
        for path in paths {
            let Some(file) = path.tracked_path() else {
                continue;
            };
            let items = match std::fs::metadata(file).and_then(|m| m.modified()) {
                Ok(modified) if modified < since => continue,
                Ok(_) => {
                    tracing::debug!("{path} changed while project {project} was scanned");
                    self.reload_source(path)
                }
                Err(e) if e.kind() == ErrorKind::NotFound => {
                    tracing::debug!("{path} removed while project {project} was scanned");
                    None
                }
                Err(_) => continue,
            };
            self.update_source(project, path, items);
        }
    }

    /// Read and parse one source again. `None` when it is unreadable or
    /// malformed.
    pub fn reload_source(&self, path: &SourcePath) -> Option<Vec<DialectItem>> {
        let locator = SingleFileLocator::new(path.clone());
        match self.loader.load_dialects(&locator).into_iter().next() {
            Some(loaded) => Some(loaded.items),
            None => {
                tracing::warn!("Dialect source {path} is unreadable or malformed; removing its items");
                None
            }
        }
    }

    /// Forget a project. Its next query triggers a fresh scan.
    pub fn unload_project(&self, project: &ProjectKey) -> bool {
        self.state.write().projects.remove(project).is_some()
    }

    /// Sources currently registered for the project, in load order.
    pub fn project_sources(&self, project: &ProjectKey) -> Vec<SourcePath> {
        self.state
            .read()
            .projects
            .get(project)
            .map(|snapshot| snapshot.sources().map(|(path, _)| path.clone()).collect())
            .unwrap_or_default()
    }

    /// Replace (`Some`) or remove (`None`) the items of one source.
    ///
    /// The project's views are rebuilt lazily on next read. Updates for
    /// projects that were never loaded are ignored; the first load reads the
    /// current state anyway. Returns whether the update was applied.
    pub fn update_source(
        &self,
        project: &ProjectKey,
        path: &SourcePath,
        items: Option<Vec<DialectItem>>,
    ) -> bool {
        let mut state = self.state.write();
        let Some(snapshot) = state.projects.get_mut(project) else {
            tracing::debug!("Ignoring update of {path} for unloaded project {project}");
            return false;
        };

        let items = items.map(|items| Arc::new(ItemSet::new(items)));
        if items.is_none() && !snapshot.contains_source(path) {
            return false;
        }
        *snapshot = Arc::new(snapshot.with_source(path.clone(), items));
        true
    }

    // ========================================================================
    // Dialect mode
    // ========================================================================

    pub fn set_dialect_mode(&self, project: &ProjectKey, enabled: bool) {
        self.dialect_modes.write().insert(project.clone(), enabled);
    }

    /// Explicit setting, then the host's, then the configured default.
    pub fn dialect_mode(&self, project: &ProjectKey) -> bool {
        if let Some(enabled) = self.dialect_modes.read().get(project) {
            return *enabled;
        }
        self.resources
            .dialect_mode(project)
            .unwrap_or(self.config.dialect_mode_default)
    }

    // ========================================================================
    // Queries
    // ========================================================================

    /// Consistent view of the project, loading it first if needed.
    pub fn project_view(&self, project: &ProjectKey) -> ProjectView {
        self.ensure_project_loaded(project);

        let snapshot = {
            let state = self.state.read();
            state.projects.get(project).cloned().unwrap_or_else(|| {
                // Unloaded between the load and this read
                Arc::new(ProjectSnapshot::new(state.bundled.clone(), IndexMap::new()))
            })
        };
        ProjectView::new(project.clone(), snapshot, self.dialect_mode(project))
    }

    pub fn attribute_processors_for_project(
        &self,
        project: &ProjectKey,
    ) -> ItemView<AttributeProcessor> {
        self.project_view(project).attribute_processors()
    }

    pub fn element_processors_for_project(&self, project: &ProjectKey) -> ItemView<ElementProcessor> {
        self.project_view(project).element_processors()
    }

    pub fn helper_methods_for_project(
        &self,
        project: &ProjectKey,
    ) -> ItemView<ExpressionHelperMethod> {
        self.project_view(project).helper_methods()
    }

    /// Cancel outstanding project scans.
    pub fn shutdown(&self) {
        self.cancel.cancel();
    }
}
