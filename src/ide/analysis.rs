//! AssistHost and Analysis: the entry points an editor integration holds.
//!
//! The `AssistHost` owns the registry and the change tracker. An `Analysis`
//! is one project's consistent snapshot; every query made through it sees
//! the same item sets even while reloads land in the background.
//!
//! ## Usage
//!
//! ```ignore
//! let host = AssistHost::new(AssistConfig::default());
//! host.initialize();
//!
//! let analysis = host.analysis(&ProjectKey::from("app"));
//! let proposals = analysis.completions(&ctx, offset);
//! let hover = analysis.hover(&ctx, offset);
//!
//! host.notify_changes(ChangeBatch::changed([path]));
//! ```

use std::sync::Arc;

use text_size::TextSize;

use super::completion::{CompletionProposal, completions};
use super::context::CursorContext;
use super::hover::{HoverResult, hover};
use crate::base::{AssistConfig, ProjectKey};
use crate::dialect::ClassMemberLister;
use crate::project::{BundledDialectLocator, DialectLoader, DialectLocator, ProjectResources};
use crate::registry::{ChangeBatch, ChangeTracker, DialectRegistry, ProjectView};

/// Owns the dialect registry and the change tracker.
pub struct AssistHost {
    registry: Arc<DialectRegistry>,
    tracker: ChangeTracker,
}

impl Default for AssistHost {
    fn default() -> Self {
        Self::new(AssistConfig::default())
    }
}

impl AssistHost {
    /// Create a host with no project resources and no class member lister.
    pub fn new(config: AssistConfig) -> Self {
        Self::from_registry(DialectRegistry::new(config))
    }

    /// Create a host backed by the host environment's project resources and
    /// class introspection.
    pub fn with_parts(
        config: AssistConfig,
        resources: Arc<dyn ProjectResources>,
        lister: Arc<dyn ClassMemberLister>,
    ) -> Self {
        Self::from_registry(
            DialectRegistry::new(config)
                .with_resources(resources)
                .with_loader(DialectLoader::new(lister)),
        )
    }

    fn from_registry(registry: DialectRegistry) -> Self {
        let registry = Arc::new(registry);
        let tracker = ChangeTracker::new(registry.clone());
        Self { registry, tracker }
    }

    /// Load the bundled dialects from the configured or discovered directory.
    /// Returns the number of dialects loaded.
    pub fn initialize(&self) -> usize {
        let locator = BundledDialectLocator::from_config(self.registry.config());
        let count = self.initialize_with(&locator);
        if count == 0 {
            tracing::warn!(
                "No bundled dialects found in {:?}",
                locator.dir().map(|d| d.display().to_string())
            );
        }
        count
    }

    /// Load the bundled dialects from a specific locator.
    pub fn initialize_with(&self, locator: &dyn DialectLocator) -> usize {
        tracing::info!("Loading bundled dialects");
        let count = self.registry.load_bundled(locator);
        tracing::debug!("Loaded {count} bundled dialects");
        count
    }

    pub fn registry(&self) -> &Arc<DialectRegistry> {
        &self.registry
    }

    pub fn tracker(&self) -> &ChangeTracker {
        &self.tracker
    }

    /// Snapshot of one project, loading it first if needed.
    pub fn analysis(&self, project: &ProjectKey) -> Analysis {
        Analysis {
            view: self.registry.project_view(project),
        }
    }

    pub fn completions(
        &self,
        project: &ProjectKey,
        ctx: &dyn CursorContext,
        offset: TextSize,
    ) -> Vec<CompletionProposal> {
        self.analysis(project).completions(ctx, offset)
    }

    pub fn hover(
        &self,
        project: &ProjectKey,
        ctx: &dyn CursorContext,
        offset: TextSize,
    ) -> Option<HoverResult> {
        self.analysis(project).hover(ctx, offset)
    }

    /// Forward file changes to the change tracker. Returns the number of
    /// sources queued for reload.
    pub fn notify_changes(&self, batch: ChangeBatch) -> usize {
        self.tracker.notify(batch)
    }

    pub fn set_dialect_mode(&self, project: &ProjectKey, enabled: bool) {
        self.registry.set_dialect_mode(project, enabled);
    }

    /// Drain pending reloads, then cancel outstanding work.
    pub fn shutdown(&self) {
        self.tracker.shutdown();
        self.registry.shutdown();
    }
}

/// A read-only snapshot of one project.
#[derive(Clone)]
pub struct Analysis {
    view: ProjectView,
}

impl Analysis {
    pub fn view(&self) -> &ProjectView {
        &self.view
    }

    pub fn completions(&self, ctx: &dyn CursorContext, offset: TextSize) -> Vec<CompletionProposal> {
        completions(&self.view, ctx, offset)
    }

    pub fn hover(&self, ctx: &dyn CursorContext, offset: TextSize) -> Option<HoverResult> {
        hover(&self.view, ctx, offset)
    }
}
