use rustc_hash::FxHashMap;

use super::locator::ResourceGroup;
use crate::base::ProjectKey;

/// What the host knows about its projects.
pub trait ProjectResources: Send + Sync {
    /// Resource groups reachable from the project (source folders, build
    /// output, dependency archives).
    fn resource_groups(&self, project: &ProjectKey) -> Vec<ResourceGroup>;

    /// Explicit dialect mode for the project, if the host stores one.
    fn dialect_mode(&self, _project: &ProjectKey) -> Option<bool> {
        None
    }
}

/// Host without project resources. Only bundled dialects are visible.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoProjectResources;

impl ProjectResources for NoProjectResources {
    fn resource_groups(&self, _project: &ProjectKey) -> Vec<ResourceGroup> {
        Vec::new()
    }
}

/// Fixed table of projects, for hosts that compute their layout up front.
#[derive(Debug, Default, Clone)]
pub struct StaticProjectResources {
    groups: FxHashMap<ProjectKey, Vec<ResourceGroup>>,
    modes: FxHashMap<ProjectKey, bool>,
}

impl StaticProjectResources {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_project(
        mut self,
        project: impl Into<ProjectKey>,
        groups: impl IntoIterator<Item = ResourceGroup>,
    ) -> Self {
        self.groups
            .insert(project.into(), groups.into_iter().collect());
        self
    }

    pub fn with_dialect_mode(mut self, project: impl Into<ProjectKey>, enabled: bool) -> Self {
        self.modes.insert(project.into(), enabled);
        self
    }
}

impl ProjectResources for StaticProjectResources {
    fn resource_groups(&self, project: &ProjectKey) -> Vec<ResourceGroup> {
        self.groups.get(project).cloned().unwrap_or_default()
    }

    fn dialect_mode(&self, project: &ProjectKey) -> Option<bool> {
        self.modes.get(project).copied()
    }
}
