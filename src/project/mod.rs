//! Dialect sources: where definitions come from and how they are loaded.
//!
//! - [`BundledDialectLocator`] - dialects shipped with the host, always in scope
//! - [`ProjectDependencyLocator`] - concurrent scan of a project's resources
//! - [`SingleFileLocator`] - one tracked source, used for reloads
//! - [`DialectLoader`] - parses sources, synthesizes helper methods

mod bundled;
mod dependency_scan;
mod loader;
mod locator;
mod resources;

pub use bundled::BundledDialectLocator;
pub use dependency_scan::ProjectDependencyLocator;
pub use loader::{DialectLoader, LoadedDialect};
pub use locator::{
    DialectLocator, DialectSource, ResourceGroup, SingleFileLocator, read_archive_entry,
    read_source,
};
pub use resources::{NoProjectResources, ProjectResources, StaticProjectResources};
