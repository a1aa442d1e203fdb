//! Dialect registry and change tracking.
//!
//! ## Usage
//!
//! ```ignore
//! let registry = Arc::new(DialectRegistry::new(config).with_resources(resources));
//! registry.load_bundled(&BundledDialectLocator::new());
//!
//! let tracker = ChangeTracker::new(registry.clone());
//!
//! // Queries load the project on first use
//! let view = registry.project_view(&project);
//! let attributes = view.attribute_processors();
//!
//! // File watcher callback
//! tracker.notify(ChangeBatch::changed([path]));
//! ```

mod item_set;
mod snapshot;
mod tracker;
mod tree;

pub use item_set::{ItemSet, RegistryItem};
pub use snapshot::{ItemView, ProjectSnapshot, ProjectView};
pub use tracker::{ChangeBatch, ChangeTracker, TrackedSources};
pub use tree::{DialectRegistry, ProjectLoadObserver};
