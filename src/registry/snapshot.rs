//! Immutable per-project state and its memoized views.
//!
//! A [`ProjectSnapshot`] is never mutated. Updates build a new snapshot with
//! empty view caches and swap it in, so a reader holding a snapshot always
//! sees one consistent generation of every source.

use std::sync::{Arc, OnceLock};

use indexmap::IndexMap;

use super::item_set::{ItemSet, RegistryItem};
use crate::base::{ProjectKey, SourcePath};
use crate::dialect::{AttributeProcessor, Dialect, ElementProcessor, ExpressionHelperMethod};

/// Bundled dialects, in registration order.
pub(crate) type BundledSet = IndexMap<Arc<Dialect>, Arc<ItemSet>>;

/// Sorted, deduplicated item list shared by every reader of a snapshot.
pub type ItemView<T> = Arc<[Arc<T>]>;

#[derive(Debug)]
pub struct ProjectSnapshot {
    bundled: Arc<BundledSet>,
    sources: IndexMap<SourcePath, Arc<ItemSet>>,
    attributes: OnceLock<ItemView<AttributeProcessor>>,
    elements: OnceLock<ItemView<ElementProcessor>>,
    helpers: OnceLock<ItemView<ExpressionHelperMethod>>,
}

impl ProjectSnapshot {
    pub(crate) fn new(
        bundled: Arc<BundledSet>,
        sources: IndexMap<SourcePath, Arc<ItemSet>>,
    ) -> Self {
        Self {
            bundled,
            sources,
            attributes: OnceLock::new(),
            elements: OnceLock::new(),
            helpers: OnceLock::new(),
        }
    }

    /// Same sources on top of a different bundled set.
    pub(crate) fn rebased(&self, bundled: Arc<BundledSet>) -> Self {
        Self::new(bundled, self.sources.clone())
    }

    /// Copy with one source replaced or removed.
    pub(crate) fn with_source(&self, path: SourcePath, items: Option<Arc<ItemSet>>) -> Self {
        let mut sources = self.sources.clone();
        match items {
            Some(items) => {
                sources.insert(path, items);
            }
            None => {
                sources.shift_remove(&path);
            }
        }
        Self::new(self.bundled.clone(), sources)
    }

    pub fn sources(&self) -> impl Iterator<Item = (&SourcePath, &Arc<ItemSet>)> {
        self.sources.iter()
    }

    pub fn contains_source(&self, path: &SourcePath) -> bool {
        self.sources.contains_key(path)
    }

    fn item_sets(&self) -> impl Iterator<Item = &Arc<ItemSet>> {
        self.bundled.values().chain(self.sources.values())
    }

    /// Dialects visible to the project: bundled first, then project sources.
    pub fn dialects(&self) -> Vec<Arc<Dialect>> {
        let mut dialects: Vec<Arc<Dialect>> = self.bundled.keys().cloned().collect();
        for set in self.sources.values() {
            for dialect in set.dialects() {
                if !dialects.contains(&dialect) {
                    dialects.push(dialect);
                }
            }
        }
        dialects
    }

    pub fn attribute_processors(&self) -> ItemView<AttributeProcessor> {
        self.attributes
            .get_or_init(|| materialize(self.item_sets().flat_map(|s| s.attributes())))
            .clone()
    }

    pub fn element_processors(&self) -> ItemView<ElementProcessor> {
        self.elements
            .get_or_init(|| materialize(self.item_sets().flat_map(|s| s.elements())))
            .clone()
    }

    pub fn helper_methods(&self) -> ItemView<ExpressionHelperMethod> {
        self.helpers
            .get_or_init(|| materialize(self.item_sets().flat_map(|s| s.helpers())))
            .clone()
    }
}

/// Sort by dialect prefix, then item name, then namespace URI. The sort is
/// stable, so among equal keys bundled items stay ahead of project items and
/// the later duplicates are dropped.
fn materialize<'a, T: RegistryItem + 'a>(items: impl Iterator<Item = &'a Arc<T>>) -> ItemView<T> {
    let mut items: Vec<Arc<T>> = items.cloned().collect();
    items.sort_by(|a, b| sort_key(&**a).cmp(&sort_key(&**b)));
    items.dedup_by(|a, b| sort_key(&**a) == sort_key(&**b));
    items.into()
}

fn sort_key<T: RegistryItem>(item: &T) -> (&str, &str, &str) {
    let dialect = item.owner();
    (dialect.prefix(), item.sort_name(), dialect.namespace_uri())
}

/// A project's snapshot as seen by one query.
#[derive(Clone, Debug)]
pub struct ProjectView {
    project: ProjectKey,
    snapshot: Arc<ProjectSnapshot>,
    dialect_mode: bool,
}

impl ProjectView {
    pub(crate) fn new(project: ProjectKey, snapshot: Arc<ProjectSnapshot>, dialect_mode: bool) -> Self {
        Self {
            project,
            snapshot,
            dialect_mode,
        }
    }

    pub fn project(&self) -> &ProjectKey {
        &self.project
    }

    pub fn snapshot(&self) -> &Arc<ProjectSnapshot> {
        &self.snapshot
    }

    /// Whether every visible dialect is in scope without declarations.
    pub fn dialect_mode(&self) -> bool {
        self.dialect_mode
    }

    pub fn dialects(&self) -> Vec<Arc<Dialect>> {
        self.snapshot.dialects()
    }

    pub fn attribute_processors(&self) -> ItemView<AttributeProcessor> {
        self.snapshot.attribute_processors()
    }

    pub fn element_processors(&self) -> ItemView<ElementProcessor> {
        self.snapshot.element_processors()
    }

    pub fn helper_methods(&self) -> ItemView<ExpressionHelperMethod> {
        self.snapshot.helper_methods()
    }
}
