//! Dialect loading: raw sources in, parsed dialects out.
//!
//! Each source is read independently. A malformed source is logged and left
//! out; it never aborts the rest of the load.

use std::sync::Arc;

use super::locator::{DialectLocator, DialectSource};
use crate::base::SourcePath;
use crate::dialect::{
    ClassMemberLister, Dialect, DialectError, DialectItem, NoClassMembers, read_dialect,
    synthesize_helper_methods,
};

/// One parsed definition source.
#[derive(Clone, Debug)]
pub struct LoadedDialect {
    pub source: SourcePath,
    pub dialect: Arc<Dialect>,
    /// Declared items in document order, then synthesized helper methods.
    pub items: Vec<DialectItem>,
}

/// Turns raw definition sources into dialects and their items.
#[derive(Clone)]
pub struct DialectLoader {
    lister: Arc<dyn ClassMemberLister>,
}

impl Default for DialectLoader {
    fn default() -> Self {
        Self::new(Arc::new(NoClassMembers))
    }
}

impl DialectLoader {
    pub fn new(lister: Arc<dyn ClassMemberLister>) -> Self {
        Self { lister }
    }

    /// Load every source the locator yields, in locator order.
    ///
    /// Malformed sources are logged and skipped.
    pub fn load_dialects(&self, locator: &dyn DialectLocator) -> Vec<LoadedDialect> {
        locator
            .locate()
            .iter()
            .filter_map(|source| match self.load_source(source) {
                Ok(loaded) => Some(loaded),
                Err(e) => {
                    tracing::warn!("Skipping malformed dialect definition {}: {e}", source.path);
                    None
                }
            })
            .collect()
    }

    pub fn load_source(&self, source: &DialectSource) -> Result<LoadedDialect, DialectError> {
        let parsed = read_dialect(&source.bytes)?;

        let mut items = parsed.items;
        for object in &parsed.expression_objects {
            items.extend(
                synthesize_helper_methods(&parsed.dialect, object, self.lister.as_ref())
                    .into_iter()
                    .map(DialectItem::from),
            );
        }

        tracing::debug!(
            "Loaded dialect {} with {} items from {}",
            parsed.dialect,
            items.len(),
            source.path
        );

        Ok(LoadedDialect {
            source: source.path.clone(),
            dialect: parsed.dialect,
            items,
        })
    }
}
