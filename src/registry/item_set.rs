use std::sync::Arc;

use crate::dialect::{
    AttributeProcessor, Dialect, DialectItem, ElementProcessor, ExpressionHelperMethod,
};

/// The items of one definition source, split by kind.
///
/// Never mutated after construction; replacing a source swaps the whole set.
#[derive(Clone, Debug, Default)]
pub struct ItemSet {
    attributes: Vec<Arc<AttributeProcessor>>,
    elements: Vec<Arc<ElementProcessor>>,
    helpers: Vec<Arc<ExpressionHelperMethod>>,
}

impl ItemSet {
    pub fn new(items: impl IntoIterator<Item = DialectItem>) -> Self {
        let mut set = Self::default();
        set.extend(items);
        set
    }

    pub(crate) fn extend(&mut self, items: impl IntoIterator<Item = DialectItem>) {
        for item in items {
            match item {
                DialectItem::Attribute(p) => self.attributes.push(p),
                DialectItem::Element(p) => self.elements.push(p),
                DialectItem::Helper(m) => self.helpers.push(m),
            }
        }
    }

    pub(crate) fn merged(&self, items: impl IntoIterator<Item = DialectItem>) -> Self {
        let mut set = self.clone();
        set.extend(items);
        set
    }

    pub fn attributes(&self) -> &[Arc<AttributeProcessor>] {
        &self.attributes
    }

    pub fn elements(&self) -> &[Arc<ElementProcessor>] {
        &self.elements
    }

    pub fn helpers(&self) -> &[Arc<ExpressionHelperMethod>] {
        &self.helpers
    }

    pub fn len(&self) -> usize {
        self.attributes.len() + self.elements.len() + self.helpers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Distinct dialects owning the items, in first-seen order.
    pub fn dialects(&self) -> Vec<Arc<Dialect>> {
        let mut dialects: Vec<Arc<Dialect>> = Vec::new();
        let owners = self
            .attributes
            .iter()
            .map(|p| p.dialect())
            .chain(self.elements.iter().map(|p| p.dialect()))
            .chain(self.helpers.iter().map(|m| m.dialect()));
        for dialect in owners {
            if !dialects.contains(dialect) {
                dialects.push(dialect.clone());
            }
        }
        dialects
    }
}

/// Items that take part in the sorted per-project views.
pub trait RegistryItem {
    fn owner(&self) -> &Arc<Dialect>;
    /// Name compared after the dialect prefix.
    fn sort_name(&self) -> &str;
}

impl RegistryItem for AttributeProcessor {
    fn owner(&self) -> &Arc<Dialect> {
        self.dialect()
    }

    fn sort_name(&self) -> &str {
        self.name()
    }
}

impl RegistryItem for ElementProcessor {
    fn owner(&self) -> &Arc<Dialect> {
        self.dialect()
    }

    fn sort_name(&self) -> &str {
        self.name()
    }
}

impl RegistryItem for ExpressionHelperMethod {
    fn owner(&self) -> &Arc<Dialect> {
        self.dialect()
    }

    fn sort_name(&self) -> &str {
        self.qualified_name()
    }
}
