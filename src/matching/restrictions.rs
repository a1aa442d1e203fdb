//! Structural restrictions on attribute processors.
//!
//! Tag entries: plain entries form an allow set (the tag must equal at least
//! one of them, if there are any); `-tag` entries deny that tag.
//!
//! Attribute entries: `name` or `name=value` must be present on the element;
//! `-name` or `-name=value` must be absent.

use indexmap::IndexMap;

use crate::dialect::{AttributeProcessor, AttributeRestrictions};

/// The element being edited: tag name and existing attributes.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ElementSnapshot {
    tag: String,
    attributes: IndexMap<String, String>,
}

impl ElementSnapshot {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            attributes: IndexMap::new(),
        }
    }

    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn attributes(&self) -> &IndexMap<String, String> {
        &self.attributes
    }

    pub fn has_attribute(&self, name: &str) -> bool {
        self.attributes.contains_key(name)
    }

    pub fn attribute_value(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }
}

pub fn tag_allowed(restrictions: &AttributeRestrictions, tag: &str) -> bool {
    let mut has_allow = false;
    let mut allowed = false;

    for entry in &restrictions.tags {
        match entry.strip_prefix('-') {
            Some(denied) => {
                if denied == tag {
                    return false;
                }
            }
            None => {
                has_allow = true;
                allowed |= entry.as_ref() == tag;
            }
        }
    }

    !has_allow || allowed
}

/// Check one `[-]name[=value]` entry against the element.
pub fn attribute_entry_satisfied(entry: &str, element: &ElementSnapshot) -> bool {
    let (negate, entry) = match entry.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, entry),
    };
    let (name, value) = match entry.split_once('=') {
        Some((name, value)) => (name, Some(value)),
        None => (entry, None),
    };

    let present = match (element.attribute_value(name), value) {
        (None, _) => false,
        (Some(_), None) => true,
        (Some(actual), Some(expected)) => actual == expected,
    };

    present != negate
}

pub fn attributes_allowed(restrictions: &AttributeRestrictions, element: &ElementSnapshot) -> bool {
    restrictions
        .attributes
        .iter()
        .all(|entry| attribute_entry_satisfied(entry, element))
}

/// Whether the processor may be proposed on the element.
pub fn is_applicable(processor: &AttributeProcessor, element: &ElementSnapshot) -> bool {
    match &processor.restrictions {
        Some(restrictions) => {
            tag_allowed(restrictions, element.tag()) && attributes_allowed(restrictions, element)
        }
        None => true,
    }
}

/// Literal values the processor accepts, in declaration order.
pub fn allowed_values(processor: &AttributeProcessor) -> &[std::sync::Arc<str>] {
    processor
        .restrictions
        .as_ref()
        .map(|r| r.values.as_slice())
        .unwrap_or_default()
}
