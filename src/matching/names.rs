//! Name and pattern matching over a project's item views.
//!
//! Pattern queries keep the view's order (dialect prefix, then name). Exact
//! queries return the first match in that order.

use std::sync::Arc;

use super::scope::NamespaceScope;
use crate::dialect::{AttributeProcessor, ElementProcessor, ExpressionHelperMethod, Processor};
use crate::registry::ProjectView;

/// Split `prefix:name` on the first `:`.
pub fn split_qualified(name: &str) -> Option<(&str, &str)> {
    name.split_once(':')
}

/// Attribute processors in scope whose full name or `data-*` name starts
/// with the pattern.
pub fn find_attribute_processors(
    view: &ProjectView,
    scope: &NamespaceScope,
    pattern: &str,
) -> Vec<Arc<AttributeProcessor>> {
    view.attribute_processors()
        .iter()
        .filter(|p| scope.is_dialect_in_scope(p.dialect()))
        .filter(|p| p.full_name().starts_with(pattern) || p.full_data_name().starts_with(pattern))
        .cloned()
        .collect()
}

pub fn find_element_processors(
    view: &ProjectView,
    scope: &NamespaceScope,
    pattern: &str,
) -> Vec<Arc<ElementProcessor>> {
    view.element_processors()
        .iter()
        .filter(|p| scope.is_dialect_in_scope(p.dialect()))
        .filter(|p| p.full_name().starts_with(pattern))
        .cloned()
        .collect()
}

/// Helper methods in scope whose `#object.member` name starts with the
/// pattern.
pub fn find_helper_methods(
    view: &ProjectView,
    scope: &NamespaceScope,
    pattern: &str,
) -> Vec<Arc<ExpressionHelperMethod>> {
    view.helper_methods()
        .iter()
        .filter(|m| scope.is_dialect_in_scope(m.dialect()))
        .filter(|m| m.full_name().starts_with(pattern))
        .cloned()
        .collect()
}

pub fn find_attribute_processor(
    view: &ProjectView,
    scope: &NamespaceScope,
    name: &str,
) -> Option<Arc<AttributeProcessor>> {
    let (prefix, local) = split_qualified(name)?;
    view.attribute_processors()
        .iter()
        .find(|p| {
            p.dialect().prefix() == prefix
                && p.name() == local
                && scope.is_dialect_in_scope(p.dialect())
        })
        .cloned()
}

pub fn find_element_processor(
    view: &ProjectView,
    scope: &NamespaceScope,
    name: &str,
) -> Option<Arc<ElementProcessor>> {
    let (prefix, local) = split_qualified(name)?;
    view.element_processors()
        .iter()
        .find(|p| {
            p.dialect().prefix() == prefix
                && p.name() == local
                && scope.is_dialect_in_scope(p.dialect())
        })
        .cloned()
}

/// Attribute processor first, then element processor.
pub fn find_processor(view: &ProjectView, scope: &NamespaceScope, name: &str) -> Option<Processor> {
    find_attribute_processor(view, scope, name)
        .map(Processor::Attribute)
        .or_else(|| find_element_processor(view, scope, name).map(Processor::Element))
}

/// Helper method by its exact `#object.member` name.
pub fn find_helper_method(
    view: &ProjectView,
    scope: &NamespaceScope,
    name: &str,
) -> Option<Arc<ExpressionHelperMethod>> {
    if name.is_empty() {
        return None;
    }
    view.helper_methods()
        .iter()
        .find(|m| m.full_name() == name && scope.is_dialect_in_scope(m.dialect()))
        .cloned()
}
