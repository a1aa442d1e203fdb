//! Hover information implementation.

use std::sync::Arc;

use text_size::{TextRange, TextSize};

use super::context::{CursorContext, CursorLocation};
use super::documentation::item_documentation;
use super::text_utils::{CharClass, word_around};
use crate::base::constants::DATA_ATTRIBUTE_PREFIX;
use crate::dialect::{DialectItem, Processor};
use crate::matching::{
    NamespaceScope, find_attribute_processor, find_element_processor, find_helper_method,
    find_processor,
};
use crate::registry::ProjectView;

/// Result of a hover request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HoverResult {
    /// The hover content (markdown).
    pub contents: String,
    /// Full name of the hovered item.
    pub name: Arc<str>,
    /// Range of the hovered word.
    pub range: TextRange,
}

/// Get hover information for the dialect item under the cursor.
pub fn hover(view: &ProjectView, ctx: &dyn CursorContext, offset: TextSize) -> Option<HoverResult> {
    let text = ctx.text();
    let location = match ctx.location(offset) {
        Ok(location) => location,
        Err(e) => {
            tracing::debug!("No hover at {offset:?}: {e}");
            return None;
        }
    };
    let namespaces = ctx.namespaces(offset).ok()?;
    let scope = NamespaceScope::for_view(view, namespaces);

    if let Some((range, word)) = word_around(text, offset, CharClass::Processor) {
        if let Some(item) = processor_at(view, &scope, &location, word) {
            return Some(build(item, range));
        }
    }

    let (range, word) = word_around(text, offset, CharClass::Helper)?;
    let method = find_helper_method(view, &scope, word)?;
    Some(build(DialectItem::Helper(method), range))
}

fn processor_at(
    view: &ProjectView,
    scope: &NamespaceScope,
    location: &CursorLocation,
    word: &str,
) -> Option<DialectItem> {
    match location {
        CursorLocation::ElementName { .. } => find_element_processor(view, scope, word)
            .map(DialectItem::Element)
            .or_else(|| find_attribute_processor(view, scope, word).map(DialectItem::Attribute)),
        _ => {
            let processor = match data_attribute_name(word) {
                Some(name) => find_attribute_processor(view, scope, &name).map(Processor::Attribute),
                None => find_processor(view, scope, word),
            }?;
            Some(match processor {
                Processor::Attribute(p) => DialectItem::Attribute(p),
                Processor::Element(p) => DialectItem::Element(p),
            })
        }
    }
}

/// `data-th-text` → `th:text`.
fn data_attribute_name(word: &str) -> Option<String> {
    let rest = word.strip_prefix(DATA_ATTRIBUTE_PREFIX)?;
    let (prefix, name) = rest.split_once('-')?;
    Some(format!("{prefix}:{name}"))
}

fn build(item: DialectItem, range: TextRange) -> HoverResult {
    let name: Arc<str> = Arc::from(item.full_name());
    let mut contents = format!("```\n{name}\n```");
    if let Some(doc) = item_documentation(&item) {
        contents.push_str("\n\n");
        contents.push_str(&doc);
    }
    HoverResult {
        contents,
        name,
        range,
    }
}
