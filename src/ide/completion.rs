//! Completion proposals.
//!
//! Every proposal kind shares one [`CompletionProposal`] shape. How a kind
//! turns a matched name into inserted text is looked up in a capability
//! table instead of being spread over per-kind types.

use std::sync::Arc;

use text_size::{TextRange, TextSize};

use super::context::{CursorContext, CursorContextError, CursorLocation};
use super::documentation::item_documentation;
use super::text_utils::{helper_pattern_before, processor_pattern_before};
use crate::dialect::DialectItem;
use crate::matching::{
    ElementSnapshot, NamespaceScope, allowed_values, find_attribute_processor,
    find_attribute_processors, find_element_processors, find_helper_methods, is_applicable,
};
use crate::registry::ProjectView;

/// Kind of completion proposal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ProposalKind {
    AttributeProcessor,
    DataAttributeProcessor,
    ElementProcessor,
    HelperMethod,
    AttributeValue,
}

impl ProposalKind {
    /// Convert to LSP completion item kind number.
    pub fn to_lsp(&self) -> u32 {
        capability(*self).lsp_kind
    }

    /// Icon key for the host's image registry.
    pub fn icon_key(&self) -> &'static str {
        capability(*self).icon
    }
}

/// Inputs to a kind's formatting strategy.
struct FormatInput<'a> {
    /// Part of the name not typed yet (or the whole value for values).
    remaining: &'a str,
    full_name: &'a str,
    element_closed: bool,
    property_style: bool,
}

/// Inserted text plus the cursor position within it.
struct Insertion {
    text: String,
    cursor: usize,
}

struct Capability {
    lsp_kind: u32,
    icon: &'static str,
    format: fn(&FormatInput<'_>) -> Insertion,
}

const ATTRIBUTE: Capability = Capability {
    lsp_kind: 10, // Property
    icon: "attribute-processor",
    format: format_attribute,
};

const DATA_ATTRIBUTE: Capability = Capability {
    lsp_kind: 10, // Property
    icon: "attribute-processor",
    format: format_attribute,
};

const ELEMENT: Capability = Capability {
    lsp_kind: 7, // Class
    icon: "element-processor",
    format: format_element,
};

const HELPER: Capability = Capability {
    lsp_kind: 2, // Method
    icon: "expression-object-method",
    format: format_helper,
};

const VALUE: Capability = Capability {
    lsp_kind: 12, // Value
    icon: "attribute-value",
    format: format_value,
};

fn capability(kind: ProposalKind) -> &'static Capability {
    match kind {
        ProposalKind::AttributeProcessor => &ATTRIBUTE,
        ProposalKind::DataAttributeProcessor => &DATA_ATTRIBUTE,
        ProposalKind::ElementProcessor => &ELEMENT,
        ProposalKind::HelperMethod => &HELPER,
        ProposalKind::AttributeValue => &VALUE,
    }
}

/// `name=""`, cursor between the quotes.
fn format_attribute(input: &FormatInput<'_>) -> Insertion {
    Insertion {
        text: format!("{}=\"\"", input.remaining),
        cursor: input.remaining.len() + 2,
    }
}

/// `name>` plus the end tag if the element is not closed yet, cursor after `>`.
fn format_element(input: &FormatInput<'_>) -> Insertion {
    let mut text = format!("{}>", input.remaining);
    let cursor = text.len();
    if !input.element_closed {
        text.push_str(&format!("</{}>", input.full_name));
    }
    Insertion { text, cursor }
}

/// `name()` with the cursor inside the parentheses, or just `name` for
/// property-style helpers.
fn format_helper(input: &FormatInput<'_>) -> Insertion {
    if input.property_style {
        Insertion {
            text: input.remaining.to_string(),
            cursor: input.remaining.len(),
        }
    } else {
        Insertion {
            text: format!("{}()", input.remaining),
            cursor: input.remaining.len() + 1,
        }
    }
}

fn format_value(input: &FormatInput<'_>) -> Insertion {
    Insertion {
        text: input.remaining.to_string(),
        cursor: input.remaining.len(),
    }
}

/// A completion suggestion.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CompletionProposal {
    pub kind: ProposalKind,
    /// Text shown in the proposal list.
    pub display: Arc<str>,
    /// Text that replaces `replace`.
    pub insert_text: Arc<str>,
    /// Document range replaced on application (empty for plain insertion).
    pub replace: TextRange,
    /// Document offset of the cursor after application.
    pub cursor_after: TextSize,
    /// Markdown documentation.
    pub documentation: Option<Arc<str>>,
    pub icon: Option<&'static str>,
}

impl CompletionProposal {
    fn new(
        kind: ProposalKind,
        display: &str,
        input: FormatInput<'_>,
        replace: TextRange,
        item: Option<DialectItem>,
    ) -> Self {
        let capability = capability(kind);
        let insertion = (capability.format)(&input);
        let cursor = TextSize::try_from(insertion.cursor).unwrap_or_default();

        Self {
            kind,
            display: Arc::from(display),
            insert_text: Arc::from(insertion.text),
            replace,
            cursor_after: replace.start() + cursor,
            documentation: item
                .as_ref()
                .and_then(item_documentation)
                .map(Arc::from),
            icon: Some(capability.icon),
        }
    }

    /// Whether the proposal still applies after `typed` was entered at its
    /// insertion point.
    pub fn is_valid_for(&self, typed: &str) -> bool {
        self.insert_text.starts_with(typed)
    }

    /// The document text with this proposal applied.
    pub fn apply_to(&self, text: &str) -> Option<String> {
        let start = usize::from(self.replace.start());
        let end = usize::from(self.replace.end());
        let mut out = String::with_capacity(text.len() + self.insert_text.len());
        out.push_str(text.get(..start)?);
        out.push_str(&self.insert_text);
        out.push_str(text.get(end..)?);
        Some(out)
    }
}

/// Get completion proposals at an offset.
///
/// Context failures yield no proposals.
pub fn completions(
    view: &ProjectView,
    ctx: &dyn CursorContext,
    offset: TextSize,
) -> Vec<CompletionProposal> {
    match compute_completions(view, ctx, offset) {
        Ok(proposals) => proposals,
        Err(e) => {
            tracing::debug!("No completions at {offset:?}: {e}");
            Vec::new()
        }
    }
}

fn compute_completions(
    view: &ProjectView,
    ctx: &dyn CursorContext,
    offset: TextSize,
) -> Result<Vec<CompletionProposal>, CursorContextError> {
    let text = ctx.text();
    let len = TextSize::of(text);
    if offset > len {
        return Err(CursorContextError::OutOfBounds { offset, len });
    }

    let location = ctx.location(offset)?;
    if location == CursorLocation::Text {
        return Ok(Vec::new());
    }
    let scope = NamespaceScope::for_view(view, ctx.namespaces(offset)?);

    let proposals = match location {
        CursorLocation::ElementName { element_closed } => {
            element_proposals(view, &scope, text, offset, element_closed)
        }
        CursorLocation::AttributeName => {
            let element = ctx.element(offset)?.unwrap_or_default();
            attribute_proposals(view, &scope, text, offset, &element)
        }
        CursorLocation::AttributeValue {
            attribute,
            value_range,
        } => {
            let mut proposals = value_proposals(view, &scope, text, &attribute, value_range);
            proposals.extend(helper_proposals(view, &scope, text, offset));
            proposals
        }
        CursorLocation::Text => Vec::new(),
    };
    Ok(proposals)
}

/// Attribute processors, first as `prefix:name`, then as `data-prefix-name`.
fn attribute_proposals(
    view: &ProjectView,
    scope: &NamespaceScope,
    text: &str,
    offset: TextSize,
    element: &ElementSnapshot,
) -> Vec<CompletionProposal> {
    let pattern = processor_pattern_before(text, offset);
    let processors = find_attribute_processors(view, scope, pattern);
    let mut proposals = Vec::new();

    for data in [false, true] {
        for processor in &processors {
            let (kind, name) = if data {
                (ProposalKind::DataAttributeProcessor, processor.full_data_name())
            } else {
                (ProposalKind::AttributeProcessor, processor.full_name())
            };

            if !name.starts_with(pattern) || element.has_attribute(name) {
                continue;
            }
            if !is_applicable(processor, element) {
                continue;
            }

            proposals.push(CompletionProposal::new(
                kind,
                name,
                FormatInput {
                    remaining: &name[pattern.len()..],
                    full_name: name,
                    element_closed: false,
                    property_style: false,
                },
                TextRange::empty(offset),
                Some(DialectItem::Attribute(processor.clone())),
            ));
        }
    }

    proposals
}

fn element_proposals(
    view: &ProjectView,
    scope: &NamespaceScope,
    text: &str,
    offset: TextSize,
    element_closed: bool,
) -> Vec<CompletionProposal> {
    let pattern = processor_pattern_before(text, offset);
    find_element_processors(view, scope, pattern)
        .into_iter()
        .map(|processor| {
            let name = processor.full_name();
            CompletionProposal::new(
                ProposalKind::ElementProcessor,
                name,
                FormatInput {
                    remaining: &name[pattern.len()..],
                    full_name: name,
                    element_closed,
                    property_style: false,
                },
                TextRange::empty(offset),
                Some(DialectItem::Element(processor.clone())),
            )
        })
        .collect()
}

/// Helper methods are only proposed once an expression object reference
/// (`#...`) is being typed.
fn helper_proposals(
    view: &ProjectView,
    scope: &NamespaceScope,
    text: &str,
    offset: TextSize,
) -> Vec<CompletionProposal> {
    let pattern = helper_pattern_before(text, offset);
    if !pattern.starts_with('#') {
        return Vec::new();
    }

    find_helper_methods(view, scope, pattern)
        .into_iter()
        .map(|method| {
            let name = method.full_name();
            CompletionProposal::new(
                ProposalKind::HelperMethod,
                name,
                FormatInput {
                    remaining: &name[pattern.len()..],
                    full_name: name,
                    element_closed: false,
                    property_style: method.is_property_style(),
                },
                TextRange::empty(offset),
                Some(DialectItem::Helper(method.clone())),
            )
        })
        .collect()
}

/// Literal values of the attribute's processor, replacing the current value.
fn value_proposals(
    view: &ProjectView,
    scope: &NamespaceScope,
    text: &str,
    attribute: &str,
    value_range: TextRange,
) -> Vec<CompletionProposal> {
    let range = usize::from(value_range.start())..usize::from(value_range.end());
    if text.get(range).is_none() {
        return Vec::new();
    }
    let Some(processor) = find_attribute_processor(view, scope, attribute) else {
        return Vec::new();
    };

    allowed_values(&processor)
        .iter()
        .map(|value| {
            CompletionProposal::new(
                ProposalKind::AttributeValue,
                value,
                FormatInput {
                    remaining: value,
                    full_name: value,
                    element_closed: false,
                    property_style: false,
                },
                value_range,
                None,
            )
        })
        .collect()
}
