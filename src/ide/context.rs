//! Cursor context: what the host editor knows about the document.
//!
//! The markup parser and document model belong to the host. The core only
//! asks the questions in [`CursorContext`]; every answer may fail if the
//! document changed underneath the query.

use text_size::{TextRange, TextSize};
use thiserror::Error;

use crate::base::constants::XMLNS_PREFIX;
use crate::matching::{ElementSnapshot, Namespace};

/// Errors a host can report while answering a cursor query.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CursorContextError {
    #[error("Offset {offset:?} is outside the document ({len:?})")]
    OutOfBounds { offset: TextSize, len: TextSize },

    #[error("Document changed during the query")]
    Stale,

    #[error("{0}")]
    Other(String),
}

/// Syntactic position of the cursor.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CursorLocation {
    /// Typing a tag name right after `<`.
    ElementName {
        /// Whether the element already has its end tag.
        element_closed: bool,
    },
    /// Inside a start tag where an attribute name goes.
    AttributeName,
    /// Inside the quotes of an attribute value.
    AttributeValue {
        attribute: String,
        /// The value text, quotes excluded.
        value_range: TextRange,
    },
    /// Anywhere else.
    Text,
}

/// Document queries answered by the host.
pub trait CursorContext {
    /// Full document text.
    fn text(&self) -> &str;

    fn location(&self, offset: TextSize) -> Result<CursorLocation, CursorContextError>;

    /// The element enclosing the cursor, if any.
    fn element(&self, offset: TextSize) -> Result<Option<ElementSnapshot>, CursorContextError>;

    /// Namespace declarations visible at the cursor, nearest first.
    fn namespaces(&self, offset: TextSize) -> Result<Vec<Namespace>, CursorContextError>;
}

/// A node of the host's markup tree.
pub trait MarkupNode: Sized {
    /// Attributes as written, in document order.
    fn attributes(&self) -> Vec<(String, String)>;

    fn parent(&self) -> Option<Self>;
}

/// Collect `xmlns:prefix="uri"` declarations from `node` up through its
/// ancestors. A prefix declared closer to the node shadows the same prefix
/// further up.
pub fn collect_namespaces<N: MarkupNode>(node: &N) -> Vec<Namespace> {
    let mut namespaces = Vec::new();
    collect_from(node, &mut namespaces);

    let mut current = node.parent();
    while let Some(parent) = current {
        collect_from(&parent, &mut namespaces);
        current = parent.parent();
    }

    namespaces
}

fn collect_from<N: MarkupNode>(node: &N, namespaces: &mut Vec<Namespace>) {
    for (name, value) in node.attributes() {
        if let Some(prefix) = name.strip_prefix(XMLNS_PREFIX) {
            if !prefix.is_empty() && !namespaces.iter().any(|ns| ns.prefix() == prefix) {
                namespaces.push(Namespace::new(prefix, value));
            }
        }
    }
}

/// Cursor context with fixed answers, for hosts that compute them up front.
#[derive(Clone, Debug)]
pub struct FixedCursorContext {
    text: String,
    location: CursorLocation,
    element: Option<ElementSnapshot>,
    namespaces: Vec<Namespace>,
}

impl FixedCursorContext {
    pub fn new(text: impl Into<String>, location: CursorLocation) -> Self {
        Self {
            text: text.into(),
            location,
            element: None,
            namespaces: Vec::new(),
        }
    }

    pub fn with_element(mut self, element: ElementSnapshot) -> Self {
        self.element = Some(element);
        self
    }

    pub fn with_namespace(mut self, prefix: impl Into<String>, uri: impl Into<String>) -> Self {
        self.namespaces.push(Namespace::new(prefix, uri));
        self
    }

    fn check(&self, offset: TextSize) -> Result<(), CursorContextError> {
        let len = TextSize::of(self.text.as_str());
        if offset > len {
            return Err(CursorContextError::OutOfBounds { offset, len });
        }
        Ok(())
    }
}

impl CursorContext for FixedCursorContext {
    fn text(&self) -> &str {
        &self.text
    }

    fn location(&self, offset: TextSize) -> Result<CursorLocation, CursorContextError> {
        self.check(offset)?;
        Ok(self.location.clone())
    }

    fn element(&self, offset: TextSize) -> Result<Option<ElementSnapshot>, CursorContextError> {
        self.check(offset)?;
        Ok(self.element.clone())
    }

    fn namespaces(&self, offset: TextSize) -> Result<Vec<Namespace>, CursorContextError> {
        self.check(offset)?;
        Ok(self.namespaces.clone())
    }
}
