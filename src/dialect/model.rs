//! In-memory dialect model.
//!
//! A [`Dialect`] is immutable once loaded and shared by every item it
//! produced. Items hold their owning dialect by `Arc`, handed over at
//! construction, so an item can never exist without one.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use crate::base::constants::DATA_ATTRIBUTE_PREFIX;

/// A namespace-prefixed vocabulary of processors and expression helpers.
///
/// Identity is `(prefix, namespace_uri)`; the other fields do not take part
/// in equality or hashing.
#[derive(Clone, Debug)]
pub struct Dialect {
    prefix: Arc<str>,
    namespace_uri: Arc<str>,
    namespace_strict: bool,
    class: Option<Arc<str>>,
}

impl Dialect {
    pub fn new(prefix: impl Into<Arc<str>>, namespace_uri: impl Into<Arc<str>>) -> Self {
        Self {
            prefix: prefix.into(),
            namespace_uri: namespace_uri.into(),
            namespace_strict: false,
            class: None,
        }
    }

    pub fn with_namespace_strict(mut self, strict: bool) -> Self {
        self.namespace_strict = strict;
        self
    }

    pub fn with_class(mut self, class: impl Into<Arc<str>>) -> Self {
        self.class = Some(class.into());
        self
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn namespace_uri(&self) -> &str {
        &self.namespace_uri
    }

    /// Whether items need both prefix and namespace URI to match to be in scope.
    pub fn is_namespace_strict(&self) -> bool {
        self.namespace_strict
    }

    pub fn class(&self) -> Option<&str> {
        self.class.as_deref()
    }
}

impl PartialEq for Dialect {
    fn eq(&self, other: &Self) -> bool {
        self.prefix == other.prefix && self.namespace_uri == other.namespace_uri
    }
}

impl Eq for Dialect {}

impl Hash for Dialect {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.prefix.hash(state);
        self.namespace_uri.hash(state);
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.prefix, self.namespace_uri)
    }
}

/// Documentation attached to a dialect item.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Documentation {
    /// Free-form documentation text.
    pub text: Arc<str>,
    /// Names of related items in the same dialect.
    pub see_also: Vec<Arc<str>>,
    /// External reference (section of the dialect's manual, URL).
    pub reference: Option<Arc<str>>,
}

impl Documentation {
    pub fn new(text: impl Into<Arc<str>>) -> Self {
        Self {
            text: text.into(),
            see_also: Vec::new(),
            reference: None,
        }
    }

    pub fn with_see_also(mut self, names: impl IntoIterator<Item = impl Into<Arc<str>>>) -> Self {
        self.see_also = names.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_reference(mut self, reference: impl Into<Arc<str>>) -> Self {
        self.reference = Some(reference.into());
        self
    }
}

/// Where an attribute processor may be proposed.
///
/// Tag and attribute entries prefixed with `-` are forbidden rather than
/// required. Attribute entries may carry an `=value` suffix.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AttributeRestrictions {
    pub tags: Vec<Arc<str>>,
    pub attributes: Vec<Arc<str>>,
    pub values: Vec<Arc<str>>,
}

impl AttributeRestrictions {
    pub fn is_empty(&self) -> bool {
        self.tags.is_empty() && self.attributes.is_empty() && self.values.is_empty()
    }
}

/// A custom attribute recognized by the templating engine.
#[derive(Clone, Debug)]
pub struct AttributeProcessor {
    name: Arc<str>,
    dialect: Arc<Dialect>,
    full_name: Arc<str>,
    full_data_name: Arc<str>,
    pub documentation: Option<Documentation>,
    pub restrictions: Option<AttributeRestrictions>,
}

impl AttributeProcessor {
    pub fn new(dialect: Arc<Dialect>, name: impl Into<Arc<str>>) -> Self {
        let name = name.into();
        let full_name = Arc::from(format!("{}:{}", dialect.prefix(), name));
        let full_data_name = Arc::from(format!(
            "{DATA_ATTRIBUTE_PREFIX}{}-{}",
            dialect.prefix(),
            name
        ));
        Self {
            name,
            dialect,
            full_name,
            full_data_name,
            documentation: None,
            restrictions: None,
        }
    }

    pub fn with_documentation(mut self, documentation: Documentation) -> Self {
        self.documentation = Some(documentation);
        self
    }

    pub fn with_restrictions(mut self, restrictions: AttributeRestrictions) -> Self {
        self.restrictions = Some(restrictions);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn dialect(&self) -> &Arc<Dialect> {
        &self.dialect
    }

    /// `prefix:name`
    pub fn full_name(&self) -> &str {
        &self.full_name
    }

    /// `data-prefix-name`
    pub fn full_data_name(&self) -> &str {
        &self.full_data_name
    }
}

/// A custom element recognized by the templating engine.
#[derive(Clone, Debug)]
pub struct ElementProcessor {
    name: Arc<str>,
    dialect: Arc<Dialect>,
    full_name: Arc<str>,
    pub documentation: Option<Documentation>,
}

impl ElementProcessor {
    pub fn new(dialect: Arc<Dialect>, name: impl Into<Arc<str>>) -> Self {
        let name = name.into();
        let full_name = Arc::from(format!("{}:{}", dialect.prefix(), name));
        Self {
            name,
            dialect,
            full_name,
            documentation: None,
        }
    }

    pub fn with_documentation(mut self, documentation: Documentation) -> Self {
        self.documentation = Some(documentation);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn dialect(&self) -> &Arc<Dialect> {
        &self.dialect
    }

    /// `prefix:name`
    pub fn full_name(&self) -> &str {
        &self.full_name
    }
}

/// A callable exposed inside template expressions.
#[derive(Clone, Debug)]
pub struct ExpressionHelperMethod {
    object: Option<Arc<str>>,
    name: Arc<str>,
    dialect: Arc<Dialect>,
    qualified_name: Arc<str>,
    full_name: Arc<str>,
    is_property_style: bool,
    pub documentation: Option<Documentation>,
}

impl ExpressionHelperMethod {
    /// A helper declared by name. A dotted name (`dates.format`) is split into
    /// its expression object and member.
    pub fn new(dialect: Arc<Dialect>, name: &str) -> Self {
        match name.split_once('.') {
            Some((object, member)) => Self::object_member(dialect, object, member),
            None => Self::build(dialect, None, Arc::from(name)),
        }
    }

    /// A member of an expression object (`object.member`).
    pub fn object_member(
        dialect: Arc<Dialect>,
        object: impl Into<Arc<str>>,
        member: impl Into<Arc<str>>,
    ) -> Self {
        Self::build(dialect, Some(object.into()), member.into())
    }

    fn build(dialect: Arc<Dialect>, object: Option<Arc<str>>, name: Arc<str>) -> Self {
        let qualified_name: Arc<str> = match &object {
            Some(object) => Arc::from(format!("{object}.{name}")),
            None => name.clone(),
        };
        let full_name = Arc::from(format!("#{qualified_name}"));
        Self {
            object,
            name,
            dialect,
            qualified_name,
            full_name,
            is_property_style: false,
            documentation: None,
        }
    }

    pub fn with_property_style(mut self, property_style: bool) -> Self {
        self.is_property_style = property_style;
        self
    }

    pub fn with_documentation(mut self, documentation: Documentation) -> Self {
        self.documentation = Some(documentation);
        self
    }

    /// Member name without the object.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn object(&self) -> Option<&str> {
        self.object.as_deref()
    }

    pub fn dialect(&self) -> &Arc<Dialect> {
        &self.dialect
    }

    /// `object.member`, or the bare name for helpers without an object.
    pub fn qualified_name(&self) -> &str {
        &self.qualified_name
    }

    /// `#object.member`, as typed inside an expression.
    pub fn full_name(&self) -> &str {
        &self.full_name
    }

    /// Rendered without parentheses (generated from a bean accessor).
    pub fn is_property_style(&self) -> bool {
        self.is_property_style
    }
}

/// Kind of a dialect item.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ItemKind {
    AttributeProcessor,
    ElementProcessor,
    HelperMethod,
}

/// One item of a dialect.
#[derive(Clone, Debug)]
pub enum DialectItem {
    Attribute(Arc<AttributeProcessor>),
    Element(Arc<ElementProcessor>),
    Helper(Arc<ExpressionHelperMethod>),
}

impl DialectItem {
    pub fn kind(&self) -> ItemKind {
        match self {
            DialectItem::Attribute(_) => ItemKind::AttributeProcessor,
            DialectItem::Element(_) => ItemKind::ElementProcessor,
            DialectItem::Helper(_) => ItemKind::HelperMethod,
        }
    }

    /// Name used for ordering and for see-also resolution.
    pub fn name(&self) -> &str {
        match self {
            DialectItem::Attribute(p) => p.name(),
            DialectItem::Element(p) => p.name(),
            DialectItem::Helper(m) => m.qualified_name(),
        }
    }

    pub fn full_name(&self) -> &str {
        match self {
            DialectItem::Attribute(p) => p.full_name(),
            DialectItem::Element(p) => p.full_name(),
            DialectItem::Helper(m) => m.full_name(),
        }
    }

    pub fn dialect(&self) -> &Arc<Dialect> {
        match self {
            DialectItem::Attribute(p) => p.dialect(),
            DialectItem::Element(p) => p.dialect(),
            DialectItem::Helper(m) => m.dialect(),
        }
    }

    pub fn documentation(&self) -> Option<&Documentation> {
        match self {
            DialectItem::Attribute(p) => p.documentation.as_ref(),
            DialectItem::Element(p) => p.documentation.as_ref(),
            DialectItem::Helper(m) => m.documentation.as_ref(),
        }
    }
}

impl From<AttributeProcessor> for DialectItem {
    fn from(processor: AttributeProcessor) -> Self {
        DialectItem::Attribute(Arc::new(processor))
    }
}

impl From<ElementProcessor> for DialectItem {
    fn from(processor: ElementProcessor) -> Self {
        DialectItem::Element(Arc::new(processor))
    }
}

impl From<ExpressionHelperMethod> for DialectItem {
    fn from(method: ExpressionHelperMethod) -> Self {
        DialectItem::Helper(Arc::new(method))
    }
}

/// A processor found by exact name.
#[derive(Clone, Debug)]
pub enum Processor {
    Attribute(Arc<AttributeProcessor>),
    Element(Arc<ElementProcessor>),
}

impl Processor {
    pub fn name(&self) -> &str {
        match self {
            Processor::Attribute(p) => p.name(),
            Processor::Element(p) => p.name(),
        }
    }

    pub fn full_name(&self) -> &str {
        match self {
            Processor::Attribute(p) => p.full_name(),
            Processor::Element(p) => p.full_name(),
        }
    }

    pub fn dialect(&self) -> &Arc<Dialect> {
        match self {
            Processor::Attribute(p) => p.dialect(),
            Processor::Element(p) => p.dialect(),
        }
    }

    pub fn documentation(&self) -> Option<&Documentation> {
        match self {
            Processor::Attribute(p) => p.documentation.as_ref(),
            Processor::Element(p) => p.documentation.as_ref(),
        }
    }
}
