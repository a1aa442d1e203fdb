//! Dialect definition reader.
//!
//! Dialect definitions are XML documents whose root element is bound to
//! [`DIALECT_SCHEMA_NAMESPACE`]:
//!
//! ```xml
//! <dialect xmlns="http://www.thymeleaf.org/extras/dialect"
//!          prefix="th" namespace-uri="http://www.thymeleaf.org" namespace-strict="false">
//!   <attribute-processor name="text">
//!     <documentation see-also="utext" reference="Using texts">Sets the element body.</documentation>
//!     <restrictions tags="-script" attributes="-th:utext" values="a b"/>
//!   </attribute-processor>
//!   <element-processor name="block"/>
//!   <expression-object name="dates" class="org.thymeleaf.expression.Dates"/>
//!   <expression-object-method name="strings.isEmpty"/>
//! </dialect>
//! ```
//!
//! `<expression-object>` entries are not items themselves; they are returned
//! as [`ExpressionObjectRef`]s so the loader can synthesize their helper
//! methods through a [`ClassMemberLister`](super::ClassMemberLister).

use std::sync::Arc;

use quick_xml::events::{BytesStart, Event};
use quick_xml::name::ResolveResult;
use quick_xml::{NsReader, Reader};
use rustc_hash::FxHashSet;

use super::model::{
    AttributeProcessor, AttributeRestrictions, Dialect, DialectItem, Documentation,
    ElementProcessor, ExpressionHelperMethod,
};
use super::DialectError;
use crate::base::constants::DIALECT_SCHEMA_NAMESPACE;

/// Element and attribute names of the dialect schema.
pub mod tags {
    pub const DIALECT: &[u8] = b"dialect";
    pub const ATTRIBUTE_PROCESSOR: &[u8] = b"attribute-processor";
    pub const ELEMENT_PROCESSOR: &[u8] = b"element-processor";
    pub const EXPRESSION_OBJECT: &[u8] = b"expression-object";
    pub const EXPRESSION_OBJECT_METHOD: &[u8] = b"expression-object-method";
    pub const DOCUMENTATION: &[u8] = b"documentation";
    pub const RESTRICTIONS: &[u8] = b"restrictions";
}

/// A utility object bound to a host-language class.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExpressionObjectRef {
    pub name: Arc<str>,
    pub class: Arc<str>,
    pub documentation: Option<Documentation>,
}

/// Result of reading one definition source.
#[derive(Clone, Debug)]
pub struct ParsedDialect {
    pub dialect: Arc<Dialect>,
    /// Items in document order.
    pub items: Vec<DialectItem>,
    /// Utility objects whose helper methods still need synthesizing.
    pub expression_objects: Vec<ExpressionObjectRef>,
}

/// Read a dialect definition, checking its root namespace first.
pub fn read_dialect(input: &[u8]) -> Result<ParsedDialect, DialectError> {
    let found = root_namespace(input)?;
    if found.as_deref() != Some(DIALECT_SCHEMA_NAMESPACE) {
        return Err(DialectError::SchemaMismatch { found });
    }
    DialectReader::new().read(input)
}

/// Namespace URI the root element is bound to, if any.
///
/// Only reads up to the root start tag.
pub fn root_namespace(input: &[u8]) -> Result<Option<String>, DialectError> {
    let mut reader = NsReader::from_reader(input);
    let mut buf = Vec::new();

    loop {
        match reader.read_resolved_event_into(&mut buf) {
            Ok((ResolveResult::Bound(ns), Event::Start(_) | Event::Empty(_))) => {
                return Ok(Some(String::from_utf8_lossy(ns.as_ref()).into_owned()));
            }
            Ok((_, Event::Start(_) | Event::Empty(_))) => return Ok(None),
            Ok((_, Event::Eof)) => return Ok(None),
            Ok(_) => {}
            Err(e) => return Err(DialectError::xml(format!("XML parse error: {e}"))),
        }
        buf.clear();
    }
}

/// Whether the bytes look like a dialect definition.
pub fn is_dialect_definition(input: &[u8]) -> bool {
    matches!(root_namespace(input), Ok(Some(ns)) if ns == DIALECT_SCHEMA_NAMESPACE)
}

#[derive(Debug)]
enum PendingKind {
    Attribute,
    Element,
    Helper { property_style: bool },
    ExpressionObject { class: String },
}

#[derive(Debug)]
struct PendingItem {
    kind: PendingKind,
    name: String,
    documentation: Option<PendingDocumentation>,
    restrictions: Option<AttributeRestrictions>,
}

#[derive(Debug, Default)]
struct PendingDocumentation {
    text: String,
    see_also: Vec<String>,
    reference: Option<String>,
}

/// Streaming reader for one dialect definition document.
pub struct DialectReader {
    dialect: Option<Arc<Dialect>>,
    current: Option<PendingItem>,
    documentation: Option<PendingDocumentation>,
    finished: Vec<PendingItem>,
}

impl Default for DialectReader {
    fn default() -> Self {
        Self::new()
    }
}

impl DialectReader {
    pub fn new() -> Self {
        Self {
            dialect: None,
            current: None,
            documentation: None,
            finished: Vec::new(),
        }
    }

    pub fn read(mut self, input: &[u8]) -> Result<ParsedDialect, DialectError> {
        let mut reader = Reader::from_reader(input);
        reader.config_mut().trim_text(true);

        let mut buf = Vec::new();

        loop {
            match reader.read_event_into(&mut buf) {
                Ok(Event::Start(ref e)) => {
                    self.handle_start_element(e)?;
                }
                Ok(Event::Empty(ref e)) => {
                    // Self-closing element - handle as start + end
                    self.handle_start_element(e)?;
                    self.handle_end_element(e.local_name().as_ref());
                }
                Ok(Event::End(ref e)) => {
                    self.handle_end_element(e.local_name().as_ref());
                }
                Ok(Event::Text(ref e)) => {
                    let text = e
                        .unescape()
                        .map_err(|e| DialectError::xml(format!("Text error: {e}")))?;
                    self.handle_text(&text);
                }
                Ok(Event::CData(e)) => {
                    let text = String::from_utf8_lossy(&e.into_inner()).into_owned();
                    self.handle_text(&text);
                }
                Ok(Event::Eof) => break,
                Err(e) => {
                    return Err(DialectError::xml(format!(
                        "XML parse error at position {}: {e}",
                        reader.error_position()
                    )));
                }
                _ => {}
            }
            buf.clear();
        }

        self.build()
    }

    fn handle_start_element(&mut self, e: &BytesStart<'_>) -> Result<(), DialectError> {
        let local_name = e.local_name();
        let tag = local_name.as_ref();

        if self.dialect.is_none() {
            if tag != tags::DIALECT {
                return Err(DialectError::missing_element("dialect"));
            }
            self.dialect = Some(Arc::new(read_dialect_attributes(e)?));
            return Ok(());
        }

        match tag {
            tags::ATTRIBUTE_PROCESSOR
            | tags::ELEMENT_PROCESSOR
            | tags::EXPRESSION_OBJECT
            | tags::EXPRESSION_OBJECT_METHOD => {
                if self.current.is_some() {
                    return Err(DialectError::Invalid {
                        kind: "element",
                        message: format!(
                            "<{}> nested inside another item",
                            String::from_utf8_lossy(tag)
                        ),
                    });
                }
                let name = required_attribute(e, "name")?;
                let kind = match tag {
                    tags::ATTRIBUTE_PROCESSOR => PendingKind::Attribute,
                    tags::ELEMENT_PROCESSOR => PendingKind::Element,
                    tags::EXPRESSION_OBJECT => PendingKind::ExpressionObject {
                        class: required_attribute(e, "class")?,
                    },
                    _ => PendingKind::Helper {
                        property_style: bool_attribute(e, "javabean")?.unwrap_or(false),
                    },
                };
                self.current = Some(PendingItem {
                    kind,
                    name,
                    documentation: None,
                    restrictions: None,
                });
            }
            tags::DOCUMENTATION => {
                if self.current.is_none() {
                    return Ok(());
                }
                self.documentation = Some(PendingDocumentation {
                    text: String::new(),
                    see_also: list_attribute(e, "see-also")?,
                    reference: attribute(e, "reference")?,
                });
            }
            tags::RESTRICTIONS => {
                if let Some(item) = self.current.as_mut() {
                    if matches!(item.kind, PendingKind::Attribute) {
                        item.restrictions = Some(AttributeRestrictions {
                            tags: into_arcs(list_attribute(e, "tags")?),
                            attributes: into_arcs(list_attribute(e, "attributes")?),
                            values: into_arcs(list_attribute(e, "values")?),
                        });
                    }
                }
            }
            other => {
                tracing::trace!(
                    "Ignoring unknown dialect element <{}>",
                    String::from_utf8_lossy(other)
                );
            }
        }

        Ok(())
    }

    fn handle_end_element(&mut self, tag: &[u8]) {
        match tag {
            tags::DOCUMENTATION => {
                if let (Some(doc), Some(item)) = (self.documentation.take(), self.current.as_mut())
                {
                    item.documentation = Some(doc);
                }
            }
            tags::ATTRIBUTE_PROCESSOR
            | tags::ELEMENT_PROCESSOR
            | tags::EXPRESSION_OBJECT
            | tags::EXPRESSION_OBJECT_METHOD => {
                if let Some(item) = self.current.take() {
                    self.finished.push(item);
                }
            }
            _ => {}
        }
    }

    fn handle_text(&mut self, text: &str) {
        if let Some(doc) = self.documentation.as_mut() {
            if !doc.text.is_empty() {
                doc.text.push(' ');
            }
            doc.text.push_str(text.trim());
        }
    }

    /// Turn pending entries into items owned by the dialect.
    fn build(self) -> Result<ParsedDialect, DialectError> {
        let dialect = self
            .dialect
            .ok_or_else(|| DialectError::missing_element("dialect"))?;

        // Names see-also entries may point at
        let known: FxHashSet<String> = self
            .finished
            .iter()
            .map(|item| item.name.clone())
            .collect();

        let mut items = Vec::new();
        let mut expression_objects = Vec::new();

        for pending in self.finished {
            let documentation = pending
                .documentation
                .map(|doc| resolve_documentation(doc, &known, &dialect));

            match pending.kind {
                PendingKind::Attribute => {
                    let mut processor = AttributeProcessor::new(dialect.clone(), pending.name);
                    processor.documentation = documentation;
                    processor.restrictions = pending.restrictions;
                    items.push(processor.into());
                }
                PendingKind::Element => {
                    let mut processor = ElementProcessor::new(dialect.clone(), pending.name);
                    processor.documentation = documentation;
                    items.push(processor.into());
                }
                PendingKind::Helper { property_style } => {
                    let mut method = ExpressionHelperMethod::new(dialect.clone(), &pending.name)
                        .with_property_style(property_style);
                    method.documentation = documentation;
                    items.push(method.into());
                }
                PendingKind::ExpressionObject { class } => {
                    expression_objects.push(ExpressionObjectRef {
                        name: Arc::from(pending.name),
                        class: Arc::from(class),
                        documentation,
                    });
                }
            }
        }

        Ok(ParsedDialect {
            dialect,
            items,
            expression_objects,
        })
    }
}

fn resolve_documentation(
    doc: PendingDocumentation,
    known: &FxHashSet<String>,
    dialect: &Dialect,
) -> Documentation {
    let see_also = doc
        .see_also
        .into_iter()
        .filter(|name| {
            let found = known.contains(name);
            if !found {
                tracing::debug!(
                    "Dropping unresolved see-also reference {name} in dialect {dialect}"
                );
            }
            found
        })
        .map(Arc::from)
        .collect();

    Documentation {
        text: Arc::from(doc.text),
        see_also,
        reference: doc.reference.map(Arc::from),
    }
}

fn read_dialect_attributes(e: &BytesStart<'_>) -> Result<Dialect, DialectError> {
    let prefix = required_attribute(e, "prefix")?;
    let namespace_uri = required_attribute(e, "namespace-uri")?;
    let strict = bool_attribute(e, "namespace-strict")?.unwrap_or(false);

    let mut dialect = Dialect::new(prefix, namespace_uri).with_namespace_strict(strict);
    if let Some(class) = attribute(e, "class")? {
        dialect = dialect.with_class(class);
    }
    Ok(dialect)
}

fn attribute(e: &BytesStart<'_>, name: &str) -> Result<Option<String>, DialectError> {
    match e.try_get_attribute(name) {
        Ok(Some(attr)) => attr
            .unescape_value()
            .map(|value| Some(value.into_owned()))
            .map_err(|e| DialectError::xml(format!("Attribute value error: {e}"))),
        Ok(None) => Ok(None),
        Err(e) => Err(DialectError::xml(format!("Attribute error: {e}"))),
    }
}

fn required_attribute(e: &BytesStart<'_>, name: &str) -> Result<String, DialectError> {
    match attribute(e, name)? {
        Some(value) if !value.trim().is_empty() => Ok(value.trim().to_string()),
        _ => Err(DialectError::missing_attribute(name)),
    }
}

fn bool_attribute(e: &BytesStart<'_>, name: &str) -> Result<Option<bool>, DialectError> {
    match attribute(e, name)?.as_deref().map(str::trim) {
        None => Ok(None),
        Some("true") => Ok(Some(true)),
        Some("false") => Ok(Some(false)),
        Some(other) => Err(DialectError::invalid_attribute(format!(
            "{name}=\"{other}\" is not a boolean"
        ))),
    }
}

fn list_attribute(e: &BytesStart<'_>, name: &str) -> Result<Vec<String>, DialectError> {
    Ok(attribute(e, name)?
        .map(|value| value.split_whitespace().map(str::to_string).collect())
        .unwrap_or_default())
}

fn into_arcs(values: Vec<String>) -> Vec<Arc<str>> {
    values.into_iter().map(Arc::from).collect()
}
