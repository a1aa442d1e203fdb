//! Dialect model and definition reading.
//!
//! - [`Dialect`] and the [`DialectItem`] variants it owns
//! - [`read_dialect`] for XML definition sources
//! - [`ClassMemberLister`] for synthesizing expression object helpers
//! - [`DialectError`]

mod error;
mod model;
mod synthesis;
mod xml;

pub use error::DialectError;
pub use model::{
    AttributeProcessor, AttributeRestrictions, Dialect, DialectItem, Documentation,
    ElementProcessor, ExpressionHelperMethod, ItemKind, Processor,
};
pub use synthesis::{
    ClassMember, ClassMemberLister, NoClassMembers, StaticClassMembers, property_name,
    synthesize_helper_methods,
};
pub use xml::{
    DialectReader, ExpressionObjectRef, ParsedDialect, is_dialect_definition, read_dialect,
    root_namespace,
};
