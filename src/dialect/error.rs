//! Error types for dialect loading.

use thiserror::Error;

/// Errors that can occur while reading dialect definitions.
#[derive(Debug, Error)]
pub enum DialectError {
    /// XML parsing error.
    #[error("XML error: {0}")]
    Xml(String),

    /// ZIP archive error (packaged dependencies).
    #[error("Archive error: {0}")]
    Archive(String),

    /// IO error during read.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Root element is not bound to the dialect schema namespace.
    #[error("Not a dialect definition: root namespace is {found:?}")]
    SchemaMismatch { found: Option<String> },

    /// Missing required element or attribute.
    #[error("Missing required {kind}: {name}")]
    Missing { kind: &'static str, name: String },

    /// Invalid element or attribute.
    #[error("Invalid {kind}: {message}")]
    Invalid { kind: &'static str, message: String },

    /// A class reference could not be resolved to its members.
    #[error("Unresolved class: {0}")]
    UnresolvedClass(String),
}

impl DialectError {
    /// Create an XML error.
    pub fn xml(message: impl Into<String>) -> Self {
        Self::Xml(message.into())
    }

    /// Create an archive error.
    pub fn archive(message: impl Into<String>) -> Self {
        Self::Archive(message.into())
    }

    /// Create a missing element error.
    pub fn missing_element(name: impl Into<String>) -> Self {
        Self::Missing {
            kind: "element",
            name: name.into(),
        }
    }

    /// Create a missing attribute error.
    pub fn missing_attribute(name: impl Into<String>) -> Self {
        Self::Missing {
            kind: "attribute",
            name: name.into(),
        }
    }

    /// Create an invalid attribute error.
    pub fn invalid_attribute(message: impl Into<String>) -> Self {
        Self::Invalid {
            kind: "attribute",
            message: message.into(),
        }
    }

    /// Create an unresolved class error.
    pub fn unresolved_class(class: impl Into<String>) -> Self {
        Self::UnresolvedClass(class.into())
    }
}
