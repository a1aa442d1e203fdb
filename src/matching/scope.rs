use crate::dialect::Dialect;
use crate::registry::ProjectView;

/// A namespace declaration (`xmlns:prefix="uri"`) visible at the cursor.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Namespace {
    prefix: String,
    uri: String,
}

impl Namespace {
    pub fn new(prefix: impl Into<String>, uri: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            uri: uri.into(),
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn uri(&self) -> &str {
        &self.uri
    }

    /// Whether items of the dialect are visible under this declaration.
    ///
    /// The prefix must match; the URI only has to match for strict dialects.
    pub fn admits(&self, dialect: &Dialect) -> bool {
        self.prefix == dialect.prefix()
            && (!dialect.is_namespace_strict() || self.uri == dialect.namespace_uri())
    }
}

/// Namespaces in scope at the cursor, plus the project's dialect mode.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NamespaceScope {
    declared: Vec<Namespace>,
    dialect_mode: bool,
}

impl NamespaceScope {
    pub fn new(declared: impl IntoIterator<Item = Namespace>) -> Self {
        Self {
            declared: declared.into_iter().collect(),
            dialect_mode: false,
        }
    }

    /// Declarations at the cursor combined with the view's dialect mode.
    pub fn for_view(view: &ProjectView, declared: impl IntoIterator<Item = Namespace>) -> Self {
        Self::new(declared).with_dialect_mode(view.dialect_mode())
    }

    /// With dialect mode on, every dialect visible to the project is in scope
    /// whether or not the document declares it.
    pub fn with_dialect_mode(mut self, enabled: bool) -> Self {
        self.dialect_mode = enabled;
        self
    }

    pub fn declared(&self) -> &[Namespace] {
        &self.declared
    }

    pub fn dialect_mode(&self) -> bool {
        self.dialect_mode
    }

    pub fn is_dialect_in_scope(&self, dialect: &Dialect) -> bool {
        self.dialect_mode || self.declared.iter().any(|ns| ns.admits(dialect))
    }
}
