//! Helper method synthesis for expression objects.
//!
//! An `<expression-object>` names a host-language class. Its members are not
//! listed in the definition; the hosting integration supplies them through a
//! [`ClassMemberLister`] (for example backed by its own language model).

use std::sync::Arc;

use rustc_hash::{FxHashMap, FxHashSet};

use super::model::{Dialect, ExpressionHelperMethod};
use super::xml::ExpressionObjectRef;
use super::DialectError;

/// One member of a host-language class.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClassMember {
    pub name: String,
    pub is_public: bool,
    pub is_constructor: bool,
}

impl ClassMember {
    /// A public, non-constructor method.
    pub fn method(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            is_public: true,
            is_constructor: false,
        }
    }
}

/// Lists the members of a class by its fully qualified name.
pub trait ClassMemberLister: Send + Sync {
    fn list_members(&self, class: &str) -> Result<Vec<ClassMember>, DialectError>;
}

/// Lister for hosts without a language model. Every class is unresolved.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoClassMembers;

impl ClassMemberLister for NoClassMembers {
    fn list_members(&self, class: &str) -> Result<Vec<ClassMember>, DialectError> {
        Err(DialectError::unresolved_class(class))
    }
}

/// Lister backed by a fixed table.
#[derive(Debug, Default, Clone)]
pub struct StaticClassMembers {
    classes: FxHashMap<String, Vec<ClassMember>>,
}

impl StaticClassMembers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_class(
        mut self,
        class: impl Into<String>,
        members: impl IntoIterator<Item = ClassMember>,
    ) -> Self {
        self.classes
            .insert(class.into(), members.into_iter().collect());
        self
    }
}

impl ClassMemberLister for StaticClassMembers {
    fn list_members(&self, class: &str) -> Result<Vec<ClassMember>, DialectError> {
        self.classes
            .get(class)
            .cloned()
            .ok_or_else(|| DialectError::unresolved_class(class))
    }
}

/// Split an accessor name (`getUserName`, `isEmpty`, `setLocale`) into its
/// property name. Returns `None` for anything else.
pub fn property_name(method: &str) -> Option<String> {
    let rest = ["get", "is", "set"]
        .iter()
        .find_map(|prefix| method.strip_prefix(prefix))?;

    let mut chars = rest.chars();
    let first = chars.next()?;
    if !first.is_uppercase() {
        return None;
    }

    let mut name: String = first.to_lowercase().collect();
    name.push_str(chars.as_str());
    Some(name)
}

/// Synthesize helper methods for one expression object.
///
/// Resolution failures are logged and yield no methods.
pub fn synthesize_helper_methods(
    dialect: &Arc<Dialect>,
    object: &ExpressionObjectRef,
    lister: &dyn ClassMemberLister,
) -> Vec<ExpressionHelperMethod> {
    let members = match lister.list_members(&object.class) {
        Ok(members) => members,
        Err(e) => {
            tracing::warn!(
                "Skipping expression object {} of dialect {dialect}: {e}",
                object.name
            );
            return Vec::new();
        }
    };

    let mut seen = FxHashSet::default();
    let mut methods = Vec::new();

    for member in members {
        if !member.is_public || member.is_constructor {
            continue;
        }

        let (name, property_style) = match property_name(&member.name) {
            Some(property) => (property, true),
            None => (member.name, false),
        };

        // Overloads and getter/setter pairs collapse to one helper
        if !seen.insert(name.clone()) {
            continue;
        }

        let mut method =
            ExpressionHelperMethod::object_member(dialect.clone(), object.name.clone(), name)
                .with_property_style(property_style);
        method.documentation = object.documentation.clone();
        methods.push(method);
    }

    tracing::debug!(
        "Synthesized {} helper methods for #{}",
        methods.len(),
        object.name
    );
    methods
}
