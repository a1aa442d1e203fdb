//! Matching engine: pure functions over a [`ProjectView`](crate::registry::ProjectView).
//!
//! - [`NamespaceScope`] - which dialects are visible at the cursor
//! - name and pattern queries ([`find_attribute_processors`], [`find_processor`], ...)
//! - attribute processor restrictions ([`is_applicable`], [`allowed_values`])

mod names;
mod restrictions;
mod scope;

pub use names::{
    find_attribute_processor, find_attribute_processors, find_element_processor,
    find_element_processors, find_helper_method, find_helper_methods, find_processor,
    split_qualified,
};
pub use restrictions::{
    ElementSnapshot, allowed_values, attribute_entry_satisfied, attributes_allowed,
    is_applicable, tag_allowed,
};
pub use scope::{Namespace, NamespaceScope};
