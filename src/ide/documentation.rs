//! Markdown documentation for dialect items.

use std::sync::Arc;

use crate::dialect::{AttributeRestrictions, Dialect, DialectItem, Documentation};

/// Render the documentation of an item, or `None` if it has nothing to say.
pub fn item_documentation(item: &DialectItem) -> Option<String> {
    let restrictions = match item {
        DialectItem::Attribute(p) => p.restrictions.as_ref(),
        _ => None,
    };
    render(item.dialect(), item.documentation(), restrictions)
}

pub fn render(
    dialect: &Dialect,
    documentation: Option<&Documentation>,
    restrictions: Option<&AttributeRestrictions>,
) -> Option<String> {
    let mut out = String::new();

    if let Some(doc) = documentation {
        out.push_str(doc.text.trim());

        let mut details = Vec::new();
        if !doc.see_also.is_empty() {
            let names: Vec<String> = doc
                .see_also
                .iter()
                .map(|name| qualify(dialect, name))
                .collect();
            details.push(format!("**See also:** {}", names.join(", ")));
        }
        if let Some(reference) = &doc.reference {
            details.push(format!("**Reference:** {reference}"));
        }
        push_section(&mut out, &details);
    }

    if let Some(restrictions) = restrictions {
        let mut details = Vec::new();
        split_entries(
            &restrictions.tags,
            "Must appear in tag(s)",
            "Cannot appear in tag(s)",
            |tag| format!("`<{tag}>`"),
            &mut details,
        );
        split_entries(
            &restrictions.attributes,
            "Must appear with attribute(s)",
            "Cannot appear with attribute(s)",
            |attribute| format!("`{attribute}`"),
            &mut details,
        );
        if !restrictions.values.is_empty() {
            let values: Vec<&str> = restrictions.values.iter().map(|v| v.as_ref()).collect();
            details.push(format!("**Possible value(s):** {}", values.join(", ")));
        }
        push_section(&mut out, &details);
    }

    (!out.is_empty()).then_some(out)
}

/// Dotted names (helper methods) are already qualified by their object.
fn qualify(dialect: &Dialect, name: &str) -> String {
    if name.contains('.') {
        name.to_string()
    } else {
        format!("{}:{name}", dialect.prefix())
    }
}

fn split_entries(
    entries: &[Arc<str>],
    required: &str,
    forbidden: &str,
    format: impl Fn(&str) -> String,
    details: &mut Vec<String>,
) {
    let (denied, allowed): (Vec<&str>, Vec<&str>) = entries
        .iter()
        .map(|e| e.as_ref())
        .partition(|e| e.starts_with('-'));

    if !allowed.is_empty() {
        let list: Vec<String> = allowed.iter().map(|e| format(e)).collect();
        details.push(format!("**{required}:** {}", list.join(", ")));
    }
    if !denied.is_empty() {
        let list: Vec<String> = denied.iter().map(|e| format(&e[1..])).collect();
        details.push(format!("**{forbidden}:** {}", list.join(", ")));
    }
}

fn push_section(out: &mut String, lines: &[String]) {
    if lines.is_empty() {
        return;
    }
    if !out.is_empty() {
        out.push_str("\n\n");
    }
    for (i, line) in lines.iter().enumerate() {
        if i > 0 {
            // Markdown hard line break
            out.push_str("  \n");
        }
        out.push_str(line);
    }
}
