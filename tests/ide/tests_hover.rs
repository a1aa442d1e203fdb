//! Hover tests for processors and helper methods.

use dialect_assist::ProjectKey;
use dialect_assist::ide::AssistHost;
use dialect_assist::project::BundledDialectLocator;
use once_cell::sync::Lazy;

use crate::helpers::cursor::cursor;
use crate::helpers::fixtures::STANDARD_DIALECT;

const TH: &str = r#"xmlns:th="http://www.thymeleaf.org""#;

/// Shared by every test in this module.
static HOST: Lazy<AssistHost> = Lazy::new(|| {
    let host = AssistHost::default();
    let locator = BundledDialectLocator::embedded_only()
        .with_embedded("standard.xml", STANDARD_DIALECT.as_bytes());
    host.initialize_with(&locator);
    host
});

fn host() -> &'static AssistHost {
    &HOST
}

#[test]
fn test_hover_attribute_processor_with_see_also() {
    let host = host();
    let (ctx, offset) = cursor(&format!(r#"<html {TH}><p th:te|xt="x">"#));

    let result = host.hover(&ProjectKey::from("app"), &ctx, offset).unwrap();
    assert_eq!(result.name.as_ref(), "th:text");
    assert_eq!(
        result.contents,
        "```\nth:text\n```\n\nSets the element body, escaped.\n\n**See also:** th:utext"
    );
}

#[test]
fn test_hover_restriction_summary() {
    let host = host();
    let (ctx, offset) = cursor(&format!(r#"<html {TH}><input th:fi|eld="x">"#));

    let result = host.hover(&ProjectKey::from("app"), &ctx, offset).unwrap();
    assert!(
        result
            .contents
            .ends_with("**Must appear in tag(s):** `<input>`, `<select>`, `<textarea>`")
    );
}

#[test]
fn test_hover_element_processor() {
    let host = host();
    let (ctx, offset) = cursor(&format!("<html {TH}><th:blo|ck>"));

    let result = host.hover(&ProjectKey::from("app"), &ctx, offset).unwrap();
    assert_eq!(result.name.as_ref(), "th:block");
    assert!(result.contents.contains("Synthetic block element."));
}

#[test]
fn test_hover_helper_method() {
    let host = host();
    let (ctx, offset) = cursor(&format!(r#"<html {TH}><p th:if="${{#strings.is|Empty(x)}}">"#));

    let result = host.hover(&ProjectKey::from("app"), &ctx, offset).unwrap();
    assert_eq!(result.name.as_ref(), "#strings.isEmpty");
}

#[test]
fn test_hover_unknown_or_out_of_scope() {
    let host = host();

    let (ctx, offset) = cursor(&format!(r#"<html {TH}><p cl|ass="x">"#));
    assert!(host.hover(&ProjectKey::from("app"), &ctx, offset).is_none());

    let (ctx, offset) = cursor(r#"<p th:te|xt="x">"#);
    assert!(host.hover(&ProjectKey::from("app"), &ctx, offset).is_none());
}
