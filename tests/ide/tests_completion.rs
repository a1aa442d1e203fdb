//! Completion tests driven through marked markup documents.

use std::sync::Arc;

use dialect_assist::dialect::{ClassMember, StaticClassMembers};
use dialect_assist::ide::{AssistHost, CompletionProposal, CursorContext, ProposalKind};
use dialect_assist::project::{BundledDialectLocator, NoProjectResources};
use dialect_assist::{AssistConfig, ProjectKey};

use crate::helpers::cursor::cursor;
use crate::helpers::fixtures::{OBJECT_DIALECT, STANDARD_DIALECT, STRICT_DIALECT};

const TH: &str = r#"xmlns:th="http://www.thymeleaf.org""#;

fn host(definitions: &[&str]) -> AssistHost {
    host_with(AssistHost::default(), definitions)
}

fn host_with(host: AssistHost, definitions: &[&str]) -> AssistHost {
    let locator = definitions.iter().enumerate().fold(
        BundledDialectLocator::embedded_only(),
        |locator, (i, xml)| locator.with_embedded(format!("dialect-{i}.xml"), xml.as_bytes()),
    );
    assert_eq!(host.initialize_with(&locator), definitions.len());
    host
}

fn complete(host: &AssistHost, document: &str) -> Vec<CompletionProposal> {
    let (ctx, offset) = cursor(document);
    host.completions(&ProjectKey::from("app"), &ctx, offset)
}

fn displays(proposals: &[CompletionProposal]) -> Vec<&str> {
    proposals.iter().map(|p| p.display.as_ref()).collect()
}

// =============================================================================
// PATTERN MATCHING
// =============================================================================

#[test]
fn test_pattern_matches_prefix_of_full_name() {
    let host = host(&[STANDARD_DIALECT]);
    let proposals = complete(&host, &format!("<html {TH}><div th:te|"));

    assert_eq!(displays(&proposals), vec!["th:template", "th:text"]);
}

#[test]
fn test_empty_pattern_matches_all_in_scope() {
    let host = host(&[STANDARD_DIALECT]);
    let proposals = complete(&host, &format!("<html {TH}><div |"));
    let names = displays(&proposals);

    // th:field is restricted to form tags
    assert_eq!(
        names,
        vec![
            "th:href",
            "th:readonly",
            "th:template",
            "th:text",
            "th:utext",
            "data-th-href",
            "data-th-readonly",
            "data-th-template",
            "data-th-text",
            "data-th-utext",
        ]
    );
}

#[test]
fn test_data_attribute_pass() {
    let host = host(&[STANDARD_DIALECT]);
    let proposals = complete(&host, &format!("<html {TH}><div data-th-u|"));

    assert_eq!(displays(&proposals), vec!["data-th-utext"]);
    assert_eq!(proposals[0].kind, ProposalKind::DataAttributeProcessor);
    assert_eq!(proposals[0].insert_text.as_ref(), "text=\"\"");
}

// =============================================================================
// NAMESPACE SCOPING
// =============================================================================

#[test]
fn test_strict_dialect_requires_matching_uri() {
    let host = host(&[STRICT_DIALECT]);

    let other = complete(&host, r#"<div xmlns:sec="http://example/other" sec:|"#);
    assert!(other.is_empty(), "got {:?}", displays(&other));

    let matching = complete(&host, r#"<div xmlns:sec="http://example/sec" sec:|"#);
    assert_eq!(displays(&matching), vec!["sec:authorize"]);
}

#[test]
fn test_non_strict_dialect_matches_on_prefix() {
    let lenient = STRICT_DIALECT.replace("namespace-strict=\"true\"", "namespace-strict=\"false\"");
    let host = host(&[lenient.as_str()]);

    let proposals = complete(&host, r#"<div xmlns:sec="http://example/other" sec:|"#);
    assert_eq!(displays(&proposals), vec!["sec:authorize"]);
}

#[test]
fn test_undeclared_prefix_is_out_of_scope() {
    let host = host(&[STANDARD_DIALECT]);
    assert!(complete(&host, "<div th:|").is_empty());
}

#[test]
fn test_dialect_mode_puts_everything_in_scope() {
    let host = host_with(
        AssistHost::new(AssistConfig::default().with_dialect_mode_default(true)),
        &[STANDARD_DIALECT, STRICT_DIALECT],
    );

    let proposals = complete(&host, "<div sec:|");
    assert_eq!(displays(&proposals), vec!["sec:authorize"]);
}

// =============================================================================
// RESTRICTIONS
// =============================================================================

#[test]
fn test_required_tag() {
    let host = host(&[STANDARD_DIALECT]);

    let input = complete(&host, &format!("<html {TH}><input th:fi|"));
    assert_eq!(displays(&input), vec!["th:field"]);

    let div = complete(&host, &format!("<html {TH}><div th:fi|"));
    assert!(div.is_empty());
}

#[test]
fn test_forbidden_co_attribute() {
    let host = host(&[STANDARD_DIALECT]);

    let disabled = complete(&host, &format!("<html {TH}><input disabled th:read|"));
    assert!(disabled.is_empty());

    let disabled_with_value =
        complete(&host, &format!(r#"<html {TH}><input disabled="disabled" th:read|"#));
    assert!(disabled_with_value.is_empty());

    let enabled = complete(&host, &format!("<html {TH}><input th:read|"));
    assert_eq!(displays(&enabled), vec!["th:readonly"]);
}

#[test]
fn test_present_attribute_is_not_proposed_again() {
    let host = host(&[STANDARD_DIALECT]);
    let proposals = complete(&host, &format!(r#"<html {TH}><div th:text="x" th:|"#));
    let names = displays(&proposals);

    assert!(!names.contains(&"th:text"));
    // th:utext cannot appear with th:text
    assert!(!names.contains(&"th:utext"));
    assert!(names.contains(&"th:href"));
}

// =============================================================================
// ELEMENTS
// =============================================================================

#[test]
fn test_element_completion_closes_the_element() {
    let host = host(&[STANDARD_DIALECT]);
    let (ctx, offset) = cursor(&format!("<html {TH}><th:bl|"));
    let proposals = host.completions(&ProjectKey::from("app"), &ctx, offset);

    assert_eq!(displays(&proposals), vec!["th:block"]);
    let proposal = &proposals[0];
    assert_eq!(proposal.kind, ProposalKind::ElementProcessor);
    assert_eq!(proposal.insert_text.as_ref(), "ock></th:block>");

    let applied = proposal.apply_to(ctx.text()).unwrap();
    assert!(applied.ends_with("<th:block></th:block>"));
    assert_eq!(
        &applied[..usize::from(proposal.cursor_after)],
        format!("<html {TH}><th:block>")
    );
}

// =============================================================================
// ATTRIBUTE VALUES
// =============================================================================

#[test]
fn test_value_completion_scenario() {
    let dialect = r#"<dialect xmlns="http://www.thymeleaf.org/extras/dialect" prefix="th" namespace-uri="http://thx">
  <attribute-processor name="text">
    <restrictions values="a b"/>
  </attribute-processor>
</dialect>"#;
    let host = host(&[dialect]);

    let proposals = complete(&host, r#"<html xmlns:th="http://thx"><p th:text="|">"#);
    assert_eq!(displays(&proposals), vec!["a", "b"]);
    assert!(proposals.iter().all(|p| p.kind == ProposalKind::AttributeValue));
}

#[test]
fn test_value_order_follows_the_source() {
    let dialect = r#"<dialect xmlns="http://www.thymeleaf.org/extras/dialect" prefix="th" namespace-uri="http://thx">
  <attribute-processor name="text">
    <restrictions values="b a"/>
  </attribute-processor>
</dialect>"#;
    let host = host(&[dialect]);

    let proposals = complete(&host, r#"<html xmlns:th="http://thx"><p th:text="|">"#);
    assert_eq!(displays(&proposals), vec!["b", "a"]);
}

#[test]
fn test_value_replaces_existing_text() {
    let dialect = r#"<dialect xmlns="http://www.thymeleaf.org/extras/dialect" prefix="th" namespace-uri="http://thx">
  <attribute-processor name="align">
    <restrictions values="left right"/>
  </attribute-processor>
</dialect>"#;
    let host = host(&[dialect]);
    let (ctx, offset) = cursor(r#"<html xmlns:th="http://thx"><p th:align="ri|">"#);

    let proposals = host.completions(&ProjectKey::from("app"), &ctx, offset);
    let right = proposals.iter().find(|p| p.display.as_ref() == "right").unwrap();
    assert_eq!(
        right.apply_to(ctx.text()).unwrap(),
        r#"<html xmlns:th="http://thx"><p th:align="right">"#
    );
}

// =============================================================================
// HELPER METHODS
// =============================================================================

#[test]
fn test_declared_helper_methods() {
    let host = host(&[STANDARD_DIALECT]);
    let proposals = complete(&host, &format!(r#"<html {TH}><p th:text="${{#strings.|}}">"#));

    assert_eq!(
        displays(&proposals),
        vec!["#strings.isEmpty", "#strings.toUpperCase"]
    );
    assert_eq!(proposals[0].insert_text.as_ref(), "isEmpty()");
}

#[test]
fn test_synthesized_helper_methods() {
    let lister = StaticClassMembers::new().with_class(
        "org.example.UserHelper",
        [
            ClassMember::method("getUserName"),
            ClassMember::method("formatDate"),
            ClassMember {
                name: "UserHelper".into(),
                is_public: true,
                is_constructor: true,
            },
            ClassMember {
                name: "secret".into(),
                is_public: false,
                is_constructor: false,
            },
        ],
    );
    let host = host_with(
        AssistHost::with_parts(
            AssistConfig::default(),
            Arc::new(NoProjectResources),
            Arc::new(lister),
        ),
        &[OBJECT_DIALECT],
    );

    let analysis = host.analysis(&ProjectKey::from("app"));
    let helpers = analysis.view().helper_methods();
    let synthesized: Vec<(&str, bool)> = helpers
        .iter()
        .map(|m| (m.qualified_name(), m.is_property_style()))
        .collect();
    assert_eq!(
        synthesized,
        vec![("user.formatDate", false), ("user.userName", true)]
    );

    let proposals = complete(
        &host,
        r#"<p xmlns:app="http://example/app" th:text="${#user.|}">"#,
    );
    let inserts: Vec<&str> = proposals.iter().map(|p| p.insert_text.as_ref()).collect();
    assert_eq!(inserts, vec!["formatDate()", "userName"]);
}

#[test]
fn test_no_helpers_outside_expression_object() {
    let host = host(&[STANDARD_DIALECT]);
    assert!(complete(&host, &format!(r#"<html {TH}><p th:text="str|">"#)).is_empty());
}

// =============================================================================
// PROPOSAL VALIDITY
// =============================================================================

#[test]
fn test_proposal_stays_valid_while_typing_its_name() {
    let host = host(&[STANDARD_DIALECT]);
    let proposals = complete(&host, &format!("<html {TH}><div th:te|"));
    let text = proposals.iter().find(|p| p.display.as_ref() == "th:text").unwrap();

    assert!(text.is_valid_for("x"));
    assert!(text.is_valid_for("xt"));
    assert!(!text.is_valid_for("m"));
}

#[test]
fn test_text_content_has_no_proposals() {
    let host = host(&[STANDARD_DIALECT]);
    assert!(complete(&host, &format!("<html {TH}><p>th:te|</p>")).is_empty());
}
