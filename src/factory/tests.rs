use super::*;
use crate::parser::{parse, parse_with};
use crate::pattern::{
    NameMap, ParameterKind, ParameterPart, Part, PathSegment, PatternErrorKind, PolicyReference,
    PrecedenceScorer, RequiredValue, RequiredValues, RoutePattern, RoutePatternError,
};
use std::sync::Arc;

fn defaults(entries: &[(&str, &str)]) -> NameMap<String> {
    entries
        .iter()
        .map(|(k, v)| (*k, (*v).to_string()))
        .collect()
}

fn policies(entries: &[(&str, &[&str])]) -> NameMap<Vec<PolicyReference>> {
    entries
        .iter()
        .map(|(k, list)| (*k, list.iter().map(|t| PolicyReference::text(*t)).collect::<Vec<_>>()))
        .collect()
}

fn required(entries: &[(&str, RequiredValue)]) -> RequiredValues {
    entries.iter().map(|(k, v)| (*k, v.clone())).collect()
}

fn with_defaults(template: &str, entries: &[(&str, &str)]) -> Result<RoutePattern, RoutePatternError> {
    parse_with(template, defaults(entries), NameMap::new(), RequiredValues::new())
}

fn policy_texts(pattern: &RoutePattern, name: &str) -> Vec<String> {
    pattern
        .parameter(name)
        .map(|p| p.policies().iter().map(ToString::to_string).collect())
        .unwrap_or_default()
}

#[test]
fn test_inline_default_copied_into_map() {
    let pattern = parse("{id=5}").unwrap();
    assert_eq!(pattern.defaults().get("id").map(String::as_str), Some("5"));
    assert_eq!(pattern.parameter("id").and_then(ParameterPart::default_value), Some("5"));
}

#[test]
fn test_explicit_default_applied_to_parameter() {
    let pattern = with_defaults("{controller}/{action}", &[("action", "Index")]).unwrap();
    assert_eq!(
        pattern.parameter("action").and_then(ParameterPart::default_value),
        Some("Index")
    );
    assert!(pattern.parameter("controller").unwrap().default_value().is_none());
}

#[test]
fn test_equal_inline_and_explicit_default() {
    let pattern = with_defaults("{id=5}", &[("ID", "5")]).unwrap();
    assert_eq!(pattern.defaults().len(), 1);
    assert_eq!(pattern.defaults().get("id").map(String::as_str), Some("5"));
}

#[test]
fn test_conflicting_inline_and_explicit_default() {
    let err = with_defaults("{id=5}", &[("id", "6")]).unwrap_err();
    assert_eq!(
        err.kind,
        PatternErrorKind::DefaultSpecifiedInlineAndExplicitly("id".into())
    );
    assert_eq!(err.pattern, "{id=5}");

    // Reconciliation is exact, not route-value equality
    let err = with_defaults("{action=Index}", &[("action", "index")]).unwrap_err();
    assert!(matches!(
        err.kind,
        PatternErrorKind::DefaultSpecifiedInlineAndExplicitly(_)
    ));
}

#[test]
fn test_optional_parameter_rejects_explicit_default() {
    let err = with_defaults("{id?}", &[("id", "1")]).unwrap_err();
    assert_eq!(err.kind, PatternErrorKind::OptionalCannotHaveDefault);
}

#[test]
fn test_defaults_for_non_parameters_kept() {
    let pattern = with_defaults("blog/{slug}", &[("controller", "Blog")]).unwrap();
    assert_eq!(
        pattern.defaults().get("controller").map(String::as_str),
        Some("Blog")
    );
    assert!(pattern.parameter("controller").is_none());
}

#[test]
fn test_inline_policies_precede_out_of_line() {
    let pattern = parse_with(
        "{id:int}",
        NameMap::new(),
        policies(&[("id", &["min(1)"]), ("format", &["alpha"]), ("empty", &[])]),
        RequiredValues::new(),
    )
    .unwrap();
    assert_eq!(policy_texts(&pattern, "id"), vec!["int", "min(1)"]);

    let map = pattern.policies();
    assert_eq!(map.get("id").map(|l| l.len()), Some(2));
    assert_eq!(map.get("format").map(|l| l.len()), Some(1));
    assert!(!map.contains_key("empty"));
}

#[test]
fn test_policy_handle_shared_between_part_and_map() {
    let pattern = parse_with(
        "{id}",
        NameMap::new(),
        policies(&[("id", &["int"])]),
        RequiredValues::new(),
    )
    .unwrap();
    let from_part = pattern.parameter("id").unwrap().policies();
    let from_map = pattern.policies().get("id").unwrap();
    assert_eq!(from_part, from_map.as_ref());
}

#[test]
fn test_required_values_accepted() {
    let pattern = parse_with(
        "{controller}/{action=Index}",
        defaults(&[("area", "Admin")]),
        NameMap::new(),
        required(&[
            ("controller", RequiredValue::value("Home")),
            ("action", RequiredValue::Any),
            ("area", RequiredValue::value("admin")),
            ("page", RequiredValue::Null),
            ("locale", RequiredValue::value("")),
        ]),
    )
    .unwrap();
    assert_eq!(pattern.required_values().len(), 5);
}

#[test]
fn test_unmatched_required_value() {
    let err = parse_with(
        "{controller}",
        defaults(&[("area", "Admin")]),
        NameMap::new(),
        required(&[("area", RequiredValue::value("Blog"))]),
    )
    .unwrap_err();
    assert_eq!(
        err.kind,
        PatternErrorKind::UnmatchedRequiredValue {
            key: "area".into(),
            value: "Blog".into(),
        }
    );

    // No default to compare against
    let err = parse_with(
        "{controller}",
        NameMap::new(),
        NameMap::new(),
        required(&[("area", RequiredValue::value("Admin"))]),
    )
    .unwrap_err();
    assert!(matches!(err.kind, PatternErrorKind::UnmatchedRequiredValue { .. }));

    // Any only stands for parameters
    let err = parse_with(
        "{controller}",
        defaults(&[("area", "Admin")]),
        NameMap::new(),
        required(&[("area", RequiredValue::Any)]),
    )
    .unwrap_err();
    assert_eq!(
        err.kind,
        PatternErrorKind::UnmatchedRequiredValue {
            key: "area".into(),
            value: "*any*".into(),
        }
    );
}

#[test]
fn test_builder_renders_error_text_without_raw_text() {
    let id = || PathSegment::new(vec![Part::parameter("id").unwrap()]).unwrap();
    let err = RoutePatternBuilder::new()
        .segment(PathSegment::new(vec![Part::literal("api").unwrap()]).unwrap())
        .segment(id())
        .segment(id())
        .build()
        .unwrap_err();
    assert_eq!(err.kind, PatternErrorKind::RepeatedParameter("id".into()));
    assert_eq!(err.pattern, "api/{id}/{id}");
}

#[test]
fn test_builder_collects_settings() {
    let pattern = RoutePatternBuilder::new()
        .raw_text("orders/{id}")
        .segment(PathSegment::new(vec![Part::literal("orders").unwrap()]).unwrap())
        .segment(PathSegment::new(vec![Part::parameter("id").unwrap()]).unwrap())
        .policy("id", PolicyReference::text("int"))
        .policy("id", PolicyReference::text("min(1)"))
        .default_value("id", "1")
        .required_value("controller", RequiredValue::Null)
        .build()
        .unwrap();
    assert_eq!(pattern.raw_text(), Some("orders/{id}"));
    assert_eq!(policy_texts(&pattern, "id"), vec!["int", "min(1)"]);
    assert_eq!(pattern.to_string(), "orders/{id:int:min(1)=1}");
    assert!(pattern.required_values().contains_key("controller"));
}

#[derive(Debug)]
struct Fixed;

impl PrecedenceScorer for Fixed {
    fn inbound(&self, _: &[PathSegment]) -> f64 {
        42.0
    }

    fn outbound(&self, segments: &[PathSegment]) -> f64 {
        segments.len() as f64
    }
}

#[test]
fn test_builder_custom_precedence() {
    let pattern = RoutePatternBuilder::new()
        .segment(PathSegment::new(vec![Part::literal("a").unwrap()]).unwrap())
        .precedence(Arc::new(Fixed))
        .build()
        .unwrap();
    assert_eq!(pattern.inbound_precedence(), 42.0);
    assert_eq!(pattern.outbound_precedence(), 1.0);
}

#[test]
fn test_combine_with_custom_precedence() {
    let left = parse("api").unwrap();
    let right = parse("{id}").unwrap();
    let combined = combine_with(Some(&left), &right, &Fixed).unwrap();
    assert_eq!(combined.inbound_precedence(), 42.0);
    assert_eq!(combined.outbound_precedence(), 2.0);

    let default = combine(Some(&left), &right).unwrap();
    assert_ne!(default.inbound_precedence(), 42.0);
}

#[test]
fn test_builder_accepts_typed_catch_all() {
    let rest = ParameterPart::new("rest", None, ParameterKind::CatchAll, Vec::new()).unwrap();
    let pattern = RoutePatternBuilder::new()
        .segment(PathSegment::new(vec![Part::Parameter(rest)]).unwrap())
        .build()
        .unwrap();
    assert!(pattern.parameter("rest").is_some_and(ParameterPart::is_catch_all));
}

#[test]
fn test_combine_without_left_returns_right() {
    let right = parse("{id}").unwrap();
    let combined = combine(None, &right).unwrap();
    assert_eq!(combined, right);
}

#[test]
fn test_combine_joins_with_single_slash() {
    let left = parse("api/").unwrap();
    let right = parse("/{id}").unwrap();
    let combined = combine(Some(&left), &right).unwrap();
    assert_eq!(combined.raw_text(), Some("api/{id}"));
    assert_eq!(combined.segments().len(), 2);
    assert_eq!(combined.parameter_location("id"), Some((1, 0)));

    let combined = combine(Some(&parse("v1").unwrap()), &parse("users").unwrap()).unwrap();
    assert_eq!(combined.raw_text(), Some("v1/users"));
}

#[test]
fn test_combine_recomputes_precedence() {
    let literal = parse("api").unwrap();
    let parameter = parse("{id}").unwrap();
    let combined = combine(Some(&literal), &parameter).unwrap();
    assert!((combined.inbound_precedence() - 1.3).abs() < 1e-9);
}

#[test]
fn test_combine_rejects_repeated_parameter() {
    let left = parse("users/{id}").unwrap();
    let right = parse("posts/{ID}").unwrap();
    let err = combine(Some(&left), &right).unwrap_err();
    assert_eq!(err.kind, PatternErrorKind::RepeatedParameter("ID".into()));
    assert_eq!(err.pattern, "users/{id}/posts/{ID}");
}

#[test]
fn test_combine_merges_equal_defaults() {
    let left = with_defaults("admin", &[("area", "Admin")]).unwrap();
    let right = with_defaults("{controller}", &[("area", "Admin")]).unwrap();
    let combined = combine(Some(&left), &right).unwrap();
    assert_eq!(combined.defaults().len(), 1);
    assert_eq!(combined.defaults().get("area").map(String::as_str), Some("Admin"));
}

#[test]
fn test_combine_rejects_conflicting_defaults() {
    let left = with_defaults("admin", &[("area", "Admin")]).unwrap();
    let right = with_defaults("{controller}", &[("area", "Blog")]).unwrap();
    let err = combine(Some(&left), &right).unwrap_err();
    assert_eq!(
        err.kind,
        PatternErrorKind::ConflictingEntry {
            dictionary: "defaults",
            key: "area".into(),
        }
    );
}

#[test]
fn test_combine_rejects_conflicting_required_values() {
    let left = parse_with(
        "a",
        NameMap::new(),
        NameMap::new(),
        required(&[("page", RequiredValue::Null)]),
    )
    .unwrap();
    let right = parse_with(
        "{page}",
        NameMap::new(),
        NameMap::new(),
        required(&[("page", RequiredValue::value("1"))]),
    )
    .unwrap();
    let err = combine(Some(&left), &right).unwrap_err();
    assert_eq!(
        err.kind,
        PatternErrorKind::ConflictingEntry {
            dictionary: "required values",
            key: "page".into(),
        }
    );
}

#[test]
fn test_combine_policies() {
    let build = |template: &str, constraint: &str| {
        parse_with(
            template,
            NameMap::new(),
            policies(&[("format", &[constraint])]),
            RequiredValues::new(),
        )
        .unwrap()
    };
    let same = combine(Some(&build("a", "alpha")), &build("b", "alpha")).unwrap();
    assert_eq!(same.policies().get("format").map(|l| l.len()), Some(1));

    let err = combine(Some(&build("a", "alpha")), &build("b", "int")).unwrap_err();
    assert_eq!(
        err.kind,
        PatternErrorKind::ConflictingEntry {
            dictionary: "parameter policies",
            key: "format".into(),
        }
    );
}
