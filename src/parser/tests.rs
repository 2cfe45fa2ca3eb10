use super::parameter::parse_parameter;
use super::*;
use crate::pattern::{ParameterKind, Part, PatternErrorKind};

fn policy_texts(text: &str) -> Vec<String> {
    parse_parameter(text)
        .policies()
        .iter()
        .map(ToString::to_string)
        .collect()
}

fn error_kind(template: &str) -> PatternErrorKind {
    match parse(template) {
        Ok(pattern) => panic!("expected '{template}' to be rejected, got {pattern}"),
        Err(e) => {
            assert_eq!(e.pattern, template);
            e.kind
        }
    }
}

#[test]
fn test_inline_plain_name() {
    let p = parse_parameter("id");
    assert_eq!(p.name(), "id");
    assert_eq!(p.kind(), ParameterKind::Standard);
    assert!(p.default_value().is_none());
    assert!(p.policies().is_empty());
    assert!(p.encode_slashes());
}

#[test]
fn test_inline_optional_and_catch_all() {
    assert_eq!(parse_parameter("id?").kind(), ParameterKind::Optional);
    assert_eq!(parse_parameter("id?").name(), "id");

    let single = parse_parameter("*path");
    assert_eq!(single.kind(), ParameterKind::CatchAll);
    assert_eq!(single.name(), "path");
    assert!(single.encode_slashes());

    let double = parse_parameter("**path");
    assert_eq!(double.kind(), ParameterKind::CatchAll);
    assert_eq!(double.name(), "path");
    assert!(!double.encode_slashes());
}

#[test]
fn test_inline_default_value() {
    let p = parse_parameter("id=7");
    assert_eq!(p.name(), "id");
    assert_eq!(p.default_value(), Some("7"));

    assert_eq!(parse_parameter("id=").default_value(), Some(""));
    // Everything after the first '=' is the default
    assert_eq!(parse_parameter("id=a=b").default_value(), Some("a=b"));
    assert_eq!(parse_parameter("*path=a/b").default_value(), Some("a/b"));
}

#[test]
fn test_inline_constraints() {
    assert_eq!(policy_texts("id:int"), vec!["int"]);
    assert_eq!(policy_texts("id:int:min(1)"), vec!["int", "min(1)"]);
    assert_eq!(policy_texts("id::int"), vec!["int"]);
    assert!(policy_texts("id:").is_empty());

    let p = parse_parameter("id:int:range(1,9)=5");
    assert_eq!(p.name(), "id");
    assert_eq!(p.default_value(), Some("5"));
    assert_eq!(policy_texts("id:int:range(1,9)=5"), vec!["int", "range(1,9)"]);

    let p = parse_parameter("id:int?");
    assert!(p.is_optional());
    assert_eq!(policy_texts("id:int?"), vec!["int"]);
}

#[test]
fn test_inline_delimiters_inside_parenthesis() {
    assert_eq!(policy_texts("p:regex(a:b)"), vec!["regex(a:b)"]);
    assert_eq!(policy_texts("p:regex(a=b)"), vec!["regex(a=b)"]);

    let p = parse_parameter("p:regex(a=b)=x");
    assert_eq!(p.default_value(), Some("x"));
    assert_eq!(policy_texts("p:regex(a=b)=x"), vec!["regex(a=b)"]);

    // ')' not followed by ':' or '=' does not close the argument
    assert_eq!(policy_texts("p:test(x)y"), vec!["test(x)y"]);
    assert_eq!(policy_texts("p:test(x):int"), vec!["test(x)", "int"]);
    assert_eq!(policy_texts("p:regex(^(a|b)$)"), vec!["regex(^(a|b)$)"]);
}

#[test]
fn test_inline_unterminated_parenthesis() {
    assert_eq!(policy_texts("p:test(asd"), vec!["test(asd"]);
    // No later ')' so ':' ends the constraint
    assert_eq!(policy_texts("p:test(a:int"), vec!["test(a", "int"]);
    let p = parse_parameter("p:test(a=7");
    assert_eq!(p.default_value(), Some("7"));
    assert_eq!(policy_texts("p:test(a=7"), vec!["test(a"]);
}

#[test]
fn test_inline_leading_delimiter_is_part_of_name() {
    assert_eq!(parse_parameter(":name").name(), ":name");
    assert_eq!(parse_parameter("=name").name(), "=name");
    assert_eq!(parse_parameter("").name(), "");
}

#[test]
fn test_parse_empty_templates() {
    for template in ["", "/", "~/"] {
        let pattern = parse(template).unwrap();
        assert!(pattern.segments().is_empty(), "{template}");
        assert_eq!(pattern.raw_text(), Some(template));
    }
}

#[test]
fn test_parse_keeps_raw_text() {
    let pattern = parse("/api/{id}").unwrap();
    assert_eq!(pattern.raw_text(), Some("/api/{id}"));
    assert_eq!(pattern.to_string(), "api/{id}");
    assert_eq!(parse("~/api").unwrap().segments().len(), 1);
}

#[test]
fn test_parse_structure() {
    let pattern = parse("{controller=Home}/{action=Index}/{id?}").unwrap();
    assert_eq!(pattern.segments().len(), 3);
    assert_eq!(pattern.parameter_count(), 3);
    assert_eq!(pattern.defaults().get("controller").map(String::as_str), Some("Home"));
    assert_eq!(pattern.defaults().get("action").map(String::as_str), Some("Index"));
    assert!(!pattern.defaults().contains_key("id"));
    assert!(pattern.parameter("ID").is_some_and(|p| p.is_optional()));
    assert_eq!(pattern.parameter_location("id"), Some((2, 0)));
}

#[test]
fn test_parse_complex_segment() {
    let pattern = parse("items/{id}-{slug}.html").unwrap();
    let parts = pattern.segments()[1].parts();
    assert_eq!(parts.len(), 4);
    assert!(parts[0].is_parameter());
    assert_eq!(parts[1], Part::Literal("-".into()));
    assert!(parts[2].is_parameter());
    assert_eq!(parts[3], Part::Literal(".html".into()));
}

#[test]
fn test_parse_dot_becomes_separator() {
    let pattern = parse("{p1}/{p2}.{p3?}").unwrap();
    let parts = pattern.segments()[1].parts();
    assert_eq!(parts[1], Part::Separator(".".into()));
    assert_eq!(pattern.to_string(), "{p1}/{p2}.{p3?}");

    // A '.' elsewhere stays a literal
    let pattern = parse("{a}.{b}").unwrap();
    assert_eq!(pattern.segments()[0].parts()[1], Part::Literal(".".into()));
}

#[test]
fn test_parse_trailing_slash() {
    let pattern = parse("a/b/").unwrap();
    assert_eq!(pattern.segments().len(), 2);
}

#[test]
fn test_parse_escaped_braces() {
    let pattern = parse("{{p1}}").unwrap();
    assert_eq!(pattern.segments()[0].parts()[0], Part::Literal("{p1}".into()));
    assert_eq!(pattern.to_string(), "{{p1}}");

    let pattern = parse(r"{p1:regex(^\d{{3}}-\d{{3}}$)}").unwrap();
    let parameter = pattern.parameter("p1").unwrap();
    assert_eq!(parameter.policies()[0].to_string(), r"regex(^\d{3}-\d{3}$)");
    assert_eq!(pattern.to_string(), r"{p1:regex(^\d{{3}}-\d{{3}}$)}");
}

#[test]
fn test_parse_policies_exposed_on_pattern() {
    let pattern = parse("{id:int:min(1)}").unwrap();
    let policies = pattern.policies().get("id").unwrap();
    assert_eq!(policies.len(), 2);
    assert_eq!(policies[1].as_text(), Some("min(1)"));
}

#[test]
fn test_parse_unicode_literals() {
    let pattern = parse("café/{id}/ü{x}").unwrap();
    assert_eq!(pattern.segments()[0].parts()[0], Part::Literal("café".into()));
    assert_eq!(pattern.segments()[2].parts()[0], Part::Literal("ü".into()));
}

#[test]
fn test_reject_leading_tilde() {
    assert_eq!(error_kind("~foo"), PatternErrorKind::InvalidLeadingTilde);
}

#[test]
fn test_reject_consecutive_separators() {
    assert_eq!(error_kind("a//b"), PatternErrorKind::ConsecutiveSeparators);
    assert_eq!(error_kind("//"), PatternErrorKind::ConsecutiveSeparators);
    assert_eq!(error_kind("{a}//"), PatternErrorKind::ConsecutiveSeparators);
}

#[test]
fn test_reject_mismatched_braces() {
    assert_eq!(error_kind("{p1"), PatternErrorKind::MismatchedParameter);
    assert_eq!(error_kind("p1}"), PatternErrorKind::MismatchedParameter);
    assert_eq!(error_kind("{"), PatternErrorKind::MismatchedParameter);
    assert_eq!(error_kind("{p1}}"), PatternErrorKind::MismatchedParameter);
    assert_eq!(error_kind("{{p1}"), PatternErrorKind::MismatchedParameter);
    assert_eq!(error_kind("p1}}p2{"), PatternErrorKind::MismatchedParameter);
    assert_eq!(
        error_kind(r"{p1:regex(([}])\w+}"),
        PatternErrorKind::MismatchedParameter
    );
}

#[test]
fn test_reject_unescaped_brace_in_parameter() {
    assert_eq!(error_kind("{p{1}"), PatternErrorKind::UnescapedBrace);
}

#[test]
fn test_reject_invalid_names() {
    assert_eq!(
        error_kind("{}"),
        PatternErrorKind::InvalidParameterName(String::new())
    );
    assert_eq!(
        error_kind("{a/b}"),
        PatternErrorKind::InvalidParameterName("a/b".into())
    );
    assert_eq!(
        error_kind("{a*b}"),
        PatternErrorKind::InvalidParameterName("a*b".into())
    );
    assert_eq!(
        error_kind("{?}"),
        PatternErrorKind::InvalidParameterName(String::new())
    );
}

#[test]
fn test_reject_repeated_parameter() {
    assert_eq!(
        error_kind("{a}/{A}"),
        PatternErrorKind::RepeatedParameter("A".into())
    );
    assert_eq!(
        error_kind("{id}/x{ID}"),
        PatternErrorKind::RepeatedParameter("ID".into())
    );
}

#[test]
fn test_reject_question_mark_in_literal() {
    assert_eq!(
        error_kind("foo?bar"),
        PatternErrorKind::InvalidLiteral("foo?bar".into())
    );
}

#[test]
fn test_reject_optional_default_combinations() {
    assert_eq!(error_kind("{p1=1?}"), PatternErrorKind::OptionalCannotHaveDefault);
    assert_eq!(error_kind("{*p1?}"), PatternErrorKind::CatchAllCannotBeOptional);
    assert_eq!(error_kind("{**p1?}"), PatternErrorKind::CatchAllCannotBeOptional);
}

#[test]
fn test_reject_misplaced_catch_all() {
    for template in ["{*p1}/foo", "{**p1}/{p2}", "a/{*p1}/b"] {
        assert_eq!(error_kind(template), PatternErrorKind::CatchAllMustBeLast, "{template}");
    }
    for template in ["foo{*p1}", "{*p1}.x", "{p0}-{**p1}"] {
        assert_eq!(
            error_kind(template),
            PatternErrorKind::CatchAllInMultiPartSegment,
            "{template}"
        );
    }
}

#[test]
fn test_reject_optional_not_preceded_by_period() {
    assert_eq!(
        error_kind("{p1}{p2?}"),
        PatternErrorKind::OptionalPrecededByInvalid {
            segment: "{p1}{p2?}".into(),
            parameter: "p2".into(),
            previous: "{p1}".into(),
        }
    );
    assert_eq!(
        error_kind("{p1}-{p2?}"),
        PatternErrorKind::OptionalPrecededByInvalid {
            segment: "{p1}-{p2?}".into(),
            parameter: "p2".into(),
            previous: "-".into(),
        }
    );
}

#[test]
fn test_reject_optional_not_last() {
    assert_eq!(
        error_kind("{p1?}{p2}"),
        PatternErrorKind::OptionalMustBeLast {
            segment: "{p1?}{p2}".into(),
            parameter: "p1".into(),
            next: "{p2}".into(),
        }
    );
    assert_eq!(
        error_kind("{p1?}.{p2}"),
        PatternErrorKind::OptionalMustBeLast {
            segment: "{p1?}.{p2}".into(),
            parameter: "p1".into(),
            next: ".".into(),
        }
    );
}

#[test]
fn test_reject_consecutive_parameters() {
    assert_eq!(error_kind("{p1}{p2}"), PatternErrorKind::ConsecutiveParameters);
    assert_eq!(error_kind("a{p1}{p2}b"), PatternErrorKind::ConsecutiveParameters);
}

#[test]
fn test_error_message_names_template() {
    let err = parse("a//b").unwrap_err();
    let message = err.to_string();
    assert!(message.starts_with("invalid route pattern 'a//b':"), "{message}");
}
