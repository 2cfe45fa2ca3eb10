use std::sync::Arc;

use tracing::debug;

use crate::pattern::{
    eq_ignore_case, NameMap, ParameterPart, Part, PathSegment, PatternErrorKind, PolicyMap,
    PolicyReference, PrecedenceScorer, RequiredValue, RequiredValues, RoutePattern,
    RoutePatternError, SegmentDigits,
};

/// Build a pattern from segments, merging out-of-line defaults, constraints
/// and required values.
///
/// For every parameter:
///
/// - an inline default must equal the out-of-line default for the same name
/// - an optional parameter may not receive an out-of-line default
/// - the effective default is written into both the part and the defaults map
/// - inline constraints come first, followed by out-of-line constraints
///
/// Out-of-line entries for names that are not parameters are kept as-is.
/// Each required value must be null-ish, name a parameter, or equal the
/// default under the same name.
///
/// # Errors
///
/// Returns a [`RoutePatternError`] describing the first rule violated.
pub fn build_pattern(
    raw_text: Option<&str>,
    segments: Vec<PathSegment>,
    defaults: NameMap<String>,
    policies: NameMap<Vec<PolicyReference>>,
    required_values: RequiredValues,
) -> Result<RoutePattern, RoutePatternError> {
    assemble(
        raw_text,
        segments,
        defaults,
        policies,
        required_values,
        &SegmentDigits,
    )
}

fn assemble(
    raw_text: Option<&str>,
    segments: Vec<PathSegment>,
    defaults: NameMap<String>,
    policies: NameMap<Vec<PolicyReference>>,
    required_values: RequiredValues,
    scorer: &dyn PrecedenceScorer,
) -> Result<RoutePattern, RoutePatternError> {
    let fail = |kind: PatternErrorKind| {
        let pattern = raw_text.map_or_else(|| render_segments(&segments), str::to_string);
        debug!(pattern = %pattern, error = %kind, "route pattern rejected");
        RoutePatternError::new(pattern, kind)
    };

    let mut merged_defaults = defaults.clone();
    let mut merged_policies: PolicyMap = policies
        .iter()
        .filter(|(_, list)| !list.is_empty())
        .map(|(name, list)| (name, Arc::from(list.as_slice())))
        .collect();
    let mut seen: Vec<Arc<str>> = Vec::new();
    let mut rebuilt = Vec::with_capacity(segments.len());

    for segment in &segments {
        let mut parts = Vec::with_capacity(segment.parts().len());
        for part in segment.parts() {
            let Part::Parameter(parameter) = part else {
                parts.push(part.clone());
                continue;
            };
            if seen.iter().any(|name| eq_ignore_case(name, &parameter.name)) {
                return Err(fail(PatternErrorKind::RepeatedParameter(
                    parameter.name.to_string(),
                )));
            }
            seen.push(Arc::clone(&parameter.name));

            let default = resolve_default(parameter, defaults.get(&parameter.name)).map_err(&fail)?;
            if let Some(value) = &default {
                merged_defaults.insert(Arc::clone(&parameter.name), value.clone());
            }

            let list: Arc<[PolicyReference]> = match policies.get(&parameter.name) {
                Some(extra) if !extra.is_empty() => parameter
                    .policies()
                    .iter()
                    .chain(extra.iter())
                    .cloned()
                    .collect(),
                _ => Arc::clone(&parameter.policies),
            };
            if !list.is_empty() {
                merged_policies.insert(Arc::clone(&parameter.name), Arc::clone(&list));
            }

            parts.push(Part::Parameter(ParameterPart::from_parts(
                Arc::clone(&parameter.name),
                default,
                parameter.kind(),
                list,
                parameter.encode_slashes(),
            )));
        }
        rebuilt.push(PathSegment {
            parts: parts.into(),
        });
    }

    for (key, value) in required_values.iter() {
        if value.is_nullish() || seen.iter().any(|name| eq_ignore_case(name, key)) {
            continue;
        }
        let matches_default = !value.is_any()
            && merged_defaults
                .get(key)
                .is_some_and(|d| value.equals_value(Some(d.as_str())));
        if !matches_default {
            return Err(fail(PatternErrorKind::UnmatchedRequiredValue {
                key: key.to_string(),
                value: value.to_string(),
            }));
        }
    }

    Ok(RoutePattern::from_parts(
        raw_text.map(Arc::from),
        rebuilt.into(),
        merged_defaults,
        merged_policies,
        required_values,
        scorer,
    ))
}

fn resolve_default(
    parameter: &ParameterPart,
    explicit: Option<&String>,
) -> Result<Option<String>, PatternErrorKind> {
    let Some(explicit) = explicit else {
        return Ok(parameter.default.clone());
    };
    if parameter
        .default_value()
        .is_some_and(|inline| inline != explicit.as_str())
    {
        return Err(PatternErrorKind::DefaultSpecifiedInlineAndExplicitly(
            parameter.name.to_string(),
        ));
    }
    if parameter.is_optional() {
        return Err(PatternErrorKind::OptionalCannotHaveDefault);
    }
    Ok(Some(explicit.clone()))
}

fn render_segments(segments: &[PathSegment]) -> String {
    segments
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("/")
}

/// Programmatic construction of a pattern from typed parts.
///
/// ```
/// use routepat::{Part, PathSegment, RoutePatternBuilder};
///
/// let pattern = RoutePatternBuilder::new()
///     .segment(PathSegment::new(vec![Part::literal("api").unwrap()]).unwrap())
///     .segment(PathSegment::new(vec![Part::parameter("id").unwrap()]).unwrap())
///     .default_value("id", "1")
///     .build()
///     .unwrap();
/// assert_eq!(pattern.to_string(), "api/{id=1}");
/// ```
#[derive(Default)]
pub struct RoutePatternBuilder {
    raw_text: Option<String>,
    segments: Vec<PathSegment>,
    defaults: NameMap<String>,
    policies: NameMap<Vec<PolicyReference>>,
    required_values: RequiredValues,
    scorer: Option<Arc<dyn PrecedenceScorer>>,
}

impl RoutePatternBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn raw_text(mut self, text: impl Into<String>) -> Self {
        self.raw_text = Some(text.into());
        self
    }

    #[must_use]
    pub fn segment(mut self, segment: PathSegment) -> Self {
        self.segments.push(segment);
        self
    }

    #[must_use]
    pub fn default_value(mut self, name: impl Into<Arc<str>>, value: impl Into<String>) -> Self {
        self.defaults.insert(name, value.into());
        self
    }

    /// Append an out-of-line constraint for `name`.
    #[must_use]
    pub fn policy(mut self, name: &str, policy: PolicyReference) -> Self {
        match self.policies.get_mut(name) {
            Some(list) => list.push(policy),
            None => {
                self.policies.insert(name, vec![policy]);
            }
        }
        self
    }

    #[must_use]
    pub fn required_value(mut self, name: impl Into<Arc<str>>, value: RequiredValue) -> Self {
        self.required_values.insert(name, value);
        self
    }

    /// Replace the default [`SegmentDigits`] precedence.
    #[must_use]
    pub fn precedence(mut self, scorer: Arc<dyn PrecedenceScorer>) -> Self {
        self.scorer = Some(scorer);
        self
    }

    /// # Errors
    ///
    /// Same checks as [`build_pattern`].
    pub fn build(self) -> Result<RoutePattern, RoutePatternError> {
        let scorer = self.scorer.unwrap_or_else(|| Arc::new(SegmentDigits));
        assemble(
            self.raw_text.as_deref(),
            self.segments,
            self.defaults,
            self.policies,
            self.required_values,
            scorer.as_ref(),
        )
    }
}
