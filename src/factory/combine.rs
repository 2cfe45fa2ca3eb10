use std::sync::Arc;

use tracing::debug;

use crate::pattern::{
    eq_ignore_case, NameMap, PatternErrorKind, PrecedenceScorer, RoutePattern, RoutePatternError,
    SegmentDigits,
};

const DEFAULTS: &str = "defaults";
const REQUIRED_VALUES: &str = "required values";
const PARAMETER_POLICIES: &str = "parameter policies";

/// Append `right` to `left`.
///
/// The raw text is `left` and `right` joined by exactly one `/`. Segments are
/// concatenated and the defaults, required values and policies maps merged;
/// a key present on both sides must carry equal values. With no `left`,
/// `right` is returned unchanged.
///
/// # Errors
///
/// Fails when a parameter name appears on both sides or when a map entry
/// conflicts. The error carries the combined raw text.
///
/// The combined pattern is scored with [`SegmentDigits`]; use
/// [`combine_with`] to keep a custom [`PrecedenceScorer`].
pub fn combine(
    left: Option<&RoutePattern>,
    right: &RoutePattern,
) -> Result<RoutePattern, RoutePatternError> {
    combine_with(left, right, &SegmentDigits)
}

/// [`combine`] with an explicit precedence scorer for the combined pattern.
pub fn combine_with(
    left: Option<&RoutePattern>,
    right: &RoutePattern,
    scorer: &dyn PrecedenceScorer,
) -> Result<RoutePattern, RoutePatternError> {
    let Some(left) = left else {
        return Ok(right.clone());
    };

    let raw_text = format!(
        "{}/{}",
        left.raw_text().unwrap_or("").trim_end_matches('/'),
        right.raw_text().unwrap_or("").trim_start_matches('/'),
    );
    let fail = |kind: PatternErrorKind| {
        debug!(left = ?left.raw_text(), right = ?right.raw_text(), error = %kind, "patterns not combined");
        RoutePatternError::new(raw_text.as_str(), kind)
    };

    for parameter in right.parameters() {
        if left
            .parameters()
            .any(|existing| eq_ignore_case(&existing.name, &parameter.name))
        {
            return Err(fail(PatternErrorKind::RepeatedParameter(
                parameter.name.to_string(),
            )));
        }
    }

    let segments: Arc<[_]> = left
        .segments()
        .iter()
        .chain(right.segments())
        .cloned()
        .collect();
    let defaults = merge(left.defaults(), right.defaults(), DEFAULTS).map_err(&fail)?;
    let required_values =
        merge(left.required_values(), right.required_values(), REQUIRED_VALUES).map_err(&fail)?;
    let policies = merge(left.policies(), right.policies(), PARAMETER_POLICIES).map_err(&fail)?;

    Ok(RoutePattern::from_parts(
        Some(Arc::from(raw_text.as_str())),
        segments,
        defaults,
        policies,
        required_values,
        scorer,
    ))
}

fn merge<V: Clone + PartialEq>(
    left: &NameMap<V>,
    right: &NameMap<V>,
    dictionary: &'static str,
) -> Result<NameMap<V>, PatternErrorKind> {
    let mut merged = left.clone();
    for (key, value) in right.iter() {
        match merged.get(key) {
            Some(existing) if existing != value => {
                return Err(PatternErrorKind::ConflictingEntry {
                    dictionary,
                    key: key.to_string(),
                });
            }
            Some(_) => {}
            None => {
                merged.insert(key, value.clone());
            }
        }
    }
    Ok(merged)
}
