use std::sync::Arc;

use tracing::debug;

use crate::pattern::{
    NameMap, NoPolicies, ParameterPart, ParameterPolicy, Part, PathSegment, PolicyResolver,
    RequiredValue, RequiredValues, RoutePattern,
};

/// Derives patterns with required route values baked in.
///
/// The resolver turns textual constraints into policies; constraints are
/// consulted with the proposed required values as context. A textual
/// constraint the resolver does not know makes the substitution fail.
#[derive(Debug, Clone, Default)]
pub struct RequiredValueTransformer<R = NoPolicies> {
    resolver: R,
}

impl<R: PolicyResolver> RequiredValueTransformer<R> {
    #[must_use]
    pub fn new(resolver: R) -> Self {
        Self { resolver }
    }

    /// Produce a pattern committed to `required`, or `None` when no request
    /// could ever match the result.
    ///
    /// Each key must be one of:
    ///
    /// - null-ish, for a name that is not a parameter and has no concrete default
    /// - `Any`, unless the name is a non-parameter with a concrete default
    /// - a parameter name whose constraints accept the value
    /// - a non-parameter name whose default equals the value, constraints permitting
    ///
    /// Defaults of parameters given a different concrete value are removed.
    /// Required values already on `pattern` are kept unless overridden.
    #[must_use]
    pub fn substitute(
        &self,
        pattern: &RoutePattern,
        required: &RequiredValues,
    ) -> Option<RoutePattern> {
        for (key, value) in required.iter() {
            if let Err(reason) = self.admit(pattern, key, value, required) {
                debug!(
                    pattern = ?pattern.raw_text(),
                    key = %key,
                    value = %value,
                    reason,
                    "required values rejected"
                );
                return None;
            }
        }

        let mut defaults: Option<NameMap<String>> = None;
        let mut segments: Option<Vec<PathSegment>> = None;
        for (key, value) in required.iter() {
            if value.is_any() || pattern.parameter(key).is_none() {
                continue;
            }
            let Some(existing) = pattern.defaults().get(key) else {
                continue;
            };
            if value.equals_value(Some(existing.as_str())) {
                continue;
            }
            defaults
                .get_or_insert_with(|| pattern.defaults().clone())
                .remove(key);
            if let Some(location) = pattern.parameter_location(key) {
                let segments =
                    segments.get_or_insert_with(|| pattern.shared_segments().to_vec());
                clear_default(segments, location);
            }
        }

        let mut merged = required.clone();
        for (key, value) in pattern.required_values().iter() {
            merged.try_insert(key, value.clone());
        }

        Some(pattern.with_substitution(defaults, segments.map(Arc::from), merged))
    }

    fn admit(
        &self,
        pattern: &RoutePattern,
        key: &str,
        value: &RequiredValue,
        required: &RequiredValues,
    ) -> Result<(), &'static str> {
        let parameter = pattern.parameter(key);
        let default = pattern.defaults().get(key).map(String::as_str);

        if value.is_nullish() {
            if parameter.is_some() {
                return Err("a parameter cannot be required to be empty");
            }
            if default.is_some_and(|d| !value.equals_value(Some(d))) {
                return Err("conflicts with a non-parameter default");
            }
            return Ok(());
        }

        if value.is_any() {
            if parameter.is_none() && default.is_some_and(|d| !d.is_empty()) {
                return Err("a non-parameter default is stricter than any");
            }
            return Ok(());
        }

        if parameter.is_some() {
            return self.check_policies(pattern, parameter, key, required);
        }

        if default.is_some_and(|d| value.equals_value(Some(d))) {
            return self.check_policies(pattern, None, key, required);
        }

        Err("no parameter or matching default")
    }

    fn check_policies(
        &self,
        pattern: &RoutePattern,
        parameter: Option<&ParameterPart>,
        key: &str,
        required: &RequiredValues,
    ) -> Result<(), &'static str> {
        let Some(policies) = pattern.policies().get(key) else {
            return Ok(());
        };
        for reference in policies.iter() {
            let Some(policy) = reference.resolve(parameter, &self.resolver) else {
                return Err("constraint could not be resolved");
            };
            if !policy.matches(key, required) {
                return Err("constraint rejected the value");
            }
        }
        Ok(())
    }
}

/// Replace the parameter at `(segment, part)` with a copy without default.
fn clear_default(segments: &mut [PathSegment], (segment, part): (usize, usize)) {
    let Some(target) = segments.get_mut(segment) else {
        return;
    };
    let parts: Vec<Part> = target
        .parts()
        .iter()
        .enumerate()
        .map(|(i, p)| match p {
            Part::Parameter(parameter) if i == part => Part::Parameter(parameter.with_default(None)),
            other => other.clone(),
        })
        .collect();
    target.parts = parts.into();
}

/// Substitute `required` into `pattern` resolving constraints with `resolver`.
///
/// # Example
///
/// ```
/// use routepat::{parse, substitute_required_values, NoPolicies, RequiredValue, RequiredValues};
///
/// let pattern = parse("{controller=Home}/{action=Index}").unwrap();
/// let mut required = RequiredValues::new();
/// required.insert("area", RequiredValue::value(""));
///
/// let derived = substitute_required_values(&pattern, &required, &NoPolicies).unwrap();
/// assert!(derived.parameter("area").is_none());
/// assert!(!derived.defaults().contains_key("area"));
/// ```
#[must_use]
pub fn substitute_required_values<R: PolicyResolver + ?Sized>(
    pattern: &RoutePattern,
    required: &RequiredValues,
    resolver: &R,
) -> Option<RoutePattern> {
    RequiredValueTransformer::new(Resolver(resolver)).substitute(pattern, required)
}

struct Resolver<'a, R: ?Sized>(&'a R);

impl<R: PolicyResolver + ?Sized> PolicyResolver for Resolver<'_, R> {
    fn resolve(
        &self,
        parameter: Option<&ParameterPart>,
        text: &str,
    ) -> Option<Arc<dyn ParameterPolicy>> {
        self.0.resolve(parameter, text)
    }
}
