//! Parameter policies: constraint references carried by a pattern and the
//! contract used to evaluate them.

use std::fmt;
use std::sync::Arc;

use super::part::ParameterPart;
use super::values::RequiredValues;

/// A resolved parameter policy, typically a route constraint such as `int`
/// or `regex(...)`.
///
/// Implementations live outside this crate. The transformer only asks whether
/// a proposed set of route values is acceptable for one key; evaluation may be
/// slow (regex) and the core imposes no timeout on it.
pub trait ParameterPolicy: fmt::Debug + Send + Sync {
    /// `true` when the value stored under `key` in `values` satisfies the policy.
    fn matches(&self, key: &str, values: &RequiredValues) -> bool;
}

/// Turns constraint text (`"int"`, `"regex(^\\d+$)"`) into a policy.
///
/// Returns `None` when the text names no known policy.
pub trait PolicyResolver {
    fn resolve(
        &self,
        parameter: Option<&ParameterPart>,
        text: &str,
    ) -> Option<Arc<dyn ParameterPolicy>>;
}

impl<F> PolicyResolver for F
where
    F: Fn(Option<&ParameterPart>, &str) -> Option<Arc<dyn ParameterPolicy>>,
{
    fn resolve(
        &self,
        parameter: Option<&ParameterPart>,
        text: &str,
    ) -> Option<Arc<dyn ParameterPolicy>> {
        self(parameter, text)
    }
}

/// Resolver that knows no textual policies. Patterns that only carry
/// resolved handles work with it.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoPolicies;

impl PolicyResolver for NoPolicies {
    fn resolve(&self, _: Option<&ParameterPart>, _: &str) -> Option<Arc<dyn ParameterPolicy>> {
        None
    }
}

/// Reference to a parameter policy: either raw text to be resolved later or
/// an already-resolved handle.
#[derive(Clone)]
pub enum PolicyReference {
    /// Constraint text as written after `:` in a template
    Text(Arc<str>),
    /// Resolved policy handle
    Policy(Arc<dyn ParameterPolicy>),
}

impl PolicyReference {
    #[must_use]
    pub fn text(text: impl Into<Arc<str>>) -> Self {
        PolicyReference::Text(text.into())
    }

    #[must_use]
    pub fn policy(policy: Arc<dyn ParameterPolicy>) -> Self {
        PolicyReference::Policy(policy)
    }

    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            PolicyReference::Text(t) => Some(t),
            PolicyReference::Policy(_) => None,
        }
    }

    /// Resolve to a policy handle, consulting `resolver` for text.
    pub fn resolve<R: PolicyResolver + ?Sized>(
        &self,
        parameter: Option<&ParameterPart>,
        resolver: &R,
    ) -> Option<Arc<dyn ParameterPolicy>> {
        match self {
            PolicyReference::Text(t) => resolver.resolve(parameter, t),
            PolicyReference::Policy(p) => Some(Arc::clone(p)),
        }
    }
}

impl PartialEq for PolicyReference {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (PolicyReference::Text(a), PolicyReference::Text(b)) => a == b,
            (PolicyReference::Policy(a), PolicyReference::Policy(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl fmt::Debug for PolicyReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PolicyReference::Text(t) => f.debug_tuple("Text").field(t).finish(),
            PolicyReference::Policy(p) => f.debug_tuple("Policy").field(p).finish(),
        }
    }
}

impl fmt::Display for PolicyReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PolicyReference::Text(t) => f.write_str(t),
            PolicyReference::Policy(p) => write!(f, "{p:?}"),
        }
    }
}
