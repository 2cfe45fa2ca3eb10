use serde::Serialize;
use std::fmt;
use std::sync::Arc;

use super::part::{ParameterKind, ParameterPart, Part, PathSegment};
use super::policy::PolicyReference;
use super::precedence::PrecedenceScorer;
use super::values::{eq_ignore_case, NameMap, RequiredValues};

/// Per-name policy lists, stored as shared slices so segment parts and the
/// pattern-level map can point at the same list.
pub type PolicyMap = NameMap<Arc<[PolicyReference]>>;

/// Immutable parsed route pattern.
///
/// Every field is shared behind `Arc`, so cloning a pattern is cheap and
/// derived patterns reuse the pieces they did not change.
#[derive(Debug, Clone, PartialEq)]
pub struct RoutePattern {
    raw_text: Option<Arc<str>>,
    segments: Arc<[PathSegment]>,
    /// `(segment index, part index)` of every parameter in template order
    parameter_slots: Arc<[(usize, usize)]>,
    defaults: Arc<NameMap<String>>,
    policies: Arc<PolicyMap>,
    required_values: Arc<RequiredValues>,
    inbound_precedence: f64,
    outbound_precedence: f64,
}

impl RoutePattern {
    /// Assemble a pattern from already validated pieces.
    pub(crate) fn from_parts(
        raw_text: Option<Arc<str>>,
        segments: Arc<[PathSegment]>,
        defaults: NameMap<String>,
        policies: PolicyMap,
        required_values: RequiredValues,
        scorer: &dyn PrecedenceScorer,
    ) -> Self {
        let parameter_slots = locate_parameters(&segments);
        let inbound_precedence = scorer.inbound(&segments);
        let outbound_precedence = scorer.outbound(&segments);
        Self {
            raw_text,
            segments,
            parameter_slots,
            defaults: Arc::new(defaults),
            policies: Arc::new(policies),
            required_values: Arc::new(required_values),
            inbound_precedence,
            outbound_precedence,
        }
    }

    /// Copy of this pattern with new defaults, segments and required values.
    ///
    /// The segment structure (part kinds and positions) must be unchanged, so
    /// the parameter slots and precedence carry over.
    pub(crate) fn with_substitution(
        &self,
        defaults: Option<NameMap<String>>,
        segments: Option<Arc<[PathSegment]>>,
        required_values: RequiredValues,
    ) -> Self {
        Self {
            raw_text: self.raw_text.clone(),
            segments: segments.unwrap_or_else(|| Arc::clone(&self.segments)),
            parameter_slots: Arc::clone(&self.parameter_slots),
            defaults: defaults.map_or_else(|| Arc::clone(&self.defaults), Arc::new),
            policies: Arc::clone(&self.policies),
            required_values: Arc::new(required_values),
            inbound_precedence: self.inbound_precedence,
            outbound_precedence: self.outbound_precedence,
        }
    }

    /// Template text the pattern was parsed from, if any.
    #[must_use]
    pub fn raw_text(&self) -> Option<&str> {
        self.raw_text.as_deref()
    }

    #[must_use]
    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }

    pub(crate) fn shared_segments(&self) -> &Arc<[PathSegment]> {
        &self.segments
    }

    /// All parameter parts in template order.
    pub fn parameters(&self) -> impl Iterator<Item = &ParameterPart> + '_ {
        self.parameter_slots
            .iter()
            .filter_map(|&(s, p)| self.segments[s].parts[p].as_parameter())
    }

    #[must_use]
    pub fn parameter_count(&self) -> usize {
        self.parameter_slots.len()
    }

    /// Parameter with the given name, compared ignoring case.
    #[must_use]
    pub fn parameter(&self, name: &str) -> Option<&ParameterPart> {
        self.parameters().find(|p| eq_ignore_case(&p.name, name))
    }

    /// `(segment index, part index)` of the named parameter.
    #[must_use]
    pub fn parameter_location(&self, name: &str) -> Option<(usize, usize)> {
        self.parameter_slots.iter().copied().find(|&(s, p)| {
            self.segments[s].parts[p]
                .as_parameter()
                .is_some_and(|param| eq_ignore_case(&param.name, name))
        })
    }

    #[must_use]
    pub fn defaults(&self) -> &NameMap<String> {
        &self.defaults
    }

    #[must_use]
    pub fn policies(&self) -> &PolicyMap {
        &self.policies
    }

    #[must_use]
    pub fn required_values(&self) -> &RequiredValues {
        &self.required_values
    }

    #[must_use]
    pub fn inbound_precedence(&self) -> f64 {
        self.inbound_precedence
    }

    #[must_use]
    pub fn outbound_precedence(&self) -> f64 {
        self.outbound_precedence
    }

    /// Serializable view used for JSON output.
    #[must_use]
    pub fn summary(&self) -> PatternSummary {
        PatternSummary {
            raw_text: self.raw_text.as_deref().map(str::to_string),
            rendered: self.to_string(),
            segments: self
                .segments
                .iter()
                .map(|s| s.parts().iter().map(PartSummary::from).collect())
                .collect(),
            defaults: (*self.defaults).clone(),
            policies: self
                .policies
                .iter()
                .map(|(k, v)| (k, v.iter().map(ToString::to_string).collect()))
                .collect(),
            required_values: (*self.required_values).clone(),
            inbound_precedence: self.inbound_precedence,
            outbound_precedence: self.outbound_precedence,
        }
    }
}

/// Renders the segments as template text, braces re-escaped.
impl fmt::Display for RoutePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.segments.iter().enumerate() {
            if i > 0 {
                f.write_str("/")?;
            }
            segment.fmt(f)?;
        }
        Ok(())
    }
}

fn locate_parameters(segments: &[PathSegment]) -> Arc<[(usize, usize)]> {
    segments
        .iter()
        .enumerate()
        .flat_map(|(s, segment)| {
            segment
                .parts
                .iter()
                .enumerate()
                .filter(|(_, part)| part.is_parameter())
                .map(move |(p, _)| (s, p))
        })
        .collect()
}

#[derive(Debug, Clone, Serialize)]
pub struct PatternSummary {
    pub raw_text: Option<String>,
    pub rendered: String,
    pub segments: Vec<Vec<PartSummary>>,
    pub defaults: NameMap<String>,
    pub policies: NameMap<Vec<String>>,
    pub required_values: RequiredValues,
    pub inbound_precedence: f64,
    pub outbound_precedence: f64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PartSummary {
    Literal {
        text: String,
    },
    Separator {
        text: String,
    },
    Parameter {
        name: String,
        kind: ParameterKind,
        default: Option<String>,
        policies: Vec<String>,
        encode_slashes: bool,
    },
}

impl From<&Part> for PartSummary {
    fn from(part: &Part) -> Self {
        match part {
            Part::Literal(t) => PartSummary::Literal { text: t.to_string() },
            Part::Separator(t) => PartSummary::Separator { text: t.to_string() },
            Part::Parameter(p) => PartSummary::Parameter {
                name: p.name().to_string(),
                kind: p.kind(),
                default: p.default_value().map(str::to_string),
                policies: p.policies().iter().map(ToString::to_string).collect(),
                encode_slashes: p.encode_slashes(),
            },
        }
    }
}
