//! Parts and path segments: the atomic pieces a route template is made of.

use serde::Serialize;
use std::fmt;
use std::sync::Arc;

use super::error::PatternErrorKind;
use super::policy::PolicyReference;

/// Characters that may never appear in a parameter name.
pub(crate) const INVALID_NAME_CHARS: [char; 5] = ['/', '{', '}', '?', '*'];

/// How a parameter consumes path text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ParameterKind {
    /// `{name}` - requires a value
    Standard,
    /// `{name?}` - may be absent
    Optional,
    /// `{*name}` / `{**name}` - consumes the rest of the path
    CatchAll,
}

/// A parameter part such as `{id:int=7}`.
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterPart {
    pub(crate) name: Arc<str>,
    pub(crate) default: Option<String>,
    pub(crate) kind: ParameterKind,
    pub(crate) policies: Arc<[PolicyReference]>,
    pub(crate) encode_slashes: bool,
}

impl ParameterPart {
    /// Create a validated parameter part.
    ///
    /// # Errors
    ///
    /// Fails when the name is empty or contains a reserved character, or when
    /// an optional parameter is given a default.
    pub fn new(
        name: impl Into<Arc<str>>,
        default: Option<String>,
        kind: ParameterKind,
        policies: Vec<PolicyReference>,
    ) -> Result<Self, PatternErrorKind> {
        let name = name.into();
        if !is_valid_parameter_name(&name) {
            return Err(PatternErrorKind::InvalidParameterName(name.to_string()));
        }
        if kind == ParameterKind::Optional && default.is_some() {
            return Err(PatternErrorKind::OptionalCannotHaveDefault);
        }
        Ok(Self::from_parts(name, default, kind, policies.into(), true))
    }

    /// Unvalidated constructor for the parser and factory.
    pub(crate) fn from_parts(
        name: Arc<str>,
        default: Option<String>,
        kind: ParameterKind,
        policies: Arc<[PolicyReference]>,
        encode_slashes: bool,
    ) -> Self {
        Self {
            name,
            default,
            kind,
            policies,
            encode_slashes,
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn default_value(&self) -> Option<&str> {
        self.default.as_deref()
    }

    #[must_use]
    pub fn kind(&self) -> ParameterKind {
        self.kind
    }

    #[must_use]
    pub fn policies(&self) -> &[PolicyReference] {
        &self.policies
    }

    /// `false` only for catch-alls declared with `**`.
    #[must_use]
    pub fn encode_slashes(&self) -> bool {
        self.encode_slashes
    }

    #[inline]
    #[must_use]
    pub fn is_optional(&self) -> bool {
        self.kind == ParameterKind::Optional
    }

    #[inline]
    #[must_use]
    pub fn is_catch_all(&self) -> bool {
        self.kind == ParameterKind::CatchAll
    }

    /// Copy of this part with the default replaced.
    pub(crate) fn with_default(&self, default: Option<String>) -> Self {
        Self {
            default,
            ..self.clone()
        }
    }
}

impl fmt::Display for ParameterPart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        if self.is_catch_all() {
            f.write_str(if self.encode_slashes { "*" } else { "**" })?;
        }
        write_escaped(f, &self.name)?;
        for policy in self.policies.iter() {
            f.write_str(":")?;
            write_escaped(f, &policy.to_string())?;
        }
        if let Some(default) = &self.default {
            f.write_str("=")?;
            write_escaped(f, default)?;
        }
        if self.is_optional() {
            f.write_str("?")?;
        }
        f.write_str("}")
    }
}

/// One atomic piece of a path segment.
#[derive(Debug, Clone, PartialEq)]
pub enum Part {
    /// Literal text matched ignoring case
    Literal(Arc<str>),
    /// Optional delimiter (currently only `.`) before a trailing optional parameter
    Separator(Arc<str>),
    Parameter(ParameterPart),
}

impl Part {
    /// Create a literal part.
    ///
    /// # Errors
    ///
    /// Fails on empty content or content containing `?`.
    pub fn literal(content: impl Into<Arc<str>>) -> Result<Self, PatternErrorKind> {
        let content = content.into();
        if content.is_empty() {
            return Err(PatternErrorKind::EmptyPartContent("literal"));
        }
        if content.contains('?') {
            return Err(PatternErrorKind::InvalidLiteral(content.to_string()));
        }
        Ok(Part::Literal(content))
    }

    /// Create a separator part.
    ///
    /// # Errors
    ///
    /// Fails on empty content.
    pub fn separator(content: impl Into<Arc<str>>) -> Result<Self, PatternErrorKind> {
        let content = content.into();
        if content.is_empty() {
            return Err(PatternErrorKind::EmptyPartContent("separator"));
        }
        Ok(Part::Separator(content))
    }

    /// Create a standard parameter with no default or policies.
    ///
    /// # Errors
    ///
    /// Fails when the name is invalid.
    pub fn parameter(name: impl Into<Arc<str>>) -> Result<Self, PatternErrorKind> {
        ParameterPart::new(name, None, ParameterKind::Standard, Vec::new()).map(Part::Parameter)
    }

    #[inline]
    #[must_use]
    pub fn is_parameter(&self) -> bool {
        matches!(self, Part::Parameter(_))
    }

    #[must_use]
    pub fn as_parameter(&self) -> Option<&ParameterPart> {
        match self {
            Part::Parameter(p) => Some(p),
            _ => None,
        }
    }

    /// Text of a literal or separator part.
    #[must_use]
    pub fn text(&self) -> Option<&str> {
        match self {
            Part::Literal(t) | Part::Separator(t) => Some(t),
            Part::Parameter(_) => None,
        }
    }
}

impl fmt::Display for Part {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Part::Literal(t) | Part::Separator(t) => write_escaped(f, t),
            Part::Parameter(p) => p.fmt(f),
        }
    }
}

/// Ordered parts between two `/` delimiters.
#[derive(Debug, Clone, PartialEq)]
pub struct PathSegment {
    pub(crate) parts: Arc<[Part]>,
}

impl PathSegment {
    /// Create a segment from at least one part.
    ///
    /// Returns `None` when `parts` is empty.
    #[must_use]
    pub fn new(parts: Vec<Part>) -> Option<Self> {
        if parts.is_empty() {
            return None;
        }
        Some(Self {
            parts: parts.into(),
        })
    }

    #[must_use]
    pub fn parts(&self) -> &[Part] {
        &self.parts
    }

    /// A simple segment has exactly one part.
    #[inline]
    #[must_use]
    pub fn is_simple(&self) -> bool {
        self.parts.len() == 1
    }

    /// The parameter of a simple parameter segment.
    #[inline]
    #[must_use]
    pub fn simple_parameter(&self) -> Option<&ParameterPart> {
        if self.is_simple() {
            self.parts[0].as_parameter()
        } else {
            None
        }
    }
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for part in self.parts.iter() {
            part.fmt(f)?;
        }
        Ok(())
    }
}

pub(crate) fn is_valid_parameter_name(name: &str) -> bool {
    !name.is_empty() && !name.contains(INVALID_NAME_CHARS)
}

/// Write text with `{` and `}` doubled so it parses back to the same text.
fn write_escaped(f: &mut fmt::Formatter<'_>, text: &str) -> fmt::Result {
    if !text.contains(['{', '}']) {
        return f.write_str(text);
    }
    for c in text.chars() {
        match c {
            '{' => f.write_str("{{")?,
            '}' => f.write_str("}}")?,
            _ => fmt::Write::write_char(f, c)?,
        }
    }
    Ok(())
}
