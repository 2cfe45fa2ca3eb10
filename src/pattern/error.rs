use thiserror::Error;

/// Error raised when a route pattern cannot be parsed, built, or combined.
///
/// Always carries the template text the operation was working on so the
/// failure can be reported against the route that declared it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid route pattern '{pattern}': {kind}")]
pub struct RoutePatternError {
    /// Raw template text (or the reconstructed text of a combined pattern)
    pub pattern: String,
    /// What went wrong
    pub kind: PatternErrorKind,
}

impl RoutePatternError {
    pub(crate) fn new(pattern: impl Into<String>, kind: PatternErrorKind) -> Self {
        Self {
            pattern: pattern.into(),
            kind,
        }
    }

    #[must_use]
    pub fn kind(&self) -> &PatternErrorKind {
        &self.kind
    }
}

/// Diagnostic for a rejected route pattern.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PatternErrorKind {
    /// Two `/` characters with nothing between them
    #[error(
        "the separator character '/' cannot appear consecutively; it must be separated by either a parameter or a literal value"
    )]
    ConsecutiveSeparators,
    /// Template starts with `~` that is not followed by `/`
    #[error("a route template cannot start with a '~' character unless followed by a '/'")]
    InvalidLeadingTilde,
    /// A `{` without a matching `}` or a stray `}`
    #[error(
        "there is an incomplete parameter in the route template; check that each '{{' character has a matching '}}' character"
    )]
    MismatchedParameter,
    /// A brace inside a parameter that was not doubled
    #[error("in a route parameter, '{{' and '}}' must be escaped with '{{{{' and '}}}}'")]
    UnescapedBrace,
    /// Empty name or a name with reserved characters
    #[error(
        "the route parameter name '{0}' is invalid; names must be non-empty and cannot contain '{{', '}}', '/', '?' or '*' ('?' may only end a parameter, '*' may only start one)"
    )]
    InvalidParameterName(String),
    /// Same name used by two parameters (names compare ignoring case)
    #[error("the route parameter name '{0}' appears more than one time in the route template")]
    RepeatedParameter(String),
    /// A literal containing `?`
    #[error("the literal section '{0}' is invalid; literal sections cannot contain the '?' character")]
    InvalidLiteral(String),
    /// A part constructed directly with empty content
    #[error("the {0} part content must not be empty")]
    EmptyPartContent(&'static str),
    /// `{*name?}`
    #[error("a catch-all parameter cannot be marked optional")]
    CatchAllCannotBeOptional,
    /// `{name=value?}` or an out-of-line default for an optional parameter
    #[error("an optional parameter cannot have a default value")]
    OptionalCannotHaveDefault,
    /// Catch-all sharing a segment with other parts
    #[error(
        "a path segment that contains more than one section, such as a literal section or a parameter, cannot contain a catch-all parameter"
    )]
    CatchAllInMultiPartSegment,
    /// Catch-all anywhere but the final part of the final segment
    #[error("a catch-all parameter can only appear as the last segment of the route template")]
    CatchAllMustBeLast,
    /// Optional parameter followed by another part in the same segment
    #[error(
        "an optional parameter must be at the end of the segment; in the segment '{segment}', optional parameter '{parameter}' is followed by '{next}'"
    )]
    OptionalMustBeLast {
        segment: String,
        parameter: String,
        next: String,
    },
    /// Optional parameter in a complex segment not preceded by `.`
    #[error(
        "in the segment '{segment}', the optional parameter '{parameter}' is preceded by an invalid segment '{previous}'; only a period (.) can precede an optional parameter"
    )]
    OptionalPrecededByInvalid {
        segment: String,
        parameter: String,
        previous: String,
    },
    /// Two parameters back to back in one segment
    #[error(
        "a path segment cannot contain two consecutive parameters; they must be separated by a '/' or by a literal string"
    )]
    ConsecutiveParameters,
    /// Inline default disagrees with an out-of-line default
    #[error(
        "the route parameter '{0}' has both an inline default value and an explicit default value specified; a route parameter cannot contain an inline default value when a default value is specified explicitly"
    )]
    DefaultSpecifiedInlineAndExplicitly(String),
    /// Required value with no parameter and no matching default
    #[error(
        "no corresponding parameter or default value could be found for the required value '{key}={value}'; a non-null required value must correspond to a route parameter or the route pattern must have a matching default value"
    )]
    UnmatchedRequiredValue { key: String, value: String },
    /// Both sides of a combine disagree on a dictionary entry
    #[error("cannot combine patterns because the '{dictionary}' entry '{key}' has multiple values")]
    ConflictingEntry { dictionary: &'static str, key: String },
}
