//! # Parser Module
//!
//! Turns route template text into a [`RoutePattern`].
//!
//! ## Grammar
//!
//! ```text
//! template   := ["~/" | "/"] segment ("/" segment)* ["/"]
//! segment    := part+
//! part       := literal | "{" parameter "}"
//! parameter  := ["*" | "**"] name (":" constraint)* ["=" default] ["?"]
//! ```
//!
//! Inside literals and parameters `{{` and `}}` stand for a literal brace.
//! A constraint may carry a parenthesized argument; `:` and `=` inside the
//! parenthesis belong to the argument:
//!
//! ```text
//! {id:int:range(1,100)=7}     name=id  constraints=[int, range(1,100)]  default=7
//! {ssn:regex(^\d{{3}}$)}      name=ssn constraints=[regex(^\d{3}$)]
//! {*path}                     catch-all, slashes encoded on generation
//! {**path}                    catch-all, slashes kept on generation
//! ```
//!
//! ## Validation
//!
//! Besides the grammar, a template is rejected when:
//!
//! - two `/` appear back to back
//! - a parameter name is repeated (names compare ignoring case)
//! - a catch-all is not the only part of the last segment
//! - an optional parameter in a multi-part segment is not last or is not
//!   preceded by a `.` literal (that `.` becomes a [`Part::Separator`])
//! - two parameters are adjacent in one segment
//!
//! Every failure is a [`RoutePatternError`] carrying the template text.
//!
//! [`Part::Separator`]: crate::pattern::Part::Separator

mod cursor;
mod parameter;
mod template;
#[cfg(test)]
mod tests;

use self::template::parse_segments;
use crate::factory::build_pattern;
use crate::pattern::{NameMap, PolicyReference, RequiredValues, RoutePattern, RoutePatternError};

/// Parse a route template.
///
/// # Errors
///
/// Returns a [`RoutePatternError`] when the template is malformed.
///
/// # Example
///
/// ```
/// let pattern = routepat::parse("{controller=Home}/{action=Index}/{id?}").unwrap();
/// assert_eq!(pattern.parameter_count(), 3);
/// assert_eq!(pattern.defaults().get("action").map(String::as_str), Some("Index"));
/// ```
pub fn parse(template: &str) -> Result<RoutePattern, RoutePatternError> {
    parse_with(
        template,
        NameMap::new(),
        NameMap::new(),
        RequiredValues::new(),
    )
}

/// Parse a route template and merge out-of-line defaults, constraints and
/// required values into it.
///
/// # Errors
///
/// Fails on malformed templates and on the factory checks described in
/// [`build_pattern`].
pub fn parse_with(
    template: &str,
    defaults: NameMap<String>,
    policies: NameMap<Vec<PolicyReference>>,
    required_values: RequiredValues,
) -> Result<RoutePattern, RoutePatternError> {
    let segments = parse_segments(template)?;
    build_pattern(Some(template), segments, defaults, policies, required_values)
}
