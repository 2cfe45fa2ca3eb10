//! # routepat
//!
//! **routepat** compiles URL route templates into immutable patterns, matches
//! request paths against them, and derives narrower patterns by baking in
//! required route values.
//!
//! ## Overview
//!
//! A template such as `"{area=Admin}/{controller=Home}/{action=Index}/{id?}"`
//! is parsed once into a [`RoutePattern`]: path segments made of literal,
//! separator and parameter parts, plus defaults, constraint references and
//! required values. Patterns are never mutated; matching and substitution
//! only read them.
//!
//! ## Architecture
//!
//! - **[`pattern`]** - The data model: parts, segments, patterns, value maps
//! - **[`parser`]** - Template text to segments, including the inline
//!   `{name:constraint=default?}` syntax
//! - **[`factory`]** - Pattern construction, out-of-line settings, combine
//! - **[`matcher`]** - Two-pass path matching with right-to-left matching of
//!   multi-part segments
//! - **[`transform`]** - Required-value substitution
//! - **[`config`]** - Environment settings and route files for the CLI
//! - **[`cli`]** - The `routepat` command
//!
//! ```text
//! text ──parse──▶ segments ──build_pattern──▶ RoutePattern ──┬──▶ try_match
//!                                                           └──▶ substitute_required_values
//! ```
//!
//! ## Error Handling
//!
//! Malformed templates and invalid combinations of defaults, constraints and
//! required values are [`RoutePatternError`]s carrying the template text.
//! A path that does not match or a substitution that is impossible is an
//! ordinary `None`.
//!
//! ## Example
//!
//! ```
//! use routepat::{parse, try_match};
//!
//! let pattern = parse("{p1}/{p2}.{p3?}").unwrap();
//!
//! let values = try_match(&pattern, pattern.defaults(), "/one/two.three").unwrap();
//! assert_eq!(values.value("p3"), Some("three"));
//!
//! let values = try_match(&pattern, pattern.defaults(), "/one/two").unwrap();
//! assert_eq!(values.value("p2"), Some("two"));
//! assert!(!values.contains_key("p3"));
//! ```

pub mod cli;
pub mod config;
pub mod factory;
pub mod logging;
pub mod matcher;
pub mod parser;
pub mod pattern;
pub mod transform;

pub use factory::{build_pattern, combine, combine_with, RoutePatternBuilder};
pub use matcher::{try_match, RoutePatternMatcher};
pub use parser::{parse, parse_with};
pub use pattern::{
    NameMap, NoPolicies, ParameterKind, ParameterPart, ParameterPolicy, Part, PathSegment,
    PatternErrorKind, PolicyReference, PolicyResolver, RequiredValue, RequiredValues,
    RoutePattern, RoutePatternError, RouteValues,
};
pub use transform::{substitute_required_values, RequiredValueTransformer};
