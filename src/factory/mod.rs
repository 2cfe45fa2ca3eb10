//! # Factory Module
//!
//! Builds [`RoutePattern`] values from typed parts and combines patterns.
//!
//! The parser hands its segments to [`build_pattern`], so a pattern built
//! from text and one built with [`RoutePatternBuilder`] go through the same
//! checks:
//!
//! ```text
//! "{id=7}" + defaults{id: 7}      ok (same default)
//! "{id=7}" + defaults{id: 8}      DefaultSpecifiedInlineAndExplicitly
//! "{id?}"  + defaults{id: 7}      OptionalCannotHaveDefault
//! "{a}"    + required{b: x}       UnmatchedRequiredValue (no parameter b, no default b=x)
//! ```
//!
//! [`combine`] appends one pattern to another, e.g. `api/` + `/{id}` gives
//! `api/{id}`.
//!
//! [`RoutePattern`]: crate::pattern::RoutePattern

mod build;
mod combine;
#[cfg(test)]
mod tests;

pub use build::{build_pattern, RoutePatternBuilder};
pub use combine::{combine, combine_with};
