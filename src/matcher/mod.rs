//! # Matcher Module
//!
//! Matches request paths against a [`RoutePattern`], extracting values.
//!
//! ## Algorithm
//!
//! Matching runs in two passes over the `/`-delimited request segments:
//!
//! 1. **Precheck** - rejects empty request segments, extra request segments,
//!    mismatched simple literals, and missing trailing segments whose
//!    parameter is neither optional nor defaulted. A simple catch-all ends
//!    the pass early.
//! 2. **Capture** - writes simple parameter values, hands multi-part
//!    segments to the right-to-left complex matcher, fills defaulted
//!    trailing parameters, then adds every remaining default.
//!
//! ```text
//! {controller=Home}/{action=Index}/{id?}
//!   "/"               -> controller=Home  action=Index
//!   "/Store/Edit/17"  -> controller=Store action=Edit id=17
//!
//! {p1}/{p2}.{p3?}
//!   "/one/two.three"  -> p1=one p2=two p3=three
//!   "/one/two"        -> p1=one p2=two
//! ```
//!
//! Literals compare ignoring case. A catch-all captures the raw remainder
//! of the path, slashes included.
//!
//! [`RoutePattern`]: crate::pattern::RoutePattern

mod complex;
mod core;

pub use self::core::{try_match, RoutePatternMatcher};
