//! # Transform Module
//!
//! Required-value substitution: deriving a narrower pattern from a general
//! one by committing to fixed route values.
//!
//! ```text
//! {controller=Home}/{action=Index}
//!   + { controller: "Store" }   -> controller default removed, controller=Store required
//!   + { area: "" }              -> unchanged segments, area="" required
//!   + { controller: "" }        -> None (a parameter cannot be required empty)
//!
//! Admin/{action} defaults { area: "Admin" }
//!   + { area: "Admin" }         -> ok (matches the non-parameter default)
//!   + { area: "Blog" }          -> None
//! ```
//!
//! Failure is an ordinary outcome reported as `None`, never an error.

mod transformer;

pub use transformer::{substitute_required_values, RequiredValueTransformer};
