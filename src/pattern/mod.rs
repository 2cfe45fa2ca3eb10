//! # Pattern Module
//!
//! The immutable data model every other component reads: parts, path
//! segments and the [`RoutePattern`] root value, plus the value types that
//! flow through matching and substitution.
//!
//! ## Structure
//!
//! ```text
//! RoutePattern
//! ├── raw_text              "{controller=Home}/{action=Index}/{id?}"
//! ├── segments[]            PathSegment { parts[] }
//! │   └── Part              Literal | Separator | Parameter
//! ├── defaults              controller=Home, action=Index
//! ├── policies              name -> [PolicyReference]
//! ├── required_values       name -> Value | Any | Null
//! └── precedence            inbound / outbound scalars
//! ```
//!
//! Patterns are never mutated after construction. Derived patterns (combine,
//! required-value substitution) share the untouched segments and maps.

mod core;
mod error;
mod part;
mod policy;
mod precedence;
mod values;

pub use self::core::{PartSummary, PatternSummary, PolicyMap, RoutePattern};
pub use error::{PatternErrorKind, RoutePatternError};
pub use part::{ParameterKind, ParameterPart, Part, PathSegment};
pub(crate) use part::is_valid_parameter_name;
pub use policy::{NoPolicies, ParameterPolicy, PolicyReference, PolicyResolver};
pub use precedence::{PrecedenceScorer, SegmentDigits};
pub(crate) use values::chars_eq_ignore_case;
pub use values::{
    eq_ignore_case, values_equal, NameMap, RequiredValue, RequiredValues, RouteValues,
    MAX_INLINE_ENTRIES,
};
