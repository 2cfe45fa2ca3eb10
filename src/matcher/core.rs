use std::sync::Arc;

use smallvec::SmallVec;
use tracing::trace;

use super::complex::match_complex_segment;
use crate::pattern::{eq_ignore_case, NameMap, Part, RoutePattern, RouteValues};

/// A `/`-delimited piece of a request path and its byte offset in the path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct PathToken<'a> {
    pub(crate) offset: usize,
    pub(crate) text: &'a str,
}

/// Tokenized request path. Most paths have only a few segments.
pub(crate) type PathTokens<'a> = SmallVec<[PathToken<'a>; 8]>;

/// Split a request path into segments.
///
/// `""` and `"/"` have no segments. One leading and one trailing `/` are
/// skipped; every other `/` delimits, so `"/a/"` is `["a"]` while `"/a//"`
/// and `"/a//b"` contain empty segments.
pub(crate) fn tokenize(path: &str) -> PathTokens<'_> {
    let mut tokens = PathTokens::new();
    let (start, rest) = match path.strip_prefix('/') {
        Some(rest) => (1, rest),
        None => (0, path),
    };
    let rest = match rest.strip_suffix('/') {
        Some(trimmed) if !trimmed.is_empty() => trimmed,
        _ => rest,
    };
    if rest.is_empty() {
        return tokens;
    }
    let mut offset = start;
    for text in rest.split('/') {
        tokens.push(PathToken { offset, text });
        offset += text.len() + 1;
    }
    tokens
}

/// Matches request paths against one pattern and a fixed set of defaults.
///
/// Defaults for simple parameter segments are looked up once at
/// construction, so a matcher is cheap to reuse across requests and across
/// threads.
///
/// # Example
///
/// ```
/// use routepat::{parse, RoutePatternMatcher};
///
/// let pattern = parse("{controller=Home}/{action=Index}/{id?}").unwrap();
/// let matcher = RoutePatternMatcher::new(&pattern, pattern.defaults().clone());
///
/// let values = matcher.try_match("/Store/Edit/17").unwrap();
/// assert_eq!(values.value("controller"), Some("Store"));
/// assert_eq!(values.value("id"), Some("17"));
///
/// let values = matcher.try_match("/").unwrap();
/// assert_eq!(values.value("action"), Some("Index"));
/// assert!(!values.contains_key("id"));
/// ```
#[derive(Debug, Clone)]
pub struct RoutePatternMatcher {
    pattern: RoutePattern,
    defaults: NameMap<String>,
    /// Default of each simple parameter segment, `None` elsewhere
    segment_defaults: Arc<[Option<String>]>,
}

impl RoutePatternMatcher {
    #[must_use]
    pub fn new(pattern: &RoutePattern, defaults: NameMap<String>) -> Self {
        let segment_defaults = pattern
            .segments()
            .iter()
            .map(|segment| {
                segment
                    .simple_parameter()
                    .and_then(|p| defaults.get(p.name()).cloned())
            })
            .collect();
        Self {
            pattern: pattern.clone(),
            defaults,
            segment_defaults,
        }
    }

    #[must_use]
    pub fn pattern(&self) -> &RoutePattern {
        &self.pattern
    }

    #[must_use]
    pub fn defaults(&self) -> &NameMap<String> {
        &self.defaults
    }

    /// Match `path`, returning the captured and default values.
    #[must_use]
    pub fn try_match(&self, path: &str) -> Option<RouteValues> {
        let mut values = RouteValues::new();
        self.try_match_into(path, &mut values).then_some(values)
    }

    /// Match `path`, adding values to an existing map.
    ///
    /// Captured values and the defaults of missing trailing segments
    /// overwrite existing entries; other defaults only fill gaps.
    /// `values` is left untouched when the path does not match.
    pub fn try_match_into(&self, path: &str, values: &mut RouteValues) -> bool {
        let tokens = tokenize(path);
        if !self.precheck(&tokens) {
            trace!(pattern = ?self.pattern.raw_text(), path = %path, "rejected on segment shape");
            return false;
        }

        let mut output = values.clone();
        if !self.capture(path, &tokens, &mut output) {
            trace!(pattern = ?self.pattern.raw_text(), path = %path, "rejected on complex segment");
            return false;
        }
        trace!(pattern = ?self.pattern.raw_text(), path = %path, values = ?output, "path matched");
        *values = output;
        true
    }

    /// First pass: reject on segment count and simple literals without
    /// allocating.
    fn precheck(&self, tokens: &[PathToken<'_>]) -> bool {
        let segments = self.pattern.segments();
        for (i, token) in tokens.iter().enumerate() {
            if token.text.is_empty() {
                return false;
            }
            let Some(segment) = segments.get(i) else {
                return false;
            };
            if !segment.is_simple() {
                continue;
            }
            match &segment.parts()[0] {
                Part::Parameter(p) if p.is_catch_all() => return true,
                Part::Literal(text) | Part::Separator(text) => {
                    if !eq_ignore_case(text, token.text) {
                        return false;
                    }
                }
                Part::Parameter(_) => {}
            }
        }

        for (i, segment) in segments.iter().enumerate().skip(tokens.len()) {
            let Some(parameter) = segment.simple_parameter() else {
                return false;
            };
            if parameter.is_catch_all() {
                break;
            }
            if self.segment_defaults[i].is_none() && !parameter.is_optional() {
                return false;
            }
        }
        true
    }

    /// Second pass: write captured values.
    fn capture(&self, path: &str, tokens: &[PathToken<'_>], values: &mut RouteValues) -> bool {
        let segments = self.pattern.segments();
        for (i, segment) in segments.iter().enumerate().take(tokens.len()) {
            let token = tokens[i];
            if let Some(parameter) = segment.simple_parameter() {
                let name = Arc::clone(&parameter.name);
                if parameter.is_catch_all() {
                    let rest = &path[token.offset..];
                    let value = if rest.is_empty() {
                        self.segment_defaults[i].clone()
                    } else {
                        Some(rest.to_string())
                    };
                    values.insert(name, value);
                    break;
                }
                values.insert(name, Some(token.text.to_string()));
            } else if !segment.is_simple() && !match_complex_segment(segment, token.text, values) {
                return false;
            }
        }

        for (i, segment) in segments.iter().enumerate().skip(tokens.len()) {
            let Some(parameter) = segment.simple_parameter() else {
                continue;
            };
            let default = &self.segment_defaults[i];
            if !parameter.is_catch_all() && default.is_none() {
                continue;
            }
            match default {
                Some(value) => {
                    values.insert(Arc::clone(&parameter.name), Some(value.clone()));
                }
                None => {
                    values.try_insert(Arc::clone(&parameter.name), None);
                }
            }
        }

        for (name, value) in self.defaults.iter() {
            values.try_insert(name, Some(value.clone()));
        }
        true
    }
}

/// Match `path` against `pattern` with the given effective defaults.
///
/// Builds a throwaway [`RoutePatternMatcher`]; keep a matcher around when
/// matching many paths against the same pattern.
#[must_use]
pub fn try_match(
    pattern: &RoutePattern,
    defaults: &NameMap<String>,
    path: &str,
) -> Option<RouteValues> {
    RoutePatternMatcher::new(pattern, defaults.clone()).try_match(path)
}
