//! Route value containers shared by the factory, matcher and transformer.

use serde::ser::{Serialize, SerializeMap, Serializer};
use smallvec::SmallVec;
use std::fmt;
use std::sync::Arc;

/// Maximum number of entries stored inline before a [`NameMap`] spills to the heap.
///
/// Most templates carry a handful of parameters and defaults
/// (e.g. `{area}/{controller=Home}/{action=Index}/{id?}`).
pub const MAX_INLINE_ENTRIES: usize = 8;

/// Small ordered map keyed by route value names, compared case-insensitively.
///
/// Entries keep insertion order so rendered output is deterministic.
/// Inserting an existing key (in any casing) replaces the value in place and
/// keeps the original key spelling.
#[derive(Clone, PartialEq)]
pub struct NameMap<V> {
    entries: SmallVec<[(Arc<str>, V); MAX_INLINE_ENTRIES]>,
}

/// Values produced by a successful match. `None` is a null value, which only a
/// catch-all without a default can produce.
pub type RouteValues = NameMap<Option<String>>;

/// Required route values supplied to a pattern or to substitution.
pub type RequiredValues = NameMap<RequiredValue>;

impl<V> NameMap<V> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: SmallVec::new(),
        }
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn position(&self, key: &str) -> Option<usize> {
        self.entries
            .iter()
            .position(|(k, _)| eq_ignore_case(k, key))
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&V> {
        self.position(key).map(|i| &self.entries[i].1)
    }

    #[must_use]
    pub fn get_mut(&mut self, key: &str) -> Option<&mut V> {
        self.position(key).map(move |i| &mut self.entries[i].1)
    }

    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.position(key).is_some()
    }

    /// Insert or replace, returning the previous value for the key.
    pub fn insert(&mut self, key: impl Into<Arc<str>>, value: V) -> Option<V> {
        let key = key.into();
        match self.position(&key) {
            Some(i) => Some(std::mem::replace(&mut self.entries[i].1, value)),
            None => {
                self.entries.push((key, value));
                None
            }
        }
    }

    /// Insert only when the key is absent. Returns `true` if the value was added.
    pub fn try_insert(&mut self, key: impl Into<Arc<str>>, value: V) -> bool {
        let key = key.into();
        if self.contains_key(&key) {
            return false;
        }
        self.entries.push((key, value));
        true
    }

    pub fn remove(&mut self, key: &str) -> Option<V> {
        self.position(key).map(|i| self.entries.remove(i).1)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &V)> {
        self.entries.iter().map(|(k, v)| (k.as_ref(), v))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_ref())
    }
}

impl<V> Default for NameMap<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: fmt::Debug> fmt::Debug for NameMap<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<K: Into<Arc<str>>, V> FromIterator<(K, V)> for NameMap<V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = NameMap::new();
        for (k, v) in iter {
            map.insert(k, v);
        }
        map
    }
}

impl<K: Into<Arc<str>>, V> Extend<(K, V)> for NameMap<V> {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (k, v) in iter {
            self.insert(k, v);
        }
    }
}

impl<V: Serialize> Serialize for NameMap<V> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for (k, v) in self.iter() {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

impl RouteValues {
    /// Value text for `key`, flattening a stored null to `None`.
    #[must_use]
    pub fn value(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(|v| v.as_deref())
    }
}

/// A value a derived pattern commits to for one route value name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequiredValue {
    /// A concrete value such as `"Admin"`. An empty string is null-ish.
    Value(String),
    /// Matches any non-empty value; only meaningful for parameter names.
    Any,
    /// Explicit absence.
    Null,
}

impl RequiredValue {
    /// Text used for `Any` in route files and JSON output.
    pub const ANY_TEXT: &'static str = "*any*";

    #[must_use]
    pub fn value(text: impl Into<String>) -> Self {
        RequiredValue::Value(text.into())
    }

    /// `Null` and the empty string both mean "no value".
    #[must_use]
    pub fn is_nullish(&self) -> bool {
        match self {
            RequiredValue::Null => true,
            RequiredValue::Value(v) => v.is_empty(),
            RequiredValue::Any => false,
        }
    }

    #[must_use]
    pub fn is_any(&self) -> bool {
        matches!(self, RequiredValue::Any)
    }

    /// Concrete text, if any.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            RequiredValue::Value(v) => Some(v),
            _ => None,
        }
    }

    /// Route-value equality against an optional default.
    #[must_use]
    pub fn equals_value(&self, other: Option<&str>) -> bool {
        match self {
            RequiredValue::Any => false,
            RequiredValue::Null => values_equal(None, other),
            RequiredValue::Value(v) => values_equal(Some(v), other),
        }
    }
}

impl fmt::Display for RequiredValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RequiredValue::Value(v) => f.write_str(v),
            RequiredValue::Any => f.write_str(Self::ANY_TEXT),
            RequiredValue::Null => f.write_str("null"),
        }
    }
}

impl Serialize for RequiredValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            RequiredValue::Value(v) => serializer.serialize_str(v),
            RequiredValue::Any => serializer.serialize_str(Self::ANY_TEXT),
            RequiredValue::Null => serializer.serialize_none(),
        }
    }
}

impl From<&str> for RequiredValue {
    fn from(value: &str) -> Self {
        RequiredValue::Value(value.to_string())
    }
}

impl From<String> for RequiredValue {
    fn from(value: String) -> Self {
        RequiredValue::Value(value)
    }
}

/// Route-value equality: null-ish values are equal to each other, text
/// compares ignoring case.
#[must_use]
pub fn values_equal(a: Option<&str>, b: Option<&str>) -> bool {
    let a = a.unwrap_or("");
    let b = b.unwrap_or("");
    eq_ignore_case(a, b)
}

/// Case-insensitive comparison used for names, literals and values.
#[must_use]
pub fn eq_ignore_case(a: &str, b: &str) -> bool {
    if a.is_ascii() && b.is_ascii() {
        return a.eq_ignore_ascii_case(b);
    }
    a.chars()
        .flat_map(char::to_lowercase)
        .eq(b.chars().flat_map(char::to_lowercase))
}

#[inline]
pub(crate) fn chars_eq_ignore_case(a: char, b: char) -> bool {
    a == b || a.to_lowercase().eq(b.to_lowercase())
}
