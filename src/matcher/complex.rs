//! Right-to-left matching of segments made of several parts, such as
//! `{name}.{ext?}` or `item-{id}-{slug}`.

use std::sync::Arc;

use smallvec::SmallVec;

use crate::pattern::{chars_eq_ignore_case, Part, PathSegment, RouteValues};

/// Match one request segment against a multi-part pattern segment, writing
/// captured values into `values` only on success.
///
/// A trailing `Separator` + optional parameter pair is tried first with the
/// optional bound. If that fails and the text does not end with the
/// separator, the pair is dropped and the rest of the segment retried.
pub(crate) fn match_complex_segment(
    segment: &PathSegment,
    text: &str,
    values: &mut RouteValues,
) -> bool {
    let parts = segment.parts();
    let last = parts.len() - 1;

    let optional_suffix = last >= 1
        && parts[last].as_parameter().is_some_and(|p| p.is_optional())
        && matches!(parts[last - 1], Part::Separator(_));

    if !optional_suffix {
        return match_from(parts, last, text, values);
    }
    if match_from(parts, last, text, values) {
        return true;
    }
    let separator = parts[last - 1].text().unwrap_or("");
    if ends_with_ignore_case(text, separator) {
        return false;
    }
    last >= 2 && match_from(parts, last - 2, text, values)
}

/// Scan `parts[..=last_used]` from right to left.
///
/// Literals are located by their last occurrence in the unconsumed prefix.
/// A parameter waiting for a value receives the text between the literal
/// to its left and the boundary found before it.
fn match_from(parts: &[Part], last_used: usize, text: &str, values: &mut RouteValues) -> bool {
    let mut captured: SmallVec<[(Arc<str>, String); 4]> = SmallVec::new();
    let mut last_index = text.len();
    let mut pending: Option<&Arc<str>> = None;
    // Start offset and matched length of the literal found most recently
    let mut last_literal: Option<usize> = None;

    for index in (0..=last_used).rev() {
        let part = &parts[index];
        let mut new_last_index = last_index;

        match part {
            Part::Parameter(parameter) => pending = Some(&parameter.name),
            Part::Literal(literal) | Part::Separator(literal) => {
                let window_end = if pending.is_some() {
                    previous_boundary(text, last_index)
                } else {
                    last_index
                };
                if window_end == 0 {
                    return false;
                }
                let Some((found, matched_len)) =
                    last_index_of_ignore_case(&text[..window_end], literal)
                else {
                    return false;
                };
                // The rightmost literal must end exactly at the end of the text.
                if index == parts.len() - 1 && found + matched_len != text.len() {
                    return false;
                }
                last_literal = Some(matched_len);
                new_last_index = found;
            }
        }

        if let Some(name) = pending {
            if (last_literal.is_some() && !part.is_parameter()) || index == 0 {
                let range = match last_literal {
                    Some(_) if index == 0 && part.is_parameter() => 0..last_index,
                    Some(matched_len) => new_last_index + matched_len..last_index,
                    None => 0..last_index,
                };
                let value = &text[range];
                if value.is_empty() {
                    return false;
                }
                captured.push((Arc::clone(name), value.to_string()));
                pending = None;
                last_literal = None;
            }
        }

        last_index = new_last_index;
    }

    // A leading literal has to consume the text up to the left edge.
    if last_index == 0 || parts[0].is_parameter() {
        for (name, value) in captured {
            values.insert(name, Some(value));
        }
        true
    } else {
        false
    }
}

fn previous_boundary(text: &str, index: usize) -> usize {
    text[..index]
        .chars()
        .next_back()
        .map_or(0, |c| index - c.len_utf8())
}

/// Last occurrence of `needle` in `haystack` ignoring case, as
/// `(byte offset, matched byte length)`.
pub(crate) fn last_index_of_ignore_case(haystack: &str, needle: &str) -> Option<(usize, usize)> {
    if haystack.is_ascii() && needle.is_ascii() {
        let (h, n) = (haystack.as_bytes(), needle.as_bytes());
        if n.len() > h.len() {
            return None;
        }
        return (0..=h.len() - n.len())
            .rev()
            .find(|&i| h[i..i + n.len()].eq_ignore_ascii_case(n))
            .map(|i| (i, n.len()));
    }

    for (start, _) in haystack.char_indices().rev() {
        let mut rest = haystack[start..].chars();
        let mut matched_len = 0;
        let matched = needle.chars().all(|expected| match rest.next() {
            Some(c) if chars_eq_ignore_case(c, expected) => {
                matched_len += c.len_utf8();
                true
            }
            _ => false,
        });
        if matched {
            return Some((start, matched_len));
        }
    }
    None
}

fn ends_with_ignore_case(text: &str, suffix: &str) -> bool {
    let mut chars = text.chars().rev();
    suffix
        .chars()
        .rev()
        .all(|expected| chars.next().is_some_and(|c| chars_eq_ignore_case(c, expected)))
}
