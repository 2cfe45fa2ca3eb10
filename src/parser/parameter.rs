//! Parser for the text inside a `{...}` parameter.
//!
//! ```text
//! [*|**] name (:constraint)* [=default] [?]
//! ```
//!
//! Braces are already stripped and `{{`/`}}` already unescaped. The parser
//! never fails: names are validated by the template parser afterwards.

use std::sync::Arc;

use crate::pattern::{ParameterKind, ParameterPart, PolicyReference};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScanState {
    Start,
    ParsingName,
    InsideParenthesis,
    End,
}

/// Parse the inside of a parameter into a [`ParameterPart`].
pub(crate) fn parse_parameter(text: &str) -> ParameterPart {
    if text.is_empty() {
        return ParameterPart::from_parts(
            Arc::from(""),
            None,
            ParameterKind::Standard,
            Arc::from(Vec::new()),
            true,
        );
    }

    let bytes = text.as_bytes();
    let mut start = 0;
    let mut end = bytes.len();
    let mut kind = ParameterKind::Standard;
    let mut encode_slashes = true;

    if text.starts_with("**") {
        kind = ParameterKind::CatchAll;
        encode_slashes = false;
        start = 2;
    } else if bytes[0] == b'*' {
        kind = ParameterKind::CatchAll;
        start = 1;
    }

    if end > start && bytes[end - 1] == b'?' {
        kind = ParameterKind::Optional;
        end -= 1;
    }

    // A leading ':' or '=' belongs to the name.
    let mut name_end = start;
    while name_end < end {
        let c = bytes[name_end];
        if (c == b':' || c == b'=') && name_end != start {
            break;
        }
        name_end += 1;
    }
    let name = &text[start..name_end];

    let (cursor, policies) = ConstraintScanner::new(text, end).scan(name_end);

    let default = (cursor < end && bytes[cursor] == b'=').then(|| text[cursor + 1..end].to_string());

    ParameterPart::from_parts(
        Arc::from(name),
        default,
        kind,
        policies.into(),
        encode_slashes,
    )
}

/// Splits `:constraint` entries out of the text following the name.
///
/// A constraint is a bare identifier ended by `:`, `=` or the end of the
/// parameter, or an identifier with a parenthesized argument. Inside the
/// parenthesis `:` and `=` are content as long as a `)` follows somewhere
/// later; a `)` only closes the argument when it is last or followed by `:`
/// or `=`.
struct ConstraintScanner<'a> {
    text: &'a str,
    end: usize,
    state: ScanState,
    constraint_start: usize,
    policies: Vec<PolicyReference>,
}

impl<'a> ConstraintScanner<'a> {
    fn new(text: &'a str, end: usize) -> Self {
        Self {
            text,
            end,
            state: ScanState::Start,
            constraint_start: 0,
            policies: Vec::new(),
        }
    }

    #[inline]
    fn at(&self, index: usize) -> Option<u8> {
        if index < self.end {
            Some(self.text.as_bytes()[index])
        } else {
            None
        }
    }

    fn push(&mut self, from: usize, to: usize) {
        self.policies
            .push(PolicyReference::text(&self.text[from..to]));
    }

    fn push_nonempty(&mut self, from: usize, to: usize) {
        if to > from {
            self.push(from, to);
        }
    }

    /// Scan from `cursor`. Returns the index where scanning stopped (on the
    /// `=` that starts a default, or past the end) and the constraints found.
    fn scan(mut self, mut cursor: usize) -> (usize, Vec<PolicyReference>) {
        self.constraint_start = cursor;
        while self.state != ScanState::End {
            let current = self.at(cursor);
            match self.state {
                ScanState::Start => match current {
                    None => self.state = ScanState::End,
                    Some(b':') => {
                        self.state = ScanState::ParsingName;
                        self.constraint_start = cursor + 1;
                    }
                    Some(b'(') => self.state = ScanState::InsideParenthesis,
                    Some(b'=') => return (cursor, self.policies),
                    Some(_) => {}
                },
                ScanState::InsideParenthesis => match current {
                    None => {
                        self.state = ScanState::End;
                        self.push(self.constraint_start, cursor);
                    }
                    Some(b')') => match self.at(cursor + 1) {
                        None => {
                            self.state = ScanState::End;
                            self.push(self.constraint_start, cursor + 1);
                        }
                        Some(b':') => {
                            self.state = ScanState::Start;
                            self.push(self.constraint_start, cursor + 1);
                            self.constraint_start = cursor + 1;
                        }
                        Some(b'=') => {
                            self.state = ScanState::End;
                            self.push(self.constraint_start, cursor + 1);
                        }
                        Some(_) => {}
                    },
                    Some(delimiter @ (b':' | b'=')) => {
                        match self.text[cursor + 1..].find(')') {
                            Some(offset) => {
                                // Delimiter is argument content; resume at the ')'.
                                cursor += 1 + offset;
                                continue;
                            }
                            None => {
                                self.push(self.constraint_start, cursor);
                                if delimiter == b'=' {
                                    return (cursor, self.policies);
                                }
                                self.state = ScanState::ParsingName;
                                self.constraint_start = cursor + 1;
                            }
                        }
                    }
                    Some(_) => {}
                },
                ScanState::ParsingName => match current {
                    None => {
                        self.state = ScanState::End;
                        self.push_nonempty(self.constraint_start, cursor);
                    }
                    Some(b':') => {
                        self.push_nonempty(self.constraint_start, cursor);
                        self.constraint_start = cursor + 1;
                    }
                    Some(b'(') => self.state = ScanState::InsideParenthesis,
                    Some(b'=') => {
                        self.push_nonempty(self.constraint_start, cursor);
                        return (cursor, self.policies);
                    }
                    Some(_) => {}
                },
                ScanState::End => {}
            }
            cursor += 1;
        }
        (cursor, self.policies)
    }
}
