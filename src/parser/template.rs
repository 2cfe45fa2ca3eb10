use std::sync::Arc;

use tracing::debug;

use super::cursor::Cursor;
use super::parameter::parse_parameter;
use crate::pattern::{
    eq_ignore_case, is_valid_parameter_name, Part, PathSegment, PatternErrorKind,
    RoutePatternError,
};

/// Parse template text into validated path segments.
///
/// A single leading `/` or `~/` is ignored. A trailing `/` is accepted and
/// produces no extra segment.
pub(crate) fn parse_segments(template: &str) -> Result<Vec<PathSegment>, RoutePatternError> {
    let result = trim_prefix(template).and_then(|text| TemplateParser::new(text).run());
    result.map_err(|kind| {
        debug!(template = %template, error = %kind, "route template rejected");
        RoutePatternError::new(template, kind)
    })
}

fn trim_prefix(template: &str) -> Result<&str, PatternErrorKind> {
    if let Some(rest) = template.strip_prefix("~/") {
        Ok(rest)
    } else if template.starts_with('~') {
        Err(PatternErrorKind::InvalidLeadingTilde)
    } else {
        Ok(template.strip_prefix('/').unwrap_or(template))
    }
}

struct TemplateParser<'a> {
    cursor: Cursor<'a>,
    /// Parameter names seen so far, compared ignoring case
    names: Vec<Arc<str>>,
}

impl<'a> TemplateParser<'a> {
    fn new(text: &'a str) -> Self {
        Self {
            cursor: Cursor::new(text),
            names: Vec::new(),
        }
    }

    fn run(mut self) -> Result<Vec<PathSegment>, PatternErrorKind> {
        let mut segments = Vec::new();
        if self.cursor.at_end() {
            return Ok(segments);
        }
        loop {
            if self.cursor.current() == Some(b'/') {
                return Err(PatternErrorKind::ConsecutiveSeparators);
            }
            segments.push(self.parse_segment()?);
            // Step over the '/' that ended the segment.
            if !self.cursor.advance() {
                break;
            }
        }
        validate_catch_all_position(&segments)?;
        Ok(segments)
    }

    fn parse_segment(&mut self) -> Result<PathSegment, PatternErrorKind> {
        let mut parts = Vec::new();
        loop {
            if self.cursor.current() == Some(b'{') {
                if !self.cursor.advance() {
                    return Err(PatternErrorKind::MismatchedParameter);
                }
                let escaped = self.cursor.current() == Some(b'{');
                self.cursor.back();
                if escaped {
                    parts.push(self.parse_literal()?);
                } else {
                    parts.push(self.parse_parameter()?);
                }
            } else {
                parts.push(self.parse_literal()?);
            }

            if self.cursor.current() == Some(b'/') || self.cursor.at_end() {
                break;
            }
        }
        validate_segment(&mut parts)?;
        PathSegment::new(parts).ok_or(PatternErrorKind::ConsecutiveSeparators)
    }

    /// Cursor is on the opening `{`. Leaves the cursor just past the closing `}`.
    fn parse_parameter(&mut self) -> Result<Part, PatternErrorKind> {
        self.cursor.mark();
        self.cursor.advance();
        loop {
            match self.cursor.current() {
                Some(b'{') => {
                    if !self.cursor.advance() {
                        return Err(PatternErrorKind::MismatchedParameter);
                    }
                    if self.cursor.current() != Some(b'{') {
                        return Err(PatternErrorKind::UnescapedBrace);
                    }
                }
                Some(b'}') => {
                    // '}}' is an escaped brace, anything else closes the parameter
                    if !self.cursor.advance() || self.cursor.current() != Some(b'}') {
                        break;
                    }
                }
                _ => {}
            }
            if !self.cursor.advance() {
                return Err(PatternErrorKind::MismatchedParameter);
            }
        }

        let raw = self.cursor.capture();
        if raw == "{}" {
            return Err(PatternErrorKind::InvalidParameterName(String::new()));
        }
        let decoded = unescape(&raw[1..raw.len() - 1]);
        let parameter = parse_parameter(&decoded);

        if decoded.starts_with('*') && decoded.ends_with('?') {
            return Err(PatternErrorKind::CatchAllCannotBeOptional);
        }
        if parameter.is_optional() && parameter.default_value().is_some() {
            return Err(PatternErrorKind::OptionalCannotHaveDefault);
        }
        self.register_name(&parameter.name)?;
        Ok(Part::Parameter(parameter))
    }

    /// Leaves the cursor on the `/` or `{` that ended the literal, or at the end.
    fn parse_literal(&mut self) -> Result<Part, PatternErrorKind> {
        self.cursor.mark();
        loop {
            match self.cursor.current() {
                Some(b'/') => break,
                Some(b'{') => {
                    if !self.cursor.advance() {
                        return Err(PatternErrorKind::MismatchedParameter);
                    }
                    if self.cursor.current() != Some(b'{') {
                        self.cursor.back();
                        break;
                    }
                }
                Some(b'}') => {
                    if !self.cursor.advance() || self.cursor.current() != Some(b'}') {
                        return Err(PatternErrorKind::MismatchedParameter);
                    }
                }
                _ => {}
            }
            if !self.cursor.advance() {
                break;
            }
        }

        let decoded = unescape(self.cursor.capture());
        if decoded.contains('?') {
            return Err(PatternErrorKind::InvalidLiteral(decoded));
        }
        Ok(Part::Literal(decoded.into()))
    }

    fn register_name(&mut self, name: &Arc<str>) -> Result<(), PatternErrorKind> {
        if !is_valid_parameter_name(name) {
            return Err(PatternErrorKind::InvalidParameterName(name.to_string()));
        }
        if self.names.iter().any(|seen| eq_ignore_case(seen, name)) {
            return Err(PatternErrorKind::RepeatedParameter(name.to_string()));
        }
        self.names.push(Arc::clone(name));
        Ok(())
    }
}

fn unescape(text: &str) -> String {
    text.replace("}}", "}").replace("{{", "{")
}

/// Segment-level rules for multi-part segments. Reclassifies the `.` before
/// a trailing optional parameter as a separator.
fn validate_segment(parts: &mut [Part]) -> Result<(), PatternErrorKind> {
    let count = parts.len();
    if count > 1 && parts.iter().any(|p| p.as_parameter().is_some_and(|p| p.is_catch_all())) {
        return Err(PatternErrorKind::CatchAllInMultiPartSegment);
    }

    if count > 1 {
        let optional = parts.iter().enumerate().find_map(|(i, part)| {
            part.as_parameter()
                .filter(|p| p.is_optional())
                .map(|p| (i, p.name().to_string()))
        });
        if let Some((index, parameter)) = optional {
            if index == count - 1 {
                let previous = &parts[index - 1];
                if matches!(previous, Part::Literal(text) if text.as_ref() == ".") {
                    parts[index - 1] = Part::Separator(Arc::from("."));
                } else if !matches!(previous, Part::Separator(_)) {
                    return Err(PatternErrorKind::OptionalPrecededByInvalid {
                        segment: render(parts),
                        parameter,
                        previous: previous.to_string(),
                    });
                }
            } else {
                return Err(PatternErrorKind::OptionalMustBeLast {
                    segment: render(parts),
                    parameter,
                    next: parts[index + 1].to_string(),
                });
            }
        }
    }

    if parts
        .windows(2)
        .any(|pair| pair[0].is_parameter() && pair[1].is_parameter())
    {
        return Err(PatternErrorKind::ConsecutiveParameters);
    }
    Ok(())
}

fn validate_catch_all_position(segments: &[PathSegment]) -> Result<(), PatternErrorKind> {
    let last_segment = segments.len().saturating_sub(1);
    for (s, segment) in segments.iter().enumerate() {
        let last_part = segment.parts().len() - 1;
        for (p, part) in segment.parts().iter().enumerate() {
            let catch_all = part.as_parameter().is_some_and(|p| p.is_catch_all());
            if catch_all && (s != last_segment || p != last_part) {
                return Err(PatternErrorKind::CatchAllMustBeLast);
            }
        }
    }
    Ok(())
}

fn render(parts: &[Part]) -> String {
    parts.iter().map(ToString::to_string).collect()
}
