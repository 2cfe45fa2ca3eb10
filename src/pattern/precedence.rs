//! Precedence scalars attached to every pattern.
//!
//! Route selection outside this crate uses them to rank competing patterns.
//! The core only computes them at construction and hands them back.

use super::part::{Part, PathSegment};

/// Computes the inbound (matching) and outbound (generation) precedence of a
/// list of segments.
pub trait PrecedenceScorer: Send + Sync {
    fn inbound(&self, segments: &[PathSegment]) -> f64;
    fn outbound(&self, segments: &[PathSegment]) -> f64;
}

/// One decimal digit per segment, the first segment most significant.
///
/// Inbound, lower sorts first:
/// 1 literal, 2 complex or constrained parameter, 3 parameter,
/// 4 constrained catch-all, 5 catch-all.
///
/// Outbound, higher sorts first:
/// 5 literal, 4 complex or constrained parameter, 3 parameter,
/// 2 constrained catch-all, 1 catch-all.
#[derive(Debug, Clone, Copy, Default)]
pub struct SegmentDigits;

impl SegmentDigits {
    fn sum(segments: &[PathSegment], digit: impl Fn(&PathSegment) -> u8) -> f64 {
        segments
            .iter()
            .enumerate()
            .map(|(i, segment)| f64::from(digit(segment)) / 10f64.powi(i as i32))
            .sum()
    }

    fn inbound_digit(segment: &PathSegment) -> u8 {
        if !segment.is_simple() {
            return 2;
        }
        match &segment.parts()[0] {
            Part::Literal(_) => 1,
            Part::Parameter(p) => {
                let digit = if p.is_catch_all() { 5 } else { 3 };
                if p.policies().is_empty() {
                    digit
                } else {
                    digit - 1
                }
            }
            Part::Separator(_) => 0,
        }
    }

    fn outbound_digit(segment: &PathSegment) -> u8 {
        if !segment.is_simple() {
            return 4;
        }
        match &segment.parts()[0] {
            Part::Literal(_) => 5,
            Part::Parameter(p) => {
                let digit = if p.is_catch_all() { 1 } else { 3 };
                if p.policies().is_empty() {
                    digit
                } else {
                    digit + 1
                }
            }
            Part::Separator(_) => 0,
        }
    }
}

impl PrecedenceScorer for SegmentDigits {
    fn inbound(&self, segments: &[PathSegment]) -> f64 {
        Self::sum(segments, Self::inbound_digit)
    }

    fn outbound(&self, segments: &[PathSegment]) -> f64 {
        Self::sum(segments, Self::outbound_digit)
    }
}
