//! Interval matching over integers and dotted version strings.
//!
//! Interval expressions look like mathematical ranges:
//!
//! - `[1,5]` closed on both sides
//! - `(1,5]` open below, closed above
//! - `[1.0,)` no upper bound
//! - `(,18.6.0.0]` no lower bound
//! - `['14.0.7.300','14.0.7.303']` quoted bounds
//!
//! Bounds take the kind of the value being tested. Bound text that does not
//! parse as a number is read as `0`, matching what existing rule data expects.
//!
//! ```
//! use uarule::{match_range, Comparable};
//!
//! assert!(match_range("[1,5]", &Comparable::Integer(3)));
//! assert!(match_range("(,18.6.0.0]", &Comparable::from("18.1.0")));
//! ```

use std::cmp::Ordering;
use std::fmt;

/// A value that can be tested against an interval.
///
/// Equality and ordering follow [`compare`](Comparable::compare), not the
/// stored text: `Integer(3) == Version("3.0")` and `Version("1.x") ==
/// Version("1.0")`. Do not derive `Hash` for this type; equal values may
/// have different representations.
#[derive(Debug, Clone)]
pub enum Comparable {
    /// Plain integer, compared numerically
    Integer(i64),
    /// Dotted version string such as `14.0.7.302`, compared component-wise
    Version(String),
}

impl Comparable {
    /// Compare two values.
    ///
    /// Mixed kinds compare as versions, the integer acting as a
    /// single-component version.
    pub fn compare(&self, other: &Comparable) -> Ordering {
        match (self, other) {
            (Comparable::Integer(a), Comparable::Integer(b)) => a.cmp(b),
            (Comparable::Version(a), Comparable::Version(b)) => compare_versions(a, b),
            (Comparable::Integer(a), Comparable::Version(b)) => {
                compare_versions(&a.to_string(), b)
            }
            (Comparable::Version(a), Comparable::Integer(b)) => {
                compare_versions(a, &b.to_string())
            }
        }
    }

    /// Parse bound text into a value of the same kind as `self`.
    fn parse_like(&self, text: &str) -> Comparable {
        match self {
            Comparable::Integer(_) => Comparable::Integer(parse_lenient(text)),
            Comparable::Version(_) => Comparable::Version(text.to_string()),
        }
    }
}

impl PartialEq for Comparable {
    fn eq(&self, other: &Self) -> bool {
        self.compare(other) == Ordering::Equal
    }
}

impl Eq for Comparable {}

impl PartialOrd for Comparable {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Comparable {
    fn cmp(&self, other: &Self) -> Ordering {
        self.compare(other)
    }
}

impl From<i64> for Comparable {
    fn from(v: i64) -> Self {
        Comparable::Integer(v)
    }
}

impl From<&str> for Comparable {
    fn from(v: &str) -> Self {
        Comparable::Version(v.to_string())
    }
}

impl From<String> for Comparable {
    fn from(v: String) -> Self {
        Comparable::Version(v)
    }
}

impl fmt::Display for Comparable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Comparable::Integer(v) => write!(f, "{}", v),
            Comparable::Version(v) => f.write_str(v),
        }
    }
}

/// Compare two dotted version strings.
///
/// Missing components count as zero, so `1.0` equals `1.0.0`. Components
/// that are not numbers also count as zero.
pub fn compare_versions(a: &str, b: &str) -> Ordering {
    let mut left = a.split('.');
    let mut right = b.split('.');
    loop {
        let (l, r) = match (left.next(), right.next()) {
            (None, None) => return Ordering::Equal,
            (l, r) => (
                l.map(parse_lenient).unwrap_or(0),
                r.map(parse_lenient).unwrap_or(0),
            ),
        };
        match l.cmp(&r) {
            Ordering::Equal => continue,
            other => return other,
        }
    }
}

fn parse_lenient(text: &str) -> i64 {
    text.parse().unwrap_or(0)
}

/// A parsed interval expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Interval {
    /// Lower bound, `None` when unbounded
    pub lower: Option<Comparable>,
    /// Whether the lower bound itself is included
    pub lower_inclusive: bool,
    /// Upper bound, `None` when unbounded
    pub upper: Option<Comparable>,
    /// Whether the upper bound itself is included
    pub upper_inclusive: bool,
}

impl Interval {
    /// Parse an interval expression, typing its bounds like `like`.
    ///
    /// Never fails. An expression without a comma has no bounds at all and
    /// therefore contains every value.
    pub fn parse(expr: &str, like: &Comparable) -> Self {
        let expr = expr.trim();
        let lower_inclusive = expr.starts_with('[');
        let upper_inclusive = expr.ends_with(']');
        let body = expr.trim_matches(|c| matches!(c, '[' | ']' | '(' | ')'));

        let mut parts = body.split(',');
        let (lower, upper) = match (parts.next(), parts.next()) {
            (Some(lower), Some(upper)) => (
                bound_text(lower).map(|text| like.parse_like(text)),
                bound_text(upper).map(|text| like.parse_like(text)),
            ),
            _ => (None, None),
        };

        Self {
            lower,
            lower_inclusive,
            upper,
            upper_inclusive,
        }
    }

    /// Check whether `value` lies inside this interval.
    pub fn contains(&self, value: &Comparable) -> bool {
        if let Some(ref lower) = self.lower {
            match value.compare(lower) {
                Ordering::Less => return false,
                Ordering::Equal if !self.lower_inclusive => return false,
                _ => {}
            }
        }
        if let Some(ref upper) = self.upper {
            match value.compare(upper) {
                Ordering::Greater => return false,
                Ordering::Equal if !self.upper_inclusive => return false,
                _ => {}
            }
        }
        true
    }

    /// Check whether neither side is bounded.
    pub fn is_unbounded(&self) -> bool {
        self.lower.is_none() && self.upper.is_none()
    }
}

/// Strip quotes around a bound; `None` if nothing is left.
///
/// Whitespace inside the brackets is kept, so `" 5"` reads as `0`.
fn bound_text(raw: &str) -> Option<&str> {
    let text = raw.trim_matches(|c| c == '\'' || c == '"');
    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}

/// Check whether `value` lies inside the interval written as `expr`.
pub fn match_range(expr: &str, value: &Comparable) -> bool {
    Interval::parse(expr, value).contains(value)
}
