use anyhow::{bail, Result};
use std::fmt;

/// Difficulty range used by the difficulty bonus buckets.
///
/// Grammar: `<N`, `<=N`, `>N`, `>=N`, `N` or an inclusive span `N-M`.
/// Bounds may be negative (`-1`, `-3--1`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RangeOp {
    LessThan(i64),
    LessEqual(i64),
    GreaterThan(i64),
    GreaterEqual(i64),
    Equal(i64),
    Between(i64, i64),
}

impl RangeOp {
    pub fn parse(s: &str) -> Result<Self> {
        let s = s.trim();
        if let Some(val) = s.strip_prefix(">=") {
            Ok(RangeOp::GreaterEqual(val.trim().parse()?))
        } else if let Some(val) = s.strip_prefix("<=") {
            Ok(RangeOp::LessEqual(val.trim().parse()?))
        } else if let Some(val) = s.strip_prefix('>') {
            Ok(RangeOp::GreaterThan(val.trim().parse()?))
        } else if let Some(val) = s.strip_prefix('<') {
            Ok(RangeOp::LessThan(val.trim().parse()?))
        } else if let Some(idx) = span_separator(s) {
            let low: i64 = s[..idx].trim().parse()?;
            let high: i64 = s[idx + 1..].trim().parse()?;
            if low > high {
                bail!("Empty range {}: lower bound exceeds upper bound", s)
            }
            Ok(RangeOp::Between(low, high))
        } else {
            Ok(RangeOp::Equal(s.parse()?))
        }
    }

    pub fn matches(&self, value: i64) -> bool {
        match self {
            RangeOp::LessThan(n) => value < *n,
            RangeOp::LessEqual(n) => value <= *n,
            RangeOp::GreaterThan(n) => value > *n,
            RangeOp::GreaterEqual(n) => value >= *n,
            RangeOp::Equal(n) => value == *n,
            RangeOp::Between(low, high) => value >= *low && value <= *high,
        }
    }
}

/// Byte index of the `-` joining the two bounds of a span. A leading `-` is
/// a sign, not a separator.
fn span_separator(s: &str) -> Option<usize> {
    s.char_indices()
        .skip(1)
        .find(|&(i, c)| c == '-' && !s[..i].trim_end().ends_with('-'))
        .map(|(i, _)| i)
}

impl fmt::Display for RangeOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RangeOp::LessThan(n) => write!(f, "<{}", n),
            RangeOp::LessEqual(n) => write!(f, "<={}", n),
            RangeOp::GreaterThan(n) => write!(f, ">{}", n),
            RangeOp::GreaterEqual(n) => write!(f, ">={}", n),
            RangeOp::Equal(n) => write!(f, "{}", n),
            RangeOp::Between(low, high) => write!(f, "{}-{}", low, high),
        }
    }
}
