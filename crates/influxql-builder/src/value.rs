//! Scalar parameter values.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A scalar bound to a named placeholder or embedded as a literal operand.
///
/// Serializes untagged, so a map of values becomes a plain JSON object such as
/// `{"limit": 10, "host": "web-1"}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    Int(i64),
    Float(f64),
    Str(String),
}

impl ParamValue {
    /// Whether this value is textual.
    pub fn is_text(&self) -> bool {
        matches!(self, Self::Str(_))
    }

    /// Borrow the string contents, if textual.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Integer view, if this is an integer.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Int(n) => Some(*n),
            _ => None,
        }
    }

    /// Coerce to an integer using leading-integer semantics.
    ///
    /// - integers pass through
    /// - floats truncate toward zero (NaN becomes 0, out of range saturates)
    /// - strings parse optional whitespace, an optional sign and leading digits
    ///   (`_` allowed between digits); anything unparsable yields 0
    pub fn to_integer(&self) -> i64 {
        match self {
            Self::Int(n) => *n,
            Self::Float(f) => *f as i64,
            Self::Str(s) => leading_integer(s),
        }
    }
}

fn leading_integer(s: &str) -> i64 {
    let s = s.trim_start();
    let (negative, digits) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };

    let mut acc: i64 = 0;
    let mut prev_digit = false;
    for b in digits.bytes() {
        match b {
            b'0'..=b'9' => {
                let d = i64::from(b - b'0');
                acc = if negative {
                    acc.saturating_mul(10).saturating_sub(d)
                } else {
                    acc.saturating_mul(10).saturating_add(d)
                };
                prev_digit = true;
            }
            b'_' if prev_digit => prev_digit = false,
            _ => break,
        }
    }
    acc
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(n) => write!(f, "{n}"),
            Self::Float(x) => write!(f, "{x}"),
            Self::Str(s) => f.write_str(s),
        }
    }
}

impl From<String> for ParamValue {
    fn from(value: String) -> Self {
        Self::Str(value)
    }
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        Self::Str(value.to_string())
    }
}

impl From<&String> for ParamValue {
    fn from(value: &String) -> Self {
        Self::Str(value.clone())
    }
}

impl From<f64> for ParamValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<f32> for ParamValue {
    fn from(value: f32) -> Self {
        Self::Float(f64::from(value))
    }
}

macro_rules! impl_from_int {
    ($($t:ty),* $(,)?) => {
        $(
            impl From<$t> for ParamValue {
                fn from(value: $t) -> Self {
                    Self::Int(i64::from(value))
                }
            }
        )*
    };
}

impl_from_int!(i8, i16, i32, i64, u8, u16, u32);

macro_rules! impl_from_wide_int {
    ($($t:ty),* $(,)?) => {
        $(
            impl From<$t> for ParamValue {
                /// Saturates at `i64::MAX`.
                fn from(value: $t) -> Self {
                    Self::Int(i64::try_from(value).unwrap_or(i64::MAX))
                }
            }
        )*
    };
}

impl_from_wide_int!(u64, usize);
