//! Condition primitives for InfluxQL WHERE clauses.
//!
//! A [`Property`] pairs a key with an operator and an [`Operand`]. Properties are
//! rendered to text and joined by a [`BoolOp`] into a single condition clause.
//!
//! InfluxQL is picky about quoting:
//!
//! ```text
//! where time > 123123123s          -- bare, `s` is the unit suffix
//! where action = 'sessions#create' -- single quoted string literal
//! ```
//!
//! Literal strings are therefore single quoted unless the key is `time`.
//! Placeholder operands are never quoted; the executor substitutes them.

use crate::params::placeholder;
use crate::value::ParamValue;
use std::fmt;

/// The key whose literal operands are never quoted.
pub const TIME_KEY: &str = "time";

/// Boolean operator joining the properties of one clause.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BoolOp {
    #[default]
    And,
    Or,
}

impl BoolOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            BoolOp::And => "AND",
            BoolOp::Or => "OR",
        }
    }
}

impl fmt::Display for BoolOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Right-hand side of a property.
#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    /// A value embedded directly in the template.
    Literal(ParamValue),
    /// A named placeholder, optionally followed by a unit suffix (`%{start_date}s`).
    Placeholder { name: String, suffix: Option<String> },
}

impl Operand {
    /// A placeholder operand for `name`.
    pub fn placeholder(name: impl Into<String>) -> Self {
        Operand::Placeholder {
            name: name.into(),
            suffix: None,
        }
    }

    /// A placeholder operand followed by a unit suffix such as `s` or `ms`.
    pub fn placeholder_with_suffix(name: impl Into<String>, suffix: impl Into<String>) -> Self {
        Operand::Placeholder {
            name: name.into(),
            suffix: Some(suffix.into()),
        }
    }

    /// Placeholder name, if this operand is a placeholder.
    pub fn placeholder_name(&self) -> Option<&str> {
        match self {
            Operand::Placeholder { name, .. } => Some(name),
            Operand::Literal(_) => None,
        }
    }

    fn render(&self, key: &str) -> String {
        match self {
            Operand::Placeholder { name, suffix } => {
                let mut token = placeholder(name);
                if let Some(suffix) = suffix {
                    token.push_str(suffix);
                }
                token
            }
            Operand::Literal(ParamValue::Str(s)) if key != TIME_KEY => quote_literal(s),
            Operand::Literal(value) => value.to_string(),
        }
    }
}

impl From<ParamValue> for Operand {
    fn from(value: ParamValue) -> Self {
        Operand::Literal(value)
    }
}

macro_rules! impl_literal_operand {
    ($($t:ty),* $(,)?) => {
        $(
            impl From<$t> for Operand {
                fn from(value: $t) -> Self {
                    Operand::Literal(ParamValue::from(value))
                }
            }
        )*
    };
}

impl_literal_operand!(
    &str, String, &String, i8, i16, i32, i64, u8, u16, u32, u64, usize, f32, f64
);

/// Wrap `s` in single quotes, backslash-escaping `\` and `'`.
///
/// `%` is written as `%%` so text such as `%{x}` inside a literal is never
/// taken for a placeholder.
pub fn quote_literal(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('\'');
    for c in s.chars() {
        match c {
            '\'' | '\\' => out.push('\\'),
            '%' => out.push('%'),
            _ => {}
        }
        out.push(c);
    }
    out.push('\'');
    out
}

/// One `<key> <operator> <operand>` comparison.
#[derive(Debug, Clone, PartialEq)]
pub struct Property {
    pub key: String,
    pub operator: String,
    pub value: Operand,
}

impl Property {
    pub fn new(
        key: impl Into<String>,
        operator: impl Into<String>,
        value: impl Into<Operand>,
    ) -> Self {
        Self {
            key: key.into(),
            operator: operator.into(),
            value: value.into(),
        }
    }

    /// `key = value`
    pub fn eq(key: impl Into<String>, value: impl Into<Operand>) -> Self {
        Self::new(key, "=", value)
    }

    /// Render as `<key> <operator> <value>`.
    pub fn render(&self) -> String {
        format!(
            "{} {} {}",
            self.key,
            self.operator,
            self.value.render(&self.key)
        )
    }
}

/// Render `properties` joined by ` <op> `, parenthesized when `wrap` is set.
pub fn render_clause(properties: &[Property], op: BoolOp, wrap: bool) -> String {
    let separator = format!(" {} ", op);
    let clause = properties
        .iter()
        .map(Property::render)
        .collect::<Vec<_>>()
        .join(&separator);
    if wrap { format!("({})", clause) } else { clause }
}
