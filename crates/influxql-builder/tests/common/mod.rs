#![allow(dead_code)]

use influxql_builder::{ParamMap, ParamValue, QueryError, QueryExecutor, QueryResult};
use std::cell::RefCell;
use std::fmt;

#[derive(Debug)]
pub struct MissingParam(pub String);

impl fmt::Display for MissingParam {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "missing param '{}'", self.0)
    }
}

impl std::error::Error for MissingParam {}

/// Stands in for an HTTP client: substitutes placeholders the way InfluxDB
/// clients do and records the final statement instead of sending it.
#[derive(Default)]
pub struct SubstitutingExecutor {
    pub sent: RefCell<Vec<String>>,
}

impl SubstitutingExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last(&self) -> Option<String> {
        self.sent.borrow().last().cloned()
    }
}

/// Quote a bound string the way InfluxDB clients do: backslash-escape `\` and `'`.
fn quote_value(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('\'');
    for c in s.chars() {
        if c == '\'' || c == '\\' {
            out.push('\\');
        }
        out.push(c);
    }
    out.push('\'');
    out
}

/// Replace `%{name}` tokens with quoted params and `%%` with `%`.
pub fn substitute(template: &str, params: &ParamMap) -> QueryResult<String> {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(pos) = rest.find('%') {
        out.push_str(&rest[..pos]);
        let after = &rest[pos + 1..];
        if let Some(stripped) = after.strip_prefix('%') {
            out.push('%');
            rest = stripped;
            continue;
        }
        let Some(inner) = after.strip_prefix('{') else {
            out.push('%');
            rest = after;
            continue;
        };
        let end = inner
            .find('}')
            .ok_or_else(|| QueryError::execution(MissingParam(inner.to_string())))?;
        let name = &inner[..end];
        let value = params
            .get(name)
            .ok_or_else(|| QueryError::execution(MissingParam(name.to_string())))?;
        match value {
            ParamValue::Str(s) => out.push_str(&quote_value(s)),
            other => out.push_str(&other.to_string()),
        }
        rest = &inner[end + 1..];
    }
    out.push_str(rest);
    Ok(out)
}

impl QueryExecutor for SubstitutingExecutor {
    type Output = String;

    fn execute(&self, template: &str, params: &ParamMap) -> QueryResult<String> {
        let statement = substitute(template, params)?;
        self.sent.borrow_mut().push(statement.clone());
        Ok(statement)
    }
}

/// Always fails, for error propagation tests.
pub struct FailingExecutor;

impl QueryExecutor for FailingExecutor {
    type Output = ();

    fn execute(&self, _template: &str, _params: &ParamMap) -> QueryResult<()> {
        Err(QueryError::execution("connection refused"))
    }
}
