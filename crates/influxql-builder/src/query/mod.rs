//! Fluent InfluxQL SELECT builder.
//!
//! ## Design
//!
//! - The builder emits a template: user data lives in a [`ParamMap`] and is
//!   referenced through `%{name}` placeholders, substituted by the executor.
//! - Conditions are rendered once, when added, and joined with `AND`.
//! - Mutators take `&mut self` and return `&mut Self`, so calls chain.

use crate::condition::{BoolOp, Operand, Property, TIME_KEY, render_clause};
use crate::config::QueryConfig;
use crate::error::{QueryError, QueryResult};
use crate::executor::{BuiltQuery, QueryExecutor};
use crate::logging::{TARGET, display_template};
use crate::params::{self, ParamMap, placeholder, placeholders_in};
use crate::value::ParamValue;
use chrono::{DateTime, NaiveTime, TimeDelta, Utc};
use std::fmt;

const SECONDS_PER_DAY: i64 = 86_400;

/// Optional initial state for [`InfluxQuery::with_options`].
#[derive(Debug, Clone, Default)]
pub struct QueryOptions {
    /// Pre-rendered condition clauses.
    pub conditions: Vec<String>,
    /// Initial parameter bindings.
    pub params: ParamMap,
    /// Projection; `None` selects `*`.
    pub select_columns: Option<Vec<String>>,
    pub config: QueryConfig,
}

/// Structured InfluxQL SELECT builder bound to a source and an executor.
pub struct InfluxQuery<'a, E: ?Sized> {
    /// Measurement (or parenthesized subquery) to select from
    source: String,
    /// SELECT columns (default ["*"])
    select_cols: Vec<String>,
    /// WHERE conditions (without leading AND)
    conditions: Vec<String>,
    /// Placeholder bindings
    params: ParamMap,
    executor: &'a E,
    config: QueryConfig,
}

impl<'a, E: ?Sized> InfluxQuery<'a, E> {
    /// Create a builder selecting `*` from `source`.
    pub fn new(source: impl Into<String>, executor: &'a E) -> Self {
        Self::with_options(source, executor, QueryOptions::default())
    }

    /// Create a builder with initial conditions, params, projection and config.
    pub fn with_options(source: impl Into<String>, executor: &'a E, options: QueryOptions) -> Self {
        Self {
            source: source.into(),
            select_cols: options
                .select_columns
                .unwrap_or_else(|| vec!["*".to_string()]),
            conditions: options.conditions,
            params: options.params,
            executor,
            config: options.config,
        }
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn select_columns(&self) -> &[String] {
        &self.select_cols
    }

    pub fn conditions(&self) -> &[String] {
        &self.conditions
    }

    pub fn params(&self) -> &ParamMap {
        &self.params
    }

    pub fn executor(&self) -> &'a E {
        self.executor
    }

    pub fn config(&self) -> &QueryConfig {
        &self.config
    }

    // ==================== Projection ====================

    /// Replace the SELECT columns.
    pub fn select_cols(&mut self, cols: &[&str]) -> &mut Self {
        self.select_cols = cols.iter().map(|s| s.to_string()).collect();
        self
    }

    /// Append one SELECT column, replacing the `*` wildcard if present.
    pub fn add_select(&mut self, col: &str) -> &mut Self {
        if self.select_cols.len() == 1 && self.select_cols[0] == "*" {
            self.select_cols[0] = col.to_string();
        } else {
            self.select_cols.push(col.to_string());
        }
        self
    }

    // ==================== Shaping ====================

    /// Bind `limit`. A limit coercing to zero is rejected.
    pub fn with_limit<V: Into<ParamValue>>(&mut self, limit: Option<V>) -> QueryResult<&mut Self> {
        let Some(limit) = limit else {
            return Ok(self);
        };
        let limit = limit.into().to_integer();
        if limit == 0 {
            return Err(QueryError::invalid_argument("Cannot add a limit of 0"));
        }
        Ok(self.bind(params::LIMIT, limit))
    }

    /// Bind `offset`. Zero is a valid offset.
    pub fn with_offset<V: Into<ParamValue>>(&mut self, offset: Option<V>) -> &mut Self {
        match offset {
            Some(offset) => {
                let offset = offset.into().to_integer();
                self.bind(params::OFFSET, offset)
            }
            None => self,
        }
    }

    /// Bind `group_by` verbatim (e.g. `time(1h)`).
    pub fn with_group_by<V: Into<ParamValue>>(&mut self, group_by: Option<V>) -> &mut Self {
        match group_by {
            Some(group_by) => self.bind(params::GROUP_BY, group_by),
            None => self,
        }
    }

    fn bind(&mut self, name: &str, value: impl Into<ParamValue>) -> &mut Self {
        let value = value.into();
        tracing::trace!(target: TARGET, param = name, "bind");
        self.params.insert(name, value);
        self
    }

    // ==================== Conditions ====================

    /// Render `properties` joined by `op` and append them as one condition.
    ///
    /// With `wrap` the clause is parenthesized, which keeps an `OR` group intact
    /// inside the top-level `AND` chain. An empty slice adds nothing.
    pub fn add_conditions(&mut self, properties: &[Property], op: BoolOp, wrap: bool) -> &mut Self {
        if properties.is_empty() {
            return self;
        }
        let clause = render_clause(properties, op, wrap);
        tracing::trace!(target: TARGET, condition = %clause, "add condition");
        self.conditions.push(clause);
        self
    }

    /// Append a pre-rendered condition verbatim.
    ///
    /// # Safety
    ///
    /// No quoting is applied. The caller must ensure the clause is safe.
    pub fn add_raw_condition(&mut self, clause: impl Into<String>) -> &mut Self {
        self.conditions.push(clause.into());
        self
    }

    /// Add `(column = %{prefix_0} OR column = %{prefix_1} ...)`, binding each value
    /// under `<prefix>_<i>`. No-op when `values` is empty.
    pub fn add_where_in_filter<I, V>(&mut self, prefix: &str, column: &str, values: I) -> &mut Self
    where
        I: IntoIterator<Item = V>,
        V: Into<ParamValue>,
    {
        let mut properties = Vec::new();
        for (idx, value) in values.into_iter().enumerate() {
            let name = format!("{}_{}", prefix, idx);
            self.bind(&name, value);
            properties.push(Property::eq(column, Operand::placeholder(name)));
        }
        self.add_conditions(&properties, BoolOp::Or, true)
    }

    /// Bind `value` under `param_name` and add `column <operator> %{param_name}`.
    /// No-op when `value` is `None`.
    pub fn filter<V: Into<ParamValue>>(
        &mut self,
        param_name: &str,
        column: &str,
        operator: &str,
        value: Option<V>,
    ) -> &mut Self {
        let Some(value) = value else {
            return self;
        };
        self.bind(param_name, value);
        self.add_conditions(
            &[Property::new(column, operator, Operand::placeholder(param_name))],
            BoolOp::And,
            false,
        )
    }

    /// Restrict `time` to `[start, end]` (unix seconds).
    ///
    /// Missing bounds default to the trailing window from
    /// [`default_time_window`](Self::default_time_window).
    pub fn with_time_filters(&mut self, start: Option<i64>, end: Option<i64>) -> &mut Self {
        let (default_start, default_end) = match (start, end) {
            (Some(s), Some(e)) => (s, e),
            _ => self.default_time_window(),
        };
        self.bind(params::START_DATE, start.unwrap_or(default_start));
        self.bind(params::END_DATE, end.unwrap_or(default_end));
        self.add_conditions(
            &[
                Property::new(
                    TIME_KEY,
                    ">=",
                    Operand::placeholder_with_suffix(params::START_DATE, "s"),
                ),
                Property::new(
                    TIME_KEY,
                    "<=",
                    Operand::placeholder_with_suffix(params::END_DATE, "s"),
                ),
            ],
            BoolOp::And,
            false,
        )
    }

    /// `(start, end)` in unix seconds: midnight UTC `default_window_days` days ago
    /// through the last second of the current UTC day.
    pub fn default_time_window(&self) -> (i64, i64) {
        let now = self.config.clock.now();
        let window_start = TimeDelta::try_days(self.config.default_window_days)
            .and_then(|days| now.checked_sub_signed(days))
            .unwrap_or(DateTime::<Utc>::MIN_UTC);
        let start = start_of_day(window_start);
        let end = start_of_day(now) + SECONDS_PER_DAY - 1;
        (start, end)
    }

    // ==================== Rendering ====================

    /// Render the statement without the trailing ` ;`, suitable as a subquery.
    pub fn render_subquery(&self) -> String {
        let mut sql = format!("select {} from {}", self.select_cols.join(","), self.source);

        if !self.conditions.is_empty() {
            sql.push_str(" where ");
            sql.push_str(&self.conditions.join(" AND "));
        }

        for (keyword, name) in [
            ("GROUP BY", params::GROUP_BY),
            ("LIMIT", params::LIMIT),
            ("OFFSET", params::OFFSET),
        ] {
            if self.params.contains_key(name) {
                sql.push(' ');
                sql.push_str(keyword);
                sql.push(' ');
                sql.push_str(&placeholder(name));
            }
        }

        sql
    }

    /// Render the finalized template, terminated with ` ;`.
    ///
    /// Placeholders are not checked here; see [`validate`](Self::validate).
    pub fn render(&self) -> String {
        format!("{} ;", self.render_subquery())
    }

    /// Placeholder names referenced by the template with no bound parameter,
    /// deduplicated, in order of first appearance.
    pub fn unbound_placeholders(&self) -> Vec<String> {
        let template = self.render();
        let mut missing: Vec<String> = Vec::new();
        for name in placeholders_in(&template) {
            if !self.params.contains_key(name) && !missing.iter().any(|m| m == name) {
                missing.push(name.to_string());
            }
        }
        missing
    }

    /// Check that every placeholder in the template is bound.
    pub fn validate(&self) -> QueryResult<()> {
        match self.unbound_placeholders().into_iter().next() {
            Some(name) => {
                tracing::warn!(target: TARGET, source = %self.source, placeholder = %name, "unbound placeholder");
                Err(QueryError::unbound_placeholder(name))
            }
            None => Ok(()),
        }
    }

    /// Validate and return the template with its parameters.
    pub fn build(&self) -> QueryResult<BuiltQuery<'_>> {
        self.validate()?;
        Ok(BuiltQuery::new(self.render(), &self.params))
    }
}

impl<E: QueryExecutor + ?Sized> InfluxQuery<'_, E> {
    /// Hand the rendered template and params to the executor.
    ///
    /// Placeholders are validated first unless
    /// [`QueryConfig::check_placeholders`] is disabled.
    pub fn resolve(&self) -> QueryResult<E::Output> {
        if self.config.check_placeholders {
            self.validate()?;
        }
        let template = self.render();
        tracing::debug!(
            target: TARGET,
            source = %self.source,
            param_count = self.params.len(),
            template = %display_template(&template, self.config.max_log_length),
            "resolve"
        );
        self.executor.execute(&template, &self.params)
    }
}

impl<E: ?Sized> fmt::Debug for InfluxQuery<'_, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InfluxQuery")
            .field("source", &self.source)
            .field("select_cols", &self.select_cols)
            .field("conditions", &self.conditions)
            .field("params", &self.params)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

fn start_of_day(at: DateTime<Utc>) -> i64 {
    at.date_naive().and_time(NaiveTime::MIN).and_utc().timestamp()
}
