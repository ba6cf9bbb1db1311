//! # influxql-builder
//!
//! A small fluent builder for InfluxQL `SELECT` templates.
//!
//! ## Features
//!
//! - **Templates, not values**: user data is bound in a [`ParamMap`] and referenced
//!   as `%{name}` placeholders that the executor substitutes
//! - **InfluxQL quoting**: string literals are single quoted, `time` comparisons stay bare
//! - **Fail fast**: unbound placeholders are caught before the query leaves the process
//! - **Pluggable execution**: bring any client through [`QueryExecutor`]
//!
//! ```ignore
//! use influxql_builder::InfluxQuery;
//!
//! let mut query = InfluxQuery::new("requests", &client);
//! query
//!     .with_time_filters(None, None)
//!     .filter("host", "host", "=", Some("web-1"))
//!     .add_where_in_filter("status", "status", [500, 502])
//!     .with_group_by(Some("time(1h)"))
//!     .with_limit(Some(100))?;
//!
//! // select * from requests where time >= %{start_date}s AND time <= %{end_date}s
//! //   AND host = %{host} AND (status = %{status_0} OR status = %{status_1})
//! //   GROUP BY %{group_by} LIMIT %{limit} ;
//! let result = query.resolve()?;
//! ```

pub mod condition;
pub mod config;
pub mod error;
pub mod executor;
pub mod params;
pub mod query;
pub mod value;

mod logging;

pub use condition::{BoolOp, Operand, Property, quote_literal};
pub use config::{Clock, QueryConfig};
pub use error::{QueryError, QueryResult};
pub use executor::{BuiltQuery, QueryExecutor};
pub use logging::TARGET as LOG_TARGET;
pub use params::{ParamMap, placeholder, placeholders_in};
pub use query::{InfluxQuery, QueryOptions};
pub use value::ParamValue;
