//! The collaborator that runs finalized templates.

use crate::error::QueryResult;
use crate::params::ParamMap;

/// Runs a finalized query template against the database.
///
/// Implementations substitute each `%{name}` placeholder with the quoted textual
/// form of `params[name]` and perform the round-trip. Timeouts, retries and
/// connection handling all live here, not in the builder.
pub trait QueryExecutor {
    /// Whatever the client returns for a query.
    type Output;

    /// Execute `template` with `params`.
    ///
    /// Wrap client failures with [`QueryError::execution`](crate::QueryError::execution).
    fn execute(&self, template: &str, params: &ParamMap) -> QueryResult<Self::Output>;
}

impl<E: QueryExecutor + ?Sized> QueryExecutor for &E {
    type Output = E::Output;

    fn execute(&self, template: &str, params: &ParamMap) -> QueryResult<Self::Output> {
        (**self).execute(template, params)
    }
}

/// A validated template together with the parameters it references.
#[derive(Debug, Clone, PartialEq)]
pub struct BuiltQuery<'a> {
    template: String,
    params: &'a ParamMap,
}

impl<'a> BuiltQuery<'a> {
    pub(crate) fn new(template: String, params: &'a ParamMap) -> Self {
        Self { template, params }
    }

    pub fn template(&self) -> &str {
        &self.template
    }

    pub fn params(&self) -> &'a ParamMap {
        self.params
    }

    /// Hand the query to `executor`.
    pub fn execute_with<E: QueryExecutor + ?Sized>(&self, executor: &E) -> QueryResult<E::Output> {
        executor.execute(&self.template, self.params)
    }
}
