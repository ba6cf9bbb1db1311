//! Error types for influxql-builder

use thiserror::Error;

/// Result type alias for query builder operations
pub type QueryResult<T> = Result<T, QueryError>;

/// Error types for building and resolving queries
#[derive(Debug, Error)]
pub enum QueryError {
    /// A mutator received an argument it refuses to store
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// The template references a placeholder with no bound parameter
    #[error("Unbound placeholder '%{{{name}}}' in query template")]
    UnboundPlaceholder { name: String },

    /// The executor failed to run the query
    #[error("Execution error: {0}")]
    Execution(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// Parameter serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl QueryError {
    /// Create an invalid argument error
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument(message.into())
    }

    /// Create an unbound placeholder error for `name`
    pub fn unbound_placeholder(name: impl Into<String>) -> Self {
        Self::UnboundPlaceholder { name: name.into() }
    }

    /// Wrap an executor failure
    pub fn execution(err: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        Self::Execution(err.into())
    }

    /// Check if this is an invalid argument error
    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, Self::InvalidArgument(_))
    }

    /// Check if this is an unbound placeholder error
    pub fn is_unbound_placeholder(&self) -> bool {
        matches!(self, Self::UnboundPlaceholder { .. })
    }

    /// Check if this is an execution error
    pub fn is_execution(&self) -> bool {
        matches!(self, Self::Execution(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages() {
        assert_eq!(
            QueryError::invalid_argument("Cannot add a limit of 0").to_string(),
            "Invalid argument: Cannot add a limit of 0"
        );
        assert_eq!(
            QueryError::unbound_placeholder("host").to_string(),
            "Unbound placeholder '%{host}' in query template"
        );
    }

    #[test]
    fn predicates() {
        assert!(QueryError::execution("boom").is_execution());
        assert!(!QueryError::execution("boom").is_invalid_argument());
        assert!(QueryError::unbound_placeholder("x").is_unbound_placeholder());
    }
}
