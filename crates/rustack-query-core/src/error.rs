//! Error type for expression compilation and request building.

use rustack_query_model::MarshalError;

/// Errors raised while composing or compiling a request.
///
/// Every variant is raised at the call that misused the API, never deferred
/// to compile time.
#[derive(Debug, thiserror::Error)]
pub enum QueryError {
    /// A predicate kind name has no registered constructor.
    #[error("unknown predicate kind: {kind}")]
    UnknownPredicateKind {
        /// The name that failed to resolve.
        kind: String,
    },

    /// A connective-prefixed call names no known verb.
    #[error("unsupported operation: {name}")]
    UnsupportedOperation {
        /// The full call name, e.g. `orMatches`.
        name: String,
    },

    /// An operand's shape does not match what the predicate kind expects.
    #[error("invalid operand for {kind}: expected {expected}, found {found}")]
    InvalidOperandKind {
        /// Predicate kind that rejected the operand.
        kind: &'static str,
        /// Expected operand shape.
        expected: &'static str,
        /// Operand shape that was supplied.
        found: &'static str,
    },

    /// A sub-query would bind a placeholder that is already bound.
    #[error("placeholder {placeholder} is already bound in this request")]
    PlaceholderCollision {
        /// The colliding placeholder token.
        placeholder: String,
    },

    /// Invalid configuration.
    #[error("configuration error: {0}")]
    Config(String),

    /// A value could not be marshaled into its wire representation.
    #[error(transparent)]
    Marshal(#[from] MarshalError),

    /// A compiled request could not be converted to or from JSON.
    #[error("failed to convert request: {0}")]
    Encode(#[source] serde_json::Error),
}

/// Convenience result type for query building.
pub type QueryResult<T> = Result<T, QueryError>;
