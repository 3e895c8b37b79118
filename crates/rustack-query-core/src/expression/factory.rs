//! Predicate construction by kind or by name.

use rustack_query_model::Marshaler;
use serde::Deserialize;
use serde_json::Value;
use tracing::trace;

use super::placeholder::PlaceholderGenerator;
use super::predicate::{Connective, Operand, Predicate, PredicateKind};
use crate::error::QueryResult;

/// A declarative predicate, as found in JSON filter definitions.
///
/// ```json
/// {"expression": "BeginsWith", "key": "game", "value": "FIFA", "operator": "or"}
/// ```
///
/// An array `value` is treated as a collection operand.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PredicateSpec {
    /// Predicate kind name, resolved loosely (`NotEq`, `not_eq`, ...).
    pub expression: String,
    /// Attribute name or `#alias`.
    pub key: String,
    /// Operand in plain JSON; marshaled on resolution.
    pub value: Value,
    /// Connective to the previous predicate.
    #[serde(default)]
    pub operator: Connective,
}

/// Builds predicates that draw placeholders from one request's sequence.
#[derive(Debug, Clone, Default)]
pub struct PredicateFactory {
    placeholders: PlaceholderGenerator,
    marshaler: Marshaler,
}

impl PredicateFactory {
    /// Factory over the given placeholder sequence and marshaler.
    #[must_use]
    pub fn new(placeholders: PlaceholderGenerator, marshaler: Marshaler) -> Self {
        Self {
            placeholders,
            marshaler,
        }
    }

    /// The placeholder sequence this factory draws from.
    #[must_use]
    pub fn placeholders(&self) -> &PlaceholderGenerator {
        &self.placeholders
    }

    /// The marshaler used for declarative operands.
    #[must_use]
    pub fn marshaler(&self) -> Marshaler {
        self.marshaler
    }

    /// Create a predicate of `kind`.
    pub fn create(
        &self,
        kind: PredicateKind,
        key: impl Into<String>,
        operand: Operand,
        connective: Connective,
    ) -> QueryResult<Predicate> {
        let predicate = Predicate::new(kind, key, operand, connective, &self.placeholders)?;
        trace!(
            kind = %kind,
            key = predicate.key(),
            placeholders = predicate.placeholders().count(),
            "created predicate"
        );
        Ok(predicate)
    }

    /// Create a predicate from a kind name such as `"NotEq"`.
    pub fn create_named(
        &self,
        name: &str,
        key: impl Into<String>,
        operand: Operand,
        connective: Connective,
    ) -> QueryResult<Predicate> {
        let kind: PredicateKind = name.parse()?;
        self.create(kind, key, operand, connective)
    }

    /// Resolve a declarative predicate.
    pub fn from_spec(&self, spec: &PredicateSpec) -> QueryResult<Predicate> {
        let kind: PredicateKind = spec.expression.parse()?;
        let operand = match &spec.value {
            Value::Array(values) => Operand::Collection(
                values
                    .iter()
                    .map(|v| self.marshaler.marshal_json(v.clone()))
                    .collect(),
            ),
            other => Operand::Scalar(self.marshaler.marshal_json(other.clone())),
        };
        self.create(kind, spec.key.as_str(), operand, spec.operator)
    }
}

impl From<PlaceholderGenerator> for PredicateFactory {
    fn from(placeholders: PlaceholderGenerator) -> Self {
        Self::new(placeholders, Marshaler::default())
    }
}
