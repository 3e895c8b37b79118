//! Typed filter predicates.
//!
//! A [`Predicate`] is one condition on one attribute: a kind, a key, a
//! connective and its operand values. Each operand is bound to its own
//! placeholder when the predicate is constructed, and both [`Predicate::render`]
//! and the bindings reuse those placeholders.

use std::fmt;
use std::str::FromStr;

use rustack_query_model::{AttributeValue, ExpressionAttributeValues};

use super::placeholder::{Placeholder, PlaceholderGenerator};
use super::tree::Expression;
use crate::error::{QueryError, QueryResult};

/// Boolean joiner between sibling expressions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Connective {
    /// Logical AND.
    #[default]
    And,
    /// Logical OR.
    Or,
}

impl Connective {
    /// The token emitted between sibling expressions.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::And => "and",
            Self::Or => "or",
        }
    }
}

impl fmt::Display for Connective {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Connective {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("and") {
            Ok(Self::And)
        } else if s.eq_ignore_ascii_case("or") {
            Ok(Self::Or)
        } else {
            Err(QueryError::UnsupportedOperation { name: s.to_owned() })
        }
    }
}

/// Whether a predicate takes one operand or a collection of them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperandShape {
    /// Exactly one value.
    Scalar,
    /// A non-empty list of values.
    Collection,
}

impl OperandShape {
    fn describe(self) -> &'static str {
        match self {
            Self::Scalar => "a scalar operand",
            Self::Collection => "a collection operand",
        }
    }
}

/// The closed set of predicate kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PredicateKind {
    /// `key = :v`
    Eq,
    /// `key <> :v`
    NotEq,
    /// `key > :v`
    Gt,
    /// `key >= :v`
    GtEq,
    /// `key < :v`
    Lt,
    /// `key <= :v`
    LtEq,
    /// `contains(key, :v)`
    Contains,
    /// `begins_with(key, :v)`
    BeginsWith,
    /// `key in (:v1,:v2,...)`
    In,
}

impl PredicateKind {
    /// Every kind, in registry order.
    pub const ALL: [Self; 9] = [
        Self::Eq,
        Self::NotEq,
        Self::Gt,
        Self::GtEq,
        Self::Lt,
        Self::LtEq,
        Self::Contains,
        Self::BeginsWith,
        Self::In,
    ];

    /// The registered name of this kind.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Eq => "Eq",
            Self::NotEq => "NotEq",
            Self::Gt => "Gt",
            Self::GtEq => "GtEq",
            Self::Lt => "Lt",
            Self::LtEq => "LtEq",
            Self::Contains => "Contains",
            Self::BeginsWith => "BeginsWith",
            Self::In => "In",
        }
    }

    /// Resolve a kind by name. Case and underscores are ignored, so `NotEq`,
    /// `not_eq` and `noteq` all resolve to [`PredicateKind::NotEq`].
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        let wanted = normalize(name);
        Self::ALL
            .into_iter()
            .find(|kind| normalize(kind.name()) == wanted)
    }

    /// The operand shape this kind accepts.
    #[must_use]
    pub fn operand_shape(&self) -> OperandShape {
        match self {
            Self::In => OperandShape::Collection,
            Self::Eq
            | Self::NotEq
            | Self::Gt
            | Self::GtEq
            | Self::Lt
            | Self::LtEq
            | Self::Contains
            | Self::BeginsWith => OperandShape::Scalar,
        }
    }

    fn render(self, key: &str, placeholders: &[String]) -> String {
        let first = placeholders.first().map_or("", String::as_str);
        match self {
            Self::Eq => format!("{key} = {first}"),
            Self::NotEq => format!("{key} <> {first}"),
            Self::Gt => format!("{key} > {first}"),
            Self::GtEq => format!("{key} >= {first}"),
            Self::Lt => format!("{key} < {first}"),
            Self::LtEq => format!("{key} <= {first}"),
            Self::Contains => format!("contains({key}, {first})"),
            Self::BeginsWith => format!("begins_with({key}, {first})"),
            Self::In => format!("{key} in ({})", placeholders.join(",")),
        }
    }
}

impl fmt::Display for PredicateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for PredicateKind {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s).ok_or_else(|| QueryError::UnknownPredicateKind { kind: s.to_owned() })
    }
}

pub(crate) fn normalize(name: &str) -> String {
    name.chars()
        .filter(|c| *c != '_')
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

/// An operand as supplied by the caller: one value or a collection.
#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    /// A single value.
    Scalar(AttributeValue),
    /// A list of values, one placeholder each.
    Collection(Vec<AttributeValue>),
}

impl Operand {
    /// A scalar operand.
    pub fn scalar(value: impl Into<AttributeValue>) -> Self {
        Self::Scalar(value.into())
    }

    /// A collection operand.
    pub fn collection<V: Into<AttributeValue>>(values: impl IntoIterator<Item = V>) -> Self {
        Self::Collection(values.into_iter().map(Into::into).collect())
    }

    /// The shape of this operand.
    #[must_use]
    pub fn shape(&self) -> OperandShape {
        match self {
            Self::Scalar(_) => OperandShape::Scalar,
            Self::Collection(_) => OperandShape::Collection,
        }
    }
}

impl From<AttributeValue> for Operand {
    fn from(value: AttributeValue) -> Self {
        Self::Scalar(value)
    }
}

impl From<Vec<AttributeValue>> for Operand {
    fn from(values: Vec<AttributeValue>) -> Self {
        Self::Collection(values)
    }
}

/// One typed condition with its placeholder bindings.
#[derive(Debug, Clone, PartialEq)]
pub struct Predicate {
    kind: PredicateKind,
    key: String,
    connective: Connective,
    bound: Vec<(Placeholder, AttributeValue)>,
}

impl Predicate {
    /// Build a predicate, binding one fresh placeholder per operand value.
    ///
    /// Fails with [`QueryError::InvalidOperandKind`] when the operand shape
    /// does not match `kind`, or when a collection operand is empty.
    pub fn new(
        kind: PredicateKind,
        key: impl Into<String>,
        operand: Operand,
        connective: Connective,
        placeholders: &PlaceholderGenerator,
    ) -> QueryResult<Self> {
        let expected = kind.operand_shape();
        let values = match (expected, operand) {
            (OperandShape::Scalar, Operand::Scalar(value)) => vec![value],
            (OperandShape::Collection, Operand::Collection(values)) if !values.is_empty() => {
                values
            }
            (OperandShape::Collection, Operand::Collection(_)) => {
                return Err(QueryError::InvalidOperandKind {
                    kind: kind.name(),
                    expected: "a non-empty collection operand",
                    found: "an empty collection",
                });
            }
            (expected, operand) => {
                return Err(QueryError::InvalidOperandKind {
                    kind: kind.name(),
                    expected: expected.describe(),
                    found: operand.shape().describe(),
                });
            }
        };

        let bound = values
            .into_iter()
            .map(|value| (placeholders.next_placeholder(), value))
            .collect();

        Ok(Self {
            kind,
            key: key.into(),
            connective,
            bound,
        })
    }

    /// Replace the connective joining this predicate to its predecessor.
    #[must_use]
    pub fn with_connective(mut self, connective: Connective) -> Self {
        self.connective = connective;
        self
    }

    /// The predicate kind.
    #[must_use]
    pub fn kind(&self) -> PredicateKind {
        self.kind
    }

    /// The attribute name or `#alias` this predicate tests.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Placeholders bound by this predicate, in operand order.
    pub fn placeholders(&self) -> impl Iterator<Item = &Placeholder> {
        self.bound.iter().map(|(placeholder, _)| placeholder)
    }
}

impl Expression for Predicate {
    fn render(&self) -> String {
        let tokens: Vec<String> = self.placeholders().map(Placeholder::token).collect();
        self.kind.render(&self.key, &tokens)
    }

    fn bind_into(&self, values: &mut ExpressionAttributeValues) {
        for (placeholder, value) in &self.bound {
            values.insert(placeholder.token(), value.clone());
        }
    }

    fn binding_count(&self) -> usize {
        self.bound.len()
    }

    fn connective(&self) -> Connective {
        self.connective
    }
}
