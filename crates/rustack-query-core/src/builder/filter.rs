//! The filter verbs shared by scan and query builders.

use rustack_query_model::{AttributeValue, ExpressionAttributeNames, ExpressionAttributeValues};
use tracing::debug;

use super::dispatch::parse_call;
use crate::error::{QueryError, QueryResult};
use crate::expression::{
    Connective, Expression, ExpressionTree, Fragment, Operand, PredicateFactory, PredicateKind,
    PredicateSpec,
};

macro_rules! scalar_verbs {
    ($($kind:ident => $base:ident, $and:ident, $or:ident;)*) => {
        $(
            #[doc = concat!(
                "Append a `", stringify!($kind),
                "` predicate with the default connective (`and`)."
            )]
            fn $base(
                self,
                key: impl Into<String>,
                value: impl Into<AttributeValue>,
            ) -> QueryResult<Self> {
                self.filter(Connective::And, PredicateKind::$kind, key, Operand::scalar(value))
            }

            #[doc = concat!("Append a `", stringify!($kind), "` predicate joined by `and`.")]
            fn $and(
                self,
                key: impl Into<String>,
                value: impl Into<AttributeValue>,
            ) -> QueryResult<Self> {
                self.filter(Connective::And, PredicateKind::$kind, key, Operand::scalar(value))
            }

            #[doc = concat!("Append a `", stringify!($kind), "` predicate joined by `or`.")]
            fn $or(
                self,
                key: impl Into<String>,
                value: impl Into<AttributeValue>,
            ) -> QueryResult<Self> {
                self.filter(Connective::Or, PredicateKind::$kind, key, Operand::scalar(value))
            }
        )*
    };
}

/// Fluent filter composition over an owned [`ExpressionTree`].
///
/// Every verb consumes the builder and hands it back, so chains read
/// `builder.eq("a", 1)?.or_contains("#b", "x")?`. Implementors only provide
/// access to their tree, factory and alias map.
pub trait FilterBuilder: Sized {
    /// The factory drawing from this request's placeholder sequence.
    fn factory(&self) -> &PredicateFactory;

    /// The filter tree.
    fn filter_tree(&self) -> &ExpressionTree;

    /// The filter tree, mutably.
    fn filter_tree_mut(&mut self) -> &mut ExpressionTree;

    /// The attribute-name alias map, mutably.
    fn attribute_names_mut(&mut self) -> &mut ExpressionAttributeNames;

    /// An empty builder for the same target sharing this placeholder sequence.
    #[must_use]
    fn branch(&self) -> Self;

    /// Every value binding the compiled request will carry.
    fn bound_values(&self) -> ExpressionAttributeValues {
        self.filter_tree().bindings()
    }

    /// Append a predicate of `kind` joined by `connective`.
    fn filter(
        mut self,
        connective: Connective,
        kind: PredicateKind,
        key: impl Into<String>,
        operand: Operand,
    ) -> QueryResult<Self> {
        let predicate = self.factory().create(kind, key, operand, connective)?;
        self.filter_tree_mut().push(predicate);
        Ok(self)
    }

    /// Append a predicate named by a connective-prefixed verb such as
    /// `orContains` or `and_not_eq`.
    fn call(self, name: &str, key: impl Into<String>, operand: Operand) -> QueryResult<Self> {
        let (connective, kind) = parse_call(name)?;
        self.filter(connective, kind, key, operand)
    }

    /// Append a declarative predicate.
    fn apply(mut self, spec: &PredicateSpec) -> QueryResult<Self> {
        let predicate = self.factory().from_spec(spec)?;
        self.filter_tree_mut().push(predicate);
        Ok(self)
    }

    /// Append several declarative predicates in order.
    fn apply_all<'a>(
        self,
        specs: impl IntoIterator<Item = &'a PredicateSpec>,
    ) -> QueryResult<Self> {
        specs.into_iter().try_fold(self, Self::apply)
    }

    scalar_verbs! {
        Eq => eq, and_eq, or_eq;
        NotEq => not_eq, and_not_eq, or_not_eq;
        Gt => gt, and_gt, or_gt;
        GtEq => gt_eq, and_gt_eq, or_gt_eq;
        Lt => lt, and_lt, or_lt;
        LtEq => lt_eq, and_lt_eq, or_lt_eq;
        Contains => contains, and_contains, or_contains;
        BeginsWith => begins_with, and_begins_with, or_begins_with;
    }

    /// Append an `in` predicate with the default connective (`and`).
    fn in_<V: Into<AttributeValue>>(
        self,
        key: impl Into<String>,
        values: impl IntoIterator<Item = V>,
    ) -> QueryResult<Self> {
        self.filter(Connective::And, PredicateKind::In, key, Operand::collection(values))
    }

    /// Append an `in` predicate joined by `and`.
    fn and_in<V: Into<AttributeValue>>(
        self,
        key: impl Into<String>,
        values: impl IntoIterator<Item = V>,
    ) -> QueryResult<Self> {
        self.filter(Connective::And, PredicateKind::In, key, Operand::collection(values))
    }

    /// Append an `in` predicate joined by `or`.
    fn or_in<V: Into<AttributeValue>>(
        self,
        key: impl Into<String>,
        values: impl IntoIterator<Item = V>,
    ) -> QueryResult<Self> {
        self.filter(Connective::Or, PredicateKind::In, key, Operand::collection(values))
    }

    /// Embed `other`'s rendered filter and bindings as one opaque leaf.
    ///
    /// `other` should draw from this builder's placeholder sequence, as
    /// builders from [`FilterBuilder::branch`] or one [`crate::Table`] do. A
    /// builder with its own sequence is accepted only when that sequence can
    /// never produce a placeholder this one produces; otherwise the parent's
    /// next verb could rebind one of the child's tokens. An empty `other` adds
    /// nothing.
    fn sub_query(mut self, other: &Self, connective: Connective) -> QueryResult<Self> {
        let child = other.filter_tree();
        if child.is_empty() {
            return Ok(self);
        }

        let ours = self.factory().placeholders();
        let theirs = other.factory().placeholders();
        if !ours.shares_sequence_with(theirs) {
            let incoming = child.bindings();
            let bound = self.bound_values();
            let collision = if ours.may_collide_with(theirs) {
                incoming.into_keys().min()
            } else {
                incoming.into_keys().find(|k| bound.contains_key(k))
            };
            if let Some(placeholder) = collision {
                return Err(QueryError::PlaceholderCollision { placeholder });
            }
        }

        debug!(
            connective = %connective,
            bindings = child.binding_count(),
            "embedding sub-query"
        );
        let fragment = Fragment::capture(child, connective);
        self.filter_tree_mut().push(fragment);
        Ok(self)
    }

    /// Nest `tree` as a parenthesised group. An empty tree adds nothing.
    #[must_use]
    fn sub_tree(mut self, connective: Connective, tree: ExpressionTree) -> Self {
        if !tree.is_empty() {
            self.filter_tree_mut().add(connective, tree);
        }
        self
    }

    /// Build a parenthesised group with a branched builder.
    ///
    /// ```ignore
    /// scan.eq("status", "active")?
    ///     .group(Connective::Or, |g| g.gt("score", 10)?.and_lt("score", 20))?
    /// ```
    fn group(
        self,
        connective: Connective,
        build: impl FnOnce(Self) -> QueryResult<Self>,
    ) -> QueryResult<Self> {
        let mut child = build(self.branch())?;
        let tree = std::mem::take(child.filter_tree_mut());
        Ok(self.sub_tree(connective, tree))
    }

    /// Replace the attribute-name alias map.
    #[must_use]
    fn with_attribute_names<K, V>(mut self, names: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        *self.attribute_names_mut() = names
            .into_iter()
            .map(|(alias, name)| (alias.into(), name.into()))
            .collect();
        self
    }
}
