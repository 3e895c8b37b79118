//! Filter expression composition.
//!
//! Predicates are created through a [`PredicateFactory`] that owns the request's
//! [`PlaceholderGenerator`], collected into an [`ExpressionTree`], and rendered
//! into one parenthesised condition string plus its value bindings.

pub mod factory;
pub mod placeholder;
pub mod predicate;
pub mod tree;

pub use factory::{PredicateFactory, PredicateSpec};
pub use placeholder::{Placeholder, PlaceholderGenerator};
pub use predicate::{Connective, Operand, OperandShape, Predicate, PredicateKind};
pub use tree::{Expression, ExpressionNode, ExpressionTree, Fragment};
