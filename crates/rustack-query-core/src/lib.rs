//! DynamoDB expression compiler and request builders.
//!
//! Filter verbs build typed predicates, predicates collect into an expression
//! tree, and each builder compiles its tree into a wire-ready request body with
//! collision-free value placeholders. Nothing here talks to a store: hand the
//! [`CompiledRequest`] to whatever client sends requests.
#![allow(clippy::doc_markdown)]

pub mod builder;
pub mod config;
pub mod error;
pub mod expression;

pub use builder::{
    BatchWriteBuilder, CompiledRequest, FilterBuilder, QueryBuilder, RequestOverrides,
    ScanBuilder, Table, UpdateBuilder,
};
pub use config::{PlaceholderStrategy, QueryConfig};
pub use error::{QueryError, QueryResult};
pub use expression::{Connective, Operand, PredicateKind, PredicateSpec};
