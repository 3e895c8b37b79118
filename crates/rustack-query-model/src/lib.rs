//! DynamoDB request model types for rustack-query.
//!
//! This crate holds the wire-level shapes produced by the expression compiler:
//! the tagged [`AttributeValue`] union, the request inputs for the four
//! supported operations, and the [`Marshaler`] that converts native values into
//! tagged wire values and back. Everything serializes with `PascalCase` keys so
//! a compiled request can be handed to any DynamoDB client as-is.
// "DynamoDB" appears in virtually every doc comment in this crate.
#![allow(clippy::doc_markdown)]
#![allow(clippy::module_name_repetitions)]

pub mod attribute_value;
pub mod input;
pub mod marshal;
pub mod operations;
pub mod types;

pub use attribute_value::AttributeValue;
pub use marshal::{MarshalError, Marshaler};
pub use operations::StoreOperation;
pub use types::{ExpressionAttributeNames, ExpressionAttributeValues, Item, Key};
