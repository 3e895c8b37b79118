//! Shared DynamoDB request types and item aliases.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::attribute_value::AttributeValue;

/// A DynamoDB item: attribute names mapped to values.
pub type Item = HashMap<String, AttributeValue>;

/// A primary key: key attribute names mapped to values.
pub type Key = HashMap<String, AttributeValue>;

/// Expression attribute names (`#alias` to real attribute name).
pub type ExpressionAttributeNames = HashMap<String, String>;

/// Expression attribute values (`:placeholder` to value).
pub type ExpressionAttributeValues = HashMap<String, AttributeValue>;

/// One entry of a `BatchWriteItem` request. Exactly one side is set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct WriteRequest {
    /// A request to put an item.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub put_request: Option<PutRequest>,
    /// A request to delete an item.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delete_request: Option<DeleteRequest>,
}

impl WriteRequest {
    /// Wrap an item in a put request.
    #[must_use]
    pub fn put(item: Item) -> Self {
        Self {
            put_request: Some(PutRequest { item }),
            delete_request: None,
        }
    }

    /// Wrap a key in a delete request.
    #[must_use]
    pub fn delete(key: Key) -> Self {
        Self {
            put_request: None,
            delete_request: Some(DeleteRequest { key }),
        }
    }
}

/// A put within a `BatchWriteItem` operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PutRequest {
    /// The item attributes to put.
    pub item: Item,
}

/// A delete within a `BatchWriteItem` operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DeleteRequest {
    /// The primary key of the item to delete.
    pub key: Key,
}

/// Attributes to retrieve in a `Query` or `Scan` operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Select {
    /// All attributes of the item.
    #[default]
    AllAttributes,
    /// All projected attributes (index reads).
    AllProjectedAttributes,
    /// Only the attributes named in `ProjectionExpression`.
    SpecificAttributes,
    /// Only the number of matching items.
    Count,
}

/// What an `UpdateItem` call returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReturnValue {
    /// Nothing is returned.
    #[default]
    None,
    /// All attributes as they were before the update.
    AllOld,
    /// Updated attributes as they were before the update.
    UpdatedOld,
    /// All attributes as they are after the update.
    AllNew,
    /// Updated attributes as they are after the update.
    UpdatedNew,
}
