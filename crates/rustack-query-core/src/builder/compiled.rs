//! Compiled request snapshots.

use rustack_query_model::StoreOperation;
use serde::de::DeserializeOwned;
use serde::{Serialize, Serializer};
use serde_json::{Map, Value};

use crate::error::{QueryError, QueryResult};

/// Caller-supplied top-level fields merged into a compiled request.
///
/// Keys are wire names (`Limit`, `ProjectionExpression`, ...). On collision the
/// override wins.
pub type RequestOverrides = Map<String, Value>;

/// An immutable, wire-ready request body for one store operation.
///
/// Serializes as the bare request body; the operation travels separately, as
/// the `X-Amz-Target` header would.
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledRequest {
    operation: StoreOperation,
    body: Map<String, Value>,
}

impl CompiledRequest {
    pub(crate) fn from_input<T: Serialize>(
        operation: StoreOperation,
        input: &T,
        overrides: Option<&RequestOverrides>,
    ) -> QueryResult<Self> {
        let mut body = match serde_json::to_value(input).map_err(QueryError::Encode)? {
            Value::Object(map) => map,
            // Inputs are structs and always serialize to objects.
            _ => Map::new(),
        };
        if let Some(overrides) = overrides {
            body.extend(overrides.iter().map(|(k, v)| (k.clone(), v.clone())));
        }
        Ok(Self { operation, body })
    }

    /// The operation this request targets.
    #[must_use]
    pub fn operation(&self) -> StoreOperation {
        self.operation
    }

    /// The `X-Amz-Target` header value for this request.
    #[must_use]
    pub fn target(&self) -> String {
        self.operation.target()
    }

    /// The top-level request fields.
    #[must_use]
    pub fn body(&self) -> &Map<String, Value> {
        &self.body
    }

    /// A single top-level field.
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.body.get(field)
    }

    /// `TableName`, absent for batch writes.
    #[must_use]
    pub fn table_name(&self) -> Option<&str> {
        self.str_field("TableName")
    }

    /// `IndexName`, when an index was selected.
    #[must_use]
    pub fn index_name(&self) -> Option<&str> {
        self.str_field("IndexName")
    }

    /// `FilterExpression`, absent when no predicate was added.
    #[must_use]
    pub fn filter_expression(&self) -> Option<&str> {
        self.str_field("FilterExpression")
    }

    /// `KeyConditionExpression` of a query.
    #[must_use]
    pub fn key_condition_expression(&self) -> Option<&str> {
        self.str_field("KeyConditionExpression")
    }

    /// `UpdateExpression` of an update.
    #[must_use]
    pub fn update_expression(&self) -> Option<&str> {
        self.str_field("UpdateExpression")
    }

    /// Encode the request body as a JSON string.
    pub fn to_json(&self) -> QueryResult<String> {
        serde_json::to_string(&self.body).map_err(QueryError::Encode)
    }

    /// The request body as a JSON value.
    #[must_use]
    pub fn into_value(self) -> Value {
        Value::Object(self.body)
    }

    /// Decode the body into a typed input such as
    /// [`rustack_query_model::input::ScanInput`].
    ///
    /// Override fields the input type does not know are dropped.
    pub fn into_input<T: DeserializeOwned>(self) -> QueryResult<T> {
        serde_json::from_value(Value::Object(self.body)).map_err(QueryError::Encode)
    }

    fn str_field(&self, field: &str) -> Option<&str> {
        self.body.get(field).and_then(Value::as_str)
    }
}

impl Serialize for CompiledRequest {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.body.serialize(serializer)
    }
}
