//! Conversion between native values and tagged DynamoDB wire values.
//!
//! Anything that implements [`serde::Serialize`] can be marshaled: it is first
//! lowered to a [`serde_json::Value`] and then mapped onto the DynamoDB type
//! system. Unmarshaling walks the opposite direction and can hand the result to
//! any [`serde::de::DeserializeOwned`] type.

use std::collections::HashMap;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Number, Value};

use crate::attribute_value::AttributeValue;
use crate::types::Item;

/// Errors produced while marshaling or unmarshaling values.
#[derive(Debug, thiserror::Error)]
pub enum MarshalError {
    /// The value could not be lowered to JSON by serde.
    #[error("failed to serialize value: {0}")]
    Serialize(#[source] serde_json::Error),

    /// The unmarshaled JSON did not fit the requested target type.
    #[error("failed to deserialize value: {0}")]
    Deserialize(#[source] serde_json::Error),

    /// An item or key must be a map of attribute names to values.
    #[error("expected a map of attributes, found {found}")]
    NotAMap {
        /// JSON kind that was found instead.
        found: &'static str,
    },

    /// NaN and infinities have no DynamoDB number representation.
    #[error("number {0} is not finite")]
    NonFiniteNumber(f64),
}

/// Converts native values to DynamoDB attribute values and back.
///
/// `wrap_numbers` controls unmarshaling only: when set, `N` values come back as
/// JSON strings so no precision is lost to `f64`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Marshaler {
    wrap_numbers: bool,
}

impl Marshaler {
    /// Create a marshaler with default options.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Keep numbers as strings when unmarshaling.
    #[must_use]
    pub fn with_wrap_numbers(mut self, wrap_numbers: bool) -> Self {
        self.wrap_numbers = wrap_numbers;
        self
    }

    /// Marshal a single value.
    pub fn marshal_value<T: Serialize + ?Sized>(
        &self,
        value: &T,
    ) -> Result<AttributeValue, MarshalError> {
        let json = serde_json::to_value(value).map_err(MarshalError::Serialize)?;
        Ok(self.marshal_json(json))
    }

    /// Marshal a value that must be a map (an item or a key).
    pub fn marshal_item<T: Serialize + ?Sized>(&self, item: &T) -> Result<Item, MarshalError> {
        match serde_json::to_value(item).map_err(MarshalError::Serialize)? {
            Value::Object(map) => Ok(map
                .into_iter()
                .map(|(name, value)| (name, self.marshal_json(value)))
                .collect()),
            other => Err(MarshalError::NotAMap {
                found: json_kind(&other),
            }),
        }
    }

    /// Map an already-lowered JSON value onto the DynamoDB type system.
    #[must_use]
    pub fn marshal_json(&self, value: Value) -> AttributeValue {
        match value {
            Value::Null => AttributeValue::null(),
            Value::Bool(b) => AttributeValue::Bool(b),
            Value::Number(n) => AttributeValue::N(n.to_string()),
            Value::String(s) => AttributeValue::S(s),
            Value::Array(list) => {
                AttributeValue::L(list.into_iter().map(|v| self.marshal_json(v)).collect())
            }
            Value::Object(map) => AttributeValue::M(
                map.into_iter()
                    .map(|(k, v)| (k, self.marshal_json(v)))
                    .collect(),
            ),
        }
    }

    /// Unmarshal a single attribute value into JSON.
    #[must_use]
    pub fn unmarshal_value(&self, value: &AttributeValue) -> Value {
        match value {
            AttributeValue::S(s) => Value::String(s.clone()),
            AttributeValue::N(n) => self.unmarshal_number(n),
            AttributeValue::B(b) => Value::String(STANDARD.encode(b)),
            AttributeValue::Ss(set) => set.iter().cloned().map(Value::String).collect(),
            AttributeValue::Ns(set) => set.iter().map(|n| self.unmarshal_number(n)).collect(),
            AttributeValue::Bs(set) => set
                .iter()
                .map(|b| Value::String(STANDARD.encode(b)))
                .collect(),
            AttributeValue::Bool(b) => Value::Bool(*b),
            AttributeValue::Null(_) => Value::Null,
            AttributeValue::L(list) => list.iter().map(|v| self.unmarshal_value(v)).collect(),
            AttributeValue::M(map) => Value::Object(self.unmarshal_map(map)),
        }
    }

    /// Unmarshal a whole item into a JSON object.
    #[must_use]
    #[allow(clippy::implicit_hasher)]
    pub fn unmarshal_item(&self, item: &HashMap<String, AttributeValue>) -> Value {
        Value::Object(self.unmarshal_map(item))
    }

    /// Unmarshal an item straight into a typed value.
    pub fn unmarshal_into<T: DeserializeOwned>(&self, item: &Item) -> Result<T, MarshalError> {
        serde_json::from_value(self.unmarshal_item(item)).map_err(MarshalError::Deserialize)
    }

    fn unmarshal_map(&self, map: &HashMap<String, AttributeValue>) -> Map<String, Value> {
        map.iter()
            .map(|(k, v)| (k.clone(), self.unmarshal_value(v)))
            .collect()
    }

    fn unmarshal_number(&self, raw: &str) -> Value {
        if self.wrap_numbers {
            return Value::String(raw.to_owned());
        }
        if let Ok(i) = raw.parse::<i64>() {
            return Value::Number(i.into());
        }
        if let Ok(u) = raw.parse::<u64>() {
            return Value::Number(u.into());
        }
        raw.parse::<f64>()
            .ok()
            .and_then(Number::from_f64)
            .map_or_else(|| Value::String(raw.to_owned()), Value::Number)
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
