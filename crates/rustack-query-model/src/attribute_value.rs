//! DynamoDB `AttributeValue`, the tagged wire representation of a value.
//!
//! On the wire every value is a single-key object whose key names the type,
//! e.g. `{"S": "hello"}` or `{"N": "42"}`. That is exactly serde's externally
//! tagged enum layout, so the derive does the work; only binary payloads need
//! a custom codec because they travel base64-encoded.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::marshal::MarshalError;

/// DynamoDB attribute value.
///
/// Numbers are carried as strings so arbitrary precision survives the trip.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AttributeValue {
    /// String value.
    #[serde(rename = "S")]
    S(String),
    /// Number value, string-encoded.
    #[serde(rename = "N")]
    N(String),
    /// Binary value, base64 in JSON.
    #[serde(rename = "B", with = "base64_bytes")]
    B(bytes::Bytes),
    /// String set.
    #[serde(rename = "SS")]
    Ss(Vec<String>),
    /// Number set, string-encoded.
    #[serde(rename = "NS")]
    Ns(Vec<String>),
    /// Binary set, base64 in JSON.
    #[serde(rename = "BS", with = "base64_bytes_set")]
    Bs(Vec<bytes::Bytes>),
    /// Boolean value.
    #[serde(rename = "BOOL")]
    Bool(bool),
    /// Null marker. Always `true` on the wire.
    #[serde(rename = "NULL")]
    Null(bool),
    /// Ordered list of values.
    #[serde(rename = "L")]
    L(Vec<AttributeValue>),
    /// Nested map of values.
    #[serde(rename = "M")]
    M(HashMap<String, AttributeValue>),
}

impl AttributeValue {
    /// Build an `N` value from anything that formats as a number.
    #[must_use]
    pub fn number(n: impl fmt::Display) -> Self {
        Self::N(n.to_string())
    }

    /// The `NULL` value.
    #[must_use]
    pub fn null() -> Self {
        Self::Null(true)
    }

    /// The DynamoDB type descriptor, e.g. `"S"`, `"N"`, `"BOOL"`.
    #[must_use]
    pub fn type_descriptor(&self) -> &'static str {
        match self {
            Self::S(_) => "S",
            Self::N(_) => "N",
            Self::B(_) => "B",
            Self::Ss(_) => "SS",
            Self::Ns(_) => "NS",
            Self::Bs(_) => "BS",
            Self::Bool(_) => "BOOL",
            Self::Null(_) => "NULL",
            Self::L(_) => "L",
            Self::M(_) => "M",
        }
    }
}

impl fmt::Display for AttributeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = self.type_descriptor();
        match self {
            Self::S(v) | Self::N(v) => write!(f, "{{{tag}: {v}}}"),
            Self::Bool(v) | Self::Null(v) => write!(f, "{{{tag}: {v}}}"),
            Self::B(v) => write!(f, "{{{tag}: {} bytes}}", v.len()),
            Self::Ss(v) | Self::Ns(v) => write!(f, "{{{tag}: {v:?}}}"),
            Self::Bs(v) => write!(f, "{{{tag}: {} items}}", v.len()),
            Self::L(v) => write!(f, "{{{tag}: {} items}}", v.len()),
            Self::M(v) => write!(f, "{{{tag}: {} keys}}", v.len()),
        }
    }
}

impl From<&str> for AttributeValue {
    fn from(value: &str) -> Self {
        Self::S(value.to_owned())
    }
}

impl From<String> for AttributeValue {
    fn from(value: String) -> Self {
        Self::S(value)
    }
}

impl From<bool> for AttributeValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<bytes::Bytes> for AttributeValue {
    fn from(value: bytes::Bytes) -> Self {
        Self::B(value)
    }
}

impl From<Vec<u8>> for AttributeValue {
    fn from(value: Vec<u8>) -> Self {
        Self::B(bytes::Bytes::from(value))
    }
}

macro_rules! impl_from_integer {
    ($($ty:ty),* $(,)?) => {
        $(
            impl From<$ty> for AttributeValue {
                fn from(value: $ty) -> Self {
                    Self::N(value.to_string())
                }
            }
        )*
    };
}

impl_from_integer!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize);

impl TryFrom<f64> for AttributeValue {
    type Error = MarshalError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        if value.is_finite() {
            Ok(Self::N(value.to_string()))
        } else {
            Err(MarshalError::NonFiniteNumber(value))
        }
    }
}

mod base64_bytes {
    use base64::Engine;
    use base64::engine::general_purpose::STANDARD;
    use serde::{Deserialize, Deserializer, Serializer, de};

    pub(super) fn serialize<S: Serializer>(
        value: &bytes::Bytes,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&STANDARD.encode(value))
    }

    pub(super) fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<bytes::Bytes, D::Error> {
        let encoded = String::deserialize(deserializer)?;
        STANDARD
            .decode(encoded)
            .map(bytes::Bytes::from)
            .map_err(de::Error::custom)
    }
}

mod base64_bytes_set {
    use base64::Engine;
    use base64::engine::general_purpose::STANDARD;
    use serde::ser::SerializeSeq;
    use serde::{Deserialize, Deserializer, Serializer, de};

    #[allow(clippy::ptr_arg)]
    pub(super) fn serialize<S: Serializer>(
        value: &Vec<bytes::Bytes>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(value.len()))?;
        for member in value {
            seq.serialize_element(&STANDARD.encode(member))?;
        }
        seq.end()
    }

    pub(super) fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Vec<bytes::Bytes>, D::Error> {
        Vec::<String>::deserialize(deserializer)?
            .into_iter()
            .map(|encoded| {
                STANDARD
                    .decode(encoded)
                    .map(bytes::Bytes::from)
                    .map_err(de::Error::custom)
            })
            .collect()
    }
}
