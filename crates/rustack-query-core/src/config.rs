//! Query compiler configuration.

use std::env;
use std::str::FromStr;

use rustack_query_model::Marshaler;

use crate::error::{QueryError, QueryResult};

/// How value placeholders are named.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlaceholderStrategy {
    /// `:p1`, `:p2`, ... from a counter shared by one request.
    #[default]
    Sequential,
    /// `:p` followed by 32 random hex digits (UUID v4).
    Random,
}

impl FromStr for PlaceholderStrategy {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "sequential" | "counter" => Ok(Self::Sequential),
            "random" | "uuid" => Ok(Self::Random),
            other => Err(QueryError::Config(format!(
                "unknown placeholder strategy: {other}"
            ))),
        }
    }
}

/// Configuration shared by every builder created from one [`crate::Table`].
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryConfig {
    /// Prefix of generated placeholder names (without the leading `:`).
    pub placeholder_prefix: String,
    /// Placeholder naming strategy.
    pub placeholder_strategy: PlaceholderStrategy,
    /// Unmarshal numbers as strings instead of JSON numbers.
    pub wrap_numbers: bool,
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            placeholder_prefix: "p".to_owned(),
            placeholder_strategy: PlaceholderStrategy::Sequential,
            wrap_numbers: false,
        }
    }
}

impl QueryConfig {
    /// Load configuration from environment variables, falling back to defaults.
    pub fn from_env() -> QueryResult<Self> {
        let mut config = Self::default();

        if let Ok(v) = env::var("QUERY_PLACEHOLDER_PREFIX") {
            config.placeholder_prefix = v;
        }
        if let Ok(v) = env::var("QUERY_PLACEHOLDER_STRATEGY") {
            config.placeholder_strategy = v.parse()?;
        }
        config.wrap_numbers = env_bool("QUERY_WRAP_NUMBERS", config.wrap_numbers);

        config.validate()?;
        Ok(config)
    }

    /// Check that generated placeholders will be valid DynamoDB tokens.
    pub fn validate(&self) -> QueryResult<()> {
        let prefix = &self.placeholder_prefix;
        if prefix.is_empty() {
            return Err(QueryError::Config(
                "placeholder prefix must not be empty".to_owned(),
            ));
        }
        if !prefix.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
            return Err(QueryError::Config(format!(
                "placeholder prefix {prefix:?} may only contain ASCII letters, digits and '_'"
            )));
        }
        Ok(())
    }

    /// The marshaler matching this configuration.
    #[must_use]
    pub fn marshaler(&self) -> Marshaler {
        Marshaler::new().with_wrap_numbers(self.wrap_numbers)
    }
}

fn env_bool(key: &str, default: bool) -> bool {
    env::var(key).map_or(default, |v| {
        matches!(v.as_str(), "1" | "true" | "yes" | "TRUE" | "YES")
    })
}
