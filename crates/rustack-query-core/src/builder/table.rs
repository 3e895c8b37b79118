//! Entry point binding a table, an optional index and a configuration.

use crate::config::QueryConfig;
use crate::error::QueryResult;
use crate::expression::{PlaceholderGenerator, PredicateFactory};

use super::batch_write::BatchWriteBuilder;
use super::query::QueryBuilder;
use super::scan::ScanBuilder;
use super::update::UpdateBuilder;

/// Creates request builders for one table.
///
/// Every builder draws from one placeholder sequence owned by the table, so a
/// scan can embed another scan from the same table as a sub-query without its
/// placeholders clashing. Clones of a `Table` share that sequence too.
///
/// ```
/// use rustack_query_core::{FilterBuilder, Table};
///
/// let request = Table::new("games")
///     .scan()
///     .eq("id", 2)?
///     .or_begins_with("game", "C")?
///     .compile(None)?;
/// assert_eq!(request.filter_expression(), Some("(id = :p1 or begins_with(game, :p2))"));
/// # Ok::<(), rustack_query_core::QueryError>(())
/// ```
#[derive(Debug, Clone)]
pub struct Table {
    name: String,
    index: Option<String>,
    config: QueryConfig,
    placeholders: PlaceholderGenerator,
}

impl Table {
    /// A table with the default configuration.
    pub fn new(name: impl Into<String>) -> Self {
        let config = QueryConfig::default();
        Self {
            name: name.into(),
            index: None,
            placeholders: PlaceholderGenerator::new(&config),
            config,
        }
    }

    /// A table configured from the environment.
    pub fn from_env(name: impl Into<String>) -> QueryResult<Self> {
        Self::new(name).with_config(QueryConfig::from_env()?)
    }

    /// Use `config` for every builder created afterwards. This starts a new
    /// placeholder sequence.
    pub fn with_config(mut self, config: QueryConfig) -> QueryResult<Self> {
        config.validate()?;
        self.placeholders = PlaceholderGenerator::new(&config);
        self.config = config;
        Ok(self)
    }

    /// Target a secondary index in scans and queries.
    #[must_use]
    pub fn with_index(mut self, index: impl Into<String>) -> Self {
        self.index = Some(index.into());
        self
    }

    /// The table name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The active configuration.
    #[must_use]
    pub fn config(&self) -> &QueryConfig {
        &self.config
    }

    /// A new scan of this table.
    #[must_use]
    pub fn scan(&self) -> ScanBuilder {
        let scan = ScanBuilder::with_factory(self.name.clone(), self.factory());
        match &self.index {
            Some(index) => scan.index(index.clone()),
            None => scan,
        }
    }

    /// A new query of this table.
    #[must_use]
    pub fn query(&self) -> QueryBuilder {
        let query = QueryBuilder::with_factory(self.name.clone(), self.factory());
        match &self.index {
            Some(index) => query.index(index.clone()),
            None => query,
        }
    }

    /// A new batch write whose first writes target this table.
    #[must_use]
    pub fn batch_write(&self) -> BatchWriteBuilder {
        BatchWriteBuilder::with_marshaler(self.name.clone(), self.config.marshaler())
    }

    /// A new item update on this table.
    #[must_use]
    pub fn update(&self) -> UpdateBuilder {
        UpdateBuilder::with_factory(self.name.clone(), self.factory())
    }

    fn factory(&self) -> PredicateFactory {
        PredicateFactory::new(self.placeholders.clone(), self.config.marshaler())
    }
}
