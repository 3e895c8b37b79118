//! Scan request builder.

use rustack_query_model::input::ScanInput;
use rustack_query_model::types::Select;
use rustack_query_model::{ExpressionAttributeNames, Key, StoreOperation};
use tracing::debug;

use super::compiled::{CompiledRequest, RequestOverrides};
use super::filter::FilterBuilder;
use crate::error::QueryResult;
use crate::expression::{Expression, ExpressionTree, PredicateFactory};

/// Builds a `Scan` request from filter verbs.
#[derive(Debug, Clone)]
pub struct ScanBuilder {
    table_name: String,
    index_name: Option<String>,
    factory: PredicateFactory,
    filter: ExpressionTree,
    attribute_names: ExpressionAttributeNames,
    projection: Option<String>,
    limit: Option<i32>,
    select: Option<Select>,
    consistent_read: Option<bool>,
    start_key: Key,
}

impl ScanBuilder {
    /// A scan of `table_name` with default placeholders.
    pub fn new(table_name: impl Into<String>) -> Self {
        Self::with_factory(table_name, PredicateFactory::default())
    }

    /// A scan of `table_name` drawing placeholders from `factory`.
    pub fn with_factory(table_name: impl Into<String>, factory: PredicateFactory) -> Self {
        Self {
            table_name: table_name.into(),
            index_name: None,
            factory,
            filter: ExpressionTree::new(),
            attribute_names: ExpressionAttributeNames::new(),
            projection: None,
            limit: None,
            select: None,
            consistent_read: None,
            start_key: Key::new(),
        }
    }

    /// Scan a secondary index instead of the base table.
    #[must_use]
    pub fn index(mut self, index_name: impl Into<String>) -> Self {
        self.index_name = Some(index_name.into());
        self
    }

    /// Only return the listed attributes.
    #[must_use]
    pub fn projection(mut self, expression: impl Into<String>) -> Self {
        self.projection = Some(expression.into());
        self
    }

    /// Evaluate at most `limit` items.
    #[must_use]
    pub fn limit(mut self, limit: i32) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Choose which attributes come back.
    #[must_use]
    pub fn select(mut self, select: Select) -> Self {
        self.select = Some(select);
        self
    }

    /// Request a strongly consistent read.
    #[must_use]
    pub fn consistent_read(mut self, consistent: bool) -> Self {
        self.consistent_read = Some(consistent);
        self
    }

    /// Resume from the `LastEvaluatedKey` of a previous page.
    #[must_use]
    pub fn start_key(mut self, key: Key) -> Self {
        self.start_key = key;
        self
    }

    /// The table this scan reads.
    #[must_use]
    pub fn table_name(&self) -> &str {
        &self.table_name
    }

    /// Snapshot the builder as a typed input.
    #[must_use]
    pub fn to_input(&self) -> ScanInput {
        let (filter_expression, expression_attribute_values) = if self.filter.is_empty() {
            (None, Default::default())
        } else {
            (Some(self.filter.render()), self.filter.bindings())
        };

        ScanInput {
            table_name: self.table_name.clone(),
            index_name: self.index_name.clone(),
            filter_expression,
            projection_expression: self.projection.clone(),
            expression_attribute_names: self.attribute_names.clone(),
            expression_attribute_values,
            limit: self.limit,
            select: self.select,
            consistent_read: self.consistent_read,
            exclusive_start_key: self.start_key.clone(),
            ..Default::default()
        }
    }

    /// Compile the request, merging `overrides` last.
    pub fn compile(&self, overrides: Option<&RequestOverrides>) -> QueryResult<CompiledRequest> {
        let input = self.to_input();
        debug!(
            operation = %StoreOperation::Scan,
            table = %input.table_name,
            bindings = input.expression_attribute_values.len(),
            "compiled request"
        );
        CompiledRequest::from_input(StoreOperation::Scan, &input, overrides)
    }
}

impl FilterBuilder for ScanBuilder {
    fn factory(&self) -> &PredicateFactory {
        &self.factory
    }

    fn filter_tree(&self) -> &ExpressionTree {
        &self.filter
    }

    fn filter_tree_mut(&mut self) -> &mut ExpressionTree {
        &mut self.filter
    }

    fn attribute_names_mut(&mut self) -> &mut ExpressionAttributeNames {
        &mut self.attribute_names
    }

    fn branch(&self) -> Self {
        let mut branch = Self::with_factory(self.table_name.clone(), self.factory.clone());
        branch.index_name.clone_from(&self.index_name);
        branch
    }
}
