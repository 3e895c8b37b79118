//! Query request builder.

use rustack_query_model::input::QueryInput;
use rustack_query_model::types::Select;
use rustack_query_model::{
    AttributeValue, ExpressionAttributeNames, ExpressionAttributeValues, Key, StoreOperation,
};
use tracing::debug;

use super::compiled::{CompiledRequest, RequestOverrides};
use super::filter::FilterBuilder;
use crate::error::{QueryError, QueryResult};
use crate::expression::{
    Connective, Expression, ExpressionTree, Operand, PredicateFactory, PredicateKind,
};

/// Builds a `Query` request: a key condition plus the usual filter verbs.
///
/// Key conditions are always joined by `and`, since the store accepts nothing
/// else there. Key-condition and filter placeholders come from one sequence and
/// end up in the same `ExpressionAttributeValues` map.
#[derive(Debug, Clone)]
pub struct QueryBuilder {
    table_name: String,
    index_name: Option<String>,
    factory: PredicateFactory,
    key_condition: ExpressionTree,
    filter: ExpressionTree,
    attribute_names: ExpressionAttributeNames,
    projection: Option<String>,
    limit: Option<i32>,
    select: Option<Select>,
    consistent_read: Option<bool>,
    scan_index_forward: Option<bool>,
    start_key: Key,
}

impl QueryBuilder {
    /// A query of `table_name` with default placeholders.
    pub fn new(table_name: impl Into<String>) -> Self {
        Self::with_factory(table_name, PredicateFactory::default())
    }

    /// A query of `table_name` drawing placeholders from `factory`.
    pub fn with_factory(table_name: impl Into<String>, factory: PredicateFactory) -> Self {
        Self {
            table_name: table_name.into(),
            index_name: None,
            factory,
            key_condition: ExpressionTree::new(),
            filter: ExpressionTree::new(),
            attribute_names: ExpressionAttributeNames::new(),
            projection: None,
            limit: None,
            select: None,
            consistent_read: None,
            scan_index_forward: None,
            start_key: Key::new(),
        }
    }

    /// Query a secondary index instead of the base table.
    #[must_use]
    pub fn index(mut self, index_name: impl Into<String>) -> Self {
        self.index_name = Some(index_name.into());
        self
    }

    /// Append a key condition. Only `Eq`, `Lt`, `LtEq`, `Gt`, `GtEq` and
    /// `BeginsWith` are valid here.
    pub fn key_condition(
        mut self,
        kind: PredicateKind,
        key: impl Into<String>,
        value: impl Into<AttributeValue>,
    ) -> QueryResult<Self> {
        if !matches!(
            kind,
            PredicateKind::Eq
                | PredicateKind::Lt
                | PredicateKind::LtEq
                | PredicateKind::Gt
                | PredicateKind::GtEq
                | PredicateKind::BeginsWith
        ) {
            return Err(QueryError::UnsupportedOperation {
                name: format!("key{}", kind.name()),
            });
        }
        let predicate =
            self.factory
                .create(kind, key, Operand::scalar(value), Connective::And)?;
        self.key_condition.push(predicate);
        Ok(self)
    }

    /// Key condition `key = value`.
    pub fn key_eq(
        self,
        key: impl Into<String>,
        value: impl Into<AttributeValue>,
    ) -> QueryResult<Self> {
        self.key_condition(PredicateKind::Eq, key, value)
    }

    /// Key condition `key < value`.
    pub fn key_lt(
        self,
        key: impl Into<String>,
        value: impl Into<AttributeValue>,
    ) -> QueryResult<Self> {
        self.key_condition(PredicateKind::Lt, key, value)
    }

    /// Key condition `key <= value`.
    pub fn key_lt_eq(
        self,
        key: impl Into<String>,
        value: impl Into<AttributeValue>,
    ) -> QueryResult<Self> {
        self.key_condition(PredicateKind::LtEq, key, value)
    }

    /// Key condition `key > value`.
    pub fn key_gt(
        self,
        key: impl Into<String>,
        value: impl Into<AttributeValue>,
    ) -> QueryResult<Self> {
        self.key_condition(PredicateKind::Gt, key, value)
    }

    /// Key condition `key >= value`.
    pub fn key_gt_eq(
        self,
        key: impl Into<String>,
        value: impl Into<AttributeValue>,
    ) -> QueryResult<Self> {
        self.key_condition(PredicateKind::GtEq, key, value)
    }

    /// Key condition `begins_with(key, value)`.
    pub fn key_begins_with(
        self,
        key: impl Into<String>,
        value: impl Into<AttributeValue>,
    ) -> QueryResult<Self> {
        self.key_condition(PredicateKind::BeginsWith, key, value)
    }

    /// Read the index in descending order.
    #[must_use]
    pub fn descending(mut self) -> Self {
        self.scan_index_forward = Some(false);
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

    /// The key-condition tree.
    #[must_use]
    pub fn key_condition_tree(&self) -> &ExpressionTree {
        &self.key_condition
    }

    /// Snapshot the builder as a typed input.
    #[must_use]
    pub fn to_input(&self) -> QueryInput {
        let mut values = self.key_condition.bindings();
        self.filter.bind_into(&mut values);

        QueryInput {
            table_name: self.table_name.clone(),
            index_name: self.index_name.clone(),
            key_condition_expression: non_empty(&self.key_condition),
            filter_expression: non_empty(&self.filter),
            projection_expression: self.projection.clone(),
            expression_attribute_names: self.attribute_names.clone(),
            expression_attribute_values: values,
            scan_index_forward: self.scan_index_forward,
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
            operation = %StoreOperation::Query,
            table = %input.table_name,
            bindings = input.expression_attribute_values.len(),
            "compiled request"
        );
        CompiledRequest::from_input(StoreOperation::Query, &input, overrides)
    }
}

fn non_empty(tree: &ExpressionTree) -> Option<String> {
    (!tree.is_empty()).then(|| tree.render())
}

impl FilterBuilder for QueryBuilder {
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

    fn bound_values(&self) -> ExpressionAttributeValues {
        let mut values = self.key_condition.bindings();
        self.filter.bind_into(&mut values);
        values
    }
}
