//! UpdateItem request builder.

use std::collections::BTreeMap;
use std::collections::btree_map::Entry;

use rustack_query_model::input::UpdateItemInput;
use rustack_query_model::types::ReturnValue;
use rustack_query_model::{
    AttributeValue, ExpressionAttributeNames, ExpressionAttributeValues, Key, StoreOperation,
};
use serde::Serialize;
use tracing::debug;

use super::compiled::{CompiledRequest, RequestOverrides};
use crate::error::QueryResult;
use crate::expression::{
    Connective, Expression, ExpressionTree, Operand, Placeholder, PredicateFactory, PredicateKind,
};

/// Builds an `UpdateItem` request with a `SET` expression.
///
/// Assignments render sorted by attribute name. Setting an attribute twice
/// keeps its placeholder and replaces the value.
#[derive(Debug, Clone)]
pub struct UpdateBuilder {
    table_name: String,
    factory: PredicateFactory,
    key: Key,
    assignments: BTreeMap<String, (Placeholder, AttributeValue)>,
    condition: ExpressionTree,
    attribute_names: ExpressionAttributeNames,
    return_values: Option<ReturnValue>,
}

impl UpdateBuilder {
    /// An update of an item in `table_name` with default placeholders.
    pub fn new(table_name: impl Into<String>) -> Self {
        Self::with_factory(table_name, PredicateFactory::default())
    }

    /// An update drawing placeholders from `factory`.
    pub fn with_factory(table_name: impl Into<String>, factory: PredicateFactory) -> Self {
        Self {
            table_name: table_name.into(),
            factory,
            key: Key::new(),
            assignments: BTreeMap::new(),
            condition: ExpressionTree::new(),
            attribute_names: ExpressionAttributeNames::new(),
            return_values: None,
        }
    }

    /// Identify the item by a native key map.
    pub fn key<T: Serialize + ?Sized>(mut self, key: &T) -> QueryResult<Self> {
        self.key = self.factory.marshaler().marshal_item(key)?;
        Ok(self)
    }

    /// Identify the item by an already-marshaled key.
    #[must_use]
    pub fn key_map(mut self, key: Key) -> Self {
        self.key = key;
        self
    }

    /// Assign a native value to `name`.
    pub fn set<T: Serialize + ?Sized>(
        self,
        name: impl Into<String>,
        value: &T,
    ) -> QueryResult<Self> {
        let value = self.factory.marshaler().marshal_value(value)?;
        Ok(self.set_attribute(name, value))
    }

    /// Assign an already-marshaled value to `name`.
    #[must_use]
    pub fn set_attribute(
        mut self,
        name: impl Into<String>,
        value: impl Into<AttributeValue>,
    ) -> Self {
        let value = value.into();
        match self.assignments.entry(name.into()) {
            Entry::Occupied(mut slot) => slot.get_mut().1 = value,
            Entry::Vacant(slot) => {
                let placeholder = self.factory.placeholders().next_placeholder();
                slot.insert((placeholder, value));
            }
        }
        self
    }

    /// Assign every attribute of a native map, in attribute-name order.
    pub fn set_all<T: Serialize + ?Sized>(self, values: &T) -> QueryResult<Self> {
        let values: BTreeMap<_, _> = self
            .factory
            .marshaler()
            .marshal_item(values)?
            .into_iter()
            .collect();
        Ok(values
            .into_iter()
            .fold(self, |builder, (name, value)| builder.set_attribute(name, value)))
    }

    /// Key the update by `keys` and assign every attribute of `values`.
    pub fn build_update_query<K, V>(self, keys: &K, values: &V) -> QueryResult<Self>
    where
        K: Serialize + ?Sized,
        V: Serialize + ?Sized,
    {
        self.key(keys)?.set_all(values)
    }

    /// Key the update by `key` and assign only the attributes of `after` that
    /// are new or differ from `before`. Attributes missing from `after` are
    /// left untouched.
    pub fn diff<K, B, A>(self, key: &K, before: &B, after: &A) -> QueryResult<Self>
    where
        K: Serialize + ?Sized,
        B: Serialize + ?Sized,
        A: Serialize + ?Sized,
    {
        let marshaler = self.factory.marshaler();
        let before = marshaler.marshal_item(before)?;
        let after = marshaler.marshal_item(after)?;

        let changed: BTreeMap<_, _> = after
            .into_iter()
            .filter(|(name, value)| before.get(name) != Some(value))
            .collect();

        let builder = self.key(key)?;
        Ok(changed
            .into_iter()
            .fold(builder, |builder, (name, value)| builder.set_attribute(name, value)))
    }

    /// Only apply the update when a condition holds.
    pub fn condition(
        mut self,
        connective: Connective,
        kind: PredicateKind,
        key: impl Into<String>,
        operand: Operand,
    ) -> QueryResult<Self> {
        let predicate = self.factory.create(kind, key, operand, connective)?;
        self.condition.push(predicate);
        Ok(self)
    }

    /// Replace the attribute-name alias map.
    #[must_use]
    pub fn with_attribute_names<K, V>(mut self, names: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.attribute_names = names
            .into_iter()
            .map(|(alias, name)| (alias.into(), name.into()))
            .collect();
        self
    }

    /// Choose what the store returns after the update.
    #[must_use]
    pub fn return_values(mut self, return_values: ReturnValue) -> Self {
        self.return_values = Some(return_values);
        self
    }

    /// The rendered `SET` clause, or `None` when nothing is assigned.
    #[must_use]
    pub fn update_expression(&self) -> Option<String> {
        if self.assignments.is_empty() {
            return None;
        }
        let clauses: Vec<String> = self
            .assignments
            .iter()
            .map(|(name, (placeholder, _))| format!("{name} = {placeholder}"))
            .collect();
        Some(format!("SET {}", clauses.join(", ")))
    }

    /// Snapshot the builder as a typed input.
    #[must_use]
    pub fn to_input(&self) -> UpdateItemInput {
        let mut values: ExpressionAttributeValues = self
            .assignments
            .values()
            .map(|(placeholder, value)| (placeholder.token(), value.clone()))
            .collect();
        self.condition.bind_into(&mut values);

        UpdateItemInput {
            table_name: self.table_name.clone(),
            key: self.key.clone(),
            update_expression: self.update_expression(),
            condition_expression: (!self.condition.is_empty()).then(|| self.condition.render()),
            expression_attribute_names: self.attribute_names.clone(),
            expression_attribute_values: values,
            return_values: self.return_values,
        }
    }

    /// Compile the request, merging `overrides` last.
    pub fn compile(&self, overrides: Option<&RequestOverrides>) -> QueryResult<CompiledRequest> {
        let input = self.to_input();
        debug!(
            operation = %StoreOperation::UpdateItem,
            table = %input.table_name,
            assignments = self.assignments.len(),
            bindings = input.expression_attribute_values.len(),
            "compiled request"
        );
        CompiledRequest::from_input(StoreOperation::UpdateItem, &input, overrides)
    }
}
