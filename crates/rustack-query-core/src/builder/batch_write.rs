//! BatchWriteItem request builder.

use std::collections::HashMap;

use rustack_query_model::input::BatchWriteItemInput;
use rustack_query_model::types::WriteRequest;
use rustack_query_model::{Item, Key, Marshaler, StoreOperation};
use serde::Serialize;
use tracing::{debug, trace};

use super::compiled::{CompiledRequest, RequestOverrides};
use crate::error::QueryResult;

/// Accumulates puts and deletes grouped by table.
///
/// Writes go to the current table, set at construction and switched with
/// [`BatchWriteBuilder::table`]. Per-table order is insertion order and nothing
/// is deduplicated.
#[derive(Debug, Clone)]
pub struct BatchWriteBuilder {
    current: String,
    marshaler: Marshaler,
    tables: Vec<(String, Vec<WriteRequest>)>,
}

impl BatchWriteBuilder {
    /// A batch whose first writes go to `table_name`.
    pub fn new(table_name: impl Into<String>) -> Self {
        Self::with_marshaler(table_name, Marshaler::default())
    }

    /// A batch marshaling native values with `marshaler`.
    pub fn with_marshaler(table_name: impl Into<String>, marshaler: Marshaler) -> Self {
        Self {
            current: table_name.into(),
            marshaler,
            tables: Vec::new(),
        }
    }

    /// Direct subsequent writes to `table_name`.
    #[must_use]
    pub fn table(mut self, table_name: impl Into<String>) -> Self {
        self.current = table_name.into();
        self
    }

    /// Queue a put of a native item (any serializable map or struct).
    pub fn put<T: Serialize + ?Sized>(self, item: &T) -> QueryResult<Self> {
        let item = self.marshaler.marshal_item(item)?;
        Ok(self.put_item(item))
    }

    /// Queue a delete by a native key.
    pub fn delete<T: Serialize + ?Sized>(self, key: &T) -> QueryResult<Self> {
        let key = self.marshaler.marshal_item(key)?;
        Ok(self.delete_key(key))
    }

    /// Queue a put of an already-marshaled item.
    #[must_use]
    pub fn put_item(mut self, item: Item) -> Self {
        trace!(table = %self.current, attributes = item.len(), "queued put");
        self.push(WriteRequest::put(item));
        self
    }

    /// Queue a delete of an already-marshaled key.
    #[must_use]
    pub fn delete_key(mut self, key: Key) -> Self {
        trace!(table = %self.current, "queued delete");
        self.push(WriteRequest::delete(key));
        self
    }

    /// Total number of queued writes across all tables.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tables.iter().map(|(_, requests)| requests.len()).sum()
    }

    /// Whether nothing has been queued.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    /// Table names in first-use order.
    pub fn tables(&self) -> impl Iterator<Item = &str> {
        self.tables.iter().map(|(name, _)| name.as_str())
    }

    /// Queued writes for one table, in insertion order.
    #[must_use]
    pub fn requests(&self, table_name: &str) -> &[WriteRequest] {
        self.tables
            .iter()
            .find(|(name, _)| name == table_name)
            .map(|(_, requests)| requests.as_slice())
            .unwrap_or_default()
    }

    /// Snapshot the builder as a typed input.
    #[must_use]
    pub fn to_input(&self) -> BatchWriteItemInput {
        let request_items: HashMap<String, Vec<WriteRequest>> = self.tables.iter().cloned().collect();
        BatchWriteItemInput { request_items }
    }

    /// Compile the request, merging `overrides` last.
    pub fn compile(&self, overrides: Option<&RequestOverrides>) -> QueryResult<CompiledRequest> {
        debug!(
            operation = %StoreOperation::BatchWriteItem,
            tables = self.tables.len(),
            writes = self.len(),
            "compiled request"
        );
        CompiledRequest::from_input(StoreOperation::BatchWriteItem, &self.to_input(), overrides)
    }

    fn push(&mut self, request: WriteRequest) {
        match self.tables.iter_mut().find(|(name, _)| *name == self.current) {
            Some((_, requests)) => requests.push(request),
            None => self.tables.push((self.current.clone(), vec![request])),
        }
    }
}
