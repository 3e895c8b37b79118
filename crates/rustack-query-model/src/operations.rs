//! The DynamoDB operations a compiled request can target.

use std::fmt;

/// Store operations produced by the request builders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreOperation {
    /// Read every item of a table or index, filtered.
    Scan,
    /// Read items by key condition, filtered.
    Query,
    /// Modify attributes of one item.
    UpdateItem,
    /// Put or delete many items across tables.
    BatchWriteItem,
}

impl StoreOperation {
    /// Returns the AWS operation name, as used in the `X-Amz-Target` header.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Scan => "Scan",
            Self::Query => "Query",
            Self::UpdateItem => "UpdateItem",
            Self::BatchWriteItem => "BatchWriteItem",
        }
    }

    /// The full `X-Amz-Target` header value for this operation.
    #[must_use]
    pub fn target(&self) -> String {
        format!("DynamoDB_20120810.{}", self.as_str())
    }
}

impl fmt::Display for StoreOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
