//! End-to-end tests for rustack-query.
//!
//! Each module builds requests through the public API and asserts the exact
//! JSON body a DynamoDB client would send. No store is involved.
//!
//! Run them with:
//! ```text
//! cargo test -p rustack-query-integration
//! ```

use std::sync::Once;

use rustack_query_core::{QueryConfig, Table};

static INIT: Once = Once::new();

/// Initialize tracing (once).
fn init_tracing() {
    INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
            )
            .with_test_writer()
            .init();
    });
}

/// Generate a unique table name for a test.
#[must_use]
pub fn test_table_name(prefix: &str) -> String {
    let id = uuid::Uuid::new_v4().to_string()[..8].to_owned();
    format!("test-{prefix}-{id}")
}

/// A table with the default configuration.
#[must_use]
pub fn test_table(name: &str) -> Table {
    init_tracing();
    Table::new(name)
}

/// A table with an explicit configuration.
pub fn configured_table(name: &str, config: QueryConfig) -> rustack_query_core::QueryResult<Table> {
    init_tracing();
    Table::new(name).with_config(config)
}

mod test_batch_write;
mod test_query;
mod test_scan;
mod test_update;
