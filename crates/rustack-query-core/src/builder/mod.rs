//! Fluent request builders.
//!
//! Each builder owns its accumulators and compiles to a fresh
//! [`CompiledRequest`] on every call, so a builder can keep growing after a
//! compile without affecting requests already handed out.

pub mod batch_write;
pub mod compiled;
pub mod dispatch;
pub mod filter;
pub mod query;
pub mod scan;
pub mod table;
pub mod update;

pub use batch_write::BatchWriteBuilder;
pub use compiled::{CompiledRequest, RequestOverrides};
pub use dispatch::parse_call;
pub use filter::FilterBuilder;
pub use query::QueryBuilder;
pub use scan::ScanBuilder;
pub use table::Table;
pub use update::UpdateBuilder;
