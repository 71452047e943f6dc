//! Query engine abstraction for athena-query.
//!
//! Provides a trait-based interface over the remote engine so the
//! orchestration logic can run against Athena or an in-memory stand-in.

mod athena;
mod mock;
mod types;

pub use athena::AthenaEngine;
pub use mock::{EngineCall, ScriptedEngine};
pub use types::{
    ExecutionContext, ExecutionState, RawRow, RawStatistics, ResultPage, StatusSnapshot,
    TableColumn, TableMetadata,
};

use crate::config::AthenaConfig;
use crate::error::Result;
use async_trait::async_trait;

/// Creates the Athena-backed engine for the given configuration.
pub async fn connect(config: &AthenaConfig) -> Result<Box<dyn QueryEngine>> {
    let engine = AthenaEngine::connect(config).await?;
    Ok(Box::new(engine))
}

/// Trait defining the operations consumed from the remote engine.
///
/// Every call is a single request/response. Implementations must not retry;
/// failures are returned to the caller as classified errors.
#[async_trait]
pub trait QueryEngine: Send + Sync {
    /// Starts an execution and returns its identifier.
    async fn submit(&self, context: &ExecutionContext) -> Result<String>;

    /// Fetches the current status of an execution.
    async fn get_status(&self, execution_id: &str) -> Result<StatusSnapshot>;

    /// Fetches the first page of results, at most `max_rows` raw rows.
    async fn get_results(&self, execution_id: &str, max_rows: u32) -> Result<ResultPage>;

    /// Asks the engine to stop an execution.
    async fn cancel(&self, execution_id: &str) -> Result<()>;

    /// Lists data catalog names.
    async fn list_catalogs(&self) -> Result<Vec<String>>;

    /// Lists database names in a catalog.
    async fn list_databases(&self, catalog: &str) -> Result<Vec<String>>;

    /// Lists table names in a database.
    async fn list_tables(&self, catalog: &str, database: &str) -> Result<Vec<String>>;

    /// Describes one table.
    async fn get_table_metadata(
        &self,
        catalog: &str,
        database: &str,
        table: &str,
    ) -> Result<TableMetadata>;
}
