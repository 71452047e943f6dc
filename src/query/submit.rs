//! Execution submission.

use tracing::{error, info};

use crate::engine::{ExecutionContext, QueryEngine};
use crate::error::Result;

/// Longest prefix of the query text that goes into the log.
const LOG_QUERY_CHARS: usize = 100;

/// Returns at most the first `LOG_QUERY_CHARS` characters of `query`.
pub fn preview(query: &str) -> &str {
    match query.char_indices().nth(LOG_QUERY_CHARS) {
        Some((idx, _)) => &query[..idx],
        None => query,
    }
}

/// Starts one execution. A rejection by the engine is returned as is; the
/// submission is never retried.
pub async fn submit_execution(
    engine: &dyn QueryEngine,
    context: &ExecutionContext,
) -> Result<String> {
    info!(
        workgroup = %context.workgroup,
        catalog = context.catalog.as_deref().unwrap_or("-"),
        database = context.database.as_deref().unwrap_or("-"),
        "Starting query execution: {}...",
        preview(&context.query)
    );

    match engine.submit(context).await {
        Ok(execution_id) => {
            info!("Query execution ID: {}", execution_id);
            Ok(execution_id)
        }
        Err(e) => {
            error!("Submission rejected: {}", e);
            Err(e)
        }
    }
}
