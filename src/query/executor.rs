//! Query orchestration.
//!
//! Runs one request end to end: normalize, submit, poll, decode. Whatever
//! happens along the way, the caller gets a `QueryResults` back.

use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::config::AthenaConfig;
use crate::engine::{ExecutionState, QueryEngine};
use crate::error::{AthenaError, Result};

use super::decoder::{decode_page, extract_statistics};
use super::poller::{PollOutcome, StatusPoller};
use super::submit::{preview, submit_execution};
use super::{QueryRequest, QueryResults, QueryStatus};

/// Reason reported when the caller abandons a query before it finishes.
const ABANDONED_REASON: &str = "Query cancelled by caller before completion";

/// Executes queries against an engine using read-only defaults.
pub struct QueryExecutor<'a> {
    engine: &'a dyn QueryEngine,
    config: &'a AthenaConfig,
}

impl<'a> QueryExecutor<'a> {
    /// Creates a new query executor.
    pub fn new(engine: &'a dyn QueryEngine, config: &'a AthenaConfig) -> Self {
        Self { engine, config }
    }

    /// Executes a query and waits for its results.
    pub async fn execute(&self, request: &QueryRequest) -> QueryResults {
        self.execute_with_cancel(request, &CancellationToken::new())
            .await
    }

    /// Executes a query, giving up early when `cancel` fires.
    ///
    /// On cancellation a best-effort stop request is sent to the engine and
    /// the result is reported as CANCELLED.
    pub async fn execute_with_cancel(
        &self,
        request: &QueryRequest,
        cancel: &CancellationToken,
    ) -> QueryResults {
        let context = match request.normalize(self.config) {
            Ok(context) => context,
            Err(e) => return self.classify("", e),
        };

        if cancel.is_cancelled() {
            return self.classify("", abandoned());
        }

        let execution_id = match submit_execution(self.engine, &context).await {
            Ok(id) => id,
            Err(e) => return self.classify("", e),
        };

        match self.complete(&execution_id, request, cancel).await {
            Ok(results) => results,
            Err(e) => self.classify(&execution_id, e),
        }
    }

    /// Waits for a submitted execution and turns its terminal state into a
    /// result.
    async fn complete(
        &self,
        execution_id: &str,
        request: &QueryRequest,
        cancel: &CancellationToken,
    ) -> Result<QueryResults> {
        let max_wait = Duration::from_secs(request.max_wait_seconds);
        let outcome = StatusPoller::new(self.engine)
            .wait(execution_id, max_wait, cancel)
            .await?;

        let snapshot = match outcome {
            PollOutcome::Finished(snapshot) => snapshot,
            PollOutcome::TimedOut { last_state, polls } => {
                warn!(
                    "Execution {} still {:?} after {} polls",
                    execution_id, last_state, polls
                );
                if self.config.cancel_on_timeout {
                    self.stop(execution_id).await;
                }
                return Err(AthenaError::Timeout {
                    limit_secs: request.max_wait_seconds,
                });
            }
            PollOutcome::Abandoned => {
                self.stop(execution_id).await;
                return Err(abandoned());
            }
        };

        let statistics = extract_statistics(snapshot.statistics.as_ref());

        if snapshot.state != ExecutionState::Succeeded {
            let failure = AthenaError::QueryFailure {
                status: snapshot.state.as_status(),
                reason: snapshot.reason,
            };
            info!("Execution {} ended {}: {}", execution_id, failure.status(), failure);
            return Ok(QueryResults::from_error(execution_id, &failure).with_statistics(statistics));
        }

        let page = self
            .engine
            .get_results(execution_id, request.max_results)
            .await?;
        if page.next_token.is_some() {
            debug!(
                "Execution {} has more rows than max_results={}; returning the first page only",
                execution_id, request.max_results
            );
        }

        let decoded = decode_page(&page, request.max_results as usize);
        info!(
            "Execution {} succeeded with {} rows",
            execution_id,
            decoded.rows.len()
        );

        Ok(QueryResults::succeeded(
            execution_id,
            statistics,
            decoded.columns,
            decoded.rows,
        ))
    }

    /// Best-effort stop. Failures are logged and otherwise ignored.
    async fn stop(&self, execution_id: &str) {
        match self.engine.cancel(execution_id).await {
            Ok(()) => info!("Requested stop of execution {}", execution_id),
            Err(e) => warn!("Failed to stop execution {}: {}", execution_id, e),
        }
    }

    /// Logs the error by kind and renders it into the result shape.
    fn classify(&self, execution_id: &str, err: AthenaError) -> QueryResults {
        match &err {
            AthenaError::Validation(_) => warn!("Rejected request: {}", err),
            AthenaError::Timeout { .. } => warn!("Execution {}: {}", execution_id, err),
            AthenaError::QueryFailure { .. } => info!("Execution {}: {}", execution_id, err),
            AthenaError::Transport(_) => error!("{}: {}", err.category(), err),
            AthenaError::Config(_) | AthenaError::Internal(_) => {
                error!("Error executing query: {}", err)
            }
        }
        QueryResults::from_error(execution_id, &err)
    }
}

fn abandoned() -> AthenaError {
    AthenaError::QueryFailure {
        status: QueryStatus::Cancelled,
        reason: Some(ABANDONED_REASON.to_string()),
    }
}

/// Convenience wrapper for one-off queries.
pub async fn execute_query(
    engine: &dyn QueryEngine,
    config: &AthenaConfig,
    request: &QueryRequest,
) -> QueryResults {
    debug!("execute_query({}...)", preview(&request.query));
    QueryExecutor::new(engine, config).execute(request).await
}
