//! Status polling with a wall-clock deadline.
//!
//! The wait between polls is a timer suspension, so many executions can be
//! polled concurrently on one runtime thread.

use std::time::Duration;

use tokio::time::{sleep, Instant};
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::engine::{ExecutionState, QueryEngine, StatusSnapshot};
use crate::error::Result;

/// Delay between two status fetches.
pub const POLL_INTERVAL: Duration = Duration::from_secs(1);

/// How a wait ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollOutcome {
    /// The engine reported a terminal state.
    Finished(StatusSnapshot),
    /// The deadline passed while the execution was still pending.
    TimedOut {
        last_state: Option<ExecutionState>,
        polls: usize,
    },
    /// The caller's cancellation token fired first.
    Abandoned,
}

/// Polls one execution until it finishes, the deadline passes, or the
/// caller gives up.
pub struct StatusPoller<'a> {
    engine: &'a dyn QueryEngine,
}

impl<'a> StatusPoller<'a> {
    pub fn new(engine: &'a dyn QueryEngine) -> Self {
        Self { engine }
    }

    /// Waits for `execution_id` to leave QUEUED/RUNNING.
    ///
    /// The deadline is checked before every wait, so an execution is given
    /// at least `max_wait` before it is declared timed out. A failed status
    /// fetch ends the wait immediately with that error.
    pub async fn wait(
        &self,
        execution_id: &str,
        max_wait: Duration,
        cancel: &CancellationToken,
    ) -> Result<PollOutcome> {
        let start = Instant::now();
        let mut last_state = None;
        let mut polls = 0;

        loop {
            if start.elapsed() >= max_wait {
                return Ok(PollOutcome::TimedOut { last_state, polls });
            }

            tokio::select! {
                biased;

                _ = cancel.cancelled() => return Ok(PollOutcome::Abandoned),
                _ = sleep(POLL_INTERVAL) => {}
            }

            let snapshot = self.engine.get_status(execution_id).await?;
            polls += 1;
            debug!(
                "Poll {} for {}: {:?} after {:?}",
                polls,
                execution_id,
                snapshot.state,
                start.elapsed()
            );

            if !snapshot.state.is_pending() {
                return Ok(PollOutcome::Finished(snapshot));
            }
            last_state = Some(snapshot.state);
        }
    }
}
