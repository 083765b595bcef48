//! Polls a running task until it settles or the budget runs out.

use std::sync::Arc;
use std::time::Duration;

use super::classify::Disposition;
use super::clock::Clock;
use super::lifecycle::AgentClient;
use super::result::SendMessageResult;
use super::settings::{millis, TimeoutBudget};
use super::translate::ResultTranslator;
use crate::error::{A2AError, A2AResult};
use crate::types::TaskState;

/// Re-queries a task with `tasks/get` at a fixed interval.
#[derive(Debug, Clone)]
pub struct TaskStatusPoller {
    clock: Arc<dyn Clock>,
    translator: ResultTranslator,
}

impl TaskStatusPoller {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            clock,
            translator: ResultTranslator::new(),
        }
    }

    /// Poll `task_id` until its state is final.
    ///
    /// Queries immediately, then sleeps `poll_interval` (clipped to the time
    /// left) between queries. No query is issued once `timeout` has elapsed.
    ///
    /// # Errors
    ///
    /// - [`A2AError::PollingTimeout`] when `timeout` runs out first
    /// - query failures, wrapped with the task id
    /// - classification failures for the polled task
    pub async fn poll(
        &self,
        task_id: &str,
        client: &dyn AgentClient,
        poll_interval: Duration,
        timeout: Duration,
    ) -> A2AResult<SendMessageResult> {
        let budget = TimeoutBudget::start(self.clock.now(), timeout);
        self.poll_within(task_id, client, poll_interval, budget).await
    }

    /// Like [`poll`](Self::poll), but spends an already running `budget`.
    ///
    /// A [`A2AError::PollingTimeout`] reports time elapsed since the budget
    /// started, not since polling started.
    pub async fn poll_within(
        &self,
        task_id: &str,
        client: &dyn AgentClient,
        poll_interval: Duration,
        budget: TimeoutBudget,
    ) -> A2AResult<SendMessageResult> {
        let mut last_state: Option<TaskState> = None;
        let mut queries: u32 = 0;

        loop {
            let now = self.clock.now();
            let Some(remaining) = budget.remaining(now) else {
                return Err(self.timed_out(task_id, last_state, &budget));
            };

            queries += 1;
            let task = match tokio::time::timeout(remaining, client.get_task(task_id)).await {
                Ok(task) => task.map_err(|e| e.context(format!("failed to poll task {task_id}")))?,
                Err(_) => return Err(self.timed_out(task_id, last_state, &budget)),
            };

            let state = task.status.state;
            tracing::debug!(task_id, %state, queries, "polled task");
            last_state = Some(state);

            let result = self.translator.translate_task(task)?;
            if result.disposition() == Disposition::Final {
                tracing::debug!(task_id, %state, queries, "task settled");
                return Ok(result);
            }

            let Some(remaining) = budget.remaining(self.clock.now()) else {
                return Err(self.timed_out(task_id, last_state, &budget));
            };
            self.clock.sleep(poll_interval.min(remaining)).await;
        }
    }

    fn timed_out(
        &self,
        task_id: &str,
        last_state: Option<TaskState>,
        budget: &TimeoutBudget,
    ) -> A2AError {
        let elapsed_ms = millis(budget.elapsed(self.clock.now()));
        tracing::warn!(task_id, ?last_state, elapsed_ms, "gave up polling task");
        A2AError::PollingTimeout {
            task_id: task_id.to_string(),
            last_state,
            elapsed_ms,
        }
    }
}
