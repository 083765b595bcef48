//! Sends one message to one agent and returns exactly one final result.
//!
//! The flow for a single send:
//!
//! 1. validate settings and build the wire message
//! 2. open a client bound to a fresh [`EventSink`]
//! 3. hand the message to the client
//! 4. wait for the first event, within the total budget
//! 5. poll with `tasks/get` while the task is still running, within what is
//!    left of the same budget
//! 6. close the client, whatever happened
//!
//! [`EventSink`]: super::awaiter::EventSink

use std::fmt;
use std::sync::Arc;

use super::awaiter::{pending_result, PendingResult, ResultAwaiter};
use super::classify::Disposition;
use super::clock::{Clock, TokioClock};
use super::lifecycle::{AgentClient, ClientFactory, ManagedClient};
use super::outbound::OutboundMessage;
use super::poller::TaskStatusPoller;
use super::result::SendMessageResult;
use super::settings::{millis, CompletionSettings, TimeoutBudget};
use super::translate::ResultTranslator;
use crate::error::{A2AError, A2AResult};
use crate::types::{AgentCard, Message};

/// Where a send currently is. Used for tracing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchPhase {
    Dispatched,
    AwaitingFirstResponse,
    Polling,
    Resolved,
    Failed,
}

impl fmt::Display for DispatchPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DispatchPhase::Dispatched => "dispatched",
            DispatchPhase::AwaitingFirstResponse => "awaiting-first-response",
            DispatchPhase::Polling => "polling",
            DispatchPhase::Resolved => "resolved",
            DispatchPhase::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// Sends messages to remote agents.
///
/// ```no_run
/// # #[cfg(feature = "client")]
/// # async fn example(card: a2a_invoke::types::AgentCard) -> a2a_invoke::error::A2AResult<()> {
/// use std::sync::Arc;
/// use a2a_invoke::client::DefaultClientFactory;
/// use a2a_invoke::invoke::{CompletionSettings, MessageDispatcher, OutboundMessage};
///
/// let dispatcher = MessageDispatcher::new(Arc::new(DefaultClientFactory::default()));
/// let result = dispatcher
///     .send(&card, OutboundMessage::text("hello"), &CompletionSettings::default())
///     .await?;
/// println!("final: {}", result.is_final());
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct MessageDispatcher {
    factory: Arc<dyn ClientFactory>,
    clock: Arc<dyn Clock>,
    translator: ResultTranslator,
}

impl fmt::Debug for MessageDispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MessageDispatcher")
            .field("clock", &self.clock)
            .finish_non_exhaustive()
    }
}

impl MessageDispatcher {
    /// Dispatcher opening clients through `factory`, on the tokio clock.
    pub fn new(factory: Arc<dyn ClientFactory>) -> Self {
        Self {
            factory,
            clock: Arc::new(TokioClock),
            translator: ResultTranslator::new(),
        }
    }

    /// Replace the time source.
    ///
    /// The clock measures the budget (what `elapsed_ms` reports and what
    /// each phase is granted) and paces the sleeps between `tasks/get`
    /// queries. The send, the first-response wait and each query are still
    /// bounded by tokio timers for the time they are granted, so a clock
    /// that never moves cannot hang a send.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Send `message` to `target` and wait for its final result.
    ///
    /// Returns a message, or a task in a terminal state. Failed, rejected
    /// and canceled tasks are results; the caller decides what they mean.
    ///
    /// # Errors
    ///
    /// - [`A2AError::Configuration`] before anything is sent
    /// - [`A2AError::FirstResponseTimeout`] / [`A2AError::PollingTimeout`]
    /// - [`A2AError::UnsupportedEventType`] / [`A2AError::UnsupportedTaskState`]
    /// - transport failures from sending or polling
    pub async fn send(
        &self,
        target: &AgentCard,
        message: OutboundMessage,
        settings: &CompletionSettings,
    ) -> A2AResult<SendMessageResult> {
        settings.validate()?;
        let message = message.into_message()?;

        let (sink, pending) = pending_result();
        let client = ManagedClient::open(
            self.factory.as_ref(),
            target,
            sink.into_callback(self.translator),
        )?;

        let outcome = self.dispatch(&client, message, pending, settings).await;
        client.close().await;

        match &outcome {
            Ok(result) => tracing::info!(
                agent = %target.name,
                phase = %DispatchPhase::Resolved,
                state = ?result.task_state(),
                "send finished"
            ),
            Err(e) => tracing::warn!(
                agent = %target.name,
                phase = %DispatchPhase::Failed,
                error = %e,
                "send failed"
            ),
        }
        outcome
    }

    async fn dispatch(
        &self,
        client: &ManagedClient,
        message: Message,
        pending: PendingResult,
        settings: &CompletionSettings,
    ) -> A2AResult<SendMessageResult> {
        let budget = TimeoutBudget::start(self.clock.now(), settings.total_timeout);
        let message_id = message.message_id.clone();

        let first_response_timeout = |budget: &TimeoutBudget| A2AError::FirstResponseTimeout {
            elapsed_ms: millis(budget.elapsed(self.clock.now())),
        };

        tokio::time::timeout(settings.total_timeout, client.send_message(message))
            .await
            .map_err(|_| first_response_timeout(&budget))??;
        tracing::debug!(
            %message_id,
            phase = %DispatchPhase::Dispatched,
            "message handed to transport"
        );

        let remaining = budget
            .remaining(self.clock.now())
            .ok_or_else(|| first_response_timeout(&budget))?;
        tracing::debug!(
            %message_id,
            phase = %DispatchPhase::AwaitingFirstResponse,
            remaining_ms = millis(remaining),
            "waiting for first response"
        );
        let first = ResultAwaiter::new(remaining)
            .wait(pending)
            .await
            .map_err(|e| match e {
                A2AError::FirstResponseTimeout { .. } => first_response_timeout(&budget),
                other => other,
            })?;

        if first.disposition() == Disposition::Final {
            return Ok(first);
        }

        let task_id = first.task_id().unwrap_or_default().to_string();
        let Some(remaining) = budget.remaining(self.clock.now()) else {
            return Err(A2AError::PollingTimeout {
                task_id,
                last_state: first.task_state(),
                elapsed_ms: millis(budget.elapsed(self.clock.now())),
            });
        };
        tracing::debug!(
            %message_id,
            %task_id,
            phase = %DispatchPhase::Polling,
            remaining_ms = millis(remaining),
            "task still running, polling"
        );

        TaskStatusPoller::new(Arc::clone(&self.clock))
            .poll_within(&task_id, client as &dyn AgentClient, settings.poll_interval, budget)
            .await
    }
}
