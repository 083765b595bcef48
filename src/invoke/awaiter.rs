//! Single-assignment handoff between the transport callback and the caller.
//!
//! [`pending_result`] returns two halves: an [`EventSink`] the transport
//! writes to from whatever task it runs its callbacks on, and a
//! [`PendingResult`] the caller waits on with [`ResultAwaiter`]. The first
//! resolution wins; everything after it is ignored.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::sync::oneshot;

use super::lifecycle::EventCallback;
use super::result::SendMessageResult;
use super::settings::millis;
use super::translate::ResultTranslator;
use crate::error::{A2AError, A2AResult};
use crate::types::ClientEvent;

type Outcome = A2AResult<SendMessageResult>;

/// Create a connected sink/pending pair.
pub fn pending_result() -> (EventSink, PendingResult) {
    let (tx, rx) = oneshot::channel();
    (
        EventSink {
            slot: Arc::new(Mutex::new(Some(tx))),
        },
        PendingResult { rx },
    )
}

/// Write side of the handoff. Cheap to clone; all clones share one slot.
#[derive(Debug, Clone)]
pub struct EventSink {
    slot: Arc<Mutex<Option<oneshot::Sender<Outcome>>>>,
}

impl EventSink {
    /// Resolve with `outcome`. Returns `false` if already resolved.
    pub fn resolve(&self, outcome: Outcome) -> bool {
        let sender = self.slot.lock().unwrap_or_else(|e| e.into_inner()).take();
        match sender {
            Some(tx) => {
                if tx.send(outcome).is_err() {
                    tracing::debug!("result delivered after the caller stopped waiting");
                }
                true
            }
            None => {
                tracing::debug!("ignoring event for an already resolved send");
                false
            }
        }
    }

    /// Whether a result has already been delivered.
    pub fn is_resolved(&self) -> bool {
        self.slot
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .is_none()
    }

    /// Wrap this sink as a transport event callback.
    ///
    /// Each event is translated and the outcome, success or failure,
    /// resolves the sink. Events after the first are dropped untranslated.
    pub fn into_callback(self, translator: ResultTranslator) -> EventCallback {
        Arc::new(move |event: A2AResult<ClientEvent>| {
            if self.is_resolved() {
                tracing::debug!("ignoring event for an already resolved send");
                return;
            }
            let outcome = event.and_then(|event| translator.translate(event));
            if let Err(e) = &outcome {
                tracing::debug!(error = %e, "agent event resolved the send with an error");
            }
            self.resolve(outcome);
        })
    }
}

/// Read side of the handoff.
#[derive(Debug)]
pub struct PendingResult {
    rx: oneshot::Receiver<Outcome>,
}

/// Waits for the first result under a deadline.
#[derive(Debug, Clone, Copy)]
pub struct ResultAwaiter {
    timeout: Duration,
}

impl ResultAwaiter {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }

    /// Wait for `pending` to resolve.
    ///
    /// A resolution that happened before this call is returned immediately.
    ///
    /// # Errors
    ///
    /// - [`A2AError::FirstResponseTimeout`] if nothing arrives in time
    /// - [`A2AError::Interrupted`] if every sink was dropped unresolved
    /// - whatever error the sink was resolved with
    pub async fn wait(&self, pending: PendingResult) -> A2AResult<SendMessageResult> {
        match tokio::time::timeout(self.timeout, pending.rx).await {
            Ok(Ok(outcome)) => outcome,
            Ok(Err(_)) => Err(A2AError::Interrupted(
                "event source closed before delivering a response".to_string(),
            )),
            Err(_) => Err(A2AError::FirstResponseTimeout {
                elapsed_ms: millis(self.timeout),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Message, Task, TaskState};

    fn message_event(id: &str) -> ClientEvent {
        ClientEvent::Message(Message::agent(id, "hi"))
    }

    #[tokio::test]
    async fn resolution_before_wait_is_returned() {
        let (sink, pending) = pending_result();
        let callback = sink.clone().into_callback(ResultTranslator::new());
        callback(Ok(message_event("m-1")));
        assert!(sink.is_resolved());

        let result = ResultAwaiter::new(Duration::from_millis(10))
            .wait(pending)
            .await
            .unwrap();
        assert_eq!(result.as_message().unwrap().message_id, "m-1");
    }

    #[tokio::test]
    async fn first_resolution_wins() {
        let (sink, pending) = pending_result();
        let callback = sink.into_callback(ResultTranslator::new());
        callback(Ok(message_event("m-1")));
        callback(Ok(message_event("m-2")));
        callback(Err(A2AError::Transport("late failure".to_string())));

        let result = ResultAwaiter::new(Duration::from_millis(10))
            .wait(pending)
            .await
            .unwrap();
        assert_eq!(result.as_message().unwrap().message_id, "m-1");
    }

    #[tokio::test]
    async fn error_resolution_is_propagated() {
        let (sink, pending) = pending_result();
        let callback = sink.into_callback(ResultTranslator::new());
        callback(Ok(ClientEvent::Task(Task::new(
            "t-1",
            "c-1",
            TaskState::InputRequired,
        ))));

        let err = ResultAwaiter::new(Duration::from_millis(10))
            .wait(pending)
            .await
            .unwrap_err();
        assert!(matches!(err, A2AError::UnsupportedTaskState { .. }));
    }

    #[tokio::test(start_paused = true)]
    async fn times_out_without_events() {
        let (_sink, pending) = pending_result();
        let err = ResultAwaiter::new(Duration::from_millis(250))
            .wait(pending)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            A2AError::FirstResponseTimeout { elapsed_ms: 250 }
        ));
    }

    #[tokio::test]
    async fn dropped_sink_interrupts_the_wait() {
        let (sink, pending) = pending_result();
        drop(sink);
        let err = ResultAwaiter::new(Duration::from_secs(5))
            .wait(pending)
            .await
            .unwrap_err();
        assert!(matches!(err, A2AError::Interrupted(_)));
    }

    #[tokio::test]
    async fn resolve_reports_duplicates() {
        let (sink, _pending) = pending_result();
        assert!(sink.resolve(Err(A2AError::Other("first".to_string()))));
        assert!(!sink.resolve(Err(A2AError::Other("second".to_string()))));
    }
}
