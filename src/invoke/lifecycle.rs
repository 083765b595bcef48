//! Agent client seam and its close-exactly-once wrapper.
//!
//! A [`ClientFactory`] opens one [`AgentClient`] per send, bound to the
//! target agent card and to the callback that receives the agent's events.
//! [`ManagedClient`] owns that client for the duration of the send and makes
//! sure it is released exactly once.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;

use crate::error::{A2AError, A2AResult};
use crate::types::{AgentCard, ClientEvent, Message, Task};

/// Consumer of the events (or failures) a client delivers for a sent message.
///
/// May be invoked from any task; must not block.
pub type EventCallback = Arc<dyn Fn(A2AResult<ClientEvent>) + Send + Sync>;

/// A transport-bound client for a single agent.
#[async_trait]
pub trait AgentClient: Send + Sync {
    /// Dispatch a message. Returns once the message is handed to the
    /// transport; the agent's answer arrives on the event callback.
    async fn send_message(&self, message: Message) -> A2AResult<()>;

    /// Fetch the current snapshot of a task (`tasks/get`).
    async fn get_task(&self, task_id: &str) -> A2AResult<Task>;

    /// Release the client's resources.
    async fn close(&self) -> A2AResult<()>;
}

/// Opens [`AgentClient`]s for agent cards.
pub trait ClientFactory: Send + Sync {
    /// Open a client for `target` that reports events to `on_event`.
    ///
    /// # Errors
    ///
    /// Returns [`A2AError::Configuration`] when the card's transport cannot
    /// be served.
    fn open(&self, target: &AgentCard, on_event: EventCallback)
        -> A2AResult<Box<dyn AgentClient>>;
}

/// Owns an opened client and closes it exactly once.
///
/// Close failures are logged and swallowed. Operations after close are
/// rejected. Dropping an unclosed client schedules a close on the current
/// runtime.
pub struct ManagedClient {
    inner: Arc<dyn AgentClient>,
    agent: String,
    closed: AtomicBool,
}

impl fmt::Debug for ManagedClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ManagedClient")
            .field("agent", &self.agent)
            .field("closed", &self.is_closed())
            .finish_non_exhaustive()
    }
}

impl ManagedClient {
    /// Open a client for `target` through `factory`.
    pub fn open(
        factory: &dyn ClientFactory,
        target: &AgentCard,
        on_event: EventCallback,
    ) -> A2AResult<Self> {
        let inner = factory.open(target, on_event)?;
        tracing::debug!(agent = %target.name, "opened agent client");
        Ok(Self {
            inner: Arc::from(inner),
            agent: target.name.clone(),
            closed: AtomicBool::new(false),
        })
    }

    /// Whether [`close`](Self::close) has run.
    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }

    /// Close the underlying client. Later calls are no-ops.
    pub async fn close(&self) {
        if self.closed.swap(true, Ordering::AcqRel) {
            tracing::trace!(agent = %self.agent, "agent client already closed");
            return;
        }
        match self.inner.close().await {
            Ok(()) => tracing::debug!(agent = %self.agent, "closed agent client"),
            Err(e) => tracing::warn!(agent = %self.agent, error = %e, "failed to close agent client"),
        }
    }

    fn ensure_open(&self) -> A2AResult<()> {
        if self.is_closed() {
            return Err(A2AError::Other(format!(
                "client for agent '{}' is closed",
                self.agent
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl AgentClient for ManagedClient {
    async fn send_message(&self, message: Message) -> A2AResult<()> {
        self.ensure_open()?;
        self.inner.send_message(message).await
    }

    async fn get_task(&self, task_id: &str) -> A2AResult<Task> {
        self.ensure_open()?;
        self.inner.get_task(task_id).await
    }

    async fn close(&self) -> A2AResult<()> {
        ManagedClient::close(self).await;
        Ok(())
    }
}

impl Drop for ManagedClient {
    fn drop(&mut self) {
        if self.closed.swap(true, Ordering::AcqRel) {
            return;
        }
        tracing::warn!(agent = %self.agent, "agent client dropped without close");
        if let Ok(handle) = tokio::runtime::Handle::try_current() {
            let inner = Arc::clone(&self.inner);
            let agent = std::mem::take(&mut self.agent);
            handle.spawn(async move {
                if let Err(e) = inner.close().await {
                    tracing::warn!(agent = %agent, error = %e, "failed to close dropped agent client");
                }
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TaskState;
    use std::sync::atomic::AtomicUsize;

    struct CountingClient {
        closes: Arc<AtomicUsize>,
        fail_close: bool,
    }

    #[async_trait]
    impl AgentClient for CountingClient {
        async fn send_message(&self, _message: Message) -> A2AResult<()> {
            Ok(())
        }

        async fn get_task(&self, task_id: &str) -> A2AResult<Task> {
            Ok(Task::new(task_id, "ctx", TaskState::Working))
        }

        async fn close(&self) -> A2AResult<()> {
            self.closes.fetch_add(1, Ordering::SeqCst);
            if self.fail_close {
                return Err(A2AError::Transport("socket already gone".to_string()));
            }
            Ok(())
        }
    }

    struct Factory {
        closes: Arc<AtomicUsize>,
        fail_close: bool,
    }

    impl ClientFactory for Factory {
        fn open(
            &self,
            _target: &AgentCard,
            _on_event: EventCallback,
        ) -> A2AResult<Box<dyn AgentClient>> {
            Ok(Box::new(CountingClient {
                closes: Arc::clone(&self.closes),
                fail_close: self.fail_close,
            }))
        }
    }

    fn card() -> AgentCard {
        crate::builders::AgentCardBuilder::new("echo", "Echo agent", "1.0")
            .with_url("http://localhost:9999/a2a")
            .build()
    }

    fn open(fail_close: bool) -> (ManagedClient, Arc<AtomicUsize>) {
        let closes = Arc::new(AtomicUsize::new(0));
        let factory = Factory {
            closes: Arc::clone(&closes),
            fail_close,
        };
        let client = ManagedClient::open(&factory, &card(), Arc::new(|_: A2AResult<ClientEvent>| {}))
            .unwrap();
        (client, closes)
    }

    #[tokio::test]
    async fn close_is_idempotent() {
        let (client, closes) = open(false);
        client.close().await;
        client.close().await;
        assert!(client.is_closed());
        assert_eq!(closes.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn close_failure_is_swallowed() {
        let (client, closes) = open(true);
        client.close().await;
        assert!(client.is_closed());
        assert_eq!(closes.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn use_after_close_is_rejected() {
        let (client, _) = open(false);
        assert!(client.get_task("t-1").await.is_ok());
        client.close().await;
        let err = client.get_task("t-1").await.unwrap_err();
        assert!(err.to_string().contains("closed"));
    }

    #[tokio::test]
    async fn drop_without_close_still_closes() {
        let (client, closes) = open(false);
        drop(client);
        for _ in 0..5 {
            tokio::task::yield_now().await;
        }
        assert_eq!(closes.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn drop_after_close_does_not_close_again() {
        let (client, closes) = open(false);
        client.close().await;
        drop(client);
        tokio::task::yield_now().await;
        assert_eq!(closes.load(Ordering::SeqCst), 1);
    }
}
