//! Remote agent invocation: send a message, get one final result.
//!
//! - [`MessageDispatcher`]: the entry point; orchestrates one send
//! - [`ResultAwaiter`] / [`EventSink`]: hand the first agent event from the
//!   transport callback to the waiting caller
//! - [`TaskStatusPoller`]: re-query running tasks until they settle
//! - [`ResultTranslator`] / [`classify_state`]: map wire events and task
//!   states to [`SendMessageResult`]s
//! - [`ManagedClient`]: close-exactly-once ownership of the agent client
//!
//! Transports plug in through [`ClientFactory`] and [`AgentClient`]; the
//! reqwest-backed JSON-RPC implementation lives in [`crate::client`].

mod awaiter;
mod classify;
mod clock;
mod dispatcher;
mod lifecycle;
mod outbound;
mod poller;
mod result;
mod settings;
mod translate;

pub use awaiter::{pending_result, EventSink, PendingResult, ResultAwaiter};
pub use classify::{classify_state, Disposition, StateClass};
pub use clock::{Clock, ManualClock, TokioClock};
pub use dispatcher::{DispatchPhase, MessageDispatcher};
pub use lifecycle::{AgentClient, ClientFactory, EventCallback, ManagedClient};
pub use outbound::{OutboundContent, OutboundMessage};
pub use poller::TaskStatusPoller;
pub use result::{
    AgentArtifact, AgentContent, AgentMessage, AgentTask, AgentTaskStatus, SendMessageResult,
};
pub use settings::{CompletionSettings, TimeoutBudget};
pub use translate::ResultTranslator;
