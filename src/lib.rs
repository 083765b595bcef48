//! # a2a-invoke: send a message to a remote A2A agent, get one final result
//!
//! Talking to an [A2A](https://a2a-protocol.org/latest/specification/) agent
//! is asynchronous: the agent may answer right away with a message, or create
//! a task and keep working on it. This crate hides that behind a single call.
//! [`invoke::MessageDispatcher::send`] dispatches the message, waits for the
//! first answer, polls `tasks/get` while the task is still running, and
//! returns exactly one final [`invoke::SendMessageResult`] within one total
//! timeout.
//!
//! ## Feature flags
//!
//! | Feature  | Default | Description |
//! |----------|---------|-------------|
//! | `client` | yes     | reqwest JSON-RPC transport, card discovery, default client factory |
//!
//! ## Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! use a2a_invoke::client::{CardResolver, DefaultClientFactory};
//! use a2a_invoke::invoke::{CompletionSettings, MessageDispatcher, OutboundMessage, SendMessageResult};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let card = CardResolver::new().resolve("http://localhost:7420").await?;
//!     let dispatcher = MessageDispatcher::new(Arc::new(DefaultClientFactory::default()));
//!     let settings = CompletionSettings::new(Duration::from_secs(30), Duration::from_millis(500))?;
//!
//!     match dispatcher.send(&card, OutboundMessage::text("Write a haiku about Rust"), &settings).await? {
//!         SendMessageResult::Message(message) => println!("{}", message.text()),
//!         SendMessageResult::Task(task) => println!("task {} ended {}", task.task_id, task.status.state),
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! - [`invoke`]: dispatcher, first-response awaiter, poller, translation,
//!   classification, settings, and the [`invoke::ClientFactory`] /
//!   [`invoke::AgentClient`] seam
//! - [`client`]: JSON-RPC over HTTP implementation of that seam
//! - [`types`]: A2A v0.3 wire types
//! - [`utils`]: constants and outbound document conversion
//! - [`error::A2AError`]: one error type for the whole crate

pub mod builders;
pub mod error;
pub mod invoke;
pub mod types;
pub mod utils;

#[cfg(feature = "client")]
pub mod client;

/// Prelude module that re-exports commonly used types and traits.
///
/// ```
/// use a2a_invoke::prelude::*;
///
/// let message = OutboundMessage::text("hello");
/// let settings = CompletionSettings::default();
/// assert!(settings.validate().is_ok());
/// # let _ = message;
/// ```
pub mod prelude {
    pub use crate::types::{
        AgentCapabilities, AgentCard, AgentInterface, AgentSkill, ClientEvent, Message, Part,
        Role, Task, TaskState, TaskStatus,
    };

    pub use crate::error::{A2AError, A2AResult};

    pub use crate::invoke::{
        AgentClient, AgentContent, AgentMessage, AgentTask, ClientFactory, CompletionSettings,
        Disposition, MessageDispatcher, OutboundMessage, SendMessageResult,
    };

    pub use crate::builders::AgentCardBuilder;

    #[cfg(feature = "client")]
    pub use crate::builders::ClientFactoryBuilder;

    #[cfg(feature = "client")]
    pub use crate::client::{CardResolver, DefaultClientFactory};
}

pub use builders::AgentCardBuilder;
pub use error::{A2AError, A2AResult};
pub use invoke::{CompletionSettings, MessageDispatcher, OutboundMessage, SendMessageResult};

#[cfg(feature = "client")]
pub use builders::ClientFactoryBuilder;
