//! reqwest-backed client side: JSON-RPC transport, card discovery, and the
//! default [`ClientFactory`](crate::invoke::ClientFactory).
//!
//! - [`DefaultClientFactory`]: picks the transport from the agent card and
//!   opens a [`JsonRpcAgentClient`]
//! - [`A2AClient`]: typed `message/send` and `tasks/get` calls
//! - [`CardResolver`]: discover agent cards via the well-known URL convention
//! - [`Transport`] / [`JsonRpcTransport`]: pluggable transport layer
//!
//! # Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//! use a2a_invoke::client::{CardResolver, DefaultClientFactory};
//! use a2a_invoke::invoke::{CompletionSettings, MessageDispatcher, OutboundMessage};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let card = CardResolver::new().resolve("http://localhost:7420").await?;
//! let dispatcher = MessageDispatcher::new(Arc::new(DefaultClientFactory::default()));
//!
//! let result = dispatcher
//!     .send(&card, OutboundMessage::text("Hello, agent!"), &CompletionSettings::default())
//!     .await?;
//! println!("{}", serde_json::to_string_pretty(&result)?);
//! # Ok(())
//! # }
//! ```

mod a2a_client;
mod card_resolver;
mod factory;
mod transport;

pub use a2a_client::A2AClient;
pub use card_resolver::CardResolver;
pub use factory::{ClientConfig, DefaultClientFactory, JsonRpcAgentClient};
pub use transport::{JsonRpcTransport, Transport, TransportConfig};
