//! Transport selection and the JSON-RPC [`AgentClient`].

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::task::JoinHandle;

use crate::error::{A2AError, A2AResult};
use crate::invoke::{AgentClient, ClientFactory, EventCallback};
use crate::types::{
    AgentCard, ClientEvent, Message, SendMessageConfiguration, SendMessageParams, Task,
};
use crate::utils::constants::{
    DEFAULT_HISTORY_LENGTH, TRANSPORT_GRPC, TRANSPORT_HTTP_JSON, TRANSPORT_JSONRPC,
};

use super::a2a_client::A2AClient;
use super::card_resolver::CardResolver;
use super::transport::{JsonRpcTransport, TransportConfig};

/// Options forwarded to the agent on every call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ClientConfig {
    /// History messages requested on `message/send` and `tasks/get`.
    pub history_length: i32,
    /// Whether `message/send` should wait for the task to settle.
    pub blocking: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            history_length: DEFAULT_HISTORY_LENGTH,
            blocking: false,
        }
    }
}

/// Opens clients for agent cards based on their preferred transport.
///
/// Only `JSONRPC` is served. Cards preferring `GRPC` or `HTTP+JSON`, or
/// declaring no preferred transport, are rejected before anything is sent.
#[derive(Debug, Clone, Default)]
pub struct DefaultClientFactory {
    client_config: ClientConfig,
    transport_config: TransportConfig,
}

impl DefaultClientFactory {
    pub fn new(client_config: ClientConfig, transport_config: TransportConfig) -> Self {
        Self {
            client_config,
            transport_config,
        }
    }

    pub fn client_config(&self) -> &ClientConfig {
        &self.client_config
    }

    pub fn transport_config(&self) -> &TransportConfig {
        &self.transport_config
    }
}

impl ClientFactory for DefaultClientFactory {
    fn open(
        &self,
        target: &AgentCard,
        on_event: EventCallback,
    ) -> A2AResult<Box<dyn AgentClient>> {
        let transport = target
            .preferred_transport
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or_else(|| {
                A2AError::configuration(format!(
                    "agent card '{}' does not declare a preferred transport",
                    target.name
                ))
            })?;

        if transport.eq_ignore_ascii_case(TRANSPORT_JSONRPC) {
            let endpoint =
                CardResolver::endpoint_for(target, TRANSPORT_JSONRPC).ok_or_else(|| {
                    A2AError::configuration(format!(
                        "agent card '{}' has no JSONRPC endpoint",
                        target.name
                    ))
                })?;
            let transport =
                JsonRpcTransport::try_with_config(&endpoint, self.transport_config.clone())?;
            tracing::debug!(agent = %target.name, %endpoint, "opening JSON-RPC client");
            return Ok(Box::new(JsonRpcAgentClient::new(
                A2AClient::with_transport(Box::new(transport)),
                self.client_config.clone(),
                on_event,
            )));
        }

        if transport.eq_ignore_ascii_case(TRANSPORT_GRPC)
            || transport.eq_ignore_ascii_case(TRANSPORT_HTTP_JSON)
        {
            return Err(A2AError::configuration(format!(
                "transport '{transport}' preferred by agent '{}' is not supported by this client",
                target.name
            )));
        }

        Err(A2AError::configuration(format!(
            "unknown transport '{transport}' preferred by agent '{}'",
            target.name
        )))
    }
}

/// [`AgentClient`] over JSON-RPC.
///
/// `send_message` posts `message/send` on a spawned task and reports the
/// answer, or the failure, to the event callback. `close` aborts requests
/// still in flight.
pub struct JsonRpcAgentClient {
    client: Arc<A2AClient>,
    config: ClientConfig,
    on_event: EventCallback,
    in_flight: Mutex<Vec<JoinHandle<()>>>,
}

impl std::fmt::Debug for JsonRpcAgentClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JsonRpcAgentClient")
            .field("client", &self.client)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl JsonRpcAgentClient {
    pub fn new(client: A2AClient, config: ClientConfig, on_event: EventCallback) -> Self {
        Self {
            client: Arc::new(client),
            config,
            on_event,
            in_flight: Mutex::new(Vec::new()),
        }
    }

    fn send_params(&self, message: Message) -> SendMessageParams {
        SendMessageParams {
            message,
            configuration: Some(SendMessageConfiguration {
                accepted_output_modes: None,
                history_length: Some(self.config.history_length),
                blocking: Some(self.config.blocking),
            }),
            metadata: None,
        }
    }
}

#[async_trait]
impl AgentClient for JsonRpcAgentClient {
    async fn send_message(&self, message: Message) -> A2AResult<()> {
        let params = self.send_params(message);
        let client = Arc::clone(&self.client);
        let on_event = Arc::clone(&self.on_event);

        let handle = tokio::spawn(async move {
            let outcome = client
                .send_message(params)
                .await
                .map(ClientEvent::from)
                .map_err(|e| e.context("message/send failed"));
            on_event(outcome);
        });

        let mut in_flight = self.in_flight.lock().unwrap_or_else(|e| e.into_inner());
        in_flight.retain(|h| !h.is_finished());
        in_flight.push(handle);
        Ok(())
    }

    async fn get_task(&self, task_id: &str) -> A2AResult<Task> {
        self.client
            .get_task_by_id(task_id, Some(self.config.history_length))
            .await
    }

    async fn close(&self) -> A2AResult<()> {
        let handles: Vec<_> = self
            .in_flight
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .drain(..)
            .collect();
        for handle in handles {
            if !handle.is_finished() {
                tracing::debug!("aborting in-flight message/send");
                handle.abort();
            }
        }
        self.client.close().await
    }
}
