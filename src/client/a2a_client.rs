//! Typed JSON-RPC client for the two methods an invocation needs:
//! `message/send` and `tasks/get`.

use serde::Serialize;

use crate::error::{A2AError, A2AResult};
use crate::types::{
    AgentCard, GetTaskParams, JsonRpcId, JsonRpcRequest, JsonRpcResponse, SendMessageParams,
    SendMessageResponse, Task,
};
use crate::utils::constants::TRANSPORT_JSONRPC;

use super::card_resolver::CardResolver;
use super::transport::{JsonRpcTransport, Transport};

/// Client for a single A2A agent.
///
/// # Construction
///
/// ```no_run
/// use a2a_invoke::client::A2AClient;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// // From a base URL (resolves agent card, discovers endpoint):
/// let client = A2AClient::from_url("http://localhost:7420").await?;
///
/// // With custom transport:
/// use a2a_invoke::client::JsonRpcTransport;
/// let transport = JsonRpcTransport::new("http://localhost:7420/a2a");
/// let client = A2AClient::with_transport(Box::new(transport));
/// # Ok(())
/// # }
/// ```
pub struct A2AClient {
    transport: Box<dyn Transport>,
    agent_card: Option<AgentCard>,
}

impl std::fmt::Debug for A2AClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("A2AClient")
            .field("agent_card", &self.agent_card.as_ref().map(|c| &c.name))
            .finish_non_exhaustive()
    }
}

impl A2AClient {
    /// Create a client from a base URL.
    ///
    /// Resolves the agent card from the well-known location and talks to
    /// its JSON-RPC endpoint.
    pub async fn from_url(url: &str) -> A2AResult<Self> {
        let resolver = CardResolver::new();
        let card = resolver.resolve(url).await?;
        Self::from_card(card)
    }

    /// Create a client from an already-resolved agent card.
    ///
    /// Uses the card's JSON-RPC interface if it declares one, else its main
    /// URL.
    ///
    /// # Errors
    ///
    /// Returns [`A2AError::Configuration`] if the card has no usable URL.
    pub fn from_card(card: AgentCard) -> A2AResult<Self> {
        let url = CardResolver::endpoint_for(&card, TRANSPORT_JSONRPC).ok_or_else(|| {
            A2AError::configuration(format!(
                "agent card for '{}' has no JSONRPC endpoint",
                card.name
            ))
        })?;

        Ok(Self {
            transport: Box::new(JsonRpcTransport::new(url)),
            agent_card: Some(card),
        })
    }

    /// Create a client with a custom transport.
    pub fn with_transport(transport: Box<dyn Transport>) -> Self {
        Self {
            transport,
            agent_card: None,
        }
    }

    /// Create a client from a direct endpoint URL (skips agent card resolution).
    pub fn from_endpoint(url: &str) -> Self {
        Self::with_transport(Box::new(JsonRpcTransport::new(url)))
    }

    /// Send a message to the agent (`message/send`).
    ///
    /// The agent answers with either a [`Task`] or a direct message.
    pub async fn send_message(&self, params: SendMessageParams) -> A2AResult<SendMessageResponse> {
        let request = build_request("message/send", &params)?;
        let response = self.transport.send(&request).await?;
        parse_result(response)
    }

    /// Get the current state of a task (`tasks/get`).
    pub async fn get_task(&self, params: GetTaskParams) -> A2AResult<Task> {
        let request = build_request("tasks/get", &params)?;
        let response = self.transport.send(&request).await?;
        parse_result(response)
    }

    /// Convenience: get a task by ID with optional history length.
    pub async fn get_task_by_id(
        &self,
        task_id: &str,
        history_length: Option<i32>,
    ) -> A2AResult<Task> {
        self.get_task(GetTaskParams {
            id: task_id.to_string(),
            history_length,
        })
        .await
    }

    /// The agent card this client was built from, if any.
    pub fn agent_card(&self) -> Option<&AgentCard> {
        self.agent_card.as_ref()
    }

    /// Close the client and release any held resources.
    pub async fn close(&self) -> A2AResult<()> {
        self.transport.close().await
    }
}

/// Build a JSON-RPC request with a random UUID ID.
fn build_request(method: &str, params: &impl Serialize) -> A2AResult<JsonRpcRequest> {
    let params_value = serde_json::to_value(params)
        .map_err(|e| A2AError::Transport(format!("failed to serialize request params: {e}")))?;

    Ok(JsonRpcRequest::new(
        JsonRpcId::String(uuid::Uuid::new_v4().to_string()),
        method,
        Some(params_value),
    ))
}

/// Parse the `result` field from a JSON-RPC response into the expected type.
///
/// If the response contains an error, converts it into an [`A2AError::JsonRpc`].
fn parse_result<T: serde::de::DeserializeOwned>(response: JsonRpcResponse) -> A2AResult<T> {
    if let Some(error) = response.error {
        return Err(A2AError::JsonRpc {
            code: error.code,
            message: error.message,
            data: error.data,
        });
    }

    let result = response.result.ok_or_else(|| {
        A2AError::InvalidJson("JSON-RPC response has neither 'result' nor 'error'".to_string())
    })?;

    serde_json::from_value(result)
        .map_err(|e| A2AError::InvalidJson(format!("failed to deserialize response result: {e}")))
}
