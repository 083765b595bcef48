//! Builder patterns for agent cards and client factories.

use crate::types::*;
use crate::utils::constants::TRANSPORT_JSONRPC;

#[cfg(feature = "client")]
use std::collections::HashMap;

/// Builder for constructing [`AgentCard`] with sensible defaults.
///
/// The preferred transport defaults to `JSONRPC`.
///
/// # Example
///
/// ```
/// use a2a_invoke::builders::AgentCardBuilder;
///
/// let card = AgentCardBuilder::new("My Agent", "An example agent", "1.0.0")
///     .with_jsonrpc_interface("http://localhost:8080/a2a")
///     .with_skill("chat", "Chat", "Conversational AI", vec!["conversation".to_string()])
///     .build();
/// assert_eq!(card.url, "http://localhost:8080/a2a");
/// ```
#[derive(Debug, Clone)]
pub struct AgentCardBuilder {
    name: String,
    description: String,
    version: String,
    url: String,
    preferred_transport: Option<String>,
    supported_interfaces: Vec<AgentInterface>,
    capabilities: AgentCapabilities,
    default_input_modes: Vec<String>,
    default_output_modes: Vec<String>,
    skills: Vec<AgentSkill>,
    protocol_version: Option<String>,
}

impl AgentCardBuilder {
    /// Create a new builder with required fields.
    ///
    /// # Arguments
    ///
    /// * `name` - Human-readable agent name
    /// * `description` - Description of agent capabilities
    /// * `version` - Version string (e.g., "1.0.0")
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        version: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            version: version.into(),
            url: String::new(),
            preferred_transport: Some(TRANSPORT_JSONRPC.to_string()),
            supported_interfaces: Vec::new(),
            capabilities: AgentCapabilities::default(),
            default_input_modes: vec!["text/plain".to_string()],
            default_output_modes: vec!["text/plain".to_string()],
            skills: Vec::new(),
            protocol_version: Some("0.3".to_string()),
        }
    }

    /// Set the main endpoint URL.
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }

    /// Add a JSON-RPC interface at the given URL. Also sets the main URL if
    /// none is set yet.
    pub fn with_jsonrpc_interface(mut self, url: impl Into<String>) -> Self {
        let url = url.into();
        if self.url.is_empty() {
            self.url = url.clone();
        }
        self.with_interface(TRANSPORT_JSONRPC, url)
    }

    /// Add an interface for an arbitrary transport.
    pub fn with_interface(mut self, transport: impl Into<String>, url: impl Into<String>) -> Self {
        self.supported_interfaces.push(AgentInterface {
            url: url.into(),
            transport: transport.into(),
        });
        self
    }

    /// Set the preferred transport protocol.
    pub fn with_preferred_transport(mut self, transport: impl Into<String>) -> Self {
        self.preferred_transport = Some(transport.into());
        self
    }

    /// Clear the preferred transport.
    pub fn without_preferred_transport(mut self) -> Self {
        self.preferred_transport = None;
        self
    }

    /// Add a skill to the agent card.
    pub fn with_skill(
        mut self,
        id: impl Into<String>,
        name: impl Into<String>,
        description: impl Into<String>,
        tags: Vec<String>,
    ) -> Self {
        self.skills.push(AgentSkill {
            id: id.into(),
            name: name.into(),
            description: description.into(),
            tags,
            examples: None,
            input_modes: None,
            output_modes: None,
        });
        self
    }

    /// Build the [`AgentCard`].
    pub fn build(self) -> AgentCard {
        AgentCard {
            name: self.name,
            description: self.description,
            version: self.version,
            url: self.url,
            preferred_transport: self.preferred_transport,
            supported_interfaces: self.supported_interfaces,
            capabilities: self.capabilities,
            default_input_modes: self.default_input_modes,
            default_output_modes: self.default_output_modes,
            skills: self.skills,
            protocol_version: self.protocol_version,
        }
    }
}

/// Builder for [`crate::client::DefaultClientFactory`].
///
/// # Example
///
/// ```
/// use a2a_invoke::builders::ClientFactoryBuilder;
/// use std::time::Duration;
///
/// let factory = ClientFactoryBuilder::new()
///     .with_timeout(Duration::from_secs(30))
///     .with_bearer_token("secret")
///     .with_history_length(5)
///     .build();
/// assert_eq!(factory.client_config().history_length, 5);
/// ```
#[cfg(feature = "client")]
#[derive(Debug, Clone, Default)]
pub struct ClientFactoryBuilder {
    timeout: Option<std::time::Duration>,
    headers: HashMap<String, String>,
    history_length: Option<i32>,
    blocking: Option<bool>,
}

#[cfg(feature = "client")]
impl ClientFactoryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the per-request HTTP timeout.
    pub fn with_timeout(mut self, timeout: std::time::Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Add a custom HTTP header.
    pub fn with_header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    /// Add an Authorization header with a bearer token.
    pub fn with_bearer_token(mut self, token: impl Into<String>) -> Self {
        self.headers.insert(
            "Authorization".to_string(),
            format!("Bearer {}", token.into()),
        );
        self
    }

    /// Add an API key header.
    pub fn with_api_key(
        mut self,
        header_name: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Self {
        self.headers.insert(header_name.into(), api_key.into());
        self
    }

    /// Number of history messages requested on sends and task queries.
    pub fn with_history_length(mut self, history_length: i32) -> Self {
        self.history_length = Some(history_length);
        self
    }

    /// Ask the agent to answer `message/send` only once the task settles.
    pub fn with_blocking(mut self, blocking: bool) -> Self {
        self.blocking = Some(blocking);
        self
    }

    /// Build the factory.
    pub fn build(self) -> crate::client::DefaultClientFactory {
        use crate::client::{ClientConfig, DefaultClientFactory, TransportConfig};

        let mut transport = TransportConfig::default();
        if let Some(timeout) = self.timeout {
            transport.timeout = timeout;
        }
        transport.headers = self.headers;

        let mut client = ClientConfig::default();
        if let Some(history_length) = self.history_length {
            client.history_length = history_length;
        }
        if let Some(blocking) = self.blocking {
            client.blocking = blocking;
        }

        DefaultClientFactory::new(client, transport)
    }
}
