//! Agent card discovery and resolution.
//!
//! Implements the well-known URI convention for discovering A2A agent cards.
//! An agent card describes the agent's capabilities, supported interfaces,
//! skills, and the endpoint URL for JSON-RPC communication.

use crate::error::{A2AError, A2AResult};
use crate::types::AgentCard;
use crate::utils::constants::{AGENT_CARD_WELL_KNOWN_PATH, PREV_AGENT_CARD_WELL_KNOWN_PATH};

/// Resolves [`AgentCard`]s from agent base URLs.
///
/// # Example
///
/// ```no_run
/// use a2a_invoke::client::CardResolver;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let resolver = CardResolver::new();
/// let card = resolver.resolve("http://localhost:7420").await?;
/// println!("Agent: {} v{}", card.name, card.version);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct CardResolver {
    client: reqwest::Client,
    /// Custom card location: a path relative to the base URL, or an absolute
    /// URL. `None` means the well-known paths.
    card_path: Option<String>,
}

impl CardResolver {
    /// Create a new resolver with default settings.
    pub fn new() -> Self {
        Self::with_client(reqwest::Client::new())
    }

    /// Create a new resolver with an existing `reqwest::Client`.
    pub fn with_client(client: reqwest::Client) -> Self {
        Self {
            client,
            card_path: None,
        }
    }

    /// Load the card from a custom location instead of the well-known paths.
    ///
    /// `path` is either relative to the base URL (`/cards/echo.json`) or an
    /// absolute `http(s)://` URL.
    pub fn with_card_path(mut self, path: impl Into<String>) -> Self {
        self.card_path = Some(path.into());
        self
    }

    /// Fetch and parse the agent card for `base_url`.
    ///
    /// With the default location, tries `/.well-known/agent-card.json` and
    /// falls back to `/.well-known/agent.json` on a 404.
    ///
    /// # Errors
    ///
    /// Returns [`A2AError::Transport`] on connection failures, [`A2AError::Http`]
    /// on non-2xx responses, and [`A2AError::InvalidJson`] on parse failures.
    /// Messages name the URL that failed.
    pub async fn resolve(&self, base_url: &str) -> A2AResult<AgentCard> {
        let base = base_url.trim_end_matches('/');

        if let Some(path) = self.card_path.as_deref() {
            return self.fetch_card(&card_url(base, path)).await;
        }

        match self
            .fetch_card(&card_url(base, AGENT_CARD_WELL_KNOWN_PATH))
            .await
        {
            Err(A2AError::Http { status: 404, .. }) => {
                tracing::debug!(
                    base,
                    fallback = PREV_AGENT_CARD_WELL_KNOWN_PATH,
                    "agent card not found at the well-known path, trying fallback"
                );
                self.fetch_card(&card_url(base, PREV_AGENT_CARD_WELL_KNOWN_PATH))
                    .await
            }
            other => other,
        }
    }

    async fn fetch_card(&self, url: &str) -> A2AResult<AgentCard> {
        tracing::debug!(url, "resolving agent card");

        let response = self
            .client
            .get(url)
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    A2AError::Timeout(format!("Failed to load agent card from {url}: {e}"))
                } else {
                    A2AError::Transport(format!("Failed to load agent card from {url}: {e}"))
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(A2AError::Http {
                status: status.as_u16(),
                body,
            });
        }

        let bytes = response.bytes().await.map_err(|e| {
            A2AError::Transport(format!("Failed to load agent card from {url}: {e}"))
        })?;

        let card: AgentCard = serde_json::from_slice(&bytes).map_err(|e| {
            A2AError::InvalidJson(format!("Failed to load agent card from {url}: {e}"))
        })?;

        tracing::debug!(agent = %card.name, version = %card.version, "resolved agent card");

        Ok(card)
    }

    /// The endpoint to use for `transport` on `card`.
    ///
    /// The first interface declaring `transport` (case-insensitive) wins;
    /// otherwise the card's main URL, if it is not blank.
    pub fn endpoint_for(card: &AgentCard, transport: &str) -> Option<String> {
        card.supported_interfaces
            .iter()
            .find(|iface| iface.transport.eq_ignore_ascii_case(transport))
            .map(|iface| iface.url.clone())
            .or_else(|| Some(card.url.clone()))
            .filter(|url| !url.trim().is_empty())
    }
}

impl Default for CardResolver {
    fn default() -> Self {
        Self::new()
    }
}

fn card_url(base: &str, path: &str) -> String {
    if path.starts_with("http://") || path.starts_with("https://") {
        return path.to_string();
    }
    if path.starts_with('/') {
        format!("{base}{path}")
    } else {
        format!("{base}/{path}")
    }
}
