//! Well-known paths and transport identifiers.

/// The well-known path for the agent card (A2A v0.3+)
pub const AGENT_CARD_WELL_KNOWN_PATH: &str = "/.well-known/agent-card.json";

/// The previous well-known path for the agent card (deprecated, but still supported)
pub const PREV_AGENT_CARD_WELL_KNOWN_PATH: &str = "/.well-known/agent.json";

/// Transport identifier for the JSON-RPC 2.0 over HTTP binding.
pub const TRANSPORT_JSONRPC: &str = "JSONRPC";

/// Transport identifier for the gRPC binding.
pub const TRANSPORT_GRPC: &str = "GRPC";

/// Transport identifier for the HTTP+JSON (REST) binding.
pub const TRANSPORT_HTTP_JSON: &str = "HTTP+JSON";

/// Default interval between two `tasks/get` queries while polling.
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 500;

/// Default overall budget for one send, first response and polling combined.
pub const DEFAULT_TOTAL_TIMEOUT_MS: u64 = 60_000;

/// Default number of history messages requested from the agent.
pub const DEFAULT_HISTORY_LENGTH: i32 = 3;
