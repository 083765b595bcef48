//! Error types for remote agent invocation.
//!
//! One enum covers the whole invocation taxonomy:
//! - configuration problems detected before anything is sent
//! - the two timeout phases (first response, polling)
//! - classification failures (unsupported event type, unsupported task state)
//! - transport and JSON-RPC failures, with the remote cause preserved

use crate::types::TaskState;

// ---------------------------------------------------------------------------
// JSON-RPC 2.0 / A2A error codes a client may observe
// ---------------------------------------------------------------------------

/// The JSON sent is not a valid Request object.
pub const INVALID_REQUEST: i64 = -32600;

/// The method does not exist / is not available.
pub const METHOD_NOT_FOUND: i64 = -32601;

/// Invalid method parameter(s).
pub const INVALID_PARAMS: i64 = -32602;

/// Internal JSON-RPC error.
pub const INTERNAL_ERROR: i64 = -32603;

/// The requested task was not found.
pub const TASK_NOT_FOUND: i64 = -32001;

/// The requested operation is not supported.
pub const UNSUPPORTED_OPERATION: i64 = -32004;

/// The content type is not supported.
pub const CONTENT_TYPE_NOT_SUPPORTED: i64 = -32005;

// ---------------------------------------------------------------------------
// A2AError enum
// ---------------------------------------------------------------------------

/// Unified error type for sending messages to remote agents.
#[derive(Debug, Clone, thiserror::Error)]
pub enum A2AError {
    // -- Invocation errors --
    /// The transport or the call settings are unusable. Raised before any
    /// message is sent.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// No event arrived from the agent within the first-response budget.
    #[error("Timed out waiting for response from agent after {elapsed_ms} ms")]
    FirstResponseTimeout {
        /// Time spent waiting, in milliseconds.
        elapsed_ms: u64,
    },

    /// The task stayed non-terminal until the polling budget ran out.
    #[error("Timed out polling task {task_id} after {elapsed_ms} ms")]
    PollingTimeout {
        /// The polled task.
        task_id: String,
        /// Last state observed for the task, if any query completed.
        last_state: Option<TaskState>,
        /// Time spent polling, in milliseconds.
        elapsed_ms: u64,
    },

    /// The transport delivered an event this client does not handle.
    #[error("Only message and task events are supported in the response. Received: {kind}")]
    UnsupportedEventType {
        /// The `kind` of the rejected event.
        kind: String,
    },

    /// The task reached a state that needs a human-in-the-loop continuation.
    #[error("Task status {state} is not supported yet.")]
    UnsupportedTaskState {
        /// The rejected state.
        state: TaskState,
    },

    /// The event source went away before it delivered a result.
    #[error("Interrupted: {0}")]
    Interrupted(String),

    /// The agent's answer could not be translated.
    #[error("Invalid agent response: {0}")]
    InvalidAgentResponse(String),

    /// An outbound document could not be turned into a message part.
    #[error("{0}")]
    DocumentConversion(String),

    // -- Client/transport-side errors --
    /// Transport-level error (connection failed, request failed, etc.).
    #[error("Transport error: {0}")]
    Transport(String),

    /// An individual HTTP request timed out.
    #[error("Timeout: {0}")]
    Timeout(String),

    /// HTTP error with status code and response body.
    #[error("HTTP {status}: {body}")]
    Http {
        /// HTTP status code.
        status: u16,
        /// Response body text.
        body: String,
    },

    /// Invalid JSON received from remote (parse or deserialization failure).
    #[error("Invalid JSON: {0}")]
    InvalidJson(String),

    /// A JSON-RPC error response was received from the remote agent.
    #[error("JSON-RPC error {code}: {message}")]
    JsonRpc {
        /// JSON-RPC error code.
        code: i64,
        /// Error message.
        message: String,
        /// Optional structured error data.
        data: Option<serde_json::Value>,
    },

    /// Catch-all for errors that don't fit other categories.
    #[error("{0}")]
    Other(String),
}

/// Convenience result type for A2A operations.
pub type A2AResult<T> = Result<T, A2AError>;

impl A2AError {
    /// Create a `Configuration` error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }

    /// Create an `UnsupportedTaskState` error.
    pub fn unsupported_task_state(state: TaskState) -> Self {
        Self::UnsupportedTaskState { state }
    }

    /// Create an `UnsupportedEventType` error.
    pub fn unsupported_event_type(kind: impl Into<String>) -> Self {
        Self::UnsupportedEventType { kind: kind.into() }
    }

    /// Wrap an error with a context message, keeping the variant.
    ///
    /// Only message-carrying variants are prefixed; structured ones are
    /// returned unchanged.
    pub fn context(self, context: impl AsRef<str>) -> Self {
        let context = context.as_ref();
        match self {
            A2AError::Transport(msg) => A2AError::Transport(format!("{context}: {msg}")),
            A2AError::Timeout(msg) => A2AError::Timeout(format!("{context}: {msg}")),
            A2AError::InvalidJson(msg) => A2AError::InvalidJson(format!("{context}: {msg}")),
            A2AError::Other(msg) => A2AError::Other(format!("{context}: {msg}")),
            other => other,
        }
    }

    /// Whether this error is one of the two invocation timeouts.
    pub fn is_timeout(&self) -> bool {
        matches!(
            self,
            A2AError::FirstResponseTimeout { .. } | A2AError::PollingTimeout { .. }
        )
    }

    /// Whether this error was raised by the result classification rules.
    pub fn is_classification_error(&self) -> bool {
        matches!(
            self,
            A2AError::UnsupportedEventType { .. } | A2AError::UnsupportedTaskState { .. }
        )
    }

    /// Returns the JSON-RPC error code carried by this error, if any.
    pub fn rpc_code(&self) -> Option<i64> {
        match self {
            A2AError::JsonRpc { code, .. } => Some(*code),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for A2AError {
    fn from(err: serde_json::Error) -> Self {
        A2AError::InvalidJson(err.to_string())
    }
}
