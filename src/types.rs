//! A2A wire types: the subset of the v0.3 schema a sending client needs.
//!
//! Reference: <https://github.com/a2aproject/A2A/blob/main/specification/a2a.proto>
//!
//! These are the transport-native shapes: messages, parts, tasks, artifacts,
//! the events a client can observe, the agent card, and the JSON-RPC envelope.
//! The translated, caller-facing result model lives in [`crate::invoke`].

use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// Enums
// ============================================================================

/// The lifecycle state of a task.
///
/// Serialized as kebab-case strings (`"input-required"`), matching the
/// JSON-RPC binding.
///
/// Proto ref: `enum TaskState`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TaskState {
    /// Task has been received but not yet started.
    Submitted,
    /// Task is actively being processed.
    Working,
    /// Task requires additional input from the user.
    InputRequired,
    /// Task requires authentication.
    AuthRequired,
    /// Task completed successfully.
    Completed,
    /// Task failed.
    Failed,
    /// Task was canceled.
    Canceled,
    /// Task was rejected by the agent.
    Rejected,
    /// Unknown state. Unrecognized wire values land here.
    #[serde(other)]
    Unknown,
}

impl TaskState {
    /// Every state, in declaration order.
    pub const ALL: [TaskState; 9] = [
        TaskState::Submitted,
        TaskState::Working,
        TaskState::InputRequired,
        TaskState::AuthRequired,
        TaskState::Completed,
        TaskState::Failed,
        TaskState::Canceled,
        TaskState::Rejected,
        TaskState::Unknown,
    ];

    /// The wire name of this state (`"auth-required"`).
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskState::Submitted => "submitted",
            TaskState::Working => "working",
            TaskState::InputRequired => "input-required",
            TaskState::AuthRequired => "auth-required",
            TaskState::Completed => "completed",
            TaskState::Failed => "failed",
            TaskState::Canceled => "canceled",
            TaskState::Rejected => "rejected",
            TaskState::Unknown => "unknown",
        }
    }
}

impl fmt::Display for TaskState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The role of a message sender.
///
/// Proto ref: `enum Role`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Message from the user / client.
    User,
    /// Message from the agent / server.
    Agent,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::User => write!(f, "user"),
            Role::Agent => write!(f, "agent"),
        }
    }
}

// ============================================================================
// Core Task Types
// ============================================================================

/// Current status of a task.
///
/// Proto ref: `message TaskStatus`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskStatus {
    /// The current state.
    pub state: TaskState,

    /// Optional message associated with this status.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<Message>,

    /// ISO-8601 timestamp of when this status was set.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
}

/// A task: the unit of (possibly long-running) work on the remote agent.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Unique task identifier.
    pub id: String,

    /// Context identifier (groups related tasks/messages).
    pub context_id: String,

    /// Discriminator field: always "task".
    #[serde(default = "kind_task")]
    pub kind: String,

    /// Current task status.
    pub status: TaskStatus,

    /// Artifacts produced by the task.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub artifacts: Option<Vec<Artifact>>,

    /// Message history for this task.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub history: Option<Vec<Message>>,

    /// Arbitrary metadata.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<serde_json::Value>,
}

// ============================================================================
// Message & Parts
// ============================================================================

/// A single message in a conversation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    /// Unique message identifier.
    pub message_id: String,

    /// Who sent this message.
    pub role: Role,

    /// Discriminator field: always "message".
    #[serde(default = "kind_message")]
    pub kind: String,

    /// Content parts of the message.
    pub parts: Vec<Part>,

    /// Context this message belongs to.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context_id: Option<String>,

    /// Task this message is associated with.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub task_id: Option<String>,

    /// Arbitrary metadata.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<serde_json::Value>,

    /// Protocol extensions active for this message.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extensions: Option<Vec<String>>,

    /// IDs of tasks referenced by this message.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference_task_ids: Option<Vec<String>>,
}

/// File content provided as base64-encoded bytes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileWithBytes {
    /// Base64-encoded file content.
    pub bytes: String,
    /// MIME type of the file.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
    /// Optional file name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// File content provided as a URI reference.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileWithUri {
    /// URI pointing to the file content.
    pub uri: String,
    /// MIME type of the file.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
    /// Optional file name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// File content: either inline bytes or a URI reference.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FileContent {
    /// File with inline base64-encoded bytes.
    Bytes(FileWithBytes),
    /// File referenced by URI.
    Uri(FileWithUri),
}

/// A content part within a message or artifact.
///
/// JSON wire format:
/// - Text: `{"kind": "text", "text": "hello"}`
/// - File: `{"kind": "file", "file": {"bytes": "SGVsbG8=", "mimeType": "text/plain"}}`
/// - Data: `{"kind": "data", "data": {"key": "value"}}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum Part {
    /// A text content part. Discriminator: `"text"`.
    #[serde(rename = "text")]
    Text {
        /// The text content.
        text: String,
        /// Optional metadata associated with this part.
        #[serde(skip_serializing_if = "Option::is_none")]
        metadata: Option<serde_json::Value>,
    },
    /// A file content part. Discriminator: `"file"`.
    #[serde(rename = "file")]
    File {
        /// The file content (bytes or URI).
        file: FileContent,
        /// Optional metadata associated with this part.
        #[serde(skip_serializing_if = "Option::is_none")]
        metadata: Option<serde_json::Value>,
    },
    /// A structured data content part. Discriminator: `"data"`.
    #[serde(rename = "data")]
    Data {
        /// Arbitrary structured data.
        data: serde_json::Value,
        /// Optional metadata associated with this part.
        #[serde(skip_serializing_if = "Option::is_none")]
        metadata: Option<serde_json::Value>,
    },
}

/// An artifact produced by a task.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Artifact {
    /// Unique artifact identifier.
    pub artifact_id: String,

    /// Human-readable name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Description of the artifact.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Content parts of the artifact.
    pub parts: Vec<Part>,

    /// Arbitrary metadata.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<serde_json::Value>,
}

// ============================================================================
// Client Events
// ============================================================================

/// Notification that a task's status has changed.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskStatusUpdateEvent {
    /// ID of the task whose status changed.
    pub task_id: String,

    /// Context this task belongs to.
    pub context_id: String,

    /// Discriminator field: always "status-update".
    #[serde(default = "kind_status_update")]
    pub kind: String,

    /// The new status.
    pub status: TaskStatus,

    /// Whether this is the final status update for this task.
    #[serde(rename = "final", default)]
    pub r#final: bool,
}

/// Notification that an artifact has been created or updated.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskArtifactUpdateEvent {
    /// ID of the task that produced the artifact.
    pub task_id: String,

    /// Context this task belongs to.
    pub context_id: String,

    /// Discriminator field: always "artifact-update".
    #[serde(default = "kind_artifact_update")]
    pub kind: String,

    /// The artifact.
    pub artifact: Artifact,

    /// Whether to append to an existing artifact.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub append: Option<bool>,

    /// Whether this is the last chunk of the artifact.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_chunk: Option<bool>,
}

fn kind_task() -> String {
    "task".to_string()
}

fn kind_message() -> String {
    "message".to_string()
}

fn kind_status_update() -> String {
    "status-update".to_string()
}

fn kind_artifact_update() -> String {
    "artifact-update".to_string()
}

fn default_preferred_transport() -> Option<String> {
    Some("JSONRPC".to_string())
}

/// An event delivered by a transport client to its event consumer.
///
/// On the wire each variant is the flat inner object; its `kind` field
/// (`task`, `message`, `status-update`, `artifact-update`) picks the variant.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum ClientEvent {
    /// A complete task snapshot.
    Task(Task),

    /// A direct message.
    Message(Message),

    /// A task status update event.
    StatusUpdate(TaskStatusUpdateEvent),

    /// An artifact update event.
    ArtifactUpdate(TaskArtifactUpdateEvent),
}

impl ClientEvent {
    /// The `kind` discriminator of this event.
    pub fn kind(&self) -> &'static str {
        match self {
            ClientEvent::Task(_) => "task",
            ClientEvent::Message(_) => "message",
            ClientEvent::StatusUpdate(_) => "status-update",
            ClientEvent::ArtifactUpdate(_) => "artifact-update",
        }
    }
}

impl From<SendMessageResponse> for ClientEvent {
    fn from(response: SendMessageResponse) -> Self {
        match response {
            SendMessageResponse::Task(task) => ClientEvent::Task(task),
            SendMessageResponse::Message(message) => ClientEvent::Message(message),
        }
    }
}

impl<'de> Deserialize<'de> for ClientEvent {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        use serde::de::Error;

        let value = serde_json::Value::deserialize(deserializer)?;
        let event = match value.get("kind").and_then(|v| v.as_str()) {
            Some("task") => serde_json::from_value(value).map(ClientEvent::Task),
            Some("message") => serde_json::from_value(value).map(ClientEvent::Message),
            Some("status-update") => serde_json::from_value(value).map(ClientEvent::StatusUpdate),
            Some("artifact-update") => {
                serde_json::from_value(value).map(ClientEvent::ArtifactUpdate)
            }
            Some(other) => return Err(D::Error::custom(format!("unknown event kind '{other}'"))),
            None => return Err(D::Error::missing_field("kind")),
        };
        event.map_err(D::Error::custom)
    }
}

// ============================================================================
// Agent Card
// ============================================================================

/// Self-describing manifest for an A2A agent: the target of a send.
///
/// Proto ref: `message AgentCard`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentCard {
    /// Human-readable name.
    pub name: String,

    /// Description of the agent's capabilities.
    pub description: String,

    /// Agent version string.
    pub version: String,

    /// Primary URL for the agent.
    pub url: String,

    /// Preferred transport protocol (e.g. "JSONRPC", "GRPC", "HTTP+JSON").
    /// Defaults to "JSONRPC" when the field is absent.
    #[serde(
        default = "default_preferred_transport",
        skip_serializing_if = "Option::is_none"
    )]
    pub preferred_transport: Option<String>,

    /// Supported transport interfaces.
    #[serde(default, alias = "additionalInterfaces")]
    pub supported_interfaces: Vec<AgentInterface>,

    /// Agent capabilities.
    #[serde(default)]
    pub capabilities: AgentCapabilities,

    /// Default MIME types accepted as input.
    #[serde(default)]
    pub default_input_modes: Vec<String>,

    /// Default MIME types produced as output.
    #[serde(default)]
    pub default_output_modes: Vec<String>,

    /// Skills the agent supports.
    #[serde(default)]
    pub skills: Vec<AgentSkill>,

    /// Protocol version.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub protocol_version: Option<String>,
}

/// A transport interface supported by an agent.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentInterface {
    /// URL of the interface endpoint.
    pub url: String,

    /// Transport protocol (e.g. "JSONRPC", "HTTP+JSON", "GRPC").
    pub transport: String,
}

/// Agent capabilities declaration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentCapabilities {
    /// Whether the agent supports streaming responses.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub streaming: Option<bool>,

    /// Whether the agent supports push notifications.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub push_notifications: Option<bool>,

    /// Whether the agent provides a history of state transitions for a task.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state_transition_history: Option<bool>,
}

/// A skill that an agent can perform.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentSkill {
    /// Unique skill identifier.
    pub id: String,

    /// Human-readable skill name.
    pub name: String,

    /// Description of what the skill does.
    pub description: String,

    /// Categorization tags.
    #[serde(default)]
    pub tags: Vec<String>,

    /// Example prompts/inputs.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub examples: Option<Vec<String>>,

    /// MIME types this skill accepts as input.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub input_modes: Option<Vec<String>>,

    /// MIME types this skill produces as output.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_modes: Option<Vec<String>>,
}

// ============================================================================
// JSON-RPC Foundation
// ============================================================================

/// A JSON-RPC 2.0 request ID.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum JsonRpcId {
    /// String identifier.
    String(String),
    /// Numeric identifier.
    Number(i64),
    /// Null.
    Null,
}

impl fmt::Display for JsonRpcId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JsonRpcId::String(s) => write!(f, "{}", s),
            JsonRpcId::Number(n) => write!(f, "{}", n),
            JsonRpcId::Null => write!(f, "null"),
        }
    }
}

/// A JSON-RPC 2.0 request.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JsonRpcRequest {
    /// Protocol version: always "2.0".
    pub jsonrpc: String,

    /// Request identifier.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<JsonRpcId>,

    /// Method name.
    pub method: String,

    /// Method parameters.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub params: Option<serde_json::Value>,
}

impl JsonRpcRequest {
    /// Create a new JSON-RPC 2.0 request.
    pub fn new(
        id: impl Into<JsonRpcId>,
        method: impl Into<String>,
        params: Option<serde_json::Value>,
    ) -> Self {
        JsonRpcRequest {
            jsonrpc: "2.0".to_string(),
            id: Some(id.into()),
            method: method.into(),
            params,
        }
    }
}

/// A JSON-RPC 2.0 response.
///
/// Exactly one of `result` or `error` will be present.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JsonRpcResponse {
    /// Protocol version: always "2.0".
    pub jsonrpc: String,

    /// Request identifier this response corresponds to.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<JsonRpcId>,

    /// Successful result.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<serde_json::Value>,

    /// Error result.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<JsonRpcError>,
}

impl JsonRpcResponse {
    /// Create a successful JSON-RPC response.
    pub fn success(id: Option<JsonRpcId>, result: serde_json::Value) -> Self {
        JsonRpcResponse {
            jsonrpc: "2.0".to_string(),
            id,
            result: Some(result),
            error: None,
        }
    }

    /// Create an error JSON-RPC response.
    pub fn error(id: Option<JsonRpcId>, error: JsonRpcError) -> Self {
        JsonRpcResponse {
            jsonrpc: "2.0".to_string(),
            id,
            result: None,
            error: Some(error),
        }
    }
}

/// A JSON-RPC 2.0 error object.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JsonRpcError {
    /// Error code.
    pub code: i64,

    /// Human-readable error message.
    pub message: String,

    /// Optional structured error data.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

impl From<String> for JsonRpcId {
    fn from(s: String) -> Self {
        JsonRpcId::String(s)
    }
}

impl From<&str> for JsonRpcId {
    fn from(s: &str) -> Self {
        JsonRpcId::String(s.to_string())
    }
}

impl From<i64> for JsonRpcId {
    fn from(n: i64) -> Self {
        JsonRpcId::Number(n)
    }
}

// ============================================================================
// Request / Response Parameter Types
// ============================================================================

/// Parameters for `message/send`.
///
/// Proto ref: `message SendMessageRequest`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendMessageParams {
    /// The message to send.
    pub message: Message,

    /// Optional send configuration.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub configuration: Option<SendMessageConfiguration>,

    /// Arbitrary metadata.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<serde_json::Value>,
}

/// Configuration for a `message/send` request.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendMessageConfiguration {
    /// MIME types the client can accept as output.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub accepted_output_modes: Option<Vec<String>>,

    /// Maximum number of history messages to include in the response.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub history_length: Option<i32>,

    /// Whether the request should block until the task completes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub blocking: Option<bool>,
}

/// Parameters for `tasks/get`.
///
/// Proto ref: `message GetTaskRequest`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetTaskParams {
    /// Task ID to retrieve.
    pub id: String,

    /// Maximum number of history messages to include.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub history_length: Option<i32>,
}

/// Result of `message/send`: either a task or a direct message.
///
/// Same flat, `kind`-discriminated encoding as [`ClientEvent`]; update events
/// are not valid here.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum SendMessageResponse {
    /// A task was created/updated.
    Task(Task),

    /// A direct message response.
    Message(Message),
}

impl<'de> Deserialize<'de> for SendMessageResponse {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match ClientEvent::deserialize(deserializer)? {
            ClientEvent::Task(task) => Ok(SendMessageResponse::Task(task)),
            ClientEvent::Message(message) => Ok(SendMessageResponse::Message(message)),
            other => Err(serde::de::Error::custom(format!(
                "'{}' is not a valid message/send result",
                other.kind()
            ))),
        }
    }
}

// ============================================================================
// Convenience Constructors
// ============================================================================

impl Part {
    /// Create a text part.
    pub fn text(text: impl Into<String>) -> Self {
        Part::Text {
            text: text.into(),
            metadata: None,
        }
    }

    /// Create a file part from base64-encoded bytes.
    pub fn file_from_bytes(
        bytes: impl Into<String>,
        name: Option<String>,
        mime_type: Option<String>,
    ) -> Self {
        Part::File {
            file: FileContent::Bytes(FileWithBytes {
                bytes: bytes.into(),
                mime_type,
                name,
            }),
            metadata: None,
        }
    }

    /// Create a structured data part.
    pub fn data(data: serde_json::Value) -> Self {
        Part::Data {
            data,
            metadata: None,
        }
    }
}

impl Message {
    /// Create a new agent message with text content.
    pub fn agent(message_id: impl Into<String>, text: impl Into<String>) -> Self {
        Message {
            message_id: message_id.into(),
            role: Role::Agent,
            kind: kind_message(),
            parts: vec![Part::text(text)],
            context_id: None,
            task_id: None,
            metadata: None,
            extensions: None,
            reference_task_ids: None,
        }
    }
}

impl Task {
    /// Create a bare task snapshot in the given state.
    pub fn new(id: impl Into<String>, context_id: impl Into<String>, state: TaskState) -> Self {
        Task {
            id: id.into(),
            context_id: context_id.into(),
            kind: kind_task(),
            status: TaskStatus::new(state),
            artifacts: None,
            history: None,
            metadata: None,
        }
    }
}

impl TaskStatus {
    /// Create a new TaskStatus with the given state and no message.
    pub fn new(state: TaskState) -> Self {
        TaskStatus {
            state,
            message: None,
            timestamp: None,
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
