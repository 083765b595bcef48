//! Caller-facing result model.
//!
//! Everything a send can produce, independent of the wire types: either the
//! agent answered directly with a message, or it created a task.

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

use super::classify::{classify_state, Disposition, StateClass};
use crate::types::{Role, TaskState};

/// The single outcome of a send.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum SendMessageResult {
    /// The agent replied with a message. Always final.
    Message(AgentMessage),
    /// The agent created or updated a task.
    Task(AgentTask),
}

impl SendMessageResult {
    /// Whether this result ends the call or needs polling.
    ///
    /// Messages are final. Tasks follow [`classify_state`]; a task in an
    /// unsupported state never reaches this point through translation, and
    /// is reported as final if constructed by hand.
    pub fn disposition(&self) -> Disposition {
        match self {
            SendMessageResult::Message(_) => Disposition::Final,
            SendMessageResult::Task(task) => match classify_state(task.status.state) {
                StateClass::NonTerminal => Disposition::ContinuePolling,
                StateClass::Terminal | StateClass::Unsupported => Disposition::Final,
            },
        }
    }

    /// Shorthand for `disposition() == Disposition::Final`.
    pub fn is_final(&self) -> bool {
        self.disposition() == Disposition::Final
    }

    /// The task id, for task results.
    pub fn task_id(&self) -> Option<&str> {
        match self {
            SendMessageResult::Task(task) => Some(&task.task_id),
            SendMessageResult::Message(_) => None,
        }
    }

    /// The task state, for task results.
    pub fn task_state(&self) -> Option<TaskState> {
        match self {
            SendMessageResult::Task(task) => Some(task.status.state),
            SendMessageResult::Message(_) => None,
        }
    }

    pub fn as_message(&self) -> Option<&AgentMessage> {
        match self {
            SendMessageResult::Message(message) => Some(message),
            SendMessageResult::Task(_) => None,
        }
    }

    pub fn as_task(&self) -> Option<&AgentTask> {
        match self {
            SendMessageResult::Task(task) => Some(task),
            SendMessageResult::Message(_) => None,
        }
    }
}

/// A message sent by the agent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentMessage {
    pub role: Role,
    pub message_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub task_id: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub reference_task_ids: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<serde_json::Value>,
    #[serde(default)]
    pub contents: Vec<AgentContent>,
}

impl AgentMessage {
    /// All text contents joined with newlines.
    pub fn text(&self) -> String {
        join_text(&self.contents)
    }
}

/// A task created by the agent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentTask {
    pub task_id: String,
    pub context_id: String,
    pub status: AgentTaskStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub artifacts: Vec<AgentArtifact>,
}

/// Status of an [`AgentTask`] at the time it was observed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentTaskStatus {
    pub state: TaskState,
    /// Message the agent attached to the status, e.g. a failure reason.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<AgentMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<FixedOffset>>,
}

/// An output produced by a task.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentArtifact {
    pub artifact_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<serde_json::Value>,
    #[serde(default)]
    pub contents: Vec<AgentContent>,
}

impl AgentArtifact {
    /// All text contents joined with newlines.
    pub fn text(&self) -> String {
        join_text(&self.contents)
    }
}

/// One piece of content in a message or artifact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum AgentContent {
    /// Plain text.
    Text {
        text: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        metadata: Option<serde_json::Value>,
    },
    /// Structured JSON data.
    Object {
        data: serde_json::Value,
        #[serde(skip_serializing_if = "Option::is_none")]
        metadata: Option<serde_json::Value>,
    },
    /// A file delivered inline as base64.
    #[serde(rename_all = "camelCase")]
    File {
        bytes: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        name: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        mime_type: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        metadata: Option<serde_json::Value>,
    },
    /// A file delivered by reference.
    #[serde(rename_all = "camelCase")]
    FileReference {
        uri: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        name: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        mime_type: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        metadata: Option<serde_json::Value>,
    },
}

impl AgentContent {
    /// The text, for text contents.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            AgentContent::Text { text, .. } => Some(text),
            _ => None,
        }
    }
}

fn join_text(contents: &[AgentContent]) -> String {
    contents
        .iter()
        .filter_map(AgentContent::as_text)
        .collect::<Vec<_>>()
        .join("\n")
}
