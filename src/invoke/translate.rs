//! Translation of transport events into [`SendMessageResult`]s.

use chrono::{DateTime, FixedOffset};

use super::classify::{classify_state, StateClass};
use super::result::{
    AgentArtifact, AgentContent, AgentMessage, AgentTask, AgentTaskStatus, SendMessageResult,
};
use crate::error::{A2AError, A2AResult};
use crate::types::{Artifact, ClientEvent, FileContent, Message, Part, Task, TaskStatus};

/// Turns [`ClientEvent`]s and polled [`Task`]s into caller-facing results.
///
/// Stateless; cheap to copy into event callbacks.
#[derive(Debug, Clone, Copy, Default)]
pub struct ResultTranslator;

impl ResultTranslator {
    pub fn new() -> Self {
        Self
    }

    /// Translate an event delivered by a transport client.
    ///
    /// # Errors
    ///
    /// - [`A2AError::UnsupportedEventType`] for status and artifact updates
    /// - [`A2AError::UnsupportedTaskState`] for tasks waiting on input or auth
    /// - [`A2AError::InvalidAgentResponse`] for malformed timestamps
    pub fn translate(&self, event: ClientEvent) -> A2AResult<SendMessageResult> {
        match event {
            ClientEvent::Message(message) => {
                Ok(SendMessageResult::Message(self.translate_message(message)?))
            }
            ClientEvent::Task(task) => self.translate_task(task),
            other => Err(A2AError::unsupported_event_type(other.kind())),
        }
    }

    /// Translate a task snapshot, rejecting states that need a continuation.
    pub fn translate_task(&self, task: Task) -> A2AResult<SendMessageResult> {
        let state = task.status.state;
        if classify_state(state) == StateClass::Unsupported {
            return Err(A2AError::unsupported_task_state(state));
        }

        let Task {
            id,
            context_id,
            status,
            artifacts,
            metadata,
            ..
        } = task;

        Ok(SendMessageResult::Task(AgentTask {
            task_id: id,
            context_id,
            status: self.translate_status(status)?,
            metadata,
            artifacts: artifacts
                .unwrap_or_default()
                .into_iter()
                .map(translate_artifact)
                .collect(),
        }))
    }

    /// Translate a message.
    pub fn translate_message(&self, message: Message) -> A2AResult<AgentMessage> {
        Ok(AgentMessage {
            role: message.role,
            message_id: message.message_id,
            context_id: message.context_id,
            task_id: message.task_id,
            reference_task_ids: message.reference_task_ids.unwrap_or_default(),
            metadata: message.metadata,
            contents: translate_parts(message.parts),
        })
    }

    fn translate_status(&self, status: TaskStatus) -> A2AResult<AgentTaskStatus> {
        let timestamp = status.timestamp.as_deref().map(parse_timestamp).transpose()?;
        let message = status
            .message
            .map(|message| self.translate_message(message))
            .transpose()?;
        Ok(AgentTaskStatus {
            state: status.state,
            message,
            timestamp,
        })
    }
}

fn translate_artifact(artifact: Artifact) -> AgentArtifact {
    AgentArtifact {
        artifact_id: artifact.artifact_id,
        name: artifact.name,
        description: artifact.description,
        metadata: artifact.metadata,
        contents: translate_parts(artifact.parts),
    }
}

fn translate_parts(parts: Vec<Part>) -> Vec<AgentContent> {
    parts.into_iter().map(translate_part).collect()
}

fn translate_part(part: Part) -> AgentContent {
    match part {
        Part::Text { text, metadata } => AgentContent::Text { text, metadata },
        Part::Data { data, metadata } => AgentContent::Object { data, metadata },
        Part::File { file, metadata } => match file {
            FileContent::Bytes(file) => AgentContent::File {
                bytes: file.bytes,
                name: file.name,
                mime_type: file.mime_type,
                metadata,
            },
            FileContent::Uri(file) => AgentContent::FileReference {
                uri: file.uri,
                name: file.name,
                mime_type: file.mime_type,
                metadata,
            },
        },
    }
}

fn parse_timestamp(raw: &str) -> A2AResult<DateTime<FixedOffset>> {
    DateTime::parse_from_rfc3339(raw).map_err(|e| {
        A2AError::InvalidAgentResponse(format!("invalid task status timestamp '{raw}': {e}"))
    })
}
