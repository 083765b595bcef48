//! The message a caller sends, before it is put on the wire.

use crate::error::{A2AError, A2AResult};
use crate::types::{Message, Part, Role};
use crate::utils::document::{document_to_part, Document};

/// One piece of outbound content.
#[derive(Debug, Clone)]
pub enum OutboundContent {
    Text(String),
    Data(serde_json::Value),
    Document(Document),
}

/// A user message addressed to a remote agent.
///
/// ```
/// use a2a_invoke::invoke::OutboundMessage;
///
/// let message = OutboundMessage::text("Summarize the attached report")
///     .with_context_id("ctx-42")
///     .with_reference_task_ids(["task-1"]);
/// let wire = message.into_message().unwrap();
/// assert_eq!(wire.context_id.as_deref(), Some("ctx-42"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct OutboundMessage {
    pub contents: Vec<OutboundContent>,
    pub context_id: Option<String>,
    pub task_id: Option<String>,
    pub reference_task_ids: Vec<String>,
    pub metadata: Option<serde_json::Value>,
}

impl OutboundMessage {
    /// A message with a single text content.
    pub fn text(text: impl Into<String>) -> Self {
        Self::default().with_text(text)
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.contents.push(OutboundContent::Text(text.into()));
        self
    }

    pub fn with_data(mut self, data: serde_json::Value) -> Self {
        self.contents.push(OutboundContent::Data(data));
        self
    }

    pub fn with_document(mut self, document: Document) -> Self {
        self.contents.push(OutboundContent::Document(document));
        self
    }

    /// Continue an existing conversation.
    pub fn with_context_id(mut self, context_id: impl Into<String>) -> Self {
        self.context_id = Some(context_id.into());
        self
    }

    /// Address an existing task.
    pub fn with_task_id(mut self, task_id: impl Into<String>) -> Self {
        self.task_id = Some(task_id.into());
        self
    }

    /// Tasks the agent should use as context.
    pub fn with_reference_task_ids<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.reference_task_ids = ids.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_metadata(mut self, metadata: serde_json::Value) -> Self {
        self.metadata = Some(metadata);
        self
    }

    /// Build the wire message.
    ///
    /// The message gets a fresh id and the `user` role. Contents keep their
    /// order. Blank context and task ids and an empty reference list are
    /// left out.
    ///
    /// # Errors
    ///
    /// Fails with [`A2AError::Configuration`] when there is no content, or
    /// with [`A2AError::DocumentConversion`] when a document cannot be
    /// converted.
    pub fn into_message(self) -> A2AResult<Message> {
        if self.contents.is_empty() {
            return Err(A2AError::configuration(
                "message must contain at least one part",
            ));
        }

        let parts = self
            .contents
            .iter()
            .map(|content| match content {
                OutboundContent::Text(text) => Ok(Part::text(text.clone())),
                OutboundContent::Data(data) => Ok(Part::data(data.clone())),
                OutboundContent::Document(document) => document_to_part(document),
            })
            .collect::<A2AResult<Vec<_>>>()?;

        let reference_task_ids: Vec<String> = self
            .reference_task_ids
            .into_iter()
            .filter(|id| !id.trim().is_empty())
            .collect();

        Ok(Message {
            message_id: uuid::Uuid::new_v4().to_string(),
            role: Role::User,
            kind: "message".to_string(),
            parts,
            context_id: non_blank(self.context_id),
            task_id: non_blank(self.task_id),
            metadata: self.metadata,
            extensions: None,
            reference_task_ids: (!reference_task_ids.is_empty()).then_some(reference_task_ids),
        })
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
