//! Conversion of outbound documents into message parts.
//!
//! The content type decides the part kind:
//! - `text/*`, `application/xml`, `application/yaml` → [`Part::Text`]
//! - `application/json` → [`Part::Data`] (parsed)
//! - `application/pdf`, `image/*` → [`Part::File`] with base64 bytes

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use crate::error::{A2AError, A2AResult};
use crate::types::Part;

/// A document attached to an outbound message.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    /// Stable reference used in error messages (store id, URI, ...).
    pub reference: String,
    /// MIME type of the content. Required for conversion.
    pub content_type: Option<String>,
    /// Optional file name forwarded on file parts.
    pub name: Option<String>,
    /// Raw document content.
    pub bytes: Vec<u8>,
}

impl Document {
    /// Create a document with a content type.
    pub fn new(
        reference: impl Into<String>,
        content_type: impl Into<String>,
        bytes: impl Into<Vec<u8>>,
    ) -> Self {
        Self {
            reference: reference.into(),
            content_type: Some(content_type.into()),
            name: None,
            bytes: bytes.into(),
        }
    }

    /// Set the file name (builder-style).
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}

enum PartKind {
    Text,
    Data,
    File,
}

/// Convert a list of documents, preserving order. Fails on the first
/// document that cannot be converted.
pub fn documents_to_parts(documents: &[Document]) -> A2AResult<Vec<Part>> {
    documents.iter().map(document_to_part).collect()
}

/// Convert one document into a message part.
pub fn document_to_part(document: &Document) -> A2AResult<Part> {
    let content_type = document
        .content_type
        .as_deref()
        .map(str::trim)
        .filter(|ct| !ct.is_empty())
        .ok_or_else(|| {
            A2AError::DocumentConversion(format!(
                "Content type is unset for document with reference '{}'",
                document.reference
            ))
        })?;

    let kind = classify_media_type(content_type).ok_or_else(|| {
        A2AError::DocumentConversion(format!(
            "Unsupported content type '{}' for document with reference '{}'",
            content_type, document.reference
        ))
    })?;

    match kind {
        PartKind::Text => {
            let text = String::from_utf8(document.bytes.clone()).map_err(|_| {
                A2AError::DocumentConversion(format!(
                    "Document with reference '{}' is not valid UTF-8 text",
                    document.reference
                ))
            })?;
            Ok(Part::text(text))
        }
        PartKind::Data => {
            let data: serde_json::Value =
                serde_json::from_slice(&document.bytes).map_err(|e| {
                    A2AError::DocumentConversion(format!(
                        "Failed to parse JSON document with reference '{}': {e}",
                        document.reference
                    ))
                })?;
            Ok(Part::data(data))
        }
        PartKind::File => Ok(Part::file_from_bytes(
            STANDARD.encode(&document.bytes),
            document.name.clone(),
            Some(content_type.to_string()),
        )),
    }
}

fn classify_media_type(content_type: &str) -> Option<PartKind> {
    let essence = content_type.split(';').next()?.trim().to_ascii_lowercase();
    let (top, sub) = essence.split_once('/')?;
    if top.is_empty() || sub.is_empty() {
        return None;
    }

    match (top, sub) {
        ("text", _) => Some(PartKind::Text),
        ("application", "xml" | "yaml") => Some(PartKind::Text),
        ("application", "json") => Some(PartKind::Data),
        ("application", "pdf") | ("image", _) => Some(PartKind::File),
        _ => None,
    }
}
