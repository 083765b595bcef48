//! Helpers shared by the client and the invocation pipeline.

pub mod constants;
pub mod document;

pub use constants::*;
pub use document::{document_to_part, documents_to_parts, Document};
