//! Document model representing an uploaded file and its ingestion state

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Unique identifier for a document (server-assigned)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DocumentId(pub String);

impl DocumentId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for DocumentId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for DocumentId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Server-side ingestion state of a document
///
/// Moves forward through `pending`/`processing` into exactly one of the
/// terminal states `ready` or `error`; a terminal document is never
/// revisited by polling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentStatus {
    Pending,
    Processing,
    Ready,
    Error,
}

impl DocumentStatus {
    /// Whether this status ends the document's ingestion lifecycle
    pub fn is_terminal(self) -> bool {
        matches!(self, DocumentStatus::Ready | DocumentStatus::Error)
    }
}

/// An uploaded document tracked by the ingestion layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    /// Server-assigned document ID
    pub id: DocumentId,
    /// Filename as uploaded by the user
    pub original_name: String,
    /// Size of the uploaded file in bytes
    pub file_size: u64,
    /// Page count, known once ingestion completes
    #[serde(default)]
    pub pages: u32,
    /// Number of indexed chunks, known once ingestion completes
    #[serde(default)]
    pub chunks: u32,
    /// Current ingestion status
    pub status: DocumentStatus,
    /// When the document was uploaded
    pub created_at: DateTime<Utc>,
}
