//! Chat models: sessions, messages, and citations

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Unique identifier for a chat session (server-assigned)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(pub String);

impl SessionId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for SessionId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for SessionId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Who authored a message in the transcript
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// A citation substantiating part of an assistant answer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Citation {
    /// Friendly name of the cited document
    pub source: String,
    /// 1-based page number within the document
    pub page: u32,
    /// Excerpt of the cited passage
    pub content: String,
}

/// A single message within a session transcript
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
    /// Citations backing an assistant answer; absent on user messages
    #[serde(default)]
    pub sources: Option<Vec<Citation>>,
    /// User messages carry the local wall-clock time; assistant messages
    /// carry the server-assigned timestamp
    pub ts: DateTime<Utc>,
}

impl ChatMessage {
    /// Create a user message stamped with the current wall-clock time
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
            sources: None,
            ts: Utc::now(),
        }
    }

    /// Create an assistant message from a server answer
    pub fn assistant(
        content: impl Into<String>,
        sources: Vec<Citation>,
        ts: DateTime<Utc>,
    ) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
            sources: Some(sources),
            ts,
        }
    }
}

/// Summary of a chat session as listed by the server
///
/// List ordering is server-defined (most recent first) and is not
/// re-sorted client-side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatSession {
    pub id: SessionId,
    /// Title derived by the server from the first question
    pub title: String,
    pub message_count: usize,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
