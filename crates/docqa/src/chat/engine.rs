//! Conversation engine
//!
//! Owns the session list and the transcript of the active session. All
//! mutations go through `&mut self`, so overlapping exchanges against the
//! same transcript cannot be expressed; the rollback in [`ask`] relies
//! on that.
//!
//! [`ask`]: ConversationEngine::ask

use std::sync::Arc;

use log::{info, warn};

use crate::api::wire::QueryRequest;
use crate::api::{ApiError, ChatApi};
use crate::models::{ChatMessage, ChatSession, DocumentId, SessionId};

/// Session list and active-transcript state
pub struct ConversationEngine {
    api: Arc<dyn ChatApi>,
    sessions: Vec<ChatSession>,
    active: Option<SessionId>,
    transcript: Vec<ChatMessage>,
}

impl ConversationEngine {
    /// Create an engine with no sessions loaded and no active conversation
    pub fn new(api: Arc<dyn ChatApi>) -> Self {
        Self {
            api,
            sessions: Vec::new(),
            active: None,
            transcript: Vec::new(),
        }
    }

    /// Known sessions, in the server-defined order (newest first)
    pub fn sessions(&self) -> &[ChatSession] {
        &self.sessions
    }

    /// The session the transcript belongs to, if any
    pub fn active_session(&self) -> Option<&SessionId> {
        self.active.as_ref()
    }

    /// Messages of the active conversation
    pub fn transcript(&self) -> &[ChatMessage] {
        &self.transcript
    }

    /// Reload the session list from the server
    pub fn refresh_sessions(&mut self) -> Result<(), ApiError> {
        self.sessions = self.api.list_sessions()?;
        Ok(())
    }

    /// Switch to a session, replacing the transcript wholesale with the
    /// server's authoritative message list
    pub fn load_session(&mut self, id: &SessionId) -> Result<(), ApiError> {
        self.active = Some(id.clone());
        let detail = self.api.get_session(id)?;
        self.transcript = detail.messages;
        Ok(())
    }

    /// Start a fresh conversation locally
    ///
    /// No network call: the server creates a session only when the first
    /// question is asked.
    pub fn new_conversation(&mut self) {
        self.active = None;
        self.transcript.clear();
    }

    /// Ask a question, optimistically appending the user message
    ///
    /// The user message is appended before dispatch and its index
    /// recorded; on failure the transcript is truncated back to that
    /// index, so the conversation looks as if the question was never
    /// asked. On success the assistant answer is appended, and for the
    /// first exchange of a new conversation the server-returned session
    /// id is adopted and the session list refreshed.
    ///
    /// An empty selection means "all ready documents".
    pub fn ask(&mut self, question: &str, document_ids: &[DocumentId]) -> Result<(), ApiError> {
        let question = question.trim();
        if question.is_empty() {
            return Ok(());
        }

        let appended_index = self.transcript.len();
        self.transcript.push(ChatMessage::user(question));

        let request = QueryRequest {
            question: question.to_string(),
            document_ids: if document_ids.is_empty() {
                None
            } else {
                Some(document_ids.to_vec())
            },
            session_id: self.active.clone(),
        };

        match self.api.query(&request) {
            Ok(response) => {
                self.transcript.push(ChatMessage::assistant(
                    response.answer,
                    response.sources,
                    response.created_at,
                ));

                if self.active.is_none() {
                    info!("Adopted new session {}", response.session_id.as_str());
                    self.active = Some(response.session_id);
                    if let Err(e) = self.refresh_sessions() {
                        warn!("Failed to refresh session list: {}", e);
                    }
                }
                Ok(())
            }
            Err(e) => {
                // Roll back exactly the optimistic append
                self.transcript.truncate(appended_index);
                Err(e)
            }
        }
    }

    /// Delete a session; deleting the active one also clears the
    /// transcript so no messages of a vanished session remain visible
    pub fn delete_session(&mut self, id: &SessionId) -> Result<(), ApiError> {
        self.api.delete_session(id)?;

        self.sessions.retain(|s| s.id != *id);
        if self.active.as_ref() == Some(id) {
            self.new_conversation();
        }

        info!("Deleted session {}", id.as_str());
        Ok(())
    }
}
