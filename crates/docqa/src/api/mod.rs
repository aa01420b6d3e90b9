//! Backend API integration
//!
//! This module provides:
//! - The gateway client: the single choke point for authenticated calls
//! - Normalized error taxonomy for transport, server, and auth failures
//! - Trait seams so components can be driven without a live server

mod client;
mod error;
mod traits;

pub use client::{ApiClient, SessionExpiryHook};
pub use error::ApiError;
pub use traits::{AuthApi, ChatApi, DocumentsApi};

/// Request and response payloads of the backend contract
pub mod wire {
    use chrono::{DateTime, Utc};
    use serde::{Deserialize, Serialize};

    use crate::models::{ChatMessage, Citation, DocumentId, SessionId, User};

    /// Body of an account-creation request
    #[derive(Debug, Clone, Serialize)]
    pub struct RegisterRequest {
        #[serde(skip_serializing_if = "Option::is_none")]
        pub full_name: Option<String>,
        pub username: String,
        pub email: String,
        pub password: String,
    }

    /// Body of a login request
    #[derive(Debug, Clone, Serialize)]
    pub struct LoginRequest {
        pub email: String,
        pub password: String,
    }

    /// Successful authentication exchange: credential plus identity
    #[derive(Debug, Clone, Deserialize)]
    pub struct TokenResponse {
        pub access_token: String,
        #[serde(default)]
        pub token_type: String,
        pub user: User,
    }

    /// Body of a question dispatched to the assistant
    #[derive(Debug, Clone, Serialize)]
    pub struct QueryRequest {
        pub question: String,
        /// `None` means "search all ready documents"
        pub document_ids: Option<Vec<DocumentId>>,
        /// `None` asks the server to open a new session
        #[serde(skip_serializing_if = "Option::is_none")]
        pub session_id: Option<SessionId>,
    }

    /// The assistant's answer to one question
    #[derive(Debug, Clone, Deserialize)]
    pub struct QueryResponse {
        pub question: String,
        pub answer: String,
        pub sources: Vec<Citation>,
        /// Session the exchange was recorded under (newly created if the
        /// request carried no session id)
        pub session_id: SessionId,
        pub created_at: DateTime<Utc>,
    }

    /// Full transcript of a single session
    #[derive(Debug, Clone, Deserialize)]
    pub struct SessionDetail {
        pub id: SessionId,
        pub title: String,
        #[serde(default)]
        pub messages: Vec<ChatMessage>,
        pub created_at: DateTime<Utc>,
        pub updated_at: DateTime<Utc>,
    }

    /// Error payload the server attaches to non-2xx responses
    #[derive(Debug, Deserialize)]
    pub struct ErrorDetail {
        pub detail: Option<String>,
    }
}
