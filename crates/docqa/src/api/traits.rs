//! API trait seams
//!
//! Components consume the backend through these traits rather than the
//! concrete client, so trackers and engines can be exercised against an
//! in-memory backend in tests. [`super::ApiClient`] implements all three.

use crate::api::wire::{
    LoginRequest, QueryRequest, QueryResponse, RegisterRequest, SessionDetail, TokenResponse,
};
use crate::api::ApiError;
use crate::models::{ChatSession, Document, DocumentId, ProfileUpdate, SessionId, User};

/// Account and identity operations
pub trait AuthApi: Send + Sync {
    /// Create an account, returning a credential and the new user
    fn register(&self, request: &RegisterRequest) -> Result<TokenResponse, ApiError>;

    /// Authenticate, returning a credential and the user
    fn login(&self, request: &LoginRequest) -> Result<TokenResponse, ApiError>;

    /// Resolve the identity behind the stored credential
    fn me(&self) -> Result<User, ApiError>;

    /// Apply a partial profile update, returning the updated user
    fn update_profile(&self, update: &ProfileUpdate) -> Result<User, ApiError>;
}

/// Document upload and status operations
pub trait DocumentsApi: Send + Sync {
    /// List the current user's documents (server orders newest first)
    fn list_documents(&self) -> Result<Vec<Document>, ApiError>;

    /// Fetch the current state of one document
    fn get_document(&self, id: &DocumentId) -> Result<Document, ApiError>;

    /// Upload a file, returning the created document record
    fn upload_document(&self, file_name: &str, data: &[u8]) -> Result<Document, ApiError>;

    /// Remove a document and its indexed content
    fn delete_document(&self, id: &DocumentId) -> Result<(), ApiError>;
}

/// Conversation operations
pub trait ChatApi: Send + Sync {
    /// List the current user's sessions (server orders newest first)
    fn list_sessions(&self) -> Result<Vec<ChatSession>, ApiError>;

    /// Fetch the full transcript of a session
    fn get_session(&self, id: &SessionId) -> Result<SessionDetail, ApiError>;

    /// Delete a session and its transcript
    fn delete_session(&self, id: &SessionId) -> Result<(), ApiError>;

    /// Ask a question, optionally scoped to selected documents
    fn query(&self, request: &QueryRequest) -> Result<QueryResponse, ApiError>;
}
