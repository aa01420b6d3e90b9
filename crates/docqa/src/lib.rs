//! docqa crate - Client-side synchronization core for a private
//! document Q&A service
//!
//! This crate keeps client-held state in step with server-side
//! asynchronous processes the client can only observe by polling:
//! - Gateway HTTP client with bearer-credential injection, normalized
//!   errors, and global session teardown on 401
//! - Session manager with an explicit startup lifecycle
//! - Ingestion tracker: upload preconditions, cosmetic progress ramp,
//!   and per-document status polling with explicit cancellation
//! - Conversation engine: session list plus optimistic ask/rollback
//! - Workspace statistics derived from the synchronized state
//!
//! This crate has zero UI dependencies; views consume it through plain
//! method calls and the progress/expiry callbacks.

pub mod api;
pub mod chat;
pub mod config;
pub mod credentials;
pub mod ingest;
pub mod models;
pub mod session;
pub mod stats;

pub use api::{ApiClient, ApiError, AuthApi, ChatApi, DocumentsApi, SessionExpiryHook};
pub use chat::ConversationEngine;
pub use crate::config::{ServerConfig, DEFAULT_BASE_URL};
pub use credentials::{CredentialStore, FileCredentialStore, InMemoryCredentialStore};
pub use ingest::{
    validate_upload, IngestTracker, ProgressSink, UploadError, ACCEPTED_EXTENSIONS,
    DEFAULT_POLL_INTERVAL, MAX_UPLOAD_BYTES, PROGRESS_COMPLETE, RAMP_CAP, RAMP_START,
};
pub use models::{
    ChatMessage, ChatSession, Citation, Document, DocumentId, DocumentStatus, ProfileUpdate, Role,
    SessionId, User,
};
pub use session::{SessionManager, SessionState};
pub use stats::WorkspaceStats;
