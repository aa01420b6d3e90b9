//! Gateway HTTP client
//!
//! Single choke point for all authenticated backend calls. Attaches the
//! bearer credential, normalizes failures into [`ApiError`], and performs
//! the global session teardown on 401 responses.
//!
//! Uses synchronous HTTP (ureq) to be executor-agnostic.

use std::sync::Arc;
use std::time::Duration;

use log::warn;
use serde::de::DeserializeOwned;
use serde::Serialize;
use ureq::http::Response;
use ureq::{Agent, Body};

use super::wire::{
    ErrorDetail, LoginRequest, QueryRequest, QueryResponse, RegisterRequest, SessionDetail,
    TokenResponse,
};
use super::{ApiError, AuthApi, ChatApi, DocumentsApi};
use crate::config::ServerConfig;
use crate::credentials::CredentialStore;
use crate::models::{ChatSession, Document, DocumentId, ProfileUpdate, SessionId, User};

/// Invoked after a 401 has torn the session down; the navigation layer
/// subscribes here to send the user back to the sign-in view.
pub type SessionExpiryHook = Box<dyn Fn() + Send + Sync>;

/// Authenticated client for the document Q&A backend
pub struct ApiClient {
    agent: Agent,
    base_url: String,
    credentials: Arc<dyn CredentialStore>,
    on_session_expired: Option<SessionExpiryHook>,
}

impl ApiClient {
    /// Upper bound on any single request round-trip
    const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

    /// Create a new client for the configured server
    ///
    /// # Arguments
    /// * `config` - Server location (base URL)
    /// * `credentials` - Store holding the bearer credential, if any
    pub fn new(config: &ServerConfig, credentials: Arc<dyn CredentialStore>) -> Self {
        // Non-2xx responses must come back as responses, not errors, so the
        // server-supplied detail message can still be read from the body.
        let agent = Agent::config_builder()
            .timeout_global(Some(Self::REQUEST_TIMEOUT))
            .http_status_as_error(false)
            .build()
            .new_agent();

        Self {
            agent,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            credentials,
            on_session_expired: None,
        }
    }

    /// Register a callback fired after a 401 has invalidated the session
    pub fn with_session_expiry_hook(mut self, hook: impl Fn() + Send + Sync + 'static) -> Self {
        self.on_session_expired = Some(Box::new(hook));
        self
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn bearer(&self) -> Option<String> {
        self.credentials
            .load()
            .map(|token| format!("Bearer {}", token))
    }

    fn transport_error(err: ureq::Error) -> ApiError {
        ApiError::Network {
            message: err.to_string(),
        }
    }

    /// Global 401 handling: the credential is cleared for every pending and
    /// future call, not just the one that observed the status.
    fn expire_session(&self) {
        warn!("Session rejected by server, clearing stored credential");
        if let Err(e) = self.credentials.clear() {
            warn!("Failed to clear stored credential: {}", e);
        }
        if let Some(hook) = &self.on_session_expired {
            hook();
        }
    }

    /// Map the response status into the error taxonomy
    fn check(&self, mut response: Response<Body>) -> Result<Response<Body>, ApiError> {
        let status = response.status().as_u16();

        if status == 401 {
            self.expire_session();
            return Err(ApiError::Unauthorized);
        }

        if !(200..300).contains(&status) {
            let detail = response
                .body_mut()
                .read_to_string()
                .ok()
                .and_then(|body| serde_json::from_str::<ErrorDetail>(&body).ok())
                .and_then(|payload| payload.detail);
            return Err(ApiError::from_status(status, detail));
        }

        Ok(response)
    }

    fn decode<T: DeserializeOwned>(&self, response: Response<Body>) -> Result<T, ApiError> {
        let mut response = self.check(response)?;
        response
            .body_mut()
            .read_json::<T>()
            .map_err(Self::transport_error)
    }

    fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let mut request = self.agent.get(self.endpoint(path));
        if let Some(bearer) = self.bearer() {
            request = request.header("Authorization", &bearer);
        }
        let response = request.call().map_err(Self::transport_error)?;
        self.decode(response)
    }

    fn post_json<T: DeserializeOwned, B: Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let mut request = self.agent.post(self.endpoint(path));
        if let Some(bearer) = self.bearer() {
            request = request.header("Authorization", &bearer);
        }
        let response = request.send_json(body).map_err(Self::transport_error)?;
        self.decode(response)
    }

    fn put_json<T: DeserializeOwned, B: Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let mut request = self.agent.put(self.endpoint(path));
        if let Some(bearer) = self.bearer() {
            request = request.header("Authorization", &bearer);
        }
        let response = request.send_json(body).map_err(Self::transport_error)?;
        self.decode(response)
    }

    fn delete(&self, path: &str) -> Result<(), ApiError> {
        let mut request = self.agent.delete(self.endpoint(path));
        if let Some(bearer) = self.bearer() {
            request = request.header("Authorization", &bearer);
        }
        let response = request.call().map_err(Self::transport_error)?;
        self.check(response)?;
        Ok(())
    }
}

impl AuthApi for ApiClient {
    fn register(&self, request: &RegisterRequest) -> Result<TokenResponse, ApiError> {
        self.post_json("/auth/register", request)
    }

    fn login(&self, request: &LoginRequest) -> Result<TokenResponse, ApiError> {
        self.post_json("/auth/login", request)
    }

    fn me(&self) -> Result<User, ApiError> {
        self.get_json("/auth/me")
    }

    fn update_profile(&self, update: &ProfileUpdate) -> Result<User, ApiError> {
        self.put_json("/auth/profile", update)
    }
}

impl DocumentsApi for ApiClient {
    fn list_documents(&self) -> Result<Vec<Document>, ApiError> {
        self.get_json("/documents/")
    }

    fn get_document(&self, id: &DocumentId) -> Result<Document, ApiError> {
        self.get_json(&format!("/documents/{}", id.as_str()))
    }

    fn upload_document(&self, file_name: &str, data: &[u8]) -> Result<Document, ApiError> {
        let boundary = multipart_boundary();
        let body = multipart_file_part(&boundary, file_name, data);

        let mut request = self
            .agent
            .post(self.endpoint("/documents/upload"))
            .header(
                "Content-Type",
                &format!("multipart/form-data; boundary={}", boundary),
            );
        if let Some(bearer) = self.bearer() {
            request = request.header("Authorization", &bearer);
        }

        let response = request.send(&body[..]).map_err(Self::transport_error)?;
        self.decode(response)
    }

    fn delete_document(&self, id: &DocumentId) -> Result<(), ApiError> {
        self.delete(&format!("/documents/{}", id.as_str()))
    }
}

impl ChatApi for ApiClient {
    fn list_sessions(&self) -> Result<Vec<ChatSession>, ApiError> {
        self.get_json("/chat/sessions")
    }

    fn get_session(&self, id: &SessionId) -> Result<SessionDetail, ApiError> {
        self.get_json(&format!("/chat/sessions/{}", id.as_str()))
    }

    fn delete_session(&self, id: &SessionId) -> Result<(), ApiError> {
        self.delete(&format!("/chat/sessions/{}", id.as_str()))
    }

    fn query(&self, request: &QueryRequest) -> Result<QueryResponse, ApiError> {
        self.post_json("/chat/query", request)
    }
}

/// Generate a boundary string unlikely to collide with file content
fn multipart_boundary() -> String {
    use std::collections::hash_map::RandomState;
    use std::hash::{BuildHasher, Hasher};

    let hasher = RandomState::new().build_hasher();
    format!("----quill-{:016x}", hasher.finish())
}

/// Assemble a multipart/form-data body with a single `file` part
///
/// The transport has no multipart helper, so the body is built by hand
/// per RFC 7578: one part, CRLF delimiters, closing boundary.
fn multipart_file_part(boundary: &str, file_name: &str, data: &[u8]) -> Vec<u8> {
    let header = format!(
        "--{boundary}\r\n\
         Content-Disposition: form-data; name=\"file\"; filename=\"{file_name}\"\r\n\
         Content-Type: application/octet-stream\r\n\r\n",
    );
    let footer = format!("\r\n--{boundary}--\r\n");

    let mut body = Vec::with_capacity(header.len() + data.len() + footer.len());
    body.extend_from_slice(header.as_bytes());
    body.extend_from_slice(data);
    body.extend_from_slice(footer.as_bytes());
    body
}
