//! Gateway client tests against a canned-response HTTP server
//!
//! A minimal TCP server plays back scripted responses so the real ureq
//! transport path is exercised: bearer injection, 401 teardown, and
//! error-detail extraction.

use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use docqa::api::wire::{LoginRequest, QueryRequest};
use docqa::{
    ApiClient, ApiError, AuthApi, ChatApi, CredentialStore, DocumentsApi, DocumentId,
    InMemoryCredentialStore, ServerConfig,
};

/// One captured request: header block plus body
#[derive(Debug, Clone)]
struct CapturedRequest {
    head: String,
    body: Vec<u8>,
}

impl CapturedRequest {
    fn has_header(&self, needle: &str) -> bool {
        self.head
            .lines()
            .any(|line| line.to_ascii_lowercase().contains(&needle.to_ascii_lowercase()))
    }

    fn request_line(&self) -> &str {
        self.head.lines().next().unwrap_or("")
    }
}

struct TestServer {
    base_url: String,
    requests: Arc<Mutex<Vec<CapturedRequest>>>,
}

impl TestServer {
    /// Serve the given (status, body) responses, one per connection
    fn serve(responses: Vec<(u16, String)>) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind test server");
        let addr = listener.local_addr().expect("local addr");
        let requests = Arc::new(Mutex::new(Vec::new()));
        let seen = Arc::clone(&requests);

        std::thread::spawn(move || {
            for (status, body) in responses {
                let Ok((mut stream, _)) = listener.accept() else {
                    return;
                };
                let captured = read_request(&mut stream);
                seen.lock().unwrap().push(captured);

                let reason = match status {
                    200 => "OK",
                    201 => "Created",
                    204 => "No Content",
                    400 => "Bad Request",
                    401 => "Unauthorized",
                    _ => "Error",
                };
                let response = format!(
                    "HTTP/1.1 {} {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                    status,
                    reason,
                    body.len(),
                    body
                );
                let _ = stream.write_all(response.as_bytes());
            }
        });

        Self {
            base_url: format!("http://{}/api", addr),
            requests,
        }
    }

    fn request(&self, index: usize) -> CapturedRequest {
        self.requests.lock().unwrap()[index].clone()
    }
}

/// Read one HTTP request: headers, then exactly Content-Length body bytes
fn read_request(stream: &mut TcpStream) -> CapturedRequest {
    let mut head = Vec::new();
    let mut byte = [0u8; 1];
    while !head.ends_with(b"\r\n\r\n") {
        match stream.read(&mut byte) {
            Ok(1) => head.push(byte[0]),
            _ => break,
        }
    }
    let head = String::from_utf8_lossy(&head).to_string();

    let content_length = head
        .lines()
        .find_map(|line| {
            let (name, value) = line.split_once(':')?;
            if name.eq_ignore_ascii_case("content-length") {
                value.trim().parse::<usize>().ok()
            } else {
                None
            }
        })
        .unwrap_or(0);

    let mut body = vec![0u8; content_length];
    if content_length > 0 {
        let _ = stream.read_exact(&mut body);
    }

    CapturedRequest { head, body }
}

fn user_json() -> String {
    r#"{
        "id": "u1",
        "username": "ada",
        "email": "ada@example.com",
        "full_name": "Ada Lovelace",
        "created_at": "2026-08-01T10:00:00Z",
        "documents_count": 2
    }"#
    .to_string()
}

fn client_with(store: Arc<dyn CredentialStore>, server: &TestServer) -> ApiClient {
    ApiClient::new(&ServerConfig::with_base_url(&server.base_url), store)
}

#[test]
fn test_me_attaches_bearer_credential() {
    let server = TestServer::serve(vec![(200, user_json())]);
    let store = Arc::new(InMemoryCredentialStore::with_token("tok-123"));
    let client = client_with(store, &server);

    let user = client.me().unwrap();
    assert_eq!(user.username, "ada");
    assert_eq!(user.documents_count, 2);

    let request = server.request(0);
    assert_eq!(request.request_line(), "GET /api/auth/me HTTP/1.1");
    assert!(request.has_header("authorization: bearer tok-123"));
}

#[test]
fn test_unauthenticated_call_sends_no_bearer() {
    let server = TestServer::serve(vec![(200, "[]".to_string())]);
    let store = Arc::new(InMemoryCredentialStore::new());
    let client = client_with(store, &server);

    client.list_documents().unwrap();

    let request = server.request(0);
    assert!(!request.has_header("authorization"));
}

#[test]
fn test_401_clears_credential_and_fires_hook() {
    let server = TestServer::serve(vec![(
        401,
        r#"{"detail": "Could not validate credentials"}"#.to_string(),
    )]);
    let store = Arc::new(InMemoryCredentialStore::with_token("stale"));
    let expired = Arc::new(AtomicBool::new(false));
    let flag = Arc::clone(&expired);

    let client = ApiClient::new(
        &ServerConfig::with_base_url(&server.base_url),
        store.clone(),
    )
    .with_session_expiry_hook(move || flag.store(true, Ordering::SeqCst));

    let err = client.me().unwrap_err();

    assert!(matches!(err, ApiError::Unauthorized));
    assert!(store.load().is_none());
    assert!(expired.load(Ordering::SeqCst));
}

#[test]
fn test_server_detail_is_preferred() {
    let server = TestServer::serve(vec![(
        400,
        r#"{"detail": "Email already registered"}"#.to_string(),
    )]);
    let client = client_with(Arc::new(InMemoryCredentialStore::new()), &server);

    let err = client
        .login(&LoginRequest {
            email: "ada@example.com".to_string(),
            password: "hunter2".to_string(),
        })
        .unwrap_err();

    assert_eq!(err.to_string(), "Email already registered");
}

#[test]
fn test_missing_detail_falls_back_to_status() {
    let server = TestServer::serve(vec![(500, "{}".to_string())]);
    let client = client_with(Arc::new(InMemoryCredentialStore::new()), &server);

    let err = client.list_documents().unwrap_err();
    assert_eq!(err.to_string(), "Request failed with status 500");
}

#[test]
fn test_unreachable_server_is_a_network_error() {
    // Bind then drop to get a port nothing is listening on
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let config = ServerConfig::with_base_url(format!("http://{}/api", addr));
    let client = ApiClient::new(&config, Arc::new(InMemoryCredentialStore::new()));

    let err = client.list_documents().unwrap_err();
    assert!(matches!(err, ApiError::Network { .. }));
}

#[test]
fn test_query_posts_question_payload() {
    let body = r#"{
        "question": "What is the deadline?",
        "answer": "June 30th.",
        "sources": [{"source": "report.pdf", "page": 3, "content": "deadline"}],
        "session_id": "s1",
        "created_at": "2026-08-01T10:00:00Z"
    }"#;
    let server = TestServer::serve(vec![(200, body.to_string())]);
    let store = Arc::new(InMemoryCredentialStore::with_token("tok"));
    let client = client_with(store, &server);

    let response = client
        .query(&QueryRequest {
            question: "What is the deadline?".to_string(),
            document_ids: None,
            session_id: None,
        })
        .unwrap();

    assert_eq!(response.answer, "June 30th.");
    assert_eq!(response.sources.len(), 1);
    assert_eq!(response.session_id.as_str(), "s1");

    let request = server.request(0);
    assert_eq!(request.request_line(), "POST /api/chat/query HTTP/1.1");
    let sent = String::from_utf8_lossy(&request.body);
    assert!(sent.contains("\"question\":\"What is the deadline?\""));
    // An empty selection means "all documents"
    assert!(sent.contains("\"document_ids\":null"));
}

#[test]
fn test_upload_sends_multipart_body() {
    let doc = r#"{
        "id": "d1",
        "original_name": "report.pdf",
        "file_size": 8,
        "status": "pending",
        "created_at": "2026-08-01T10:00:00Z"
    }"#;
    let server = TestServer::serve(vec![(201, doc.to_string())]);
    let store = Arc::new(InMemoryCredentialStore::with_token("tok"));
    let client = client_with(store, &server);

    let uploaded = client.upload_document("report.pdf", b"%PDF-1.4").unwrap();
    assert_eq!(uploaded.id.as_str(), "d1");

    let request = server.request(0);
    assert_eq!(
        request.request_line(),
        "POST /api/documents/upload HTTP/1.1"
    );
    assert!(request.has_header("content-type: multipart/form-data; boundary="));
    let sent = String::from_utf8_lossy(&request.body);
    assert!(sent.contains("filename=\"report.pdf\""));
    assert!(sent.contains("%PDF-1.4"));
}

#[test]
fn test_delete_accepts_no_content() {
    let server = TestServer::serve(vec![(204, String::new())]);
    let store = Arc::new(InMemoryCredentialStore::with_token("tok"));
    let client = client_with(store, &server);

    client.delete_document(&DocumentId::new("d1")).unwrap();

    let request = server.request(0);
    assert_eq!(request.request_line(), "DELETE /api/documents/d1 HTTP/1.1");
}
