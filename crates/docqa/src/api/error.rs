//! Normalized error taxonomy for gateway calls

/// Failure of an authenticated API call, normalized to a human-readable
/// message
///
/// A 401 is reported as [`ApiError::Unauthorized`] after the gateway has
/// already performed the global session teardown; callers may treat it as
/// "this call did nothing" and no-op.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ApiError {
    /// The session is no longer valid for any pending or future call
    #[error("Session expired, please sign in again")]
    Unauthorized,

    /// The server rejected the request (non-2xx with optional detail)
    #[error("{message}")]
    Api { message: String },

    /// The request never produced a response
    #[error("Network error: {message}")]
    Network { message: String },
}

impl ApiError {
    /// Build a server-rejection error, preferring the server-supplied
    /// detail and falling back to a status-derived message
    pub(crate) fn from_status(status: u16, detail: Option<String>) -> Self {
        let message = detail
            .filter(|d| !d.is_empty())
            .unwrap_or_else(|| format!("Request failed with status {}", status));
        ApiError::Api { message }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prefers_server_detail() {
        let err = ApiError::from_status(400, Some("Email already registered".to_string()));
        assert_eq!(err.to_string(), "Email already registered");
    }

    #[test]
    fn test_falls_back_to_status() {
        let err = ApiError::from_status(502, None);
        assert_eq!(err.to_string(), "Request failed with status 502");

        let err = ApiError::from_status(500, Some(String::new()));
        assert_eq!(err.to_string(), "Request failed with status 500");
    }
}
