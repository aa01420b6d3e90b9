//! Upload precondition checks
//!
//! Pure functions resolved locally; a rejected file never touches the
//! network and never mutates the document list.

use crate::api::ApiError;

/// File extensions the backend can ingest
pub const ACCEPTED_EXTENSIONS: [&str; 2] = [".pdf", ".txt"];

/// Maximum accepted upload size (50 MB)
pub const MAX_UPLOAD_BYTES: u64 = 50 * 1024 * 1024;

/// Failure of an upload attempt
#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    /// Rejected locally: the filename has no accepted extension
    #[error("Only PDF and TXT files are supported")]
    UnsupportedType,

    /// Rejected locally: the file exceeds the size cap
    #[error("File too large (max 50 MB)")]
    TooLarge,

    /// The dispatch itself failed
    #[error(transparent)]
    Api(#[from] ApiError),
}

impl UploadError {
    /// Whether the upload was rejected before any network activity
    pub fn is_local(&self) -> bool {
        matches!(self, UploadError::UnsupportedType | UploadError::TooLarge)
    }
}

/// Whether the filename carries an accepted extension (case-insensitive)
pub fn accepted_file_name(name: &str) -> bool {
    let lower = name.to_lowercase();
    ACCEPTED_EXTENSIONS.iter().any(|ext| lower.ends_with(ext))
}

/// Check both upload preconditions, short-circuiting on the first failure
pub fn validate_upload(name: &str, size: u64) -> Result<(), UploadError> {
    if !accepted_file_name(name) {
        return Err(UploadError::UnsupportedType);
    }
    if size > MAX_UPLOAD_BYTES {
        return Err(UploadError::TooLarge);
    }
    Ok(())
}
