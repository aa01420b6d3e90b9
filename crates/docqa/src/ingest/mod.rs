//! Document ingestion tracking
//!
//! This module provides:
//! - Client-side upload preconditions (file type and size)
//! - The cosmetic upload-progress ramp
//! - The per-document status poller with explicit cancellation handles

mod progress;
mod tracker;
mod validate;

pub use progress::{ProgressSink, RampHandle, PROGRESS_COMPLETE, RAMP_CAP, RAMP_START};
pub use tracker::{IngestTracker, DEFAULT_POLL_INTERVAL};
pub use validate::{validate_upload, UploadError, ACCEPTED_EXTENSIONS, MAX_UPLOAD_BYTES};
