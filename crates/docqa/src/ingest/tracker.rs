//! Per-document ingestion tracking
//!
//! Owns the authoritative local document list and one poll loop per
//! in-flight document. Polling reconciles local state against the server:
//! each tick fetches the current record and replaces the stored copy
//! wholesale when it differs. Cancellation is explicit and keyed by
//! document id; teardown cancels every live loop, so no timer outlives
//! the tracker.

use std::collections::HashMap;
use std::sync::mpsc::{self, RecvTimeoutError};
use std::sync::{Arc, Mutex, RwLock};
use std::thread::JoinHandle;
use std::time::Duration;

use log::{debug, info, warn};

use super::progress::{start_ramp, ProgressSink, PROGRESS_COMPLETE};
use super::validate::{validate_upload, UploadError};
use crate::api::{ApiError, DocumentsApi};
use crate::models::{Document, DocumentId};

/// How often an in-flight document is re-checked
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(3);

/// Cancellation handle for one document's poll loop
struct PollHandle {
    stop_tx: mpsc::Sender<()>,
    join: JoinHandle<()>,
}

impl PollHandle {
    /// Signal the loop to stop and wait for it to exit
    fn cancel(self) {
        // The loop may already have ended on its own; a dead channel is fine
        let _ = self.stop_tx.send(());
        let _ = self.join.join();
    }
}

/// Tracker for uploaded documents and their ingestion progress
pub struct IngestTracker {
    api: Arc<dyn DocumentsApi>,
    documents: Arc<RwLock<Vec<Document>>>,
    polls: Arc<Mutex<HashMap<DocumentId, PollHandle>>>,
    poll_interval: Duration,
}

impl IngestTracker {
    /// Create a tracker polling at the default interval
    pub fn new(api: Arc<dyn DocumentsApi>) -> Self {
        Self::with_poll_interval(api, DEFAULT_POLL_INTERVAL)
    }

    /// Create a tracker with an explicit poll interval (shortened in tests)
    pub fn with_poll_interval(api: Arc<dyn DocumentsApi>, poll_interval: Duration) -> Self {
        Self {
            api,
            documents: Arc::new(RwLock::new(Vec::new())),
            polls: Arc::new(Mutex::new(HashMap::new())),
            poll_interval,
        }
    }

    /// Snapshot of the tracked documents, newest first
    pub fn documents(&self) -> Vec<Document> {
        self.documents.read().unwrap().clone()
    }

    /// Current state of one tracked document
    pub fn document(&self, id: &DocumentId) -> Option<Document> {
        self.documents
            .read()
            .unwrap()
            .iter()
            .find(|d| d.id == *id)
            .cloned()
    }

    /// Number of live poll loops (zero once every document is terminal)
    pub fn active_polls(&self) -> usize {
        self.polls.lock().unwrap().len()
    }

    /// Reload the document list from the server, replacing local state
    /// wholesale, and resume polling for any non-terminal entries
    pub fn refresh(&self) -> Result<Vec<Document>, ApiError> {
        let fetched = self.api.list_documents()?;

        *self.documents.write().unwrap() = fetched.clone();

        for doc in &fetched {
            if !doc.status.is_terminal() {
                self.start_poll(&doc.id);
            }
        }

        Ok(fetched)
    }

    /// Upload a file and begin tracking its ingestion
    ///
    /// Preconditions (extension, size) are checked locally first; a
    /// rejected file never reaches the network. While the upload is in
    /// flight a cosmetic progress ramp reports into `progress`; it is
    /// forced to 100 only once the server has accepted the file. On
    /// acceptance the returned document is inserted at the head of the
    /// list and its poll loop starts. On failure no local state changes.
    pub fn upload(
        &self,
        file_name: &str,
        data: &[u8],
        progress: Option<Arc<dyn ProgressSink>>,
    ) -> Result<Document, UploadError> {
        validate_upload(file_name, data.len() as u64)?;

        let ramp = progress.as_ref().map(|sink| start_ramp(Arc::clone(sink)));
        let result = self.api.upload_document(file_name, data);
        if let Some(ramp) = ramp {
            ramp.stop();
        }

        let document = result?;
        if let Some(sink) = &progress {
            sink.on_progress(PROGRESS_COMPLETE);
        }

        {
            let mut docs = self.documents.write().unwrap();
            // One authoritative copy per id
            docs.retain(|d| d.id != document.id);
            docs.insert(0, document.clone());
        }

        info!(
            "Uploaded {} ({} bytes), status {:?}",
            file_name,
            data.len(),
            document.status
        );

        if !document.status.is_terminal() {
            self.start_poll(&document.id);
        }
        Ok(document)
    }

    /// Start the poll loop for a document
    ///
    /// Idempotent: at most one loop runs per id, so a second start while
    /// one is live is a no-op.
    pub fn start_poll(&self, id: &DocumentId) {
        let mut polls = self.polls.lock().unwrap();
        if polls.contains_key(id) {
            return;
        }

        let (stop_tx, stop_rx) = mpsc::channel::<()>();
        let api = Arc::clone(&self.api);
        let documents = Arc::clone(&self.documents);
        let registry = Arc::clone(&self.polls);
        let interval = self.poll_interval;
        let poll_id = id.clone();

        let join = std::thread::spawn(move || {
            poll_loop(api.as_ref(), &documents, &poll_id, interval, &stop_rx);
            // Deregister on the way out; cancellation may already have
            // taken the entry, in which case there is nothing to remove
            registry.lock().unwrap().remove(&poll_id);
        });

        polls.insert(id.clone(), PollHandle { stop_tx, join });
    }

    /// Remove a document: server first, then local list and poll loop
    ///
    /// A deleted document must never continue to be polled, so the loop
    /// is cancelled as part of the same operation.
    pub fn delete(&self, id: &DocumentId) -> Result<(), ApiError> {
        self.api.delete_document(id)?;

        self.cancel_poll(id);
        self.documents.write().unwrap().retain(|d| d.id != *id);

        info!("Deleted document {}", id.as_str());
        Ok(())
    }

    /// Cancel every live poll loop
    pub fn shutdown(&self) {
        let handles: Vec<PollHandle> = {
            let mut polls = self.polls.lock().unwrap();
            polls.drain().map(|(_, handle)| handle).collect()
        };
        for handle in handles {
            handle.cancel();
        }
    }

    fn cancel_poll(&self, id: &DocumentId) {
        let handle = self.polls.lock().unwrap().remove(id);
        // Join outside the registry lock: the loop takes the same lock to
        // deregister itself on exit
        if let Some(handle) = handle {
            handle.cancel();
        }
    }
}

impl Drop for IngestTracker {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// One document's poll loop, run on its own thread
///
/// `recv_timeout` on the stop channel doubles as the tick timer and the
/// cancellation point, so ticks are serialized by construction.
fn poll_loop(
    api: &dyn DocumentsApi,
    documents: &RwLock<Vec<Document>>,
    id: &DocumentId,
    interval: Duration,
    stop_rx: &mpsc::Receiver<()>,
) {
    loop {
        match stop_rx.recv_timeout(interval) {
            Err(RecvTimeoutError::Timeout) => {}
            Ok(()) | Err(RecvTimeoutError::Disconnected) => return,
        }

        let fetched = match api.get_document(id) {
            Ok(doc) => doc,
            Err(e) => {
                // Conservative: stop this loop instead of leaking a timer
                // that might never succeed again; a manual refresh will
                // resume polling if the document is still in flight
                warn!("Polling stopped for document {}: {}", id.as_str(), e);
                return;
            }
        };

        let terminal = fetched.status.is_terminal();

        {
            let mut docs = documents.write().unwrap();
            // The document may have been deleted while the request was in
            // flight; never write it back
            let Some(slot) = docs.iter_mut().find(|d| d.id == *id) else {
                debug!("Document {} no longer tracked, ending poll", id.as_str());
                return;
            };
            if *slot != fetched {
                // Replace wholesale rather than merging fields, so stale
                // partial data cannot survive
                *slot = fetched;
            }
        }

        if terminal {
            info!("Document {} reached a terminal status", id.as_str());
            return;
        }
    }
}
