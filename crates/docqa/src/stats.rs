//! Workspace statistics derived from synchronized state

use serde::Serialize;

use crate::models::{ChatSession, Document, DocumentStatus};

/// Aggregate counts for the dashboard and profile views
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct WorkspaceStats {
    /// All tracked documents, regardless of status
    pub documents: usize,
    /// Documents that finished ingestion successfully
    pub ready_documents: usize,
    /// Chat sessions
    pub sessions: usize,
    /// Indexed chunks across ready documents
    pub chunks_indexed: u64,
}

impl WorkspaceStats {
    /// Derive statistics from the current document and session lists
    pub fn compute(documents: &[Document], sessions: &[ChatSession]) -> Self {
        let ready = || {
            documents
                .iter()
                .filter(|d| d.status == DocumentStatus::Ready)
        };

        Self {
            documents: documents.len(),
            ready_documents: ready().count(),
            sessions: sessions.len(),
            chunks_indexed: ready().map(|d| d.chunks as u64).sum(),
        }
    }
}
