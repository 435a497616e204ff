//! Project store
//!
//! Durable, insertion-ordered mapping from project id to [`ProjectRecord`].
//! All access is serialized through one `RwLock`; mutations persist the full
//! collection through the injected [`StorageBackend`] before releasing the
//! write guard, which preserves the skeleton-write-happens-before-result-write
//! ordering across concurrent callers.
//!
//! A persistence failure is logged and swallowed: the in-memory collection
//! keeps serving and the next successful mutation re-syncs the backend.

pub mod backend;

pub use backend::{JsonFileBackend, MemoryBackend, StorageBackend, StoreError};

use std::sync::Arc;

use tokio::sync::{RwLock, watch};
use tracing::{error, info, warn};

use crate::domain::{ProjectPatch, ProjectRecord};

/// Insertion-ordered project collection with injected persistence.
pub struct ProjectStore {
    records: RwLock<Vec<ProjectRecord>>,
    backend: Arc<dyn StorageBackend>,
    revision: watch::Sender<u64>,
}

impl ProjectStore {
    /// Load the collection from the backend.
    ///
    /// Records left `Generating` by a previous process cannot have a live
    /// task anymore; they are demoted to `Failed` so the caller sees a
    /// retryable state instead of a permanent spinner.
    pub async fn open(backend: Arc<dyn StorageBackend>) -> Result<Self, StoreError> {
        let mut records = backend.load().await?;

        let mut demoted = 0usize;
        for record in records.iter_mut().filter(|r| r.is_generating) {
            ProjectPatch::failed().apply(record);
            demoted += 1;
        }
        if demoted > 0 {
            warn!(count = demoted, "Demoted orphaned generating projects to failed");
            if let Err(e) = backend.persist(&records).await {
                error!(error = %e, "Failed to persist demoted projects");
            }
        }

        info!(count = records.len(), "Project store opened");
        let (revision, _) = watch::channel(0);
        Ok(Self {
            records: RwLock::new(records),
            backend,
            revision,
        })
    }

    /// All records in insertion order.
    pub async fn list(&self) -> Vec<ProjectRecord> {
        self.records.read().await.clone()
    }

    /// Look up a record by id.
    pub async fn find(&self, id: &str) -> Option<ProjectRecord> {
        self.records.read().await.iter().find(|r| r.id == id).cloned()
    }

    /// Append a record. Fails with [`StoreError::DuplicateId`] when the id is
    /// already present, leaving the collection untouched.
    pub async fn add(&self, record: ProjectRecord) -> Result<(), StoreError> {
        let mut records = self.records.write().await;
        if records.iter().any(|r| r.id == record.id) {
            return Err(StoreError::DuplicateId(record.id));
        }

        info!(project_id = %record.id, "Project added");
        records.push(record);
        self.persist_and_notify(&records).await;
        Ok(())
    }

    /// Shallow-merge `patch` into the record with the given id and return the
    /// updated record. Fails with [`StoreError::NotFound`] when absent.
    pub async fn update(&self, id: &str, patch: ProjectPatch) -> Result<ProjectRecord, StoreError> {
        let mut records = self.records.write().await;
        let record = records
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;

        patch.apply(record);
        let updated = record.clone();
        self.persist_and_notify(&records).await;
        Ok(updated)
    }

    /// Remove the record with the given id. Idempotent: removing an absent id
    /// is a no-op and reports `false`.
    pub async fn remove(&self, id: &str) -> bool {
        let mut records = self.records.write().await;
        let before = records.len();
        records.retain(|r| r.id != id);

        if records.len() == before {
            return false;
        }

        info!(project_id = %id, "Project removed");
        self.persist_and_notify(&records).await;
        true
    }

    /// Subscribe to collection changes. The receiver observes a revision
    /// counter bumped on every successful mutation, so callers can await
    /// change instead of polling on an interval.
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.revision.subscribe()
    }

    async fn persist_and_notify(&self, records: &[ProjectRecord]) {
        // Accepted inconsistency window: in-memory state is not rolled back
        // when the backend write fails.
        if let Err(e) = self.backend.persist(records).await {
            error!(error = %e, "Failed to persist project collection");
        }
        self.revision.send_modify(|rev| *rev += 1);
    }
}
