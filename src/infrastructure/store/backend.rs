//! Storage backends for the project collection
//!
//! The collection persists as one JSON array under a single path, mirroring
//! the original single-key layout. There is no schema versioning; the file
//! format is the wire format.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;

use crate::domain::ProjectRecord;

/// Project persistence errors.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Project already exists: {0}")]
    DuplicateId(String),
    #[error("Project not found: {0}")]
    NotFound(String),
    #[error("Serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("Persistence failed: {0}")]
    Persistence(String),
}

/// Persistence interface for the full project collection.
///
/// Every mutation re-serializes the whole collection; `load` runs once at
/// startup. Implementations must not reorder records.
#[async_trait]
pub trait StorageBackend: Send + Sync {
    async fn load(&self) -> Result<Vec<ProjectRecord>, StoreError>;
    async fn persist(&self, records: &[ProjectRecord]) -> Result<(), StoreError>;
}

/// File-backed storage: the whole collection as one JSON array, written via
/// a temp file and rename so a crash never leaves a half-written collection.
pub struct JsonFileBackend {
    path: PathBuf,
}

impl JsonFileBackend {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl StorageBackend for JsonFileBackend {
    async fn load(&self) -> Result<Vec<ProjectRecord>, StoreError> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) => {
                let records: Vec<ProjectRecord> = serde_json::from_slice(&bytes)?;
                tracing::debug!(
                    path = %self.path.display(),
                    count = records.len(),
                    "Loaded project collection"
                );
                Ok(records)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Vec::new()),
            Err(e) => Err(StoreError::Persistence(format!(
                "failed to read {}: {}",
                self.path.display(),
                e
            ))),
        }
    }

    async fn persist(&self, records: &[ProjectRecord]) -> Result<(), StoreError> {
        let json = serde_json::to_vec_pretty(records)?;

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await.map_err(|e| {
                    StoreError::Persistence(format!(
                        "failed to create {}: {}",
                        parent.display(),
                        e
                    ))
                })?;
            }
        }

        let tmp = self.path.with_extension("json.tmp");
        let mut file = tokio::fs::File::create(&tmp).await.map_err(|e| {
            StoreError::Persistence(format!("failed to create {}: {}", tmp.display(), e))
        })?;
        file.write_all(&json).await.map_err(|e| {
            StoreError::Persistence(format!("failed to write {}: {}", tmp.display(), e))
        })?;
        file.sync_all().await.map_err(|e| {
            StoreError::Persistence(format!("failed to sync {}: {}", tmp.display(), e))
        })?;
        drop(file);

        tokio::fs::rename(&tmp, &self.path).await.map_err(|e| {
            StoreError::Persistence(format!(
                "failed to rename into {}: {}",
                self.path.display(),
                e
            ))
        })?;

        Ok(())
    }
}

/// In-memory backend: no durability, used by tests and ephemeral setups.
#[derive(Default)]
pub struct MemoryBackend;

#[async_trait]
impl StorageBackend for MemoryBackend {
    async fn load(&self) -> Result<Vec<ProjectRecord>, StoreError> {
        Ok(Vec::new())
    }

    async fn persist(&self, _records: &[ProjectRecord]) -> Result<(), StoreError> {
        Ok(())
    }
}
