//! Application error taxonomy
//!
//! One enum covers the whole propagation policy: fetch-time errors abort
//! project creation and surface to the caller; generation-time errors are
//! captured into the record by the orchestrator; persistence errors are
//! logged and swallowed inside the store and only appear here when a load
//! fails at startup.

use crate::domain::TransitionError;
use crate::infrastructure::github::FetchError;
use crate::infrastructure::llm::LlmError;
use crate::infrastructure::store::StoreError;

/// Errors surfaced by the application layer.
#[derive(Debug, thiserror::Error)]
pub enum ApplicationError {
    /// Malformed repository URL or project id, user-correctable.
    #[error("Invalid input: {0}")]
    InvalidUrl(String),

    /// Repository missing/private upstream, or unknown project id.
    #[error("Not found: {0}")]
    NotFound(String),

    /// A project with this id is already tracked.
    #[error("Project already exists: {0}")]
    DuplicateId(String),

    /// The requested onboarding transition is not allowed.
    #[error(transparent)]
    InvalidTransition(#[from] TransitionError),

    /// GitHub returned a non-success status or the transport failed.
    #[error("Upstream request failed: {0}")]
    Upstream(String),

    /// The AI completion step failed.
    #[error("Summary generation failed: {0}")]
    Generation(#[from] LlmError),

    /// The persistence layer failed outside the swallowed mutation path.
    #[error("Persistence failed: {0}")]
    Persistence(String),
}

impl From<FetchError> for ApplicationError {
    fn from(err: FetchError) -> Self {
        match err {
            FetchError::InvalidUrl(input) => ApplicationError::InvalidUrl(input),
            FetchError::NotFound(coords) => ApplicationError::NotFound(coords),
            FetchError::Upstream(message) => ApplicationError::Upstream(message),
        }
    }
}

impl From<StoreError> for ApplicationError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::DuplicateId(id) => ApplicationError::DuplicateId(id),
            StoreError::NotFound(id) => ApplicationError::NotFound(id),
            StoreError::Serialization(e) => ApplicationError::Persistence(e.to_string()),
            StoreError::Persistence(message) => ApplicationError::Persistence(message),
        }
    }
}
