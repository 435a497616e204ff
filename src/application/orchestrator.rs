//! Onboarding orchestrator
//!
//! Coordinates fetch → persist → background-generate → reconcile → retry for
//! every tracked project. The store is the only shared mutable resource; the
//! skeleton write happens-before any generation-result write because the
//! background task is spawned only after `add` has returned.
//!
//! ```text
//! Caller            Orchestrator         Store            Generator
//!   │                    │                 │                  │
//!   ├─ create_project ──►│── fetch ────────┼──────────────────┤
//!   │                    │── add(skeleton, Generating) ──►│   │
//!   │◄── record ─────────┤── spawn ────────┼─────────────────►│
//!   │                    │                 │   (detached)     │
//!   │                    │                 │◄── update(Ready│Failed)
//! ```

use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::domain::{OnboardingState, ProjectPatch, ProjectRecord, TransitionError};
use crate::infrastructure::github::{RepositoryFetcher, parse_repo_url};
use crate::infrastructure::llm::{SummaryProvider, prompt};
use crate::infrastructure::store::ProjectStore;

use super::errors::ApplicationError;

/// Central lifecycle controller for project onboarding.
pub struct OnboardingOrchestrator {
    store: Arc<ProjectStore>,
    fetcher: Arc<dyn RepositoryFetcher>,
    summarizer: Arc<dyn SummaryProvider>,
    shutdown: CancellationToken,
}

impl OnboardingOrchestrator {
    pub fn new(
        store: Arc<ProjectStore>,
        fetcher: Arc<dyn RepositoryFetcher>,
        summarizer: Arc<dyn SummaryProvider>,
        shutdown: CancellationToken,
    ) -> Self {
        Self {
            store,
            fetcher,
            summarizer,
            shutdown,
        }
    }

    pub fn store(&self) -> &Arc<ProjectStore> {
        &self.store
    }

    /// Create a project from a repository URL.
    ///
    /// Parses and fetches first, so a malformed URL or a missing repository
    /// never creates a record. On success the skeleton is stored with
    /// `Generating` and a detached generation task is spawned.
    pub async fn create_project(&self, repo_url: &str) -> Result<ProjectRecord, ApplicationError> {
        let (owner, repo) = parse_repo_url(repo_url)?;

        info!(owner = %owner, repo = %repo, "Creating project");
        let mut record = self.fetcher.fetch_project(&owner, &repo).await?;
        ProjectPatch::generating().apply(&mut record);

        self.store.add(record.clone()).await?;
        self.spawn_generation(record.clone());

        Ok(record)
    }

    /// Re-enter generation for an existing project.
    ///
    /// Rejected while a generation task is already in flight; a failed
    /// regenerate later leaves any previously stored overview untouched.
    pub async fn regenerate(&self, id: &str) -> Result<ProjectRecord, ApplicationError> {
        let record = self
            .store
            .find(id)
            .await
            .ok_or_else(|| ApplicationError::NotFound(id.to_string()))?;

        let from = record.onboarding_state();
        if !from.can_transition_to(&OnboardingState::Generating) {
            return Err(TransitionError {
                from,
                to: OnboardingState::Generating,
            }
            .into());
        }

        info!(project_id = %id, from = %from, "Regenerating onboarding overview");
        let updated = self.store.update(id, ProjectPatch::generating()).await?;
        self.spawn_generation(updated.clone());

        Ok(updated)
    }

    /// Remove a project. Idempotent; reports whether a record was deleted.
    pub async fn delete_project(&self, id: &str) -> bool {
        self.store.remove(id).await
    }

    /// Synchronous generation from caller-supplied project data, used by the
    /// generate-onboarding endpoint.
    pub async fn generate_overview(
        &self,
        project_data: &serde_json::Value,
    ) -> Result<String, ApplicationError> {
        let prompt = prompt::onboarding_prompt(project_data);
        Ok(self.summarizer.generate(&prompt).await?)
    }

    /// Synchronous deep-context generation: root file listing plus recent
    /// commits, fetched fresh, summarized in one round trip.
    pub async fn deep_onboarding(&self, id: &str) -> Result<String, ApplicationError> {
        let (owner, repo) = match self.store.find(id).await {
            Some(record) => (record.owner, record.name),
            None => split_project_id(id)?,
        };

        let context = self.fetcher.fetch_context(&owner, &repo).await?;
        let context = serde_json::to_value(&context)
            .map_err(crate::infrastructure::llm::LlmError::from)?;
        let prompt = prompt::onboarding_prompt(&context);
        Ok(self.summarizer.generate(&prompt).await?)
    }

    /// Spawn the detached generation task for a stored record.
    ///
    /// The task holds a child cancellation token; shutdown drops the in-flight
    /// HTTP call and the record is recovered on the next startup load.
    fn spawn_generation(&self, record: ProjectRecord) {
        let store = self.store.clone();
        let summarizer = self.summarizer.clone();
        let token = self.shutdown.child_token();

        tokio::spawn(async move {
            let id = record.id.clone();
            let prompt = prompt::onboarding_prompt(&prompt::project_context(&record));

            tokio::select! {
                result = summarizer.generate(&prompt) => match result {
                    Ok(text) => {
                        match store.update(&id, ProjectPatch::ready(text)).await {
                            Ok(_) => info!(project_id = %id, "Onboarding overview generated"),
                            Err(e) => {
                                // Record deleted while generating; nothing to reconcile.
                                warn!(project_id = %id, error = %e, "Could not record generation result");
                            }
                        }
                    }
                    Err(e) => {
                        warn!(project_id = %id, error = %e, "Onboarding generation failed");
                        if let Err(e) = store.update(&id, ProjectPatch::failed()).await {
                            warn!(project_id = %id, error = %e, "Could not record generation failure");
                        }
                    }
                },
                _ = token.cancelled() => {
                    warn!(project_id = %id, "Onboarding generation cancelled by shutdown");
                }
            }
        });
    }
}

/// Recover repository coordinates from a project id of the form `owner-repo`.
/// Only used when the record is absent from the store; an owner containing
/// `-` cannot be recovered this way and the id is rejected.
fn split_project_id(id: &str) -> Result<(String, String), ApplicationError> {
    let invalid = || ApplicationError::InvalidUrl(format!("invalid project id: {}", id));

    let (owner, repo) = id.split_once('-').ok_or_else(invalid)?;
    if owner.is_empty() || repo.is_empty() {
        return Err(invalid());
    }

    Ok((owner.to_string(), repo.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_project_id() {
        assert_eq!(
            split_project_id("octocat-hello-world").unwrap(),
            ("octocat".to_string(), "hello-world".to_string())
        );
        assert!(split_project_id("justoneword").is_err());
        assert!(split_project_id("-repo").is_err());
        assert!(split_project_id("owner-").is_err());
    }
}
