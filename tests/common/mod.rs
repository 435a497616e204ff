//! Shared test doubles and fixtures
#![allow(dead_code)]

use std::collections::{BTreeMap, VecDeque};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::{Mutex, Semaphore};
use tokio_util::sync::CancellationToken;

use traceback::application::OnboardingOrchestrator;
use traceback::domain::{ContextCommit, OnboardingContext, ProjectRecord, RepositoryMetadata};
use traceback::infrastructure::github::{FetchError, RepositoryFetcher};
use traceback::infrastructure::llm::{LlmError, SummaryProvider};
use traceback::infrastructure::store::{MemoryBackend, ProjectStore};

/// A fetched project skeleton for `owner/repo`, before any generation state.
pub fn sample_record(owner: &str, repo: &str) -> ProjectRecord {
    ProjectRecord {
        id: ProjectRecord::derive_id(owner, repo),
        name: repo.to_string(),
        full_name: format!("{}/{}", owner, repo),
        description: Some("A test repository".to_string()),
        url: format!("https://github.com/{}/{}", owner, repo),
        owner: owner.to_string(),
        stars: 42,
        forks: 7,
        watchers: 42,
        language: Some("Rust".to_string()),
        default_branch: "main".to_string(),
        languages: BTreeMap::from([("Rust".to_string(), 12345)]),
        dependencies: None,
        readme: Some("# readme".to_string()),
        commits: Vec::new(),
        total_commits: 3,
        created_at: None,
        updated_at: None,
        onboarding_overview: None,
        is_generating: false,
        generation_failed: false,
    }
}

/// How the stub fetcher answers `fetch_project`.
pub enum FetchBehavior {
    /// Build a sample record from the requested coordinates.
    Success,
    /// Repository missing or private upstream.
    NotFound,
    /// Any other upstream failure.
    Upstream,
}

/// Programmable [`RepositoryFetcher`] double that counts upstream calls.
pub struct StubFetcher {
    behavior: FetchBehavior,
    pub calls: AtomicUsize,
}

impl StubFetcher {
    pub fn new(behavior: FetchBehavior) -> Self {
        Self {
            behavior,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RepositoryFetcher for StubFetcher {
    async fn fetch_project(&self, owner: &str, repo: &str) -> Result<ProjectRecord, FetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match self.behavior {
            FetchBehavior::Success => Ok(sample_record(owner, repo)),
            FetchBehavior::NotFound => Err(FetchError::NotFound(format!("{}/{}", owner, repo))),
            FetchBehavior::Upstream => Err(FetchError::Upstream("boom".to_string())),
        }
    }

    async fn fetch_context(
        &self,
        owner: &str,
        repo: &str,
    ) -> Result<OnboardingContext, FetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(OnboardingContext {
            repo: format!("{}/{}", owner, repo),
            files: vec!["README.md".to_string(), "src".to_string()],
            commits: vec![ContextCommit {
                message: "initial commit".to_string(),
                author: "octocat".to_string(),
            }],
        })
    }

    async fn fetch_metadata(
        &self,
        owner: &str,
        repo: &str,
    ) -> Result<RepositoryMetadata, FetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let record = sample_record(owner, repo);
        Ok(RepositoryMetadata {
            name: record.name,
            description: record.description,
            url: record.url,
            owner: record.owner,
            stars: record.stars,
            forks: record.forks,
            watchers: record.watchers,
            language: record.language,
            created_at: record.created_at,
            updated_at: record.updated_at,
        })
    }
}

/// Scripted [`SummaryProvider`] double.
///
/// Results are popped front-to-back per `generate` call; when the queue runs
/// dry the default success text is returned. An optional gate makes
/// generation block until the test releases a permit, so mid-generation
/// state can be observed deterministically.
pub struct StubSummarizer {
    results: Mutex<VecDeque<Result<String, String>>>,
    gate: Option<Arc<Semaphore>>,
}

impl StubSummarizer {
    pub fn always(text: &str) -> Self {
        Self {
            results: Mutex::new(VecDeque::from([Ok(text.to_string())])),
            gate: None,
        }
    }

    pub fn scripted(results: Vec<Result<String, String>>) -> Self {
        Self {
            results: Mutex::new(results.into()),
            gate: None,
        }
    }

    pub fn gated(results: Vec<Result<String, String>>, gate: Arc<Semaphore>) -> Self {
        Self {
            results: Mutex::new(results.into()),
            gate: Some(gate),
        }
    }
}

#[async_trait]
impl SummaryProvider for StubSummarizer {
    fn name(&self) -> &'static str {
        "stub"
    }

    async fn generate(&self, _prompt: &str) -> Result<String, LlmError> {
        if let Some(gate) = &self.gate {
            let permit = gate.acquire().await.expect("gate closed");
            permit.forget();
        }

        let next = self.results.lock().await.pop_front();
        match next {
            Some(Ok(text)) => Ok(text),
            Some(Err(message)) => Err(LlmError::Other(message)),
            None => Ok("stub overview".to_string()),
        }
    }
}

/// Wire an orchestrator over an in-memory store and the given doubles.
pub async fn make_orchestrator(
    fetcher: Arc<StubFetcher>,
    summarizer: Arc<StubSummarizer>,
) -> (Arc<ProjectStore>, OnboardingOrchestrator, CancellationToken) {
    let store = Arc::new(
        ProjectStore::open(Arc::new(MemoryBackend))
            .await
            .expect("open in-memory store"),
    );
    let token = CancellationToken::new();
    let orchestrator = OnboardingOrchestrator::new(
        store.clone(),
        fetcher,
        summarizer,
        token.clone(),
    );
    (store, orchestrator, token)
}

/// Await store change notifications until the record leaves `Generating`.
pub async fn wait_until_settled(store: &ProjectStore, id: &str) -> ProjectRecord {
    let mut revisions = store.subscribe();

    for _ in 0..100 {
        if let Some(record) = store.find(id).await {
            if !record.is_generating {
                return record;
            }
        }
        tokio::time::timeout(Duration::from_secs(2), revisions.changed())
            .await
            .expect("timed out waiting for store change")
            .expect("store dropped");
    }

    panic!("record {} never settled", id);
}
