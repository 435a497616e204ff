//! Application setup and wiring

use std::sync::Arc;

use axum::Router;
use tokio_util::sync::CancellationToken;

use crate::application::OnboardingOrchestrator;
use crate::config::Config;
use crate::infrastructure::github::{GitHubClient, RepositoryFetcher};
use crate::infrastructure::llm::{GeminiProvider, SummaryProvider};
use crate::infrastructure::store::{JsonFileBackend, ProjectStore};
use crate::presentation::controllers::AppState;
use crate::presentation::routes::create_router;

/// Handle returned from create_app for graceful shutdown coordination.
pub struct AppHandle {
    pub router: Router,
    pub shutdown_token: CancellationToken,
}

/// Build the full application: store, clients, orchestrator, router.
pub async fn create_app(config: Config) -> anyhow::Result<AppHandle> {
    let backend = Arc::new(JsonFileBackend::new(config.storage.path.clone()));
    let store = Arc::new(ProjectStore::open(backend).await?);

    let fetcher: Arc<dyn RepositoryFetcher> = Arc::new(GitHubClient::new(&config.github));
    let summarizer: Arc<dyn SummaryProvider> = Arc::new(
        GeminiProvider::new(config.llm.api_key.clone(), config.llm.model.clone())
            .with_timeout(config.llm.timeout_seconds),
    );

    if config.llm.api_key.is_none() {
        tracing::warn!("No LLM API key configured; onboarding generation will fail until one is set");
    }

    let shutdown_token = CancellationToken::new();
    let orchestrator = Arc::new(OnboardingOrchestrator::new(
        store.clone(),
        fetcher.clone(),
        summarizer,
        shutdown_token.clone(),
    ));

    let state = AppState {
        orchestrator,
        store,
        fetcher,
    };

    let router = create_router(state, &config);

    Ok(AppHandle {
        router,
        shutdown_token,
    })
}
