//! Route definitions and server setup

use std::time::Duration;

use axum::{
    Router,
    http::{HeaderValue, Method},
    routing::{get, post},
};
use tower_http::{
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::config::Config;
use crate::presentation::controllers::{
    AppState,
    health::health_check,
    onboarding::{generate_onboarding, get_onboarding},
    projects::{
        create_project, delete_project, get_project, get_project_meta, list_projects,
        regenerate_project,
    },
};
use crate::presentation::models::*;

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        crate::presentation::controllers::projects::create_project,
        crate::presentation::controllers::projects::list_projects,
        crate::presentation::controllers::projects::get_project,
        crate::presentation::controllers::projects::delete_project,
        crate::presentation::controllers::projects::regenerate_project,
        crate::presentation::controllers::projects::get_project_meta,
        crate::presentation::controllers::onboarding::get_onboarding,
        crate::presentation::controllers::onboarding::generate_onboarding,
        crate::presentation::controllers::health::health_check
    ),
    components(schemas(
        CreateProjectRequest,
        ProjectResponse,
        ProjectMetaResponse,
        OnboardingSummaryResponse,
        GenerateOnboardingRequest,
        GenerateOnboardingResponse,
        ErrorResponse,
        GenerationErrorResponse,
        HealthResponse,
        crate::domain::ProjectRecord,
        crate::domain::Commit,
        crate::domain::DependencyManifest,
        crate::domain::RepositoryMetadata
    )),
    tags(
        (name = "projects", description = "Tracked repository collection"),
        (name = "onboarding", description = "AI onboarding overview generation"),
        (name = "health", description = "Service health")
    ),
    info(
        title = "Traceback API",
        description = "Repository onboarding dashboard API"
    )
)]
pub struct ApiDoc;

/// Build the application router with middleware layers applied.
pub fn create_router(state: AppState, config: &Config) -> Router {
    let mut router = Router::new()
        .route("/projects", post(create_project).get(list_projects))
        .route("/projects/generate-onboarding", post(generate_onboarding))
        .route("/projects/{id}", get(get_project).delete(delete_project))
        .route("/projects/{id}/regenerate", post(regenerate_project))
        .route("/projects/{id}/meta", get(get_project_meta))
        .route("/projects/{id}/onboarding", get(get_onboarding))
        .route("/health", get(health_check))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.server.request_timeout_seconds,
        )))
        .layer(cors_layer(&config.server.allowed_origins));

    if config.server.enable_docs {
        router = router.merge(
            SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()),
        );
    }

    router
}

fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let methods = [Method::GET, Method::POST, Method::DELETE];

    if allowed_origins.iter().any(|origin| origin == "*") {
        return CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(methods)
            .allow_headers(Any);
    }

    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods(methods)
        .allow_headers(Any)
}
