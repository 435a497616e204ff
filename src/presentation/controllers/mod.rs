//! HTTP controllers

pub mod health;
pub mod onboarding;
pub mod projects;

use std::sync::Arc;

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use crate::application::{ApplicationError, OnboardingOrchestrator};
use crate::infrastructure::github::RepositoryFetcher;
use crate::infrastructure::store::ProjectStore;
use crate::presentation::models::ErrorResponse;

/// Shared handler state.
#[derive(Clone)]
pub struct AppState {
    pub orchestrator: Arc<OnboardingOrchestrator>,
    pub store: Arc<ProjectStore>,
    pub fetcher: Arc<dyn RepositoryFetcher>,
}

/// Map an application error onto the `{message}` error surface.
pub fn application_error_to_response(error: ApplicationError) -> Response {
    let status = match &error {
        ApplicationError::InvalidUrl(_) => StatusCode::BAD_REQUEST,
        ApplicationError::NotFound(_) => StatusCode::NOT_FOUND,
        ApplicationError::DuplicateId(_) | ApplicationError::InvalidTransition(_) => {
            StatusCode::CONFLICT
        }
        ApplicationError::Upstream(_)
        | ApplicationError::Generation(_)
        | ApplicationError::Persistence(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };

    if status.is_server_error() {
        tracing::error!(error = %error, "Request failed");
    }

    (
        status,
        Json(ErrorResponse {
            message: error.to_string(),
        }),
    )
        .into_response()
}
