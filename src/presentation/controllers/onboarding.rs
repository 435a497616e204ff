//! Onboarding generation controllers

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::application::ApplicationError;
use crate::presentation::controllers::{AppState, application_error_to_response};
use crate::presentation::models::{
    ErrorResponse, GenerateOnboardingRequest, GenerateOnboardingResponse, GenerationErrorResponse,
    OnboardingSummaryResponse,
};

/// GET /projects/{id}/onboarding - Deep-context summary in one round trip
///
/// Fetches the root file listing and recent commits fresh and summarizes
/// them synchronously; the caller blocks for the full generation.
#[utoipa::path(
    get,
    path = "/projects/{id}/onboarding",
    params(("id" = String, Path, description = "Project id")),
    responses(
        (status = 200, description = "Generated summary", body = OnboardingSummaryResponse),
        (status = 400, description = "Invalid project id", body = ErrorResponse),
        (status = 500, description = "Generation failed", body = ErrorResponse)
    ),
    tag = "onboarding"
)]
pub async fn get_onboarding(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<OnboardingSummaryResponse>, Response> {
    let summary = state
        .orchestrator
        .deep_onboarding(&id)
        .await
        .map_err(application_error_to_response)?;

    Ok(Json(OnboardingSummaryResponse { summary }))
}

/// POST /projects/generate-onboarding - Generate an overview from caller data
///
/// This endpoint reports failures under an `error` key, unlike the rest of
/// the surface; the shape is part of the published API.
#[utoipa::path(
    post,
    path = "/projects/generate-onboarding",
    request_body = GenerateOnboardingRequest,
    responses(
        (status = 200, description = "Generated overview", body = GenerateOnboardingResponse),
        (status = 400, description = "Missing project data", body = GenerationErrorResponse),
        (status = 500, description = "Generation failed", body = GenerationErrorResponse)
    ),
    tag = "onboarding"
)]
pub async fn generate_onboarding(
    State(state): State<AppState>,
    Json(request): Json<GenerateOnboardingRequest>,
) -> Result<Json<GenerateOnboardingResponse>, Response> {
    if request.project_data.is_null() {
        return Err(generation_error_response(
            StatusCode::BAD_REQUEST,
            "Project data is required",
        ));
    }

    let onboarding_overview = state
        .orchestrator
        .generate_overview(&request.project_data)
        .await
        .map_err(|error| {
            let status = match &error {
                ApplicationError::InvalidUrl(_) => StatusCode::BAD_REQUEST,
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            };
            if status.is_server_error() {
                tracing::error!(error = %error, "Onboarding generation failed");
            }
            generation_error_response(status, "Failed to generate onboarding")
        })?;

    Ok(Json(GenerateOnboardingResponse {
        onboarding_overview,
    }))
}

fn generation_error_response(status: StatusCode, message: impl Into<String>) -> Response {
    (
        status,
        Json(GenerationErrorResponse {
            error: message.into(),
        }),
    )
        .into_response()
}
