//! API request and response models

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{ProjectRecord, RepositoryMetadata};

/// Request model for project creation.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateProjectRequest {
    /// GitHub repository URL
    #[schema(example = "https://github.com/octocat/Hello-World")]
    pub repo_url: String,
}

/// Response wrapper carrying a full project record.
#[derive(Debug, Serialize, ToSchema)]
pub struct ProjectResponse {
    pub project: ProjectRecord,
}

/// Partial metadata merge for a tracked project: stored identity plus a
/// fresh read of the fast repository metadata.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProjectMetaResponse {
    pub id: String,
    pub repo_url: String,
    #[serde(flatten)]
    pub meta: RepositoryMetadata,
}

/// Response model for the deep-context onboarding endpoint.
#[derive(Debug, Serialize, ToSchema)]
pub struct OnboardingSummaryResponse {
    pub summary: String,
}

/// Request model for synchronous overview generation.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GenerateOnboardingRequest {
    /// Arbitrary project context embedded into the prompt.
    #[serde(default)]
    #[schema(value_type = Object)]
    pub project_data: serde_json::Value,
}

/// Response model for synchronous overview generation.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GenerateOnboardingResponse {
    pub onboarding_overview: String,
}

/// Error body used across the surface.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub message: String,
}

/// Error body of the generate-onboarding endpoint, which reports under an
/// `error` key instead.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct GenerationErrorResponse {
    pub error: String,
}

/// Health check response.
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}
