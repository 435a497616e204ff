//! Project collection controllers

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::Response,
};
use tracing::info;

use crate::domain::ProjectRecord;
use crate::presentation::controllers::{AppState, application_error_to_response};
use crate::presentation::models::{
    CreateProjectRequest, ErrorResponse, ProjectMetaResponse, ProjectResponse,
};

/// POST /projects - Track a repository and start onboarding generation
#[utoipa::path(
    post,
    path = "/projects",
    request_body = CreateProjectRequest,
    responses(
        (status = 201, description = "Project created, generation started", body = ProjectResponse),
        (status = 400, description = "Invalid repository URL", body = ErrorResponse),
        (status = 404, description = "Repository not found or private", body = ErrorResponse),
        (status = 409, description = "Project already tracked", body = ErrorResponse),
        (status = 500, description = "Upstream failure", body = ErrorResponse)
    ),
    tag = "projects"
)]
pub async fn create_project(
    State(state): State<AppState>,
    Json(request): Json<CreateProjectRequest>,
) -> Result<(StatusCode, Json<ProjectResponse>), Response> {
    let repo_url = request.repo_url.trim();

    let project = state
        .orchestrator
        .create_project(repo_url)
        .await
        .map_err(application_error_to_response)?;

    Ok((StatusCode::CREATED, Json(ProjectResponse { project })))
}

/// GET /projects - All tracked projects in insertion order
#[utoipa::path(
    get,
    path = "/projects",
    responses(
        (status = 200, description = "Project list", body = [ProjectRecord])
    ),
    tag = "projects"
)]
pub async fn list_projects(State(state): State<AppState>) -> Json<Vec<ProjectRecord>> {
    Json(state.store.list().await)
}

/// GET /projects/{id} - Retrieve a project by id
#[utoipa::path(
    get,
    path = "/projects/{id}",
    params(("id" = String, Path, description = "Project id (lowercase owner-repo)")),
    responses(
        (status = 200, description = "Project found", body = ProjectRecord),
        (status = 404, description = "Project not found", body = ErrorResponse)
    ),
    tag = "projects"
)]
pub async fn get_project(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ProjectRecord>, Response> {
    match state.store.find(&id).await {
        Some(project) => Ok(Json(project)),
        None => Err(application_error_to_response(
            crate::application::ApplicationError::NotFound(id),
        )),
    }
}

/// DELETE /projects/{id} - Remove a project (idempotent)
#[utoipa::path(
    delete,
    path = "/projects/{id}",
    params(("id" = String, Path, description = "Project id")),
    responses(
        (status = 204, description = "Project removed (or was already absent)")
    ),
    tag = "projects"
)]
pub async fn delete_project(State(state): State<AppState>, Path(id): Path<String>) -> StatusCode {
    if state.orchestrator.delete_project(&id).await {
        info!(project_id = %id, "Project deleted");
    }
    StatusCode::NO_CONTENT
}

/// POST /projects/{id}/regenerate - Re-enter onboarding generation
#[utoipa::path(
    post,
    path = "/projects/{id}/regenerate",
    params(("id" = String, Path, description = "Project id")),
    responses(
        (status = 202, description = "Regeneration started", body = ProjectResponse),
        (status = 404, description = "Project not found", body = ErrorResponse),
        (status = 409, description = "Generation already in flight", body = ErrorResponse)
    ),
    tag = "projects"
)]
pub async fn regenerate_project(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<(StatusCode, Json<ProjectResponse>), Response> {
    let project = state
        .orchestrator
        .regenerate(&id)
        .await
        .map_err(application_error_to_response)?;

    Ok((StatusCode::ACCEPTED, Json(ProjectResponse { project })))
}

/// GET /projects/{id}/meta - Stored identity merged with fresh metadata
#[utoipa::path(
    get,
    path = "/projects/{id}/meta",
    params(("id" = String, Path, description = "Project id")),
    responses(
        (status = 200, description = "Partial metadata merge", body = ProjectMetaResponse),
        (status = 404, description = "Project not found", body = ErrorResponse),
        (status = 500, description = "Upstream failure", body = ErrorResponse)
    ),
    tag = "projects"
)]
pub async fn get_project_meta(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ProjectMetaResponse>, Response> {
    let project = state.store.find(&id).await.ok_or_else(|| {
        application_error_to_response(crate::application::ApplicationError::NotFound(id.clone()))
    })?;

    let meta = state
        .fetcher
        .fetch_metadata(&project.owner, &project.name)
        .await
        .map_err(|e| application_error_to_response(e.into()))?;

    Ok(Json(ProjectMetaResponse {
        id: project.id,
        repo_url: project.url,
        meta,
    }))
}
