//! Axum route handlers for the Suggestions API.

use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::access::{owned_resume, owned_suggestion};
use crate::auth::AuthUser;
use crate::errors::AppError;
use crate::extractors::{ApiJson, ApiPath};
use crate::models::suggestion::Suggestion;
use crate::state::AppState;
use crate::suggestions::generator::{generate_suggestions, GenerateInput};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateRequest {
    pub resume_id: Option<String>,
    pub job_id: Option<String>,
}

impl GenerateRequest {
    pub fn validate(self) -> Result<GenerateInput, AppError> {
        let resume_id = self.resume_id.filter(|s| !s.trim().is_empty());
        let job_id = self.job_id.filter(|s| !s.trim().is_empty());

        let (Some(resume_id), Some(job_id)) = (resume_id, job_id) else {
            return Err(AppError::Validation("resumeId and jobId required".to_string()));
        };

        Ok(GenerateInput {
            resume_id: parse_id("resumeId", &resume_id)?,
            job_id: parse_id("jobId", &job_id)?,
        })
    }
}

fn parse_id(field: &str, raw: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(raw.trim())
        .map_err(|_| AppError::Validation(format!("{field} must be a valid id")))
}

#[derive(Debug, Serialize)]
pub struct GenerateResponse {
    pub message: &'static str,
    pub suggestion: Suggestion,
}

/// POST /api/suggestions/generate
pub async fn handle_generate(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    ApiJson(request): ApiJson<GenerateRequest>,
) -> Result<(StatusCode, Json<GenerateResponse>), AppError> {
    let input = request.validate()?;

    let suggestion =
        generate_suggestions(state.store.as_ref(), state.llm.as_ref(), user.id, input).await?;

    Ok((
        StatusCode::CREATED,
        Json(GenerateResponse {
            message: "Suggestions created",
            suggestion,
        }),
    ))
}

/// GET /api/suggestions/resume/:resume_id
///
/// Newest first. The resume is loaded and its owner checked before listing.
pub async fn handle_list_for_resume(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    ApiPath(resume_id): ApiPath<Uuid>,
) -> Result<Json<Vec<Suggestion>>, AppError> {
    let resume = owned_resume(state.store.as_ref(), resume_id, user.id).await?;
    let suggestions = state
        .store
        .list_suggestions_for_resumes(&[resume.id])
        .await?;
    Ok(Json(suggestions))
}

/// GET /api/suggestions/:id
pub async fn handle_get_suggestion(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<Suggestion>, AppError> {
    let suggestion = owned_suggestion(state.store.as_ref(), id, user.id).await?;
    Ok(Json(suggestion))
}
