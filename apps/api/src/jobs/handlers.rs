use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::info;
use uuid::Uuid;

use crate::access::owned_job;
use crate::auth::AuthUser;
use crate::errors::AppError;
use crate::extractors::{ApiJson, ApiPath};
use crate::models::job_description::{JobDescription, NewJobDescription};
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateJobRequest {
    pub text: Option<String>,
    pub role_title: Option<String>,
    pub company_name: Option<String>,
    /// Anything other than an array of strings is ignored.
    pub keywords: Option<Value>,
}

impl CreateJobRequest {
    pub fn validate(self, user_id: Uuid) -> Result<NewJobDescription, AppError> {
        let text = self.text.as_deref().map(str::trim).unwrap_or_default();
        if text.is_empty() {
            return Err(AppError::Validation(
                "Job description text is required".to_string(),
            ));
        }

        let keywords = match self.keywords {
            Some(Value::Array(items)) => items
                .into_iter()
                .filter_map(|v| v.as_str().map(|s| s.trim().to_string()))
                .filter(|s| !s.is_empty())
                .collect(),
            _ => Vec::new(),
        };

        Ok(NewJobDescription {
            user_id,
            extracted_text: text.to_string(),
            role_title: self.role_title.unwrap_or_default().trim().to_string(),
            company_name: self.company_name.unwrap_or_default().trim().to_string(),
            keywords,
        })
    }
}

#[derive(Debug, Serialize)]
pub struct CreateJobResponse {
    pub message: &'static str,
    pub job: JobDescription,
}

/// POST /api/job-descriptions/upload
pub async fn handle_create_job(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    ApiJson(request): ApiJson<CreateJobRequest>,
) -> Result<(StatusCode, Json<CreateJobResponse>), AppError> {
    let new_job = request.validate(user.id)?;
    let job = state.store.insert_job(new_job).await?;
    info!("User {} created job description {}", user.id, job.id);

    Ok((
        StatusCode::CREATED,
        Json(CreateJobResponse {
            message: "Job Description uploaded successfully",
            job,
        }),
    ))
}

/// GET /api/job-descriptions
pub async fn handle_list_jobs(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
) -> Result<Json<Vec<JobDescription>>, AppError> {
    Ok(Json(state.store.list_jobs(user.id).await?))
}

/// GET /api/job-descriptions/:id
pub async fn handle_get_job(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<JobDescription>, AppError> {
    Ok(Json(owned_job(state.store.as_ref(), id, user.id).await?))
}

/// DELETE /api/job-descriptions/:id
pub async fn handle_delete_job(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<Value>, AppError> {
    let job = owned_job(state.store.as_ref(), id, user.id).await?;
    state.store.delete_job(job.id).await?;
    info!("User {} deleted job description {}", user.id, job.id);

    Ok(Json(json!({ "message": "Job Description deleted successfully" })))
}
