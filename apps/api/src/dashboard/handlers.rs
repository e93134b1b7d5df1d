use axum::{extract::State, Json};
use serde::Serialize;

use crate::auth::AuthUser;
use crate::errors::AppError;
use crate::models::job_description::JobDescription;
use crate::models::resume::Resume;
use crate::models::suggestion::Suggestion;
use crate::state::AppState;

const LATEST_LIMIT: usize = 5;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    pub total_resumes: usize,
    pub total_job_descriptions: usize,
    pub total_suggestions: usize,
    pub latest_resumes: Vec<Resume>,
    pub latest_job_descriptions: Vec<JobDescription>,
    pub latest_suggestions: Vec<Suggestion>,
}

impl DashboardSummary {
    /// Inputs are newest first. `latest_suggestions` only draws from the
    /// suggestions of the latest resumes.
    fn from_lists(
        resumes: Vec<Resume>,
        jobs: Vec<JobDescription>,
        suggestions: Vec<Suggestion>,
    ) -> Self {
        let total_suggestions = suggestions.len();
        let latest_resumes: Vec<Resume> = resumes.iter().take(LATEST_LIMIT).cloned().collect();
        let latest_suggestions = suggestions
            .into_iter()
            .filter(|s| latest_resumes.iter().any(|r| r.id == s.resume_id))
            .take(LATEST_LIMIT)
            .collect();

        Self {
            total_resumes: resumes.len(),
            total_job_descriptions: jobs.len(),
            total_suggestions,
            latest_resumes,
            latest_job_descriptions: jobs.into_iter().take(LATEST_LIMIT).collect(),
            latest_suggestions,
        }
    }
}

/// GET /api/dashboard
///
/// Suggestions have no owner column, so they are counted through the
/// caller's resumes.
pub async fn handle_dashboard(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
) -> Result<Json<DashboardSummary>, AppError> {
    let resumes = state.store.list_resumes(user.id).await?;
    let jobs = state.store.list_jobs(user.id).await?;

    let resume_ids: Vec<_> = resumes.iter().map(|r| r.id).collect();
    let suggestions = if resume_ids.is_empty() {
        Vec::new()
    } else {
        state.store.list_suggestions_for_resumes(&resume_ids).await?
    };

    Ok(Json(DashboardSummary::from_lists(resumes, jobs, suggestions)))
}
