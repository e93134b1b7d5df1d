//! Ownership checks. Every resume, job description, and suggestion read or
//! delete goes through here before touching the record.

use uuid::Uuid;

use crate::errors::AppError;
use crate::models::job_description::JobDescription;
use crate::models::resume::Resume;
use crate::models::suggestion::Suggestion;
use crate::store::Store;

pub fn ensure_owner(owner_id: Uuid, caller_id: Uuid) -> Result<(), AppError> {
    if owner_id == caller_id {
        Ok(())
    } else {
        Err(AppError::Forbidden("Not authorized to access this record".to_string()))
    }
}

pub async fn owned_resume(store: &dyn Store, id: Uuid, caller_id: Uuid) -> Result<Resume, AppError> {
    let resume = store
        .get_resume(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Resume not found".to_string()))?;
    ensure_owner(resume.user_id, caller_id)?;
    Ok(resume)
}

pub async fn owned_job(store: &dyn Store, id: Uuid, caller_id: Uuid) -> Result<JobDescription, AppError> {
    let job = store
        .get_job(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Job Description not found".to_string()))?;
    ensure_owner(job.user_id, caller_id)?;
    Ok(job)
}

/// Suggestions carry no owner of their own: load the suggestion, then the
/// resume it references, then compare that resume's owner.
pub async fn owned_suggestion(store: &dyn Store, id: Uuid, caller_id: Uuid) -> Result<Suggestion, AppError> {
    let suggestion = store
        .get_suggestion(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Suggestion not found".to_string()))?;

    let resume = store
        .get_resume(suggestion.resume_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Resume for this suggestion no longer exists".to_string()))?;
    ensure_owner(resume.user_id, caller_id)?;

    Ok(suggestion)
}
