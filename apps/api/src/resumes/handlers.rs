use axum::{
    extract::{multipart::MultipartRejection, Multipart, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;
use serde_json::{json, Value};
use tracing::{info, warn};
use uuid::Uuid;

use crate::access::owned_resume;
use crate::auth::AuthUser;
use crate::errors::AppError;
use crate::extract::{extract_text, DocumentKind};
use crate::extractors::ApiPath;
use crate::models::resume::{NewResume, Resume};
use crate::state::AppState;
use crate::storage::object_key;
use crate::uploads::{discard_upload, read_file_field};

const RESUME_FIELD: &str = "resume";

#[derive(Debug, Serialize)]
pub struct UploadResumeResponse {
    pub message: &'static str,
    pub resume: Resume,
}

/// POST /api/resumes/upload
///
/// Multipart field `resume`. Text is extracted before the file is stored so a
/// document that fails extraction leaves nothing behind.
pub async fn handle_upload_resume(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<(StatusCode, Json<UploadResumeResponse>), AppError> {
    let file = read_file_field(multipart, RESUME_FIELD, "resume")
        .await?
        .ok_or_else(|| AppError::Validation("No resume file uploaded".to_string()))?;

    let kind = DocumentKind::detect(&file.file_name, file.content_type.as_deref());
    let document = file.bytes.clone();
    let extracted = tokio::task::spawn_blocking(move || extract_text(kind, &document))
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Text extraction task failed: {e}")))??;

    let extracted_text = extracted.unwrap_or_else(|| {
        warn!(
            "No text extractor for '{}' ({:?}); storing with empty text",
            file.file_name, kind
        );
        String::new()
    });

    let key = object_key("resumes", user.id, &file.file_name);
    let content_type = file
        .content_type
        .clone()
        .unwrap_or_else(|| kind.content_type().to_string());
    let stored = state.storage.put(&key, file.bytes, &content_type).await?;

    let inserted = state
        .store
        .insert_resume(NewResume {
            user_id: user.id,
            file_name: file.file_name,
            file_url: stored.url,
            storage_key: stored.key.clone(),
            extracted_text,
        })
        .await;

    let resume = match inserted {
        Ok(resume) => resume,
        Err(e) => {
            discard_upload(state.storage.as_ref(), &stored.key).await;
            return Err(e);
        }
    };

    info!(
        "User {} uploaded resume {} ({} chars extracted)",
        user.id,
        resume.id,
        resume.extracted_text.len()
    );

    Ok((
        StatusCode::CREATED,
        Json(UploadResumeResponse {
            message: "Resume uploaded successfully",
            resume,
        }),
    ))
}

/// GET /api/resumes
pub async fn handle_list_resumes(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
) -> Result<Json<Vec<Resume>>, AppError> {
    Ok(Json(state.store.list_resumes(user.id).await?))
}

/// GET /api/resumes/:id
pub async fn handle_get_resume(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<Resume>, AppError> {
    Ok(Json(owned_resume(state.store.as_ref(), id, user.id).await?))
}

/// DELETE /api/resumes/:id
///
/// The stored file is removed best-effort: a storage failure is logged and
/// the record is deleted regardless.
pub async fn handle_delete_resume(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<Value>, AppError> {
    let resume = owned_resume(state.store.as_ref(), id, user.id).await?;

    if let Err(e) = state.storage.delete(&resume.storage_key).await {
        warn!("Resume {} file delete failed, deleting record anyway: {e}", resume.id);
    }

    state.store.delete_resume(resume.id).await?;
    info!("User {} deleted resume {}", user.id, resume.id);

    Ok(Json(json!({ "message": "Resume deleted successfully" })))
}
