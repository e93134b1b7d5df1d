//! Suggestion generation.
//!
//! Flow: load resume + job → ownership → build prompt → one provider call →
//! tolerant parse → score → INSERT a new suggestion row.
//!
//! Provider failures propagate; unparseable provider output does not.

use tracing::{info, warn};
use uuid::Uuid;

use crate::access::ensure_owner;
use crate::errors::AppError;
use crate::llm_client::TextGenerator;
use crate::models::suggestion::{NewSuggestion, Suggestion};
use crate::store::Store;
use crate::suggestions::parser::{overall_score, parse_suggestions};
use crate::suggestions::prompts::suggestion_prompt;

/// Validated generation request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GenerateInput {
    pub resume_id: Uuid,
    pub job_id: Uuid,
}

/// Generates and persists one suggestion record for `input` on behalf of `caller_id`.
///
/// Both records must exist (`NotFound`) and belong to the caller (`Forbidden`).
/// Each call inserts a new row; repeated calls for the same pair are not deduplicated.
pub async fn generate_suggestions(
    store: &dyn Store,
    llm: &dyn TextGenerator,
    caller_id: Uuid,
    input: GenerateInput,
) -> Result<Suggestion, AppError> {
    let resume = store.get_resume(input.resume_id).await?;
    let job = store.get_job(input.job_id).await?;

    let (resume, job) = match (resume, job) {
        (Some(resume), Some(job)) => (resume, job),
        _ => {
            return Err(AppError::NotFound(
                "Resume or Job Description not found".to_string(),
            ))
        }
    };

    ensure_owner(resume.user_id, caller_id)?;
    ensure_owner(job.user_id, caller_id)?;

    if resume.extracted_text.trim().is_empty() {
        warn!("Resume {} has no extracted text; generating anyway", resume.id);
    }

    let prompt = suggestion_prompt(&resume.extracted_text, &job.extracted_text);
    let raw = llm.generate(&prompt).await?;

    let parsed = parse_suggestions(&raw);
    let score = overall_score(parsed.items.len());

    let suggestion = store
        .insert_suggestion(NewSuggestion {
            resume_id: resume.id,
            job_id: job.id,
            suggestions: parsed.items,
            overall_score: score,
        })
        .await?;

    info!(
        "Generated suggestion {} ({} items, score {}, fallback={}) for resume {} / job {}",
        suggestion.id,
        suggestion.suggestions.len(),
        score,
        parsed.fell_back,
        resume.id,
        job.id
    );

    Ok(suggestion)
}
