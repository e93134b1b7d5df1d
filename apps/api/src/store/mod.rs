//! Persistence layer: the four record collections behind one trait.
//!
//! `AppState` holds an `Arc<dyn Store>`; `PgStore` backs the running service.

#[cfg(test)]
pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::job_description::{JobDescription, NewJobDescription};
use crate::models::resume::{NewResume, Resume};
use crate::models::suggestion::{NewSuggestion, Suggestion};
use crate::models::user::{NewUser, User};

pub use postgres::PgStore;

/// One page of users plus the total row count.
#[derive(Debug, Clone)]
pub struct UserPage {
    pub users: Vec<User>,
    pub total: i64,
}

/// Record access used by every handler. Lists are returned newest first.
///
/// Inserting a user whose email already exists fails with `AppError::Validation`.
#[async_trait]
pub trait Store: Send + Sync {
    async fn insert_user(&self, user: NewUser) -> Result<User, AppError>;
    async fn get_user(&self, id: Uuid) -> Result<Option<User>, AppError>;
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, AppError>;
    async fn list_users(&self, limit: i64, offset: i64) -> Result<UserPage, AppError>;
    /// Persists every mutable field of `user` and bumps `updated_at`.
    async fn update_user(&self, user: &User) -> Result<User, AppError>;
    async fn delete_user(&self, id: Uuid) -> Result<bool, AppError>;

    async fn insert_resume(&self, resume: NewResume) -> Result<Resume, AppError>;
    async fn get_resume(&self, id: Uuid) -> Result<Option<Resume>, AppError>;
    async fn list_resumes(&self, user_id: Uuid) -> Result<Vec<Resume>, AppError>;
    async fn delete_resume(&self, id: Uuid) -> Result<bool, AppError>;

    async fn insert_job(&self, job: NewJobDescription) -> Result<JobDescription, AppError>;
    async fn get_job(&self, id: Uuid) -> Result<Option<JobDescription>, AppError>;
    async fn list_jobs(&self, user_id: Uuid) -> Result<Vec<JobDescription>, AppError>;
    async fn delete_job(&self, id: Uuid) -> Result<bool, AppError>;

    async fn insert_suggestion(&self, suggestion: NewSuggestion) -> Result<Suggestion, AppError>;
    async fn get_suggestion(&self, id: Uuid) -> Result<Option<Suggestion>, AppError>;
    async fn list_suggestions_for_resumes(&self, resume_ids: &[Uuid]) -> Result<Vec<Suggestion>, AppError>;
}

pub(crate) fn duplicate_email() -> AppError {
    AppError::Validation("User already exists".to_string())
}
