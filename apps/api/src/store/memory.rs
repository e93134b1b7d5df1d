//! In-memory `Store` used by router and service tests.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;
use sqlx::types::Json;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::job_description::{JobDescription, NewJobDescription};
use crate::models::resume::{NewResume, Resume};
use crate::models::suggestion::{NewSuggestion, Suggestion};
use crate::models::user::{NewUser, User};
use crate::store::{duplicate_email, Store, UserPage};

/// Rows are kept in insertion order; lists walk them in reverse for newest-first.
#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<Tables>,
    fail_user_updates: AtomicBool,
}

#[derive(Default)]
struct Tables {
    users: Vec<User>,
    resumes: Vec<Resume>,
    jobs: Vec<JobDescription>,
    suggestions: Vec<Suggestion>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every later `update_user` fail as a lost connection would.
    pub fn fail_user_updates(&self) {
        self.fail_user_updates.store(true, Ordering::SeqCst);
    }

    pub fn resume_count(&self) -> usize {
        self.inner.lock().unwrap().resumes.len()
    }

    pub fn job_count(&self) -> usize {
        self.inner.lock().unwrap().jobs.len()
    }

    pub fn user_count(&self) -> usize {
        self.inner.lock().unwrap().users.len()
    }

    pub fn suggestion_count(&self) -> usize {
        self.inner.lock().unwrap().suggestions.len()
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn insert_user(&self, user: NewUser) -> Result<User, AppError> {
        let mut tables = self.inner.lock().unwrap();
        if tables.users.iter().any(|u| u.email == user.email) {
            return Err(duplicate_email());
        }
        let now = Utc::now();
        let row = User {
            id: Uuid::new_v4(),
            name: user.name,
            email: user.email,
            password_hash: user.password_hash,
            industry: user.industry.as_str().to_string(),
            experience_level: user.experience_level.as_str().to_string(),
            profile_image_url: None,
            profile_image_key: None,
            created_at: now,
            updated_at: now,
        };
        tables.users.push(row.clone());
        Ok(row)
    }

    async fn get_user(&self, id: Uuid) -> Result<Option<User>, AppError> {
        let tables = self.inner.lock().unwrap();
        Ok(tables.users.iter().find(|u| u.id == id).cloned())
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let tables = self.inner.lock().unwrap();
        Ok(tables.users.iter().find(|u| u.email == email).cloned())
    }

    async fn list_users(&self, limit: i64, offset: i64) -> Result<UserPage, AppError> {
        let tables = self.inner.lock().unwrap();
        let users = tables
            .users
            .iter()
            .rev()
            .skip(offset.max(0) as usize)
            .take(limit.max(0) as usize)
            .cloned()
            .collect();
        Ok(UserPage {
            users,
            total: tables.users.len() as i64,
        })
    }

    async fn update_user(&self, user: &User) -> Result<User, AppError> {
        if self.fail_user_updates.load(Ordering::SeqCst) {
            return Err(AppError::Database(sqlx::Error::PoolTimedOut));
        }
        let mut tables = self.inner.lock().unwrap();
        if tables
            .users
            .iter()
            .any(|u| u.id != user.id && u.email == user.email)
        {
            return Err(duplicate_email());
        }
        let row = tables
            .users
            .iter_mut()
            .find(|u| u.id == user.id)
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;
        *row = User {
            updated_at: Utc::now(),
            ..user.clone()
        };
        Ok(row.clone())
    }

    async fn delete_user(&self, id: Uuid) -> Result<bool, AppError> {
        let mut tables = self.inner.lock().unwrap();
        let before = tables.users.len();
        tables.users.retain(|u| u.id != id);
        Ok(tables.users.len() != before)
    }

    async fn insert_resume(&self, resume: NewResume) -> Result<Resume, AppError> {
        let now = Utc::now();
        let row = Resume {
            id: Uuid::new_v4(),
            user_id: resume.user_id,
            file_name: resume.file_name,
            file_url: resume.file_url,
            storage_key: resume.storage_key,
            original_text: resume.extracted_text.clone(),
            extracted_text: resume.extracted_text,
            version: 1,
            is_edited: false,
            created_at: now,
            updated_at: now,
        };
        self.inner.lock().unwrap().resumes.push(row.clone());
        Ok(row)
    }

    async fn get_resume(&self, id: Uuid) -> Result<Option<Resume>, AppError> {
        let tables = self.inner.lock().unwrap();
        Ok(tables.resumes.iter().find(|r| r.id == id).cloned())
    }

    async fn list_resumes(&self, user_id: Uuid) -> Result<Vec<Resume>, AppError> {
        let tables = self.inner.lock().unwrap();
        Ok(tables
            .resumes
            .iter()
            .rev()
            .filter(|r| r.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn delete_resume(&self, id: Uuid) -> Result<bool, AppError> {
        let mut tables = self.inner.lock().unwrap();
        let before = tables.resumes.len();
        tables.resumes.retain(|r| r.id != id);
        Ok(tables.resumes.len() != before)
    }

    async fn insert_job(&self, job: NewJobDescription) -> Result<JobDescription, AppError> {
        let row = JobDescription {
            id: Uuid::new_v4(),
            user_id: job.user_id,
            extracted_text: job.extracted_text,
            role_title: job.role_title,
            company_name: job.company_name,
            keywords: job.keywords,
            created_at: Utc::now(),
        };
        self.inner.lock().unwrap().jobs.push(row.clone());
        Ok(row)
    }

    async fn get_job(&self, id: Uuid) -> Result<Option<JobDescription>, AppError> {
        let tables = self.inner.lock().unwrap();
        Ok(tables.jobs.iter().find(|j| j.id == id).cloned())
    }

    async fn list_jobs(&self, user_id: Uuid) -> Result<Vec<JobDescription>, AppError> {
        let tables = self.inner.lock().unwrap();
        Ok(tables
            .jobs
            .iter()
            .rev()
            .filter(|j| j.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn delete_job(&self, id: Uuid) -> Result<bool, AppError> {
        let mut tables = self.inner.lock().unwrap();
        let before = tables.jobs.len();
        tables.jobs.retain(|j| j.id != id);
        Ok(tables.jobs.len() != before)
    }

    async fn insert_suggestion(&self, suggestion: NewSuggestion) -> Result<Suggestion, AppError> {
        let row = Suggestion {
            id: Uuid::new_v4(),
            resume_id: suggestion.resume_id,
            job_id: suggestion.job_id,
            suggestions: Json(suggestion.suggestions),
            overall_score: suggestion.overall_score,
            created_at: Utc::now(),
        };
        self.inner.lock().unwrap().suggestions.push(row.clone());
        Ok(row)
    }

    async fn get_suggestion(&self, id: Uuid) -> Result<Option<Suggestion>, AppError> {
        let tables = self.inner.lock().unwrap();
        Ok(tables.suggestions.iter().find(|s| s.id == id).cloned())
    }

    async fn list_suggestions_for_resumes(&self, resume_ids: &[Uuid]) -> Result<Vec<Suggestion>, AppError> {
        let tables = self.inner.lock().unwrap();
        Ok(tables
            .suggestions
            .iter()
            .rev()
            .filter(|s| resume_ids.contains(&s.resume_id))
            .cloned()
            .collect())
    }
}
