use async_trait::async_trait;
use sqlx::types::Json;
use sqlx::PgPool;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::job_description::{JobDescription, NewJobDescription};
use crate::models::resume::{NewResume, Resume};
use crate::models::suggestion::{NewSuggestion, Suggestion};
use crate::models::user::{NewUser, User};
use crate::store::{duplicate_email, Store, UserPage};

/// PostgreSQL-backed store.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn map_unique_violation(e: sqlx::Error) -> AppError {
    match &e {
        sqlx::Error::Database(db) if db.is_unique_violation() => duplicate_email(),
        _ => AppError::Database(e),
    }
}

#[async_trait]
impl Store for PgStore {
    async fn insert_user(&self, user: NewUser) -> Result<User, AppError> {
        sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (id, name, email, password_hash, industry, experience_level)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(user.industry.as_str())
        .bind(user.experience_level.as_str())
        .fetch_one(&self.pool)
        .await
        .map_err(map_unique_violation)
    }

    async fn get_user(&self, id: Uuid) -> Result<Option<User>, AppError> {
        Ok(sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        Ok(sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = $1")
            .bind(email)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn list_users(&self, limit: i64, offset: i64) -> Result<UserPage, AppError> {
        let users = sqlx::query_as::<_, User>(
            "SELECT * FROM users ORDER BY created_at DESC LIMIT $1 OFFSET $2",
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await?;

        Ok(UserPage { users, total })
    }

    async fn update_user(&self, user: &User) -> Result<User, AppError> {
        sqlx::query_as::<_, User>(
            r#"
            UPDATE users
            SET name = $2, email = $3, password_hash = $4, industry = $5,
                experience_level = $6, profile_image_url = $7, profile_image_key = $8,
                updated_at = now()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(user.id)
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(&user.industry)
        .bind(&user.experience_level)
        .bind(&user.profile_image_url)
        .bind(&user.profile_image_key)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_unique_violation)?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))
    }

    async fn delete_user(&self, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn insert_resume(&self, resume: NewResume) -> Result<Resume, AppError> {
        // extracted_text and original_text start identical; version 1, unedited.
        Ok(sqlx::query_as::<_, Resume>(
            r#"
            INSERT INTO resumes
                (id, user_id, file_name, file_url, storage_key, extracted_text, original_text, version, is_edited)
            VALUES ($1, $2, $3, $4, $5, $6, $6, 1, FALSE)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(resume.user_id)
        .bind(&resume.file_name)
        .bind(&resume.file_url)
        .bind(&resume.storage_key)
        .bind(&resume.extracted_text)
        .fetch_one(&self.pool)
        .await?)
    }

    async fn get_resume(&self, id: Uuid) -> Result<Option<Resume>, AppError> {
        Ok(sqlx::query_as::<_, Resume>("SELECT * FROM resumes WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn list_resumes(&self, user_id: Uuid) -> Result<Vec<Resume>, AppError> {
        Ok(sqlx::query_as::<_, Resume>(
            "SELECT * FROM resumes WHERE user_id = $1 ORDER BY created_at DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?)
    }

    async fn delete_resume(&self, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM resumes WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn insert_job(&self, job: NewJobDescription) -> Result<JobDescription, AppError> {
        Ok(sqlx::query_as::<_, JobDescription>(
            r#"
            INSERT INTO job_descriptions (id, user_id, extracted_text, role_title, company_name, keywords)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(job.user_id)
        .bind(&job.extracted_text)
        .bind(&job.role_title)
        .bind(&job.company_name)
        .bind(&job.keywords)
        .fetch_one(&self.pool)
        .await?)
    }

    async fn get_job(&self, id: Uuid) -> Result<Option<JobDescription>, AppError> {
        Ok(
            sqlx::query_as::<_, JobDescription>("SELECT * FROM job_descriptions WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?,
        )
    }

    async fn list_jobs(&self, user_id: Uuid) -> Result<Vec<JobDescription>, AppError> {
        Ok(sqlx::query_as::<_, JobDescription>(
            "SELECT * FROM job_descriptions WHERE user_id = $1 ORDER BY created_at DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?)
    }

    async fn delete_job(&self, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM job_descriptions WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn insert_suggestion(&self, suggestion: NewSuggestion) -> Result<Suggestion, AppError> {
        // Append-only: every generation is a new row, never an upsert.
        Ok(sqlx::query_as::<_, Suggestion>(
            r#"
            INSERT INTO suggestions (id, resume_id, job_id, suggestions, overall_score)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(suggestion.resume_id)
        .bind(suggestion.job_id)
        .bind(Json(&suggestion.suggestions))
        .bind(suggestion.overall_score)
        .fetch_one(&self.pool)
        .await?)
    }

    async fn get_suggestion(&self, id: Uuid) -> Result<Option<Suggestion>, AppError> {
        Ok(sqlx::query_as::<_, Suggestion>("SELECT * FROM suggestions WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn list_suggestions_for_resumes(&self, resume_ids: &[Uuid]) -> Result<Vec<Suggestion>, AppError> {
        if resume_ids.is_empty() {
            return Ok(Vec::new());
        }
        Ok(sqlx::query_as::<_, Suggestion>(
            "SELECT * FROM suggestions WHERE resume_id = ANY($1) ORDER BY created_at DESC",
        )
        .bind(resume_ids)
        .fetch_all(&self.pool)
        .await?)
    }
}
