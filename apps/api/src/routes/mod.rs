pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post, put},
    Router,
};

use crate::dashboard::handlers as dashboard;
use crate::jobs::handlers as jobs;
use crate::resumes::handlers as resumes;
use crate::state::AppState;
use crate::suggestions::handlers as suggestions;
use crate::users::handlers as users;

pub fn build_router(state: AppState) -> Router {
    let body_limit = state.config.max_upload_bytes;

    Router::new()
        .route("/health", get(health::health_handler))
        // Users
        .route("/api/users/register", post(users::handle_register))
        .route("/api/users/login", post(users::handle_login))
        .route("/api/users", get(users::handle_list_users))
        .route(
            "/api/users/:id",
            get(users::handle_get_user)
                .put(users::handle_update_user)
                .delete(users::handle_delete_user),
        )
        .route(
            "/api/users/:id/profile-image",
            put(users::handle_upload_profile_image),
        )
        // Resumes
        .route("/api/resumes/upload", post(resumes::handle_upload_resume))
        .route("/api/resumes", get(resumes::handle_list_resumes))
        .route(
            "/api/resumes/:id",
            get(resumes::handle_get_resume).delete(resumes::handle_delete_resume),
        )
        // Job descriptions
        .route("/api/job-descriptions/upload", post(jobs::handle_create_job))
        .route("/api/job-descriptions", get(jobs::handle_list_jobs))
        .route(
            "/api/job-descriptions/:id",
            get(jobs::handle_get_job).delete(jobs::handle_delete_job),
        )
        // Suggestions
        .route("/api/suggestions/generate", post(suggestions::handle_generate))
        .route(
            "/api/suggestions/resume/:resume_id",
            get(suggestions::handle_list_for_resume),
        )
        .route("/api/suggestions/:id", get(suggestions::handle_get_suggestion))
        // Dashboard
        .route("/api/dashboard", get(dashboard::handle_dashboard))
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}
