use axum::{
    extract::{multipart::MultipartRejection, Multipart, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{info, warn};
use uuid::Uuid;

use crate::access::ensure_owner;
use crate::auth::{hash_password, verify_password, AuthUser};
use crate::errors::AppError;
use crate::extractors::{ApiJson, ApiPath};
use crate::models::user::{ExperienceLevel, Industry, NewUser, User};
use crate::state::AppState;
use crate::storage::object_key;
use crate::uploads::{discard_upload, read_file_field};

const MIN_PASSWORD_LEN: usize = 6;
const DEFAULT_PAGE_SIZE: i64 = 10;
const MAX_PAGE_SIZE: i64 = 100;
const PROFILE_IMAGE_FIELD: &str = "profileImage";

/// A user profile plus a freshly issued bearer token.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    #[serde(flatten)]
    pub user: User,
    pub token: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub industry: Option<String>,
    pub experience_level: Option<String>,
}

impl RegisterRequest {
    /// Checks required fields and enum labels. The password is returned
    /// separately so hashing stays with the caller.
    pub fn validate(self) -> Result<(NewUser, String), AppError> {
        let name = required(self.name.as_deref());
        let email = required(self.email.as_deref()).map(normalize_email);
        let password = self.password.filter(|p| !p.is_empty());

        let (Some(name), Some(email), Some(password)) = (name, email, password) else {
            return Err(AppError::Validation(
                "Name, email and password are required".to_string(),
            ));
        };

        check_email(&email)?;
        check_password(&password)?;

        let industry = match required(self.industry.as_deref()) {
            Some(raw) => parse_industry(raw)?,
            None => Industry::default(),
        };
        let experience_level = match required(self.experience_level.as_deref()) {
            Some(raw) => parse_experience_level(raw)?,
            None => ExperienceLevel::default(),
        };

        Ok((
            NewUser {
                name: name.to_string(),
                email,
                password_hash: String::new(),
                industry,
                experience_level,
            },
            password,
        ))
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub industry: Option<String>,
    pub experience_level: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct PageParams {
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct Pagination {
    pub page: i64,
    pub limit: i64,
    pub total: i64,
    pub pages: i64,
}

impl Pagination {
    fn new(page: i64, limit: i64, total: i64) -> Self {
        Self {
            page,
            limit,
            total,
            pages: (total + limit - 1) / limit,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct UserListResponse {
    pub users: Vec<User>,
    pub pagination: Pagination,
}

fn required(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

fn normalize_email(raw: &str) -> String {
    raw.trim().to_lowercase()
}

fn check_email(email: &str) -> Result<(), AppError> {
    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && domain.contains('.') => Ok(()),
        _ => Err(AppError::Validation("Please provide a valid email".to_string())),
    }
}

fn check_password(password: &str) -> Result<(), AppError> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(AppError::Validation(format!(
            "Password must be at least {MIN_PASSWORD_LEN} characters"
        )));
    }
    Ok(())
}

fn parse_industry(raw: &str) -> Result<Industry, AppError> {
    Industry::parse(raw).ok_or_else(|| {
        AppError::Validation(format!(
            "Invalid industry '{raw}'. Allowed: {}",
            Industry::allowed_values()
        ))
    })
}

fn parse_experience_level(raw: &str) -> Result<ExperienceLevel, AppError> {
    ExperienceLevel::parse(raw).ok_or_else(|| {
        AppError::Validation(format!(
            "Invalid experience level '{raw}'. Allowed: {}",
            ExperienceLevel::allowed_values()
        ))
    })
}

/// Rows to skip for `page`; a page whose offset overflows is rejected.
fn page_offset(page: i64, limit: i64) -> Result<i64, AppError> {
    (page - 1)
        .checked_mul(limit)
        .ok_or_else(|| AppError::Validation("page is out of range".to_string()))
}

/// Argon2 runs on the blocking pool.
async fn hash_off_thread(password: String) -> Result<String, AppError> {
    tokio::task::spawn_blocking(move || hash_password(&password))
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Password hashing task failed: {e}")))?
}

async fn verify_off_thread(password: String, password_hash: String) -> Result<bool, AppError> {
    tokio::task::spawn_blocking(move || verify_password(&password, &password_hash))
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Password check task failed: {e}")))
}

fn page_bounds(params: &PageParams) -> (i64, i64) {
    let page = params.page.filter(|p| *p > 0).unwrap_or(1);
    let limit = params
        .limit
        .filter(|l| *l > 0)
        .unwrap_or(DEFAULT_PAGE_SIZE)
        .min(MAX_PAGE_SIZE);
    (page, limit)
}

/// POST /api/users/register
pub async fn handle_register(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<RegisterRequest>,
) -> Result<(StatusCode, Json<AuthResponse>), AppError> {
    let (mut new_user, password) = req.validate()?;

    if state.store.find_user_by_email(&new_user.email).await?.is_some() {
        return Err(AppError::Validation("User already exists".to_string()));
    }

    new_user.password_hash = hash_off_thread(password).await?;
    let user = state.store.insert_user(new_user).await?;
    let token = state.jwt.issue(user.id)?;

    info!("Registered user {}", user.id);
    Ok((StatusCode::CREATED, Json(AuthResponse { user, token })))
}

/// POST /api/users/login
pub async fn handle_login(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<LoginRequest>,
) -> Result<Json<AuthResponse>, AppError> {
    let email = required(req.email.as_deref()).map(normalize_email);
    let password = req.password.filter(|p| !p.is_empty());
    let (Some(email), Some(password)) = (email, password) else {
        return Err(AppError::Validation(
            "Email and password are required".to_string(),
        ));
    };

    let invalid = || AppError::Unauthorized("Invalid email or password".to_string());

    let user = state.store.find_user_by_email(&email).await?.ok_or_else(invalid)?;
    if !verify_off_thread(password, user.password_hash.clone()).await? {
        return Err(invalid());
    }

    let token = state.jwt.issue(user.id)?;
    Ok(Json(AuthResponse { user, token }))
}

/// GET /api/users?page=&limit=
pub async fn handle_list_users(
    State(state): State<AppState>,
    AuthUser(_caller): AuthUser,
    Query(params): Query<PageParams>,
) -> Result<Json<UserListResponse>, AppError> {
    let (page, limit) = page_bounds(&params);
    let offset = page_offset(page, limit)?;
    let result = state.store.list_users(limit, offset).await?;

    Ok(Json(UserListResponse {
        users: result.users,
        pagination: Pagination::new(page, limit, result.total),
    }))
}

/// GET /api/users/:id
pub async fn handle_get_user(
    State(state): State<AppState>,
    AuthUser(_caller): AuthUser,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<User>, AppError> {
    let user = state
        .store
        .get_user(id)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;
    Ok(Json(user))
}

/// PUT /api/users/:id
///
/// Absent or empty fields are left unchanged.
pub async fn handle_update_user(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(req): ApiJson<UpdateUserRequest>,
) -> Result<Json<User>, AppError> {
    ensure_owner(id, caller.id)?;
    let mut user = caller;

    if let Some(name) = required(req.name.as_deref()) {
        user.name = name.to_string();
    }

    if let Some(email) = required(req.email.as_deref()).map(normalize_email) {
        if email != user.email {
            check_email(&email)?;
            if state.store.find_user_by_email(&email).await?.is_some() {
                return Err(AppError::Validation("Email already in use".to_string()));
            }
            user.email = email;
        }
    }

    if let Some(raw) = required(req.industry.as_deref()) {
        user.industry = parse_industry(raw)?.to_string();
    }
    if let Some(raw) = required(req.experience_level.as_deref()) {
        user.experience_level = parse_experience_level(raw)?.to_string();
    }

    if let Some(password) = req.password.filter(|p| !p.is_empty()) {
        check_password(&password)?;
        user.password_hash = hash_off_thread(password).await?;
    }

    let updated = state.store.update_user(&user).await?;
    info!("User {} updated their profile", updated.id);
    Ok(Json(updated))
}

/// PUT /api/users/:id/profile-image
///
/// Multipart field `profileImage`. The previous image is removed best-effort
/// once the new reference is saved.
pub async fn handle_upload_profile_image(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
    ApiPath(id): ApiPath<Uuid>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<User>, AppError> {
    ensure_owner(id, caller.id)?;

    let file = read_file_field(multipart, PROFILE_IMAGE_FIELD, "profile")
        .await?
        .ok_or_else(|| AppError::Validation("No image file uploaded".to_string()))?;

    let key = object_key("profile_pics", caller.id, &file.file_name);
    let content_type = file
        .content_type
        .clone()
        .unwrap_or_else(|| "application/octet-stream".to_string());
    let stored = state.storage.put(&key, file.bytes, &content_type).await?;

    let mut user = caller;
    let previous_key = user.profile_image_key.replace(stored.key.clone());
    user.profile_image_url = Some(stored.url);
    let updated = match state.store.update_user(&user).await {
        Ok(updated) => updated,
        Err(e) => {
            discard_upload(state.storage.as_ref(), &stored.key).await;
            return Err(e);
        }
    };

    if let Some(previous) = previous_key {
        if let Err(e) = state.storage.delete(&previous).await {
            warn!("Failed to remove previous profile image {previous}: {e}");
        }
    }

    Ok(Json(updated))
}

/// DELETE /api/users/:id
///
/// Resumes, job descriptions and suggestions owned by the user are kept.
pub async fn handle_delete_user(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<Value>, AppError> {
    ensure_owner(id, caller.id)?;

    if let Some(key) = caller.profile_image_key.as_deref() {
        if let Err(e) = state.storage.delete(key).await {
            warn!("Failed to remove profile image for user {}: {e}", caller.id);
        }
    }

    state.store.delete_user(caller.id).await?;
    info!("Deleted user {}", caller.id);

    Ok(Json(json!({ "message": "User removed" })))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn register(name: &str, email: &str, password: &str) -> RegisterRequest {
        RegisterRequest {
            name: Some(name.to_string()),
            email: Some(email.to_string()),
            password: Some(password.to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_register_defaults_and_normalizes_email() {
        let (user, password) = register("Ada", "  Ada@Example.com ", "secret1").validate().unwrap();
        assert_eq!(user.email, "ada@example.com");
        assert_eq!(user.industry, Industry::Other);
        assert_eq!(user.experience_level, ExperienceLevel::Intern);
        assert_eq!(password, "secret1");
    }

    #[test]
    fn test_register_requires_all_fields() {
        let req = RegisterRequest {
            name: Some("Ada".to_string()),
            email: Some("ada@example.com".to_string()),
            ..Default::default()
        };
        assert!(matches!(req.validate(), Err(AppError::Validation(_))));
    }

    #[test]
    fn test_register_rejects_short_password() {
        let err = register("Ada", "ada@example.com", "12345").validate().unwrap_err();
        assert!(matches!(err, AppError::Validation(msg) if msg.contains("at least 6")));
    }

    #[test]
    fn test_register_rejects_unknown_industry() {
        let req = RegisterRequest {
            industry: Some("Mining".to_string()),
            ..register("Ada", "ada@example.com", "secret1")
        };
        let err = req.validate().unwrap_err();
        assert!(matches!(err, AppError::Validation(msg) if msg.contains("Sales")));
    }

    #[test]
    fn test_register_accepts_mid_level() {
        let req = RegisterRequest {
            experience_level: Some("Mid-level".to_string()),
            industry: Some("Finance".to_string()),
            ..register("Ada", "ada@example.com", "secret1")
        };
        let (user, _) = req.validate().unwrap();
        assert_eq!(user.experience_level, ExperienceLevel::MidLevel);
        assert_eq!(user.industry, Industry::Finance);
    }

    #[test]
    fn test_check_email() {
        assert!(check_email("a@b.co").is_ok());
        assert!(check_email("not-an-email").is_err());
        assert!(check_email("@b.co").is_err());
    }

    #[test]
    fn test_page_bounds_defaults_and_caps() {
        let params = PageParams { page: None, limit: None };
        assert_eq!(page_bounds(&params), (1, 10));

        let params = PageParams { page: Some(0), limit: Some(500) };
        assert_eq!(page_bounds(&params), (1, 100));
    }

    #[test]
    fn test_page_offset_rejects_overflow() {
        assert_eq!(page_offset(1, 10).unwrap(), 0);
        assert_eq!(page_offset(3, 100).unwrap(), 200);
        assert!(matches!(page_offset(i64::MAX, 100), Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_hashing_off_thread_round_trips() {
        let hash = hash_off_thread("secret1".to_string()).await.unwrap();
        assert!(verify_off_thread("secret1".to_string(), hash.clone()).await.unwrap());
        assert!(!verify_off_thread("secret2".to_string(), hash).await.unwrap());
    }

    #[test]
    fn test_pagination_rounds_pages_up() {
        assert_eq!(Pagination::new(1, 10, 21).pages, 3);
        assert_eq!(Pagination::new(1, 10, 0).pages, 0);
    }
}
