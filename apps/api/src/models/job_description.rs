use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct JobDescription {
    pub id: Uuid,
    pub user_id: Uuid,
    pub extracted_text: String,
    pub role_title: String,
    pub company_name: String,
    pub keywords: Vec<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewJobDescription {
    pub user_id: Uuid,
    pub extracted_text: String,
    pub role_title: String,
    pub company_name: String,
    pub keywords: Vec<String>,
}
