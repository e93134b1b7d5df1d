use std::fmt;

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

/// A registered account. The credential hash and storage key never leave the server.
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub industry: String,
    pub experience_level: String,
    pub profile_image_url: Option<String>,
    #[serde(skip_serializing)]
    pub profile_image_key: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields required to insert a user.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub industry: Industry,
    pub experience_level: ExperienceLevel,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Industry {
    Software,
    Finance,
    Healthcare,
    Education,
    Marketing,
    Sales,
    #[default]
    Other,
}

impl Industry {
    pub const ALL: [Industry; 7] = [
        Industry::Software,
        Industry::Finance,
        Industry::Healthcare,
        Industry::Education,
        Industry::Marketing,
        Industry::Sales,
        Industry::Other,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Industry::Software => "Software",
            Industry::Finance => "Finance",
            Industry::Healthcare => "Healthcare",
            Industry::Education => "Education",
            Industry::Marketing => "Marketing",
            Industry::Sales => "Sales",
            Industry::Other => "Other",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|i| i.as_str() == raw)
    }

    pub fn allowed_values() -> String {
        Self::ALL.map(Industry::as_str).join(", ")
    }
}

impl fmt::Display for Industry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ExperienceLevel {
    #[default]
    Intern,
    Junior,
    MidLevel,
    Senior,
    Lead,
    Manager,
}

impl ExperienceLevel {
    pub const ALL: [ExperienceLevel; 6] = [
        ExperienceLevel::Intern,
        ExperienceLevel::Junior,
        ExperienceLevel::MidLevel,
        ExperienceLevel::Senior,
        ExperienceLevel::Lead,
        ExperienceLevel::Manager,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ExperienceLevel::Intern => "Intern",
            ExperienceLevel::Junior => "Junior",
            ExperienceLevel::MidLevel => "Mid-level",
            ExperienceLevel::Senior => "Senior",
            ExperienceLevel::Lead => "Lead",
            ExperienceLevel::Manager => "Manager",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|l| l.as_str() == raw)
    }

    pub fn allowed_values() -> String {
        Self::ALL.map(ExperienceLevel::as_str).join(", ")
    }
}

impl fmt::Display for ExperienceLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
