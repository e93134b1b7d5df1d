//! Suggestion records and the items the AI provider returns.
//!
//! Items are deserialized leniently: the provider's output is free text that
//! only usually follows the requested schema.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    #[default]
    Medium,
    Low,
}

impl Priority {
    /// Case-insensitive label lookup; anything unrecognized is `Medium`.
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_ascii_lowercase().as_str() {
            "high" => Priority::High,
            "low" => Priority::Low,
            _ => Priority::Medium,
        }
    }
}

impl<'de> Deserialize<'de> for Priority {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Option::<String>::deserialize(deserializer)?;
        Ok(raw.as_deref().map(Priority::from_label).unwrap_or_default())
    }
}

/// One atomic edit recommendation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuggestionItem {
    #[serde(rename = "type", default = "default_kind", deserialize_with = "kind_or_default")]
    pub kind: String,
    #[serde(default, deserialize_with = "string_or_empty")]
    pub original_text: String,
    #[serde(default, deserialize_with = "string_or_empty")]
    pub suggested_text: String,
    #[serde(default, deserialize_with = "string_or_empty")]
    pub explanation: String,
    #[serde(default)]
    pub priority: Priority,
    /// Never set by any code path; always serialized as false.
    #[serde(default, skip_deserializing)]
    pub applied: bool,
}

fn default_kind() -> String {
    "general".to_string()
}

fn kind_or_default<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(Option::<String>::deserialize(deserializer)?
        .filter(|s| !s.trim().is_empty())
        .unwrap_or_else(default_kind))
}

fn string_or_empty<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// A persisted generation result. Ownership is derived through `resume_id`.
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Suggestion {
    pub id: Uuid,
    pub resume_id: Uuid,
    pub job_id: Uuid,
    pub suggestions: Json<Vec<SuggestionItem>>,
    pub overall_score: i32,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewSuggestion {
    pub resume_id: Uuid,
    pub job_id: Uuid,
    pub suggestions: Vec<SuggestionItem>,
    pub overall_score: i32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_item_deserializes_full_shape() {
        let json = r#"{
            "type": "keyword",
            "originalText": "Built APIs",
            "suggestedText": "Built distributed Go services",
            "explanation": "Mirrors the job's stack",
            "priority": "high"
        }"#;
        let item: SuggestionItem = serde_json::from_str(json).unwrap();
        assert_eq!(item.kind, "keyword");
        assert_eq!(item.priority, Priority::High);
        assert!(!item.applied);
    }

    #[test]
    fn test_item_fills_missing_and_null_fields() {
        let item: SuggestionItem =
            serde_json::from_str(r#"{"originalText": null, "priority": "URGENT"}"#).unwrap();
        assert_eq!(item.kind, "general");
        assert_eq!(item.original_text, "");
        assert_eq!(item.priority, Priority::Medium);
    }

    #[test]
    fn test_applied_cannot_be_set_from_input() {
        let item: SuggestionItem = serde_json::from_str(r#"{"type": "phrasing", "applied": true}"#).unwrap();
        assert!(!item.applied);
    }

    #[test]
    fn test_priority_labels_are_case_insensitive() {
        assert_eq!(Priority::from_label(" LOW "), Priority::Low);
        assert_eq!(Priority::from_label("High"), Priority::High);
        assert_eq!(serde_json::to_value(Priority::Low).unwrap(), "low");
    }
}
