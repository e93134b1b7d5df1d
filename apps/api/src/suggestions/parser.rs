//! Turns the provider's raw text into suggestion items.
//!
//! Unparseable output never becomes an error: it is replaced by a single
//! low-priority item describing the failure, so every generation persists
//! something.

use serde_json::Value;
use tracing::warn;

use crate::models::suggestion::{Priority, SuggestionItem};

pub const FALLBACK_EXPLANATION: &str = "AI response was not in expected JSON format";

const MIN_SCORE: i32 = 50;
const MAX_SCORE: i32 = 100;
const PENALTY_PER_ITEM: i32 = 10;

/// Result of interpreting a provider response.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedSuggestions {
    pub items: Vec<SuggestionItem>,
    /// True when the fallback item was substituted.
    pub fell_back: bool,
}

/// Removes every ```json / ``` marker and surrounding whitespace.
pub fn strip_json_fences(text: &str) -> String {
    text.replace("```json", "").replace("```", "").trim().to_string()
}

/// Parses the cleaned response. A lone object is wrapped into a one-element
/// list; anything that is not JSON, or an array holding non-objects, falls back.
pub fn parse_suggestions(raw: &str) -> ParsedSuggestions {
    let cleaned = strip_json_fences(raw);

    let value: Value = match serde_json::from_str(&cleaned) {
        Ok(v) => v,
        Err(e) => {
            warn!("Failed to parse AI response as JSON ({e}): {raw}");
            return fallback();
        }
    };

    let elements = match value {
        Value::Array(elements) => elements,
        other => vec![other],
    };

    let items: Result<Vec<SuggestionItem>, _> = elements
        .into_iter()
        .map(|element| {
            if element.is_object() {
                serde_json::from_value::<SuggestionItem>(element)
            } else {
                Err(serde::de::Error::custom("suggestion entry is not an object"))
            }
        })
        .collect();

    match items {
        Ok(items) => ParsedSuggestions {
            items,
            fell_back: false,
        },
        Err(e) => {
            warn!("AI response JSON had an unexpected shape ({e}): {raw}");
            fallback()
        }
    }
}

fn fallback() -> ParsedSuggestions {
    ParsedSuggestions {
        items: vec![SuggestionItem {
            kind: "keyword".to_string(),
            original_text: "Unable to parse suggestions".to_string(),
            suggested_text: "Please try again - response format issue".to_string(),
            explanation: FALLBACK_EXPLANATION.to_string(),
            priority: Priority::Low,
            applied: false,
        }],
        fell_back: true,
    }
}

/// `max(50, 100 - 10 * count)`: a count heuristic, not a quality measure.
pub fn overall_score(item_count: usize) -> i32 {
    let count = i32::try_from(item_count).unwrap_or(i32::MAX);
    MAX_SCORE
        .saturating_sub(count.saturating_mul(PENALTY_PER_ITEM))
        .max(MIN_SCORE)
}
