use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use tracing::warn;
use uuid::Uuid;

use crate::services::ShortenResult;

/// One remembered shortening result
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    /// Local token, unique per entry (not the provider id)
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    pub original_url: String,
    pub short_url: String,
    #[serde(default)]
    pub custom_slug: Option<String>,
    pub created_at: DateTime<Utc>,
    /// older records call this `rebrandlyId`
    #[serde(default, alias = "rebrandlyId")]
    pub provider_id: String,
}

impl HistoryEntry {
    pub fn from_result(result: &ShortenResult) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            original_url: result.original_url.clone(),
            short_url: result.short_url.clone(),
            custom_slug: result.custom_slug.clone(),
            created_at: result.created_at,
            provider_id: result.id.clone(),
        }
    }
}

// legacy records used a millisecond timestamp as id
fn string_or_number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Number(serde_json::Number),
    }
    Ok(match Raw::deserialize(deserializer)? {
        Raw::Text(s) => s,
        Raw::Number(n) => n.to_string(),
    })
}

/// Tolerant parse of a persisted history list.
///
/// Anything that is not a JSON array yields an empty list; array items that
/// don't match the entry schema are dropped one by one.
pub fn parse_entries(raw: &str) -> Vec<HistoryEntry> {
    let items = match serde_json::from_str::<Value>(raw) {
        Ok(Value::Array(items)) => items,
        Ok(_) => {
            warn!("Persisted history is not a list, starting empty");
            return Vec::new();
        }
        Err(e) => {
            warn!("Persisted history is not valid JSON ({}), starting empty", e);
            return Vec::new();
        }
    };

    let total = items.len();
    let entries: Vec<HistoryEntry> = items
        .into_iter()
        .filter_map(|item| serde_json::from_value(item).ok())
        .collect();

    if entries.len() < total {
        warn!(
            "Dropped {} malformed history entries out of {}",
            total - entries.len(),
            total
        );
    }

    entries
}
