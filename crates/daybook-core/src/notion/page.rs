//! Pages (database records) as returned by the API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A database record. Only the fields the sync needs are typed; the
/// property map is kept as raw JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page {
    pub id: String,
    pub created_time: DateTime<Utc>,
    #[serde(default)]
    pub last_edited_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub archived: bool,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub properties: serde_json::Map<String, serde_json::Value>,
}

impl Page {
    /// Plain text of the title property, whatever it is named.
    pub fn title(&self) -> Option<String> {
        self.properties.values().find_map(|prop| {
            let parts = prop.get("title")?.as_array()?;
            Some(
                parts
                    .iter()
                    .filter_map(|part| {
                        part.get("plain_text")
                            .or_else(|| part.pointer("/text/content"))
                            .and_then(|t| t.as_str())
                    })
                    .collect::<String>(),
            )
        })
    }

    /// Ids held by the relation property `name`, empty if absent.
    pub fn relation_ids(&self, name: &str) -> Vec<String> {
        self.properties
            .get(name)
            .and_then(|prop| prop.get("relation"))
            .and_then(|rel| rel.as_array())
            .map(|items| {
                items
                    .iter()
                    .filter_map(|item| item.get("id").and_then(|id| id.as_str()))
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default()
    }
}

/// Envelope of list endpoints (`search`, `databases/{id}/query`).
#[derive(Debug, Deserialize)]
pub(crate) struct ListResponse<T> {
    #[serde(default = "Vec::new")]
    pub results: Vec<T>,
}
