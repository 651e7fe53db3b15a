//! Database name -> id catalog, fetched once per client.

use std::collections::BTreeMap;

use serde::Deserialize;

use crate::error::NotionError;

/// One entry of the `search` response when filtered to databases.
#[derive(Debug, Deserialize)]
pub(crate) struct DatabaseSummary {
    pub id: String,
    #[serde(default)]
    pub title: Vec<RichText>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RichText {
    #[serde(default)]
    pub plain_text: String,
}

impl DatabaseSummary {
    fn plain_title(&self) -> String {
        self.title.iter().map(|t| t.plain_text.as_str()).collect()
    }
}

/// Databases visible to the credential, keyed by display name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableCatalog {
    tables: BTreeMap<String, String>,
}

impl TableCatalog {
    /// Later entries win when two databases share a name.
    pub(crate) fn from_summaries(summaries: impl IntoIterator<Item = DatabaseSummary>) -> Self {
        let mut tables = BTreeMap::new();
        for db in summaries {
            tables.insert(db.plain_title(), db.id);
        }
        Self { tables }
    }

    /// Remote id for `name`.
    pub fn resolve(&self, name: &str) -> Result<&str, NotionError> {
        self.tables
            .get(name)
            .map(String::as_str)
            .ok_or_else(|| NotionError::UnknownTable {
                name: name.to_string(),
            })
    }

    pub fn contains(&self, name: &str) -> bool {
        self.tables.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    /// `(name, id)` pairs ordered by name.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.tables.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl FromIterator<(String, String)> for TableCatalog {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self {
            tables: iter.into_iter().collect(),
        }
    }
}
