//! Page property values in the shape the Notion API expects.
//!
//! See <https://developers.notion.com/reference/page#page-property-value>.
//! Values are not validated locally; a malformed value surfaces as an
//! error response when the request is sent.

use std::collections::BTreeMap;

use chrono::{DateTime, FixedOffset, NaiveDate, TimeZone};
use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;
use serde_json::json;

const DATE_FORMAT: &str = "%Y-%m-%d";
const DATETIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3f%:z";

/// Property name -> value, sent as the `properties` object of a page.
pub type Properties = BTreeMap<String, PropertyValue>;

/// A single page property value.
#[derive(Debug, Clone, PartialEq)]
pub enum PropertyValue {
    Title(String),
    Text(String),
    Date {
        start: NaiveDate,
        end: Option<NaiveDate>,
    },
    DateTime {
        start: DateTime<FixedOffset>,
        end: Option<DateTime<FixedOffset>>,
    },
    Checkbox(bool),
    Url(String),
    Email(String),
    Relation(Vec<String>),
}

impl PropertyValue {
    pub fn title(content: impl Into<String>) -> Self {
        Self::Title(content.into())
    }

    pub fn text(content: impl Into<String>) -> Self {
        Self::Text(content.into())
    }

    /// Calendar date, optionally a range.
    pub fn date(start: NaiveDate, end: Option<NaiveDate>) -> Self {
        Self::Date { start, end }
    }

    /// Timestamp with offset, optionally a range. Any `TimeZone` is accepted
    /// and kept with its offset at that instant.
    pub fn datetime<Tz: TimeZone>(start: DateTime<Tz>, end: Option<DateTime<Tz>>) -> Self {
        Self::DateTime {
            start: start.fixed_offset(),
            end: end.map(|e| e.fixed_offset()),
        }
    }

    pub fn checkbox(value: bool) -> Self {
        Self::Checkbox(value)
    }

    pub fn url(address: impl Into<String>) -> Self {
        Self::Url(address.into())
    }

    pub fn email(address: impl Into<String>) -> Self {
        Self::Email(address.into())
    }

    /// Relation to the given page ids, in order. No ids clears the relation.
    pub fn relation<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Relation(ids.into_iter().map(Into::into).collect())
    }

    /// Wire key of this variant.
    pub fn kind(&self) -> &'static str {
        match self {
            PropertyValue::Title(_) => "title",
            PropertyValue::Text(_) => "rich_text",
            PropertyValue::Date { .. } | PropertyValue::DateTime { .. } => "date",
            PropertyValue::Checkbox(_) => "checkbox",
            PropertyValue::Url(_) => "url",
            PropertyValue::Email(_) => "email",
            PropertyValue::Relation(_) => "relation",
        }
    }

    fn wire_value(&self) -> serde_json::Value {
        match self {
            PropertyValue::Title(content) | PropertyValue::Text(content) => {
                json!([{ "text": { "content": content } }])
            }
            PropertyValue::Date { start, end } => date_object(
                start.format(DATE_FORMAT).to_string(),
                end.map(|e| e.format(DATE_FORMAT).to_string()),
            ),
            PropertyValue::DateTime { start, end } => date_object(
                start.format(DATETIME_FORMAT).to_string(),
                end.map(|e| e.format(DATETIME_FORMAT).to_string()),
            ),
            PropertyValue::Checkbox(value) => json!(value),
            PropertyValue::Url(address) | PropertyValue::Email(address) => json!(address),
            PropertyValue::Relation(ids) => serde_json::Value::Array(
                ids.iter().map(|id| json!({ "id": id })).collect(),
            ),
        }
    }
}

fn date_object(start: String, end: Option<String>) -> serde_json::Value {
    let mut obj = serde_json::Map::new();
    obj.insert("start".into(), start.into());
    if let Some(end) = end {
        obj.insert("end".into(), end.into());
    }
    serde_json::Value::Object(obj)
}

impl Serialize for PropertyValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1))?;
        map.serialize_entry(self.kind(), &self.wire_value())?;
        map.end()
    }
}
