//! Database query filters.
//!
//! See <https://developers.notion.com/reference/post-database-query#post-database-query-filter>.
//! Expressions are never evaluated locally; they are serialized verbatim
//! into the query body.

use std::fmt;
use std::str::FromStr;

use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;

use crate::error::FilterError;

/// Property type a filter condition applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FilterType {
    Text,
    Number,
    Checkbox,
    Select,
    MultiSelect,
    Date,
    Relation,
}

impl FilterType {
    pub const ALL: [FilterType; 7] = [
        FilterType::Text,
        FilterType::Number,
        FilterType::Checkbox,
        FilterType::Select,
        FilterType::MultiSelect,
        FilterType::Date,
        FilterType::Relation,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FilterType::Text => "text",
            FilterType::Number => "number",
            FilterType::Checkbox => "checkbox",
            FilterType::Select => "select",
            FilterType::MultiSelect => "multi_select",
            FilterType::Date => "date",
            FilterType::Relation => "relation",
        }
    }
}

impl fmt::Display for FilterType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FilterType {
    type Err = FilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FilterType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| FilterError::UnknownType(s.to_string()))
    }
}

/// Comparison applied to a property.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Condition {
    Equals,
    DoesNotEqual,
    Contains,
    DoesNotContain,
    StartsWith,
    EndsWith,
    IsEmpty,
    IsNotEmpty,
}

impl Condition {
    pub const ALL: [Condition; 8] = [
        Condition::Equals,
        Condition::DoesNotEqual,
        Condition::Contains,
        Condition::DoesNotContain,
        Condition::StartsWith,
        Condition::EndsWith,
        Condition::IsEmpty,
        Condition::IsNotEmpty,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Condition::Equals => "equals",
            Condition::DoesNotEqual => "does_not_equal",
            Condition::Contains => "contains",
            Condition::DoesNotContain => "does_not_contain",
            Condition::StartsWith => "starts_with",
            Condition::EndsWith => "ends_with",
            Condition::IsEmpty => "is_empty",
            Condition::IsNotEmpty => "is_not_empty",
        }
    }

    /// Whether the service accepts this condition for `filter_type`.
    pub fn supports(&self, filter_type: FilterType) -> bool {
        use FilterType::*;
        match self {
            Condition::IsEmpty | Condition::IsNotEmpty => true,
            Condition::StartsWith | Condition::EndsWith => filter_type == Text,
            Condition::Contains | Condition::DoesNotContain => {
                matches!(filter_type, Text | MultiSelect | Relation)
            }
            Condition::Equals => matches!(filter_type, Text | Number | Checkbox | Select | Date),
            Condition::DoesNotEqual => matches!(filter_type, Text | Number | Checkbox | Select),
        }
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Condition {
    type Err = FilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Condition::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| FilterError::UnknownCondition(s.to_string()))
    }
}

/// A single-property comparison. Only built through [`filter`], so the
/// condition is always one the property type supports.
#[derive(Debug, Clone, PartialEq)]
pub struct PropertyFilter {
    property: String,
    filter_type: FilterType,
    condition: Condition,
    value: serde_json::Value,
}

impl PropertyFilter {
    pub fn property(&self) -> &str {
        &self.property
    }

    pub fn filter_type(&self) -> FilterType {
        self.filter_type
    }

    pub fn condition(&self) -> Condition {
        self.condition
    }

    pub fn value(&self) -> &serde_json::Value {
        &self.value
    }
}

/// A filter tree: single-property leaves combined with `and`/`or`.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterExpression {
    Property(PropertyFilter),
    And(Vec<FilterExpression>),
    Or(Vec<FilterExpression>),
}

/// Build a single-property filter, rejecting conditions the property type
/// does not support.
pub fn filter(
    property: impl Into<String>,
    filter_type: FilterType,
    condition: Condition,
    value: impl Into<serde_json::Value>,
) -> Result<FilterExpression, FilterError> {
    if !condition.supports(filter_type) {
        return Err(FilterError::UnsupportedCondition {
            filter_type,
            condition,
        });
    }
    Ok(FilterExpression::Property(PropertyFilter {
        property: property.into(),
        filter_type,
        condition,
        value: value.into(),
    }))
}

/// `property` (a text or title property) equals `title`.
pub(crate) fn title_equals(property: impl Into<String>, title: &str) -> FilterExpression {
    FilterExpression::Property(PropertyFilter {
        property: property.into(),
        filter_type: FilterType::Text,
        condition: Condition::Equals,
        value: title.into(),
    })
}

/// Match records satisfying every expression.
pub fn and(expressions: impl IntoIterator<Item = FilterExpression>) -> FilterExpression {
    FilterExpression::And(expressions.into_iter().collect())
}

/// Match records satisfying any expression.
pub fn or(expressions: impl IntoIterator<Item = FilterExpression>) -> FilterExpression {
    FilterExpression::Or(expressions.into_iter().collect())
}

impl Serialize for FilterExpression {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            FilterExpression::Property(leaf) => {
                let mut inner = serde_json::Map::new();
                inner.insert(leaf.condition.as_str().to_string(), leaf.value.clone());

                let mut map = serializer.serialize_map(Some(2))?;
                map.serialize_entry("property", &leaf.property)?;
                map.serialize_entry(leaf.filter_type.as_str(), &inner)?;
                map.end()
            }
            FilterExpression::And(children) => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry("and", children)?;
                map.end()
            }
            FilterExpression::Or(children) => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry("or", children)?;
                map.end()
            }
        }
    }
}
