//! Core error types for daybook-core.
//!
//! Each layer owns a `thiserror` enum; [`CoreError`] wraps them for callers
//! that drive several layers at once (the CLI).

use std::path::PathBuf;
use thiserror::Error;

use crate::notion::filter::{Condition, FilterType};

/// Core error type for daybook-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Notion API errors
    #[error("Notion error: {0}")]
    Notion(#[from] NotionError),

    /// Filter construction errors
    #[error("Filter error: {0}")]
    Filter(#[from] FilterError),

    /// Calendar sync errors
    #[error("Sync error: {0}")]
    Sync(#[from] SyncError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors raised while talking to the Notion API.
#[derive(Error, Debug)]
pub enum NotionError {
    /// Transport-level failure (DNS, TLS, timeout, connection reset)
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Response body could not be decoded
    #[error("Failed to decode response: {0}")]
    Json(#[from] serde_json::Error),

    /// Base URL could not be joined with an endpoint path
    #[error("Invalid API URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Credential rejected by the service
    #[error("Notion rejected the credential (HTTP {status}): {body}")]
    Unauthorized { status: u16, body: String },

    /// Table name is not part of the catalog fetched at connect time
    #[error("Unknown table '{name}'; it is not shared with this integration")]
    UnknownTable { name: String },

    /// Listing databases failed
    #[error("Error listing databases (HTTP {status}): {body}")]
    ListFailed { status: u16, body: String },

    /// Database query failed
    #[error("Error querying {table} (HTTP {status}): {body}")]
    QueryFailed {
        table: String,
        status: u16,
        body: String,
    },

    /// Page creation failed
    #[error("Error creating {table} (HTTP {status}): {body}")]
    CreateFailed {
        table: String,
        status: u16,
        body: String,
    },

    /// Page update failed
    #[error("Error updating page {page_id} (HTTP {status}): {body}")]
    UpdateFailed {
        page_id: String,
        status: u16,
        body: String,
    },
}

/// Filter construction errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FilterError {
    /// Condition is not defined for the property type
    #[error("Condition '{condition}' is not supported for {filter_type} properties")]
    UnsupportedCondition {
        filter_type: FilterType,
        condition: Condition,
    },

    /// Unknown property type name
    #[error("Unknown filter type: {0}")]
    UnknownType(String),

    /// Unknown condition name
    #[error("Unknown filter condition: {0}")]
    UnknownCondition(String),
}

/// A link record whose Day could not be found during backfill.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnmatchedLink {
    pub link_id: String,
    pub day: String,
}

/// Calendar sync errors.
#[derive(Error, Debug)]
pub enum SyncError {
    #[error(transparent)]
    Notion(#[from] NotionError),

    #[error(transparent)]
    Filter(#[from] FilterError),

    /// Some links had no matching Day record and were left untouched
    #[error("{} link(s) have no matching Day record ({updated} updated): {}", .missing.len(), describe_unmatched(.missing))]
    MissingDays {
        missing: Vec<UnmatchedLink>,
        updated: usize,
    },
}

fn describe_unmatched(missing: &[UnmatchedLink]) -> String {
    missing
        .iter()
        .map(|m| format!("{} -> '{}'", m.link_id, m.day))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Unknown configuration key
    #[error("Unknown configuration key: {0}")]
    UnknownKey(String),

    /// Missing required configuration key
    #[error("Missing required configuration key: {0}")]
    MissingKey(String),

    /// Time zone name is not in the IANA database
    #[error("Unknown time zone: {0}")]
    UnknownTimeZone(String),

    /// OS keyring access failed
    #[error("Keyring error: {0}")]
    Keyring(#[from] keyring::Error),

    /// Data directory could not be determined or created
    #[error("Data directory unavailable: {0}")]
    DataDir(#[from] std::io::Error),
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
