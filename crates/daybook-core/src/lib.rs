//! # Daybook Core Library
//!
//! Keeps a set of Notion databases in a calendar shape: one record per Day,
//! Week and Month, Days related to their Week and Month, and link records
//! related to the Day they were created on. The CLI binary is a thin layer
//! over this crate and is meant to be run by a scheduler.
//!
//! ## Architecture
//!
//! - **Notion**: a small database client. Tables are addressed by display
//!   name through a catalog fetched once at connect time; property values
//!   and query filters are closed enums serialized into the API's wire shapes
//! - **Calendar**: Monday-based week labelling and the check-then-create
//!   sync built on the client
//! - **Storage**: TOML configuration; the secret lives in the OS keyring
//!
//! ## Key Components
//!
//! - [`DatabaseClient`]: query/get/create/update by table name
//! - [`PropertyValue`]: page property encoder
//! - [`FilterExpression`]: query filter builder
//! - [`CalendarSync`]: Day/Week/Month upkeep and link backfill
//! - [`Config`]: Application configuration management

pub mod calendar;
pub mod error;
pub mod notion;
pub mod storage;

pub use calendar::{CalendarSync, CalendarTable, Week};
pub use error::{ConfigError, CoreError, FilterError, NotionError, SyncError};
pub use notion::{
    ClientConfig, Condition, DatabaseClient, FilterExpression, FilterType, Page, Properties,
    PropertyValue, TableCatalog,
};
pub use storage::Config;
