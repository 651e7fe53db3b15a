pub mod auth;
pub mod config;
pub mod get;
pub mod query;
pub mod sync;
pub mod tables;

use daybook_core::error::Result;
use daybook_core::notion::{load_secret, DatabaseClient};
use daybook_core::Config;

pub type CommandResult = Result<()>;

/// Load the config and secret, then connect to Notion.
pub async fn connect() -> Result<(Config, DatabaseClient)> {
    let config = Config::load()?;
    let secret = load_secret()?;
    let client = DatabaseClient::connect(config.client_config(secret)?).await?;
    tracing::debug!(tables = client.catalog().len(), "connected");
    Ok((config, client))
}
