use clap::Subcommand;
use daybook_core::notion::{keyring_store, load_secret, DatabaseClient, SECRET_KEY};
use daybook_core::{Config, ConfigError};

use super::CommandResult;

#[derive(Subcommand)]
pub enum AuthAction {
    /// Verify an integration secret and store it in the keyring
    Login {
        /// Internal integration secret
        #[arg(long)]
        token: String,
    },
    /// Remove the stored secret
    Logout,
    /// Check whether a secret is available
    Status,
}

pub async fn run(action: AuthAction) -> CommandResult {
    match action {
        AuthAction::Login { token } => {
            let config = Config::load()?;
            let client = DatabaseClient::connect(config.client_config(token.as_str())?).await?;
            keyring_store::set(SECRET_KEY, &token)?;
            println!(
                "Notion authenticated ({} databases shared)",
                client.catalog().len()
            );
        }
        AuthAction::Logout => {
            keyring_store::delete(SECRET_KEY)?;
            println!("Notion disconnected");
        }
        AuthAction::Status => match load_secret() {
            Ok(_) => println!("authenticated"),
            Err(ConfigError::MissingKey(_)) => println!("not authenticated"),
            Err(e) => return Err(e.into()),
        },
    }
    Ok(())
}
