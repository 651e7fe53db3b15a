pub mod catalog;
pub mod client;
pub mod filter;
pub mod page;
pub mod property;

pub use catalog::TableCatalog;
pub use client::{ClientConfig, DatabaseClient, NOTION_VERSION};
pub use filter::{and, filter, or, Condition, FilterExpression, FilterType, PropertyFilter};
pub use page::Page;
pub use property::{Properties, PropertyValue};

/// Thin wrapper around the OS keyring for credential storage.
pub mod keyring_store {
    use crate::error::ConfigError;

    const SERVICE: &str = "daybook";

    pub fn get(key: &str) -> Result<Option<String>, ConfigError> {
        let entry = keyring::Entry::new(SERVICE, key)?;
        match entry.get_password() {
            Ok(pw) => Ok(Some(pw)),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    pub fn set(key: &str, value: &str) -> Result<(), ConfigError> {
        let entry = keyring::Entry::new(SERVICE, key)?;
        entry.set_password(value)?;
        Ok(())
    }

    pub fn delete(key: &str) -> Result<(), ConfigError> {
        let entry = keyring::Entry::new(SERVICE, key)?;
        match entry.delete_credential() {
            Ok(()) => Ok(()),
            Err(keyring::Error::NoEntry) => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// Keyring key holding the integration secret.
pub const SECRET_KEY: &str = "notion_secret";

/// Environment override for the secret, checked before the keyring.
pub const SECRET_ENV: &str = "DAYBOOK_NOTION_SECRET";

/// Resolve the integration secret from `DAYBOOK_NOTION_SECRET` or the keyring.
///
/// # Errors
///
/// `MissingKey` when neither source holds a non-empty secret.
pub fn load_secret() -> Result<String, crate::error::ConfigError> {
    if let Ok(secret) = std::env::var(SECRET_ENV) {
        if !secret.trim().is_empty() {
            return Ok(secret);
        }
    }
    match keyring_store::get(SECRET_KEY)? {
        Some(secret) if !secret.is_empty() => Ok(secret),
        _ => Err(crate::error::ConfigError::MissingKey(SECRET_KEY.to_string())),
    }
}
