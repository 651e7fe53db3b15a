mod config;

pub use config::{CalendarConfig, Config, NotionConfig, PropertyNames, TableNames};

use std::path::PathBuf;

/// Environment override for the data directory.
pub const CONFIG_DIR_ENV: &str = "DAYBOOK_CONFIG_DIR";

/// Returns `~/.config/daybook[-dev]/` based on DAYBOOK_ENV, or
/// `$DAYBOOK_CONFIG_DIR` when set.
///
/// Set DAYBOOK_ENV=dev to use development data directory.
///
/// # Errors
/// Returns an error if creating the config directory fails.
pub fn data_dir() -> Result<PathBuf, std::io::Error> {
    let dir = match std::env::var_os(CONFIG_DIR_ENV) {
        Some(dir) if !dir.is_empty() => PathBuf::from(dir),
        _ => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");

            let env = std::env::var("DAYBOOK_ENV").unwrap_or_else(|_| "production".to_string());

            if env == "dev" {
                base_dir.join("daybook-dev")
            } else {
                base_dir.join("daybook")
            }
        }
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}
