mod config;

pub use config::{CalendarConfig, Config, DefaultsConfig, FormConfig, OfflineConfig};

use std::path::PathBuf;

/// Returns `~/.config/cde-prep[-dev]/` based on CDE_PREP_ENV.
///
/// Set CDE_PREP_ENV=dev to use development data directory.
///
/// # Errors
/// Returns an error if creating the config directory fails.
pub fn data_dir() -> Result<PathBuf, std::io::Error> {
    let base_dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config");

    let env = std::env::var("CDE_PREP_ENV").unwrap_or_else(|_| "production".to_string());

    let dir = if env == "dev" {
        base_dir.join("cde-prep-dev")
    } else {
        base_dir.join("cde-prep")
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}
