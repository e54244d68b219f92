pub mod error;
pub mod paths;
pub mod settings;

pub use error::ConfigError;
pub use paths::{default_config_path, default_log_path};
pub use settings::Settings;

use std::path::Path;

/// Loads the global settings, falling back to defaults when no file exists yet.
pub fn load_settings() -> Result<Settings, ConfigError> {
    let path = default_config_path()?;
    load_settings_from(&path)
}

pub fn load_settings_from(path: &Path) -> Result<Settings, ConfigError> {
    if !path.exists() {
        return Ok(Settings::default());
    }
    let settings = Settings::from_path(path)?;
    settings.validate()?;
    Ok(settings)
}
