use crate::config::ConfigError;
use std::path::PathBuf;

pub const GLOBAL_STATE_DIR: &str = ".loopwright";
pub const GLOBAL_SETTINGS_FILE_NAME: &str = "config.yaml";
pub const EVENT_LOG_FILE_NAME: &str = "logs/loopwright.log";

fn state_root() -> Result<PathBuf, ConfigError> {
    let home = std::env::var_os("HOME")
        .filter(|home| !home.is_empty())
        .ok_or(ConfigError::HomeDirectoryUnavailable)?;
    Ok(PathBuf::from(home).join(GLOBAL_STATE_DIR))
}

pub fn default_config_path() -> Result<PathBuf, ConfigError> {
    Ok(state_root()?.join(GLOBAL_SETTINGS_FILE_NAME))
}

pub fn default_log_path() -> Result<PathBuf, ConfigError> {
    Ok(state_root()?.join(EVENT_LOG_FILE_NAME))
}
