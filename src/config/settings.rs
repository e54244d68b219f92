use crate::config::ConfigError;
use crate::project::RecentProject;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_EDITOR: &str = "vi";
pub const DEFAULT_TEXT_MAX_LEN: usize = 256;
const DEFAULT_MODELS: [&str; 3] = ["sonnet", "opus", "haiku"];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub editor: Option<String>,
    pub loop_command: Option<String>,
    pub models: Vec<String>,
    pub text_max_len: usize,
    pub log_path: Option<PathBuf>,
    pub recent_projects: Vec<RecentProject>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            editor: None,
            loop_command: None,
            models: DEFAULT_MODELS.iter().map(|model| model.to_string()).collect(),
            text_max_len: DEFAULT_TEXT_MAX_LEN,
            log_path: None,
            recent_projects: Vec::new(),
        }
    }
}

impl Settings {
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        serde_yaml::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.text_max_len == 0 {
            return Err(ConfigError::Settings(
                "`text_max_len` must be greater than zero".to_string(),
            ));
        }
        if self.models.iter().any(|model| model.trim().is_empty()) {
            return Err(ConfigError::Settings(
                "`models` entries must be non-empty".to_string(),
            ));
        }
        if let Some(editor) = &self.editor {
            if editor.trim().is_empty() {
                return Err(ConfigError::Settings(
                    "`editor` must be non-empty when set".to_string(),
                ));
            }
        }
        if let Some(command) = &self.loop_command {
            if command.trim().is_empty() {
                return Err(ConfigError::Settings(
                    "`loop_command` must be non-empty when set".to_string(),
                ));
            }
        }
        if let Some(path) = &self.log_path {
            if !path.is_absolute() {
                return Err(ConfigError::Settings(
                    "`log_path` must be an absolute path".to_string(),
                ));
            }
        }
        Ok(())
    }

    /// Configured editor, then `$VISUAL`, then `$EDITOR`, then `vi`.
    pub fn editor_command(&self) -> String {
        self.editor_command_from(
            std::env::var("VISUAL").ok(),
            std::env::var("EDITOR").ok(),
        )
    }

    fn editor_command_from(&self, visual: Option<String>, editor: Option<String>) -> String {
        [self.editor.clone(), visual, editor]
            .into_iter()
            .flatten()
            .find(|value| !value.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_EDITOR.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_yaml_fills_defaults() {
        let settings: Settings =
            serde_yaml::from_str("editor: nano\nmodels: [gpt-5, sonnet]\n").expect("parse");
        assert_eq!(settings.editor.as_deref(), Some("nano"));
        assert_eq!(settings.models, vec!["gpt-5".to_string(), "sonnet".to_string()]);
        assert_eq!(settings.text_max_len, DEFAULT_TEXT_MAX_LEN);
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn validate_rejects_bad_values() {
        let settings = Settings {
            text_max_len: 0,
            ..Settings::default()
        };
        assert!(settings.validate().is_err());

        let settings = Settings {
            log_path: Some(PathBuf::from("relative/log")),
            ..Settings::default()
        };
        let err = settings.validate().expect_err("relative log path");
        assert!(err.to_string().contains("log_path"));
    }

    #[test]
    fn editor_command_falls_back_in_order() {
        let settings = Settings::default();
        assert_eq!(settings.editor_command_from(None, None), "vi");
        assert_eq!(
            settings.editor_command_from(Some(" ".to_string()), Some("nano".to_string())),
            "nano"
        );
        assert_eq!(
            settings.editor_command_from(Some("code --wait".to_string()), Some("nano".to_string())),
            "code --wait"
        );
        let configured = Settings {
            editor: Some("hx".to_string()),
            ..Settings::default()
        };
        assert_eq!(
            configured.editor_command_from(Some("code".to_string()), None),
            "hx"
        );
    }
}
