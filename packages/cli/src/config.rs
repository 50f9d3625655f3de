use mailcraft_editor::DEFAULT_MAX_LEVELS;
use mailcraft_workspace::WorkspaceOptions;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub const DEFAULT_CONFIG_NAME: &str = "mailcraft.config.json";

/// Mailcraft configuration file format
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Directory holding one JSON file per document
    #[serde(default = "default_store_dir")]
    pub store_dir: String,

    /// Undo levels kept per open document (0 = unlimited)
    #[serde(default = "default_history_limit")]
    pub history_limit: usize,

    /// Save as soon as an edit asks for it (renaming the email)
    #[serde(default = "default_auto_save")]
    pub auto_save: bool,

    /// Default log filter; `RUST_LOG` takes precedence
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_store_dir() -> String {
    ".mailcraft/documents".to_string()
}

fn default_history_limit() -> usize {
    DEFAULT_MAX_LEVELS
}

fn default_auto_save() -> bool {
    true
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Config {
    /// Load config from a directory
    pub fn load(cwd: &str) -> anyhow::Result<Self> {
        let config_path = PathBuf::from(cwd).join(DEFAULT_CONFIG_NAME);

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let config: Config = serde_json::from_str(&content)?;
            Ok(config)
        } else {
            // Return default config if none exists
            Ok(Config::default())
        }
    }

    /// Get absolute path to the document store
    pub fn get_store_dir(&self, cwd: &str) -> PathBuf {
        PathBuf::from(cwd).join(&self.store_dir)
    }

    pub fn workspace_options(&self) -> WorkspaceOptions {
        WorkspaceOptions {
            auto_save: self.auto_save,
            history_limit: self.history_limit,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            store_dir: default_store_dir(),
            history_limit: default_history_limit(),
            auto_save: default_auto_save(),
            log_level: default_log_level(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_config() {
        let json = r#"{
            "storeDir": "emails",
            "historyLimit": 20,
            "autoSave": false,
            "logLevel": "debug"
        }"#;

        let config: Config = serde_json::from_str(json).unwrap();
        assert_eq!(config.store_dir, "emails");
        assert_eq!(config.history_limit, 20);
        assert!(!config.auto_save);
        assert_eq!(config.log_level, "debug");
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: Config = serde_json::from_str(r#"{ "autoSave": false }"#).unwrap();
        assert_eq!(config.store_dir, ".mailcraft/documents");
        assert_eq!(config.history_limit, 100);
        assert_eq!(config.log_level, "info");
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.auto_save);
        assert_eq!(config.workspace_options(), WorkspaceOptions::default());
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let cwd = dir.path().display().to_string();

        let config = Config::load(&cwd).unwrap();

        assert_eq!(config, Config::default());
        assert_eq!(
            config.get_store_dir(&cwd),
            dir.path().join(".mailcraft/documents")
        );
    }

    #[test]
    fn test_load_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(DEFAULT_CONFIG_NAME),
            r#"{ "storeDir": "drafts" }"#,
        )
        .unwrap();

        let config = Config::load(&dir.path().display().to_string()).unwrap();
        assert_eq!(config.store_dir, "drafts");
    }
}
