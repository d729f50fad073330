//! Configuration loading.
//!
//! A single YAML file (default `~/.trello-import/config.yaml`) holds
//! the Trello credentials, database path, and user id; environment
//! variables override file values.

use crate::error::ImportError;
use crate::trello::TrelloCredentials;
use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Environment variable naming the config file.
const CONFIG_ENV: &str = "TRELLO_IMPORT_CONFIG";

/// Directory under the home directory holding config and database.
const APP_DIR: &str = ".trello-import";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct TrelloConfig {
    pub api_key: Option<String>,
    pub token: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub trello: TrelloConfig,
    /// Path to the SQLite task database.
    pub database: Option<PathBuf>,
    /// User the imports belong to.
    pub user_id: Option<String>,
}

impl Config {
    /// Default config file location: `$TRELLO_IMPORT_CONFIG` or
    /// `~/.trello-import/config.yaml`.
    pub fn default_path() -> Option<PathBuf> {
        std::env::var(CONFIG_ENV)
            .ok()
            .map(PathBuf::from)
            .or_else(|| dirs::home_dir().map(|home| home.join(APP_DIR).join("config.yaml")))
    }

    /// Load the config file (if present) and apply environment
    /// overrides. A missing file is not an error; everything can come
    /// from the environment.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = path.map(PathBuf::from).or_else(Self::default_path);

        let mut config = match path {
            Some(ref p) if p.exists() => {
                let contents = std::fs::read_to_string(p)
                    .with_context(|| format!("reading config file {}", p.display()))?;
                serde_yaml::from_str(&contents)
                    .with_context(|| format!("parsing config file {}", p.display()))?
            }
            _ => Config::default(),
        };

        config.apply_env_from(|name| std::env::var(name).ok());
        Ok(config)
    }

    /// Apply overrides through a lookup function (injectable for
    /// tests; `load` passes `std::env::var`).
    pub fn apply_env_from(&mut self, get: impl Fn(&str) -> Option<String>) {
        if let Some(key) = get("TRELLO_API_KEY") {
            self.trello.api_key = Some(key);
        }
        if let Some(token) = get("TRELLO_TOKEN") {
            self.trello.token = Some(token);
        }
        if let Some(db) = get("TRELLO_IMPORT_DB") {
            self.database = Some(PathBuf::from(db));
        }
        if let Some(user) = get("TRELLO_IMPORT_USER") {
            self.user_id = Some(user);
        }
    }

    /// Credentials for the Trello client. Absent or empty credentials
    /// are a fatal precondition failure.
    pub fn trello_credentials(&self) -> Result<TrelloCredentials, ImportError> {
        let api_key = self.trello.api_key.clone().filter(|k| !k.is_empty());
        let token = self.trello.token.clone().filter(|t| !t.is_empty());
        match (api_key, token) {
            (Some(api_key), Some(token)) => Ok(TrelloCredentials { api_key, token }),
            _ => Err(ImportError::NotConnected),
        }
    }

    /// Resolved database path: configured value or
    /// `~/.trello-import/tasks.db`, falling back to the working
    /// directory.
    pub fn database_path(&self) -> PathBuf {
        self.database.clone().unwrap_or_else(|| {
            dirs::home_dir()
                .map(|home| home.join(APP_DIR).join("tasks.db"))
                .unwrap_or_else(|| PathBuf::from("tasks.db"))
        })
    }

    /// User id for this run. The CLI is single-user; "local" is the
    /// default owner of everything it writes.
    pub fn user_id(&self) -> String {
        self.user_id.clone().unwrap_or_else(|| "local".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_full_config() {
        let yaml = r#"
trello:
  api_key: key123
  token: tok456
database: /tmp/tasks.db
user_id: alice
"#;
        let config: Config = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.trello.api_key.as_deref(), Some("key123"));
        assert_eq!(config.user_id(), "alice");
        assert_eq!(config.database_path(), PathBuf::from("/tmp/tasks.db"));

        let creds = config.trello_credentials().unwrap();
        assert_eq!(creds.api_key, "key123");
        assert_eq!(creds.token, "tok456");
    }

    #[test]
    fn missing_credentials_is_not_connected() {
        let config = Config::default();
        assert!(matches!(
            config.trello_credentials(),
            Err(ImportError::NotConnected)
        ));

        let config: Config = serde_yaml::from_str("trello:\n  api_key: ''\n  token: ''").unwrap();
        assert!(matches!(
            config.trello_credentials(),
            Err(ImportError::NotConnected)
        ));
    }

    #[test]
    fn env_overrides_file_values() {
        let mut config: Config =
            serde_yaml::from_str("trello:\n  api_key: from-file\n  token: from-file").unwrap();

        config.apply_env_from(|name| match name {
            "TRELLO_API_KEY" => Some("from-env".to_string()),
            "TRELLO_IMPORT_USER" => Some("bob".to_string()),
            _ => None,
        });

        assert_eq!(config.trello.api_key.as_deref(), Some("from-env"));
        assert_eq!(config.trello.token.as_deref(), Some("from-file"));
        assert_eq!(config.user_id(), "bob");
    }
}
