//! Configuration file handling.
//!
//! The configuration file is stored at `$EXPENSE_HOME/config.json` and contains the URL of the
//! transaction service, the signed-in user (if any) and request settings.

use crate::error::{ErrorType, IntoResult, Res};
use crate::{utils, Result};
use anyhow::{bail, Context};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use url::Url;

const APP_NAME: &str = "expense";
const CONFIG_VERSION: u8 = 1;
const CONFIG_JSON: &str = "config.json";
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// The `Config` object represents the configuration of the app. You instantiate it by providing
/// the path to `$EXPENSE_HOME` and from there it loads `$EXPENSE_HOME/config.json`.
#[derive(Debug, Clone)]
pub struct Config {
    root: PathBuf,
    config_path: PathBuf,
    config_file: ConfigFile,
    api_url: Url,
}

impl Config {
    /// Creates the home directory and an initial `config.json` file.
    ///
    /// # Arguments
    /// - `dir` - The directory that will be the root of the home directory, e.g. `$HOME/expense`
    /// - `api_url` - The base URL of the transaction service, e.g. `https://example.com/api`
    /// - `user_id` - The identity provider's id for the signed-in user, if known yet.
    ///
    /// # Errors
    /// - Returns an error if the URL is invalid or if any file operations fail.
    pub async fn create(
        dir: impl Into<PathBuf>,
        api_url: &str,
        user_id: Option<&str>,
    ) -> Result<Self> {
        create(dir.into(), api_url, user_id)
            .await
            .pub_result(ErrorType::Config)
    }

    /// This will
    /// - validate that `home` exists and that the config file exists
    /// - load and validate the config file
    /// - return the loaded configuration object
    pub async fn load(home: impl Into<PathBuf>) -> Result<Self> {
        load(home.into()).await.pub_result(ErrorType::Config)
    }

    /// Writes the current settings back to `config.json`.
    pub async fn save(&self) -> Result<()> {
        self.config_file
            .save(&self.config_path)
            .await
            .pub_result(ErrorType::Config)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    pub fn api_url(&self) -> &Url {
        &self.api_url
    }

    /// The signed-in user stored in the config file.
    pub fn user_id(&self) -> Option<&str> {
        self.config_file.user_id.as_deref()
    }

    /// Stores (or, with `None`, forgets) the signed-in user. Call `save` to persist it.
    pub fn set_user_id(&mut self, user_id: Option<String>) {
        self.config_file.user_id = user_id.filter(|s| !s.trim().is_empty());
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.config_file.request_timeout_secs)
    }
}

async fn create(maybe_relative: PathBuf, api_url: &str, user_id: Option<&str>) -> Res<Config> {
    let api_url = parse_api_url(api_url)?;

    utils::make_dir(&maybe_relative)
        .await
        .context("Unable to create the expense home directory")?;
    let root = utils::canonicalize(&maybe_relative).await?;
    let config_path = root.join(CONFIG_JSON);

    let config_file = ConfigFile {
        api_url: api_url.to_string(),
        user_id: user_id
            .filter(|s| !s.trim().is_empty())
            .map(|s| s.to_string()),
        ..ConfigFile::default()
    };
    config_file.save(&config_path).await?;

    Ok(Config {
        root,
        config_path,
        config_file,
        api_url,
    })
}

async fn load(maybe_relative: PathBuf) -> Res<Config> {
    let root = utils::canonicalize(&maybe_relative)
        .await
        .context("The expense home directory is missing, run 'expense init' first")?;

    let config_path = root.join(CONFIG_JSON);
    if !config_path.is_file() {
        bail!("The config file is missing '{}'", config_path.display())
    }
    let config_file = ConfigFile::load(&config_path).await?;
    let api_url = parse_api_url(&config_file.api_url)
        .with_context(|| format!("Bad api_url in '{}'", config_path.display()))?;

    Ok(Config {
        root,
        config_path,
        config_file,
        api_url,
    })
}

/// Parses the base URL of the transaction service, which must be http or https.
fn parse_api_url(api_url: &str) -> Res<Url> {
    let url = Url::parse(api_url.trim())
        .with_context(|| format!("Invalid API URL '{api_url}'"))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => bail!("The API URL must use http or https, not '{other}'"),
    }
}

/// Represents the serialization and deserialization format of the configuration file.
///
/// Example configuration:
/// ```json
/// {
///   "app_name": "expense",
///   "config_version": 1,
///   "api_url": "https://example.com/api",
///   "user_id": "user_2x7Km9FxQwRbPt82",
///   "request_timeout_secs": 30
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Eq, PartialEq)]
struct ConfigFile {
    /// Application name, should always be "expense"
    app_name: String,

    /// Configuration file version
    config_version: u8,

    /// Base URL of the transaction service
    api_url: String,

    /// The signed-in user, as issued by the identity provider
    #[serde(default, skip_serializing_if = "Option::is_none")]
    user_id: Option<String>,

    /// How long to wait for the transaction service before giving up
    #[serde(default = "default_request_timeout_secs")]
    request_timeout_secs: u64,
}

fn default_request_timeout_secs() -> u64 {
    REQUEST_TIMEOUT_SECS
}

impl Default for ConfigFile {
    fn default() -> Self {
        Self {
            app_name: APP_NAME.to_string(),
            config_version: CONFIG_VERSION,
            api_url: String::new(),
            user_id: None,
            request_timeout_secs: REQUEST_TIMEOUT_SECS,
        }
    }
}

impl ConfigFile {
    /// Loads a ConfigFile from the specified path.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or parsed
    async fn load(path: impl AsRef<Path>) -> Res<Self> {
        let path = path.as_ref();
        let config: ConfigFile = utils::deserialize(path).await?;

        anyhow::ensure!(
            config.app_name == APP_NAME,
            "Invalid app_name in config file: expected '{}', got '{}'",
            APP_NAME,
            config.app_name
        );
        anyhow::ensure!(
            config.request_timeout_secs > 0,
            "Invalid request_timeout_secs in config file: it must be at least 1"
        );

        Ok(config)
    }

    /// Saves the ConfigFile to the specified path.
    async fn save(&self, path: impl AsRef<Path>) -> Res<()> {
        let p = path.as_ref();
        let data = serde_json::to_string_pretty(self).context("Unable to serialize config")?;
        utils::write(p, data)
            .await
            .context("Unable to write config file")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_config_create() {
        let dir = TempDir::new().unwrap();
        let home_dir = dir.path().join("expense_home");

        let config = Config::create(&home_dir, "https://example.com/api", Some("user_1"))
            .await
            .unwrap();

        assert_eq!(config.api_url().as_str(), "https://example.com/api");
        assert_eq!(config.user_id(), Some("user_1"));
        assert_eq!(config.request_timeout(), Duration::from_secs(30));
        assert!(config.config_path().is_file());
    }

    #[tokio::test]
    async fn test_config_create_then_load() {
        let dir = TempDir::new().unwrap();
        let created = Config::create(dir.path(), "http://localhost:5001", None)
            .await
            .unwrap();
        let loaded = Config::load(dir.path()).await.unwrap();
        assert_eq!(created.config_file, loaded.config_file);
        assert_eq!(loaded.user_id(), None);
    }

    #[tokio::test]
    async fn test_config_set_user_and_save() {
        let dir = TempDir::new().unwrap();
        let mut config = Config::create(dir.path(), "http://localhost:5001", None)
            .await
            .unwrap();
        config.set_user_id(Some("user_2".to_string()));
        config.save().await.unwrap();
        assert_eq!(Config::load(dir.path()).await.unwrap().user_id(), Some("user_2"));

        config.set_user_id(None);
        config.save().await.unwrap();
        assert_eq!(Config::load(dir.path()).await.unwrap().user_id(), None);
    }

    #[tokio::test]
    async fn test_config_create_bad_url() {
        let dir = TempDir::new().unwrap();
        let result = Config::create(dir.path(), "not a url", None).await;
        let err = result.unwrap_err();
        assert_eq!(err.error_type(), ErrorType::Config);

        let result = Config::create(dir.path(), "ftp://example.com", None).await;
        assert!(result.unwrap_err().to_string().contains("http or https"));
    }

    #[tokio::test]
    async fn test_config_load_missing_home() {
        let dir = TempDir::new().unwrap();
        let result = Config::load(dir.path().join("nope")).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_config_file_load_with_minimal_config() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.json");

        let json = r#"{
            "app_name": "expense",
            "config_version": 1,
            "api_url": "https://example.com"
        }"#;
        utils::write(&config_path, json).await.unwrap();

        let config = ConfigFile::load(&config_path).await.unwrap();
        assert_eq!(config.api_url, "https://example.com");
        assert_eq!(config.user_id, None);
        assert_eq!(config.request_timeout_secs, REQUEST_TIMEOUT_SECS);
    }

    #[tokio::test]
    async fn test_config_file_load_invalid_app_name() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.json");

        let json = r#"{
            "app_name": "wrong_app",
            "config_version": 1,
            "api_url": "https://example.com"
        }"#;
        utils::write(&config_path, json).await.unwrap();

        let result = ConfigFile::load(&config_path).await;
        assert!(result.unwrap_err().to_string().contains("Invalid app_name"));
    }

    #[tokio::test]
    async fn test_config_file_load_zero_timeout() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.json");

        let json = r#"{
            "app_name": "expense",
            "config_version": 1,
            "api_url": "https://example.com",
            "request_timeout_secs": 0
        }"#;
        utils::write(&config_path, json).await.unwrap();

        let result = ConfigFile::load(&config_path).await;
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("request_timeout_secs"));

        let err = Config::load(temp_dir.path()).await.unwrap_err();
        assert_eq!(err.error_type(), ErrorType::Config);
    }

    #[test]
    fn test_config_file_serialization_omits_none_fields() {
        let config = ConfigFile::default();
        let json = serde_json::to_string(&config).unwrap();
        assert!(!json.contains("user_id"));
    }
}
