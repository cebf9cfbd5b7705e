//! Configuration system for lexis.

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::{LexisError, LexisResult};
use crate::scheduler::IntervalScheduler;
use crate::traits::StorageBackend;

/// Default remote path of the vocabulary document.
pub const DEFAULT_REMOTE_PATH: &str = "data/vocabulary.json";
/// Default REST endpoint of the remote store.
pub const DEFAULT_API_BASE: &str = "https://api.github.com";
/// Default commit message for remote writes.
pub const DEFAULT_COMMIT_MESSAGE: &str = "Update vocabulary list";

fn lexis_dir() -> PathBuf {
    dirs::home_dir()
        .map(|h| h.join(".lexis"))
        .unwrap_or_else(|| PathBuf::from(".lexis"))
}

/// Local storage configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Backend type.
    pub backend: StorageBackend,
    /// Database file (sqlite) or directory (json_file). Ignored for memory.
    pub path: PathBuf,
}

impl StorageConfig {
    /// In-memory storage.
    pub fn memory() -> Self {
        Self {
            backend: StorageBackend::Memory,
            path: PathBuf::new(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::Sqlite,
            path: lexis_dir().join("vocabulary.db"),
        }
    }
}

/// Remote sync configuration.
///
/// The token is never serialized back out and is redacted in `Debug`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    /// Master switch. When false every sync operation is a no-op.
    pub enable_sync: bool,
    /// Access token for the remote store.
    #[serde(skip_serializing)]
    pub token: Option<SecretString>,
    /// Repository owner.
    pub owner: String,
    /// Repository name.
    pub repo: String,
    /// Path of the document inside the repository.
    pub path: String,
    /// REST endpoint base.
    pub api_base: String,
    /// Commit message used for writes.
    pub commit_message: String,
    /// Upper bound for a single remote request, in seconds.
    pub timeout_secs: u64,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            enable_sync: false,
            token: None,
            owner: String::new(),
            repo: String::new(),
            path: DEFAULT_REMOTE_PATH.to_string(),
            api_base: DEFAULT_API_BASE.to_string(),
            commit_message: DEFAULT_COMMIT_MESSAGE.to_string(),
            timeout_secs: 15,
        }
    }
}

impl SyncConfig {
    /// True when token, owner, repo and path are all present.
    pub fn is_complete(&self) -> bool {
        self.token
            .as_ref()
            .map(|t| !t.expose_secret().trim().is_empty())
            .unwrap_or(false)
            && !self.owner.trim().is_empty()
            && !self.repo.trim().is_empty()
            && !self.path.trim().is_empty()
    }

    /// Set the token.
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(SecretString::new(token.into()));
        self
    }

    /// Enabled sync against `owner/repo`.
    pub fn github(owner: impl Into<String>, repo: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            enable_sync: true,
            owner: owner.into(),
            repo: repo.into(),
            ..Default::default()
        }
        .with_token(token)
    }

    /// Fail with a configuration error unless enabled and complete.
    pub fn validate(&self) -> LexisResult<()> {
        if !self.enable_sync {
            return Err(LexisError::remote_not_configured("Sync is disabled"));
        }
        if !self.is_complete() {
            return Err(LexisError::remote_not_configured(
                "Missing required sync configuration (token, owner, repo, path)",
            ));
        }
        Ok(())
    }
}

/// Main lexis configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LexisConfig {
    /// Local storage.
    pub storage: StorageConfig,
    /// Remote sync.
    pub sync: SyncConfig,
    /// Interval parameters.
    pub scheduler: IntervalScheduler,
    /// When false the quiz coordinator never presents an item.
    pub reminder_enabled: bool,
}

impl Default for LexisConfig {
    fn default() -> Self {
        Self {
            storage: StorageConfig::default(),
            sync: SyncConfig::default(),
            scheduler: IntervalScheduler::default(),
            reminder_enabled: true,
        }
    }
}

impl LexisConfig {
    /// Load configuration from a file (TOML, JSON, or YAML).
    pub fn from_file(path: impl AsRef<std::path::Path>) -> LexisResult<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let ext = path.as_ref().extension().and_then(|e| e.to_str());

        match ext {
            Some("toml") => {
                toml::from_str(&content).map_err(|e| LexisError::Configuration(e.to_string()))
            }
            Some("json") => {
                serde_json::from_str(&content).map_err(|e| LexisError::Configuration(e.to_string()))
            }
            Some("yaml" | "yml") => {
                serde_yaml::from_str(&content).map_err(|e| LexisError::Configuration(e.to_string()))
            }
            _ => Err(LexisError::Configuration(
                "Unsupported config file format. Use .toml, .json, or .yaml".to_string(),
            )),
        }
    }

    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(backend) = std::env::var("LEXIS_STORAGE_BACKEND") {
            config.storage.backend = match backend.to_lowercase().as_str() {
                "memory" => StorageBackend::Memory,
                "json_file" | "json" | "file" => StorageBackend::JsonFile,
                _ => StorageBackend::Sqlite,
            };
        }
        if let Ok(path) = std::env::var("LEXIS_STORAGE_PATH") {
            config.storage.path = PathBuf::from(path);
        }

        if let Ok(enabled) = std::env::var("LEXIS_SYNC_ENABLED") {
            config.sync.enable_sync = matches!(enabled.to_lowercase().as_str(), "1" | "true" | "yes");
        }
        if let Ok(token) = std::env::var("LEXIS_SYNC_TOKEN") {
            config.sync.token = Some(SecretString::new(token));
        }
        if let Ok(owner) = std::env::var("LEXIS_SYNC_OWNER") {
            config.sync.owner = owner;
        }
        if let Ok(repo) = std::env::var("LEXIS_SYNC_REPO") {
            config.sync.repo = repo;
        }
        if let Ok(path) = std::env::var("LEXIS_SYNC_PATH") {
            config.sync.path = path;
        }
        if let Ok(base) = std::env::var("LEXIS_SYNC_API_BASE") {
            config.sync.api_base = base;
        }
        if let Some(secs) = std::env::var("LEXIS_SYNC_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
        {
            config.sync.timeout_secs = secs;
        }

        if let Ok(enabled) = std::env::var("LEXIS_REMINDER_ENABLED") {
            config.reminder_enabled = !matches!(enabled.to_lowercase().as_str(), "0" | "false" | "no");
        }

        config
    }

    /// Build configuration using builder pattern.
    pub fn builder() -> LexisConfigBuilder {
        LexisConfigBuilder::default()
    }
}

/// Builder for LexisConfig.
#[derive(Default)]
pub struct LexisConfigBuilder {
    config: LexisConfig,
}

impl LexisConfigBuilder {
    /// Set storage configuration.
    pub fn storage(mut self, config: StorageConfig) -> Self {
        self.config.storage = config;
        self
    }

    /// Set sync configuration.
    pub fn sync(mut self, config: SyncConfig) -> Self {
        self.config.sync = config;
        self
    }

    /// Set interval parameters.
    pub fn scheduler(mut self, scheduler: IntervalScheduler) -> Self {
        self.config.scheduler = scheduler;
        self
    }

    /// Enable or disable review reminders.
    pub fn reminder_enabled(mut self, enabled: bool) -> Self {
        self.config.reminder_enabled = enabled;
        self
    }

    /// Build the configuration.
    pub fn build(self) -> LexisConfig {
        self.config
    }
}
