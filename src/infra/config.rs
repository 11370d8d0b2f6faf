// src/infra/config.rs — Configuration loading (TOML)

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::infra::errors::DispatchError;
use crate::infra::paths;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub dispatcher: DispatcherConfig,

    #[serde(default)]
    pub context: ContextConfig,

    #[serde(default)]
    pub storage: StorageConfig,

    #[serde(default)]
    pub api: ApiConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DispatcherConfig {
    pub auto_generation: bool,
    pub confidence_threshold: f64,
    /// How many recent selections analytics reports.
    pub history_limit: usize,
}

impl Default for DispatcherConfig {
    fn default() -> Self {
        Self {
            auto_generation: true,
            confidence_threshold: 0.3,
            history_limit: 10,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ContextConfig {
    pub enabled: bool,
    pub url: String,
    pub project: String,
    pub cache_ttl_secs: u64,
    pub timeout_secs: u64,
}

impl Default for ContextConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            url: "http://localhost:8000".into(),
            project: "persona-manager-mcp".into(),
            cache_ttl_secs: 300,
            timeout_secs: 5,
        }
    }
}

impl ContextConfig {
    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Catalog directory (defaults to the data dir).
    pub dir: Option<String>,
    /// Seed the built-in personas into an empty catalog.
    pub seed_defaults: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            dir: None,
            seed_defaults: true,
        }
    }
}

impl StorageConfig {
    pub fn resolved_dir(&self) -> PathBuf {
        match &self.dir {
            Some(dir) => PathBuf::from(shellexpand_home(dir)),
            None => paths::personas_dir(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub port: u16,
    /// Optional bearer token required on every request.
    pub token: Option<String>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            port: 8765,
            token: None,
        }
    }
}

/// Expand a leading `~/` to the home directory.
fn shellexpand_home(path: &str) -> String {
    match path.strip_prefix("~/") {
        Some(rest) => paths::dirs_home().join(rest).to_string_lossy().into_owned(),
        None => path.to_string(),
    }
}

impl Config {
    /// Load config from the default file, falling back to defaults.
    /// Environment overrides are applied last.
    pub fn load() -> anyhow::Result<Self> {
        let path = paths::config_file_path();
        let mut config = if path.exists() {
            Self::load_from(&path)?
        } else {
            Self::default()
        };
        config.apply_env();
        Ok(config)
    }

    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// `CONTEXT_MANAGER_URL` and `CONTEXT_PROJECT_NAME` override the file.
    pub fn apply_env(&mut self) {
        if let Ok(url) = std::env::var("CONTEXT_MANAGER_URL") {
            if !url.trim().is_empty() {
                self.context.url = url;
            }
        }
        if let Ok(project) = std::env::var("CONTEXT_PROJECT_NAME") {
            if !project.trim().is_empty() {
                self.context.project = project;
            }
        }
    }

    pub fn validate(&self) -> Result<(), DispatchError> {
        let t = self.dispatcher.confidence_threshold;
        if !(0.0..=1.0).contains(&t) {
            return Err(DispatchError::InvalidThreshold { value: t });
        }
        if self.context.url.trim().is_empty() {
            return Err(DispatchError::Config("context.url must not be empty".into()));
        }
        Ok(())
    }

    /// Write the config as TOML, creating parent directories.
    pub fn save_to(&self, path: &Path) -> anyhow::Result<()> {
        self.validate()?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, toml::to_string_pretty(self)?)?;
        Ok(())
    }
}
