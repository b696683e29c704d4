//! Configuration management for mh-installer
//!
//! Uses XDG-compliant paths:
//! - Config: ~/.config/mh-installer/config.toml
//! - Data/logs: ~/.local/share/mh-installer/

mod paths;

pub use paths::Paths;

use crate::manifest::DEFAULT_MANIFEST_URL;
use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tokio::fs;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Location of the compatibility manifest (update.json)
    pub manifest_url: String,

    /// User-Agent sent with every request
    pub user_agent: String,

    /// Per-request timeout for manifest and artifact downloads
    pub request_timeout_secs: u64,

    /// Paths configuration
    #[serde(skip)]
    pub paths: Paths,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            manifest_url: DEFAULT_MANIFEST_URL.to_string(),
            user_agent: format!("mh-installer/{}", env!("CARGO_PKG_VERSION")),
            request_timeout_secs: 300,
            paths: Paths::new(),
        }
    }
}

impl Config {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Reject values that would make every request fail.
    pub fn validate(&self) -> Result<()> {
        let url = url::Url::parse(self.manifest_url.trim())
            .with_context(|| format!("Invalid manifest_url '{}'", self.manifest_url))?;
        if !matches!(url.scheme(), "http" | "https") {
            bail!(
                "manifest_url must use http or https, got '{}'",
                url.scheme()
            );
        }
        if self.request_timeout_secs == 0 {
            bail!("request_timeout_secs must be at least 1");
        }
        if self.user_agent.trim().is_empty() {
            bail!("user_agent cannot be empty");
        }
        Ok(())
    }

    /// Override the manifest location for this invocation.
    pub fn set_manifest_url(&mut self, url: &str) -> Result<()> {
        let trimmed = url.trim();
        if trimmed.is_empty() {
            bail!("--manifest-url cannot be empty");
        }
        self.manifest_url = trimmed.to_string();
        self.validate()
    }

    /// Load configuration from disk or create default
    ///
    /// Not validated here so a CLI override can still replace a broken
    /// `manifest_url`; `App::with_progress` validates the final value.
    pub async fn load() -> Result<Self> {
        let paths = Paths::new();
        let mut config = Self::load_from(&paths.config_file()).await?;
        config.paths = paths;
        Ok(config)
    }

    async fn load_from(config_path: &Path) -> Result<Self> {
        if config_path.exists() {
            let content = fs::read_to_string(config_path)
                .await
                .context("Failed to read config file")?;
            toml::from_str(&content).context("Failed to parse config file")
        } else {
            let config = Config::default();
            config.save_to(config_path).await?;
            Ok(config)
        }
    }

    /// Save configuration to disk
    async fn save_to(&self, config_path: &Path) -> Result<()> {
        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent)
                .await
                .context("Failed to create config directory")?;
        }

        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;
        fs::write(config_path, content)
            .await
            .context("Failed to write config file")?;

        Ok(())
    }
}
