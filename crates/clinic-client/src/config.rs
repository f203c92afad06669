use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{ClientError, Result};
use crate::storage::default_state_dir;

pub const CONFIG_FILE: &str = "config.toml";
pub const ENV_PREFIX: &str = "CLINIC";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClientConfig {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub session: SessionConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_base_url() -> String {
    "http://localhost:3000".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Where session files live; `~/.clinic` when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub storage_dir: Option<PathBuf>,
    #[serde(default = "default_profile")]
    pub profile: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            storage_dir: None,
            profile: default_profile(),
        }
    }
}

fn default_profile() -> String {
    "default".to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
        }
    }
}

fn default_level() -> String {
    "warn".to_string()
}

impl ClientConfig {
    pub fn validate(&self) -> Result<()> {
        let parsed = url::Url::parse(&self.api.base_url).map_err(|e| {
            ClientError::configuration(format!("api.base_url '{}': {e}", self.api.base_url))
        })?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ClientError::configuration(
                "api.base_url must use http or https",
            ));
        }
        if self.api.timeout_secs == 0 {
            return Err(ClientError::configuration("api.timeout_secs must be > 0"));
        }
        if self.session.profile.trim().is_empty() {
            return Err(ClientError::configuration("session.profile must not be empty"));
        }
        let level = self.logging.level.to_ascii_lowercase();
        let valid_levels = ["trace", "debug", "info", "warn", "error", "off"];
        if !valid_levels.contains(&level.as_str()) {
            return Err(ClientError::configuration(format!(
                "logging.level must be one of {valid_levels:?}"
            )));
        }
        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.api.timeout_secs)
    }

    pub fn storage_dir(&self) -> Result<PathBuf> {
        match &self.session.storage_dir {
            Some(dir) => Ok(dir.clone()),
            None => default_state_dir(),
        }
    }
}

/// `~/.clinic/config.toml`
pub fn default_config_path() -> Result<PathBuf> {
    Ok(default_state_dir()?.join(CONFIG_FILE))
}

/// Build the configuration from defaults, the TOML file at `path` (or the
/// default location) when it exists, and `CLINIC__SECTION__KEY` variables.
pub fn load_config(path: Option<&Path>) -> Result<ClientConfig> {
    use config::{Config, Environment, File};

    let path = match path {
        Some(p) => p.to_path_buf(),
        None => default_config_path()?,
    };

    let mut builder = Config::builder();
    if path.exists() {
        builder = builder.add_source(File::from(path.clone()));
    }
    // e.g. CLINIC__API__BASE_URL=https://clinic.example.com
    builder = builder.add_source(
        Environment::with_prefix(ENV_PREFIX)
            .try_parsing(true)
            .separator("__"),
    );

    let merged: ClientConfig = builder
        .build()
        .and_then(|cfg| cfg.try_deserialize())
        .map_err(|e| ClientError::configuration(format!("{}: {e}", path.display())))?;
    merged.validate()?;
    tracing::debug!(path = %path.display(), base_url = %merged.api.base_url, "Configuration loaded");
    Ok(merged)
}
