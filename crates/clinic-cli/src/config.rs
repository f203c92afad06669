use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clinic_client::ClientConfig;
use clinic_client::config::{default_config_path, load_config};

use crate::cli::Cli;

pub fn config_path(explicit: Option<&Path>) -> Result<PathBuf> {
    match explicit {
        Some(path) => Ok(path.to_path_buf()),
        None => Ok(default_config_path()?),
    }
}

/// Effective configuration: file, then `CLINIC__*` variables, then flags.
pub fn resolve(cli: &Cli) -> Result<ClientConfig> {
    let path = config_path(cli.config.as_deref())?;
    let mut cfg = load_config(Some(&path))?;
    if let Some(url) = &cli.api_url {
        cfg.api.base_url = url.clone();
    }
    if let Some(profile) = &cli.profile {
        cfg.session.profile = profile.clone();
    }
    cfg.validate()?;
    Ok(cfg)
}

/// Only the file's own values, without environment overlays
pub fn load_file(path: &Path) -> Result<ClientConfig> {
    if !path.exists() {
        return Ok(ClientConfig::default());
    }
    let content =
        fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    toml::from_str(&content).with_context(|| format!("parsing {}", path.display()))
}

pub fn save_file(path: &Path, cfg: &ClientConfig) -> Result<()> {
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir)?;
    }
    let content = toml::to_string_pretty(cfg)?;
    fs::write(path, content).with_context(|| format!("writing {}", path.display()))?;
    Ok(())
}

/// Apply `key = value` to `cfg`. Leaves `cfg` untouched when the result is invalid.
pub fn set_value(cfg: &mut ClientConfig, key: &str, value: &str) -> Result<()> {
    let mut next = cfg.clone();
    match key {
        "api.base_url" => next.api.base_url = value.to_string(),
        "api.timeout_secs" => {
            next.api.timeout_secs = value
                .parse()
                .with_context(|| format!("api.timeout_secs must be a number, got '{value}'"))?;
        }
        "session.profile" => next.session.profile = value.to_string(),
        "session.storage_dir" => next.session.storage_dir = Some(PathBuf::from(value)),
        "logging.level" => next.logging.level = value.to_string(),
        other => bail!(
            "Unknown config key: {other}. Valid keys: api.base_url, api.timeout_secs, \
             session.profile, session.storage_dir, logging.level"
        ),
    }
    next.validate()?;
    *cfg = next;
    Ok(())
}
