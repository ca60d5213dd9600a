//! `AppConfig` struct, TOML read/write, and API key resolution.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};

use super::paths::resolve_config_path;

/// Environment variable consulted before the config file.
pub const API_KEY_ENV: &str = "TMDB_API_KEY";

/// Top-level application configuration.
#[derive(Debug, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct AppConfig {
    /// TMDB API settings.
    #[serde(default)]
    pub api: ApiConfig,
}

/// TMDB API configuration.
#[derive(Debug, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct ApiConfig {
    /// v3 API key.
    #[serde(default)]
    pub key: Option<String>,
}

impl AppConfig {
    /// Loads config from a TOML file. Returns default if file does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        toml::from_str(&content).with_context(|| format!("failed to parse {}", path.display()))
    }

    /// Saves config to a TOML file, creating parent directories if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if directory creation or file write fails.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create directory {}", parent.display()))?;
        }
        let content = toml::to_string_pretty(self).context("failed to serialize config to TOML")?;
        std::fs::write(path, content).with_context(|| format!("failed to write {}", path.display()))
    }
}

/// Resolves the TMDB API key: `TMDB_API_KEY` first, then the config file.
///
/// Validated once at startup. The missing-key case produces the
/// explanatory cannot-connect message instead of a crash downstream.
///
/// # Errors
///
/// Returns an error if the config file is unreadable or no key is set.
pub fn resolve_api_key(dir: Option<&PathBuf>) -> Result<String> {
    let config_path = resolve_config_path(dir).context("failed to resolve config path")?;
    let config = AppConfig::load(&config_path).context("failed to load config")?;
    let env_key = std::env::var(API_KEY_ENV).ok();
    api_key_from(env_key, &config, &config_path)
}

/// Picks the key from the environment value or the loaded config.
fn api_key_from(env_key: Option<String>, config: &AppConfig, path: &Path) -> Result<String> {
    if let Some(key) = env_key.filter(|k| !k.trim().is_empty()) {
        return Ok(key);
    }
    if let Some(key) = config.api.key.clone().filter(|k| !k.trim().is_empty()) {
        return Ok(key);
    }
    bail!(missing_key_help(path));
}

/// Remediation text for the missing-key startup condition.
fn missing_key_help(path: &Path) -> String {
    format!(
        "TMDB API key is not configured. We cannot connect to the movie database without one.\n\
         To fix this:\n\
         1. Get an API key at https://www.themoviedb.org/settings/api\n\
         2. Set the {API_KEY_ENV} environment variable,\n\
            or add it under [api] as `key = \"...\"` in {}",
        path.display()
    )
}
