//! Layered runtime configuration.
//!
//! Precedence, lowest first: built-in defaults, the JSON config file,
//! `HBNB_*` environment variables, command-line flags (applied by `main`).

use anyhow::{bail, Context, Result};
use dirs::config_dir;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use hbnb_core::storage::{ReloadPolicy, DEFAULT_FILE_PATH};

const APP_NAME: &str = "hbnb";
const CONFIG_FILE: &str = "config.json";

pub const ENV_FILE: &str = "HBNB_FILE";
pub const ENV_STRICT_RELOAD: &str = "HBNB_STRICT_RELOAD";

pub const DEFAULT_LOG_FILTER: &str = "hbnb=warn,hbnb_core=warn";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Backing JSON file, relative to the working directory unless absolute.
    pub file_path: PathBuf,
    /// Abort startup when a stored entry cannot be rehydrated.
    pub strict_reload: bool,
    /// `tracing` filter directives, used when `RUST_LOG` is unset.
    pub log_filter: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            file_path: PathBuf::from(DEFAULT_FILE_PATH),
            strict_reload: false,
            log_filter: DEFAULT_LOG_FILTER.to_string(),
        }
    }
}

impl Config {
    /// Loads `path`, or the default config file when `path` is `None`.
    /// A missing file yields the defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => match default_config_path() {
                Some(path) => Self::from_file(&path),
                None => Ok(Self::default()),
            },
        }
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;

        let config = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;

        Ok(config)
    }

    /// Applies `HBNB_*` overrides. `lookup` is `std::env::var(..).ok()` in
    /// production.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(file) = lookup(ENV_FILE).filter(|value| !value.is_empty()) {
            self.file_path = PathBuf::from(file);
        }
        if let Some(strict) = lookup(ENV_STRICT_RELOAD) {
            self.strict_reload = parse_flag(&strict)
                .with_context(|| format!("Invalid value for {ENV_STRICT_RELOAD}"))?;
        }
        Ok(())
    }

    pub fn reload_policy(&self) -> ReloadPolicy {
        if self.strict_reload {
            ReloadPolicy::Strict
        } else {
            ReloadPolicy::Lenient
        }
    }
}

/// `<user config dir>/hbnb/config.json`, if the platform has one.
pub fn default_config_path() -> Option<PathBuf> {
    let mut path = config_dir()?;
    path.push(APP_NAME);
    path.push(CONFIG_FILE);
    Some(path)
}

fn parse_flag(value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        other => bail!("expected a boolean, got `{other}`"),
    }
}
