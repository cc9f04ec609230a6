//! Application settings.
//!
//! Settings are resolved in layers: built-in defaults, then an optional
//! `inventory.toml` file, then environment variables (`DATABASE_URL`,
//! `BIND_ADDRESS`, `RUST_LOG`). The CLI applies its own flags on top.

use crate::config::database::DEFAULT_DATABASE_URL;
use crate::errors::{Error, Result};
use serde::Deserialize;
use std::path::Path;
use tracing::{debug, info};

/// Config file looked up in the working directory when no path is given.
pub const DEFAULT_CONFIG_PATH: &str = "inventory.toml";

/// Default address the HTTP API listens on.
pub const DEFAULT_BIND_ADDRESS: &str = "127.0.0.1:8000";

/// Resolved application configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// `SeaORM` connection string
    pub database_url: String,
    /// `host:port` for the HTTP API
    pub bind_address: String,
    /// `tracing` filter directive used when `RUST_LOG` is unset
    pub log_filter: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database_url: DEFAULT_DATABASE_URL.to_string(),
            bind_address: DEFAULT_BIND_ADDRESS.to_string(),
            log_filter: "info".to_string(),
        }
    }
}

impl AppConfig {
    /// Overrides fields from a lookup function (the process environment in production).
    fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(url) = lookup("DATABASE_URL") {
            self.database_url = url;
        }
        if let Some(addr) = lookup("BIND_ADDRESS") {
            self.bind_address = addr;
        }
        if let Some(filter) = lookup("RUST_LOG") {
            self.log_filter = filter;
        }
    }
}

/// Loads settings from a TOML file.
///
/// Missing keys fall back to their defaults.
///
/// # Errors
/// Returns an error if the file cannot be read or the TOML is invalid.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<AppConfig> {
    let path_ref = path.as_ref();
    debug!("Attempting to load configuration from: {:?}", path_ref);
    let contents = std::fs::read_to_string(path_ref).map_err(|e| Error::Config {
        message: format!("Failed to read config file {}: {e}", path_ref.display()),
    })?;

    toml::from_str(&contents).map_err(|e| Error::Config {
        message: format!("Failed to parse {}: {e}", path_ref.display()),
    })
}

/// Resolves the full application configuration.
///
/// An explicit `path` must exist. Without one, `inventory.toml` is used if present
/// and defaults otherwise. Environment variables are applied last.
///
/// # Errors
/// Returns an error if an explicitly given file is missing or any file fails to parse.
pub fn load_app_configuration(path: Option<&Path>) -> Result<AppConfig> {
    let mut config = match path {
        Some(path) => load_config(path)?,
        None if Path::new(DEFAULT_CONFIG_PATH).exists() => load_config(DEFAULT_CONFIG_PATH)?,
        None => {
            info!("No {DEFAULT_CONFIG_PATH} found, using default settings");
            AppConfig::default()
        }
    };
    config.apply_env(|key| std::env::var(key).ok());
    Ok(config)
}
