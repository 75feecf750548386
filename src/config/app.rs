//! Main application configuration
//!
//! This module defines the configuration for the squad draw service,
//! including environment variable and TOML file loading and validation.

use crate::balancer::BalancerConfig;
use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::Path;

/// Main application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub service: ServiceSettings,
    pub storage: StorageSettings,
    pub balancer: BalancerSettings,
}

/// Service-level settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceSettings {
    /// Service name for logging
    pub name: String,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
}

/// Draw storage settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageSettings {
    /// SQLite database file; ":memory:" keeps draws for the process lifetime
    pub database_path: String,
    /// Maximum pooled connections
    pub pool_size: u32,
}

/// Balancer settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BalancerSettings {
    /// Prefix for squad labels
    pub label_prefix: String,
}

impl Default for ServiceSettings {
    fn default() -> Self {
        Self {
            name: "squad-draw".to_string(),
            log_level: "info".to_string(),
        }
    }
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            database_path: "squad-draw.db".to_string(),
            pool_size: 4,
        }
    }
}

impl Default for BalancerSettings {
    fn default() -> Self {
        Self {
            label_prefix: BalancerConfig::default().label_prefix,
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables with fallback to defaults
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();
        config.apply_env()?;
        validate_config(&config)?;
        Ok(config)
    }

    /// Load a TOML file, then let environment variables override it
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;

        let mut config = Self::from_toml_str(&contents)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        config.apply_env()?;
        validate_config(&config)?;
        Ok(config)
    }

    /// Parse TOML without consulting the environment
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        Ok(toml::from_str(contents)?)
    }

    fn apply_env(&mut self) -> Result<()> {
        // Service settings
        if let Ok(name) = env::var("SERVICE_NAME") {
            self.service.name = name;
        }
        if let Ok(log_level) = env::var("LOG_LEVEL") {
            self.service.log_level = log_level;
        }

        // Storage settings
        if let Ok(path) = env::var("DATABASE_PATH") {
            self.storage.database_path = path;
        }
        if let Ok(pool_size) = env::var("DATABASE_POOL_SIZE") {
            self.storage.pool_size = pool_size
                .parse()
                .map_err(|_| anyhow!("Invalid DATABASE_POOL_SIZE value: {}", pool_size))?;
        }

        // Balancer settings
        if let Ok(prefix) = env::var("SQUAD_LABEL_PREFIX") {
            self.balancer.label_prefix = prefix;
        }

        Ok(())
    }

    /// Balancer configuration derived from these settings
    pub fn balancer_config(&self) -> BalancerConfig {
        BalancerConfig {
            label_prefix: self.balancer.label_prefix.clone(),
        }
    }
}

/// Validate configuration values
pub fn validate_config(config: &AppConfig) -> Result<()> {
    // Validate log level
    match config.service.log_level.to_lowercase().as_str() {
        "trace" | "debug" | "info" | "warn" | "error" => {}
        _ => return Err(anyhow!("Invalid log level: {}", config.service.log_level)),
    }

    if config.service.name.is_empty() {
        return Err(anyhow!("Service name cannot be empty"));
    }

    // Validate storage settings
    if config.storage.database_path.is_empty() {
        return Err(anyhow!("Database path cannot be empty"));
    }
    if config.storage.pool_size == 0 {
        return Err(anyhow!("Database pool size must be greater than 0"));
    }

    if config.balancer.label_prefix.trim().is_empty() {
        return Err(anyhow!("Squad label prefix cannot be empty"));
    }

    Ok(())
}
