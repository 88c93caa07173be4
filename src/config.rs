//! Application configuration module
//!
//! Handles loading and validating configuration from environment variables.

use crate::naming::NamingStyle;
use crate::source::TableDescriptor;
use serde::Deserialize;
use std::net::Ipv4Addr;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid configuration value: {0}")]
    InvalidValue(String),

    #[error("Failed to load catalog seed from {path}: {reason}")]
    SeedLoad { path: String, reason: String },
}

/// Server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: Ipv4Addr,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: Ipv4Addr::new(0, 0, 0, 0),
            port: 3000,
        }
    }
}

/// CORS configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CorsConfig {
    pub allowed_origins: Vec<String>,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origins: vec!["http://localhost:3001".to_string()],
        }
    }
}

/// Cascade engine configuration
#[derive(Debug, Clone)]
pub struct SyncConfig {
    /// Cluster suffix of every qualified name
    pub cluster_name: String,
    pub naming_style: NamingStyle,
    pub audit_enabled: bool,
    /// Acting user when neither the event nor the query names one
    pub default_user: String,
    pub skip_temporary_tables: bool,
    /// JSON array of table descriptors loaded into the live catalog at startup
    pub seed_path: Option<PathBuf>,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            cluster_name: "primary".to_string(),
            naming_style: NamingStyle::Dotted,
            audit_enabled: true,
            default_user: "catalog-sync".to_string(),
            skip_temporary_tables: true,
            seed_path: None,
        }
    }
}

/// Complete application settings
#[derive(Debug, Clone, Default)]
pub struct Settings {
    pub server: ServerConfig,
    pub cors: CorsConfig,
    pub sync: SyncConfig,
}

impl Settings {
    /// Load settings from environment variables
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if it exists (ignore errors if file not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build settings from any key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let server = ServerConfig {
            host: lookup("HOST")
                .and_then(|h| h.parse().ok())
                .unwrap_or_else(|| ServerConfig::default().host),
            port: lookup("PORT")
                .and_then(|p| p.parse().ok())
                .unwrap_or_else(|| ServerConfig::default().port),
        };

        let cors = CorsConfig {
            allowed_origins: lookup("ALLOWED_ORIGINS")
                .map(|s| s.split(',').map(|s| s.trim().to_string()).collect())
                .unwrap_or_else(|| CorsConfig::default().allowed_origins),
        };

        let defaults = SyncConfig::default();
        let cluster_name = lookup("CLUSTER_NAME")
            .map(|s| s.trim().to_string())
            .unwrap_or(defaults.cluster_name);
        if cluster_name.is_empty() || cluster_name.contains('@') {
            return Err(ConfigError::InvalidValue(format!(
                "CLUSTER_NAME must be non-empty and must not contain '@': '{}'",
                cluster_name
            )));
        }

        let naming_style = match lookup("QUALIFIED_NAME_STYLE") {
            Some(raw) => raw
                .parse()
                .map_err(|e| ConfigError::InvalidValue(format!("QUALIFIED_NAME_STYLE: {}", e)))?,
            None => defaults.naming_style,
        };

        let sync = SyncConfig {
            cluster_name,
            naming_style,
            audit_enabled: parse_flag(&lookup, "AUDIT_ENABLED", defaults.audit_enabled)?,
            default_user: lookup("SYNC_DEFAULT_USER")
                .filter(|u| !u.trim().is_empty())
                .unwrap_or(defaults.default_user),
            skip_temporary_tables: parse_flag(
                &lookup,
                "SKIP_TEMPORARY_TABLES",
                defaults.skip_temporary_tables,
            )?,
            seed_path: lookup("CATALOG_SEED_PATH")
                .filter(|p| !p.trim().is_empty())
                .map(PathBuf::from),
        };

        Ok(Self { server, cors, sync })
    }
}

fn parse_flag<F>(lookup: &F, key: &str, default: bool) -> Result<bool, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        None => Ok(default),
        Some(raw) => match raw.trim().to_lowercase().as_str() {
            "true" | "1" | "yes" | "on" => Ok(true),
            "false" | "0" | "no" | "off" => Ok(false),
            other => Err(ConfigError::InvalidValue(format!(
                "{} must be a boolean, got '{}'",
                key, other
            ))),
        },
    }
}

/// Read the startup seed of the live catalog
pub fn load_seed_tables(path: &Path) -> Result<Vec<TableDescriptor>, ConfigError> {
    let seed_error = |reason: String| ConfigError::SeedLoad {
        path: path.display().to_string(),
        reason,
    };

    let raw = std::fs::read_to_string(path).map_err(|e| seed_error(e.to_string()))?;
    serde_json::from_str(&raw).map_err(|e| seed_error(e.to_string()))
}
