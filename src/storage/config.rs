//! Configuration management
//!
//! [`ClientConfig`] is the value object a client is constructed from.
//! [`Config`] is the CLI's settings file, stored as TOML.
//! Priority for the endpoint: CLI argument > VISEARCH_ENDPOINT > config.toml

use super::Result;
use crate::error::{ConfigError, StorageError};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_VISEARCH_ENDPOINT: &str = "http://visearch.visenze.com";
pub const DEFAULT_TRACKING_ENDPOINT: &str = "http://track.visenze.com";
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 5;
pub const DEFAULT_READ_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_MAX_CONNECTIONS: usize = 50;
pub const DEFAULT_MAX_CONNECTIONS_PER_ROUTE: usize = 50;

/// Construction-time settings of a client.
///
/// | field | default |
/// |-------|---------|
/// | `endpoint` | `http://visearch.visenze.com` |
/// | `tracking_endpoint` | `http://track.visenze.com` |
/// | `connect_timeout_secs` | 5 |
/// | `read_timeout_secs` | 10 |
/// | `max_connections` | 50 |
/// | `max_connections_per_route` | 50 |
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct ClientConfig {
    pub endpoint: String,
    pub tracking_endpoint: String,
    pub connect_timeout_secs: u64,
    pub read_timeout_secs: u64,
    pub max_connections: usize,
    pub max_connections_per_route: usize,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_VISEARCH_ENDPOINT.to_string(),
            tracking_endpoint: DEFAULT_TRACKING_ENDPOINT.to_string(),
            connect_timeout_secs: DEFAULT_CONNECT_TIMEOUT_SECS,
            read_timeout_secs: DEFAULT_READ_TIMEOUT_SECS,
            max_connections: DEFAULT_MAX_CONNECTIONS,
            max_connections_per_route: DEFAULT_MAX_CONNECTIONS_PER_ROUTE,
        }
    }
}

impl ClientConfig {
    pub fn with_endpoint(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            ..Self::default()
        }
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    pub fn read_timeout(&self) -> Duration {
        Duration::from_secs(self.read_timeout_secs)
    }

    /// A transport talks to a single host, so both limits bound the same pool.
    pub fn pool_capacity(&self) -> usize {
        self.max_connections.min(self.max_connections_per_route)
    }

    /// Reject settings a client cannot be built from.
    pub fn validate(&self) -> std::result::Result<(), ConfigError> {
        if self.max_connections == 0 {
            return Err(invalid("max_connections", "0", "must be at least 1"));
        }
        if self.max_connections_per_route == 0 {
            return Err(invalid("max_connections_per_route", "0", "must be at least 1"));
        }
        if self.connect_timeout_secs == 0 {
            return Err(invalid("connect_timeout_secs", "0", "must be at least 1 second"));
        }
        if self.read_timeout_secs == 0 {
            return Err(invalid("read_timeout_secs", "0", "must be at least 1 second"));
        }
        Ok(())
    }
}

fn invalid(field: &str, value: &str, reason: &str) -> ConfigError {
    ConfigError::InvalidValue {
        field: field.to_string(),
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

/// Settings file of the `visearch` binary
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct Config {
    /// ViSearch API endpoint
    pub endpoint: Option<String>,
    /// Tracking endpoint
    pub tracking_endpoint: Option<String>,
    pub connect_timeout_secs: Option<u64>,
    pub read_timeout_secs: Option<u64>,
    pub max_connections: Option<usize>,
    pub max_connections_per_route: Option<usize>,
}

impl Config {
    /// Load configuration from file
    pub fn load(path: Option<PathBuf>) -> Result<Self> {
        let config_path = match path {
            Some(p) => p,
            None => Self::config_file_path()?,
        };

        if !config_path.exists() {
            return Ok(Config::default());
        }

        let content = fs::read_to_string(&config_path).map_err(|source| StorageError::FileIo {
            path: config_path.to_string_lossy().to_string(),
            source,
        })?;

        let config: Config =
            toml::from_str(&content).map_err(|e| StorageError::ConfigParseError {
                message: format!("Failed to parse config file: {}", e),
            })?;

        Ok(config)
    }

    /// Save configuration to file
    pub fn save(&self, path: Option<PathBuf>) -> Result<()> {
        let config_path = match path {
            Some(p) => p,
            None => Self::config_file_path()?,
        };

        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent).map_err(|source| StorageError::FileIo {
                path: parent.to_string_lossy().to_string(),
                source,
            })?;
        }

        let toml_content = toml::to_string(self).map_err(|e| StorageError::ConfigParseError {
            message: format!("Failed to serialize config: {}", e),
        })?;

        fs::write(&config_path, toml_content).map_err(|source| StorageError::FileIo {
            path: config_path.to_string_lossy().to_string(),
            source,
        })?;

        Ok(())
    }

    pub fn config_file_path() -> Result<PathBuf> {
        let home_dir = dirs::home_dir().ok_or(StorageError::ConfigDirNotFound)?;

        Ok(home_dir.join(".config").join("visearch").join("config.toml"))
    }

    /// Get endpoint, VISEARCH_ENDPOINT first, then the settings file
    pub fn get_endpoint(&self) -> Option<String> {
        self.endpoint_with_env(std::env::var("VISEARCH_ENDPOINT").ok())
    }

    fn endpoint_with_env(&self, env_endpoint: Option<String>) -> Option<String> {
        env_endpoint
            .filter(|s| !s.is_empty())
            .or_else(|| self.endpoint.clone().filter(|s| !s.is_empty()))
    }

    /// Update a single setting by its file key.
    pub fn set(&mut self, key: &str, value: &str) -> std::result::Result<(), ConfigError> {
        match key {
            "endpoint" => self.endpoint = Some(value.to_string()),
            "tracking_endpoint" => self.tracking_endpoint = Some(value.to_string()),
            "connect_timeout_secs" => self.connect_timeout_secs = Some(parse_number(key, value)?),
            "read_timeout_secs" => self.read_timeout_secs = Some(parse_number(key, value)?),
            "max_connections" => self.max_connections = Some(parse_number(key, value)?),
            "max_connections_per_route" => {
                self.max_connections_per_route = Some(parse_number(key, value)?)
            }
            _ => return Err(invalid(key, value, "unknown configuration key")),
        }
        Ok(())
    }

    /// Overlay the file's settings on the client defaults.
    ///
    /// The endpoint is required; `endpoint_override` wins over the file and
    /// the environment.
    pub fn to_client_config(
        &self,
        endpoint_override: Option<&str>,
    ) -> std::result::Result<ClientConfig, ConfigError> {
        let endpoint = endpoint_override
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .or_else(|| self.get_endpoint())
            .ok_or_else(|| ConfigError::MissingField {
                field: "endpoint".to_string(),
            })?;

        let defaults = ClientConfig::default();
        Ok(ClientConfig {
            endpoint,
            tracking_endpoint: self
                .tracking_endpoint
                .clone()
                .unwrap_or(defaults.tracking_endpoint),
            connect_timeout_secs: self
                .connect_timeout_secs
                .unwrap_or(defaults.connect_timeout_secs),
            read_timeout_secs: self.read_timeout_secs.unwrap_or(defaults.read_timeout_secs),
            max_connections: self.max_connections.unwrap_or(defaults.max_connections),
            max_connections_per_route: self
                .max_connections_per_route
                .unwrap_or(defaults.max_connections_per_route),
        })
    }
}

fn parse_number<T: std::str::FromStr>(
    key: &str,
    value: &str,
) -> std::result::Result<T, ConfigError> {
    value
        .parse()
        .map_err(|_| invalid(key, value, "expected a non-negative integer"))
}
