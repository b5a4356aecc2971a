//! Bind-target configuration.
//!
//! A JSON file listing the addresses to listen on. Every entry becomes its
//! own TCP listener; all listeners share one registry and router. A missing
//! or broken file falls back to the built-in defaults (a localhost listener
//! plus a LAN-reachable one on the same port).

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

pub const DEFAULT_CONFIG_PATH: &str = "config.json";

/// Environment variable overriding the config file path.
pub const CONFIG_PATH_ENV: &str = "CHATRELAY_CONFIG";

pub const DEFAULT_PORT: u16 = 8765;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config file: {0}")]
    Parse(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub servers: Vec<ListenerConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListenerConfig {
    pub id: u32,
    pub name: String,
    pub host: String,
    pub port: u16,
}

impl ListenerConfig {
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            servers: vec![
                ListenerConfig {
                    id: 1,
                    name: "本地服务器".to_string(),
                    host: "localhost".to_string(),
                    port: DEFAULT_PORT,
                },
                ListenerConfig {
                    id: 2,
                    name: "局域网服务器".to_string(),
                    host: "0.0.0.0".to_string(),
                    port: DEFAULT_PORT,
                },
            ],
        }
    }
}

impl ServerConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&contents)?)
    }

    /// Load `path`, falling back to the defaults when the file is absent or
    /// unusable. A broken file is worth a warning but never fatal.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        if !path.exists() {
            tracing::info!(path = %path.display(), "no config file, using default listeners");
            return Self::default();
        }
        match Self::load(path) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "ignoring unusable config file");
                Self::default()
            }
        }
    }
}
