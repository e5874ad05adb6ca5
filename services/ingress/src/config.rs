//! Ingress service configuration
//!
//! Loaded from a TOML or JSON file (chosen by extension); every section and
//! field is optional and falls back to its default.

use crate::constants::{DEFAULT_BIND_ADDRESS, DEFAULT_PORT, DEFAULT_SOURCE_NAME};
use crate::error::{IngressError, Result};
use mailbox_runtime::RuntimeConfig;
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::Path;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IngressConfig {
    pub server: ServerConfig,
    pub ingress: MessageDefaults,
    pub runtime: RuntimeConfig,
    pub actors: ActorsConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// HTTP server bind address
    pub bind_address: String,

    /// HTTP server port
    pub port: u16,
}

/// Fields the ingress stamps on every message it builds. `target` is always
/// [`TARGET_NAME`](crate::constants::TARGET_NAME).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MessageDefaults {
    pub source_name: String,
}

/// Actors the binary wires up at startup
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ActorsConfig {
    /// Message types handled by the logging actor
    pub log_types: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: DEFAULT_BIND_ADDRESS.to_string(),
            port: DEFAULT_PORT,
        }
    }
}

impl Default for MessageDefaults {
    fn default() -> Self {
        Self {
            source_name: DEFAULT_SOURCE_NAME.to_string(),
        }
    }
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr> {
        format!("{}:{}", self.bind_address, self.port)
            .parse()
            .map_err(|e| IngressError::Configuration {
                message: format!("Invalid bind address: {}", e),
            })
    }
}

impl IngressConfig {
    pub async fn load(path: &Path) -> Result<Self> {
        let contents = tokio::fs::read_to_string(path).await?;
        Self::parse(path, &contents)
    }

    /// Parse file contents, picking the format from the path's extension
    pub fn parse(path: &Path, contents: &str) -> Result<Self> {
        let config: Self = if path.extension().and_then(|s| s.to_str()) == Some("json") {
            serde_json::from_str(contents)?
        } else {
            // Default to TOML
            toml::from_str(contents)?
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        self.runtime.validate()?;
        self.server.socket_addr()?;
        if self.ingress.source_name.trim().is_empty() {
            return Err(IngressError::Configuration {
                message: "source_name must not be empty".to_string(),
            });
        }
        Ok(())
    }
}
