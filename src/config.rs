//! Configuration management for the AI Bank Tool MCP Server
//!
//! Handles environment variables and listen address defaults.

use crate::error::{ConfigError, Result};

/// Environment variable holding the HTTP listen port
pub const PORT_ENV: &str = "PORT";

/// Environment variable holding the HTTP listen host
pub const HOST_ENV: &str = "HOST";

/// Default HTTP listen port
pub const DEFAULT_PORT: u16 = 8080;

/// Default HTTP listen host
pub const DEFAULT_HOST: &str = "0.0.0.0";

/// Configuration for the AI Bank Tool MCP Server
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Host the HTTP transport binds to
    pub host: String,

    /// Port the HTTP transport binds to
    pub port: u16,
}

impl Config {
    /// Create a configuration from the process environment
    pub fn new() -> Result<Self> {
        Self::from_vars(std::env::var(HOST_ENV).ok(), std::env::var(PORT_ENV).ok())
    }

    /// Build a configuration from raw variable values
    pub fn from_vars(host: Option<String>, port: Option<String>) -> Result<Self> {
        let host = host
            .filter(|h| !h.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_HOST.to_string());

        let port = match port {
            Some(raw) if !raw.trim().is_empty() => {
                raw.trim().parse().map_err(|_| ConfigError::InvalidPort {
                    var: PORT_ENV.to_string(),
                    value: raw.clone(),
                })?
            }
            _ => DEFAULT_PORT,
        };

        Ok(Self { host, port })
    }

    /// Apply command line overrides
    pub fn with_overrides(mut self, host: Option<String>, port: Option<u16>) -> Self {
        if let Some(host) = host {
            self.host = host;
        }
        if let Some(port) = port {
            self.port = port;
        }
        self
    }

    /// Address string suitable for binding a listener
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
        }
    }
}
