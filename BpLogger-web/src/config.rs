use std::env;
use std::net::{IpAddr, SocketAddr};

use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid PORT '{0}'")]
    Port(String),

    #[error("Invalid HOST '{0}'")]
    Host(String),
}

/// HTTP server settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: IpAddr,
    pub port: u16,
    /// Deployment environment reported by the health endpoint
    pub environment: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::from([0, 0, 0, 0]),
            port: 5000,
            environment: "development".to_string(),
        }
    }
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let host = match lookup("HOST") {
            Some(host) => host.parse::<IpAddr>().map_err(|_| ConfigError::Host(host))?,
            None => defaults.host,
        };

        let port = match lookup("PORT") {
            Some(port) => port.parse::<u16>().map_err(|_| ConfigError::Port(port))?,
            None => defaults.port,
        };

        let environment = lookup("APP_ENV").unwrap_or(defaults.environment);

        info!("Server configuration: host={}, port={}, environment={}", host, port, environment);

        Ok(Self { host, port, environment })
    }

    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}
