//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `STOREFRONT_CATALOG_PATH` - Path to the catalog JSON file
//!
//! ## Optional
//! - `STOREFRONT_HOST` - Bind address (default: 127.0.0.1)
//! - `STOREFRONT_PORT` - Listen port (default: 3000)

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use thiserror::Error;

const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 3000;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront application configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Path to the catalog JSON file
    pub catalog_path: PathBuf,
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if a required variable is missing or a value fails
    /// to parse.
    pub fn from_env() -> Result<Self, ConfigError> {
        let host = parse_host(&std::env::var("STOREFRONT_HOST").unwrap_or_else(|_| {
            DEFAULT_HOST.to_owned()
        }))?;
        let port = match std::env::var("STOREFRONT_PORT") {
            Ok(raw) => parse_port(&raw)?,
            Err(_) => DEFAULT_PORT,
        };
        let catalog_path = std::env::var("STOREFRONT_CATALOG_PATH")
            .map(PathBuf::from)
            .map_err(|_| ConfigError::MissingEnvVar("STOREFRONT_CATALOG_PATH".to_owned()))?;

        Ok(Self {
            host,
            port,
            catalog_path,
        })
    }

    /// Socket address to bind the server to.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

/// Parse a bind address.
fn parse_host(raw: &str) -> Result<IpAddr, ConfigError> {
    raw.parse()
        .map_err(|_| ConfigError::InvalidEnvVar("STOREFRONT_HOST".to_owned(), raw.to_owned()))
}

/// Parse a listen port.
fn parse_port(raw: &str) -> Result<u16, ConfigError> {
    raw.parse()
        .map_err(|_| ConfigError::InvalidEnvVar("STOREFRONT_PORT".to_owned(), raw.to_owned()))
}
