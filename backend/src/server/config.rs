//! Process-wide server configuration.
//!
//! Assembled once at start-up from environment variables and passed down
//! explicitly; no module holds configuration state of its own.

use std::net::SocketAddr;

/// How bearer tokens are verified.
#[derive(Debug, Clone)]
pub enum AuthMode {
    /// Verify HS256 signatures with a shared secret.
    Hs256Secret(String),
    /// Trust any well-formed token. Local development only.
    UnsignedDev,
}

/// Errors raised while reading the environment.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("BIND_ADDR is not a valid socket address: {value}")]
    InvalidBindAddr { value: String },
    #[error("AUTH_JWT_SECRET must be set (or AUTH_ALLOW_UNSIGNED=1 for local development)")]
    MissingAuthSecret,
}

/// Configuration for the HTTP server process.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
    pub auth: AuthMode,
}

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";

impl ServerConfig {
    /// Read configuration from the environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        let raw_addr =
            std::env::var("BIND_ADDR").unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_owned());
        let bind_addr = raw_addr
            .parse()
            .map_err(|_| ConfigError::InvalidBindAddr { value: raw_addr })?;

        let auth = match std::env::var("AUTH_JWT_SECRET") {
            Ok(secret) if !secret.is_empty() => AuthMode::Hs256Secret(secret),
            _ if std::env::var("AUTH_ALLOW_UNSIGNED").ok().as_deref() == Some("1") => {
                AuthMode::UnsignedDev
            }
            _ => return Err(ConfigError::MissingAuthSecret),
        };

        Ok(Self { bind_addr, auth })
    }
}
