//! Configuration management for portscope
//!
//! All configuration is sourced from environment variables with sensible
//! defaults; there is no config file and no CLI surface.
//!
//! # Environment Variables
//!
//! - `HOSTNAME`: own container id, set by Docker inside a container; used
//!   as the self-exclusion key. Empty disables self-exclusion.
//! - `HOST_HOSTNAME`: externally reachable hostname used in rendered
//!   links - default: "localhost"
//! - `PORTSCOPE_DOCKER_HOST` (falling back to `DOCKER_HOST`): Docker
//!   daemon endpoint - default: "unix:///var/run/docker.sock"
//! - `PORTSCOPE_LISTEN_ADDR`: bind address - default: "0.0.0.0:5000"
//! - `PORTSCOPE_LOG_LEVEL`: logging level - default: "info"

use std::env;
use std::fmt;
use std::net::SocketAddr;
use thiserror::Error;

/// Default values for configuration
const DEFAULT_HOSTNAME: &str = "localhost";
const DEFAULT_DOCKER_ENDPOINT: &str = "unix:///var/run/docker.sock";
const DEFAULT_LISTEN_ADDR: &str = "0.0.0.0:5000";
const DEFAULT_LOG_LEVEL: &str = "info";

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Configuration validation failed
    #[error("Configuration validation failed: {0}")]
    ValidationFailed(String),
}

/// Main configuration structure for portscope
///
/// Constructed with `Default::default()`, which loads from environment
/// variables with fallback defaults.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Own container id; containers whose id starts with this are skipped
    pub self_container_id: String,

    /// Hostname rendered into the links on the status page
    pub external_hostname: String,

    /// Docker daemon endpoint (unix socket path or tcp:// address)
    pub docker_endpoint: String,

    /// Address the status page is served on
    pub listen_addr: SocketAddr,

    /// Logging level (trace, debug, info, warn, error)
    pub log_level: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        let self_container_id = env::var("HOSTNAME").unwrap_or_default();

        let external_hostname =
            env::var("HOST_HOSTNAME").unwrap_or_else(|_| DEFAULT_HOSTNAME.to_string());

        let docker_endpoint = env::var("PORTSCOPE_DOCKER_HOST")
            .or_else(|_| env::var("DOCKER_HOST"))
            .unwrap_or_else(|_| DEFAULT_DOCKER_ENDPOINT.to_string());

        let listen_addr = env::var("PORTSCOPE_LISTEN_ADDR")
            .ok()
            .and_then(|v| v.parse::<SocketAddr>().ok())
            .unwrap_or_else(|| {
                DEFAULT_LISTEN_ADDR
                    .parse()
                    .expect("default listen address is valid")
            });

        let log_level = env::var("PORTSCOPE_LOG_LEVEL")
            .unwrap_or_else(|_| DEFAULT_LOG_LEVEL.to_string())
            .to_lowercase();

        Self {
            self_container_id,
            external_hostname,
            docker_endpoint,
            listen_addr,
            log_level,
        }
    }
}

impl AppConfig {
    /// Validates the configuration
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the hostname or Docker endpoint is empty,
    /// or the log level is not one of trace|debug|info|warn|error.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.external_hostname.is_empty() {
            return Err(ConfigError::ValidationFailed(
                "External hostname must not be empty".to_string(),
            ));
        }

        if self.docker_endpoint.is_empty() {
            return Err(ConfigError::ValidationFailed(
                "Docker endpoint must not be empty".to_string(),
            ));
        }

        match self.log_level.as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            _ => {
                return Err(ConfigError::ValidationFailed(format!(
                    "Invalid log level: {}. Valid options: trace, debug, info, warn, error",
                    self.log_level
                )))
            }
        }

        Ok(())
    }
}

impl fmt::Display for AppConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Portscope Configuration:")?;
        writeln!(f, "  Self Container Id: {}", self.self_container_id)?;
        writeln!(f, "  External Hostname: {}", self.external_hostname)?;
        writeln!(f, "  Docker Endpoint: {}", self.docker_endpoint)?;
        writeln!(f, "  Listen Addr: {}", self.listen_addr)?;
        writeln!(f, "  Log Level: {}", self.log_level)?;
        Ok(())
    }
}
