//! portscope - a status page for Docker-published HTTP/HTTPS ports
//!
//! Portscope runs inside a container, asks the Docker daemon which other
//! containers are currently running, probes every TCP port they publish to
//! find out whether it speaks HTTP or HTTPS, and renders the result as a
//! page of clickable links.
//!
//! # Core Concepts
//!
//! - **Inventory**: the Docker daemon is queried once per page load for the
//!   set of running containers and their port publications
//! - **Probing**: each candidate host port is classified by a speculative
//!   HTTP request followed, only if that fails, by an HTTPS request
//! - **Self-exclusion**: the container portscope itself runs in is never
//!   listed or probed
//!
//! # Project Structure
//!
//! - [`inventory`]: Docker-backed container enumeration
//! - [`probe`]: per-port protocol detection
//! - [`resolver`]: published TCP port extraction
//! - [`orchestrator`]: concurrent fan-out and result aggregation
//! - [`server`]: axum routing and the probe-marker short-circuit
//! - [`view`]: HTML rendering

pub mod config;
pub mod inventory;
pub mod orchestrator;
pub mod probe;
pub mod resolver;
pub mod server;
pub mod view;

// Re-export key types for convenient access
pub use config::{AppConfig, ConfigError};
pub use inventory::{ContainerInventory, ContainerRecord, DockerInventory, InventoryError};
pub use orchestrator::{ContainerPortSummary, Orchestrator};
pub use probe::{PortProber, Prober, Scheme};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_exists() {
        assert!(!VERSION.is_empty());
    }
}
