//! Container inventory backed by the Docker daemon
//!
//! Wraps a single `bollard` client constructed at process start and shared
//! across requests. The [`ContainerInventory`] trait is the seam the rest
//! of the crate talks through, so the orchestrator and router can be
//! exercised with a static inventory in tests.

use async_trait::async_trait;
use bollard::container::ListContainersOptions;
use bollard::models::PortTypeEnum;
use bollard::{Docker, API_DEFAULT_VERSION};
use std::collections::HashMap;
use thiserror::Error;
use tracing::{debug, warn};

/// Connection timeout for the Docker daemon, in seconds.
const DOCKER_TIMEOUT_SECS: u64 = 30;

/// Inventory errors. Any of these is a hard dependency failure for the
/// request that triggered the call.
#[derive(Debug, Error)]
pub enum InventoryError {
    #[error("failed to connect to docker daemon: {0}")]
    Connect(#[source] bollard::errors::Error),

    #[error("failed to query docker daemon: {0}")]
    Query(#[source] bollard::errors::Error),
}

/// One published-port binding. `host_port` is absent when the internal
/// port is exposed but not published to the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortBinding {
    pub host_port: Option<String>,
}

/// A running container as the core sees it: identifier, display name, and
/// the raw port-publication map keyed by `"<port>/<transport>"`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContainerRecord {
    pub id: String,
    pub name: String,
    pub port_publications: HashMap<String, Vec<PortBinding>>,
}

/// Source of the running-container snapshot taken at the start of each
/// orchestration.
#[async_trait]
pub trait ContainerInventory: Send + Sync {
    async fn list_running_containers(&self) -> Result<Vec<ContainerRecord>, InventoryError>;
}

/// Production inventory over the Docker Engine API.
pub struct DockerInventory {
    docker: Docker,
}

impl DockerInventory {
    /// Connect to the Docker daemon at `endpoint` (a `unix://` socket
    /// path or a `tcp://`/`http://` address).
    pub fn connect(endpoint: &str) -> Result<Self, InventoryError> {
        let docker = if let Some(path) = endpoint.strip_prefix("unix://") {
            Docker::connect_with_socket(path, DOCKER_TIMEOUT_SECS, API_DEFAULT_VERSION)
        } else if endpoint.starts_with("tcp://") || endpoint.starts_with("http://") {
            Docker::connect_with_http(endpoint, DOCKER_TIMEOUT_SECS, API_DEFAULT_VERSION)
        } else {
            // Bare path, treat as a unix socket
            Docker::connect_with_socket(endpoint, DOCKER_TIMEOUT_SECS, API_DEFAULT_VERSION)
        }
        .map_err(InventoryError::Connect)?;

        Ok(Self { docker })
    }

    /// Verify the daemon is reachable and log its API version.
    pub async fn ping(&self) -> Result<(), InventoryError> {
        let version = self
            .docker
            .version()
            .await
            .map_err(InventoryError::Query)?;
        let api_version = version.api_version.unwrap_or_else(|| "unknown".to_string());
        debug!("Docker API version: {}", api_version);
        Ok(())
    }
}

#[async_trait]
impl ContainerInventory for DockerInventory {
    async fn list_running_containers(&self) -> Result<Vec<ContainerRecord>, InventoryError> {
        let options = ListContainersOptions::<String> {
            all: false,
            ..Default::default()
        };

        let summaries = self
            .docker
            .list_containers(Some(options))
            .await
            .map_err(InventoryError::Query)?;

        let mut records = Vec::with_capacity(summaries.len());
        for summary in summaries {
            let Some(id) = summary.id else {
                warn!("skipping container summary without an id");
                continue;
            };

            // Docker reports names with a leading slash
            let name = summary
                .names
                .as_ref()
                .and_then(|names| names.first())
                .map(|n| n.trim_start_matches('/').to_string())
                .unwrap_or_else(|| id.chars().take(12).collect());

            let mut port_publications: HashMap<String, Vec<PortBinding>> = HashMap::new();
            for port in summary.ports.unwrap_or_default() {
                let transport = match port.typ {
                    Some(PortTypeEnum::TCP) => "tcp",
                    Some(PortTypeEnum::UDP) => "udp",
                    Some(PortTypeEnum::SCTP) => "sctp",
                    _ => continue,
                };
                port_publications
                    .entry(format!("{}/{}", port.private_port, transport))
                    .or_default()
                    .push(PortBinding {
                        host_port: port.public_port.map(|p| p.to_string()),
                    });
            }

            records.push(ContainerRecord {
                id,
                name,
                port_publications,
            });
        }

        debug!("inventory returned {} running containers", records.len());
        Ok(records)
    }
}
