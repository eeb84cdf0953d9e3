//! Concurrent probe fan-out and result aggregation
//!
//! One orchestration is a single batch: every candidate port of every
//! non-self container is probed concurrently (capped by a semaphore), and
//! the batch waits for all probes before producing output. No partial
//! results, no cross-probe cancellation, no batch-wide deadline - each
//! probe carries its own timeout.

use crate::inventory::ContainerRecord;
use crate::probe::{PortProber, Scheme};
use crate::resolver;
use futures_util::future;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tracing::{debug, warn};

/// Cap on simultaneously outstanding probes. Keeps a host with very many
/// containers and ports from exhausting sockets.
const MAX_CONCURRENT_PROBES: usize = 32;

/// Output unit handed to the presentation layer: a container name and its
/// detected `(protocol, port)` pairs in ascending port order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContainerPortSummary {
    pub name: String,
    pub ports: Vec<(Scheme, u16)>,
}

/// Fans probes out and assembles per-container summaries. Performs no I/O
/// itself.
pub struct Orchestrator {
    prober: Arc<dyn PortProber>,
    concurrency: usize,
}

impl Orchestrator {
    pub fn new(prober: Arc<dyn PortProber>) -> Self {
        Self::with_concurrency(prober, MAX_CONCURRENT_PROBES)
    }

    pub fn with_concurrency(prober: Arc<dyn PortProber>, concurrency: usize) -> Self {
        Self {
            prober,
            concurrency: concurrency.max(1),
        }
    }

    /// Probe every candidate port of every container and return the
    /// summaries of those with at least one detected protocol, ordered by
    /// container name (ties keep enumeration order).
    pub async fn orchestrate(
        &self,
        mut containers: Vec<ContainerRecord>,
        hostname: &str,
        self_id: &str,
    ) -> Vec<ContainerPortSummary> {
        // Vec::sort_by is stable, so equal names keep enumeration order.
        containers.sort_by(|a, b| a.name.cmp(&b.name));

        // Candidate resolution is purely computational; only the probes
        // below suspend.
        let targets: Vec<(String, Vec<u16>)> = containers
            .iter()
            .map(|c| {
                let ports: Vec<u16> = resolver::resolve(c, self_id).into_iter().collect();
                (c.name.clone(), ports)
            })
            .collect();

        let total: usize = targets.iter().map(|(_, ports)| ports.len()).sum();
        debug!(
            "probing {} candidate ports across {} containers",
            total,
            targets.len()
        );

        let semaphore = Arc::new(Semaphore::new(self.concurrency));
        let mut meta = Vec::with_capacity(total);
        let mut handles = Vec::with_capacity(total);

        for (index, (_, ports)) in targets.iter().enumerate() {
            for &port in ports {
                let semaphore = semaphore.clone();
                let prober = self.prober.clone();
                let host = hostname.to_string();

                meta.push((index, port));
                handles.push(tokio::spawn(async move {
                    let _permit = semaphore
                        .acquire_owned()
                        .await
                        .expect("probe semaphore closed");
                    prober.probe(&host, port).await
                }));
            }
        }

        // Barrier: every probe completes before any output is produced.
        let results = future::join_all(handles).await;

        let mut buckets: Vec<Vec<(Scheme, u16)>> = vec![Vec::new(); targets.len()];
        for ((index, port), joined) in meta.into_iter().zip(results) {
            match joined {
                Ok(Some(scheme)) => buckets[index].push((scheme, port)),
                Ok(None) => {}
                Err(err) => warn!("probe task for port {} failed to join: {}", port, err),
            }
        }

        targets
            .into_iter()
            .zip(buckets)
            .filter(|(_, ports)| !ports.is_empty())
            .map(|((name, _), ports)| ContainerPortSummary { name, ports })
            .collect()
    }
}
