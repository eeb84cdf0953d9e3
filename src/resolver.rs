//! Published TCP port extraction
//!
//! Pure functions over a [`ContainerRecord`]: pick out the distinct host
//! ports published over TCP, and never return anything for the container
//! this service runs inside.

use crate::inventory::ContainerRecord;
use std::collections::BTreeSet;
use tracing::debug;

/// The candidate host ports for one container, deduplicated and in
/// ascending order.
///
/// Returns an empty set when the container's id starts with a non-empty
/// `self_id` (the running instance never probes itself), when nothing is
/// published over TCP, or when every binding is malformed. Entries with a
/// missing or unparseable host port are skipped without affecting their
/// siblings.
pub fn resolve(container: &ContainerRecord, self_id: &str) -> BTreeSet<u16> {
    let mut ports = BTreeSet::new();

    if !self_id.is_empty() && container.id.starts_with(self_id) {
        debug!("skipping own container {}", container.name);
        return ports;
    }

    for (key, bindings) in &container.port_publications {
        let Some((_, transport)) = key.rsplit_once('/') else {
            continue;
        };
        if transport != "tcp" {
            continue;
        }

        for binding in bindings {
            let Some(host_port) = binding.host_port.as_deref() else {
                continue;
            };
            match host_port.parse::<u16>() {
                Ok(port) if port != 0 => {
                    ports.insert(port);
                }
                _ => {
                    debug!(
                        "skipping malformed host port {:?} on container {}",
                        host_port, container.name
                    );
                }
            }
        }
    }

    ports
}
