//! Shared agent state: host identity and persistent sysinfo handles.

use std::sync::Arc;
use sysinfo::{Disks, Networks};
use tokio::sync::Mutex;

pub type SharedNetworks = Arc<Mutex<Networks>>;
pub type SharedDisks = Arc<Mutex<Disks>>;

#[derive(Debug, Clone)]
pub struct Identity {
    pub client_id: u64,
    pub machine_id: String,
    pub hostname: String,
}

#[derive(Clone)]
pub struct AppState {
    pub identity: Arc<Identity>,
    // Kept across requests so interface and mount lists are not rebuilt each poll
    pub networks: SharedNetworks,
    pub disks: SharedDisks,
}

impl AppState {
    pub fn new(identity: Identity) -> Self {
        Self {
            identity: Arc::new(identity),
            networks: Arc::new(Mutex::new(Networks::new_with_refreshed_list())),
            disks: Arc::new(Mutex::new(Disks::new_with_refreshed_list())),
        }
    }
}

impl Identity {
    /// machine-id when the host has one, hostname otherwise.
    pub fn detect(client_id: u64) -> Self {
        let hostname = sysinfo::System::host_name().unwrap_or_else(|| "unknown".into());
        let machine_id = ["/etc/machine-id", "/var/lib/dbus/machine-id"]
            .iter()
            .filter_map(|p| std::fs::read_to_string(p).ok())
            .map(|s| s.trim().to_string())
            .find(|s| !s.is_empty())
            .unwrap_or_else(|| hostname.clone());
        Self {
            client_id,
            machine_id,
            hostname,
        }
    }
}
