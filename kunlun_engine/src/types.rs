//! Raw snapshot as reported by a monitored host, plus decoding helpers.
//! Field names are the backend's JSON names; keep them stable.

use serde::{Deserialize, Serialize};

use crate::error::EngineError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawSnapshot {
    pub client_id: u64,
    // unix seconds, taken on the reporting host
    pub timestamp: i64,
    pub uptime_s: u64,
    pub load_1min: f64,
    pub load_5min: f64,
    pub load_15min: f64,
    pub running_tasks: u64,
    pub total_tasks: u64,

    // cumulative CPU time accumulators since boot (jiffies)
    pub cpu_user: u64,
    pub cpu_system: u64,
    pub cpu_nice: u64,
    pub cpu_idle: u64,
    pub cpu_iowait: u64,
    pub cpu_irq: u64,
    pub cpu_softirq: u64,
    pub cpu_steal: u64,

    pub mem_total_mib: u64,
    pub mem_free_mib: u64,
    pub mem_used_mib: u64,
    pub mem_buff_cache_mib: u64,

    pub tcp_connections: u64,
    pub udp_connections: u64,

    // cumulative since boot; the engine diffs to get rates
    pub default_interface_net_rx_bytes: u64,
    pub default_interface_net_tx_bytes: u64,

    pub cpu_num_cores: u64,
    pub cpu_delay_us: u64,
    pub disk_delay_us: u64,
    pub root_disk_total_kb: u64,
    pub root_disk_avail_kb: u64,

    // /proc/diskstats counters for the reporting block device
    pub reads_completed: u64,
    pub writes_completed: u64,
    pub reading_ms: u64,
    pub writing_ms: u64,
    pub iotime_ms: u64,
    pub ios_in_progress: u64,
    pub weighted_io_time: u64,

    pub machine_id: String,
    pub hostname: String,
}

impl RawSnapshot {
    /// Decode a single snapshot and check the fields serde cannot.
    pub fn from_json(s: &str) -> Result<Self, EngineError> {
        let snap: RawSnapshot = serde_json::from_str(s)?;
        snap.validate()?;
        Ok(snap)
    }

    pub fn from_value(v: serde_json::Value) -> Result<Self, EngineError> {
        let snap: RawSnapshot = serde_json::from_value(v)?;
        snap.validate()?;
        Ok(snap)
    }

    pub fn validate(&self) -> Result<(), EngineError> {
        if self.machine_id.trim().is_empty() {
            return Err(EngineError::MissingField("machine_id"));
        }
        if self.timestamp < 0 {
            return Err(EngineError::InvalidTimestamp(self.timestamp));
        }
        Ok(())
    }

    pub(crate) fn cpu_slices(&self) -> CpuTimes {
        CpuTimes {
            user: self.cpu_user,
            system: self.cpu_system,
            nice: self.cpu_nice,
            idle: self.cpu_idle,
            iowait: self.cpu_iowait,
            irq: self.cpu_irq,
            softirq: self.cpu_softirq,
            steal: self.cpu_steal,
        }
    }
}

/// The eight CPU accumulators of one snapshot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CpuTimes {
    pub user: u64,
    pub system: u64,
    pub nice: u64,
    pub idle: u64,
    pub iowait: u64,
    pub irq: u64,
    pub softirq: u64,
    pub steal: u64,
}

impl CpuTimes {
    pub fn as_array(&self) -> [f64; 8] {
        [
            self.user as f64,
            self.system as f64,
            self.nice as f64,
            self.idle as f64,
            self.iowait as f64,
            self.irq as f64,
            self.softirq as f64,
            self.steal as f64,
        ]
    }
}

/// Decode a `/status/latest` body. The outer array must parse; each element is
/// decoded on its own so one malformed record does not hide the others.
pub fn decode_batch(body: &str) -> Result<Vec<Result<RawSnapshot, EngineError>>, EngineError> {
    let items: Vec<serde_json::Value> = serde_json::from_str(body)?;
    Ok(items.into_iter().map(RawSnapshot::from_value).collect())
}
