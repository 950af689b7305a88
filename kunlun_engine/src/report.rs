//! Report assembly: raw snapshot + derived fragments + summary fields, flat.

use chrono::{DateTime, Local};
use serde::Serialize;

use crate::calc::{
    cpu_percentages, disk_io_stats, memory_usage, network_speed, round2, safe_div,
    CpuPercentages, DiskIoStats, MemoryUsage, NetworkSpeed,
};
use crate::freshness::is_stale_after;
use crate::types::RawSnapshot;

const GIB: f64 = 1024.0 * 1024.0 * 1024.0;

/// Bytes to GiB, two decimals.
pub fn bytes_to_gib(bytes: u64) -> f64 {
    round2(bytes as f64 / GIB)
}

/// Composite, presentation-ready fields derived from the current snapshot.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    /// `"1min/5min/15min"`
    pub load_averages_info: String,
    /// capture time, local `HH:MM:SS`
    pub update_at: String,
    /// `"running/total"`
    pub tasks_info: String,
    /// `"tcp/udp"`
    pub connection_info: String,
    /// `"rxGiB/txGiB"` since boot
    pub traffic_info: String,
    pub uptime_days: f64,
    pub root_disk_used_gib: f64,
    pub root_disk_total_gib: f64,
    pub root_disk_used_percent: f64,
    pub is_offline: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnrichedReport {
    #[serde(flatten)]
    pub raw: RawSnapshot,
    #[serde(flatten)]
    pub summary: Summary,
    #[serde(flatten)]
    pub memory: MemoryUsage,
    #[serde(flatten)]
    pub cpu: CpuPercentages,
    #[serde(flatten)]
    pub net: NetworkSpeed,
    #[serde(flatten)]
    pub disk: DiskIoStats,
}

impl EnrichedReport {
    pub fn machine_id(&self) -> &str {
        &self.raw.machine_id
    }

    /// Re-stamp the offline flag against a later clock; no new snapshot needed.
    pub fn refresh_offline(&mut self, now: i64, stale_secs: i64) -> bool {
        self.summary.is_offline = is_stale_after(self.raw.timestamp, now, stale_secs);
        self.summary.is_offline
    }
}

/// Run every calculator and merge. `previous` is whatever the caller decided
/// is the valid predecessor (none on first sighting or after a restart).
pub fn assemble(
    current: &RawSnapshot,
    previous: Option<&RawSnapshot>,
    now: i64,
    stale_secs: i64,
) -> EnrichedReport {
    EnrichedReport {
        summary: summarize(current, now, stale_secs),
        memory: memory_usage(
            current.mem_total_mib,
            current.mem_free_mib,
            current.mem_buff_cache_mib,
        ),
        cpu: cpu_percentages(current, previous),
        net: network_speed(current, previous),
        disk: disk_io_stats(current, previous),
        raw: current.clone(),
    }
}

fn summarize(s: &RawSnapshot, now: i64, stale_secs: i64) -> Summary {
    let disk_used_kb = s.root_disk_total_kb.saturating_sub(s.root_disk_avail_kb);
    Summary {
        load_averages_info: format!("{}/{}/{}", s.load_1min, s.load_5min, s.load_15min),
        update_at: format_time(s.timestamp),
        tasks_info: format!("{}/{}", s.running_tasks, s.total_tasks),
        connection_info: format!("{}/{}", s.tcp_connections, s.udp_connections),
        traffic_info: format!(
            "{}/{}",
            bytes_to_gib(s.default_interface_net_rx_bytes),
            bytes_to_gib(s.default_interface_net_tx_bytes)
        ),
        uptime_days: round2(s.uptime_s as f64 / 86_400.0),
        root_disk_used_gib: bytes_to_gib(disk_used_kb.saturating_mul(1024)),
        root_disk_total_gib: bytes_to_gib(s.root_disk_total_kb.saturating_mul(1024)),
        root_disk_used_percent: round2(safe_div(
            disk_used_kb as f64,
            s.root_disk_total_kb as f64,
        )),
        is_offline: is_stale_after(s.timestamp, now, stale_secs),
    }
}

fn format_time(ts: i64) -> String {
    DateTime::from_timestamp(ts, 0)
        .map(|t| t.with_timezone(&Local).format("%H:%M:%S").to_string())
        .unwrap_or_default()
}
