//! Block device I/O: interval rates plus since-boot latencies.
//!
//! Rates and utilization compare the two snapshots. Latencies and the
//! weighted I/O fraction are read off the current counters alone (averages
//! since boot), so they do not react to short bursts.

use serde::{Deserialize, Serialize};

use super::{delta, round2, safe_div};
use crate::types::RawSnapshot;

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct DiskIoStats {
    pub disk_reads_per_second: f64,
    pub disk_writes_per_second: f64,
    /// ms per completed read
    pub disk_avg_read_latency: f64,
    /// ms per completed write
    pub disk_avg_write_latency: f64,
    /// busy share of the interval, fraction in `[0, 1]`
    pub disk_utilization: f64,
    /// weighted I/O time over I/O time
    pub disk_weighted_iotime_percent: f64,
}

pub fn disk_io_stats(current: &RawSnapshot, previous: Option<&RawSnapshot>) -> DiskIoStats {
    let Some(prev) = previous else {
        return DiskIoStats::default();
    };
    let dt = (current.timestamp - prev.timestamp) as f64;
    let rate = |cur: u64, old: u64| round2(safe_div(delta(cur, old).max(0.0), dt));

    DiskIoStats {
        disk_reads_per_second: rate(current.reads_completed, prev.reads_completed),
        disk_writes_per_second: rate(current.writes_completed, prev.writes_completed),
        disk_avg_read_latency: round2(safe_div(
            current.reading_ms as f64,
            current.reads_completed as f64,
        )),
        disk_avg_write_latency: round2(safe_div(
            current.writing_ms as f64,
            current.writes_completed as f64,
        )),
        disk_utilization: round2(safe_div(
            delta(current.iotime_ms, prev.iotime_ms).max(0.0),
            dt * 1000.0,
        )),
        disk_weighted_iotime_percent: round2(safe_div(
            current.weighted_io_time as f64,
            current.iotime_ms as f64,
        )),
    }
}
