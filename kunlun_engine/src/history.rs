//! Historical series: downsampled records fetched on demand per client.
//!
//! Records arrive newest first and are not consecutive samples, so CPU
//! shares are taken per record from its own accumulators instead of from
//! deltas between neighbours.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::calc::cpu::{cpu_shares, CpuShares};
use crate::calc::{memory_usage, MemoryUsage};
use crate::error::EngineError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    Seconds,
    Minutes,
    Hours,
}

impl Granularity {
    pub const ALL: [Granularity; 3] = [Self::Seconds, Self::Minutes, Self::Hours];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Seconds => "seconds",
            Self::Minutes => "minutes",
            Self::Hours => "hours",
        }
    }

    /// Span covered by one series at this level.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Seconds => "last hour",
            Self::Minutes => "last day",
            Self::Hours => "last year",
        }
    }

    /// Spacing between points in seconds.
    pub fn step_secs(&self) -> u64 {
        match self {
            Self::Seconds => 10,
            Self::Minutes => 60,
            Self::Hours => 3_600,
        }
    }
}

impl fmt::Display for Granularity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Granularity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "seconds" | "s" | "hour" => Ok(Self::Seconds),
            "minutes" | "m" | "day" => Ok(Self::Minutes),
            "hours" | "h" | "year" => Ok(Self::Hours),
            other => Err(format!(
                "unknown granularity '{other}' (expected seconds, minutes or hours)"
            )),
        }
    }
}

/// One downsampled record. Aggregated values may be fractional, and anything
/// besides the timestamp may be missing; unknown series are kept in `extra`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryRecord {
    #[serde(default)]
    pub client_id: u64,
    pub timestamp: i64,
    #[serde(default)]
    pub cpu_user: f64,
    #[serde(default)]
    pub cpu_system: f64,
    #[serde(default)]
    pub cpu_nice: f64,
    #[serde(default)]
    pub cpu_idle: f64,
    #[serde(default)]
    pub cpu_iowait: f64,
    #[serde(default)]
    pub cpu_irq: f64,
    #[serde(default)]
    pub cpu_softirq: f64,
    #[serde(default)]
    pub cpu_steal: f64,
    #[serde(default)]
    pub mem_total_mib: f64,
    #[serde(default)]
    pub mem_free_mib: f64,
    #[serde(default)]
    pub mem_buff_cache_mib: f64,
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl HistoryRecord {
    fn cpu_array(&self) -> [f64; 8] {
        [
            self.cpu_user,
            self.cpu_system,
            self.cpu_nice,
            self.cpu_idle,
            self.cpu_iowait,
            self.cpu_irq,
            self.cpu_softirq,
            self.cpu_steal,
        ]
    }

    /// A numeric series that is not one of the named fields, e.g. `load_1min`.
    pub fn series(&self, key: &str) -> Option<f64> {
        self.extra.get(key).and_then(serde_json::Value::as_f64)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistoryPoint {
    pub timestamp: i64,
    pub cpu: CpuShares,
    pub memory: MemoryUsage,
    pub record: HistoryRecord,
}

/// Decode a history body (newest first) into chronological points.
pub fn decode_history(body: &str) -> Result<Vec<HistoryPoint>, EngineError> {
    let records: Vec<HistoryRecord> = serde_json::from_str(body)?;
    Ok(normalize_history(records))
}

/// Reverse to oldest-first and attach CPU shares and memory usage per record.
pub fn normalize_history(mut records: Vec<HistoryRecord>) -> Vec<HistoryPoint> {
    records.reverse();
    records
        .into_iter()
        .map(|record| HistoryPoint {
            timestamp: record.timestamp,
            cpu: cpu_shares(record.cpu_array()),
            memory: memory_usage(
                mib(record.mem_total_mib),
                mib(record.mem_free_mib),
                mib(record.mem_buff_cache_mib),
            ),
            record,
        })
        .collect()
}

fn mib(v: f64) -> u64 {
    if v.is_finite() && v > 0.0 {
        v.round() as u64
    } else {
        0
    }
}
