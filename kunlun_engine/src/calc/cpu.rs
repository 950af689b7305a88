//! CPU time shares over the interval between two snapshots.

use serde::{Deserialize, Serialize};

use super::{delta, round2, safe_div};
use crate::types::{CpuTimes, RawSnapshot};

/// Share of each CPU slice in the interval, as a fraction in `[0, 1]`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CpuPercentages {
    pub cpu_us_percent: f64,
    pub cpu_sy_percent: f64,
    pub cpu_ni_percent: f64,
    pub cpu_id_percent: f64,
    pub cpu_wa_percent: f64,
    pub cpu_hi_percent: f64,
    pub cpu_st_percent: f64,
}

impl CpuPercentages {
    pub fn sum(&self) -> f64 {
        self.cpu_us_percent
            + self.cpu_sy_percent
            + self.cpu_ni_percent
            + self.cpu_id_percent
            + self.cpu_wa_percent
            + self.cpu_hi_percent
            + self.cpu_st_percent
    }

    /// Everything that is not idle.
    pub fn busy(&self) -> f64 {
        if self.sum() <= 0.0 {
            0.0
        } else {
            round2((1.0 - self.cpu_id_percent).clamp(0.0, 1.0))
        }
    }
}

/// With no previous snapshot the counters are taken as-is, i.e. the shares
/// since boot. softirq is not one of the seven reported slices and stays out
/// of the total.
pub fn cpu_percentages(current: &RawSnapshot, previous: Option<&RawSnapshot>) -> CpuPercentages {
    let cur = current.cpu_slices();
    let prev = previous.map(RawSnapshot::cpu_slices).unwrap_or_default();
    shares(&cur, &prev)
}

fn shares(cur: &CpuTimes, prev: &CpuTimes) -> CpuPercentages {
    // A slice that went backwards contributes nothing to the interval.
    let d = [
        delta(cur.user, prev.user).max(0.0),
        delta(cur.system, prev.system).max(0.0),
        delta(cur.nice, prev.nice).max(0.0),
        delta(cur.idle, prev.idle).max(0.0),
        delta(cur.iowait, prev.iowait).max(0.0),
        delta(cur.irq, prev.irq).max(0.0),
        delta(cur.steal, prev.steal).max(0.0),
    ];
    let total: f64 = d.iter().sum();
    // Nothing advanced: a reset or a frozen counter.
    if total <= 0.0 {
        return CpuPercentages::default();
    }
    let pct = |v: f64| round2(safe_div(v, total));
    CpuPercentages {
        cpu_us_percent: pct(d[0]),
        cpu_sy_percent: pct(d[1]),
        cpu_ni_percent: pct(d[2]),
        cpu_id_percent: pct(d[3]),
        cpu_wa_percent: pct(d[4]),
        cpu_hi_percent: pct(d[5]),
        cpu_st_percent: pct(d[6]),
    }
}

/// Shares of all eight accumulators of a single record, as used for
/// historical series where the preceding record is not at hand.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CpuShares {
    pub user: f64,
    pub system: f64,
    pub nice: f64,
    pub idle: f64,
    pub iowait: f64,
    pub irq: f64,
    pub softirq: f64,
    pub steal: f64,
}

/// Shares of the eight accumulators in the order user, system, nice, idle,
/// iowait, irq, softirq, steal.
pub fn cpu_shares(vals: [f64; 8]) -> CpuShares {
    let total: f64 = vals.iter().sum();
    if total <= 0.0 {
        return CpuShares::default();
    }
    let pct = |v: f64| round2(safe_div(v, total));
    CpuShares {
        user: pct(vals[0]),
        system: pct(vals[1]),
        nice: pct(vals[2]),
        idle: pct(vals[3]),
        iowait: pct(vals[4]),
        irq: pct(vals[5]),
        softirq: pct(vals[6]),
        steal: pct(vals[7]),
    }
}

pub fn cpu_shares_since_boot(t: &CpuTimes) -> CpuShares {
    cpu_shares(t.as_array())
}
