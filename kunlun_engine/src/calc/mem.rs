//! Memory occupancy. Instantaneous, so no previous snapshot is involved.

use serde::{Deserialize, Serialize};

use super::{round2, safe_div};

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MemoryUsage {
    /// total - free - buffers/cache, in MiB
    pub mem_really_used_mib: u64,
    /// really-used over total, fraction in `[0, 1]`
    pub mem_used_total_percent: f64,
}

impl MemoryUsage {
    pub fn used_gib(&self) -> f64 {
        self.mem_really_used_mib as f64 / 1024.0
    }
}

/// Buffers and page cache are reclaimable, so they do not count as used.
pub fn memory_usage(total_mib: u64, free_mib: u64, buff_cache_mib: u64) -> MemoryUsage {
    let really_used = total_mib.saturating_sub(free_mib.saturating_add(buff_cache_mib));
    MemoryUsage {
        mem_really_used_mib: really_used,
        mem_used_total_percent: round2(safe_div(really_used as f64, total_mib as f64)),
    }
}
