//! Per-family calculators. Each takes (current, previous) and returns one
//! derived fragment; none of them fail.

pub mod cpu;
pub mod disk;
pub mod mem;
pub mod net;

pub use cpu::{cpu_percentages, CpuPercentages};
pub use disk::{disk_io_stats, DiskIoStats};
pub use mem::{memory_usage, MemoryUsage};
pub use net::{network_speed, NetworkSpeed};

/// Round to two decimals, the precision every derived field is reported at.
pub fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

/// Divide, yielding 0 when the denominator is not positive or the result is
/// not finite. Applied to every ratio the engine derives.
pub fn safe_div(num: f64, den: f64) -> f64 {
    if den <= 0.0 {
        return 0.0;
    }
    let q = num / den;
    if q.is_finite() {
        q
    } else {
        0.0
    }
}

// Signed difference of two unsigned counters.
#[inline]
pub(crate) fn delta(current: u64, previous: u64) -> f64 {
    current as f64 - previous as f64
}
