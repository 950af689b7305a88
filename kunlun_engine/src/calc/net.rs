//! Throughput of the default interface in KiB/s.

use serde::{Deserialize, Serialize};

use super::{delta, round2, safe_div};
use crate::types::RawSnapshot;

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct NetworkSpeed {
    pub net_rx_speed_kib: f64,
    pub net_tx_speed_kib: f64,
}

pub fn network_speed(current: &RawSnapshot, previous: Option<&RawSnapshot>) -> NetworkSpeed {
    // a single point has no rate
    let Some(prev) = previous else {
        return NetworkSpeed::default();
    };
    let dt = (current.timestamp - prev.timestamp) as f64;
    NetworkSpeed {
        net_rx_speed_kib: kib_per_sec(
            delta(current.default_interface_net_rx_bytes, prev.default_interface_net_rx_bytes),
            dt,
        ),
        net_tx_speed_kib: kib_per_sec(
            delta(current.default_interface_net_tx_bytes, prev.default_interface_net_tx_bytes),
            dt,
        ),
    }
}

fn kib_per_sec(bytes: f64, secs: f64) -> f64 {
    // counter went backwards (interface reset) or nothing moved
    if bytes <= 0.0 {
        return 0.0;
    }
    round2(safe_div(bytes / 1024.0, secs))
}
