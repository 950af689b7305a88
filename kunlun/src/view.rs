//! Plain-text rendering of enriched reports and history points.

use kunlun_engine::calc::cpu::CpuShares;
use kunlun_engine::{EnrichedReport, HistoryPoint};

pub fn human_mib(mib: u64) -> String {
    const K: f64 = 1024.0;
    let m = mib as f64;
    if m < K {
        return format!("{m:.0}M");
    }
    let g = m / K;
    if g < K {
        return format!("{g:.1}G");
    }
    format!("{:.2}T", g / K)
}

pub fn truncate_middle(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    if max <= 3 {
        return "...".into();
    }
    let chars: Vec<char> = s.chars().collect();
    let keep = max - 3;
    let left = keep / 2;
    let right = keep - left;
    let head: String = chars[..left].iter().collect();
    let tail: String = chars[chars.len() - right..].iter().collect();
    format!("{head}...{tail}")
}

pub fn header(online: usize, total: usize) -> String {
    if total == 0 {
        "Loading...".into()
    } else {
        format!("Online {online}/{total}")
    }
}

fn pct(fraction: f64) -> f64 {
    fraction * 100.0
}

pub fn report_line(r: &EnrichedReport) -> String {
    let state = if r.summary.is_offline { "offline" } else { "online" };
    format!(
        "{:<20} {:<7} load {:<14} cpu {:>5.1}% mem {}/{} ({:>3.0}%) net rx {:>8.2} tx {:>8.2} KiB/s disk {:>3.0}% r/w {:.2}/{:.2}/s tasks {} conn {} up {}d",
        truncate_middle(&r.raw.hostname, 20),
        state,
        r.summary.load_averages_info,
        pct(r.cpu.busy()),
        human_mib(r.memory.mem_really_used_mib),
        human_mib(r.raw.mem_total_mib),
        pct(r.memory.mem_used_total_percent),
        r.net.net_rx_speed_kib,
        r.net.net_tx_speed_kib,
        pct(r.disk.disk_utilization),
        r.disk.disk_reads_per_second,
        r.disk.disk_writes_per_second,
        r.summary.tasks_info,
        r.summary.connection_info,
        r.summary.uptime_days,
    )
}

pub fn history_line(p: &HistoryPoint) -> String {
    let busy = if p.cpu == CpuShares::default() {
        0.0
    } else {
        (1.0 - p.cpu.idle).clamp(0.0, 1.0)
    };
    let load = p
        .record
        .series("load_1min")
        .map(|v| format!("{v:.2}"))
        .unwrap_or_else(|| "-".into());
    format!(
        "{:>12} cpu {:>5.1}% (us {:.0}% sy {:.0}% wa {:.0}%) mem {:>5.1}% ({:.1}G) load {}",
        p.timestamp,
        pct(busy),
        pct(p.cpu.user),
        pct(p.cpu.system),
        pct(p.cpu.iowait),
        pct(p.memory.mem_used_total_percent),
        p.memory.used_gib(),
        load,
    )
}
