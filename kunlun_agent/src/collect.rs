//! Snapshot collection: /proc counters for CPU, memory, load, sockets and
//! disk I/O; sysinfo for interface totals and the root mount.

use anyhow::Result;
use kunlun_engine::RawSnapshot;

use crate::state::AppState;

#[cfg(target_os = "linux")]
pub async fn collect_snapshot(state: &AppState) -> Result<RawSnapshot> {
    use anyhow::Context;
    use kunlun_engine::now_unix;
    use std::fs;
    use std::path::Path;
    use sysinfo::System;
    use tracing::warn;

    use crate::config;
    use crate::proc::{
        count_sockets, default_iface, parse_loadavg, parse_meminfo, parse_stat, pick_disk,
    };

    let timestamp = now_unix();
    let (cpu, cores) = parse_stat(&fs::read_to_string("/proc/stat")?)
        .context("no aggregate cpu line in /proc/stat")?;
    let mem = parse_meminfo(&fs::read_to_string("/proc/meminfo")?);
    let load = parse_loadavg(&fs::read_to_string("/proc/loadavg")?)
        .context("unparsable /proc/loadavg")?;
    let sockets = |tables: [&str; 2]| -> u64 {
        tables
            .iter()
            .filter_map(|t| fs::read_to_string(format!("/proc/net/{t}")).ok())
            .map(|s| count_sockets(&s))
            .sum()
    };
    let tcp_connections = sockets(["tcp", "tcp6"]);
    let udp_connections = sockets(["udp", "udp6"]);
    let disk = pick_disk(&fs::read_to_string("/proc/diskstats")?, config::disk_override())
        .unwrap_or_default();

    let iface = config::iface_override().map(str::to_string).or_else(|| {
        fs::read_to_string("/proc/net/route")
            .ok()
            .and_then(|r| default_iface(&r))
    });
    let (rx, tx) = {
        let mut nets = state.networks.lock().await;
        nets.refresh(true);
        match iface.as_deref() {
            Some(name) => nets
                .iter()
                .find(|(n, _)| n.as_str() == name)
                .map(|(_, d)| (d.total_received(), d.total_transmitted()))
                .unwrap_or((0, 0)),
            // no default route: everything except loopback
            None => nets
                .iter()
                .filter(|(n, _)| n.as_str() != "lo")
                .fold((0u64, 0u64), |(r, t), (_, d)| {
                    (
                        r.saturating_add(d.total_received()),
                        t.saturating_add(d.total_transmitted()),
                    )
                }),
        }
    };

    let (root_disk_total_kb, root_disk_avail_kb) = {
        let mut disks = state.disks.lock().await;
        disks.refresh(false);
        disks
            .iter()
            .find(|d| d.mount_point() == Path::new("/"))
            .map(|d| (d.total_space() / 1024, d.available_space() / 1024))
            .unwrap_or((0, 0))
    };

    let cpu_delay_us = scheduler_delay_us().await;
    let disk_delay_us = if config::disk_probe_enabled() {
        match tokio::task::spawn_blocking(disk_probe_us).await {
            Ok(Ok(us)) => us,
            Ok(Err(e)) => {
                warn!("disk probe failed: {e}");
                0
            }
            Err(e) => {
                warn!("disk probe task failed: {e}");
                0
            }
        }
    } else {
        0
    };

    let id = &state.identity;
    Ok(RawSnapshot {
        client_id: id.client_id,
        timestamp,
        uptime_s: System::uptime(),
        load_1min: load.one,
        load_5min: load.five,
        load_15min: load.fifteen,
        running_tasks: load.running,
        total_tasks: load.total,
        cpu_user: cpu.user,
        cpu_system: cpu.system,
        cpu_nice: cpu.nice,
        cpu_idle: cpu.idle,
        cpu_iowait: cpu.iowait,
        cpu_irq: cpu.irq,
        cpu_softirq: cpu.softirq,
        cpu_steal: cpu.steal,
        mem_total_mib: mem.total_mib,
        mem_free_mib: mem.free_mib,
        mem_used_mib: mem.used_mib(),
        mem_buff_cache_mib: mem.buff_cache_mib,
        tcp_connections,
        udp_connections,
        default_interface_net_rx_bytes: rx,
        default_interface_net_tx_bytes: tx,
        cpu_num_cores: cores,
        cpu_delay_us,
        disk_delay_us,
        root_disk_total_kb,
        root_disk_avail_kb,
        reads_completed: disk.reads_completed,
        writes_completed: disk.writes_completed,
        reading_ms: disk.reading_ms,
        writing_ms: disk.writing_ms,
        iotime_ms: disk.iotime_ms,
        ios_in_progress: disk.ios_in_progress,
        weighted_io_time: disk.weighted_io_time,
        machine_id: id.machine_id.clone(),
        hostname: id.hostname.clone(),
    })
}

#[cfg(not(target_os = "linux"))]
pub async fn collect_snapshot(_state: &AppState) -> Result<RawSnapshot> {
    anyhow::bail!("snapshot collection needs Linux /proc")
}

// How late a 1ms timer fires; a rough run-queue pressure signal.
#[cfg(target_os = "linux")]
async fn scheduler_delay_us() -> u64 {
    use std::time::{Duration, Instant};
    const NAP: Duration = Duration::from_millis(1);
    let start = Instant::now();
    tokio::time::sleep(NAP).await;
    start.elapsed().saturating_sub(NAP).as_micros() as u64
}

// Time to write and sync one 4 KiB block in the temp dir.
#[cfg(target_os = "linux")]
fn disk_probe_us() -> std::io::Result<u64> {
    use std::io::Write;
    use std::time::Instant;
    let path = std::env::temp_dir().join(format!("kunlun_agent_probe_{}", std::process::id()));
    let start = Instant::now();
    let mut f = std::fs::File::create(&path)?;
    f.write_all(&[0u8; 4096])?;
    f.sync_data()?;
    let us = start.elapsed().as_micros() as u64;
    drop(f);
    let _ = std::fs::remove_file(&path);
    Ok(us)
}
