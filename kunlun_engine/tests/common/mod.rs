#![allow(dead_code)]

use kunlun_engine::RawSnapshot;

pub fn snapshot(machine_id: &str, timestamp: i64) -> RawSnapshot {
    RawSnapshot {
        client_id: 7,
        timestamp,
        uptime_s: 172_800,
        load_1min: 0.5,
        load_5min: 0.75,
        load_15min: 1.0,
        running_tasks: 3,
        total_tasks: 210,
        cpu_user: 1_000,
        cpu_system: 500,
        cpu_nice: 0,
        cpu_idle: 8_000,
        cpu_iowait: 300,
        cpu_irq: 100,
        cpu_softirq: 50,
        cpu_steal: 100,
        mem_total_mib: 16_384,
        mem_free_mib: 4_096,
        mem_used_mib: 12_288,
        mem_buff_cache_mib: 2_048,
        tcp_connections: 42,
        udp_connections: 5,
        default_interface_net_rx_bytes: 3 * 1024 * 1024 * 1024,
        default_interface_net_tx_bytes: 1024 * 1024 * 1024 / 2,
        cpu_num_cores: 4,
        cpu_delay_us: 120,
        disk_delay_us: 800,
        root_disk_total_kb: 100 * 1024 * 1024,
        root_disk_avail_kb: 25 * 1024 * 1024,
        reads_completed: 100,
        writes_completed: 400,
        reading_ms: 250,
        writing_ms: 1_200,
        iotime_ms: 5_000,
        ios_in_progress: 0,
        weighted_io_time: 7_500,
        machine_id: machine_id.to_string(),
        hostname: format!("{machine_id}.lan"),
    }
}

/// `prev` advanced by `secs` with every counter moving forward.
pub fn advance(prev: &RawSnapshot, secs: i64) -> RawSnapshot {
    let mut s = prev.clone();
    s.timestamp += secs;
    s.uptime_s += secs as u64;
    s.cpu_user += 30;
    s.cpu_system += 10;
    s.cpu_idle += 60;
    s.default_interface_net_rx_bytes += 20_480;
    s.default_interface_net_tx_bytes += 10_240;
    s.reads_completed += 50;
    s.writes_completed += 20;
    s.reading_ms += 100;
    s.writing_ms += 60;
    s.iotime_ms += 2_500;
    s.weighted_io_time += 3_000;
    s
}
