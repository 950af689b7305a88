//! Calculator behaviour on realistic snapshot pairs.

mod common;

use common::{advance, snapshot};
use kunlun_engine::calc::{cpu_percentages, disk_io_stats, memory_usage, network_speed};
use kunlun_engine::{enrich_at, RawSnapshot};

fn rate_fields_are_zero(r: &kunlun_engine::EnrichedReport) {
    assert_eq!(r.net.net_rx_speed_kib, 0.0);
    assert_eq!(r.net.net_tx_speed_kib, 0.0);
    assert_eq!(r.disk.disk_reads_per_second, 0.0);
    assert_eq!(r.disk.disk_writes_per_second, 0.0);
    assert_eq!(r.disk.disk_utilization, 0.0);
}

#[test]
fn first_snapshot_has_no_rates() {
    let s = snapshot("m1", 1_000);
    let r = enrich_at(&s, None, 1_000);
    rate_fields_are_zero(&r);
    assert_eq!(r.disk.disk_avg_read_latency, 0.0);
    assert_eq!(r.disk.disk_weighted_iotime_percent, 0.0);
    // memory does not need history
    assert_eq!(r.memory.mem_really_used_mib, 10_240);
    assert!(r.memory.mem_used_total_percent > 0.0);
}

#[test]
fn first_snapshot_cpu_is_share_since_boot() {
    let s = snapshot("m1", 1_000);
    let p = cpu_percentages(&s, None);
    // user 1000 of 10000 over the seven reported slices
    assert_eq!(p.cpu_us_percent, 0.1);
    assert_eq!(p.cpu_id_percent, 0.8);
}

#[test]
fn disk_reads_per_second_over_interval() {
    let prev = snapshot("m1", 1_000);
    let cur = advance(&prev, 10);
    assert_eq!(prev.reads_completed, 100);
    assert_eq!(cur.reads_completed, 150);
    let d = disk_io_stats(&cur, Some(&prev));
    assert_eq!(d.disk_reads_per_second, 5.0);
    assert_eq!(d.disk_writes_per_second, 2.0);
    assert_eq!(d.disk_utilization, 0.25);
    // since boot: 350ms over 150 reads, 1260ms over 420 writes
    assert_eq!(d.disk_avg_read_latency, 2.33);
    assert_eq!(d.disk_avg_write_latency, 3.0);
    assert_eq!(d.disk_weighted_iotime_percent, 1.4);
}

#[test]
fn disk_zero_interval_is_guarded() {
    let prev = snapshot("m1", 1_000);
    let mut cur = advance(&prev, 10);
    cur.timestamp = prev.timestamp;
    let d = disk_io_stats(&cur, Some(&prev));
    assert_eq!(d.disk_reads_per_second, 0.0);
    assert_eq!(d.disk_utilization, 0.0);
    assert!(d.disk_avg_read_latency.is_finite());
}

#[test]
fn disk_counter_reset_does_not_go_negative() {
    let prev = snapshot("m1", 1_000);
    let mut cur = prev.clone();
    cur.timestamp += 2;
    cur.reads_completed = 3;
    cur.iotime_ms = 10;
    let d = disk_io_stats(&cur, Some(&prev));
    assert_eq!(d.disk_reads_per_second, 0.0);
    assert_eq!(d.disk_utilization, 0.0);
}

#[test]
fn cpu_shares_sum_to_one() {
    let deltas: [[u64; 7]; 4] = [
        [1, 1, 1, 1, 1, 1, 1],
        [30, 10, 0, 60, 0, 0, 0],
        [17, 3, 9, 211, 5, 1, 13],
        [1, 0, 0, 2, 0, 0, 0],
    ];
    let prev = snapshot("m1", 1_000);
    for d in deltas {
        let mut cur = prev.clone();
        cur.timestamp += 2;
        cur.cpu_user += d[0];
        cur.cpu_system += d[1];
        cur.cpu_nice += d[2];
        cur.cpu_idle += d[3];
        cur.cpu_iowait += d[4];
        cur.cpu_irq += d[5];
        cur.cpu_steal += d[6];
        let p = cpu_percentages(&cur, Some(&prev));
        assert!((p.sum() - 1.0).abs() <= 0.02 + 1e-9, "sum {} for {d:?}", p.sum());
        for v in [
            p.cpu_us_percent,
            p.cpu_sy_percent,
            p.cpu_ni_percent,
            p.cpu_id_percent,
            p.cpu_wa_percent,
            p.cpu_hi_percent,
            p.cpu_st_percent,
        ] {
            assert!((0.0..=1.0).contains(&v));
        }
    }
}

#[test]
fn cpu_negative_total_clamps_to_zero() {
    let prev = snapshot("m1", 1_000);
    let mut cur = prev.clone();
    cur.timestamp += 2;
    // host rebooted: accumulators restart near zero
    cur.cpu_user = 10;
    cur.cpu_system = 5;
    cur.cpu_idle = 40;
    let p = cpu_percentages(&cur, Some(&prev));
    assert_eq!(p, Default::default());
    assert_eq!(p.sum(), 0.0);
}

#[test]
fn cpu_regressed_slice_stays_within_unit_range() {
    let prev = snapshot("m1", 1_000);
    let mut cur = prev.clone();
    cur.timestamp += 2;
    cur.cpu_user = 500;
    cur.cpu_idle += 1_000;
    let p = cpu_percentages(&cur, Some(&prev));
    for v in [
        p.cpu_us_percent,
        p.cpu_sy_percent,
        p.cpu_ni_percent,
        p.cpu_id_percent,
        p.cpu_wa_percent,
        p.cpu_hi_percent,
        p.cpu_st_percent,
    ] {
        assert!((0.0..=1.0).contains(&v), "share {v} outside [0,1]");
    }
    assert_eq!(p.cpu_us_percent, 0.0);
    assert_eq!(p.cpu_id_percent, 1.0);
}

#[test]
fn cpu_frozen_counters_report_zero() {
    let prev = snapshot("m1", 1_000);
    let mut cur = prev.clone();
    cur.timestamp += 2;
    assert_eq!(cpu_percentages(&cur, Some(&prev)).sum(), 0.0);
}

#[test]
fn memory_composite() {
    let m = memory_usage(16384, 4096, 2048);
    assert_eq!(m.mem_really_used_mib, 10240);
    // 0.625 rounded to two decimals
    assert_eq!(m.mem_used_total_percent, 0.63);
}

#[test]
fn network_rate_and_floor() {
    let prev = snapshot("m1", 1_000);
    let cur = advance(&prev, 10);
    let n = network_speed(&cur, Some(&prev));
    assert_eq!(n.net_rx_speed_kib, 2.0);
    assert_eq!(n.net_tx_speed_kib, 1.0);

    let mut reset: RawSnapshot = cur.clone();
    reset.default_interface_net_rx_bytes = 10;
    reset.default_interface_net_tx_bytes = 0;
    let n = network_speed(&reset, Some(&prev));
    assert_eq!(n.net_rx_speed_kib, 0.0);
    assert_eq!(n.net_tx_speed_kib, 0.0);
}

#[test]
fn network_identical_timestamps_do_not_divide_by_zero() {
    let prev = snapshot("m1", 1_000);
    let mut cur = advance(&prev, 10);
    cur.timestamp = prev.timestamp;
    let n = network_speed(&cur, Some(&prev));
    assert_eq!(n.net_rx_speed_kib, 0.0);
    assert_eq!(n.net_tx_speed_kib, 0.0);
}
