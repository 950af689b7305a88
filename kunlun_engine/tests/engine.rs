//! Engine coordination: dedup, restart handling, freshness and assembly.

mod common;

use common::{advance, snapshot};
use kunlun_engine::{
    decode_batch, enrich_at, is_stale, Engine, EngineError, Observation, RawSnapshot,
    SnapshotStore, UptimeRegression,
};

#[test]
fn identical_snapshot_is_stored_once_and_not_enriched() {
    let mut engine = Engine::new();
    let s = snapshot("m1", 1_000);
    let mut enriched = 0;
    for _ in 0..2 {
        if engine.ingest(s.clone(), 1_001).is_some() {
            enriched += 1;
        }
    }
    assert_eq!(enriched, 1);
    assert_eq!(engine.store().len(), 1);
    assert_eq!(engine.store().get("m1"), Some(&s));
}

#[test]
fn store_observe_reports_previous() {
    let mut store = SnapshotStore::new();
    let a = snapshot("m1", 1_000);
    let b = advance(&a, 2);
    assert_eq!(store.observe(&a), Observation::Fresh { previous: None });
    assert_eq!(store.observe(&a), Observation::Repeat);
    assert_eq!(
        store.observe(&b),
        Observation::Fresh {
            previous: Some(a.clone())
        }
    );
    assert_eq!(store.get("m1"), Some(&b));
    assert!(store.get("m2").is_none());
}

#[test]
fn same_timestamp_different_counters_is_not_a_repeat() {
    let mut engine = Engine::new();
    let a = snapshot("m1", 1_000);
    let mut b = a.clone();
    b.tcp_connections += 1;
    assert!(engine.ingest(a, 1_000).is_some());
    let r = engine.ingest(b, 1_000).expect("distinct snapshot enriched");
    // zero interval: no rate can be derived
    assert_eq!(r.net.net_rx_speed_kib, 0.0);
    assert_eq!(r.disk.disk_reads_per_second, 0.0);
}

#[test]
fn second_snapshot_yields_rates() {
    let mut engine = Engine::new();
    let a = snapshot("m1", 1_000);
    let b = advance(&a, 10);
    let first = engine.ingest(a, 1_000).unwrap();
    assert_eq!(first.disk.disk_reads_per_second, 0.0);
    let second = engine.ingest(b, 1_010).unwrap();
    assert_eq!(second.disk.disk_reads_per_second, 5.0);
    assert_eq!(second.net.net_rx_speed_kib, 2.0);
    assert_eq!(second.cpu.cpu_us_percent, 0.3);
    assert_eq!(second.cpu.cpu_id_percent, 0.6);
}

#[test]
fn entities_are_independent() {
    let mut engine = Engine::new();
    let a1 = snapshot("a", 1_000);
    let b1 = snapshot("b", 1_000);
    let a2 = advance(&a1, 10);
    let out = engine.ingest_batch(vec![a1, b1.clone(), a2, b1], 1_010);
    assert_eq!(out.len(), 3);
    assert_eq!(out[2].machine_id(), "a");
    assert_eq!(out[2].disk.disk_reads_per_second, 5.0);
    assert_eq!(engine.store().len(), 2);
}

#[test]
fn uptime_regression_discards_previous() {
    let a = snapshot("m1", 1_000);
    let mut rebooted = a.clone();
    rebooted.timestamp += 30;
    rebooted.uptime_s = 20;
    rebooted.cpu_user = 30;
    rebooted.cpu_system = 10;
    rebooted.cpu_nice = 0;
    rebooted.cpu_idle = 60;
    rebooted.cpu_iowait = 0;
    rebooted.cpu_irq = 0;
    rebooted.cpu_steal = 0;
    rebooted.reads_completed = 10;

    let mut clamp = Engine::new();
    clamp.ingest(a.clone(), 1_000);
    let r = clamp.ingest(rebooted.clone(), 1_030).unwrap();
    assert_eq!(r.cpu.sum(), 0.0);
    assert_eq!(r.disk.disk_reads_per_second, 0.0);

    let mut uptime = Engine::new().with_detector(Box::new(UptimeRegression));
    uptime.ingest(a, 1_000);
    let r = uptime.ingest(rebooted, 1_030).unwrap();
    assert_eq!(r.cpu.cpu_us_percent, 0.3);
    assert_eq!(r.cpu.cpu_id_percent, 0.6);
    // no valid predecessor, so no interval rates
    assert_eq!(r.disk.disk_reads_per_second, 0.0);
}

#[test]
fn freshness_boundary() {
    assert!(!is_stale(1_000, 1_060));
    assert!(is_stale(1_000, 1_061));
}

#[test]
fn stored_reports_go_offline_without_new_snapshots() {
    let mut engine = Engine::new();
    let r = engine.ingest(snapshot("m1", 1_000), 1_010).unwrap();
    assert!(!r.summary.is_offline);
    assert_eq!(engine.online_count(1_060), (1, 1));
    assert_eq!(engine.online_count(1_061), (0, 1));
    let later = engine.reports(1_100);
    assert!(later[0].summary.is_offline);
    let back = engine.reports(1_030);
    assert!(!back[0].summary.is_offline);
}

#[test]
fn custom_stale_threshold() {
    let mut engine = Engine::new().with_stale_secs(5);
    let r = engine.ingest(snapshot("m1", 1_000), 1_006).unwrap();
    assert!(r.summary.is_offline);
}

#[test]
fn summary_strings() {
    let r = enrich_at(&snapshot("m1", 1_000), None, 1_000);
    let s = &r.summary;
    assert_eq!(s.load_averages_info, "0.5/0.75/1");
    assert_eq!(s.tasks_info, "3/210");
    assert_eq!(s.connection_info, "42/5");
    assert_eq!(s.traffic_info, "3/0.5");
    assert_eq!(s.uptime_days, 2.0);
    assert_eq!(s.root_disk_total_gib, 100.0);
    assert_eq!(s.root_disk_used_gib, 75.0);
    assert_eq!(s.root_disk_used_percent, 0.75);
    assert_eq!(s.update_at.len(), 8);
    assert!(!s.is_offline);
}

#[test]
fn serialized_report_is_flat_without_collisions() {
    let r = enrich_at(&snapshot("m1", 1_000), None, 1_000);
    let v = serde_json::to_value(&r).unwrap();
    let obj = v.as_object().expect("flat object");
    // 38 raw + 10 summary + 2 memory + 7 cpu + 2 net + 6 disk
    assert_eq!(obj.len(), 65);
    assert_eq!(obj["machine_id"], "m1");
    assert_eq!(obj["mem_really_used_mib"], 10_240);
    assert_eq!(obj["tasks_info"], "3/210");
    assert!(obj.contains_key("disk_utilization"));
}

#[test]
fn decode_rejects_missing_fields() {
    let mut v = serde_json::to_value(snapshot("m1", 1_000)).unwrap();
    v.as_object_mut().unwrap().remove("cpu_idle");
    let err = RawSnapshot::from_json(&v.to_string()).unwrap_err();
    assert!(matches!(err, EngineError::Decode(_)));

    let mut blank = snapshot("m1", 1_000);
    blank.machine_id = "  ".into();
    let err = RawSnapshot::from_json(&serde_json::to_string(&blank).unwrap()).unwrap_err();
    assert!(matches!(err, EngineError::MissingField("machine_id")));
}

#[test]
fn decode_batch_keeps_good_records() {
    let good = serde_json::to_value(snapshot("m1", 1_000)).unwrap();
    let body = serde_json::json!([good, {"machine_id": "broken"}]).to_string();
    let out = decode_batch(&body).unwrap();
    assert_eq!(out.len(), 2);
    assert!(out[0].is_ok());
    assert!(out[1].is_err());
    assert!(decode_batch("{\"not\": \"an array\"}").is_err());
}
