//! Parsers for the /proc files the agent reads. Pure functions over file
//! contents so they can be tested off-Linux.

use std::collections::HashMap;

/// Aggregate "cpu" line of /proc/stat: user nice system idle iowait irq softirq steal
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CpuLine {
    pub user: u64,
    pub nice: u64,
    pub system: u64,
    pub idle: u64,
    pub iowait: u64,
    pub irq: u64,
    pub softirq: u64,
    pub steal: u64,
}

/// Returns the aggregate line and the number of per-core lines.
pub fn parse_stat(s: &str) -> Option<(CpuLine, u64)> {
    let mut agg = None;
    let mut cores = 0u64;
    for line in s.lines() {
        let mut it = line.split_whitespace();
        match it.next() {
            Some("cpu") => {
                let v: Vec<u64> = it.take(8).map(|t| t.parse().unwrap_or(0)).collect();
                // older kernels lack steal
                let get = |i: usize| v.get(i).copied().unwrap_or(0);
                agg = Some(CpuLine {
                    user: get(0),
                    nice: get(1),
                    system: get(2),
                    idle: get(3),
                    iowait: get(4),
                    irq: get(5),
                    softirq: get(6),
                    steal: get(7),
                });
            }
            Some(tag) if tag.starts_with("cpu") => cores += 1,
            _ => {}
        }
    }
    agg.map(|a| (a, cores.max(1)))
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct MemInfo {
    pub total_mib: u64,
    pub free_mib: u64,
    pub buff_cache_mib: u64,
}

impl MemInfo {
    pub fn used_mib(&self) -> u64 {
        self.total_mib.saturating_sub(self.free_mib)
    }
}

pub fn parse_meminfo(s: &str) -> MemInfo {
    let kb: HashMap<&str, u64> = s
        .lines()
        .filter_map(|line| {
            let (key, rest) = line.split_once(':')?;
            let v = rest.split_whitespace().next()?.parse().ok()?;
            Some((key.trim(), v))
        })
        .collect();
    let get = |k: &str| kb.get(k).copied().unwrap_or(0);
    MemInfo {
        total_mib: get("MemTotal") / 1024,
        free_mib: get("MemFree") / 1024,
        buff_cache_mib: (get("Buffers") + get("Cached") + get("SReclaimable")) / 1024,
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct LoadAvg {
    pub one: f64,
    pub five: f64,
    pub fifteen: f64,
    pub running: u64,
    pub total: u64,
}

/// "0.52 0.58 0.59 2/1024 12345"
pub fn parse_loadavg(s: &str) -> Option<LoadAvg> {
    let mut it = s.split_whitespace();
    let one = it.next()?.parse().ok()?;
    let five = it.next()?.parse().ok()?;
    let fifteen = it.next()?.parse().ok()?;
    let (running, total) = it.next()?.split_once('/')?;
    Some(LoadAvg {
        one,
        five,
        fifteen,
        running: running.parse().ok()?,
        total: total.parse().ok()?,
    })
}

/// Entries in a /proc/net/{tcp,udp}[6] table (header excluded).
pub fn count_sockets(s: &str) -> u64 {
    s.lines()
        .skip(1)
        .filter(|l| !l.trim().is_empty())
        .count() as u64
}

/// Interface carrying the default route in /proc/net/route.
pub fn default_iface(route: &str) -> Option<String> {
    route.lines().skip(1).find_map(|line| {
        let mut it = line.split_whitespace();
        let iface = it.next()?;
        (it.next()? == "00000000").then(|| iface.to_string())
    })
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct DiskStats {
    pub name: String,
    pub reads_completed: u64,
    pub reading_ms: u64,
    pub writes_completed: u64,
    pub writing_ms: u64,
    pub ios_in_progress: u64,
    pub iotime_ms: u64,
    pub weighted_io_time: u64,
}

fn parse_diskstats_line(line: &str) -> Option<DiskStats> {
    let f: Vec<&str> = line.split_whitespace().collect();
    if f.len() < 14 {
        return None;
    }
    let n = |i: usize| f[i].parse::<u64>().ok();
    Some(DiskStats {
        name: f[2].to_string(),
        reads_completed: n(3)?,
        reading_ms: n(6)?,
        writes_completed: n(7)?,
        writing_ms: n(10)?,
        ios_in_progress: n(11)?,
        iotime_ms: n(12)?,
        weighted_io_time: n(13)?,
    })
}

/// Whole physical disks only: no partitions, loop, ram or device-mapper nodes.
pub fn is_whole_disk(name: &str) -> bool {
    const VIRTUAL: [&str; 7] = ["loop", "ram", "zram", "dm-", "sr", "fd", "md"];
    if VIRTUAL.iter().any(|p| name.starts_with(p)) {
        return false;
    }
    for prefix in ["nvme", "mmcblk"] {
        if let Some(rest) = name.strip_prefix(prefix) {
            return !rest.contains('p');
        }
    }
    !name.ends_with(|c: char| c.is_ascii_digit())
}

/// The named device, or the first busy whole disk, or the first whole disk.
pub fn pick_disk(diskstats: &str, wanted: Option<&str>) -> Option<DiskStats> {
    let all: Vec<DiskStats> = diskstats.lines().filter_map(parse_diskstats_line).collect();
    if let Some(name) = wanted {
        return all.into_iter().find(|d| d.name == name);
    }
    let mut whole = all.into_iter().filter(|d| is_whole_disk(&d.name));
    let first = whole.next()?;
    if first.reads_completed > 0 {
        return Some(first);
    }
    Some(whole.find(|d| d.reads_completed > 0).unwrap_or(first))
}
