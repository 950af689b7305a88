//! Runtime toggles read once from the environment.

use once_cell::sync::OnceCell;

pub const DEFAULT_PORT: u16 = 8080;

fn env_string(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// Interface to report instead of the default-route one.
pub fn iface_override() -> Option<&'static str> {
    static V: OnceCell<Option<String>> = OnceCell::new();
    V.get_or_init(|| env_string("KUNLUN_AGENT_IFACE")).as_deref()
}

/// Block device to report instead of the first busy whole disk.
pub fn disk_override() -> Option<&'static str> {
    static V: OnceCell<Option<String>> = OnceCell::new();
    V.get_or_init(|| env_string("KUNLUN_AGENT_DISK")).as_deref()
}

/// Disk latency probe (small synced write); on unless set to "0".
pub fn disk_probe_enabled() -> bool {
    static ON: OnceCell<bool> = OnceCell::new();
    *ON.get_or_init(|| {
        std::env::var("KUNLUN_AGENT_DISK_PROBE")
            .map(|v| v != "0")
            .unwrap_or(true)
    })
}

pub fn client_id() -> u64 {
    env_string("KUNLUN_AGENT_CLIENT_ID")
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(0)
}

pub fn parse_port<I: IntoIterator<Item = String>>(args: I, default_port: u16) -> u16 {
    let mut it = args.into_iter();
    let _ = it.next(); // program name
    let mut long: Option<String> = None;
    let mut short: Option<String> = None;
    while let Some(a) = it.next() {
        match a.as_str() {
            "--port" => long = it.next(),
            "-p" => short = it.next(),
            _ if a.starts_with("--port=") => {
                if let Some((_, v)) = a.split_once('=') {
                    long = Some(v.to_string());
                }
            }
            _ => {}
        }
    }
    long.or(short)
        .or_else(|| env_string("KUNLUN_AGENT_PORT"))
        .and_then(|s| s.parse::<u16>().ok())
        .unwrap_or(default_port)
}
