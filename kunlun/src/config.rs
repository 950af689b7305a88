//! Runtime settings read from the environment, with defaults.

use std::time::Duration;

use kunlun_engine::restart::detector_from_name;
use kunlun_engine::{Engine, DEFAULT_STALE_SECS};

pub const DEFAULT_INTERVAL_MS: u64 = 2_000;
pub const DEFAULT_HTTP_TIMEOUT_MS: u64 = 5_000;

#[derive(Debug, Clone)]
pub struct Settings {
    pub interval: Duration,
    pub http_timeout: Duration,
    pub stale_secs: i64,
    /// "clamp" (default) or "uptime"
    pub restart_detect: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            interval: Duration::from_millis(DEFAULT_INTERVAL_MS),
            http_timeout: Duration::from_millis(DEFAULT_HTTP_TIMEOUT_MS),
            stale_secs: DEFAULT_STALE_SECS,
            restart_detect: "clamp".into(),
        }
    }
}

impl Settings {
    pub fn from_env() -> Self {
        let d = Self::default();
        Self {
            interval: d.interval,
            http_timeout: env_parse("KUNLUN_HTTP_TIMEOUT_MS")
                .map(Duration::from_millis)
                .unwrap_or(d.http_timeout),
            stale_secs: env_parse("KUNLUN_STALE_SECS").unwrap_or(d.stale_secs),
            restart_detect: std::env::var("KUNLUN_RESTART_DETECT").unwrap_or(d.restart_detect),
        }
    }

    pub fn build_engine(&self) -> Engine {
        Engine::new()
            .with_stale_secs(self.stale_secs)
            .with_detector(detector_from_name(&self.restart_detect))
    }
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|v| v.trim().parse().ok())
}
