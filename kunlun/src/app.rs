//! Poll loop: fetch latest snapshots, enrich them, print what changed.

use std::sync::Arc;
use std::time::Duration;

use kunlun_engine::{now_unix, Engine, EnrichedReport, Granularity};
use tokio::sync::Mutex;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

use crate::config::Settings;
use crate::source::{SnapshotSource, SourceError};
use crate::view;

// One engine per process; the lock serializes each id's compare-then-replace
// between the poll loop and anything else holding the handle.
pub type SharedEngine = Arc<Mutex<Engine>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Output {
    Text,
    Json,
}

pub struct App {
    engine: SharedEngine,
    interval: Duration,
    output: Output,
}

impl App {
    pub fn new(settings: &Settings, output: Output) -> Self {
        Self {
            engine: Arc::new(Mutex::new(settings.build_engine())),
            interval: settings.interval,
            output,
        }
    }

    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    pub fn engine(&self) -> SharedEngine {
        self.engine.clone()
    }

    /// One poll: fetch and ingest in arrival order. On fetch failure nothing
    /// is recorded.
    pub async fn tick<S: SnapshotSource>(&self, source: &S) -> Result<Vec<EnrichedReport>, SourceError> {
        let batch = source.fetch_latest().await?;
        let now = now_unix();
        let mut engine = self.engine.lock().await;
        let changed = engine.ingest_batch(batch, now);
        debug!(changed = changed.len(), hosts = engine.store().len(), "poll done");
        Ok(changed)
    }

    pub async fn run<S: SnapshotSource>(&self, source: &S, once: bool) -> anyhow::Result<()> {
        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        info!(interval_ms = self.interval.as_millis() as u64, "polling");
        loop {
            tokio::select! {
                _ = ticker.tick() => {}
                _ = tokio::signal::ctrl_c() => {
                    info!("interrupted");
                    break;
                }
            }
            match self.tick(source).await {
                Ok(changed) => self.render(&changed).await,
                Err(e) => warn!("fetch failed: {e}"),
            }
            if once {
                break;
            }
        }
        Ok(())
    }

    async fn render(&self, changed: &[EnrichedReport]) {
        match self.output {
            Output::Json => {
                for r in changed {
                    match serde_json::to_string(r) {
                        Ok(line) => println!("{line}"),
                        Err(e) => warn!("encode report: {e}"),
                    }
                }
            }
            Output::Text => {
                let now = now_unix();
                let mut engine = self.engine.lock().await;
                let (online, total) = engine.online_count(now);
                println!("{}", view::header(online, total));
                for r in engine.reports(now) {
                    println!("{}", view::report_line(&r));
                }
            }
        }
    }

    /// Fetch and print one history series.
    pub async fn history<S: SnapshotSource>(
        &self,
        source: &S,
        client_id: u64,
        level: Granularity,
    ) -> anyhow::Result<()> {
        let points = source.fetch_history(client_id, level).await?;
        info!(
            client_id,
            %level,
            step_secs = level.step_secs(),
            points = points.len(),
            "history ({})",
            level.label()
        );
        for p in &points {
            match self.output {
                Output::Json => println!("{}", serde_json::to_string(p)?),
                Output::Text => println!("{}", view::history_line(p)),
            }
        }
        Ok(())
    }
}
