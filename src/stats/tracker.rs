//! Per-host statistics and adaptive host re-ranking.
//!
//! # Responsibilities
//! - Record the outcome of every salt-request attempt against its target host
//! - Periodically evict expired window entries and recompute derived rates
//! - Re-sort the session's host list so the most reliable, fastest hosts are
//!   tried first

use std::sync::Arc;
use std::time::{Duration, Instant};

use dashmap::DashMap;
use serde::Serialize;
use tokio::sync::watch;
use tokio::time;
use url::Url;

use crate::session::Session;
use crate::stats::histogram::LatencyHistogram;
use crate::stats::window::{EventWindow, LatencyWindow};

/// Interval between re-rank ticks.
pub const TICK_INTERVAL: Duration = Duration::from_secs(10);

/// Rolling statistics for a single host.
///
/// Created lazily on the first attempt against the host, lives for the
/// process lifetime.
#[derive(Debug, Default)]
pub struct HostStats {
    /// Lifetime counters, monotonically increasing.
    total_requests: u64,
    total_errors: u64,
    total_timeouts: u64,

    /// Lifetime latency distribution of successful requests.
    histogram: LatencyHistogram,

    /// 60-second sliding windows.
    recent_requests: EventWindow,
    recent_errors: EventWindow,
    recent_timeouts: EventWindow,
    recent_latencies: LatencyWindow,

    /// Derived values, recomputed on tick. A host with an empty request
    /// window has failure rate 0.0 and no latency.
    current_failure_rate: f64,
    current_latency: Option<f64>,
}

impl HostStats {
    fn record_success(&mut self, now: Instant, latency_ms: u64) {
        self.total_requests += 1;
        self.histogram.record(latency_ms);
        self.recent_requests.push(now);
        self.recent_latencies.push(now, latency_ms);
    }

    fn record_error(&mut self, now: Instant) {
        self.total_requests += 1;
        self.total_errors += 1;
        self.recent_requests.push(now);
        self.recent_errors.push(now);
    }

    fn record_timeout(&mut self, now: Instant) {
        self.total_requests += 1;
        self.total_timeouts += 1;
        self.recent_requests.push(now);
        self.recent_timeouts.push(now);
    }

    /// Evict expired window entries and recompute the derived rates.
    fn refresh(&mut self, now: Instant) {
        self.recent_requests.evict(now);
        self.recent_errors.evict(now);
        self.recent_timeouts.evict(now);
        self.recent_latencies.evict(now);

        let requests = self.recent_requests.len();
        self.current_failure_rate = if requests == 0 {
            0.0
        } else {
            (self.recent_errors.len() + self.recent_timeouts.len()) as f64 / requests as f64
        };
        self.current_latency = self.recent_latencies.mean();
    }

    /// Sort key: ascending failure rate, then ascending mean latency with
    /// unused hosts treated as slowest in their tier.
    fn rank_key(&self) -> (f64, f64) {
        (
            self.current_failure_rate,
            self.current_latency.unwrap_or(f64::INFINITY),
        )
    }
}

/// Serializable per-host view for observability.
#[derive(Debug, Clone, Serialize)]
pub struct HostSnapshot {
    pub host: String,
    pub total_requests: u64,
    pub total_errors: u64,
    pub total_timeouts: u64,
    pub latency_histogram: LatencyHistogram,
    pub recent_requests: usize,
    pub recent_errors: usize,
    pub recent_timeouts: usize,
    pub failure_rate: f64,
    pub mean_latency_ms: Option<f64>,
}

/// Tracks per-host statistics and re-ranks the session host list.
#[derive(Debug)]
pub struct StatsTracker {
    enabled: bool,
    hosts: DashMap<String, HostStats>,
}

impl StatsTracker {
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            hosts: DashMap::new(),
        }
    }

    pub fn enabled(&self) -> bool {
        self.enabled
    }

    pub fn record_success(&self, host: &Url, latency: Duration) {
        self.record_success_at(host, Instant::now(), latency.as_millis() as u64);
    }

    pub fn record_error(&self, host: &Url) {
        self.record_error_at(host, Instant::now());
    }

    pub fn record_timeout(&self, host: &Url) {
        self.record_timeout_at(host, Instant::now());
    }

    pub(crate) fn record_success_at(&self, host: &Url, now: Instant, latency_ms: u64) {
        if !self.enabled {
            return;
        }
        self.hosts
            .entry(host.as_str().to_string())
            .or_default()
            .record_success(now, latency_ms);
    }

    pub(crate) fn record_error_at(&self, host: &Url, now: Instant) {
        if !self.enabled {
            return;
        }
        self.hosts
            .entry(host.as_str().to_string())
            .or_default()
            .record_error(now);
    }

    pub(crate) fn record_timeout_at(&self, host: &Url, now: Instant) {
        if !self.enabled {
            return;
        }
        self.hosts
            .entry(host.as_str().to_string())
            .or_default()
            .record_timeout(now);
    }

    /// One maintenance pass: evict expired entries, recompute derived rates,
    /// and atomically replace the session's host order.
    pub fn tick(&self, session: &Session) {
        self.tick_at(session, Instant::now());
    }

    pub(crate) fn tick_at(&self, session: &Session, now: Instant) {
        if !self.enabled {
            return;
        }

        for mut entry in self.hosts.iter_mut() {
            entry.value_mut().refresh(now);
        }

        let current = session.hosts();
        let ranked = self.rank(&current);
        if ranked != *current {
            tracing::debug!(order = ?ranked.iter().map(Url::as_str).collect::<Vec<_>>(),
                "Host preference order updated");
        }
        session.replace_hosts(ranked);
    }

    /// Stable sort of the host list by the recorded rank keys. Hosts with no
    /// stats entry yet rank as unused (failure rate 0.0, unknown latency),
    /// and stability keeps the configured order among untouched hosts.
    fn rank(&self, hosts: &[Url]) -> Vec<Url> {
        let mut ranked: Vec<Url> = hosts.to_vec();
        ranked.sort_by(|a, b| {
            let ka = self.rank_key(a);
            let kb = self.rank_key(b);
            ka.0.total_cmp(&kb.0).then(ka.1.total_cmp(&kb.1))
        });
        ranked
    }

    fn rank_key(&self, host: &Url) -> (f64, f64) {
        self.hosts
            .get(host.as_str())
            .map(|stats| stats.rank_key())
            .unwrap_or((0.0, f64::INFINITY))
    }

    /// Snapshot of all known hosts as of the last tick.
    pub fn snapshot(&self) -> Vec<HostSnapshot> {
        self.hosts
            .iter()
            .map(|entry| {
                let stats = entry.value();
                HostSnapshot {
                    host: entry.key().clone(),
                    total_requests: stats.total_requests,
                    total_errors: stats.total_errors,
                    total_timeouts: stats.total_timeouts,
                    latency_histogram: stats.histogram.clone(),
                    recent_requests: stats.recent_requests.len(),
                    recent_errors: stats.recent_errors.len(),
                    recent_timeouts: stats.recent_timeouts.len(),
                    failure_rate: stats.current_failure_rate,
                    mean_latency_ms: stats.current_latency,
                }
            })
            .collect()
    }

    /// Periodic tick loop. Exits when the shutdown sender is dropped or
    /// signals true. Not spawned at all when statistics are disabled.
    pub async fn run(self: Arc<Self>, session: Arc<Session>, mut shutdown: watch::Receiver<bool>) {
        tracing::info!(interval_secs = TICK_INTERVAL.as_secs(), "Stats tracker starting");

        let mut ticker = time::interval(TICK_INTERVAL);
        ticker.set_missed_tick_behavior(time::MissedTickBehavior::Delay);
        // interval fires immediately; skip the startup tick.
        ticker.tick().await;

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    self.tick(&session);
                }
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        tracing::debug!("Stats tracker shutting down");
                        break;
                    }
                }
            }
        }
    }
}
