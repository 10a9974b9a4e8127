//! Sliding 60-second event windows.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

/// Width of the rolling window used for all recent-activity metrics.
pub const WINDOW: Duration = Duration::from_secs(60);

/// Time-ordered window of event timestamps.
///
/// Entries are appended in arrival order, so eviction is a prefix trim. An
/// entry recorded at `t` is live while `now - t < WINDOW` and expired once
/// `now - t >= WINDOW`.
#[derive(Debug, Default)]
pub struct EventWindow {
    entries: VecDeque<Instant>,
}

impl EventWindow {
    pub fn push(&mut self, at: Instant) {
        self.entries.push_back(at);
    }

    /// Drop expired entries from the front.
    pub fn evict(&mut self, now: Instant) {
        while let Some(&front) = self.entries.front() {
            if now.duration_since(front) >= WINDOW {
                self.entries.pop_front();
            } else {
                break;
            }
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Time-ordered window of successful-request latencies.
#[derive(Debug, Default)]
pub struct LatencyWindow {
    entries: VecDeque<(Instant, u64)>,
}

impl LatencyWindow {
    pub fn push(&mut self, at: Instant, latency_ms: u64) {
        self.entries.push_back((at, latency_ms));
    }

    pub fn evict(&mut self, now: Instant) {
        while let Some(&(front, _)) = self.entries.front() {
            if now.duration_since(front) >= WINDOW {
                self.entries.pop_front();
            } else {
                break;
            }
        }
    }

    /// Arithmetic mean over the live window, `None` when empty.
    pub fn mean(&self) -> Option<f64> {
        if self.entries.is_empty() {
            return None;
        }
        let sum: u64 = self.entries.iter().map(|&(_, ms)| ms).sum();
        Some(sum as f64 / self.entries.len() as f64)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}
