//! Lifetime latency histogram.

use serde::Serialize;

/// Bucket width in milliseconds.
pub const BUCKET_WIDTH_MS: u64 = 20;

/// Number of bounded buckets; values at or above
/// `BUCKET_COUNT * BUCKET_WIDTH_MS` land in the overflow bucket.
pub const BUCKET_COUNT: usize = 5;

/// Fixed-bucket histogram of successful-request latencies.
///
/// Bucket `i` covers `[i * 20ms, (i + 1) * 20ms)` for `i < 5`; the final
/// bucket counts everything at 100ms and above. The boundary value itself
/// overflows, which keeps bucketing a single integer division.
#[derive(Debug, Default, Clone, Serialize)]
pub struct LatencyHistogram {
    buckets: [u64; BUCKET_COUNT + 1],
}

impl LatencyHistogram {
    pub fn record(&mut self, latency_ms: u64) {
        let index = ((latency_ms / BUCKET_WIDTH_MS) as usize).min(BUCKET_COUNT);
        self.buckets[index] += 1;
    }

    pub fn buckets(&self) -> &[u64; BUCKET_COUNT + 1] {
        &self.buckets
    }
}
