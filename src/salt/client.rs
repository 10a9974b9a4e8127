//! Adaptive failover salt retrieval.

use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::time;
use url::Url;

use crate::error::{AttemptError, BlindHashError, BlindHashResult};
use crate::protocol;
use crate::salt::types::{SaltResponse, SaltWire};
use crate::session::Session;
use crate::stats::StatsTracker;

/// Issues salt requests with per-attempt deadlines and host failover.
#[derive(Debug, Clone)]
pub struct SaltClient {
    http: reqwest::Client,
    session: Arc<Session>,
    stats: Arc<StatsTracker>,
}

impl SaltClient {
    pub fn new(http: reqwest::Client, session: Arc<Session>, stats: Arc<StatsTracker>) -> Self {
        Self {
            http,
            session,
            stats,
        }
    }

    /// Retrieve `salt2` for a `hash1`, optionally pinned to a version.
    ///
    /// `None` or `Some(0)` requests the latest settings. Attempt `i` targets
    /// `hosts[i % len]` of the current preference snapshot, so retries walk
    /// down the ranked list and wrap around. Per-attempt failures are
    /// recorded and absorbed; only exhaustion of the retry budget surfaces.
    pub async fn get_salt(
        &self,
        hash1_hex: &str,
        version_id: Option<u64>,
    ) -> BlindHashResult<SaltResponse> {
        protocol::decode_hex("hash1Hex", hash1_hex)?;
        let version = normalize_version(version_id);

        let deadline = self.session.timeout();
        let max_retries = self.session.max_retries();
        let mut attempt: u32 = 0;

        loop {
            // Re-read the snapshot each attempt: a concurrent re-rank may
            // redirect where the next attempt goes.
            let hosts = self.session.hosts();
            let host = &hosts[attempt as usize % hosts.len()];

            let started = Instant::now();
            match self.attempt(host, hash1_hex, version, deadline).await {
                Ok(response) => {
                    self.stats.record_success(host, started.elapsed());
                    return Ok(response);
                }
                Err(err) => {
                    if err.is_timeout() {
                        self.stats.record_timeout(host);
                    } else {
                        self.stats.record_error(host);
                    }
                    tracing::warn!(host = %host, attempt, error = %err, "Salt request attempt failed");

                    if attempt >= max_retries {
                        tracing::error!(attempts = attempt + 1, error = %err, "Salt retrieval exhausted");
                        return Err(BlindHashError::Exhausted {
                            attempts: attempt + 1,
                            source: err,
                        });
                    }
                    attempt += 1;
                }
            }
        }
    }

    /// One request against one host under one deadline.
    async fn attempt(
        &self,
        host: &Url,
        hash1_hex: &str,
        version: Option<u64>,
        deadline: Duration,
    ) -> Result<SaltResponse, AttemptError> {
        let url = salt_url(host, self.session.app_id(), hash1_hex, version);

        let request = async {
            let response = self.http.get(url).send().await?;
            let status = response.status();
            if !status.is_success() {
                return Err(AttemptError::Remote(format!("status {}", status.as_u16())));
            }

            let body = response.text().await?;
            let wire: SaltWire = serde_json::from_str(&body)
                .map_err(|e| AttemptError::Remote(format!("malformed body: {e}")))?;
            SaltResponse::from_wire(wire, version)
        };

        match time::timeout(deadline, request).await {
            Ok(result) => result,
            Err(_) => Err(AttemptError::Timeout(deadline.as_millis() as u64)),
        }
    }
}

/// Absent, zero, and empty all mean "use latest".
fn normalize_version(version_id: Option<u64>) -> Option<u64> {
    version_id.filter(|&v| v != 0)
}

/// `{host}/{appId}/{hash1Hex}/{versionId-or-empty}`; a latest request ends
/// with an empty final segment, matching the service's path contract.
fn salt_url(host: &Url, app_id: &str, hash1_hex: &str, version: Option<u64>) -> Url {
    let segment = version.map(|v| v.to_string()).unwrap_or_default();
    let mut url = host.clone();
    url.set_path(&format!("/{app_id}/{hash1_hex}/{segment}"));
    url
}
