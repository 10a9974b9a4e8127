//! Client session state.
//!
//! # Responsibilities
//! - Hold the application identity and tunables, immutable after construction
//! - Own the preference-ordered host list
//! - Serve lock-free host-list snapshots to in-flight requests while the
//!   stats tracker replaces the order atomically
//!
//! # Design Decisions
//! - The host list is behind `ArcSwap`: readers take a cheap snapshot, the
//!   periodic re-rank swaps in a freshly sorted vector, and a reorder landing
//!   mid-retry-sequence simply redirects the next attempt

use std::sync::Arc;
use std::time::Duration;

use arc_swap::ArcSwap;
use url::Url;

use crate::config::schema::{AppConfig, ConfigError};

/// Shared session state for one application.
#[derive(Debug)]
pub struct Session {
    /// Opaque application identifier.
    app_id: String,
    /// Preference-ordered host base URLs, most preferred first. Never empty.
    hosts: ArcSwap<Vec<Url>>,
    /// Per-attempt deadline.
    timeout: Duration,
    /// Retries allowed after the initial attempt.
    max_retries: u32,
    /// Whether statistics recording and re-ranking are active.
    stats_enabled: bool,
}

impl Session {
    /// Build a session from a validated configuration.
    ///
    /// Fails when the server list is empty or contains unparsable addresses;
    /// an operational session always has at least one host.
    pub fn new(app_id: impl Into<String>, config: &AppConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let hosts = config.server_urls()?;

        Ok(Self {
            app_id: app_id.into(),
            hosts: ArcSwap::from_pointee(hosts),
            timeout: Duration::from_millis(config.timeout),
            max_retries: config.retries,
            stats_enabled: config.stats,
        })
    }

    pub fn app_id(&self) -> &str {
        &self.app_id
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn max_retries(&self) -> u32 {
        self.max_retries
    }

    pub fn stats_enabled(&self) -> bool {
        self.stats_enabled
    }

    /// Snapshot of the current host preference order.
    pub fn hosts(&self) -> Arc<Vec<Url>> {
        self.hosts.load_full()
    }

    /// Atomically replace the host order. Empty replacements are ignored to
    /// preserve the non-empty invariant.
    pub fn replace_hosts(&self, hosts: Vec<Url>) {
        if hosts.is_empty() {
            tracing::warn!("Ignoring empty host-list replacement");
            return;
        }
        self.hosts.store(Arc::new(hosts));
    }
}
