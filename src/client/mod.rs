//! Public client API.
//!
//! # Responsibilities
//! - Initialize a session from the remote configuration service
//! - Expose `verify_password`, `new_password`, `get_salt`, and `get_stats`
//! - Own the background stats tick task and its shutdown signal
//!
//! # Design Decisions
//! - One shared `reqwest::Client` provides the keep-alive connection pool
//!   reused across hosts and requests
//! - The tick task is only spawned when statistics are enabled; dropping the
//!   client stops it

use std::sync::Arc;

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use tokio::sync::watch;

use crate::config::{fetch_config, AppConfig};
use crate::error::BlindHashResult;
use crate::protocol;
use crate::salt::{SaltClient, SaltResponse};
use crate::session::Session;
use crate::stats::{HostSnapshot, StatsTracker};

/// Default configuration service endpoint.
pub const DEFAULT_API_BASE: &str = "https://api.blindhash.co";

/// Outcome of a password verification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifyOutcome {
    /// Whether the stored `hash2` matches the one derived for this password.
    pub matched: bool,
    /// Newer settings version, present only on a match when the server
    /// advertised an upgrade. Persist together with `new_hash2_hex`.
    pub new_version_id: Option<u64>,
    /// `hash2` derived under the newer settings.
    pub new_hash2_hex: Option<String>,
}

/// Result of deriving storage values for a new password.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPassword {
    pub hash2_hex: String,
    /// Settings version the hash was derived under; persist alongside it.
    pub version_id: u64,
}

/// Blind hashing client for one application.
///
/// Safe to share across tasks; any number of calls may be in flight at once.
#[derive(Debug)]
pub struct BlindHashClient {
    session: Arc<Session>,
    stats: Arc<StatsTracker>,
    salt: SaltClient,
    shutdown: watch::Sender<bool>,
}

impl BlindHashClient {
    /// Initialize against the default configuration service.
    pub async fn init(app_id: &str) -> BlindHashResult<Self> {
        Self::init_with_base(app_id, DEFAULT_API_BASE).await
    }

    /// Initialize against a specific configuration service endpoint.
    ///
    /// Performs the one-shot configuration fetch; failure is surfaced
    /// immediately and the caller may simply call again.
    pub async fn init_with_base(app_id: &str, base_url: &str) -> BlindHashResult<Self> {
        let http = http_client()?;
        let config = fetch_config(&http, base_url, app_id).await?;
        Self::build(app_id, &config, http)
    }

    /// Build a client from an already-obtained configuration, skipping the
    /// fetch. Must be called from within a Tokio runtime.
    pub fn from_config(app_id: &str, config: &AppConfig) -> BlindHashResult<Self> {
        let http = http_client()?;
        Self::build(app_id, config, http)
    }

    fn build(app_id: &str, config: &AppConfig, http: reqwest::Client) -> BlindHashResult<Self> {
        let session = Arc::new(Session::new(app_id, config)?);
        let stats = Arc::new(StatsTracker::new(config.stats));
        let (shutdown, shutdown_rx) = watch::channel(false);

        if stats.enabled() {
            tokio::spawn(Arc::clone(&stats).run(Arc::clone(&session), shutdown_rx));
        }

        tracing::info!(
            app_id,
            hosts = session.hosts().len(),
            stats = stats.enabled(),
            "Blind hashing client initialized"
        );

        let salt = SaltClient::new(http, Arc::clone(&session), Arc::clone(&stats));
        Ok(Self {
            session,
            stats,
            salt,
            shutdown,
        })
    }

    /// Verify a password stored using blind hashing.
    ///
    /// On a match, if newer settings are available the returned upgrade pair
    /// (`new_version_id`, `new_hash2_hex`) can be persisted together to move
    /// the user to the latest settings; both fields are absent on mismatch.
    pub async fn verify_password(
        &self,
        hash1_hex: &str,
        hash2_expected_hex: &str,
        version_id: Option<u64>,
    ) -> BlindHashResult<VerifyOutcome> {
        let hash1 = protocol::decode_hex("hash1Hex", hash1_hex)?;
        let expected = protocol::decode_hex("hash2ExpectedHex", hash2_expected_hex)?;

        let response = self.salt.get_salt(hash1_hex, version_id).await?;
        let salt2 = protocol::decode_hex("salt2Hex", &response.salt2_hex)?;

        let matched = protocol::hash2_matches(&hash1, &salt2, &expected);
        if !matched {
            return Ok(VerifyOutcome {
                matched: false,
                new_version_id: None,
                new_hash2_hex: None,
            });
        }

        if let Some((new_version_id, new_salt2_hex)) = response.upgrade() {
            let new_salt2 = protocol::decode_hex("newSalt2Hex", new_salt2_hex)?;
            return Ok(VerifyOutcome {
                matched: true,
                new_version_id: Some(new_version_id),
                new_hash2_hex: Some(protocol::derive_hash2_hex(&hash1, &new_salt2)),
            });
        }

        Ok(VerifyOutcome {
            matched: true,
            new_version_id: None,
            new_hash2_hex: None,
        })
    }

    /// Derive the storage values for a new password under the latest
    /// settings.
    pub async fn new_password(&self, hash1_hex: &str) -> BlindHashResult<NewPassword> {
        let hash1 = protocol::decode_hex("hash1Hex", hash1_hex)?;

        let response = self.salt.get_salt(hash1_hex, None).await?;
        let salt2 = protocol::decode_hex("salt2Hex", &response.salt2_hex)?;

        Ok(NewPassword {
            hash2_hex: protocol::derive_hash2_hex(&hash1, &salt2),
            version_id: response.version_id,
        })
    }

    /// Retrieve `salt2` directly. See [`SaltClient::get_salt`].
    pub async fn get_salt(
        &self,
        hash1_hex: &str,
        version_id: Option<u64>,
    ) -> BlindHashResult<SaltResponse> {
        self.salt.get_salt(hash1_hex, version_id).await
    }

    /// Per-host statistics as of the last tick; `None` when statistics are
    /// disabled.
    pub fn get_stats(&self) -> Option<Vec<HostSnapshot>> {
        self.stats.enabled().then(|| self.stats.snapshot())
    }

    /// Current host preference order, most preferred first.
    pub fn hosts(&self) -> Vec<String> {
        self.session
            .hosts()
            .iter()
            .map(|u| u.as_str().to_string())
            .collect()
    }

    /// Stop the background tick task. Dropping the client has the same
    /// effect; this makes it explicit.
    pub fn close(&self) {
        let _ = self.shutdown.send(true);
    }
}

fn http_client() -> Result<reqwest::Client, crate::config::ConfigError> {
    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

    Ok(reqwest::Client::builder()
        .user_agent(concat!("blindhash-rust/", env!("CARGO_PKG_VERSION")))
        .default_headers(headers)
        .build()?)
}
