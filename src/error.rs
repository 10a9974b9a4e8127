//! Error taxonomy for the blind hashing client.
//!
//! # Design Decisions
//! - Per-attempt failures (`AttemptError`) are absorbed by the retry loop and
//!   recorded against the target host; callers only ever see the terminal
//!   `Exhausted` variant wrapping the last attempt's error
//! - Malformed caller input fails before any network activity
//! - Configuration fetch failure is fatal to initialization with no built-in
//!   retry; the caller may re-run initialization

use thiserror::Error;

pub use crate::config::ConfigError;

/// Failure of a single salt-request attempt against one host.
///
/// Never surfaced to callers directly; the retry loop records it and moves on
/// to the next host until the retry budget runs out.
#[derive(Debug, Error)]
pub enum AttemptError {
    /// Connection or request-level failure before a response arrived.
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Non-success status or malformed response body from the remote service.
    #[error("remote error: {0}")]
    Remote(String),

    /// The per-attempt deadline expired before the response completed.
    #[error("attempt timed out after {0}ms")]
    Timeout(u64),
}

impl AttemptError {
    /// Whether this attempt should be recorded as a timeout rather than an
    /// error in the host statistics.
    pub fn is_timeout(&self) -> bool {
        match self {
            AttemptError::Timeout(_) => true,
            AttemptError::Transport(e) => e.is_timeout(),
            AttemptError::Remote(_) => false,
        }
    }
}

/// Errors surfaced by the public client API.
#[derive(Debug, Error)]
pub enum BlindHashError {
    /// Configuration fetch failed or returned unusable data.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Caller supplied a malformed hex string; no request was issued.
    #[error("malformed hex input for '{field}'")]
    InputFormat { field: &'static str },

    /// Retry budget exhausted; wraps the last observed attempt failure.
    #[error("salt retrieval failed after {attempts} attempts: {source}")]
    Exhausted {
        attempts: u32,
        #[source]
        source: AttemptError,
    },
}

/// Result type for client operations.
pub type BlindHashResult<T> = Result<T, BlindHashError>;
