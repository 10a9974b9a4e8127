//! Salt retrieval subsystem.
//!
//! # Data Flow
//! ```text
//! get_salt(hash1Hex, versionId?)
//!     → client.rs (attempt i targets hosts[i % len], per-attempt deadline)
//!         → success: record latency, return SaltResponse
//!         → failure: record error/timeout, try next host
//!     → retry budget exhausted: Exhausted wrapping the last attempt error
//! ```
//!
//! # Design Decisions
//! - Retries walk the preference-ordered host list, so a single unreachable
//!   host can never exhaust the budget on its own
//! - Attempts are strictly sequential; there are no speculative requests
//! - The attempt future is dropped when its deadline expires, so an attempt
//!   can never count as both a success and a timeout

pub mod client;
pub mod types;

pub use client::SaltClient;
pub use types::SaltResponse;
