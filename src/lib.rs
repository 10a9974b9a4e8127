//! Resilient multi-host blind hashing client.
//!
//! The client exchanges a locally computed password hash (`hash1`) for a
//! server-issued salt (`salt2`) and derives the value actually stored for
//! authentication, `hash2 = HMAC-SHA512(salt2, hash1)`. Neither the plaintext
//! password nor an offline-crackable artifact ever leaves the process.
//!
//! # Architecture Overview
//!
//! ```text
//! verify_password / new_password
//!         │
//!         ▼
//!   ┌───────────┐    ┌──────────────┐    ┌─────────────────┐
//!   │  client   │───▶│     salt     │───▶│  remote salt    │
//!   │ (public   │    │ (failover +  │    │  service hosts  │
//!   │  API)     │    │  deadlines)  │    │  (preference    │
//!   └───────────┘    └──────┬───────┘    │   ordered)      │
//!         │                 │            └─────────────────┘
//!         ▼                 ▼ outcome per attempt
//!   ┌───────────┐    ┌──────────────┐
//!   │ protocol  │    │    stats     │── every 10s: evict, re-rank ──┐
//!   │ (HMAC)    │    │ (per-host    │                               │
//!   └───────────┘    │  windows)    │                               ▼
//!                    └──────────────┘                      session host order
//! ```
//!
//! Per-attempt failures are recorded and retried against the next host in the
//! preference order; the order itself adapts continuously to observed failure
//! rates and latencies.

pub mod client;
pub mod config;
pub mod error;
pub mod protocol;
pub mod salt;
pub mod session;
pub mod stats;

pub use client::{BlindHashClient, NewPassword, VerifyOutcome, DEFAULT_API_BASE};
pub use config::AppConfig;
pub use error::{AttemptError, BlindHashError, BlindHashResult};
pub use salt::SaltResponse;
pub use stats::HostSnapshot;
