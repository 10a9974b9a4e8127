//! Host statistics subsystem.
//!
//! # Data Flow
//! ```text
//! Salt request attempt concludes:
//!     → tracker.rs (record success/error/timeout for the target host)
//!         → window.rs (append to 60-second sliding windows)
//!         → histogram.rs (append to lifetime latency histogram)
//!
//! Every 10 seconds:
//!     → tracker.rs tick (evict expired window entries, recompute
//!       failure rate and mean latency, re-rank the session host list)
//! ```
//!
//! # Design Decisions
//! - Windows are time-ordered deques, so eviction is a prefix trim
//! - Derived rates are recomputed on tick and cached; snapshots report the
//!   values as of the last tick
//! - Ranking prefers low failure rate, then low mean latency; a host with no
//!   recent traffic sorts last within its reliability tier
//! - When statistics are disabled every recording call is a no-op and the
//!   configured host order is left alone

pub mod histogram;
pub mod tracker;
pub mod window;

pub use tracker::{HostSnapshot, StatsTracker};
