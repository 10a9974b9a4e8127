//! Configuration subsystem.
//!
//! # Data Flow
//! ```text
//! BlindHashClient::init(app_id)
//!     → fetch.rs (one-shot GET {api_base}/{app_id})
//!     → schema.rs (deserialize + apply defaults + validate)
//!     → Session (immutable tunables + initial host order)
//! ```
//!
//! # Design Decisions
//! - Configuration is fetched exactly once at startup; there is no built-in
//!   retry or reload (the caller may re-run initialization)
//! - Defaults match the remote service contract: timeout 500ms, 3 retries,
//!   statistics disabled
//! - Validation runs before the config is accepted into the system

pub mod fetch;
pub mod schema;

pub use fetch::fetch_config;
pub use schema::{AppConfig, ConfigError};
