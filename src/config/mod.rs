//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! process environment (CHANNEL_NAME, PEER_ENDPOINT, ...)
//!     → env.rs (resolve overrides, fall back to reference-network defaults)
//!     → validation.rs (semantic checks)
//!     → GatewayConfig (validated, immutable)
//!     → consumed once at startup; never reloaded
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; the session built from it lives for
//!   the whole process lifetime
//! - Every field has a default matching the local reference network
//!   topology, so an empty environment yields a working local setup
//! - Validation separates syntactic (serde/parse) from semantic checks and
//!   reports all violations, not just the first

pub mod env;
pub mod schema;
pub mod validation;

pub use env::{load_from_env, ConfigError};
pub use schema::{GatewayConfig, ListenerConfig, TimeoutConfig};
