//! HTTP request surface.
//!
//! # Data Flow
//! ```text
//! inbound request
//!     → server.rs (Axum router, CORS, trace, whole-request timeout)
//!     → one ledger operation (crate::ledger)
//!     → transaction executor (crate::gateway)
//!     → error.rs (gateway error → status code + JSON body)
//! ```
//!
//! # Design Decisions
//! - No HTTP-level authentication: the ledger identity/signature layer is
//!   the sole authentication boundary, and CORS is permissive
//! - The shared contract handle is injected as state; handlers hold no
//!   mutable cross-request state

pub mod error;
pub mod server;

pub use error::ApiError;
pub use server::HttpServer;
