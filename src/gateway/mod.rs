//! Ledger gateway client subsystem.
//!
//! # Data Flow
//! ```text
//! configured peer endpoint + trust root
//!     → transport.rs (TLS channel, hostname override, created once)
//!     → session.rs (channel + identity + signer + timeout policy)
//!     → contract.rs (evaluate / submit / submit_async with deadlines)
//!     → peer gateway service (proto/gateway/v1)
//! ```
//!
//! # Failure Contract
//! - Startup errors (trust root, handshake) are fatal; no serving state
//! - Evaluate errors are retry-safe for callers; write-path errors are not
//! - Every write-path outcome or error carries a transaction id

pub mod contract;
pub mod session;
pub mod transport;
pub mod types;

/// Generated wire types for the `gateway.v1` protocol.
pub mod proto {
    tonic::include_proto!("gateway.v1");
}

pub use contract::{Contract, SubmittedTransaction};
pub use session::{GatewaySession, TimeoutPolicy};
pub use types::{CommitOutcome, GatewayError, GatewayResult, TransactionOutcome};
