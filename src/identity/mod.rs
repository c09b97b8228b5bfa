//! Identity material loading and transaction signing.
//!
//! # Data Flow
//! ```text
//! configured file paths (CERT_PATH, KEY_PATH)
//!     → credentials.rs (certificate bytes + MSP id → Identity)
//!     → signer.rs (PKCS#8 PEM key → TransactionSigner)
//!     → gateway session (signs every proposal)
//! ```
//!
//! # Security Constraints
//! - Private key material never leaves the signer
//! - Keys are never logged, serialized or exposed through accessors
//! - Filesystem reads only; no network I/O

pub mod credentials;
pub mod signer;

pub use credentials::Identity;
pub use signer::TransactionSigner;
