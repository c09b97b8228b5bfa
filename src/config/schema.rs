//! Configuration schema definitions.
//!
//! All defaults describe the local reference network topology (single
//! organization, one peer), so a process started with an empty environment
//! talks to a locally running test network.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration for the gateway process.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct GatewayConfig {
    /// Ledger channel (network) the contract is deployed on.
    pub channel_name: String,

    /// Name of the deployed chaincode.
    pub chaincode_name: String,

    /// Membership service provider id vouching for our identity.
    pub msp_id: String,

    /// Root of the organization's crypto material.
    pub crypto_path: PathBuf,

    /// Private key file (PKCS#8 PEM). A single explicit file, deliberately
    /// not a keystore directory to enumerate.
    pub key_path: PathBuf,

    /// Identity certificate file (PEM).
    pub cert_path: PathBuf,

    /// TLS trust-root certificate of the peer.
    pub tls_cert_path: PathBuf,

    /// Peer gateway endpoint, host:port.
    pub peer_endpoint: String,

    /// Expected peer hostname for TLS certificate validation. The peer's
    /// reachable address may differ from the name in its certificate.
    pub peer_host_alias: String,

    /// HTTP listener settings.
    pub listener: ListenerConfig,

    /// Per-operation-class deadlines.
    pub timeouts: TimeoutConfig,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        let crypto_path = default_crypto_path();
        Self {
            channel_name: "mychannel".to_string(),
            chaincode_name: "basic".to_string(),
            msp_id: "Org1MSP".to_string(),
            key_path: default_key_path(&crypto_path),
            cert_path: default_cert_path(&crypto_path),
            tls_cert_path: default_tls_cert_path(&crypto_path),
            crypto_path,
            peer_endpoint: "localhost:7051".to_string(),
            peer_host_alias: "peer0.org1.example.com".to_string(),
            listener: ListenerConfig::default(),
            timeouts: TimeoutConfig::default(),
        }
    }
}

pub(crate) fn default_crypto_path() -> PathBuf {
    PathBuf::from("../../test-network/organizations/peerOrganizations/org1.example.com")
}

pub(crate) fn default_key_path(crypto_path: &std::path::Path) -> PathBuf {
    crypto_path.join("users/User1@org1.example.com/msp/keystore/priv_sk")
}

pub(crate) fn default_cert_path(crypto_path: &std::path::Path) -> PathBuf {
    crypto_path.join("users/User1@org1.example.com/msp/signcerts/cert.pem")
}

pub(crate) fn default_tls_cert_path(crypto_path: &std::path::Path) -> PathBuf {
    crypto_path.join("peers/peer0.org1.example.com/tls/ca.crt")
}

/// HTTP listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address for the request surface (e.g., "0.0.0.0:3002").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:3002".to_string(),
        }
    }
}

/// Deadlines per ledger operation class.
///
/// Endorsement gathers peer signatures before ordering and typically takes
/// longer than the final submission, hence `endorse_secs >= submit_secs` is
/// enforced by validation. Commit confirmation waits for the ordering
/// service and gets the largest budget.
#[derive(Debug, Clone, Copy, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Deadline for read-only evaluations, in seconds.
    pub evaluate_secs: u64,

    /// Deadline for collecting endorsements, in seconds.
    pub endorse_secs: u64,

    /// Deadline for handing a transaction to ordering, in seconds.
    pub submit_secs: u64,

    /// Deadline for the final commit-status confirmation, in seconds.
    pub commit_status_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            evaluate_secs: 5,
            endorse_secs: 15,
            submit_secs: 5,
            commit_status_secs: 60,
        }
    }
}
