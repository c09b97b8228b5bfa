//! Gateway session: channel + identity + signer + timeout policy.

use std::sync::Arc;
use std::time::Duration;

use tonic::transport::Channel;

use crate::config::{GatewayConfig, TimeoutConfig};
use crate::gateway::contract::Contract;
use crate::gateway::proto::gateway_client::GatewayClient;
use crate::gateway::transport;
use crate::gateway::types::GatewayResult;
use crate::identity::{Identity, TransactionSigner};

/// Deadlines per ledger operation class, as durations.
///
/// One deadline per class; expiry fails the operation with the matching
/// timeout error and is never retried internally.
#[derive(Debug, Clone, Copy)]
pub struct TimeoutPolicy {
    /// Read-only evaluation deadline.
    pub evaluate: Duration,
    /// Endorsement collection deadline.
    pub endorse: Duration,
    /// Ordering submission deadline.
    pub submit: Duration,
    /// Commit-status confirmation deadline.
    pub commit_status: Duration,
}

impl Default for TimeoutPolicy {
    fn default() -> Self {
        TimeoutConfig::default().into()
    }
}

impl From<TimeoutConfig> for TimeoutPolicy {
    fn from(config: TimeoutConfig) -> Self {
        Self {
            evaluate: Duration::from_secs(config.evaluate_secs),
            endorse: Duration::from_secs(config.endorse_secs),
            submit: Duration::from_secs(config.submit_secs),
            commit_status: Duration::from_secs(config.commit_status_secs),
        }
    }
}

impl TimeoutPolicy {
    /// Slack added on top of the longest operation pipeline to cover
    /// queuing and response serialization.
    const REQUEST_SLACK: Duration = Duration::from_secs(5);

    /// Whole-request budget for one bridged HTTP call.
    ///
    /// Covers the longest pipeline a handler can run (endorse, then submit,
    /// then commit status) as well as a long evaluation, plus slack. The
    /// HTTP layer must never cut off a write whose per-operation deadlines
    /// have not yet expired; the in-flight error would otherwise be dropped
    /// along with its transaction id.
    pub fn request_budget(&self) -> Duration {
        let write_path = self.endorse + self.submit + self.commit_status;
        write_path.max(self.evaluate) + Self::REQUEST_SLACK
    }
}

/// An authenticated session against one ledger peer.
///
/// Construction is pure composition: no I/O happens until an operation is
/// issued through a [`Contract`]. The session owns its identity and signer
/// and is built once at startup; all request handling shares it.
#[derive(Debug)]
pub struct GatewaySession {
    channel: Channel,
    identity: Arc<Identity>,
    signer: Arc<TransactionSigner>,
    timeouts: TimeoutPolicy,
}

impl GatewaySession {
    /// Establish a session from configuration: load the identity
    /// certificate and signing key from their configured paths, then open
    /// the secure channel to the peer.
    ///
    /// Any failure is startup-fatal; callers must not bind a listener or
    /// serve requests after an error here.
    pub async fn establish(config: &GatewayConfig) -> GatewayResult<Self> {
        let identity = Identity::from_cert_file(&config.msp_id, &config.cert_path)?;
        let signer = TransactionSigner::from_key_file(&config.key_path)?;
        let channel = transport::connect(config).await?;

        Ok(Self::new(
            channel,
            identity,
            signer,
            TimeoutPolicy::from(config.timeouts),
        ))
    }

    /// Compose a session from an established channel and loaded identity
    /// material.
    pub fn new(
        channel: Channel,
        identity: Identity,
        signer: TransactionSigner,
        timeouts: TimeoutPolicy,
    ) -> Self {
        tracing::info!(
            msp_id = %identity.msp_id(),
            evaluate_secs = timeouts.evaluate.as_secs(),
            endorse_secs = timeouts.endorse.as_secs(),
            submit_secs = timeouts.submit.as_secs(),
            commit_status_secs = timeouts.commit_status.as_secs(),
            "Gateway session composed"
        );

        Self {
            channel,
            identity: Arc::new(identity),
            signer: Arc::new(signer),
            timeouts,
        }
    }

    /// Obtain a handle to a named contract within a named network channel.
    /// This is the session's only capability; all ledger operations go
    /// through the returned [`Contract`].
    pub fn contract(&self, channel_name: &str, chaincode_name: &str) -> Contract {
        Contract::new(
            GatewayClient::new(self.channel.clone()),
            self.identity.clone(),
            self.signer.clone(),
            self.timeouts,
            channel_name.to_string(),
            chaincode_name.to_string(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ed25519_dalek::pkcs8::{spki::der::pem::LineEnding, EncodePrivateKey};
    use rand::rngs::OsRng;

    fn test_session() -> GatewaySession {
        let dir = tempfile::tempdir().unwrap();
        let key = ed25519_dalek::SigningKey::generate(&mut OsRng);
        let key_path = dir.path().join("priv_sk");
        std::fs::write(&key_path, key.to_pkcs8_pem(LineEnding::LF).unwrap().as_bytes()).unwrap();
        let cert_path = dir.path().join("cert.pem");
        std::fs::write(&cert_path, b"-----BEGIN CERTIFICATE-----\nMIIB\n-----END CERTIFICATE-----\n")
            .unwrap();

        let identity = Identity::from_cert_file("Org1MSP", &cert_path).unwrap();
        let signer = TransactionSigner::from_key_file(&key_path).unwrap();

        // connect_lazy performs no I/O; sessions compose without a peer.
        let channel = Channel::from_static("http://localhost:7051").connect_lazy();
        GatewaySession::new(channel, identity, signer, TimeoutPolicy::default())
    }

    #[tokio::test]
    async fn test_session_composition_is_io_free() {
        let session = test_session();
        let contract = session.contract("mychannel", "basic");
        assert_eq!(contract.channel_name(), "mychannel");
        assert_eq!(contract.chaincode_name(), "basic");
    }

    #[test]
    fn test_timeout_policy_from_config() {
        let policy: TimeoutPolicy = TimeoutConfig {
            evaluate_secs: 1,
            endorse_secs: 20,
            submit_secs: 2,
            commit_status_secs: 90,
        }
        .into();
        assert_eq!(policy.evaluate, Duration::from_secs(1));
        assert_eq!(policy.endorse, Duration::from_secs(20));
        assert_eq!(policy.submit, Duration::from_secs(2));
        assert_eq!(policy.commit_status, Duration::from_secs(90));
    }

    #[test]
    fn test_request_budget_covers_configured_commit_status_deadline() {
        let policy: TimeoutPolicy = TimeoutConfig {
            commit_status_secs: 120,
            ..TimeoutConfig::default()
        }
        .into();
        // endorse + submit + commit_status, with slack on top.
        assert!(policy.request_budget() > Duration::from_secs(120));
        assert!(policy.request_budget() >= policy.endorse + policy.submit + policy.commit_status);
    }

    #[test]
    fn test_request_budget_covers_long_evaluations() {
        let policy: TimeoutPolicy = TimeoutConfig {
            evaluate_secs: 300,
            ..TimeoutConfig::default()
        }
        .into();
        assert!(policy.request_budget() > Duration::from_secs(300));
    }

    #[test]
    fn test_default_policy_matches_documented_defaults() {
        let policy = TimeoutPolicy::default();
        assert_eq!(policy.evaluate, Duration::from_secs(5));
        assert_eq!(policy.endorse, Duration::from_secs(15));
        assert_eq!(policy.submit, Duration::from_secs(5));
        assert_eq!(policy.commit_status, Duration::from_secs(60));
    }
}
