//! Transaction executor: evaluate, submit, and two-phase async submit.
//!
//! # Responsibilities
//! - Build and sign proposals, deriving an auditable transaction id
//! - Enforce the per-operation-class deadline on every RPC
//! - Translate peer failures into the typed gateway error taxonomy
//! - Never retry: deadlines are deadlines, retry policy belongs to callers

use std::sync::Arc;
use std::time::Duration;

use prost::Message;
use rand::RngCore;
use sha2::{Digest, Sha256};
use tokio::time::timeout;
use tonic::transport::Channel;

use crate::gateway::proto::{
    gateway_client::GatewayClient, CommitStatusRequest, EndorseRequest, EvaluateRequest,
    Identity as WireIdentity, Proposal, SignedCommitStatusRequest, SignedProposal, SubmitRequest,
};
use crate::gateway::session::TimeoutPolicy;
use crate::gateway::types::{CommitOutcome, GatewayError, GatewayResult, TransactionOutcome};
use crate::identity::{Identity, TransactionSigner};

/// Handle to one deployed chaincode on one ledger channel.
///
/// Cheap to clone; all clones share the session's multiplexed channel,
/// identity and signer. Operations take `&self`; per-operation state is
/// fully local, so any number of invocations may run concurrently.
#[derive(Clone)]
pub struct Contract {
    client: GatewayClient<Channel>,
    identity: Arc<Identity>,
    signer: Arc<TransactionSigner>,
    timeouts: TimeoutPolicy,
    channel_name: String,
    chaincode_name: String,
}

impl Contract {
    pub(crate) fn new(
        client: GatewayClient<Channel>,
        identity: Arc<Identity>,
        signer: Arc<TransactionSigner>,
        timeouts: TimeoutPolicy,
        channel_name: String,
        chaincode_name: String,
    ) -> Self {
        Self {
            client,
            identity,
            signer,
            timeouts,
            channel_name,
            chaincode_name,
        }
    }

    /// Ledger channel this contract is bound to.
    pub fn channel_name(&self) -> &str {
        &self.channel_name
    }

    /// Deployed chaincode this contract invokes.
    pub fn chaincode_name(&self) -> &str {
        &self.chaincode_name
    }

    /// Deadlines this contract enforces per operation class.
    pub fn timeouts(&self) -> &TimeoutPolicy {
        &self.timeouts
    }

    /// Evaluate a read-only transaction against current world state.
    ///
    /// No ordering or commit phase is involved; the call is idempotent and
    /// safe to retry freely.
    pub async fn evaluate(&self, function: &str, args: &[&[u8]]) -> GatewayResult<Vec<u8>> {
        let (proposed, transaction_id) = self.signed_proposal(function, args);
        tracing::debug!(function, transaction_id = %transaction_id, "Evaluating transaction");

        let mut client = self.client.clone();
        let call = client.evaluate(EvaluateRequest {
            proposed_transaction: Some(proposed),
        });

        match timeout(self.timeouts.evaluate, call).await {
            Ok(Ok(response)) => Ok(response.into_inner().result),
            Ok(Err(status)) => Err(GatewayError::Evaluate {
                transaction_id,
                message: status.message().to_string(),
            }),
            Err(_) => Err(GatewayError::EvaluateTimeout {
                transaction_id,
                deadline_secs: self.timeouts.evaluate.as_secs(),
            }),
        }
    }

    /// Submit a transaction and block until it is durably committed.
    ///
    /// Built on [`Contract::submit_async`] so the synchronous and
    /// asynchronous forms cannot diverge. A commit rejection surfaces as
    /// [`GatewayError::CommitFailure`] with the transaction id and code.
    pub async fn submit(&self, function: &str, args: &[&[u8]]) -> GatewayResult<TransactionOutcome> {
        let pending = self.submit_async(function, args).await?;
        let result = pending.result().to_vec();

        let outcome = pending.status().await?;
        if !outcome.successful() {
            return Err(GatewayError::CommitFailure {
                transaction_id: outcome.transaction_id,
                status_code: outcome.status_code,
            });
        }

        tracing::info!(
            transaction_id = %outcome.transaction_id,
            block_number = outcome.block_number,
            "Transaction committed"
        );

        Ok(TransactionOutcome {
            result,
            transaction_id: outcome.transaction_id,
            status_code: outcome.status_code,
            committed: true,
        })
    }

    /// Submit a transaction and return as soon as ordering accepts it,
    /// before commit confirmation.
    ///
    /// The returned handle carries the provisional (pre-commit) result and
    /// a one-shot [`SubmittedTransaction::status`] for the explicit
    /// confirmation step. A caller that skips confirmation risks treating
    /// an uncommitted transaction as final; that trade-off is the point of
    /// this API, chosen for lower perceived latency.
    pub async fn submit_async(
        &self,
        function: &str,
        args: &[&[u8]],
    ) -> GatewayResult<SubmittedTransaction> {
        let (proposed, transaction_id) = self.signed_proposal(function, args);
        tracing::debug!(function, transaction_id = %transaction_id, "Endorsing transaction");

        let mut client = self.client.clone();

        let endorse_call = client.endorse(EndorseRequest {
            proposed_transaction: Some(proposed),
        });
        let endorsed = match timeout(self.timeouts.endorse, endorse_call).await {
            Ok(Ok(response)) => response.into_inner(),
            Ok(Err(status)) => {
                return Err(GatewayError::Endorse {
                    transaction_id,
                    message: status.message().to_string(),
                })
            }
            Err(_) => {
                return Err(GatewayError::Endorse {
                    transaction_id,
                    message: format!(
                        "no endorsement within {}s",
                        self.timeouts.endorse.as_secs()
                    ),
                })
            }
        };

        let signature = self.signer.sign(&endorsed.prepared_transaction);
        let submit_call = client.submit(SubmitRequest {
            transaction_id: transaction_id.clone(),
            channel_id: self.channel_name.clone(),
            prepared_transaction: endorsed.prepared_transaction,
            signature,
        });
        match timeout(self.timeouts.submit, submit_call).await {
            Ok(Ok(_)) => {}
            Ok(Err(status)) => {
                return Err(GatewayError::Submission {
                    transaction_id,
                    message: status.message().to_string(),
                })
            }
            Err(_) => {
                return Err(GatewayError::SubmissionTimeout {
                    transaction_id,
                    deadline_secs: self.timeouts.submit.as_secs(),
                })
            }
        }

        tracing::debug!(transaction_id = %transaction_id, "Transaction submitted for ordering");

        // Sign the status query up front: the handle stays usable without
        // holding a reference back to the signer.
        let status_request = CommitStatusRequest {
            transaction_id: transaction_id.clone(),
            channel_id: self.channel_name.clone(),
            creator: Some(self.wire_identity()),
        };
        let signature = self.signer.sign(&status_request.encode_to_vec());

        Ok(SubmittedTransaction {
            transaction_id,
            result: endorsed.result,
            client: self.client.clone(),
            status_request: SignedCommitStatusRequest {
                request: Some(status_request),
                signature,
            },
            deadline: self.timeouts.commit_status,
        })
    }

    fn wire_identity(&self) -> WireIdentity {
        WireIdentity {
            msp_id: self.identity.msp_id().to_string(),
            credentials: self.identity.credentials().to_vec(),
        }
    }

    /// Build and sign a proposal, deriving a fresh transaction id.
    fn signed_proposal(&self, function: &str, args: &[&[u8]]) -> (SignedProposal, String) {
        let mut nonce = [0u8; 24];
        rand::thread_rng().fill_bytes(&mut nonce);
        let transaction_id = derive_transaction_id(&nonce, self.identity.credentials());

        let proposal = Proposal {
            transaction_id: transaction_id.clone(),
            channel_id: self.channel_name.clone(),
            chaincode_id: self.chaincode_name.clone(),
            function: function.to_string(),
            args: args.iter().map(|arg| arg.to_vec()).collect(),
            creator: Some(self.wire_identity()),
            nonce: nonce.to_vec(),
        };

        let signature = self.signer.sign(&proposal.encode_to_vec());
        (
            SignedProposal {
                proposal: Some(proposal),
                signature,
            },
            transaction_id,
        )
    }
}

impl std::fmt::Debug for Contract {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Contract")
            .field("channel_name", &self.channel_name)
            .field("chaincode_name", &self.chaincode_name)
            .field("msp_id", &self.identity.msp_id())
            .finish()
    }
}

/// Transaction id: hex of SHA-256 over nonce and creator credentials, so
/// the peer can independently re-derive and verify it.
fn derive_transaction_id(nonce: &[u8], credentials: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(nonce);
    hasher.update(credentials);
    hex::encode(hasher.finalize())
}

/// A transaction accepted for ordering but not yet confirmed.
///
/// Phase two of the asynchronous submit: the provisional result is readable
/// immediately; [`SubmittedTransaction::status`] must be awaited before the
/// transaction may be treated as durably committed.
pub struct SubmittedTransaction {
    transaction_id: String,
    result: Vec<u8>,
    client: GatewayClient<Channel>,
    status_request: SignedCommitStatusRequest,
    deadline: Duration,
}

impl SubmittedTransaction {
    /// Identifier for audit/log correlation.
    pub fn transaction_id(&self) -> &str {
        &self.transaction_id
    }

    /// Provisional chaincode return value, captured at endorsement time.
    /// Not durable until [`SubmittedTransaction::status`] reports success.
    pub fn result(&self) -> &[u8] {
        &self.result
    }

    /// Block until the ordering service reports the final commit outcome,
    /// subject to the commit-status deadline.
    pub async fn status(self) -> GatewayResult<CommitOutcome> {
        let Self {
            transaction_id,
            mut client,
            status_request,
            deadline,
            ..
        } = self;

        let call = client.commit_status(status_request);

        match timeout(deadline, call).await {
            Ok(Ok(response)) => {
                let response = response.into_inner();
                Ok(CommitOutcome {
                    transaction_id,
                    status_code: response.result,
                    block_number: response.block_number,
                })
            }
            Ok(Err(status)) => Err(GatewayError::CommitStatusUnavailable {
                transaction_id,
                message: status.message().to_string(),
            }),
            Err(_) => Err(GatewayError::CommitStatusTimeout {
                transaction_id,
                deadline_secs: deadline.as_secs(),
            }),
        }
    }
}

impl std::fmt::Debug for SubmittedTransaction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SubmittedTransaction")
            .field("transaction_id", &self.transaction_id)
            .field("result_len", &self.result.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transaction_id_is_hex_sha256() {
        let id = derive_transaction_id(b"nonce", b"credentials");
        assert_eq!(id.len(), 64);
        assert!(id.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_transaction_id_is_deterministic_per_nonce() {
        let a = derive_transaction_id(b"nonce-1", b"cert");
        let b = derive_transaction_id(b"nonce-1", b"cert");
        let c = derive_transaction_id(b"nonce-2", b"cert");
        assert_eq!(a, b);
        assert_ne!(a, c);
    }
}
