//! Gateway error taxonomy and transaction outcome types.

use std::path::PathBuf;

use thiserror::Error;

/// Validation code reported for a committed transaction: valid.
pub const TX_VALIDATION_VALID: i32 = 0;

/// Validation code for a read-set conflict detected at commit time.
pub const TX_VALIDATION_MVCC_READ_CONFLICT: i32 = 11;

/// Errors that can occur while talking to the ledger gateway.
///
/// Startup errors (credential, key, trust root, handshake) are fatal: the
/// process must not begin serving requests. Query-path errors are safe to
/// retry; write-path errors are not retried here, since idempotency is a
/// caller decision.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// The identity certificate could not be read.
    #[error("failed to read identity certificate {path}: {source}")]
    CredentialRead {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The configured private key file is missing or unreadable.
    #[error("private key not found at {path}: {source}")]
    KeyNotFound {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The private key bytes could not be parsed.
    #[error("failed to parse private key: {0}")]
    KeyParse(String),

    /// The TLS trust-root certificate could not be read.
    #[error("failed to read TLS trust root {path}: {source}")]
    TrustRootRead {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The TLS handshake with the peer failed; the configured hostname
    /// override did not validate against the peer certificate, or the peer
    /// is unreachable.
    #[error("TLS connection to {endpoint} (expecting host {host_alias}) failed: {message}")]
    HostnameVerification {
        endpoint: String,
        host_alias: String,
        message: String,
    },

    /// A read-only evaluation exceeded its deadline.
    #[error("evaluation of transaction {transaction_id} timed out after {deadline_secs}s")]
    EvaluateTimeout {
        transaction_id: String,
        deadline_secs: u64,
    },

    /// The chaincode returned an application-level error on evaluation.
    #[error("evaluation of transaction {transaction_id} failed: {message}")]
    Evaluate {
        transaction_id: String,
        message: String,
    },

    /// Endorsement was refused, or not obtained within its deadline.
    #[error("endorsement of transaction {transaction_id} failed: {message}")]
    Endorse {
        transaction_id: String,
        message: String,
    },

    /// The ordering service did not accept the transaction within budget.
    #[error("submission of transaction {transaction_id} timed out after {deadline_secs}s")]
    SubmissionTimeout {
        transaction_id: String,
        deadline_secs: u64,
    },

    /// The ordering service rejected the submission.
    #[error("submission of transaction {transaction_id} failed: {message}")]
    Submission {
        transaction_id: String,
        message: String,
    },

    /// The commit status was not reported within its deadline. The
    /// transaction may still commit; the id is surfaced for reconciliation.
    #[error("commit status of transaction {transaction_id} not available after {deadline_secs}s")]
    CommitStatusTimeout {
        transaction_id: String,
        deadline_secs: u64,
    },

    /// The commit-status query itself failed; the commit outcome is
    /// unknown. The id is surfaced for reconciliation.
    #[error("commit status of transaction {transaction_id} unavailable: {message}")]
    CommitStatusUnavailable {
        transaction_id: String,
        message: String,
    },

    /// The transaction was ordered but rejected at commit time (e.g., a
    /// stale read set). The id and code correlate with ledger audit logs.
    #[error("transaction {transaction_id} failed to commit with status code {status_code}")]
    CommitFailure {
        transaction_id: String,
        status_code: i32,
    },
}

impl GatewayError {
    /// Transaction id associated with this error, when one was assigned.
    /// Every write-path failure carries one so operators can reconcile
    /// against ledger-side audit logs.
    pub fn transaction_id(&self) -> Option<&str> {
        match self {
            Self::EvaluateTimeout { transaction_id, .. }
            | Self::Evaluate { transaction_id, .. }
            | Self::Endorse { transaction_id, .. }
            | Self::SubmissionTimeout { transaction_id, .. }
            | Self::Submission { transaction_id, .. }
            | Self::CommitStatusTimeout { transaction_id, .. }
            | Self::CommitStatusUnavailable { transaction_id, .. }
            | Self::CommitFailure { transaction_id, .. } => Some(transaction_id),
            _ => None,
        }
    }

    /// Whether this error surfaced before any request was served (identity,
    /// trust root or handshake problems).
    pub fn is_startup_fatal(&self) -> bool {
        matches!(
            self,
            Self::CredentialRead { .. }
                | Self::KeyNotFound { .. }
                | Self::KeyParse(_)
                | Self::TrustRootRead { .. }
                | Self::HostnameVerification { .. }
        )
    }

    /// Whether this error came from a deadline expiring.
    pub fn is_timeout(&self) -> bool {
        matches!(
            self,
            Self::EvaluateTimeout { .. }
                | Self::SubmissionTimeout { .. }
                | Self::CommitStatusTimeout { .. }
        )
    }
}

/// Result type for gateway operations.
pub type GatewayResult<T> = Result<T, GatewayError>;

/// Final outcome of a synchronously submitted transaction.
#[derive(Debug, Clone)]
pub struct TransactionOutcome {
    /// Chaincode return value captured at endorsement time.
    pub result: Vec<u8>,
    /// Identifier usable for audit/log correlation.
    pub transaction_id: String,
    /// Validation code reported at commit time.
    pub status_code: i32,
    /// Whether the transaction is durably committed.
    pub committed: bool,
}

/// Commit confirmation for an asynchronously submitted transaction.
#[derive(Debug, Clone)]
pub struct CommitOutcome {
    /// Identifier usable for audit/log correlation.
    pub transaction_id: String,
    /// Validation code reported by the ordering service.
    pub status_code: i32,
    /// Block the transaction was committed in.
    pub block_number: u64,
}

impl CommitOutcome {
    /// True when the ordering service reported the transaction valid.
    pub fn successful(&self) -> bool {
        self.status_code == TX_VALIDATION_VALID
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_carries_transaction_id() {
        let err = GatewayError::CommitFailure {
            transaction_id: "abc123".to_string(),
            status_code: TX_VALIDATION_MVCC_READ_CONFLICT,
        };
        let message = err.to_string();
        assert!(message.contains("abc123"));
        assert!(message.contains("11"));
    }

    #[test]
    fn test_transaction_id_accessor() {
        let err = GatewayError::Endorse {
            transaction_id: "tx1".to_string(),
            message: "refused".to_string(),
        };
        assert_eq!(err.transaction_id(), Some("tx1"));

        let err = GatewayError::KeyParse("bad".to_string());
        assert_eq!(err.transaction_id(), None);
    }

    #[test]
    fn test_startup_errors_are_fatal() {
        let err = GatewayError::KeyNotFound {
            path: PathBuf::from("/keys/priv_sk"),
            source: std::io::Error::from(std::io::ErrorKind::NotFound),
        };
        assert!(err.is_startup_fatal());
        assert!(!err.is_timeout());
    }

    #[test]
    fn test_commit_outcome_successful() {
        let outcome = CommitOutcome {
            transaction_id: "tx1".to_string(),
            status_code: TX_VALIDATION_VALID,
            block_number: 7,
        };
        assert!(outcome.successful());

        let outcome = CommitOutcome {
            status_code: TX_VALIDATION_MVCC_READ_CONFLICT,
            ..outcome
        };
        assert!(!outcome.successful());
    }
}
