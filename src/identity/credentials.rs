//! Client identity: MSP id plus certificate bytes.

use std::fs;
use std::path::Path;

use crate::gateway::types::{GatewayError, GatewayResult};

/// An identity as registered with a membership service provider.
///
/// Immutable once constructed; owned by the gateway session for its
/// lifetime. The credential bytes are the raw certificate PEM, passed
/// through to the peer untouched.
#[derive(Debug, Clone)]
pub struct Identity {
    msp_id: String,
    credentials: Vec<u8>,
}

impl Identity {
    /// Load an identity from a certificate file.
    pub fn from_cert_file(msp_id: impl Into<String>, cert_path: &Path) -> GatewayResult<Self> {
        let credentials = fs::read(cert_path).map_err(|source| GatewayError::CredentialRead {
            path: cert_path.to_path_buf(),
            source,
        })?;

        let identity = Self {
            msp_id: msp_id.into(),
            credentials,
        };

        tracing::info!(
            msp_id = %identity.msp_id,
            cert_path = %cert_path.display(),
            "Identity loaded"
        );

        Ok(identity)
    }

    /// The membership service provider identifier.
    pub fn msp_id(&self) -> &str {
        &self.msp_id
    }

    /// Raw certificate bytes.
    pub fn credentials(&self) -> &[u8] {
        &self.credentials
    }
}
