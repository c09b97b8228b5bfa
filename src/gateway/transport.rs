//! Secure channel establishment to the ledger peer.
//!
//! # Responsibilities
//! - Read the TLS trust-root certificate
//! - Apply the peer hostname override for certificate validation
//! - Establish one long-lived channel, created at startup and shared
//!
//! The channel carries no ledger-specific protocol itself; the session
//! layers the gateway RPCs on top of it. tonic channels multiplex
//! independent RPC streams, so a single clone-shared channel serves all
//! concurrent operations.

use std::fs;
use std::time::Duration;

use tonic::transport::{Certificate, Channel, ClientTlsConfig};

use crate::config::GatewayConfig;
use crate::gateway::types::{GatewayError, GatewayResult};

const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// Connect a transport-secured channel to the configured peer endpoint.
///
/// Fails fast: the handshake happens here, at startup, not lazily on the
/// first request.
pub async fn connect(config: &GatewayConfig) -> GatewayResult<Channel> {
    let trust_root = fs::read(&config.tls_cert_path).map_err(|source| {
        GatewayError::TrustRootRead {
            path: config.tls_cert_path.clone(),
            source,
        }
    })?;

    let tls = ClientTlsConfig::new()
        .ca_certificate(Certificate::from_pem(trust_root))
        .domain_name(&config.peer_host_alias);

    let handshake_error = |message: String| GatewayError::HostnameVerification {
        endpoint: config.peer_endpoint.clone(),
        host_alias: config.peer_host_alias.clone(),
        message,
    };

    let endpoint = Channel::from_shared(format!("https://{}", config.peer_endpoint))
        .map_err(|e| handshake_error(format!("invalid peer endpoint: {}", e)))?
        .tls_config(tls)
        .map_err(|e| handshake_error(e.to_string()))?
        .connect_timeout(CONNECT_TIMEOUT);

    let channel = endpoint
        .connect()
        .await
        .map_err(|e| handshake_error(e.to_string()))?;

    tracing::info!(
        peer_endpoint = %config.peer_endpoint,
        peer_host_alias = %config.peer_host_alias,
        "Secure channel established"
    );

    Ok(channel)
}
