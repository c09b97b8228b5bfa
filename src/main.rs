//! Gateway process entry point.
//!
//! Startup is a hard dependency chain: configuration → identity/signer →
//! secure channel → session → ledger initialization → HTTP listener. Any
//! failure along the chain terminates the process before it starts
//! serving ledger-facing requests.

use tokio::net::TcpListener;

use ledger_gateway::config;
use ledger_gateway::gateway::GatewaySession;
use ledger_gateway::ledger;
use ledger_gateway::observability::init_logging;
use ledger_gateway::{GatewayConfig, HttpServer};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging();

    tracing::info!("ledger-gateway v0.1.0 starting");

    let config = config::load_from_env()?;
    log_input_parameters(&config);

    let session = GatewaySession::establish(&config).await?;
    let contract = session.contract(&config.channel_name, &config.chaincode_name);

    ledger::init_ledger(&contract).await?;

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    let server = HttpServer::new(contract);
    server.run(listener).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}

/// Log the resolved network parameters. Never logs key material.
fn log_input_parameters(config: &GatewayConfig) {
    tracing::info!(
        channel_name = %config.channel_name,
        chaincode_name = %config.chaincode_name,
        msp_id = %config.msp_id,
        crypto_path = %config.crypto_path.display(),
        key_path = %config.key_path.display(),
        cert_path = %config.cert_path.display(),
        tls_cert_path = %config.tls_cert_path.display(),
        peer_endpoint = %config.peer_endpoint,
        peer_host_alias = %config.peer_host_alias,
        bind_address = %config.listener.bind_address,
        "Configuration loaded"
    );
}
