//! HTTP server setup and request handlers.
//!
//! # Responsibilities
//! - Create the Axum router with the three asset routes
//! - Wire up middleware (CORS, tracing, whole-request timeout)
//! - Dispatch requests to the ledger operations
//! - Serve with graceful shutdown

use std::sync::Arc;
use std::time::Duration;

use axum::extract::State;
use axum::routing::{get, post, put};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::gateway::Contract;
use crate::http::error::ApiError;
use crate::ledger::{self, Asset, TransferReceipt};

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub contract: Arc<Contract>,
}

/// HTTP server bridging REST requests to the ledger.
pub struct HttpServer {
    router: Router,
}

impl HttpServer {
    /// Create a server around the process-wide contract handle.
    pub fn new(contract: Contract) -> Self {
        // The whole-request timeout must outlast every per-operation
        // deadline the handlers enforce, or an in-flight write would be cut
        // off and its transaction id lost.
        let request_timeout = contract.timeouts().request_budget();
        let state = AppState {
            contract: Arc::new(contract),
        };
        Self {
            router: Self::build_router(state, request_timeout),
        }
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(state: AppState, request_timeout: Duration) -> Router {
        Router::new()
            .route("/", get(list_assets))
            .route("/asset", post(create_asset))
            .route("/asset", put(transfer_asset))
            .with_state(state)
            .layer(TimeoutLayer::new(request_timeout))
            .layer(CorsLayer::permissive())
            .layer(TraceLayer::new_for_http())
    }

    /// Router accessor for in-process testing.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server, accepting connections on the given listener.
    pub async fn run(self, listener: TcpListener) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "Gateway HTTP server listening");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
struct CreateAssetRequest {
    id: String,
    value: String,
}

#[derive(Debug, Serialize)]
struct CreateAssetResponse {
    transaction_id: String,
    status_code: i32,
    committed: bool,
}

#[derive(Debug, Deserialize)]
struct TransferAssetRequest {
    id: String,
    owner: String,
}

/// GET /: the full current asset list.
async fn list_assets(State(state): State<AppState>) -> Result<Json<Vec<Asset>>, ApiError> {
    let assets = ledger::get_all_assets(&state.contract).await?;
    Ok(Json(assets))
}

/// POST /asset: create an asset, blocking until commit.
async fn create_asset(
    State(state): State<AppState>,
    Json(request): Json<CreateAssetRequest>,
) -> Result<Json<CreateAssetResponse>, ApiError> {
    let outcome = ledger::create_asset(&state.contract, &request.id, &request.value).await?;
    Ok(Json(CreateAssetResponse {
        transaction_id: outcome.transaction_id,
        status_code: outcome.status_code,
        committed: outcome.committed,
    }))
}

/// PUT /asset: transfer an asset via the asynchronous two-phase submit.
async fn transfer_asset(
    State(state): State<AppState>,
    Json(request): Json<TransferAssetRequest>,
) -> Result<Json<TransferReceipt>, ApiError> {
    let receipt = ledger::transfer_asset(&state.contract, &request.id, &request.owner).await?;
    Ok(Json(receipt))
}

/// Wait for shutdown signal (Ctrl+C).
async fn shutdown_signal() {
    tokio::signal::ctrl_c()
        .await
        .expect("Failed to install Ctrl+C handler");
    tracing::info!("Shutdown signal received");
}
