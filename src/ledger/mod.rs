//! Named chaincode operations over the asset ledger.
//!
//! Thin typed wrappers over the transaction executor: each function fixes
//! a chaincode function name and its argument marshaling, nothing more.
//! Protocol and failure handling live in [`crate::gateway`].

use serde::{Deserialize, Serialize};

use crate::gateway::types::{GatewayError, GatewayResult, TransactionOutcome};
use crate::gateway::Contract;

/// Organization tag stamped on assets created through this gateway.
const CREATOR_ORG: &str = "Org1";

/// An asset as stored by the chaincode. Opaque to the gateway core; only
/// decoded at this layer for the HTTP surface.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Asset {
    #[serde(alias = "ID")]
    pub id: String,
    #[serde(alias = "Value")]
    pub value: String,
    #[serde(alias = "Owner")]
    pub owner: String,
}

/// Outcome of an asynchronous asset transfer: the provisional result plus
/// the confirmed commit details.
#[derive(Debug, Clone, Serialize)]
pub struct TransferReceipt {
    /// Owner before the transfer, read from the provisional result.
    pub previous_owner: String,
    /// Owner after the transfer.
    pub new_owner: String,
    pub transaction_id: String,
    pub status_code: i32,
}

/// Populate the ledger with its predefined initial assets.
pub async fn init_ledger(contract: &Contract) -> GatewayResult<()> {
    let outcome = contract.submit("InitLedger", &[]).await?;
    tracing::info!(transaction_id = %outcome.transaction_id, "Ledger initialized");
    Ok(())
}

/// Return every asset currently in world state.
pub async fn get_all_assets(contract: &Contract) -> GatewayResult<Vec<Asset>> {
    let result = contract.evaluate("GetAllAssets", &[]).await?;

    // An empty world state evaluates to empty bytes, not an empty array.
    if result.is_empty() {
        return Ok(Vec::new());
    }

    let assets: Vec<Asset> = serde_json::from_slice(&result).map_err(|e| GatewayError::Evaluate {
        transaction_id: String::new(),
        message: format!("malformed asset listing: {}", e),
    })?;

    tracing::debug!(count = assets.len(), "Assets listed");
    Ok(assets)
}

/// Create an asset owned by this gateway's organization.
pub async fn create_asset(
    contract: &Contract,
    id: &str,
    value: &str,
) -> GatewayResult<TransactionOutcome> {
    let outcome = contract
        .submit(
            "CreateAsset",
            &[id.as_bytes(), value.as_bytes(), CREATOR_ORG.as_bytes()],
        )
        .await?;

    tracing::info!(asset_id = id, transaction_id = %outcome.transaction_id, "Asset created");
    Ok(outcome)
}

/// Transfer an asset to a new owner using the two-phase asynchronous
/// submit: the previous owner is available as soon as ordering accepts the
/// transaction, and the commit is confirmed explicitly afterwards.
pub async fn transfer_asset(
    contract: &Contract,
    id: &str,
    new_owner: &str,
) -> GatewayResult<TransferReceipt> {
    let pending = contract
        .submit_async("TransferAsset", &[id.as_bytes(), new_owner.as_bytes()])
        .await?;

    let previous_owner = String::from_utf8_lossy(pending.result()).into_owned();
    tracing::info!(
        asset_id = id,
        previous_owner = %previous_owner,
        new_owner = new_owner,
        transaction_id = %pending.transaction_id(),
        "Transfer submitted, awaiting commit"
    );

    let outcome = pending.status().await?;
    if !outcome.successful() {
        return Err(GatewayError::CommitFailure {
            transaction_id: outcome.transaction_id,
            status_code: outcome.status_code,
        });
    }

    tracing::info!(
        asset_id = id,
        transaction_id = %outcome.transaction_id,
        "Transfer committed"
    );

    Ok(TransferReceipt {
        previous_owner,
        new_owner: new_owner.to_string(),
        transaction_id: outcome.transaction_id,
        status_code: outcome.status_code,
    })
}
