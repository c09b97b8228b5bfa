//! In-process mock gateway peer for integration tests.
//!
//! Implements the `gateway.v1.Gateway` service over a loopback listener
//! with an in-memory world state and injectable faults (endorsement
//! refusal, commit validation codes, response delays). Commit status is
//! only ever recorded by Submit, so a successful status can never be
//! observed before ordering acknowledged the transaction.

use std::collections::{BTreeMap, HashMap};
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::net::TcpListener;
use tokio_stream::wrappers::TcpListenerStream;
use tonic::transport::{Channel, Server};
use tonic::{Request, Response, Status};

use ledger_gateway::gateway::proto::gateway_server::{Gateway, GatewayServer};
use ledger_gateway::gateway::proto::{
    CommitStatusResponse, EndorseRequest, EndorseResponse, EvaluateRequest, EvaluateResponse,
    Proposal, SignedCommitStatusRequest, SubmitRequest, SubmitResponse,
};
use ledger_gateway::gateway::{Contract, GatewaySession, TimeoutPolicy};
use ledger_gateway::identity::{Identity, TransactionSigner};

pub const TX_VALID: i32 = 0;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssetRecord {
    pub id: String,
    pub value: String,
    pub owner: String,
}

/// World state plus fault injection knobs, shared with the test body.
#[derive(Default)]
pub struct MockState {
    pub assets: Mutex<BTreeMap<String, AssetRecord>>,
    /// transaction id → (validation code, block number); written by Submit.
    pub committed: Mutex<HashMap<String, (i32, u64)>>,
    /// Refuse endorsement for this chaincode function.
    pub refuse_endorsement_for: Mutex<Option<String>>,
    /// Validation code recorded for the next submitted transaction.
    pub next_commit_code: Mutex<Option<i32>>,
    /// Delay applied to every Evaluate call.
    pub evaluate_delay: Mutex<Option<Duration>>,
    pub next_block: Mutex<u64>,
}

impl MockState {
    pub fn refuse_endorsement(&self, function: &str) {
        *self.refuse_endorsement_for.lock().unwrap() = Some(function.to_string());
    }

    pub fn clear_endorsement_refusal(&self) {
        *self.refuse_endorsement_for.lock().unwrap() = None;
    }

    pub fn fail_next_commit(&self, code: i32) {
        *self.next_commit_code.lock().unwrap() = Some(code);
    }

    pub fn delay_evaluations(&self, delay: Duration) {
        *self.evaluate_delay.lock().unwrap() = Some(delay);
    }

    pub fn clear_evaluation_delay(&self) {
        *self.evaluate_delay.lock().unwrap() = None;
    }

    pub fn asset(&self, id: &str) -> Option<AssetRecord> {
        self.assets.lock().unwrap().get(id).cloned()
    }
}

/// The endorsed transaction envelope the mock hands back from Endorse and
/// expects again on Submit.
#[derive(Serialize, Deserialize)]
struct PreparedTx {
    transaction_id: String,
    function: String,
    args: Vec<String>,
}

struct MockGateway {
    state: Arc<MockState>,
}

impl MockGateway {
    fn proposal(request: Option<ledger_gateway::gateway::proto::SignedProposal>) -> Result<Proposal, Status> {
        request
            .and_then(|signed| signed.proposal)
            .ok_or_else(|| Status::invalid_argument("missing proposal"))
    }

    fn utf8_args(proposal: &Proposal) -> Result<Vec<String>, Status> {
        proposal
            .args
            .iter()
            .map(|arg| {
                String::from_utf8(arg.clone())
                    .map_err(|_| Status::invalid_argument("non-utf8 argument"))
            })
            .collect()
    }

    /// Simulate the chaincode against current world state. Validates full
    /// argument arity and returns the simulated result without applying
    /// any writes.
    fn simulate(&self, function: &str, args: &[String]) -> Result<Vec<u8>, Status> {
        let assets = self.state.assets.lock().unwrap();
        match function {
            "InitLedger" => Ok(Vec::new()),
            "CreateAsset" => {
                let [id, _value, _owner] = args else {
                    return Err(Status::invalid_argument("CreateAsset wants id, value, owner"));
                };
                if assets.contains_key(id) {
                    return Err(Status::already_exists(format!("asset {} already exists", id)));
                }
                Ok(Vec::new())
            }
            "TransferAsset" => {
                let [id, _new_owner] = args else {
                    return Err(Status::invalid_argument("TransferAsset wants id, new owner"));
                };
                let record = assets
                    .get(id)
                    .ok_or_else(|| Status::not_found(format!("asset {} does not exist", id)))?;
                Ok(record.owner.clone().into_bytes())
            }
            other => Err(Status::unimplemented(format!("unknown function {}", other))),
        }
    }

    /// Apply an endorsed transaction's writes. Arity was checked by
    /// `simulate` before endorsement, so a short argument list here means
    /// the envelope was tampered with; it is ignored rather than applied.
    fn apply(&self, prepared: &PreparedTx) {
        let mut assets = self.state.assets.lock().unwrap();
        match (prepared.function.as_str(), prepared.args.as_slice()) {
            ("CreateAsset", [id, value, owner]) => {
                let record = AssetRecord {
                    id: id.clone(),
                    value: value.clone(),
                    owner: owner.clone(),
                };
                assets.insert(record.id.clone(), record);
            }
            ("TransferAsset", [id, new_owner]) => {
                if let Some(record) = assets.get_mut(id) {
                    record.owner = new_owner.clone();
                }
            }
            _ => {}
        }
    }
}

#[tonic::async_trait]
impl Gateway for MockGateway {
    async fn evaluate(
        &self,
        request: Request<EvaluateRequest>,
    ) -> Result<Response<EvaluateResponse>, Status> {
        let delay = *self.state.evaluate_delay.lock().unwrap();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        let proposal = Self::proposal(request.into_inner().proposed_transaction)?;
        match proposal.function.as_str() {
            "GetAllAssets" => {
                let assets = self.state.assets.lock().unwrap();
                let listing: Vec<&AssetRecord> = assets.values().collect();
                let result = serde_json::to_vec(&listing)
                    .map_err(|e| Status::internal(e.to_string()))?;
                Ok(Response::new(EvaluateResponse { result }))
            }
            other => Err(Status::unimplemented(format!("unknown query {}", other))),
        }
    }

    async fn endorse(
        &self,
        request: Request<EndorseRequest>,
    ) -> Result<Response<EndorseResponse>, Status> {
        let proposal = Self::proposal(request.into_inner().proposed_transaction)?;

        let refused = self.state.refuse_endorsement_for.lock().unwrap().clone();
        if refused.as_deref() == Some(proposal.function.as_str()) {
            return Err(Status::aborted("endorsement refused by policy"));
        }

        let args = Self::utf8_args(&proposal)?;
        let result = self.simulate(&proposal.function, &args)?;

        let prepared = PreparedTx {
            transaction_id: proposal.transaction_id,
            function: proposal.function,
            args,
        };
        let prepared_transaction =
            serde_json::to_vec(&prepared).map_err(|e| Status::internal(e.to_string()))?;

        Ok(Response::new(EndorseResponse {
            prepared_transaction,
            result,
        }))
    }

    async fn submit(
        &self,
        request: Request<SubmitRequest>,
    ) -> Result<Response<SubmitResponse>, Status> {
        let request = request.into_inner();
        let prepared: PreparedTx = serde_json::from_slice(&request.prepared_transaction)
            .map_err(|_| Status::invalid_argument("malformed prepared transaction"))?;

        let code = self
            .state
            .next_commit_code
            .lock()
            .unwrap()
            .take()
            .unwrap_or(TX_VALID);

        if code == TX_VALID {
            self.apply(&prepared);
        }

        let block = {
            let mut next_block = self.state.next_block.lock().unwrap();
            *next_block += 1;
            *next_block
        };
        self.state
            .committed
            .lock()
            .unwrap()
            .insert(request.transaction_id, (code, block));

        Ok(Response::new(SubmitResponse {}))
    }

    async fn commit_status(
        &self,
        request: Request<SignedCommitStatusRequest>,
    ) -> Result<Response<CommitStatusResponse>, Status> {
        let request = request
            .into_inner()
            .request
            .ok_or_else(|| Status::invalid_argument("missing status request"))?;

        let committed = self.state.committed.lock().unwrap();
        match committed.get(&request.transaction_id) {
            Some(&(code, block_number)) => Ok(Response::new(CommitStatusResponse {
                result: code,
                block_number,
            })),
            None => Err(Status::not_found(format!(
                "transaction {} not submitted",
                request.transaction_id
            ))),
        }
    }
}

/// Handle to a running mock peer.
pub struct MockPeer {
    pub addr: SocketAddr,
    pub state: Arc<MockState>,
}

/// Start a mock gateway peer on an ephemeral loopback port.
pub async fn spawn_mock_peer() -> MockPeer {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let state = Arc::new(MockState::default());

    let service = GatewayServer::new(MockGateway {
        state: state.clone(),
    });
    tokio::spawn(async move {
        Server::builder()
            .add_service(service)
            .serve_with_incoming(TcpListenerStream::new(listener))
            .await
            .unwrap();
    });

    MockPeer { addr, state }
}

/// Fresh identity material in a temp dir: (tempdir, identity, signer).
pub fn test_identity() -> (tempfile::TempDir, Identity, TransactionSigner) {
    use ed25519_dalek::pkcs8::{spki::der::pem::LineEnding, EncodePrivateKey};

    let dir = tempfile::tempdir().unwrap();

    let key = ed25519_dalek::SigningKey::generate(&mut rand::rngs::OsRng);
    let key_path = dir.path().join("priv_sk");
    std::fs::write(&key_path, key.to_pkcs8_pem(LineEnding::LF).unwrap().as_bytes()).unwrap();

    let cert_path = dir.path().join("cert.pem");
    std::fs::write(
        &cert_path,
        b"-----BEGIN CERTIFICATE-----\nMIIBMockCert\n-----END CERTIFICATE-----\n",
    )
    .unwrap();

    let identity = Identity::from_cert_file("Org1MSP", &cert_path).unwrap();
    let signer = TransactionSigner::from_key_file(&key_path).unwrap();
    (dir, identity, signer)
}

/// Connect a contract handle to a mock peer with the given timeout policy.
pub async fn connect_contract(addr: SocketAddr, timeouts: TimeoutPolicy) -> Contract {
    let channel = Channel::from_shared(format!("http://{}", addr))
        .unwrap()
        .connect()
        .await
        .unwrap();

    let (_dir, identity, signer) = test_identity();
    let session = GatewaySession::new(channel, identity, signer, timeouts);
    session.contract("mychannel", "basic")
}
