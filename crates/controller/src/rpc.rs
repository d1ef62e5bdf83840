//! JSON-RPC 2.0 endpoint exposed to the host's HTTP server.

use axum::body::Bytes;
use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};
use seqchain_genesis::Genesis;
use seqchain_storage::{get_transaction, KeyValueStore, TransactionRecord};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::{debug, warn};

/// Path under which the host mounts the router returned by [`handler`].
pub const JSONRPC_ENDPOINT: &str = "/seqapi";

pub const PARSE_ERROR: i64 = -32700;
pub const INVALID_REQUEST: i64 = -32600;
pub const METHOD_NOT_FOUND: i64 = -32601;
pub const INVALID_PARAMS: i64 = -32602;
pub const SERVER_ERROR: i64 = -32000;

#[derive(Debug, Deserialize)]
struct RpcRequest {
    jsonrpc: String,
    #[serde(default)]
    id: Value,
    method: String,
    #[serde(default)]
    params: Value,
}

#[derive(Debug, Serialize)]
struct RpcError {
    code: i64,
    message: String,
}

impl RpcError {
    fn new(code: i64, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

#[derive(Debug, Serialize)]
struct RpcResponse {
    jsonrpc: &'static str,
    id: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<RpcError>,
}

impl RpcResponse {
    fn reply(id: Value, outcome: Result<Value, RpcError>) -> Self {
        match outcome {
            Ok(result) => Self {
                jsonrpc: "2.0",
                id,
                result: Some(result),
                error: None,
            },
            Err(error) => Self {
                jsonrpc: "2.0",
                id,
                result: None,
                error: Some(error),
            },
        }
    }
}

#[derive(Debug, Deserialize)]
struct TxParams {
    tx_id: String,
}

#[derive(Debug, Deserialize)]
struct RulesParams {
    timestamp: i64,
}

/// Reply of `seqvm.tx`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxReply {
    pub found: bool,
    pub timestamp: i64,
    pub success: bool,
    pub units: u64,
}

impl From<Option<TransactionRecord>> for TxReply {
    fn from(record: Option<TransactionRecord>) -> Self {
        match record {
            Some(record) => TxReply {
                found: true,
                timestamp: record.timestamp,
                success: record.success,
                units: record.units,
            },
            None => TxReply {
                found: false,
                timestamp: 0,
                success: false,
                units: 0,
            },
        }
    }
}

struct RpcState<S> {
    genesis: Arc<Genesis>,
    genesis_doc: Value,
    network_id: u32,
    chain_id: [u8; 32],
    store: Arc<S>,
}

/// Build the JSON-RPC router over the genesis and the metadata store.
///
/// The genesis document is serialized once here, which is the only fallible
/// step.
pub fn handler<S>(
    genesis: Arc<Genesis>,
    network_id: u32,
    chain_id: [u8; 32],
    store: Arc<S>,
) -> Result<Router, serde_json::Error>
where
    S: KeyValueStore + 'static,
{
    let genesis_doc = serde_json::to_value(genesis.as_ref())?;
    let state = Arc::new(RpcState {
        genesis,
        genesis_doc,
        network_id,
        chain_id,
        store,
    });
    Ok(Router::new()
        .route("/", post(handle_rpc::<S>))
        .with_state(state))
}

async fn handle_rpc<S>(State(state): State<Arc<RpcState<S>>>, body: Bytes) -> Json<RpcResponse>
where
    S: KeyValueStore + 'static,
{
    let request: RpcRequest = match serde_json::from_slice(&body) {
        Ok(request) => request,
        Err(err) => {
            return Json(RpcResponse::reply(
                Value::Null,
                Err(RpcError::new(PARSE_ERROR, format!("invalid request body: {err}"))),
            ))
        }
    };

    if request.jsonrpc != "2.0" {
        return Json(RpcResponse::reply(
            request.id,
            Err(RpcError::new(INVALID_REQUEST, "jsonrpc must be \"2.0\"")),
        ));
    }

    debug!(method = %request.method, "json-rpc request");
    let outcome = dispatch(&state, &request.method, request.params);
    Json(RpcResponse::reply(request.id, outcome))
}

fn dispatch<S: KeyValueStore>(
    state: &RpcState<S>,
    method: &str,
    params: Value,
) -> Result<Value, RpcError> {
    match method {
        "seqvm.genesis" => Ok(state.genesis_doc.clone()),
        "seqvm.tx" => {
            let params: TxParams = parse_params(params)?;
            let id = parse_tx_id(&params.tx_id)?;
            let record = get_transaction(state.store.as_ref(), &id).map_err(|err| {
                warn!("transaction lookup failed: {err}");
                RpcError::new(SERVER_ERROR, err.to_string())
            })?;
            to_result(&TxReply::from(record))
        }
        "seqvm.rules" => {
            let params: RulesParams = parse_params(params)?;
            let rules = state
                .genesis
                .rules(params.timestamp, state.network_id, state.chain_id);
            to_result(&rules)
        }
        other => Err(RpcError::new(
            METHOD_NOT_FOUND,
            format!("method {other} not found"),
        )),
    }
}

fn parse_params<T: serde::de::DeserializeOwned>(params: Value) -> Result<T, RpcError> {
    serde_json::from_value(params)
        .map_err(|err| RpcError::new(INVALID_PARAMS, format!("invalid params: {err}")))
}

fn parse_tx_id(value: &str) -> Result<[u8; 32], RpcError> {
    let normalized = value
        .strip_prefix("0x")
        .or_else(|| value.strip_prefix("0X"))
        .unwrap_or(value)
        .trim();
    let mut id = [0u8; 32];
    hex::decode_to_slice(normalized, &mut id).map_err(|_| {
        RpcError::new(INVALID_PARAMS, "invalid tx_id: expected 32-byte hex string")
    })?;
    Ok(id)
}

fn to_result<T: Serialize>(value: &T) -> Result<Value, RpcError> {
    serde_json::to_value(value).map_err(|err| RpcError::new(SERVER_ERROR, err.to_string()))
}

/// Convenience for clients and tests.
pub fn request(id: u64, method: &str, params: Value) -> Value {
    json!({
        "jsonrpc": "2.0",
        "id": id,
        "method": method,
        "params": params,
    })
}
