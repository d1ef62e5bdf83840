use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use seqchain_controller::rpc::{self, INVALID_PARAMS, METHOD_NOT_FOUND, PARSE_ERROR};
use seqchain_controller::TxReply;
use seqchain_genesis::Genesis;
use seqchain_storage::{store_transaction, KeyValueStore, MemoryStore, WriteBatch};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

const UPGRADES: &[u8] = br#"{"upgrades":[{"activation_timestamp": 100, "max_block_txs": 10}]}"#;

fn router(store: MemoryStore) -> Router {
    let genesis = Arc::new(Genesis::new(br#"{"hrp":"tst"}"#, UPGRADES).unwrap());
    rpc::handler(genesis, 5, [0x11; 32], Arc::new(store)).unwrap()
}

async fn call(app: Router, body: Vec<u8>) -> Value {
    let response = app
        .oneshot(
            Request::post("/")
                .header("content-type", "application/json")
                .body(Body::from(body))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn call_method(app: Router, method: &str, params: Value) -> Value {
    let body = serde_json::to_vec(&rpc::request(1, method, params)).unwrap();
    call(app, body).await
}

#[tokio::test]
async fn genesis_method_returns_document() {
    let reply = call_method(router(MemoryStore::new()), "seqvm.genesis", Value::Null).await;
    assert_eq!(reply["jsonrpc"], "2.0");
    assert_eq!(reply["id"], 1);
    assert_eq!(reply["result"]["hrp"], "tst");
    assert_eq!(reply["result"]["validity_window_ms"], 60_000);
}

#[tokio::test]
async fn tx_method_reports_indexed_record() {
    let store = MemoryStore::new();
    let id = [0x42; 32];
    let mut batch = store.new_batch();
    store_transaction(&mut batch, &id, 1_234, true, 17).unwrap();
    batch.commit().unwrap();

    let app = router(store);
    let reply = call_method(app.clone(), "seqvm.tx", json!({ "tx_id": hex::encode(id) })).await;
    let found: TxReply = serde_json::from_value(reply["result"].clone()).unwrap();
    assert_eq!(
        found,
        TxReply {
            found: true,
            timestamp: 1_234,
            success: true,
            units: 17
        }
    );

    let reply = call_method(app, "seqvm.tx", json!({ "tx_id": format!("0x{}", "00".repeat(32)) })).await;
    assert_eq!(reply["result"]["found"], false);
}

#[tokio::test]
async fn rules_method_resolves_timestamp() {
    let app = router(MemoryStore::new());

    let before = call_method(app.clone(), "seqvm.rules", json!({ "timestamp": 99 })).await;
    assert_eq!(before["result"]["max_block_txs"], 20_000);
    assert_eq!(before["result"]["network_id"], 5);
    assert_eq!(before["result"]["chain_id"], "11".repeat(32));

    let after = call_method(app, "seqvm.rules", json!({ "timestamp": 100 })).await;
    assert_eq!(after["result"]["max_block_txs"], 10);
}

#[tokio::test]
async fn unknown_method_is_reported() {
    let reply = call_method(router(MemoryStore::new()), "seqvm.balance", json!({})).await;
    assert_eq!(reply["error"]["code"], METHOD_NOT_FOUND);
    assert!(reply.get("result").is_none());
}

#[tokio::test]
async fn bad_params_are_reported() {
    let app = router(MemoryStore::new());

    let reply = call_method(app.clone(), "seqvm.tx", json!({ "tx_id": "zz" })).await;
    assert_eq!(reply["error"]["code"], INVALID_PARAMS);

    let reply = call_method(app, "seqvm.rules", json!({ "when": 1 })).await;
    assert_eq!(reply["error"]["code"], INVALID_PARAMS);
}

#[tokio::test]
async fn unparsable_body_is_a_parse_error() {
    let reply = call(router(MemoryStore::new()), b"{".to_vec()).await;
    assert_eq!(reply["error"]["code"], PARSE_ERROR);
    assert_eq!(reply["id"], Value::Null);
}

#[tokio::test]
async fn store_failures_surface_as_server_errors() {
    let store = MemoryStore::new();
    let id = [0x07; 32];
    store
        .put(&seqchain_storage::tx_key(&id), b"corrupt")
        .unwrap();

    let reply = call_method(router(store), "seqvm.tx", json!({ "tx_id": hex::encode(id) })).await;
    assert_eq!(reply["error"]["code"], rpc::SERVER_ERROR);
}
