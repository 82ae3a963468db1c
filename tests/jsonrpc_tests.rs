//! JSON-RPC transport against a local HTTP stub.

mod support;

use std::time::Duration;

use serde_json::json;
use tn_sdk::adapter::outbound::jsonrpc::JsonRpcTransport;
use tn_sdk::domain::id::TxHash;
use tn_sdk::domain::stream::GetRecordInput;
use tn_sdk::domain::value::ArgValue;
use tn_sdk::error::{Error, TransportError};
use tn_sdk::port::{CallOptions, Invocation, RpcTransport};
use tn_sdk::testkit::config::client_config_for;
use tn_sdk::testkit::domain::{address, locator, signer};
use tn_sdk::Client;
use url::Url;

use support::rpc_stub::{RpcStub, StubReply};

fn transport(stub: &RpcStub) -> JsonRpcTransport {
    let url = Url::parse(&stub.url).unwrap();
    JsonRpcTransport::new(&url, Duration::from_secs(5)).unwrap()
}

#[tokio::test]
async fn call_decodes_rows_and_string_logs() {
    let stub = RpcStub::start(vec![StubReply::result(json!({
        "query_result": {
            "column_names": ["event_time", "value"],
            "values": [[100, "1.5"]]
        },
        "logs": "starting\n{\"cache_hit\":true,\"cache_height\":77}"
    }))])
    .await;

    let invocation = Invocation::read("main", "get_record", vec![ArgValue::text("x"), ArgValue::Null]);
    let response = transport(&stub)
        .call(&invocation, CallOptions::cached(true))
        .await
        .unwrap();

    assert_eq!(response.result.len(), 1);
    assert_eq!(response.logs.len(), 2);

    let request = &stub.requests()[0];
    assert_eq!(request["jsonrpc"], "2.0");
    assert_eq!(request["method"], "user.call");
    assert_eq!(request["params"]["namespace"], "main");
    assert_eq!(request["params"]["action"], "get_record");
    assert_eq!(request["params"]["args"], json!(["x", null]));
    assert_eq!(request["params"]["use_cache"], true);
}

#[tokio::test]
async fn broadcast_carries_sender_and_signature() {
    let stub = RpcStub::start(vec![StubReply::result(json!({"tx_hash": "0xABCD"}))]).await;
    let signer = signer('5');

    let invocation = Invocation::write("main", "settle_market", vec![ArgValue::int(3)]);
    let hash = transport(&stub)
        .submit(&invocation, signer.as_ref())
        .await
        .unwrap();

    assert_eq!(hash, TxHash::new("abcd"));
    let params = &stub.requests()[0]["params"];
    assert_eq!(stub.requests()[0]["method"], "user.broadcast");
    assert_eq!(params["action"], "settle_market");
    assert_eq!(params["args"], json!([3]));
    assert_eq!(params["sender"], address('5').as_str());
    let signature = params["signature"].as_str().unwrap();
    assert!(signature.starts_with("0x"));
    assert_eq!(signature.len(), 2 + 64);
}

#[tokio::test]
async fn tx_query_maps_inclusion() {
    let stub = RpcStub::start(vec![
        StubReply::result(json!({"height": -1})),
        StubReply::result(json!({"height": 10, "tx_result": {"code": 0, "log": "done"}})),
    ])
    .await;
    let transport = transport(&stub);
    let hash = TxHash::new("beef");

    let pending = transport.query_tx_status(&hash).await.unwrap();
    let included = transport.query_tx_status(&hash).await.unwrap();

    assert!(!pending.included);
    assert!(included.is_success());
    assert_eq!(included.height, Some(10));
    assert_eq!(stub.requests()[1]["method"], "user.tx_query");
    assert_eq!(stub.requests()[1]["params"]["tx_hash"], "beef");
}

#[tokio::test]
async fn http_failure_is_a_status_error() {
    let stub = RpcStub::start(vec![StubReply::status(500, "node exploded")]).await;

    let err = transport(&stub)
        .query_tx_status(&TxHash::new("01"))
        .await
        .unwrap_err();

    match err {
        TransportError::Status { status, body } => {
            assert_eq!(status, 500);
            assert_eq!(body, "node exploded");
        }
        other => panic!("expected status error, got {other}"),
    }
}

#[tokio::test]
async fn rpc_error_is_surfaced() {
    let stub = RpcStub::start(vec![StubReply::rpc_error(-32601, "unknown action")]).await;

    let invocation = Invocation::read("main", "nope", vec![]);
    let err = transport(&stub)
        .call(&invocation, CallOptions::default())
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        TransportError::Rpc { code: -32601, ref message } if message == "unknown action"
    ));
}

#[tokio::test]
async fn empty_envelope_is_a_decode_error() {
    let stub = RpcStub::start(vec![StubReply::result(json!(null))]).await;

    let err = transport(&stub)
        .query_tx_status(&TxHash::new("01"))
        .await
        .unwrap_err();

    assert!(matches!(err, TransportError::Decode(_)));
}

#[tokio::test]
async fn client_reads_through_the_wire() {
    let stub = RpcStub::start(vec![StubReply::result(json!({
        "query_result": {
            "column_names": ["event_time", "value"],
            "values": [[100, "1.5"], [200, "2"]]
        },
        "logs": ["invalid json", "{\"cache_hit\":true,\"cache_height\":1000}"]
    }))])
    .await;
    let client = Client::connect(&client_config_for(&stub.url)).unwrap();

    let out = client
        .streams()
        .get_record(&GetRecordInput::new(&locator("cpi")).with_cache(true))
        .await
        .unwrap();

    assert_eq!(out.records.len(), 2);
    assert!(out.cache.cache_hit);
    assert_eq!(out.cache.cache_height, Some(1000));
}

#[tokio::test]
async fn client_write_failure_names_the_procedure() {
    let stub = RpcStub::start(vec![StubReply::status(503, "try later")]).await;
    let client = Client::connect(&client_config_for(&stub.url))
        .unwrap()
        .with_signer(signer('7'));

    let err = client
        .execute_procedure("create_market", vec![])
        .await
        .unwrap_err();

    match err {
        Error::Invocation { procedure, source } => {
            assert_eq!(procedure, "create_market");
            assert!(matches!(source, TransportError::Status { status: 503, .. }));
        }
        other => panic!("expected invocation error, got {other}"),
    }
}
