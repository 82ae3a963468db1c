use serde_json::{json, Value};
use tn_sdk::domain::order_book::CreateMarketInput;
use tn_sdk::domain::result::QueryResult;
use tn_sdk::port::CallResponse;
use tn_sdk::testkit::domain::query_result;

/// `get_record` style rows from `(event_time, value)` pairs.
pub fn records(rows: &[(i64, &str)]) -> QueryResult {
    query_result(
        &["event_time", "value"],
        rows.iter().map(|(t, v)| vec![json!(t), json!(v)]).collect(),
    )
}

pub fn response(result: QueryResult, logs: &[&str]) -> CallResponse {
    CallResponse {
        result,
        logs: logs.iter().map(|l| (*l).to_string()).collect(),
    }
}

/// One `get_order_book` row.
pub fn book_row(wallet: char, price: i64, amount: i64, last_updated: i64) -> Vec<Value> {
    vec![
        json!(format!("0x{}", wallet.to_string().repeat(40))),
        json!(price),
        json!(amount),
        json!(last_updated),
    ]
}

pub fn order_book(rows: Vec<Vec<Value>>) -> QueryResult {
    query_result(&["wallet_address", "price", "amount", "last_updated"], rows)
}

/// Valid market settling `offset` seconds from `now`.
pub fn market(now: i64, offset: i64) -> CreateMarketInput {
    CreateMarketInput {
        bridge: "hoodi_tt2".into(),
        query_components: vec![0u8; 128],
        settle_time: now + offset,
        max_spread: 5,
        min_order_size: 100,
    }
}
