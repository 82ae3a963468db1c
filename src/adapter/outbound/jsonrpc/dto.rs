//! JSON-RPC 2.0 envelopes and engine method payloads.
//!
//! Example call:
//! ```json
//! {"jsonrpc":"2.0","id":1,"method":"user.call","params":{"namespace":"main","action":"get_record","args":["0x..","st..",null,null,null],"use_cache":true}}
//! ```

use serde::{Deserialize, Serialize};

use crate::domain::result::QueryResult;
use crate::domain::tx::TxStatus;
use crate::domain::value::ArgValue;

pub const METHOD_CALL: &str = "user.call";
pub const METHOD_BROADCAST: &str = "user.broadcast";
pub const METHOD_TX_QUERY: &str = "user.tx_query";

#[derive(Debug, Serialize)]
pub struct RpcRequest<'a, P> {
    pub jsonrpc: &'static str,
    pub id: u64,
    pub method: &'a str,
    pub params: P,
}

impl<'a, P> RpcRequest<'a, P> {
    pub const fn new(id: u64, method: &'a str, params: P) -> Self {
        Self {
            jsonrpc: "2.0",
            id,
            method,
            params,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct RpcResponse<R> {
    pub result: Option<R>,
    pub error: Option<RpcErrorBody>,
}

#[derive(Debug, Deserialize)]
pub struct RpcErrorBody {
    pub code: i64,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct CallParams<'a> {
    pub namespace: &'a str,
    pub action: &'a str,
    pub args: &'a [ArgValue],
    pub use_cache: bool,
}

#[derive(Debug, Deserialize)]
pub struct CallResult {
    #[serde(default)]
    pub query_result: QueryResult,
    #[serde(default)]
    pub logs: RawLogs,
}

/// Execution log as either a single newline-separated string or a list.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum RawLogs {
    Lines(Vec<String>),
    Text(String),
}

impl Default for RawLogs {
    fn default() -> Self {
        Self::Lines(Vec::new())
    }
}

impl RawLogs {
    pub fn into_lines(self) -> Vec<String> {
        match self {
            Self::Lines(lines) => lines,
            Self::Text(text) => text.lines().map(str::to_string).collect(),
        }
    }
}

/// Body the signer signs. The broadcast carries the same fields plus the
/// signature.
#[derive(Debug, Serialize)]
pub struct UnsignedTx<'a> {
    pub namespace: &'a str,
    pub action: &'a str,
    pub args: &'a [ArgValue],
    pub sender: &'a str,
}

#[derive(Debug, Serialize)]
pub struct BroadcastParams<'a> {
    #[serde(flatten)]
    pub tx: UnsignedTx<'a>,
    pub signature: String,
}

#[derive(Debug, Deserialize)]
pub struct BroadcastResult {
    #[serde(default)]
    pub tx_hash: String,
}

#[derive(Debug, Serialize)]
pub struct TxQueryParams<'a> {
    pub tx_hash: &'a str,
}

/// `height <= 0` (or absent) means the transaction is not yet in a block.
#[derive(Debug, Deserialize)]
pub struct TxQueryResult {
    #[serde(default)]
    pub height: Option<i64>,
    #[serde(default)]
    pub tx_result: Option<TxResultBody>,
}

/// A missing `code` is the engine omitting a zero (success) code.
#[derive(Debug, Deserialize)]
pub struct TxResultBody {
    #[serde(default)]
    pub code: i64,
    #[serde(default)]
    pub log: String,
}

impl TxQueryResult {
    pub fn into_status(self) -> TxStatus {
        match (self.height, self.tx_result) {
            (Some(height), Some(result)) if height > 0 => {
                TxStatus::included(result.code, result.log, height)
            }
            _ => TxStatus::pending(),
        }
    }
}
