//! HTTP JSON-RPC transport to the engine.
//!
//! Reads go to `user.call`; writes are signed by the client's [`Signer`] and
//! sent to `user.broadcast`; confirmation polls `user.tx_query`. Arguments
//! travel as JSON values.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client as HttpClient;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};
use url::Url;

use super::dto::{
    BroadcastParams, BroadcastResult, CallParams, CallResult, RpcRequest, RpcResponse,
    TxQueryParams, TxQueryResult, UnsignedTx, METHOD_BROADCAST, METHOD_CALL, METHOD_TX_QUERY,
};
use crate::domain::id::TxHash;
use crate::domain::tx::TxStatus;
use crate::error::TransportError;
use crate::infrastructure::config::settings::NetworkConfig;
use crate::port::outbound::signer::Signer;
use crate::port::outbound::transport::{CallOptions, CallResponse, Invocation, RpcTransport};

/// Path of the JSON-RPC endpoint under the node URL.
const RPC_PATH: &str = "rpc/v1";

/// Longest response body quoted in a status error.
const MAX_ERROR_BODY: usize = 512;

pub struct JsonRpcTransport {
    http: HttpClient,
    url: Url,
    next_id: AtomicU64,
}

impl JsonRpcTransport {
    /// Create a transport for the node at `endpoint`.
    pub fn new(endpoint: &Url, timeout: Duration) -> Result<Self, TransportError> {
        let http = HttpClient::builder().timeout(timeout).build()?;
        let url = rpc_url(endpoint)?;
        Ok(Self {
            http,
            url,
            next_id: AtomicU64::new(1),
        })
    }

    pub fn from_config(config: &NetworkConfig) -> Result<Self, TransportError> {
        let endpoint = config
            .endpoint_url()
            .map_err(|e| TransportError::Connection(e.to_string()))?;
        Self::new(&endpoint, Duration::from_millis(config.request_timeout_ms))
    }

    #[must_use]
    pub const fn url(&self) -> &Url {
        &self.url
    }

    async fn rpc<P, R>(&self, method: &str, params: P) -> Result<R, TransportError>
    where
        P: Serialize + Send,
        R: DeserializeOwned,
    {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let request = RpcRequest::new(id, method, params);
        debug!(method, id, "Sending RPC request");

        let response = self.http.post(self.url.clone()).json(&request).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = error_body(response.text().await);
            warn!(method, status = status.as_u16(), "RPC request rejected");
            return Err(TransportError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let envelope: RpcResponse<R> = response
            .json()
            .await
            .map_err(|e| TransportError::Decode(e.to_string()))?;
        match (envelope.result, envelope.error) {
            (_, Some(err)) => Err(TransportError::Rpc {
                code: err.code,
                message: err.message,
            }),
            (Some(result), None) => Ok(result),
            (None, None) => Err(TransportError::Decode(
                "response carries neither result nor error".into(),
            )),
        }
    }
}

/// `<endpoint>/rpc/v1`, keeping any path prefix on the endpoint.
fn rpc_url(endpoint: &Url) -> Result<Url, TransportError> {
    let mut base = endpoint.clone();
    if !base.path().ends_with('/') {
        let path = format!("{}/", base.path());
        base.set_path(&path);
    }
    base.join(RPC_PATH)
        .map_err(|e| TransportError::Connection(format!("invalid endpoint {endpoint}: {e}")))
}

/// Body quoted in a status error, truncated to [`MAX_ERROR_BODY`] bytes.
fn error_body<E: std::fmt::Display>(text: Result<String, E>) -> String {
    match text {
        Ok(mut body) => {
            body.truncate(floor_char_boundary(&body, MAX_ERROR_BODY));
            body
        }
        Err(e) => format!("<unreadable body: {e}>"),
    }
}

fn floor_char_boundary(s: &str, max: usize) -> usize {
    if s.len() <= max {
        return s.len();
    }
    (0..=max).rev().find(|&i| s.is_char_boundary(i)).unwrap_or(0)
}

#[async_trait]
impl RpcTransport for JsonRpcTransport {
    async fn call(
        &self,
        invocation: &Invocation,
        options: CallOptions,
    ) -> Result<CallResponse, TransportError> {
        let params = CallParams {
            namespace: &invocation.namespace,
            action: &invocation.name,
            args: &invocation.args,
            use_cache: options.use_cache,
        };
        let result: CallResult = self.rpc(METHOD_CALL, params).await?;
        Ok(CallResponse {
            result: result.query_result,
            logs: result.logs.into_lines(),
        })
    }

    async fn submit(
        &self,
        invocation: &Invocation,
        signer: &dyn Signer,
    ) -> Result<TxHash, TransportError> {
        let tx = UnsignedTx {
            namespace: &invocation.namespace,
            action: &invocation.name,
            args: &invocation.args,
            sender: signer.address().as_str(),
        };
        let payload = serde_json::to_vec(&tx).map_err(|e| TransportError::Signing(e.to_string()))?;
        let signature = signer.sign(&payload)?;
        let params = BroadcastParams {
            tx,
            signature: format!("0x{}", hex::encode(signature)),
        };

        let result: BroadcastResult = self.rpc(METHOD_BROADCAST, params).await?;
        Ok(TxHash::new(result.tx_hash))
    }

    async fn query_tx_status(&self, hash: &TxHash) -> Result<TxStatus, TransportError> {
        let params = TxQueryParams {
            tx_hash: hash.as_str(),
        };
        let result: TxQueryResult = self.rpc(METHOD_TX_QUERY, params).await?;
        Ok(result.into_status())
    }

    fn name(&self) -> &'static str {
        "jsonrpc"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rpc_path_is_joined_to_endpoint() {
        let endpoint = Url::parse("http://localhost:8484/").unwrap();
        let transport = JsonRpcTransport::new(&endpoint, Duration::from_secs(1)).unwrap();
        assert_eq!(transport.url().as_str(), "http://localhost:8484/rpc/v1");

        let bare = Url::parse("http://localhost:8484").unwrap();
        assert_eq!(rpc_url(&bare).unwrap().as_str(), "http://localhost:8484/rpc/v1");
    }

    #[test]
    fn rpc_path_keeps_endpoint_prefix() {
        let endpoint = Url::parse("http://localhost:8484/gateway").unwrap();
        let transport = JsonRpcTransport::new(&endpoint, Duration::from_secs(1)).unwrap();
        assert_eq!(transport.url().as_str(), "http://localhost:8484/gateway/rpc/v1");

        let slashed = Url::parse("http://localhost:8484/gateway/").unwrap();
        assert_eq!(
            rpc_url(&slashed).unwrap().as_str(),
            "http://localhost:8484/gateway/rpc/v1"
        );
    }

    #[test]
    fn unreadable_error_body_is_reported() {
        let body = error_body::<&str>(Err("connection reset"));
        assert_eq!(body, "<unreadable body: connection reset>");

        let long = "x".repeat(MAX_ERROR_BODY + 10);
        assert_eq!(error_body::<&str>(Ok(long)).len(), MAX_ERROR_BODY);
    }

    #[test]
    fn error_body_truncates_on_char_boundary() {
        let s = "ééé";
        assert_eq!(floor_char_boundary(s, 3), 2);
        assert_eq!(floor_char_boundary(s, 10), s.len());
    }
}
