//! In-memory [`RpcTransport`] with scripted results.
//!
//! Each call to `call()`, `submit()` or `query_tx_status()` pops the next
//! result from its queue. Exhausted queues fall back to an empty result, a
//! fresh transaction hash, and a pending status respectively, so an empty
//! status queue models a transaction that is never included.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU32, Ordering};

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::domain::id::{EthAddress, TxHash};
use crate::domain::tx::TxStatus;
use crate::error::TransportError;
use crate::port::outbound::signer::Signer;
use crate::port::outbound::transport::{CallOptions, CallResponse, Invocation, RpcTransport};

type Queue<T> = Mutex<VecDeque<Result<T, TransportError>>>;

#[derive(Default)]
pub struct ScriptedTransport {
    call_results: Queue<CallResponse>,
    submit_results: Queue<TxHash>,
    status_results: Queue<TxStatus>,
    invocations: Mutex<Vec<(Invocation, CallOptions)>>,
    senders: Mutex<Vec<EthAddress>>,
    call_count: AtomicU32,
    submit_count: AtomicU32,
    status_count: AtomicU32,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_call_results(self, results: Vec<Result<CallResponse, TransportError>>) -> Self {
        *self.call_results.lock() = results.into();
        self
    }

    pub fn with_submit_results(self, results: Vec<Result<TxHash, TransportError>>) -> Self {
        *self.submit_results.lock() = results.into();
        self
    }

    pub fn with_status_results(self, results: Vec<Result<TxStatus, TransportError>>) -> Self {
        *self.status_results.lock() = results.into();
        self
    }

    /// Queue one more read result.
    pub fn push_call(&self, result: Result<CallResponse, TransportError>) {
        self.call_results.lock().push_back(result);
    }

    /// Every invocation seen, reads and writes, in order. Writes are recorded
    /// with default options.
    pub fn invocations(&self) -> Vec<(Invocation, CallOptions)> {
        self.invocations.lock().clone()
    }

    /// Signer addresses of each submission, in order.
    pub fn submitted_by(&self) -> Vec<EthAddress> {
        self.senders.lock().clone()
    }

    pub fn call_count(&self) -> u32 {
        self.call_count.load(Ordering::SeqCst)
    }

    pub fn submit_count(&self) -> u32 {
        self.submit_count.load(Ordering::SeqCst)
    }

    pub fn status_count(&self) -> u32 {
        self.status_count.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RpcTransport for ScriptedTransport {
    async fn call(
        &self,
        invocation: &Invocation,
        options: CallOptions,
    ) -> Result<CallResponse, TransportError> {
        self.call_count.fetch_add(1, Ordering::SeqCst);
        self.invocations.lock().push((invocation.clone(), options));
        self.call_results
            .lock()
            .pop_front()
            .unwrap_or_else(|| Ok(CallResponse::default()))
    }

    async fn submit(
        &self,
        invocation: &Invocation,
        signer: &dyn Signer,
    ) -> Result<TxHash, TransportError> {
        let n = self.submit_count.fetch_add(1, Ordering::SeqCst) + 1;
        self.invocations
            .lock()
            .push((invocation.clone(), CallOptions::default()));
        self.senders.lock().push(signer.address().clone());
        self.submit_results
            .lock()
            .pop_front()
            .unwrap_or_else(|| Ok(TxHash::new(format!("{n:064x}"))))
    }

    async fn query_tx_status(&self, _hash: &TxHash) -> Result<TxStatus, TransportError> {
        self.status_count.fetch_add(1, Ordering::SeqCst);
        self.status_results
            .lock()
            .pop_front()
            .unwrap_or_else(|| Ok(TxStatus::pending()))
    }

    fn name(&self) -> &'static str {
        "scripted"
    }
}
