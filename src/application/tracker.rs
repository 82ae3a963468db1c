//! Confirmation of submitted transactions.
//!
//! [`TransactionTracker::wait_for_tx`] polls the engine until the transaction
//! is included in a block, then maps the result code to success or
//! [`TxError::Rejected`]. Cancellation and timeout end the wait with
//! [`TxError::Indeterminate`]: the transaction may still be included later.

use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::domain::tx::{TxHandle, TxReceipt, TxStatus};
use crate::error::{IndeterminateReason, TxError};
use crate::port::outbound::transport::RpcTransport;

/// Lower bound applied to the poll interval.
pub const MIN_POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Transient poll failures are logged at `warn` every this many attempts.
const WARN_EVERY: u32 = 10;

/// Polls transaction status until a terminal outcome.
#[derive(Clone)]
pub struct TransactionTracker {
    transport: Arc<dyn RpcTransport>,
}

impl TransactionTracker {
    pub fn new(transport: Arc<dyn RpcTransport>) -> Self {
        Self { transport }
    }

    /// Wait until `handle` is included, `timeout` elapses or `cancel` fires.
    ///
    /// The first status query is sent immediately; each later one waits at
    /// least `poll_interval`. Transport errors while polling are retried.
    /// A token that is already cancelled returns before any query is sent.
    pub async fn wait_for_tx(
        &self,
        handle: &TxHandle,
        poll_interval: Duration,
        timeout: Option<Duration>,
        cancel: &CancellationToken,
    ) -> Result<TxReceipt, TxError> {
        if cancel.is_cancelled() {
            return Err(indeterminate(handle, IndeterminateReason::Cancelled));
        }

        let interval = poll_interval.max(MIN_POLL_INTERVAL);
        let deadline = async {
            match timeout {
                Some(limit) => tokio::time::sleep(limit).await,
                None => std::future::pending().await,
            }
        };

        tokio::select! {
            biased;
            () = cancel.cancelled() => {
                debug!(tx_hash = %handle.hash, "Confirmation wait cancelled");
                Err(indeterminate(handle, IndeterminateReason::Cancelled))
            }
            () = deadline => {
                warn!(tx_hash = %handle.hash, "Confirmation wait timed out");
                Err(indeterminate(handle, IndeterminateReason::TimedOut))
            }
            outcome = self.poll(handle, interval) => outcome,
        }
    }

    async fn poll(&self, handle: &TxHandle, interval: Duration) -> Result<TxReceipt, TxError> {
        let mut attempt: u32 = 0;
        loop {
            attempt = attempt.saturating_add(1);
            match self.transport.query_tx_status(&handle.hash).await {
                Ok(status) if status.included => return settle(handle, status),
                Ok(_) => {
                    debug!(tx_hash = %handle.hash, attempt, "Transaction not yet included");
                }
                Err(e) if attempt % WARN_EVERY == 0 => {
                    warn!(tx_hash = %handle.hash, attempt, error = %e, "Status query failing, retrying");
                }
                Err(e) => {
                    debug!(tx_hash = %handle.hash, attempt, error = %e, "Status query failed, retrying");
                }
            }
            tokio::time::sleep(interval).await;
        }
    }
}

fn settle(handle: &TxHandle, status: TxStatus) -> Result<TxReceipt, TxError> {
    if status.is_success() {
        info!(tx_hash = %handle.hash, height = ?status.height, "Transaction confirmed");
        return Ok(TxReceipt {
            hash: handle.hash.clone(),
            height: status.height,
            log: status.log,
        });
    }
    warn!(tx_hash = %handle.hash, code = status.code, log = %status.log, "Transaction rejected");
    Err(TxError::Rejected {
        hash: handle.hash.clone(),
        code: status.code,
        log: status.log,
    })
}

fn indeterminate(handle: &TxHandle, reason: IndeterminateReason) -> TxError {
    TxError::Indeterminate {
        hash: handle.hash.clone(),
        reason,
    }
}
