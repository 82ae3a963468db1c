//! Composition root: transport, invoker, tracker and action facades.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::adapter::outbound::jsonrpc::JsonRpcTransport;
use crate::application::actions::{
    AttestationActions, OrderBookActions, RoleActions, StreamActions, TaxonomyActions,
};
use crate::application::invoker::{ActionInvoker, ProcedureResult};
use crate::application::tracker::TransactionTracker;
use crate::domain::cache::CacheMetadata;
use crate::domain::id::StreamLocator;
use crate::domain::stream::GetRecordInput;
use crate::domain::tx::{TxHandle, TxReceipt};
use crate::domain::value::ArgValue;
use crate::error::Result;
use crate::infrastructure::config::settings::Config;
use crate::port::outbound::signer::Signer;
use crate::port::outbound::transport::{CallOptions, RpcTransport};

/// Entry point for talking to the engine.
///
/// Reads work without a signer; writes fail with a missing-signer
/// configuration error until one is attached.
#[derive(Clone)]
pub struct Client {
    config: Config,
    invoker: ActionInvoker,
    tracker: TransactionTracker,
}

impl Client {
    #[must_use]
    pub fn builder() -> ClientBuilder {
        ClientBuilder::default()
    }

    /// Connect over JSON-RPC using `config`, without a signer.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or the HTTP client
    /// cannot be built.
    pub fn connect(config: &Config) -> Result<Self> {
        Self::builder().config(config.clone()).build()
    }

    /// Attach the signer used for writes.
    #[must_use]
    pub fn with_signer(self, signer: Arc<dyn Signer>) -> Self {
        let invoker = ActionInvoker::new(
            self.invoker.transport().clone(),
            Some(signer),
            self.invoker.namespace(),
        );
        Self { invoker, ..self }
    }

    #[must_use]
    pub const fn config(&self) -> &Config {
        &self.config
    }

    #[must_use]
    pub const fn invoker(&self) -> &ActionInvoker {
        &self.invoker
    }

    #[must_use]
    pub const fn tracker(&self) -> &TransactionTracker {
        &self.tracker
    }

    #[must_use]
    pub fn streams(&self) -> StreamActions {
        StreamActions::new(self.invoker.clone())
    }

    #[must_use]
    pub fn taxonomies(&self) -> TaxonomyActions {
        TaxonomyActions::new(self.invoker.clone())
    }

    #[must_use]
    pub fn roles(&self) -> RoleActions {
        RoleActions::new(self.invoker.clone())
    }

    #[must_use]
    pub fn attestations(&self) -> AttestationActions {
        AttestationActions::new(self.invoker.clone())
    }

    #[must_use]
    pub fn order_book(&self) -> OrderBookActions {
        OrderBookActions::new(self.invoker.clone())
    }

    /// A record query for `locator` using the configured cache default.
    #[must_use]
    pub fn record_query(&self, locator: &StreamLocator) -> GetRecordInput {
        GetRecordInput::new(locator).with_cache(self.config.cache.use_cache)
    }

    /// Whether `meta` is older than the configured `stale_after_blocks`.
    #[must_use]
    pub fn is_stale(&self, meta: &CacheMetadata, current_height: i64) -> bool {
        meta.is_stale(current_height, self.config.cache.stale_after_blocks)
    }

    /// Run any read procedure with the configured cache default.
    pub async fn call_procedure(&self, name: &str, args: Vec<ArgValue>) -> Result<ProcedureResult> {
        let options = CallOptions::cached(self.config.cache.use_cache);
        self.invoker.call_procedure(name, args, options).await
    }

    /// Submit any write procedure.
    pub async fn execute_procedure(&self, name: &str, args: Vec<ArgValue>) -> Result<TxHandle> {
        self.invoker.execute_procedure(name, args).await
    }

    /// Wait for `handle` using the configured poll interval and timeout.
    pub async fn wait_for_tx(
        &self,
        handle: &TxHandle,
        cancel: &CancellationToken,
    ) -> Result<TxReceipt> {
        let tx = &self.config.transaction;
        Ok(self
            .tracker
            .wait_for_tx(handle, tx.poll_interval(), tx.confirm_timeout(), cancel)
            .await?)
    }

    /// Submit a write and wait for its outcome.
    pub async fn execute_and_wait(
        &self,
        name: &str,
        args: Vec<ArgValue>,
        cancel: &CancellationToken,
    ) -> Result<TxReceipt> {
        let handle = self.execute_procedure(name, args).await?;
        self.wait_for_tx(&handle, cancel).await
    }
}

/// Builder for [`Client`].
///
/// Without an explicit transport, a [`JsonRpcTransport`] is created from the
/// configuration's `[network]` section, which must then be valid.
#[derive(Default)]
pub struct ClientBuilder {
    config: Option<Config>,
    transport: Option<Arc<dyn RpcTransport>>,
    signer: Option<Arc<dyn Signer>>,
}

impl ClientBuilder {
    #[must_use]
    pub fn config(mut self, config: Config) -> Self {
        self.config = Some(config);
        self
    }

    #[must_use]
    pub fn transport(mut self, transport: Arc<dyn RpcTransport>) -> Self {
        self.transport = Some(transport);
        self
    }

    #[must_use]
    pub fn signer(mut self, signer: Arc<dyn Signer>) -> Self {
        self.signer = Some(signer);
        self
    }

    /// # Errors
    ///
    /// Returns an error if no transport was given and the configuration is
    /// invalid or the HTTP client cannot be built.
    pub fn build(self) -> Result<Client> {
        let config = self.config.unwrap_or_default();
        let transport = match self.transport {
            Some(transport) => transport,
            None => {
                config.validate()?;
                let transport: Arc<dyn RpcTransport> =
                    Arc::new(JsonRpcTransport::from_config(&config.network)?);
                transport
            }
        };

        info!(
            transport = transport.name(),
            namespace = %config.network.namespace,
            signer = self.signer.as_ref().map(|s| s.address().to_string()).as_deref(),
            "Client ready"
        );

        let invoker = ActionInvoker::new(
            transport.clone(),
            self.signer,
            config.network.namespace.clone(),
        );
        let tracker = TransactionTracker::new(transport);
        Ok(Client {
            config,
            invoker,
            tracker,
        })
    }
}
