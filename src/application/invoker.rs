//! Dispatch of named read and write procedures.
//!
//! Reads ("call") return rows plus the cache metadata recovered from the
//! execution log and never produce a transaction. Writes ("execute") return a
//! [`TxHandle`] or an error, never a bare success.

use std::sync::Arc;

use tracing::{debug, info};

use crate::domain::cache::CacheMetadata;
use crate::domain::result::{DecodeError, QueryResult, Row};
use crate::domain::tx::TxHandle;
use crate::domain::value::ArgValue;
use crate::error::{ConfigError, Error, Result, TransportError};
use crate::port::outbound::signer::Signer;
use crate::port::outbound::transport::{CallOptions, Invocation, RpcTransport};

/// Rows returned by a read procedure.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ProcedureResult {
    pub result: QueryResult,
    /// Cache fields from the log, with `rows_served` set to the row count.
    pub cache: CacheMetadata,
    pub logs: Vec<String>,
}

impl ProcedureResult {
    /// Decode every row with `decode`.
    pub fn decode<T, F>(&self, decode: F) -> std::result::Result<Vec<T>, DecodeError>
    where
        F: Fn(&Row<'_>) -> std::result::Result<T, DecodeError>,
    {
        self.result.iter().map(|row| decode(&row)).collect()
    }

    /// Decode the first row, if any.
    pub fn decode_first<T, F>(&self, decode: F) -> std::result::Result<Option<T>, DecodeError>
    where
        F: Fn(&Row<'_>) -> std::result::Result<T, DecodeError>,
    {
        self.result.iter().next().map(|row| decode(&row)).transpose()
    }
}

/// Sends procedure invocations through an [`RpcTransport`].
///
/// Holds no per-call state; concurrent invocations share nothing but the
/// transport.
#[derive(Clone)]
pub struct ActionInvoker {
    transport: Arc<dyn RpcTransport>,
    signer: Option<Arc<dyn Signer>>,
    namespace: String,
}

impl ActionInvoker {
    pub fn new(
        transport: Arc<dyn RpcTransport>,
        signer: Option<Arc<dyn Signer>>,
        namespace: impl Into<String>,
    ) -> Self {
        Self {
            transport,
            signer,
            namespace: namespace.into(),
        }
    }

    #[must_use]
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    #[must_use]
    pub fn signer(&self) -> Option<&Arc<dyn Signer>> {
        self.signer.as_ref()
    }

    #[must_use]
    pub fn transport(&self) -> &Arc<dyn RpcTransport> {
        &self.transport
    }

    /// Run a read-only procedure.
    ///
    /// Transport failures are returned immediately with the procedure name
    /// attached; reads are never retried here.
    pub async fn call_procedure(
        &self,
        name: &str,
        args: Vec<ArgValue>,
        options: CallOptions,
    ) -> Result<ProcedureResult> {
        let invocation = Invocation::read(&self.namespace, name, args);
        debug!(
            procedure = name,
            args = invocation.args.len(),
            use_cache = options.use_cache,
            transport = self.transport.name(),
            "Calling procedure"
        );

        let response = self
            .transport
            .call(&invocation, options)
            .await
            .map_err(|e| Error::invocation(name, e))?;

        let mut cache = CacheMetadata::from_logs(&response.logs);
        cache.rows_served = response.result.len();
        debug!(
            procedure = name,
            rows = response.result.len(),
            cache_hit = cache.cache_hit,
            "Procedure returned"
        );

        Ok(ProcedureResult {
            result: response.result,
            cache,
            logs: response.logs,
        })
    }

    /// Submit a state-changing procedure.
    ///
    /// Returns once the engine has accepted the transaction; use the
    /// transaction tracker to learn its outcome.
    pub async fn execute_procedure(&self, name: &str, args: Vec<ArgValue>) -> Result<TxHandle> {
        let signer = self
            .signer
            .as_deref()
            .ok_or(ConfigError::MissingField { field: "signer" })?;
        let invocation = Invocation::write(&self.namespace, name, args);

        let hash = self
            .transport
            .submit(&invocation, signer)
            .await
            .map_err(|e| Error::invocation(name, e))?;
        if hash.is_empty() {
            return Err(Error::invocation(name, TransportError::MissingHandle));
        }

        info!(
            procedure = name,
            tx_hash = %hash,
            sender = %signer.address(),
            "Transaction submitted"
        );
        Ok(TxHandle::new(hash))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::id::TxHash;
    use crate::error::ErrorClass;
    use crate::port::outbound::transport::{CallResponse, InvocationKind};
    use crate::testkit::domain::{address, signer};
    use crate::testkit::transport::ScriptedTransport;
    use serde_json::json;

    fn invoker(transport: &Arc<ScriptedTransport>) -> ActionInvoker {
        ActionInvoker::new(transport.clone(), Some(signer('a')), "main")
    }

    #[tokio::test]
    async fn call_extracts_cache_metadata_and_row_count() {
        let transport = Arc::new(ScriptedTransport::new().with_call_results(vec![Ok(
            CallResponse {
                result: QueryResult {
                    columns: vec!["event_time".into(), "value".into()],
                    rows: vec![vec![json!(1), json!("1.5")], vec![json!(2), json!("2.5")]],
                },
                logs: vec![
                    "invalid json".into(),
                    r#"{"cache_hit":true,"cache_height":1000}"#.into(),
                ],
            },
        )]));

        let out = invoker(&transport)
            .call_procedure("get_record", vec![ArgValue::int(1)], CallOptions::cached(true))
            .await
            .unwrap();

        assert!(out.cache.cache_hit);
        assert_eq!(out.cache.cache_height, Some(1000));
        assert_eq!(out.cache.rows_served, 2);

        let calls = transport.invocations();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].0.kind, InvocationKind::Read);
        assert_eq!(calls[0].0.namespace, "main");
        assert!(calls[0].1.use_cache);
        assert_eq!(transport.submit_count(), 0);
    }

    #[tokio::test]
    async fn call_failure_names_procedure() {
        let transport = Arc::new(ScriptedTransport::new().with_call_results(vec![Err(
            TransportError::Connection("refused".into()),
        )]));

        let err = invoker(&transport)
            .call_procedure("list_streams", vec![], CallOptions::default())
            .await
            .unwrap_err();

        assert!(matches!(err, Error::Invocation { ref procedure, .. } if procedure == "list_streams"));
        assert_eq!(err.class(), ErrorClass::Transport);
    }

    #[tokio::test]
    async fn execute_returns_handle() {
        let transport = Arc::new(
            ScriptedTransport::new().with_submit_results(vec![Ok(TxHash::new("0xABCD"))]),
        );

        let handle = invoker(&transport)
            .execute_procedure("insert_records", vec![])
            .await
            .unwrap();

        assert_eq!(handle.hash.as_str(), "abcd");
        let calls = transport.invocations();
        assert_eq!(calls[0].0.kind, InvocationKind::Write);
        assert_eq!(transport.submitted_by(), vec![address('a')]);
    }

    #[tokio::test]
    async fn execute_without_hash_is_an_error() {
        let transport =
            Arc::new(ScriptedTransport::new().with_submit_results(vec![Ok(TxHash::new(""))]));

        let err = invoker(&transport)
            .execute_procedure("create_stream", vec![])
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            Error::Invocation {
                source: TransportError::MissingHandle,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn execute_requires_signer() {
        let transport = Arc::new(ScriptedTransport::new());
        let invoker = ActionInvoker::new(transport.clone(), None, "main");

        let err = invoker
            .execute_procedure("create_stream", vec![])
            .await
            .unwrap_err();

        assert!(matches!(err, Error::Config(ConfigError::MissingField { field: "signer" })));
        assert_eq!(transport.submit_count(), 0);
    }
}
