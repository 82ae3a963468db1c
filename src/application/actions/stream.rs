//! Stream lifecycle, record insertion and range reads.

use crate::application::invoker::{ActionInvoker, ProcedureResult};
use crate::domain::args::{ArgsBuilder, MarshalArgs};
use crate::domain::id::{StreamId, StreamLocator};
use crate::domain::stream::{
    batch_deploy_args, insert_records_args, GetIndexInput, GetRecordInput, InsertRecordInput,
    ListStreamsInput, StreamDefinition, StreamRecord, StreamResult, StreamSummary, StreamType,
};
use crate::domain::tx::TxHandle;
use crate::domain::value::ArgValue;
use crate::error::Result;
use crate::port::outbound::transport::CallOptions;

#[derive(Clone)]
pub struct StreamActions {
    invoker: ActionInvoker,
}

impl StreamActions {
    #[must_use]
    pub const fn new(invoker: ActionInvoker) -> Self {
        Self { invoker }
    }

    /// Deploy a stream under the signer's address.
    pub async fn deploy_stream(
        &self,
        stream_id: StreamId,
        stream_type: StreamType,
    ) -> Result<TxHandle> {
        let definition = StreamDefinition::new(stream_id, stream_type);
        self.invoker
            .execute_procedure("create_stream", definition.args())
            .await
    }

    /// Deploy several streams in one atomic transaction.
    pub async fn batch_deploy_streams(&self, definitions: &[StreamDefinition]) -> Result<TxHandle> {
        let args = batch_deploy_args(definitions)?;
        self.invoker.execute_procedure("create_streams", args).await
    }

    pub async fn destroy_stream(&self, locator: &StreamLocator) -> Result<TxHandle> {
        let args = vec![
            ArgValue::text(locator.data_provider().as_str()),
            ArgValue::text(locator.stream_id().as_str()),
        ];
        self.invoker.execute_procedure("delete_stream", args).await
    }

    /// Insert records into primitive streams in one atomic transaction.
    pub async fn insert_records(&self, records: &[InsertRecordInput]) -> Result<TxHandle> {
        let args = insert_records_args(records)?;
        self.invoker.execute_procedure("insert_records", args).await
    }

    /// Raw records in `[from, to]`.
    pub async fn get_record(&self, input: &GetRecordInput) -> Result<StreamResult> {
        input.validate()?;
        let out = self
            .invoker
            .call_procedure("get_record", input.marshal_args()?, CallOptions::cached(input.use_cache))
            .await?;
        stream_result(out, input.locator(), input.from, input.to, input.frozen_at)
    }

    /// Values indexed against the value at `base_time`.
    pub async fn get_index(&self, input: &GetIndexInput) -> Result<StreamResult> {
        input.validate()?;
        let out = self
            .invoker
            .call_procedure("get_index", input.marshal_args()?, CallOptions::cached(input.use_cache))
            .await?;
        stream_result(out, input.locator(), input.from, input.to, input.frozen_at)
    }

    /// Earliest record at or after `input.from`.
    pub async fn get_first_record(&self, input: &GetRecordInput) -> Result<Option<StreamRecord>> {
        let args = ArgsBuilder::new()
            .required("data_provider", &input.data_provider)?
            .required("stream_id", &input.stream_id)?
            .optional("after", &input.from)?
            .optional("frozen_at", &input.frozen_at)?
            .finish();
        let out = self
            .invoker
            .call_procedure("get_first_record", args, CallOptions::cached(input.use_cache))
            .await?;
        Ok(out.decode_first(StreamRecord::from_row)?)
    }

    /// Latest record at or before `input.to`.
    pub async fn get_last_record(&self, input: &GetRecordInput) -> Result<Option<StreamRecord>> {
        let args = ArgsBuilder::new()
            .required("data_provider", &input.data_provider)?
            .required("stream_id", &input.stream_id)?
            .optional("before", &input.to)?
            .optional("frozen_at", &input.frozen_at)?
            .finish();
        let out = self
            .invoker
            .call_procedure("get_last_record", args, CallOptions::cached(input.use_cache))
            .await?;
        Ok(out.decode_first(StreamRecord::from_row)?)
    }

    pub async fn list_streams(&self, input: &ListStreamsInput) -> Result<Vec<StreamSummary>> {
        input.validate()?;
        let out = self
            .invoker
            .call_procedure("list_streams", input.marshal_args()?, CallOptions::default())
            .await?;
        Ok(out.decode(StreamSummary::from_row)?)
    }
}

// Cache metadata from the log says nothing about what was asked for; scope it.
fn stream_result(
    out: ProcedureResult,
    locator: StreamLocator,
    from: Option<i64>,
    to: Option<i64>,
    frozen_at: Option<i64>,
) -> Result<StreamResult> {
    let records = out.decode(StreamRecord::from_row)?;
    let mut cache = out.cache;
    cache.rows_served = records.len();
    cache.from = from;
    cache.to = to;
    cache.frozen_at = frozen_at;
    cache.stream_id = Some(locator.stream_id().clone());
    cache.data_provider = Some(locator.data_provider().clone());
    Ok(StreamResult { records, cache })
}
