//! Composed-stream taxonomies.

use crate::application::invoker::ActionInvoker;
use crate::domain::id::StreamLocator;
use crate::domain::taxonomy::{TaxonomyEntry, TaxonomyInput};
use crate::domain::tx::TxHandle;
use crate::domain::value::ArgValue;
use crate::error::Result;
use crate::port::outbound::transport::CallOptions;

#[derive(Clone)]
pub struct TaxonomyActions {
    invoker: ActionInvoker,
}

impl TaxonomyActions {
    #[must_use]
    pub const fn new(invoker: ActionInvoker) -> Self {
        Self { invoker }
    }

    /// Replace the children of a composed stream from `start_date` onward.
    pub async fn insert_taxonomy(&self, input: &TaxonomyInput) -> Result<TxHandle> {
        let args = input.args()?;
        self.invoker.execute_procedure("insert_taxonomy", args).await
    }

    /// Taxonomy history of a composed stream, or only its current version.
    pub async fn describe_taxonomies(
        &self,
        locator: &StreamLocator,
        latest_only: bool,
    ) -> Result<Vec<TaxonomyEntry>> {
        let args = vec![
            ArgValue::text(locator.data_provider().as_str()),
            ArgValue::text(locator.stream_id().as_str()),
            ArgValue::bool(latest_only),
        ];
        let out = self
            .invoker
            .call_procedure("describe_taxonomies", args, CallOptions::default())
            .await?;
        Ok(out.decode(TaxonomyEntry::from_row)?)
    }
}
