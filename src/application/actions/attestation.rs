//! Attestation requests and retrieval of signed payloads.

use crate::application::invoker::ActionInvoker;
use crate::domain::args::MarshalArgs;
use crate::domain::attestation::{AttestationSummary, ListAttestationsInput, RequestAttestationInput};
use crate::domain::id::TxHash;
use crate::domain::tx::TxHandle;
use crate::domain::value::ArgValue;
use crate::error::Result;
use crate::port::outbound::transport::CallOptions;

#[derive(Clone)]
pub struct AttestationActions {
    invoker: ActionInvoker,
}

impl AttestationActions {
    #[must_use]
    pub const fn new(invoker: ActionInvoker) -> Self {
        Self { invoker }
    }

    /// Ask the engine to run and sign a read action.
    ///
    /// The returned handle's hash is the request id for
    /// [`get_signed_attestation`](Self::get_signed_attestation).
    pub async fn request_attestation(&self, input: &RequestAttestationInput) -> Result<TxHandle> {
        let args = input.to_args()?;
        self.invoker
            .execute_procedure("request_attestation", args)
            .await
    }

    /// Signed payload for a request, or `None` while it is unsigned.
    pub async fn get_signed_attestation(&self, request_tx_id: &TxHash) -> Result<Option<Vec<u8>>> {
        let out = self
            .invoker
            .call_procedure(
                "get_signed_attestation",
                vec![ArgValue::text(request_tx_id.as_str())],
                CallOptions::default(),
            )
            .await?;
        Ok(out.decode_first(|row| row.bytes("payload"))?)
    }

    pub async fn list_attestations(
        &self,
        input: &ListAttestationsInput,
    ) -> Result<Vec<AttestationSummary>> {
        input.validate()?;
        let out = self
            .invoker
            .call_procedure("list_attestations", input.marshal_args()?, CallOptions::default())
            .await?;
        Ok(out.decode(AttestationSummary::from_row)?)
    }
}
