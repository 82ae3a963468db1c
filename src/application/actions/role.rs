//! Role grants, revocations and membership checks.

use crate::application::invoker::ActionInvoker;
use crate::domain::args::MarshalArgs;
use crate::domain::id::EthAddress;
use crate::domain::result::DecodeError;
use crate::domain::role::{AreMembersOfInput, RoleChangeInput};
use crate::domain::tx::TxHandle;
use crate::error::Result;
use crate::port::outbound::transport::CallOptions;

#[derive(Clone)]
pub struct RoleActions {
    invoker: ActionInvoker,
}

impl RoleActions {
    #[must_use]
    pub const fn new(invoker: ActionInvoker) -> Self {
        Self { invoker }
    }

    pub async fn grant_roles(&self, input: &RoleChangeInput) -> Result<TxHandle> {
        input.validate()?;
        self.invoker
            .execute_procedure("grant_roles", input.marshal_args()?)
            .await
    }

    pub async fn revoke_roles(&self, input: &RoleChangeInput) -> Result<TxHandle> {
        input.validate()?;
        self.invoker
            .execute_procedure("revoke_roles", input.marshal_args()?)
            .await
    }

    /// Membership of each wallet, in the order the engine returns them.
    pub async fn are_members_of(&self, input: &AreMembersOfInput) -> Result<Vec<(EthAddress, bool)>> {
        input.validate()?;
        let out = self
            .invoker
            .call_procedure("are_members_of", input.marshal_args()?, CallOptions::default())
            .await?;
        Ok(out.decode(|row| {
            let wallet = EthAddress::parse(row.str("wallet")?)
                .map_err(|e| row.error("wallet", e.constraint()))?;
            Ok::<_, DecodeError>((wallet, row.bool("is_member")?))
        })?)
    }
}
