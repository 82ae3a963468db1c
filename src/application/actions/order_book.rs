//! Prediction-market procedures.
//!
//! Every input is validated offline before anything is sent. Writes return a
//! [`TxHandle`]; matching and settlement happen in the engine.

use tracing::debug;

use crate::application::invoker::ActionInvoker;
use crate::domain::args::MarshalArgs;
use crate::domain::error::ValidationResult;
use crate::domain::order_book::{
    CancelOrderInput, ChangeAskInput, ChangeBidInput, CreateMarketInput, GetMarketByHashInput,
    GetMarketInfoInput, GetOrderBookInput, GetUserPositionsInput, ListMarketsInput, MarketInfo,
    OrderBookEntry, PlaceBuyOrderInput, PlaceSellOrderInput, PlaceSplitLimitOrderInput,
    SettleMarketInput, UserPosition,
};
use crate::domain::tx::TxHandle;
use crate::error::Result;
use crate::port::outbound::transport::CallOptions;

#[derive(Clone)]
pub struct OrderBookActions {
    invoker: ActionInvoker,
}

impl OrderBookActions {
    #[must_use]
    pub const fn new(invoker: ActionInvoker) -> Self {
        Self { invoker }
    }

    async fn submit<I: MarshalArgs>(
        &self,
        procedure: &str,
        input: &I,
        validate: impl FnOnce(&I) -> ValidationResult,
    ) -> Result<TxHandle> {
        validate(input)?;
        let args = input.marshal_args()?;
        debug!(procedure, "Order book input validated");
        self.invoker.execute_procedure(procedure, args).await
    }

    pub async fn create_market(&self, input: &CreateMarketInput) -> Result<TxHandle> {
        self.submit("create_market", input, CreateMarketInput::validate)
            .await
    }

    /// Place a bid. `input.price` must be in `-99..=-1`.
    pub async fn place_buy_order(&self, input: &PlaceBuyOrderInput) -> Result<TxHandle> {
        self.submit("place_buy_order", input, PlaceBuyOrderInput::validate)
            .await
    }

    /// Place an ask. `input.price` must be in `1..=99`.
    pub async fn place_sell_order(&self, input: &PlaceSellOrderInput) -> Result<TxHandle> {
        self.submit("place_sell_order", input, PlaceSellOrderInput::validate)
            .await
    }

    /// Mint a YES/NO pair and offer both legs.
    pub async fn place_split_limit_order(
        &self,
        input: &PlaceSplitLimitOrderInput,
    ) -> Result<TxHandle> {
        self.submit(
            "place_split_limit_order",
            input,
            PlaceSplitLimitOrderInput::validate,
        )
        .await
    }

    pub async fn cancel_order(&self, input: &CancelOrderInput) -> Result<TxHandle> {
        self.submit("cancel_order", input, CancelOrderInput::validate)
            .await
    }

    pub async fn change_bid(&self, input: &ChangeBidInput) -> Result<TxHandle> {
        self.submit("change_bid", input, ChangeBidInput::validate)
            .await
    }

    pub async fn change_ask(&self, input: &ChangeAskInput) -> Result<TxHandle> {
        self.submit("change_ask", input, ChangeAskInput::validate)
            .await
    }

    pub async fn settle_market(&self, input: &SettleMarketInput) -> Result<TxHandle> {
        self.submit("settle_market", input, SettleMarketInput::validate)
            .await
    }

    pub async fn get_market_info(&self, input: &GetMarketInfoInput) -> Result<Option<MarketInfo>> {
        input.validate()?;
        let out = self
            .invoker
            .call_procedure("get_market_info", input.marshal_args()?, CallOptions::default())
            .await?;
        Ok(out.decode_first(MarketInfo::from_row)?)
    }

    pub async fn get_market_by_hash(
        &self,
        input: &GetMarketByHashInput,
    ) -> Result<Option<MarketInfo>> {
        input.validate()?;
        let out = self
            .invoker
            .call_procedure("get_market_by_hash", input.marshal_args()?, CallOptions::default())
            .await?;
        Ok(out.decode_first(MarketInfo::from_row)?)
    }

    /// Resting orders and holdings on one outcome.
    pub async fn get_order_book(&self, input: &GetOrderBookInput) -> Result<Vec<OrderBookEntry>> {
        input.validate()?;
        let out = self
            .invoker
            .call_procedure("get_order_book", input.marshal_args()?, CallOptions::default())
            .await?;
        Ok(out.decode(|row| OrderBookEntry::from_row(row, input.outcome))?)
    }

    pub async fn get_user_positions(
        &self,
        input: &GetUserPositionsInput,
    ) -> Result<Vec<UserPosition>> {
        input.validate()?;
        let out = self
            .invoker
            .call_procedure("get_user_positions", input.marshal_args()?, CallOptions::default())
            .await?;
        Ok(out.decode(UserPosition::from_row)?)
    }

    pub async fn list_markets(&self, input: &ListMarketsInput) -> Result<Vec<MarketInfo>> {
        input.validate()?;
        let out = self
            .invoker
            .call_procedure("list_markets", input.marshal_args()?, CallOptions::default())
            .await?;
        Ok(out.decode(MarketInfo::from_row)?)
    }
}
