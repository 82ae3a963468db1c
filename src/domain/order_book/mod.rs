//! Prediction-market order book: prices, inputs and read models.
//!
//! Markets are binary (YES/NO outcomes) with prices in whole cents. All
//! validation here is offline; matching and settlement run in the engine.

mod book;
mod bridge;
mod input;
mod price;

pub use book::{MarketInfo, OrderBookEntry, UserPosition};
pub use bridge::Bridge;
pub use input::{
    CancelOrderInput, ChangeAskInput, ChangeBidInput, CreateMarketInput, GetMarketByHashInput,
    GetMarketInfoInput, GetOrderBookInput, GetUserPositionsInput, ListMarketsInput,
    PlaceBuyOrderInput, PlaceSellOrderInput, PlaceSplitLimitOrderInput, SettleMarketInput,
    MAX_ORDER_AMOUNT, MAX_SPREAD, MIN_SPREAD,
};
pub use price::{BookPosition, LimitPrice, Side};
